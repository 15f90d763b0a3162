use crate::domain::model::{EnteredProduct, FormVariant, Report, ReportBlock, UrgencyBand};
use crate::utils::error::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";
pub const DEFAULT_TITLE: &str = "Product Expiry Report";
pub const DEFAULT_LINES_PER_PAGE: usize = 60;

const SECONDS_PER_DAY: i64 = 86_400;
const PAGE_BREAK: char = '\u{000C}';

/// Whole days from `now` until the start of `expiry_date`, rounded down.
/// A product expiring today is already at -1 once the day has started.
pub fn days_remaining(expiry_date: NaiveDate, now: NaiveDateTime) -> i64 {
    let expiry_start = expiry_date.and_time(NaiveTime::MIN);
    (expiry_start - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Entered products ordered by expiry date, latest first. Equal dates keep
/// their entry order.
pub fn sorted_by_expiry_desc(products: &[EnteredProduct]) -> Vec<&EnteredProduct> {
    let mut sorted: Vec<&EnteredProduct> = products.iter().collect();
    sorted.sort_by(|a, b| b.expiry_date.cmp(&a.expiry_date));
    sorted
}

pub fn assemble(
    products: &[EnteredProduct],
    now: NaiveDateTime,
    variant: FormVariant,
    title: &str,
) -> Report {
    let blocks = sorted_by_expiry_desc(products)
        .into_iter()
        .map(|product| {
            let days = days_remaining(product.expiry_date, now);
            ReportBlock {
                identifier: product.identifier.clone(),
                description: product.description.clone(),
                expiry_date: product.expiry_date,
                quantity: product.quantity,
                on_promotion: if variant.tracks_promotion() {
                    Some(product.on_promotion.unwrap_or(false))
                } else {
                    None
                },
                days_remaining: days,
                band: UrgencyBand::classify(days),
            }
        })
        .collect();

    Report {
        title: title.to_string(),
        generated_at: now,
        variant,
        blocks,
    }
}

fn block_lines(block: &ReportBlock) -> Vec<String> {
    let mut lines = vec![
        format!("Code: {}", block.identifier),
        format!("Description: {}", block.description),
        format!("Expiry date: {}", block.expiry_date.format(DATE_FORMAT)),
        format!("Quantity: {}", block.quantity),
    ];
    if let Some(on_promotion) = block.on_promotion {
        lines.push(format!(
            "On promotion: {}",
            if on_promotion { "Yes" } else { "No" }
        ));
    }
    lines.push(format!(
        "{} Days until expiry: {} days",
        block.band.marker(),
        block.days_remaining
    ));
    lines
}

/// Renders the report as paginated plain text.
///
/// Layout per page: the title and generation timestamp open the first page,
/// later pages open with a `Page N` header after a form feed. A product
/// block is never split across pages; each block is followed by one blank
/// line.
pub fn render_text(report: &Report, lines_per_page: usize) -> String {
    let mut out = String::new();
    let mut page = 1;
    let mut used = 0;

    fn push_line(out: &mut String, used: &mut usize, line: &str) {
        out.push_str(line);
        out.push('\n');
        *used += 1;
    }

    push_line(&mut out, &mut used, &report.title);
    push_line(&mut out, &mut used, "");
    push_line(
        &mut out,
        &mut used,
        &format!(
            "Report generated at: {}",
            report.generated_at.format(TIMESTAMP_FORMAT)
        ),
    );
    push_line(&mut out, &mut used, "");

    for block in &report.blocks {
        let lines = block_lines(block);
        let needed = lines.len() + 1;

        if used + needed > lines_per_page {
            page += 1;
            used = 0;
            out.push(PAGE_BREAK);
            push_line(&mut out, &mut used, &format!("Page {}", page));
            push_line(&mut out, &mut used, "");
        }

        for line in &lines {
            push_line(&mut out, &mut used, line);
        }
        push_line(&mut out, &mut used, "");
    }

    out
}

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
