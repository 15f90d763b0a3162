//! Session-scoped form state and the reducer that drives it.
//!
//! Every interaction is one call to [`update`]: it takes the current state
//! and an [`Action`] and returns the next state, the view to show and, for
//! report generation, an [`Effect`] for the caller to carry out. Nothing in
//! here performs I/O.

use crate::core::catalog::Catalog;
use crate::core::report::{self, DATE_FORMAT};
use crate::domain::model::{EnteredProduct, FormVariant, Report};
use crate::utils::error::FormError;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub search: String,
    pub identifier: String,
    pub description: String,
    pub quantity: u32,
    pub expiry: Option<NaiveDate>,
    pub on_promotion: bool,
    pub products: Vec<EnteredProduct>,
    pub notice: Option<Notice>,
}

impl FormState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            search: String::new(),
            identifier: String::new(),
            description: String::new(),
            quantity: 1,
            expiry: Some(today),
            on_promotion: false,
            products: Vec::new(),
            notice: None,
        }
    }

    fn reset_fields(&mut self, today: NaiveDate) {
        self.identifier.clear();
        self.description.clear();
        self.quantity = 1;
        self.expiry = Some(today);
        self.on_promotion = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    SetIdentifier(String),
    SetDescription(String),
    SetQuantity(u32),
    SetExpiry(Option<NaiveDate>),
    SetPromotion(bool),
    Add,
    GenerateReport,
    ClearFields,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Search(_) => "search",
            Action::SetIdentifier(_) => "identifier",
            Action::SetDescription(_) => "description",
            Action::SetQuantity(_) => "quantity",
            Action::SetExpiry(_) => "expiry",
            Action::SetPromotion(_) => "promotion",
            Action::Add => "add",
            Action::GenerateReport => "report",
            Action::ClearFields => "clear fields",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ExportReport(Report),
}

/// Read-only inputs shared by every interaction of a session.
#[derive(Debug, Clone)]
pub struct FormContext {
    pub catalog: Catalog,
    pub variant: FormVariant,
    pub report_title: String,
}

impl FormContext {
    pub fn new(catalog: Catalog, variant: FormVariant) -> Self {
        Self {
            catalog,
            variant,
            report_title: report::DEFAULT_TITLE.to_string(),
        }
    }

    pub fn with_report_title(mut self, title: impl Into<String>) -> Self {
        self.report_title = title.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: FormState,
    pub view: View,
    pub effect: Option<Effect>,
    pub error: Option<FormError>,
}

pub fn update(
    mut state: FormState,
    action: Action,
    ctx: &FormContext,
    now: NaiveDateTime,
) -> Transition {
    let today = now.date();
    let mut effect = None;
    // Notices last for a single interaction.
    state.notice = None;

    let result: Result<Option<Notice>, FormError> = match action {
        Action::Search(query) => {
            state.search = query;
            if state.search.is_empty() {
                Ok(None)
            } else if let Some(entry) = ctx.catalog.lookup(&state.search) {
                state.identifier = entry.identifier.clone();
                state.description = entry.description.clone();
                state.expiry = Some(today);
                Ok(Some(Notice::info(format!(
                    "Product found: {} (Code: {})",
                    entry.description, entry.identifier
                ))))
            } else {
                Ok(Some(Notice::info(
                    "Product not found. Enter the data manually.",
                )))
            }
        }
        Action::SetIdentifier(value) => {
            state.identifier = value;
            Ok(None)
        }
        Action::SetDescription(value) => {
            state.description = value;
            Ok(None)
        }
        Action::SetQuantity(0) => Err(FormError::InvalidQuantity { value: 0 }),
        Action::SetQuantity(value) => {
            state.quantity = value;
            Ok(None)
        }
        Action::SetExpiry(Some(date)) if date < today => Err(FormError::ExpiryInPast {
            date: date.format(DATE_FORMAT).to_string(),
        }),
        Action::SetExpiry(date) => {
            state.expiry = date;
            Ok(None)
        }
        action @ (Action::SetPromotion(_) | Action::ClearFields)
            if !ctx.variant.tracks_promotion() =>
        {
            Err(FormError::ActionUnavailable {
                action: action.name(),
            })
        }
        Action::SetPromotion(value) => {
            state.on_promotion = value;
            Ok(None)
        }
        Action::ClearFields => {
            state.reset_fields(today);
            Ok(Some(Notice::info("Fields cleared.")))
        }
        Action::Add => add_product(&mut state, ctx.variant, today),
        Action::GenerateReport => {
            if state.products.is_empty() {
                Err(FormError::EmptyReport)
            } else {
                let report = report::assemble(&state.products, now, ctx.variant, &ctx.report_title);
                effect = Some(Effect::ExportReport(report));
                Ok(None)
            }
        }
    };

    let error = match result {
        Ok(Some(notice)) => {
            state.notice = Some(notice);
            None
        }
        Ok(None) => None,
        Err(err) => {
            tracing::debug!("Form action rejected: {}", err);
            state.notice = Some(Notice::error(err.to_string()));
            Some(err)
        }
    };

    let view = View::render(&state, ctx.variant, now);
    Transition {
        state,
        view,
        effect,
        error,
    }
}

fn add_product(
    state: &mut FormState,
    variant: FormVariant,
    today: NaiveDate,
) -> Result<Option<Notice>, FormError> {
    if variant.rejects_duplicates()
        && state
            .products
            .iter()
            .any(|p| p.identifier == state.identifier)
    {
        return Err(FormError::DuplicateIdentifier {
            identifier: state.identifier.clone(),
        });
    }

    let mut missing = Vec::new();
    if state.identifier.trim().is_empty() {
        missing.push("identifier");
    }
    if state.description.trim().is_empty() {
        missing.push("description");
    }
    if state.expiry.is_none() {
        missing.push("expiry date");
    }
    let expiry_date = match state.expiry {
        Some(date) if missing.is_empty() => date,
        _ => return Err(FormError::MissingField { fields: missing }),
    };

    let product = EnteredProduct {
        identifier: state.identifier.clone(),
        description: state.description.clone(),
        expiry_date,
        quantity: state.quantity,
        on_promotion: variant.tracks_promotion().then_some(state.on_promotion),
    };
    let notice = Notice::success(format!(
        "Product {} added successfully!",
        product.identifier
    ));
    state.products.push(product);
    state.reset_fields(today);

    Ok(Some(notice))
}

/// Row of the entered-products table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub identifier: String,
    pub description: String,
    pub expiry: String,
    pub quantity: u32,
    pub on_promotion: Option<bool>,
    pub days_remaining: i64,
}

/// What the user sees after an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub variant: FormVariant,
    pub search: String,
    pub identifier: String,
    pub description: String,
    pub quantity: u32,
    pub expiry: Option<String>,
    pub on_promotion: Option<bool>,
    pub notice: Option<Notice>,
    pub rows: Vec<ProductRow>,
}

impl View {
    pub fn render(state: &FormState, variant: FormVariant, now: NaiveDateTime) -> Self {
        let rows = report::sorted_by_expiry_desc(&state.products)
            .into_iter()
            .map(|p| ProductRow {
                identifier: p.identifier.clone(),
                description: p.description.clone(),
                expiry: p.expiry_date.format(DATE_FORMAT).to_string(),
                quantity: p.quantity,
                on_promotion: p.on_promotion,
                days_remaining: report::days_remaining(p.expiry_date, now),
            })
            .collect();

        Self {
            variant,
            search: state.search.clone(),
            identifier: state.identifier.clone(),
            description: state.description.clone(),
            quantity: state.quantity,
            expiry: state
                .expiry
                .map(|d| d.format(DATE_FORMAT).to_string()),
            on_promotion: variant.tracks_promotion().then_some(state.on_promotion),
            notice: state.notice.clone(),
            rows,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Product Expiry Registration ===")?;
        writeln!(f, "Search:      {}", self.search)?;
        writeln!(f, "Code:        {}", self.identifier)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Quantity:    {}", self.quantity)?;
        writeln!(f, "Expiry date: {}", self.expiry.as_deref().unwrap_or("-"))?;
        if let Some(on_promotion) = self.on_promotion {
            writeln!(f, "Promotion:   {}", if on_promotion { "Yes" } else { "No" })?;
        }

        if let Some(notice) = &self.notice {
            let tag = match notice.level {
                NoticeLevel::Info => "info",
                NoticeLevel::Success => "ok",
                NoticeLevel::Error => "error",
            };
            writeln!(f, "[{}] {}", tag, notice.text)?;
        }

        if !self.rows.is_empty() {
            writeln!(f)?;
            writeln!(f, "Entered products:")?;
            for row in &self.rows {
                write!(
                    f,
                    "  {} | {} | {} | qty {} | {} days",
                    row.identifier, row.description, row.expiry, row.quantity, row.days_remaining
                )?;
                if let Some(on_promotion) = row.on_promotion {
                    write!(f, " | promo {}", if on_promotion { "yes" } else { "no" })?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
