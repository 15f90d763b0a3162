use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub identifier: String,
    pub description: String,
}

/// A product the user has entered during the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnteredProduct {
    pub identifier: String,
    pub description: String,
    pub expiry_date: NaiveDate,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_promotion: Option<bool>,
}

/// Which flavour of the form is running.
///
/// `Strict` rejects duplicate identifiers and has no promotion field.
/// `Promotional` accepts duplicates, asks for the promotion flag and offers
/// a Clear Fields action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    #[default]
    Strict,
    Promotional,
}

impl FormVariant {
    pub fn rejects_duplicates(self) -> bool {
        matches!(self, FormVariant::Strict)
    }

    pub fn tracks_promotion(self) -> bool {
        matches!(self, FormVariant::Promotional)
    }
}

impl FromStr for FormVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "1" => Ok(FormVariant::Strict),
            "promotional" | "2" => Ok(FormVariant::Promotional),
            other => Err(format!(
                "unknown form variant '{}', expected 'strict' or 'promotional'",
                other
            )),
        }
    }
}

impl fmt::Display for FormVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormVariant::Strict => f.write_str("strict"),
            FormVariant::Promotional => f.write_str("promotional"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyBand {
    Urgent,
    Warning,
    Normal,
}

impl UrgencyBand {
    /// Days below this are urgent.
    pub const URGENT_BELOW: i64 = 15;
    /// First day of the warning band.
    pub const WARNING_FROM: i64 = 16;
    /// Last day of the warning band.
    pub const WARNING_UNTIL: i64 = 30;

    /// Classifies days-to-expiry.
    ///
    /// Exactly 15 days matches neither the urgent rule (`< 15`) nor the
    /// warning rule (`16..=30`) and lands in `Normal`. This gap is kept on
    /// purpose until the intended boundary is confirmed.
    pub fn classify(days_remaining: i64) -> Self {
        if days_remaining < Self::URGENT_BELOW {
            UrgencyBand::Urgent
        } else if (Self::WARNING_FROM..=Self::WARNING_UNTIL).contains(&days_remaining) {
            UrgencyBand::Warning
        } else {
            UrgencyBand::Normal
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            UrgencyBand::Urgent => "[URGENT]",
            UrgencyBand::Warning => "[WARNING]",
            UrgencyBand::Normal => "[OK]",
        }
    }
}

/// One product block of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBlock {
    pub identifier: String,
    pub description: String,
    pub expiry_date: NaiveDate,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_promotion: Option<bool>,
    pub days_remaining: i64,
    pub band: UrgencyBand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: NaiveDateTime,
    pub variant: FormVariant,
    pub blocks: Vec<ReportBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        assert_eq!(UrgencyBand::classify(5), UrgencyBand::Urgent);
        assert_eq!(UrgencyBand::classify(20), UrgencyBand::Warning);
        assert_eq!(UrgencyBand::classify(40), UrgencyBand::Normal);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(UrgencyBand::classify(-3), UrgencyBand::Urgent);
        assert_eq!(UrgencyBand::classify(14), UrgencyBand::Urgent);
        assert_eq!(UrgencyBand::classify(16), UrgencyBand::Warning);
        assert_eq!(UrgencyBand::classify(30), UrgencyBand::Warning);
        assert_eq!(UrgencyBand::classify(31), UrgencyBand::Normal);
    }

    #[test]
    fn test_day_fifteen_falls_through_to_normal() {
        assert_eq!(UrgencyBand::classify(15), UrgencyBand::Normal);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("strict".parse::<FormVariant>(), Ok(FormVariant::Strict));
        assert_eq!("Promotional".parse::<FormVariant>(), Ok(FormVariant::Promotional));
        assert_eq!("2".parse::<FormVariant>(), Ok(FormVariant::Promotional));
        assert!("other".parse::<FormVariant>().is_err());
    }
}
