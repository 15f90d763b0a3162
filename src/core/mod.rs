pub mod catalog;
pub mod engine;
pub mod report;
pub mod session;

pub use crate::domain::model::{CatalogEntry, EnteredProduct, FormVariant, Report, UrgencyBand};
pub use crate::domain::ports::{ConfigProvider, ReportExporter, Storage};
pub use crate::utils::error::Result;
