pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use app::exporter::FileReportExporter;
pub use config::TomlConfig;
pub use crate::core::{
    catalog::{load_catalog, Catalog},
    engine::FormEngine,
    session::{Action, FormContext, FormState, View},
};
pub use utils::error::{FormError, Result, TrackerError};
