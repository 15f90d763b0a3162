pub mod commands;
pub mod exporter;
