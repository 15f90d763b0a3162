use crate::config::toml_config::TomlConfig;
use crate::domain::model::FormVariant;
use crate::utils::error::Result;
use clap::Parser;

/// Command line flags. Anything given here overrides the TOML file.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "expiry-tracker")]
#[command(about = "Register product expiry dates and print an expiry report")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Catalog file exported from the product spreadsheet (.csv or .tsv)
    #[arg(long)]
    pub catalog: Option<String>,

    #[arg(long)]
    pub identifier_column: Option<String>,

    #[arg(long)]
    pub description_column: Option<String>,

    /// Directory the report is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Report formats to write (txt, json)
    #[arg(long, value_delimiter = ',')]
    pub formats: Option<Vec<String>>,

    /// Form variant: strict or promotional
    #[arg(long)]
    pub variant: Option<FormVariant>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the config file when one is given (defaults otherwise) and
    /// applies the command line overrides on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Names of the settings these flags override, for logging once the
    /// subscriber is installed.
    pub fn overridden_fields(&self) -> Vec<&'static str> {
        [
            (self.catalog.is_some(), "catalog.path"),
            (self.identifier_column.is_some(), "catalog.identifier_column"),
            (self.description_column.is_some(), "catalog.description_column"),
            (self.output_path.is_some(), "report.output_path"),
            (self.formats.is_some(), "report.formats"),
            (self.variant.is_some(), "form.variant"),
        ]
        .into_iter()
        .filter_map(|(set, field)| set.then_some(field))
        .collect()
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(catalog) = &self.catalog {
            config.catalog.path = catalog.clone();
        }
        if let Some(column) = &self.identifier_column {
            config.catalog.identifier_column = column.clone();
        }
        if let Some(column) = &self.description_column {
            config.catalog.description_column = column.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.report.output_path = output_path.clone();
        }
        if let Some(formats) = &self.formats {
            config.report.formats = formats.clone();
        }
        if let Some(variant) = self.variant {
            config.form.variant = variant;
        }
    }
}
