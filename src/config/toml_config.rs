use crate::core::catalog::CatalogColumns;
use crate::core::report::{DEFAULT_LINES_PER_PAGE, DEFAULT_TITLE};
use crate::core::ConfigProvider;
use crate::domain::model::FormVariant;
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const REPORT_FORMATS: [&str; 2] = ["txt", "json"];
pub const CATALOG_EXTENSIONS: [&str; 2] = ["csv", "tsv"];
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
/// Report header (4 lines) plus the largest product block (6 lines and a
/// blank) with room to spare, so the first page always holds a product.
pub const MIN_LINES_PER_PAGE: usize = 12;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub form: FormConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    #[serde(default = "default_identifier_column")]
    pub identifier_column: String,
    #[serde(default = "default_description_column")]
    pub description_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_report_filename")]
    pub filename: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub variant: FormVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
}

fn default_catalog_path() -> String {
    "products.csv".to_string()
}

fn default_identifier_column() -> String {
    CatalogColumns::default().identifier
}

fn default_description_column() -> String {
    CatalogColumns::default().description
}

fn default_output_path() -> String {
    ".".to_string()
}

fn default_report_filename() -> String {
    "expiry_report".to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_lines_per_page() -> usize {
    DEFAULT_LINES_PER_PAGE
}

fn default_formats() -> Vec<String> {
    vec!["txt".to_string()]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            identifier_column: default_identifier_column(),
            description_column: default_description_column(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            filename: default_report_filename(),
            title: default_title(),
            lines_per_page: default_lines_per_page(),
            formats: default_formats(),
        }
    }
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("catalog.path", &self.catalog.path)?;
        validation::validate_file_extension(
            "catalog.path",
            &self.catalog.path,
            &CATALOG_EXTENSIONS,
        )?;
        validation::validate_non_empty_string(
            "catalog.identifier_column",
            &self.catalog.identifier_column,
        )?;
        validation::validate_non_empty_string(
            "catalog.description_column",
            &self.catalog.description_column,
        )?;

        validation::validate_path("report.output_path", &self.report.output_path)?;
        validation::validate_non_empty_string("report.filename", &self.report.filename)?;
        validation::validate_positive_number(
            "report.lines_per_page",
            self.report.lines_per_page,
            MIN_LINES_PER_PAGE,
        )?;
        if self.report.formats.is_empty() {
            return Err(TrackerError::MissingConfigError {
                field: "report.formats".to_string(),
            });
        }
        validation::validate_one_of("report.formats", &self.report.formats, &REPORT_FORMATS)?;

        if let Some(level) = self.log_level() {
            validation::validate_one_of(
                "monitoring.log_level",
                &[level.to_ascii_lowercase()],
                &LOG_LEVELS,
            )?;
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn catalog_path(&self) -> &str {
        &self.catalog.path
    }

    fn identifier_column(&self) -> &str {
        &self.catalog.identifier_column
    }

    fn description_column(&self) -> &str {
        &self.catalog.description_column
    }

    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn report_filename(&self) -> &str {
        &self.report.filename
    }

    fn report_title(&self) -> &str {
        &self.report.title
    }

    fn lines_per_page(&self) -> usize {
        self.report.lines_per_page
    }

    fn report_formats(&self) -> &[String] {
        &self.report.formats
    }

    fn variant(&self) -> FormVariant {
        self.form.variant
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
