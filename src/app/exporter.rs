use crate::core::report;
use crate::core::{ConfigProvider, Report, ReportExporter, Storage};
use crate::utils::error::{Result, TrackerError};

/// Writes reports through a [`Storage`] in every configured format. Each
/// format goes to a fixed file name, so a new report overwrites the last.
pub struct FileReportExporter<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> FileReportExporter<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn render(&self, report: &Report, format: &str) -> Result<String> {
        match format {
            "txt" => Ok(report::render_text(report, self.config.lines_per_page())),
            "json" => report::render_json(report),
            other => Err(TrackerError::InvalidConfigValueError {
                field: "report.formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported report format".to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> ReportExporter for FileReportExporter<S, C> {
    async fn export(&self, report: &Report) -> Result<String> {
        let mut primary = None;

        for format in self.config.report_formats() {
            let content = self.render(report, format)?;
            let file_name = format!("{}.{}", self.config.report_filename(), format);

            tracing::debug!("Writing {} report ({} bytes)", format, content.len());
            self.storage.write_file(&file_name, content.as_bytes()).await?;

            if primary.is_none() {
                primary = Some(self.storage.location(&file_name));
            }
        }

        primary.ok_or_else(|| TrackerError::MissingConfigError {
            field: "report.formats".to_string(),
        })
    }
}
