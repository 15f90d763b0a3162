use crate::core::catalog::CatalogColumns;
use crate::domain::model::{FormVariant, Report};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Location a relative path resolves to, for display.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_path(&self) -> &str;
    fn identifier_column(&self) -> &str;
    fn description_column(&self) -> &str;
    fn output_path(&self) -> &str;
    fn report_filename(&self) -> &str;
    fn report_title(&self) -> &str;
    fn lines_per_page(&self) -> usize;
    fn report_formats(&self) -> &[String];
    fn variant(&self) -> FormVariant;

    fn catalog_columns(&self) -> CatalogColumns {
        CatalogColumns {
            identifier: self.identifier_column().to_string(),
            description: self.description_column().to_string(),
        }
    }
}

#[async_trait]
pub trait ReportExporter: Send + Sync {
    /// Writes the report and returns where it was written.
    async fn export(&self, report: &Report) -> Result<String>;
}
