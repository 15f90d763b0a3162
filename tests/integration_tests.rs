use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use expiry_tracker::core::ConfigProvider;
use expiry_tracker::domain::model::FormVariant;
use expiry_tracker::{
    load_catalog, Action, FileReportExporter, FormContext, FormEngine, FormError, FormState,
    LocalStorage, TomlConfig,
};
use tempfile::TempDir;

const CATALOG: &str = "\
codigo_barras,descricao,fornecedor
7891000100103,Leite Integral 1L,Acme
7891000053508,Chocolate em Po,Acme
7896004000015,Pao de Forma,Padaria
";

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

fn write_config(dir: &TempDir, variant: &str, formats: &str) -> Result<TomlConfig> {
    let base = dir.path().to_str().unwrap().replace('\\', "/");
    std::fs::write(dir.path().join("produtos.csv"), CATALOG)?;

    let content = format!(
        r#"
[catalog]
path = "{base}/produtos.csv"

[report]
output_path = "{base}/out"
lines_per_page = 30
formats = [{formats}]

[form]
variant = "{variant}"
"#
    );
    let config_path = dir.path().join("tracker.toml");
    std::fs::write(&config_path, content)?;
    Ok(TomlConfig::from_file(&config_path)?)
}

async fn engine_for(
    config: &TomlConfig,
) -> Result<FormEngine<FileReportExporter<LocalStorage, TomlConfig>>> {
    let catalog = load_catalog(
        &LocalStorage::new(String::new()),
        config.catalog_path(),
        &config.catalog_columns(),
    )
    .await?;
    assert_eq!(catalog.len(), 3);

    let ctx = FormContext::new(catalog, config.variant()).with_report_title(config.report_title());
    let exporter = FileReportExporter::new(
        LocalStorage::new(config.output_path().to_string()),
        config.clone(),
    );
    Ok(FormEngine::with_state(
        ctx,
        FormState::new(now().date()),
        exporter,
    ))
}

#[tokio::test]
async fn test_end_to_end_report_is_sorted_and_banded() -> Result<()> {
    let dir = TempDir::new()?;
    let config = write_config(&dir, "strict", "\"txt\", \"json\"")?;
    let mut engine = engine_for(&config).await?;
    let today = now().date();

    for (query, days) in [("leite", 5), ("Chocolate", 41), ("7896004", 21)] {
        let view = engine
            .dispatch_at(Action::Search(query.to_string()), now())
            .await?;
        assert!(view.notice.unwrap().text.starts_with("Product found"));
        engine
            .dispatch_at(Action::SetExpiry(Some(today + Duration::days(days))), now())
            .await?;
        engine.dispatch_at(Action::Add, now()).await?;
    }

    let view = engine.dispatch_at(Action::GenerateReport, now()).await?;
    assert!(view.notice.unwrap().text.contains("expiry_report.txt"));

    let text = std::fs::read_to_string(dir.path().join("out/expiry_report.txt"))?;
    assert!(text.contains("Report generated at: 01/05/2024 14:30"));
    assert_eq!(text.matches("Code: ").count(), 3);

    let chocolate = text.find("Code: 7891000053508").unwrap();
    let bread = text.find("Code: 7896004000015").unwrap();
    let milk = text.find("Code: 7891000100103").unwrap();
    assert!(chocolate < bread && bread < milk);

    assert!(text.contains("[OK] Days until expiry: 40 days"));
    assert!(text.contains("[WARNING] Days until expiry: 20 days"));
    assert!(text.contains("[URGENT] Days until expiry: 4 days"));
    assert!(text.contains("Expiry date: 06/05/2024"));

    let json = std::fs::read(dir.path().join("out/expiry_report.json"))?;
    let value: serde_json::Value = serde_json::from_slice(&json)?;
    assert_eq!(value["blocks"].as_array().unwrap().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_empty_report_writes_no_file() -> Result<()> {
    let dir = TempDir::new()?;
    let config = write_config(&dir, "strict", "\"txt\"")?;
    let mut engine = engine_for(&config).await?;

    let view = engine.dispatch_at(Action::GenerateReport, now()).await?;
    assert_eq!(
        view.notice.unwrap().text,
        FormError::EmptyReport.to_string()
    );
    assert!(!dir.path().join("out/expiry_report.txt").exists());
    Ok(())
}

#[tokio::test]
async fn test_strict_form_rejects_duplicates() -> Result<()> {
    let dir = TempDir::new()?;
    let config = write_config(&dir, "strict", "\"txt\"")?;
    assert_eq!(config.variant(), FormVariant::Strict);
    let mut engine = engine_for(&config).await?;

    engine
        .dispatch_at(Action::Search("leite".to_string()), now())
        .await?;
    engine.dispatch_at(Action::Add, now()).await?;
    engine
        .dispatch_at(Action::Search("7891000100103".to_string()), now())
        .await?;
    let view = engine.dispatch_at(Action::Add, now()).await?;

    assert_eq!(engine.state().products.len(), 1);
    assert!(view.notice.unwrap().text.contains("already been added"));
    Ok(())
}

#[tokio::test]
async fn test_promotional_form_reports_promotion() -> Result<()> {
    let dir = TempDir::new()?;
    let config = write_config(&dir, "promotional", "\"txt\"")?;
    let mut engine = engine_for(&config).await?;

    for promo in [true, false] {
        engine
            .dispatch_at(Action::Search("pao".to_string()), now())
            .await?;
        engine.dispatch_at(Action::SetPromotion(promo), now()).await?;
        engine.dispatch_at(Action::Add, now()).await?;
    }
    assert_eq!(engine.state().products.len(), 2);

    engine.dispatch_at(Action::GenerateReport, now()).await?;
    let text = std::fs::read_to_string(dir.path().join("out/expiry_report.txt"))?;
    assert!(text.contains("On promotion: Yes"));
    assert!(text.contains("On promotion: No"));
    Ok(())
}

#[tokio::test]
async fn test_missing_catalog_column_fails_load() -> Result<()> {
    let dir = TempDir::new()?;
    let config = write_config(&dir, "strict", "\"txt\"")?;
    let mut columns = config.catalog_columns();
    columns.description = "nome".to_string();

    let result = load_catalog(&LocalStorage::new(String::new()), config.catalog_path(), &columns).await;
    assert!(matches!(
        result,
        Err(expiry_tracker::TrackerError::CatalogError { .. })
    ));
    Ok(())
}
