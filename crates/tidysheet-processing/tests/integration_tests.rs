//! Integration tests for the conversion and cleaning pipeline.
//!
//! These tests drive uploads end to end through `Workspace` and
//! `FileSession` using the CSV fixtures.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tidysheet_processing::{
    ColumnKind, Decoder, FileFormat, FileSession, PipelineConfig, PipelineError, SessionStage,
    TabularFile, Workspace,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> TabularFile {
    let bytes = std::fs::read(fixtures_path().join(filename)).expect("Failed to read fixture");
    TabularFile::new(filename, bytes)
}

fn open_fixture(filename: &str) -> FileSession {
    FileSession::open(load_fixture(filename), &PipelineConfig::default())
        .expect("Failed to decode fixture")
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_remove_duplicates_then_export_csv() -> anyhow::Result<()> {
    init_tracing();
    let mut session = open_fixture("people.csv");

    let report = session.remove_duplicates()?;
    assert_eq!(report.rows_before, 3);
    assert_eq!(report.rows_after, 2);
    assert_eq!(report.rows_removed(), 1);

    let download = session.export(FileFormat::Csv)?;
    assert_eq!(download.file_name, "people.csv");
    assert_eq!(download.mime_type, "text/csv");
    assert_eq!(
        String::from_utf8(download.bytes)?,
        "name,age\nAlice,30\nBob,\n"
    );
    Ok(())
}

#[test]
fn test_fill_missing_after_dedup() -> anyhow::Result<()> {
    init_tracing();
    let mut session = open_fixture("people.csv");

    session.remove_duplicates()?;
    let report = session.fill_missing()?;
    assert_eq!(report.cells_filled, 1);
    assert_eq!(report.columns_filled, vec!["age".to_string()]);

    let ages = session.chart_series("age")?;
    assert_eq!(ages.values, vec![Some(30.0), Some(30.0)]);
    assert!(!session.table().has_missing());
    Ok(())
}

#[test]
fn test_fill_uses_mean_of_present_values() -> anyhow::Result<()> {
    init_tracing();
    let mut session = open_fixture("scores.csv");

    session.remove_duplicates()?;
    session.fill_missing()?;

    let scores = session.chart_series("score")?;
    assert_eq!(
        scores.values,
        vec![Some(88.5), Some(84.0), Some(72.0), Some(91.5)]
    );
    assert_eq!(session.stage(), SessionStage::Cleaned);
    Ok(())
}

#[test]
fn test_cleaning_leaves_text_columns_alone() -> anyhow::Result<()> {
    let mut session = FileSession::open(
        TabularFile::new("notes.csv", "label,count\n,1\nb,\n"),
        &PipelineConfig::default(),
    )?;

    let report = session.fill_missing()?;
    assert_eq!(report.columns_filled, vec!["count".to_string()]);
    assert_eq!(session.table().missing_count(), 1);
    Ok(())
}

#[test]
fn test_na_tokens_decode_as_missing() -> anyhow::Result<()> {
    init_tracing();
    let session = open_fixture("readings.csv");
    let table = session.table();

    assert_eq!(
        table.kinds(),
        &[ColumnKind::Text, ColumnKind::Numeric, ColumnKind::Text]
    );
    assert_eq!(table.numeric_columns(), vec!["reading".to_string()]);
    assert_eq!(table.missing_count(), 5);

    let summary = session.summary()?;
    assert_eq!(summary.preview[1], vec![json!("b"), Value::Null, Value::Null]);
    Ok(())
}

#[test]
fn test_fill_missing_with_na_tokens() -> anyhow::Result<()> {
    init_tracing();
    let mut session = open_fixture("readings.csv");

    let report = session.fill_missing()?;
    assert_eq!(report.cells_filled, 3);
    assert_eq!(report.columns_filled, vec!["reading".to_string()]);

    let readings = session.chart_series("reading")?;
    assert_eq!(
        readings.values,
        vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0), Some(2.0)]
    );
    // Only the text column keeps its missing cells.
    assert_eq!(session.table().missing_count(), 2);

    let download = session.export(FileFormat::Spreadsheet)?;
    let decoded = Decoder::decode(
        &download.file_name,
        &download.bytes,
        FileFormat::Spreadsheet,
        &PipelineConfig::default(),
    )?;
    assert_eq!(decoded.column("reading")?.null_count(), 0);
    Ok(())
}

#[test]
fn test_nan_cells_are_filled_with_mean() -> anyhow::Result<()> {
    let none: [&str; 0] = [];
    let config = PipelineConfig::builder().na_values(none).build()?;
    let mut session = FileSession::open(
        TabularFile::new("x.csv", "x\n1.0\nNaN\n\n3.0\n"),
        &config,
    )?;
    assert_eq!(session.table().missing_count(), 2);

    let report = session.fill_missing()?;
    assert_eq!(report.cells_filled, 2);

    let values = session.chart_series("x")?.values;
    assert_eq!(values, vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]);
    assert!(!session.table().has_missing());
    Ok(())
}

// ============================================================================
// Projection & Charts
// ============================================================================

#[test]
fn test_select_columns_reorders_export() -> anyhow::Result<()> {
    init_tracing();
    let mut session = open_fixture("scores.csv");

    session.select_columns(&["score", "id"])?;
    assert_eq!(session.stage(), SessionStage::Projected);

    let download = session.export(FileFormat::Csv)?;
    let text = String::from_utf8(download.bytes)?;
    assert_eq!(text.lines().next(), Some("score,id"));
    assert_eq!(text.lines().count(), 6);
    Ok(())
}

#[test]
fn test_select_unknown_column() {
    let mut session = open_fixture("scores.csv");

    let err = session.select_columns(&["id", "grade"]).unwrap_err();
    assert!(matches!(&err, PipelineError::ColumnNotFound(name) if name == "grade"));
    assert_eq!(session.table().column_count(), 4);
}

#[test]
fn test_chart_rejects_text_column() {
    let session = open_fixture("scores.csv");

    let err = session.chart_series("id").unwrap_err();
    assert_eq!(err.error_code(), "NOT_NUMERIC");
    assert!(matches!(
        err,
        PipelineError::NotNumeric {
            kind: ColumnKind::Text,
            ..
        }
    ));
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn test_csv_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let mut session = open_fixture("scores.csv");
    let original = session.table().clone();

    let download = session.export(FileFormat::Csv)?;
    let decoded = Decoder::decode(
        &download.file_name,
        &download.bytes,
        FileFormat::Csv,
        &PipelineConfig::default(),
    )?;

    assert_eq!(decoded, original);
    Ok(())
}

#[test]
fn test_spreadsheet_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let mut session = open_fixture("scores.csv");
    let original = session.table().clone();

    let download = session.export(FileFormat::Spreadsheet)?;
    assert_eq!(download.file_name, "scores.xlsx");
    assert_eq!(
        download.mime_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let decoded = Decoder::decode(
        &download.file_name,
        &download.bytes,
        FileFormat::Spreadsheet,
        &PipelineConfig::default(),
    )?;

    assert_eq!(decoded.column_names(), original.column_names());
    assert_eq!(decoded.kinds(), original.kinds());
    assert_eq!(decoded, original);
    Ok(())
}

#[test]
fn test_spreadsheet_upload_converts_to_csv() -> anyhow::Result<()> {
    init_tracing();
    let mut source = open_fixture("people.csv");
    let workbook = source.export(FileFormat::Spreadsheet)?;

    let mut session = FileSession::open(
        TabularFile::new("report.xlsx", workbook.into_bytes()),
        &PipelineConfig::default(),
    )?;
    assert_eq!(session.format(), FileFormat::Spreadsheet);
    assert_eq!(session.table().row_count(), 3);

    let download = session.export(FileFormat::Csv)?;
    assert_eq!(download.file_name, "report.csv");
    assert_eq!(download.mime_type, "text/csv");
    Ok(())
}

#[test]
fn test_custom_separator() -> anyhow::Result<()> {
    let config = PipelineConfig::builder().csv_separator(b';').build()?;
    let session = FileSession::open(load_fixture("cities_semicolon.csv"), &config)?;

    assert_eq!(
        session.table().column_names(),
        vec!["city", "population", "area"]
    );
    assert_eq!(
        session.table().numeric_columns(),
        vec!["population".to_string(), "area".to_string()]
    );
    Ok(())
}

// ============================================================================
// Uploads
// ============================================================================

#[test]
fn test_batch_upload_isolates_bad_files() {
    init_tracing();
    let mut workspace = Workspace::new(PipelineConfig::default());

    let outcomes = workspace.ingest(vec![
        load_fixture("people.csv"),
        TabularFile::new("readme.txt", "just some notes"),
        TabularFile::new("empty.csv", ""),
        load_fixture("scores.csv"),
    ]);

    let codes: Vec<Option<&str>> = outcomes
        .iter()
        .map(|o| o.result.as_ref().err().map(PipelineError::error_code))
        .collect();
    assert_eq!(
        codes,
        vec![None, Some("UNSUPPORTED_FORMAT"), Some("DECODE_ERROR"), None]
    );
    assert_eq!(workspace.file_names(), vec!["people.csv", "scores.csv"]);
}

#[test]
fn test_upload_summary_json() -> anyhow::Result<()> {
    let mut workspace = Workspace::default();
    let outcomes = workspace.ingest(vec![load_fixture("scores.csv")]);

    let summary = outcomes[0]
        .result
        .as_ref()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let json: Value = serde_json::from_str(&summary.to_json()?)?;

    assert_eq!(json["name"], json!("scores.csv"));
    assert_eq!(json["format"], json!("csv"));
    assert_eq!(json["row_count"], json!(5));
    assert_eq!(json["columns"], json!(["id", "name", "score", "passed"]));
    assert_eq!(json["numeric_columns"], json!(["score"]));
    assert_eq!(json["has_missing"], json!(true));
    assert_eq!(json["preview"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["preview"][1], json!(["s2", "Ben", null, false]));
    Ok(())
}

#[test]
fn test_upload_size_limit() {
    let config = PipelineConfig::builder().max_upload_bytes(16).build().unwrap();
    let mut workspace = Workspace::new(config);

    let outcomes = workspace.ingest(vec![load_fixture("scores.csv")]);
    let err = outcomes[0].result.as_ref().unwrap_err();

    assert!(matches!(err, PipelineError::FileTooLarge { limit: 16, .. }));
    assert!(workspace.is_empty());
}

#[test]
fn test_error_serializes_for_frontend() {
    let mut workspace = Workspace::default();
    let outcomes = workspace.ingest(vec![TabularFile::new("data.json", "{}")]);

    let json = serde_json::to_value(&outcomes[0]).unwrap();
    assert_eq!(json["file_name"], json!("data.json"));
    assert_eq!(json["result"]["Err"]["code"], json!("UNSUPPORTED_FORMAT"));
}
