//! Tests for the CTAS statement builder as the orchestrator uses it.

use dataload_athena::ctas::{BUCKET_COLUMN, TEMP_TABLE_PREFIX};
use dataload_athena::*;

#[test]
fn ctas_names_the_generated_table() {
    let table = temp_table_name();
    let sql = build_ctas(&table, "SELECT id, name FROM users", &CtasOptions::default()).unwrap();

    assert!(table.starts_with(TEMP_TABLE_PREFIX));
    assert!(sql.starts_with(&format!("CREATE TABLE {table}\nWITH (")));
    assert!(sql.contains(") AS\n") || sql.contains(")\nAS\n"));
    assert!(sql.contains(&format!("SELECT *, RANDOM() AS {BUCKET_COLUMN} FROM (")));
    assert!(sql.contains("SELECT id, name FROM users"));
}

#[test]
fn ctas_options_come_from_config() {
    let config = AthenaConfig {
        region: "us-east-1".into(),
        access_key_id: None,
        secret_access_key: None,
        database: "default".into(),
        workgroup: "primary".into(),
        output_location: "s3://results/athenaresult/".into(),
        encryption_option: "SSE_S3".into(),
        kms_key: None,
        timeout_seconds: 60,
        poll_interval_ms: 200,
        poll_max_interval_ms: 2000,
        poll_backoff: 1.0,
        ctas_format: "PARQUET".into(),
        ctas_bucket_count: 16,
    };

    let sql = build_ctas("cts_x", "SELECT 1", &config.ctas_options()).unwrap();
    assert!(sql.contains("format = 'PARQUET'"));
    assert!(sql.contains("bucket_count = 16"));
}

#[test]
fn empty_query_is_rejected_before_submission() {
    let err = build_ctas("cts_x", "   ", &CtasOptions::default()).unwrap_err();
    assert!(matches!(err, AthenaError::InvalidQuery(_)));
}
