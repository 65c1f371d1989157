//! CREATE TABLE AS SELECT wrapping for result materialization.
//!
//! The user's query is wrapped so every row gets a random bucketing column,
//! then materialized into a throwaway table whose output is spread over
//! `bucket_count` objects for parallel ingestion.

use rand::Rng;

use crate::client::AthenaError;

/// Every temporary table name starts with this.
pub const TEMP_TABLE_PREFIX: &str = "cts_";

/// Column injected into every row to drive bucketing.
pub const BUCKET_COLUMN: &str = "dr_random_athena_bucket";

const TABLE_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TABLE_ID_LEN: usize = 10;

/// Storage layout of the temporary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtasOptions {
    pub format: String,
    pub bucket_count: u32,
}

impl Default for CtasOptions {
    fn default() -> Self {
        Self {
            format: "JSON".to_string(),
            bucket_count: 100,
        }
    }
}

/// `cts_` followed by 10 random lowercase alphanumerics.
pub fn temp_table_name() -> String {
    let mut rng = rand::thread_rng();
    let id: String = (0..TABLE_ID_LEN)
        .map(|_| TABLE_ID_ALPHABET[rng.gen_range(0..TABLE_ID_ALPHABET.len())] as char)
        .collect();
    format!("{TEMP_TABLE_PREFIX}{id}")
}

/// Select every column of `sql` plus the random bucketing column.
///
/// Trailing whitespace and statement terminators are dropped since the query
/// ends up inside a subquery.
pub fn wrap_query(sql: &str) -> Result<String, AthenaError> {
    let inner = sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if inner.is_empty() {
        return Err(AthenaError::InvalidQuery("query is empty".into()));
    }
    Ok(format!(
        "SELECT *, RANDOM() AS {BUCKET_COLUMN} FROM (\n{inner}\n)"
    ))
}

/// Full CTAS statement materializing `sql` into `table`.
pub fn build_ctas(table: &str, sql: &str, options: &CtasOptions) -> Result<String, AthenaError> {
    let wrapped = wrap_query(sql)?;
    let format = options.format.replace('\'', "''");
    Ok(format!(
        "CREATE TABLE {table}\n\
         WITH (\n    \
             format = '{format}',\n    \
             bucket_count = {buckets},\n    \
             bucketed_by = ARRAY['{BUCKET_COLUMN}']\n\
         )\n\
         AS\n\
         {wrapped}",
        buckets = options.bucket_count,
    ))
}

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE {table}")
}
