//! Scoped ownership of the temporary CTAS table.

use dataload_athena::{drop_table_sql, wait_for_completion, AthenaError, PollPolicy, QueryService};
use tracing::{error, info};

/// A temporary table that must be dropped before the run ends.
///
/// Create it once the CTAS statement has been accepted and always await
/// [`TempTable::release`] afterwards, whatever the outcome of the run.
/// A guard dropped without being released logs the table it leaked.
#[derive(Debug)]
pub struct TempTable {
    name: String,
    released: bool,
}

impl TempTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            released: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Issue `DROP TABLE` once and wait for it to finish.
    pub async fn release<S>(mut self, service: &S, policy: &PollPolicy) -> Result<(), AthenaError>
    where
        S: QueryService + ?Sized,
    {
        self.released = true;

        let handle = service.submit(&drop_table_sql(&self.name)).await?;
        wait_for_completion(service, &handle, policy).await?;

        info!(table = %self.name, query_id = %handle, "temporary table dropped");
        Ok(())
    }
}

impl Drop for TempTable {
    fn drop(&mut self) {
        if !self.released {
            error!(
                table = %self.name,
                "temporary table was never released; drop it manually"
            );
        }
    }
}
