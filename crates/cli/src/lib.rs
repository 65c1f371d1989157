pub mod config;
pub mod orchestrator;
pub mod temp_table;

pub use config::{configured_query, resolve_query, RunConfig};
pub use orchestrator::{Orchestrator, RunError, RunReport};
pub use temp_table::TempTable;
