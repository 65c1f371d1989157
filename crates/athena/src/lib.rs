pub mod client;
pub mod config;
pub mod ctas;
pub mod poll;
pub mod service;

pub use client::{AthenaClient, AthenaError};
pub use config::AthenaConfig;
pub use ctas::{build_ctas, drop_table_sql, temp_table_name, wrap_query, CtasOptions};
pub use poll::{wait_for_completion, PollPolicy};
pub use service::{ExecutionHandle, ExecutionState, ExecutionStatus, QueryService};
