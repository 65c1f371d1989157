//! Ingestion notification for materialized query results.
//!
//! This crate provides:
//! - `IngestSink` trait for anything that can be told where results landed
//! - `HttpIngestNotifier`, posting a data-load request to the ingestion API
//! - `IngestConfig`, the env-sourced endpoint and dataset settings

pub mod config;
pub mod ingest;
pub mod payload;
pub mod traits;

pub use config::{IngestConfig, StatusPolicy};
pub use ingest::HttpIngestNotifier;
pub use payload::{DataConnection, DataloadRequest, Datasource, DatasetContext};
pub use traits::{IngestReceipt, IngestSink, NotifyError};
