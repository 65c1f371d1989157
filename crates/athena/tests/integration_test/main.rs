//! Integration tests for dataload-athena.
//!
//! Polling is exercised against an in-memory `QueryService`; no AWS
//! credentials are needed.

mod ctas;
mod poll;
