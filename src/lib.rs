//! Make It 12 (workspace facade crate).
//!
//! Re-exports the engine, persistence and record service crates under one
//! `make_it_12::{core,types,store,records}` path, and hosts the pieces shared
//! by the binaries: app configuration and the text driver.

pub use make_it_12_core as core;
pub use make_it_12_records as records;
pub use make_it_12_store as store;
pub use make_it_12_types as types;

pub mod config;
pub mod driver;
