//! Player record service host.
//!
//! Serves an in-memory record store over line-delimited JSON TCP. Configure
//! with `MAKE12_RECORDS_HOST` / `MAKE12_RECORDS_PORT`.

use std::sync::Arc;

use anyhow::Result;

use make_it_12::records::{run_server, MemoryRecords, RecordServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RecordServerConfig::from_env();
    let records = Arc::new(MemoryRecords::new());

    tokio::select! {
        res = run_server(config, records, None) => res,
        _ = tokio::signal::ctrl_c() => {
            log::info!("shutting down");
            Ok(())
        }
    }
}
