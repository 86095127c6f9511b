//! Batch-audit entry point.
//!
//! Takes mint addresses as arguments, runs an independent audit per token,
//! and prints the reports as JSON for downstream renderers.

use anyhow::{bail, Result};
use reqwest::Client;
use rugscan::chain::dex::RaydiumPoolProvider;
use rugscan::chain::rpc::RpcChainReader;
use rugscan::{AuditConfig, AuditEngine};
use std::sync::Arc;
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let mints: Vec<String> = std::env::args().skip(1).collect();
    if mints.is_empty() {
        bail!("usage: rugscan <mint-address> [<mint-address> ...]");
    }

    let config = AuditConfig::from_env();
    info!(
        "Starting audit of {} token(s) via {}",
        mints.len(),
        config.rpc_url
    );

    let chain = Arc::new(RpcChainReader::new(&config));
    let pools = Arc::new(RaydiumPoolProvider::new(Client::new(), &config));
    let engine = Arc::new(AuditEngine::new(chain, pools, config));

    let results = engine.audit_many(&mints).await;

    let mut failures = 0usize;
    for (mint, result) in results {
        match result {
            Ok(report) => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Err(e) => {
                failures += 1;
                warn!("Audit of {} failed: {}", mint, e);
            }
        }
    }

    info!(
        "Completed: {} audited, {} failed",
        mints.len() - failures,
        failures
    );
    Ok(())
}
