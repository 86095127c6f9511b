//! rugscan - rug-pull risk analysis for Solana fungible tokens.
//!
//! Combines on-chain mint state, bounded transaction history, and external
//! liquidity-pool metadata into a single weighted risk score per token.

pub mod audit;
pub mod chain;
pub mod config;
pub mod errors;
pub mod types;

// Re-export the main entry points for convenience
pub use audit::AuditEngine;
pub use config::AuditConfig;
pub use errors::AuditError;
pub use types::{RiskCategory, RiskReport};
