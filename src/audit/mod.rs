//! The token risk-analysis engine: mint decoding, burn detection, scoring,
//! and audit orchestration.

pub mod burns;
pub mod engine;
pub mod mint;
pub mod pools;
pub mod scorer;
pub mod sinks;

pub use burns::BurnScanner;
pub use engine::AuditEngine;
pub use mint::{decode_mint_account, MINT_ACCOUNT_LEN};
pub use pools::PoolResolver;
pub use scorer::{RiskScorer, RiskSignals};
pub use sinks::SinkRegistry;
