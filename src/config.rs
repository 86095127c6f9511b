//! Engine configuration: collaborator endpoints, scan bounds, and the
//! scoring policy constants.
//!
//! The weights and thresholds are policy, not physical law; operators retune
//! them here without touching the decoder or the scanner.

use serde::{Deserialize, Serialize};
use std::env;

/// Top-level configuration for the audit engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Solana RPC endpoint
    pub rpc_url: String,
    /// Pool-metadata API base URL
    pub dex_api_url: String,
    /// Transaction-history lookback per LP mint
    pub history_depth: usize,
    /// Maximum concurrent collaborator reads
    pub fan_out: usize,
    /// Holders counted for the concentration term
    pub top_holder_count: usize,
    /// Retry attempts for collaborator calls
    pub rpc_retry_attempts: usize,
    /// RPC requests per second
    pub rpc_rate_limit_per_sec: u32,
    /// RPC request timeout in seconds
    pub rpc_timeout_secs: u64,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
    /// Pool-list cache TTL in seconds
    pub pool_cache_ttl_secs: u64,
    /// Additional sink addresses beyond the built-in registry
    pub extra_sinks: Vec<String>,
    /// Scoring weights
    pub weights: RiskWeights,
    /// Category thresholds
    pub thresholds: CategoryThresholds,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            dex_api_url: "https://api.raydium.io".to_string(),
            history_depth: 100,
            fan_out: 4,
            top_holder_count: 5,
            rpc_retry_attempts: 3,
            rpc_rate_limit_per_sec: 10,
            rpc_timeout_secs: 30,
            http_timeout_secs: 15,
            pool_cache_ttl_secs: 300,
            extra_sinks: Vec::new(),
            weights: RiskWeights::default(),
            thresholds: CategoryThresholds::default(),
        }
    }
}

impl AuditConfig {
    /// Defaults overridden by `RUGSCAN_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("RUGSCAN_RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(url) = env::var("RUGSCAN_DEX_API_URL") {
            config.dex_api_url = url;
        }
        if let Ok(depth) = env::var("RUGSCAN_HISTORY_DEPTH") {
            if let Ok(depth) = depth.parse() {
                config.history_depth = depth;
            }
        }
        if let Ok(fan_out) = env::var("RUGSCAN_FAN_OUT") {
            if let Ok(fan_out) = fan_out.parse() {
                config.fan_out = fan_out;
            }
        }
        config
    }
}

/// One band of the LP-destruction term: burn ratios at or above `min_ratio`
/// percent contribute `points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnRatioBand {
    pub min_ratio_pct: f64,
    pub points: u8,
}

/// Additive scoring weights. Defaults are the reference scheme; every term
/// is independently tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Added when the mint authority is still active
    pub mint_authority_active: u8,
    /// Added when the freeze authority is still active
    pub freeze_authority_active: u8,
    /// Bands checked highest-first; the first matching band's points apply
    pub burn_ratio_bands: Vec<BurnRatioBand>,
    /// Applied when no band matches (little or nothing burned)
    pub burn_ratio_fallback: u8,
    /// Added when top-N holders control more than `concentration_major_pct`
    pub concentration_major: u8,
    /// Added when top-N holders control more than `concentration_minor_pct`
    pub concentration_minor: u8,
    /// Threshold for the major concentration term, percent
    pub concentration_major_pct: f64,
    /// Threshold for the minor concentration term, percent
    pub concentration_minor_pct: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            mint_authority_active: 30,
            freeze_authority_active: 20,
            burn_ratio_bands: vec![
                BurnRatioBand { min_ratio_pct: 90.0, points: 0 },
                BurnRatioBand { min_ratio_pct: 50.0, points: 5 },
                BurnRatioBand { min_ratio_pct: 25.0, points: 10 },
                BurnRatioBand { min_ratio_pct: 10.0, points: 15 },
            ],
            burn_ratio_fallback: 25,
            concentration_major: 20,
            concentration_minor: 10,
            concentration_major_pct: 50.0,
            concentration_minor_pct: 30.0,
        }
    }
}

/// Score boundaries between categories. A score below `medium` is LOW,
/// below `high` MEDIUM, below `critical` HIGH, and CRITICAL otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryThresholds {
    pub medium: u8,
    pub high: u8,
    pub critical: u8,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            medium: 25,
            high: 50,
            critical: 76,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_reference_scheme() {
        let weights = RiskWeights::default();
        assert_eq!(weights.mint_authority_active, 30);
        assert_eq!(weights.freeze_authority_active, 20);
        assert_eq!(weights.burn_ratio_fallback, 25);
        assert_eq!(weights.burn_ratio_bands.len(), 4);
        assert_eq!(weights.burn_ratio_bands[0].min_ratio_pct, 90.0);
        assert_eq!(weights.burn_ratio_bands[0].points, 0);
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = CategoryThresholds::default();
        assert_eq!(thresholds.medium, 25);
        assert_eq!(thresholds.high, 50);
        assert_eq!(thresholds.critical, 76);
    }

    #[test]
    fn test_default_config_bounds() {
        let config = AuditConfig::default();
        assert_eq!(config.history_depth, 100);
        assert_eq!(config.top_holder_count, 5);
        assert!(config.fan_out > 0);
    }
}
