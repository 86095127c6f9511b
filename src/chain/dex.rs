//! Raydium-style pool-metadata provider.
//!
//! The pairs endpoint is large and changes slowly, so the full list is held
//! in a TTL cache. Upstream data quality is uneven: `lpSupply` arrives as a
//! number, a decimal string, or a 0x-prefixed hex string depending on the
//! pool age, and `lpMint` may be missing entirely.

use crate::chain::PoolProvider;
use crate::config::AuditConfig;
use crate::errors::AuditError;
use crate::types::LpPool;
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, instrument};

/// One pair record as the Raydium v2 API reports it. Field sets drift across
/// pool generations, so everything optional stays optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairRecord {
    #[serde(alias = "ammId")]
    amm_id: String,
    base_mint: String,
    quote_mint: String,
    #[serde(default)]
    lp_mint: Option<String>,
    #[serde(default)]
    lp_supply: Option<Value>,
    #[serde(default, alias = "tokenAmountCoin")]
    base_reserve: Option<f64>,
    #[serde(default, alias = "tokenAmountPc")]
    quote_reserve: Option<f64>,
    #[serde(default)]
    liquidity: Option<f64>,
    #[serde(default, alias = "volume24h")]
    volume_24h: Option<f64>,
    #[serde(default)]
    name: Option<String>,
}

impl PairRecord {
    fn into_pool(self) -> LpPool {
        let lp_supply = self.lp_supply.as_ref().and_then(parse_supply);
        LpPool {
            pool_address: self.amm_id,
            base_mint: self.base_mint,
            quote_mint: self.quote_mint,
            lp_mint: self.lp_mint.filter(|m| !m.is_empty()),
            lp_supply,
            base_reserve: self.base_reserve.unwrap_or(0.0),
            quote_reserve: self.quote_reserve.unwrap_or(0.0),
            tvl_usd: self.liquidity.unwrap_or(0.0),
            volume24h_usd: self.volume_24h.unwrap_or(0.0),
            name: self.name.unwrap_or_default(),
        }
    }
}

/// Accept `lpSupply` as number, decimal string, or 0x-hex string.
/// Zero is treated as absent: it is a known upstream placeholder, and the
/// scanner must fall back to estimation rather than divide by it.
fn parse_supply(value: &Value) -> Option<f64> {
    let supply = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                u128::from_str_radix(hex, 16).ok().map(|v| v as f64)
            } else {
                s.parse().ok()
            }
        }
        _ => None,
    };
    supply.filter(|v| *v > 0.0)
}

/// HTTP pool-metadata provider with a TTL-cached pairs list.
pub struct RaydiumPoolProvider {
    http_client: Client,
    base_url: String,
    timeout: Duration,
    retry_attempts: usize,
    pairs_cache: Cache<&'static str, Arc<Vec<LpPool>>>,
}

impl RaydiumPoolProvider {
    /// Create a provider against the configured API base URL.
    pub fn new(http_client: Client, config: &AuditConfig) -> Self {
        let pairs_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(config.pool_cache_ttl_secs))
            .build();
        Self {
            http_client,
            base_url: config.dex_api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.http_timeout_secs),
            retry_attempts: config.rpc_retry_attempts,
            pairs_cache,
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, AuditError> {
        let response = self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AuditError::unavailable(format!("GET {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(AuditError::unavailable(format!(
                "GET {url}: status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuditError::unavailable(format!("parse {url}: {e}")))
    }

    async fn fetch_pairs(&self) -> Result<Arc<Vec<LpPool>>, AuditError> {
        let url = format!("{}/v2/main/pairs", self.base_url);
        let retry_strategy = ExponentialBackoff::from_millis(250)
            .max_delay(Duration::from_secs(3))
            .take(self.retry_attempts);

        let body = Retry::spawn(retry_strategy, || self.fetch_json(&url)).await?;
        let records: Vec<PairRecord> = serde_json::from_value(body)
            .map_err(|e| AuditError::unavailable(format!("pairs schema: {e}")))?;

        let pools: Vec<LpPool> = records.into_iter().map(PairRecord::into_pool).collect();
        debug!("Fetched {} pools from {}", pools.len(), url);
        Ok(Arc::new(pools))
    }
}

#[async_trait]
impl PoolProvider for RaydiumPoolProvider {
    #[instrument(skip(self))]
    async fn list_pools(&self) -> Result<Vec<LpPool>, AuditError> {
        if let Some(cached) = self.pairs_cache.get(&"pairs").await {
            return Ok(cached.as_ref().clone());
        }
        let pools = self.fetch_pairs().await?;
        self.pairs_cache.insert("pairs", pools.clone()).await;
        Ok(pools.as_ref().clone())
    }

    #[instrument(skip(self), fields(pool = %pool_address))]
    async fn pool_detail(&self, pool_address: &str) -> Result<LpPool, AuditError> {
        // The pairs list already carries everything the engine consumes;
        // detail is a lookup into it.
        let pools = self.list_pools().await?;
        pools
            .into_iter()
            .find(|pool| pool.pool_address == pool_address)
            .ok_or_else(|| AuditError::NotFound(pool_address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_supply_number() {
        assert_eq!(parse_supply(&json!(1_000_000.0)), Some(1_000_000.0));
    }

    #[test]
    fn test_parse_supply_decimal_string() {
        assert_eq!(parse_supply(&json!("2500.5")), Some(2500.5));
    }

    #[test]
    fn test_parse_supply_hex_string() {
        assert_eq!(parse_supply(&json!("0x3e8")), Some(1000.0));
        assert_eq!(parse_supply(&json!("0X10")), Some(16.0));
    }

    #[test]
    fn test_parse_supply_zero_is_absent() {
        // Zero lpSupply is an upstream placeholder, not a real value
        assert_eq!(parse_supply(&json!(0)), None);
        assert_eq!(parse_supply(&json!("0x0")), None);
        assert_eq!(parse_supply(&json!("0")), None);
    }

    #[test]
    fn test_parse_supply_garbage() {
        assert_eq!(parse_supply(&json!("not-a-number")), None);
        assert_eq!(parse_supply(&json!(null)), None);
    }

    #[test]
    fn test_pair_record_mapping() {
        let record: PairRecord = serde_json::from_value(json!({
            "ammId": "Pool111",
            "baseMint": "TokenA",
            "quoteMint": "TokenB",
            "lpMint": "LpMint111",
            "lpSupply": "0x3e8",
            "tokenAmountCoin": 10.0,
            "tokenAmountPc": 20.0,
            "liquidity": 5000.0,
            "volume24h": 1234.0,
            "name": "TOKENA/TOKENB"
        }))
        .unwrap();

        let pool = record.into_pool();
        assert_eq!(pool.pool_address, "Pool111");
        assert_eq!(pool.lp_mint.as_deref(), Some("LpMint111"));
        assert_eq!(pool.lp_supply, Some(1000.0));
        assert_eq!(pool.base_reserve, 10.0);
        assert_eq!(pool.tvl_usd, 5000.0);
    }

    #[test]
    fn test_pair_record_sparse_fields() {
        let record: PairRecord = serde_json::from_value(json!({
            "ammId": "Pool222",
            "baseMint": "TokenA",
            "quoteMint": "TokenB"
        }))
        .unwrap();

        let pool = record.into_pool();
        assert_eq!(pool.lp_mint, None);
        assert_eq!(pool.lp_supply, None);
        assert_eq!(pool.base_reserve, 0.0);
        assert!(pool.name.is_empty());
    }

    #[test]
    fn test_empty_lp_mint_treated_as_unresolved() {
        let record: PairRecord = serde_json::from_value(json!({
            "ammId": "Pool333",
            "baseMint": "TokenA",
            "quoteMint": "TokenB",
            "lpMint": ""
        }))
        .unwrap();
        assert_eq!(record.into_pool().lp_mint, None);
    }
}
