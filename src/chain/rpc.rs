//! Solana RPC implementation of [`ChainReader`].
//!
//! All calls go through a shared rate limiter and exponential-backoff
//! retries. Transaction content is requested in the JSON-parsed encoding and
//! converted into the neutral [`ParsedTx`] model so the rest of the engine
//! never touches RPC wire types.

use crate::chain::{ChainReader, HolderBalance, ParsedInstruction, ParsedTx, TokenBalance};
use crate::config::AuditConfig;
use crate::errors::AuditError;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::Value;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey as SolanaPubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::UiTransactionEncoding;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, instrument, warn};

/// SPL token accounts are a fixed 165-byte layout; the owner sits at [32:64).
const TOKEN_ACCOUNT_LEN: usize = 165;

/// RPC-backed chain reader with rate limiting and retries.
pub struct RpcChainReader {
    client: Arc<RpcClient>,
    limiter: DefaultDirectRateLimiter,
    retry_attempts: usize,
}

impl RpcChainReader {
    /// Create a reader against the configured RPC endpoint.
    pub fn new(config: &AuditConfig) -> Self {
        let client = Arc::new(RpcClient::new_with_timeout(
            config.rpc_url.clone(),
            Duration::from_secs(config.rpc_timeout_secs),
        ));
        let quota = Quota::per_second(
            NonZeroU32::new(config.rpc_rate_limit_per_sec)
                .unwrap_or(NonZeroU32::new(10).unwrap()),
        );
        Self {
            client,
            limiter: RateLimiter::direct(quota),
            retry_attempts: config.rpc_retry_attempts,
        }
    }

    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.retry_attempts)
    }

    fn parse_address(address: &str) -> Result<SolanaPubkey, AuditError> {
        SolanaPubkey::from_str(address).map_err(|_| AuditError::NotFound(address.to_string()))
    }

    async fn account_data_once(
        &self,
        address: &SolanaPubkey,
    ) -> Result<Option<Vec<u8>>, AuditError> {
        self.limiter.until_ready().await;
        let response = self
            .client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(|e| AuditError::unavailable(format!("get_account {address}: {e}")))?;
        Ok(response.value.map(|account| account.data))
    }

    async fn largest_holders_once(
        &self,
        mint: &SolanaPubkey,
    ) -> Result<Vec<HolderBalance>, AuditError> {
        self.limiter.until_ready().await;
        let accounts = self
            .client
            .get_token_largest_accounts(mint)
            .await
            .map_err(|e| AuditError::unavailable(format!("largest_accounts {mint}: {e}")))?;

        let mut holders: Vec<HolderBalance> = accounts
            .into_iter()
            .map(|entry| HolderBalance {
                address: entry.address,
                owner: None,
                ui_amount: entry.amount.ui_amount.unwrap_or(0.0),
            })
            .collect();

        // Resolve token-account owners in one batched read; a failure here
        // only loses the owner field, not the balances.
        let addresses: Vec<SolanaPubkey> = holders
            .iter()
            .filter_map(|h| SolanaPubkey::from_str(&h.address).ok())
            .collect();
        if addresses.len() == holders.len() {
            self.limiter.until_ready().await;
            match self.client.get_multiple_accounts(&addresses).await {
                Ok(accounts) => {
                    for (holder, account) in holders.iter_mut().zip(accounts) {
                        if let Some(account) = account {
                            holder.owner = token_account_owner(&account.data);
                        }
                    }
                }
                Err(e) => {
                    warn!("Owner resolution failed for {}: {}", mint, e);
                }
            }
        }

        Ok(holders)
    }

    async fn signatures_once(
        &self,
        address: &SolanaPubkey,
        limit: usize,
    ) -> Result<Vec<String>, AuditError> {
        self.limiter.until_ready().await;
        let config = GetConfirmedSignaturesForAddress2Config {
            limit: Some(limit),
            ..Default::default()
        };
        let signatures = self
            .client
            .get_signatures_for_address_with_config(address, config)
            .await
            .map_err(|e| AuditError::unavailable(format!("signatures {address}: {e}")))?;
        Ok(signatures.into_iter().map(|s| s.signature).collect())
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    #[instrument(skip(self), fields(address = %address))]
    async fn get_account_data(&self, address: &str) -> Result<Option<Vec<u8>>, AuditError> {
        let pubkey = Self::parse_address(address)?;
        Retry::spawn(self.retry_strategy(), || self.account_data_once(&pubkey)).await
    }

    #[instrument(skip(self), fields(mint = %mint))]
    async fn get_largest_holders(&self, mint: &str) -> Result<Vec<HolderBalance>, AuditError> {
        let pubkey = Self::parse_address(mint)?;
        Retry::spawn(self.retry_strategy(), || self.largest_holders_once(&pubkey)).await
    }

    #[instrument(skip(self), fields(address = %address))]
    async fn get_signatures(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<String>, AuditError> {
        let pubkey = Self::parse_address(address)?;
        Retry::spawn(self.retry_strategy(), || self.signatures_once(&pubkey, limit)).await
    }

    #[instrument(skip(self), fields(signature = %signature))]
    async fn get_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTx>, AuditError> {
        let Ok(parsed_signature) = Signature::from_str(signature) else {
            return Ok(None);
        };

        self.limiter.until_ready().await;
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::JsonParsed),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };
        // A missing or pruned transaction is a normal empty result; the
        // scanner skips it either way.
        let tx = match self
            .client
            .get_transaction_with_config(&parsed_signature, config)
            .await
        {
            Ok(tx) => tx,
            Err(e) => {
                debug!("Transaction {} unavailable: {}", signature, e);
                return Ok(None);
            }
        };

        let block_time = tx.block_time;
        let value = serde_json::to_value(&tx.transaction)
            .map_err(|e| AuditError::unavailable(format!("encode tx {signature}: {e}")))?;
        Ok(Some(parse_encoded_transaction(signature, block_time, &value)))
    }
}

/// Extract the owner pubkey from raw SPL token-account bytes.
fn token_account_owner(data: &[u8]) -> Option<String> {
    if data.len() < TOKEN_ACCOUNT_LEN {
        return None;
    }
    SolanaPubkey::try_from(&data[32..64]).ok().map(|pk| pk.to_string())
}

/// Convert a JSON-parsed `EncodedTransactionWithStatusMeta` value into the
/// neutral [`ParsedTx`] model. Unrecognized shapes simply contribute nothing.
pub(crate) fn parse_encoded_transaction(
    signature: &str,
    block_time: Option<i64>,
    value: &Value,
) -> ParsedTx {
    let message = &value["transaction"]["message"];
    let meta = &value["meta"];

    let account_keys = message["accountKeys"]
        .as_array()
        .map(|keys| {
            keys.iter()
                .filter_map(|key| {
                    key.as_str()
                        .or_else(|| key["pubkey"].as_str())
                        .map(|s| s.to_string())
                })
                .collect()
        })
        .unwrap_or_default();

    let mut instructions = Vec::new();
    if let Some(outer) = message["instructions"].as_array() {
        instructions.extend(outer.iter().filter_map(parse_instruction));
    }
    if let Some(inner_sets) = meta["innerInstructions"].as_array() {
        for set in inner_sets {
            if let Some(inner) = set["instructions"].as_array() {
                instructions.extend(inner.iter().filter_map(parse_instruction));
            }
        }
    }

    ParsedTx {
        signature: signature.to_string(),
        block_time,
        account_keys,
        instructions,
        pre_token_balances: parse_token_balances(&meta["preTokenBalances"]),
        post_token_balances: parse_token_balances(&meta["postTokenBalances"]),
    }
}

fn parse_instruction(value: &Value) -> Option<ParsedInstruction> {
    let program = value["program"].as_str()?.to_string();
    let parsed = value.get("parsed")?;
    let kind = parsed["type"].as_str()?.to_string();
    let info = parsed.get("info").cloned().unwrap_or(Value::Null);
    Some(ParsedInstruction { program, kind, info })
}

fn parse_token_balances(value: &Value) -> Vec<TokenBalance> {
    value
        .as_array()
        .map(|balances| {
            balances
                .iter()
                .filter_map(|balance| {
                    let ui_amount = balance["uiTokenAmount"]["uiAmount"]
                        .as_f64()
                        .or_else(|| {
                            balance["uiTokenAmount"]["uiAmountString"]
                                .as_str()
                                .and_then(|s| s.parse().ok())
                        })
                        .unwrap_or(0.0);
                    Some(TokenBalance {
                        account_index: balance["accountIndex"].as_u64()? as usize,
                        mint: balance["mint"].as_str()?.to_string(),
                        owner: balance["owner"].as_str().map(|s| s.to_string()),
                        ui_amount,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
