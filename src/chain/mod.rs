//! Collaborator interfaces consumed by the audit engine.
//!
//! The engine only ever sees these traits and the neutral `ParsedTx` model;
//! the real RPC and DEX-API implementations live in `rpc` and `dex`, and
//! tests substitute in-memory mocks.

pub mod dex;
pub mod rpc;

use crate::errors::AuditError;
use crate::types::{LpPool, Pubkey};
use async_trait::async_trait;
use serde_json::Value;

/// One entry of the largest-holders snapshot, before percent computation.
#[derive(Debug, Clone)]
pub struct HolderBalance {
    /// Token-account address
    pub address: Pubkey,
    /// Owning wallet, when the implementation resolved it
    pub owner: Option<Pubkey>,
    /// Balance in display units
    pub ui_amount: f64,
}

/// A token balance attached to a transaction, pre or post execution.
#[derive(Debug, Clone)]
pub struct TokenBalance {
    /// Index into the transaction's account keys
    pub account_index: usize,
    /// Mint of the balance
    pub mint: Pubkey,
    /// Owner of the token account, when reported
    pub owner: Option<Pubkey>,
    /// Balance in display units
    pub ui_amount: f64,
}

/// One decoded instruction from a JSON-parsed transaction. Outer and inner
/// instructions are flattened into the same list; the scanner only cares
/// about what fired, not where in the call tree.
#[derive(Debug, Clone)]
pub struct ParsedInstruction {
    /// Program label, e.g. "spl-token"
    pub program: String,
    /// Parsed instruction type, e.g. "burnChecked"
    pub kind: String,
    /// The parsed `info` payload, kept as JSON; field sets vary per kind
    pub info: Value,
}

/// Neutral view of a parsed transaction: just enough for burn classification.
#[derive(Debug, Clone)]
pub struct ParsedTx {
    /// Transaction signature
    pub signature: String,
    /// Chain-reported block time
    pub block_time: Option<i64>,
    /// Account keys referenced by the transaction, in message order
    pub account_keys: Vec<Pubkey>,
    /// Outer and inner parsed instructions
    pub instructions: Vec<ParsedInstruction>,
    /// Token balances before execution
    pub pre_token_balances: Vec<TokenBalance>,
    /// Token balances after execution
    pub post_token_balances: Vec<TokenBalance>,
}

/// Chain-state reads the engine depends on. `Ok(None)` means the account or
/// transaction does not exist, which is a normal empty result.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Raw account bytes, or `None` when the account does not exist.
    async fn get_account_data(&self, address: &str) -> Result<Option<Vec<u8>>, AuditError>;

    /// Largest token accounts of a mint, ordered largest first.
    async fn get_largest_holders(&self, mint: &str) -> Result<Vec<HolderBalance>, AuditError>;

    /// Most recent transaction signatures touching an address, newest first.
    async fn get_signatures(&self, address: &str, limit: usize)
        -> Result<Vec<String>, AuditError>;

    /// Parsed transaction content, or `None` when the chain no longer has it.
    async fn get_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTx>, AuditError>;
}

/// Pool-metadata reads. The provider is trusted as-is; the engine never
/// validates its honesty, only its availability.
#[async_trait]
pub trait PoolProvider: Send + Sync {
    /// All pools the provider knows about.
    async fn list_pools(&self) -> Result<Vec<LpPool>, AuditError>;

    /// Richer detail for one pool.
    async fn pool_detail(&self, pool_address: &str) -> Result<LpPool, AuditError>;
}
