//! Core data model for the rugscan risk-analysis engine.
//!
//! Everything in here is plain data: decoded chain state, classified burn
//! events, and the final report consumed by downstream renderers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A base58-encoded public key. The engine works with string addresses
/// throughout; `solana_sdk::pubkey::Pubkey` only appears at the RPC boundary.
pub type Pubkey = String;

/// Decoded mint-account state for a fungible token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// The mint address
    pub address: Pubkey,
    /// Decimal places of the token
    pub decimals: u8,
    /// Raw supply in base units
    pub supply: u64,
    /// Mint authority, `None` when revoked
    pub mint_authority: Option<Pubkey>,
    /// Freeze authority, `None` when revoked
    pub freeze_authority: Option<Pubkey>,
}

impl TokenDescriptor {
    /// Supply in display units (raw supply divided by 10^decimals).
    pub fn display_supply(&self) -> f64 {
        self.supply as f64 / 10f64.powi(self.decimals as i32)
    }

    /// True when both authorities have been revoked.
    pub fn authorities_revoked(&self) -> bool {
        self.mint_authority.is_none() && self.freeze_authority.is_none()
    }
}

/// A liquidity pool as reported by the pool-metadata provider.
/// All fields are external, read-only inputs to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LpPool {
    /// Pool (AMM) account address
    pub pool_address: Pubkey,
    /// First side of the pair
    pub base_mint: Pubkey,
    /// Second side of the pair
    pub quote_mint: Pubkey,
    /// LP-token mint, when the provider resolved one
    pub lp_mint: Option<Pubkey>,
    /// Original LP supply in display units, when the provider reports it
    pub lp_supply: Option<f64>,
    /// Base-side reserve in display units
    pub base_reserve: f64,
    /// Quote-side reserve in display units
    pub quote_reserve: f64,
    /// Total value locked in USD
    pub tvl_usd: f64,
    /// 24h traded volume in USD
    pub volume24h_usd: f64,
    /// Human-readable pair name, e.g. "TOKEN/SOL"
    pub name: String,
}

/// How a burn-like event was detected. Ordering is detection strength:
/// an explicit burn instruction is the strongest signal, a sink-balance
/// snapshot the weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BurnMethod {
    /// Supply-reducing burn instruction
    ExplicitBurn,
    /// Token account zeroed and closed in the same transaction
    CloseAccount,
    /// Transfer whose destination is a known sink address
    TransferToSink,
    /// Current balance held by a sink address (snapshot, no transaction)
    BalanceZeroedHeuristic,
}

impl BurnMethod {
    /// Stable string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            BurnMethod::ExplicitBurn => "explicit-burn",
            BurnMethod::CloseAccount => "close-account",
            BurnMethod::TransferToSink => "transfer-to-sink",
            BurnMethod::BalanceZeroedHeuristic => "balance-zeroed-heuristic",
        }
    }

    /// Lower value wins when several methods explain the same transaction.
    pub fn precedence(&self) -> u8 {
        match self {
            BurnMethod::ExplicitBurn => 0,
            BurnMethod::CloseAccount => 1,
            BurnMethod::TransferToSink => 2,
            BurnMethod::BalanceZeroedHeuristic => 3,
        }
    }
}

impl fmt::Display for BurnMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected destruction of LP tokens.
///
/// Events are uniquely keyed by `(signature, method)`; the scanner keeps all
/// fired methods visible but counts each signature once in the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnEvent {
    /// Source transaction signature (synthetic `holder:<address>` for
    /// snapshot-derived events, which have no transaction)
    pub signature: String,
    /// Chain-reported block time, when available
    pub block_time: Option<i64>,
    /// Detection method that produced this event
    pub method: BurnMethod,
    /// Destroyed amount in display units
    pub amount: f64,
    /// Acting authority, when the instruction exposes one
    pub authority: Option<Pubkey>,
}

/// Whether a burn ratio is exact ledger arithmetic or an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioBasis {
    /// destroyed / provider-reported original supply
    Exact,
    /// destroyed / (destroyed + circulating); original supply was missing
    /// or zero upstream
    Estimated,
    /// The ratio inputs could not be read (scan-wide failure, or the LP
    /// mint state was unreadable with no reported original supply); the
    /// ratio carries no signal
    Unavailable,
}

/// Per-LP-mint aggregation of detected burns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnSummary {
    /// The LP-token mint this summary describes
    pub lp_mint: Pubkey,
    /// Total destroyed amount in display units (signature-deduplicated)
    pub destroyed: f64,
    /// Current circulating amount in display units
    pub circulating: f64,
    /// Provider-reported original supply, kept raw for downstream consumers
    pub original_supply: Option<f64>,
    /// Destruction ratio in percent, capped at 99.9
    pub ratio_pct: f64,
    /// Whether the ratio is exact, estimated, or unavailable
    pub basis: RatioBasis,
    /// Strongest detection method that fired, when any did
    pub dominant_method: Option<BurnMethod>,
    /// All detected events, keyed by (signature, method)
    pub events: Vec<BurnEvent>,
}

impl BurnSummary {
    /// Zero-signal summary used when every collaborator read failed.
    pub fn unavailable(lp_mint: Pubkey) -> Self {
        Self {
            lp_mint,
            destroyed: 0.0,
            circulating: 0.0,
            original_supply: None,
            ratio_pct: 0.0,
            basis: RatioBasis::Unavailable,
            dominant_method: None,
            events: Vec::new(),
        }
    }
}

/// One entry of the largest-holders snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderShare {
    /// Token-account address
    pub address: Pubkey,
    /// Owning wallet, when resolvable
    pub owner: Option<Pubkey>,
    /// Balance in display units
    pub amount: f64,
    /// Share of display supply in percent
    pub pct_of_supply: f64,
}

/// Holder-concentration statistics over the top-N snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationStats {
    /// Number of holders in the snapshot
    pub holder_count: usize,
    /// Combined share of the top-N holders, percent of display supply
    pub top_holder_pct: f64,
    /// The top-N holders themselves
    pub top_holders: Vec<HolderShare>,
}

/// Final risk category, mapped from the score by configurable thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskCategory::Low => "LOW",
            RiskCategory::Medium => "MEDIUM",
            RiskCategory::High => "HIGH",
            RiskCategory::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Stages of a single token audit. `Failed` is reachable from `DecodeMint`
/// only; every later stage degrades instead of failing the audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStage {
    Init,
    DecodeMint,
    ResolvePools,
    ScanBurns,
    Score,
    Done,
    Failed,
}

/// Complete audit output for one token. Built once per audit invocation and
/// immutable afterwards; persistence is a collaborator concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    /// Decoded mint state snapshot
    pub token: TokenDescriptor,
    /// Number of pools referencing the token
    pub pool_count: usize,
    /// One summary per resolved LP mint
    pub burn_summaries: Vec<BurnSummary>,
    /// Holder concentration, `None` when the holder read failed
    pub concentration: Option<ConcentrationStats>,
    /// Weighted risk score, 0-100
    pub score: u8,
    /// Category derived from the score
    pub category: RiskCategory,
    /// Unix timestamp when the report was generated
    pub generated_at: i64,
}
