//! Burn-event scanning over bounded transaction history and holder
//! snapshots.
//!
//! Four detection methods run independently and merge on the
//! `(signature, method)` key. The destroyed total counts each signature once
//! by method precedence, and the snapshot-derived sink signal overlaps the
//! history-derived transfer-to-sink signal, so those two contribute the
//! larger of the pair rather than their sum.

use crate::audit::mint::decode_mint_account;
use crate::audit::sinks::SinkRegistry;
use crate::chain::{ChainReader, ParsedTx};
use crate::errors::AuditError;
use crate::types::{BurnEvent, BurnMethod, BurnSummary, RatioBasis};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Scans one LP mint for burn-like events.
#[derive(Clone)]
pub struct BurnScanner {
    chain: Arc<dyn ChainReader>,
    sinks: Arc<SinkRegistry>,
    history_depth: usize,
}

impl BurnScanner {
    pub fn new(chain: Arc<dyn ChainReader>, sinks: Arc<SinkRegistry>, history_depth: usize) -> Self {
        Self {
            chain,
            sinks,
            history_depth,
        }
    }

    /// Produce a [`BurnSummary`] for an LP mint. `reported_supply` is the
    /// pool-metadata provider's original LP supply, when it has one.
    ///
    /// Individual transaction or holder lookups that fail are skipped; only
    /// when every collaborator read fails does the summary degrade to the
    /// zero-signal `Unavailable` form.
    #[instrument(skip(self), fields(lp_mint = %lp_mint))]
    pub async fn scan(&self, lp_mint: &str, reported_supply: Option<f64>) -> BurnSummary {
        // Current mint state gives decimals and the circulating supply.
        let mint_state = match self.chain.get_account_data(lp_mint).await {
            Ok(Some(data)) => decode_mint_account(lp_mint, &data).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("LP mint read failed for {}: {}", lp_mint, e);
                None
            }
        };
        let decimals = mint_state.as_ref().map(|t| t.decimals);
        let circulating = mint_state.as_ref().map(|t| t.display_supply());

        let history = self.scan_history(lp_mint, decimals).await;
        let snapshot = self.scan_sink_balances(lp_mint).await;

        if mint_state.is_none() && history.is_err() && snapshot.is_err() {
            warn!("All collaborator reads failed for {}", lp_mint);
            return BurnSummary::unavailable(lp_mint.to_string());
        }

        let mut events = history.unwrap_or_else(|e| {
            warn!("History scan unavailable for {}: {}", lp_mint, e);
            Vec::new()
        });
        events.extend(snapshot.unwrap_or_else(|e| {
            warn!("Holder snapshot unavailable for {}: {}", lp_mint, e);
            Vec::new()
        }));

        build_summary(lp_mint, events, circulating, reported_supply)
    }

    /// Walk bounded transaction history, newest first. Per-transaction
    /// failures are skipped and never abort the scan.
    async fn scan_history(
        &self,
        lp_mint: &str,
        decimals: Option<u8>,
    ) -> Result<Vec<BurnEvent>, AuditError> {
        let signatures = self.chain.get_signatures(lp_mint, self.history_depth).await?;
        debug!("Scanning {} transactions for {}", signatures.len(), lp_mint);

        let mut events = Vec::new();
        for signature in signatures {
            match self.chain.get_parsed_transaction(&signature).await {
                Ok(Some(tx)) => {
                    events.extend(classify_transaction(&tx, lp_mint, decimals, &self.sinks));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping transaction {}: {}", signature, e);
                }
            }
        }
        Ok(events)
    }

    /// Sum current balances sitting in registry sink addresses. Independent
    /// of history; covers mints older than the lookback window.
    async fn scan_sink_balances(&self, lp_mint: &str) -> Result<Vec<BurnEvent>, AuditError> {
        let holders = self.chain.get_largest_holders(lp_mint).await?;
        let events = holders
            .into_iter()
            .filter(|holder| {
                holder.ui_amount > 0.0
                    && (self.sinks.contains(&holder.address)
                        || holder
                            .owner
                            .as_deref()
                            .map(|owner| self.sinks.contains(owner))
                            .unwrap_or(false))
            })
            .map(|holder| BurnEvent {
                signature: format!("holder:{}", holder.address),
                block_time: None,
                method: BurnMethod::BalanceZeroedHeuristic,
                amount: holder.ui_amount,
                authority: holder.owner,
            })
            .collect();
        Ok(events)
    }
}

/// Classify one parsed transaction against an LP mint. Pure; the four
/// history-facing patterns all live here.
pub fn classify_transaction(
    tx: &ParsedTx,
    lp_mint: &str,
    decimals: Option<u8>,
    sinks: &SinkRegistry,
) -> Vec<BurnEvent> {
    // Accumulate per method so several instructions of the same kind inside
    // one transaction still yield a single (signature, method) event.
    let mut per_method: BTreeMap<BurnMethod, (f64, Option<String>)> = BTreeMap::new();
    let mut add = |method: BurnMethod, amount: f64, authority: Option<String>| {
        let entry = per_method.entry(method).or_insert((0.0, authority.clone()));
        entry.0 += amount;
        if entry.1.is_none() {
            entry.1 = authority;
        }
    };

    for instruction in &tx.instructions {
        if instruction.program != "spl-token" {
            continue;
        }
        let info = &instruction.info;
        match instruction.kind.as_str() {
            "burn" | "burnChecked" => {
                if info["mint"].as_str() == Some(lp_mint) {
                    if let Some(amount) = instruction_amount(info, decimals) {
                        add(
                            BurnMethod::ExplicitBurn,
                            amount,
                            string_field(info, "authority"),
                        );
                    }
                }
            }
            "closeAccount" => {
                if let Some(amount) = closed_balance(tx, info, lp_mint) {
                    add(BurnMethod::CloseAccount, amount, string_field(info, "owner"));
                }
            }
            "transfer" | "transferChecked" => {
                if let Some(amount) = sink_transfer_amount(tx, info, lp_mint, decimals, sinks) {
                    add(
                        BurnMethod::TransferToSink,
                        amount,
                        string_field(info, "authority"),
                    );
                }
            }
            _ => {}
        }
    }

    per_method
        .into_iter()
        .map(|(method, (amount, authority))| BurnEvent {
            signature: tx.signature.clone(),
            block_time: tx.block_time,
            method,
            amount,
            authority,
        })
        .collect()
}

/// Close-account pattern: the account held a non-zero LP balance before the
/// transaction and zero (or no balance at all) after it.
fn closed_balance(tx: &ParsedTx, info: &Value, lp_mint: &str) -> Option<f64> {
    let account = info["account"].as_str()?;
    let index = tx.account_keys.iter().position(|key| key == account)?;
    let pre = tx
        .pre_token_balances
        .iter()
        .find(|b| b.account_index == index && b.mint == lp_mint)?;
    if pre.ui_amount <= 0.0 {
        return None;
    }
    let post_amount = tx
        .post_token_balances
        .iter()
        .find(|b| b.account_index == index)
        .map(|b| b.ui_amount)
        .unwrap_or(0.0);
    if post_amount == 0.0 {
        Some(pre.ui_amount)
    } else {
        None
    }
}

/// Transfer-to-sink pattern: the destination token account, or its owner,
/// is a registered sink, and the moved balance is the LP mint.
fn sink_transfer_amount(
    tx: &ParsedTx,
    info: &Value,
    lp_mint: &str,
    decimals: Option<u8>,
    sinks: &SinkRegistry,
) -> Option<f64> {
    let destination = info["destination"].as_str()?;
    let dest_index = tx.account_keys.iter().position(|key| key == destination);

    let dest_balance = dest_index.and_then(|index| {
        tx.post_token_balances
            .iter()
            .chain(tx.pre_token_balances.iter())
            .find(|b| b.account_index == index)
    });

    // transferChecked names the mint; a plain transfer is matched through
    // the destination's token balance entry.
    let mint_matches = info["mint"].as_str() == Some(lp_mint)
        || dest_balance.map(|b| b.mint == lp_mint).unwrap_or(false);
    if !mint_matches {
        return None;
    }

    let dest_owner = dest_balance.and_then(|b| b.owner.as_deref());
    let is_sink =
        sinks.contains(destination) || dest_owner.map(|o| sinks.contains(o)).unwrap_or(false);
    if !is_sink {
        return None;
    }

    instruction_amount(info, decimals)
}

/// Amount in display units from a parsed instruction's info payload.
fn instruction_amount(info: &Value, decimals: Option<u8>) -> Option<f64> {
    if let Some(ui_amount) = info["tokenAmount"]["uiAmount"].as_f64() {
        return Some(ui_amount);
    }
    let raw: f64 = info["amount"].as_str()?.parse().ok()?;
    Some(raw / 10f64.powi(decimals.unwrap_or(0) as i32))
}

fn string_field(info: &Value, field: &str) -> Option<String> {
    info[field].as_str().map(|s| s.to_string())
}

/// Deduplicate events on the `(signature, method)` key. Idempotent and
/// commutative: running detection twice over the same transactions yields
/// the same merged set.
pub fn merge_events(events: Vec<BurnEvent>) -> Vec<BurnEvent> {
    let mut merged: BTreeMap<(String, BurnMethod), BurnEvent> = BTreeMap::new();
    for event in events {
        merged
            .entry((event.signature.clone(), event.method))
            .or_insert(event);
    }
    merged.into_values().collect()
}

/// Destroyed total over merged events. Each transaction signature counts
/// once, through its strongest method; the snapshot sink total and the
/// history transfer-to-sink total cover the same tokens, so the larger of
/// the two is used.
fn destroyed_total(events: &[BurnEvent]) -> f64 {
    let mut strongest_per_signature: BTreeMap<&str, &BurnEvent> = BTreeMap::new();
    for event in events {
        if event.method == BurnMethod::BalanceZeroedHeuristic {
            continue;
        }
        strongest_per_signature
            .entry(event.signature.as_str())
            .and_modify(|current| {
                if event.method.precedence() < current.method.precedence() {
                    *current = event;
                }
            })
            .or_insert(event);
    }

    let mut strong_total = 0.0;
    let mut history_sink_total = 0.0;
    for event in strongest_per_signature.values() {
        if event.method == BurnMethod::TransferToSink {
            history_sink_total += event.amount;
        } else {
            strong_total += event.amount;
        }
    }

    let snapshot_sink_total: f64 = events
        .iter()
        .filter(|e| e.method == BurnMethod::BalanceZeroedHeuristic)
        .map(|e| e.amount)
        .sum();

    strong_total + history_sink_total.max(snapshot_sink_total)
}

/// Assemble the summary: merge, total, ratio, basis. `circulating` is `None`
/// when the LP mint state could not be read.
pub fn build_summary(
    lp_mint: &str,
    events: Vec<BurnEvent>,
    circulating: Option<f64>,
    reported_supply: Option<f64>,
) -> BurnSummary {
    let events = merge_events(events);
    let destroyed = destroyed_total(&events);
    let dominant_method = events
        .iter()
        .map(|e| e.method)
        .min_by_key(|m| m.precedence());

    let (ratio_pct, basis) = compute_ratio(destroyed, circulating, reported_supply);

    BurnSummary {
        lp_mint: lp_mint.to_string(),
        destroyed,
        circulating: circulating.unwrap_or(0.0),
        original_supply: reported_supply,
        ratio_pct,
        basis,
        dominant_method,
        events,
    }
}

/// Ratio in percent, capped at 99.9 so estimation noise never displays as a
/// mathematically exact 100%. When the provider reports no positive original
/// supply, the original is estimated as circulating + destroyed and the
/// result is flagged accordingly. An unknown circulating supply cannot feed
/// that denominator: estimating against it would report near-total
/// destruction for any tiny burn, so the ratio is flagged `Unavailable`
/// instead.
fn compute_ratio(
    destroyed: f64,
    circulating: Option<f64>,
    original: Option<f64>,
) -> (f64, RatioBasis) {
    match (original, circulating) {
        (Some(original), _) if original > 0.0 => {
            let ratio = (destroyed / original * 100.0).clamp(0.0, 99.9);
            (ratio, RatioBasis::Exact)
        }
        (_, Some(circulating)) => {
            let estimated_original = destroyed + circulating;
            if estimated_original <= 0.0 {
                (0.0, RatioBasis::Estimated)
            } else {
                let ratio = (destroyed / estimated_original * 100.0).clamp(0.0, 99.9);
                (ratio, RatioBasis::Estimated)
            }
        }
        (_, None) => (0.0, RatioBasis::Unavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{HolderBalance, ParsedInstruction, TokenBalance};
    use async_trait::async_trait;
    use serde_json::json;

    const LP_MINT: &str = "LpMint111";
    const SINK: &str = "1nc1nerator11111111111111111111111111111111";

    fn create_test_tx(signature: &str, instructions: Vec<ParsedInstruction>) -> ParsedTx {
        ParsedTx {
            signature: signature.to_string(),
            block_time: Some(1_700_000_000),
            account_keys: vec![
                "Wallet111".to_string(),
                "TokenAcc1".to_string(),
                "SinkAcc11".to_string(),
            ],
            instructions,
            pre_token_balances: vec![TokenBalance {
                account_index: 1,
                mint: LP_MINT.to_string(),
                owner: Some("Wallet111".to_string()),
                ui_amount: 250.0,
            }],
            post_token_balances: vec![TokenBalance {
                account_index: 2,
                mint: LP_MINT.to_string(),
                owner: Some(SINK.to_string()),
                ui_amount: 250.0,
            }],
        }
    }

    fn burn_instruction(amount: f64) -> ParsedInstruction {
        ParsedInstruction {
            program: "spl-token".to_string(),
            kind: "burnChecked".to_string(),
            info: json!({
                "account": "TokenAcc1",
                "mint": LP_MINT,
                "authority": "Wallet111",
                "tokenAmount": {"amount": "0", "decimals": 9, "uiAmount": amount}
            }),
        }
    }

    fn close_instruction() -> ParsedInstruction {
        ParsedInstruction {
            program: "spl-token".to_string(),
            kind: "closeAccount".to_string(),
            info: json!({
                "account": "TokenAcc1",
                "destination": "Wallet111",
                "owner": "Wallet111"
            }),
        }
    }

    fn sink_transfer_instruction(amount: f64) -> ParsedInstruction {
        ParsedInstruction {
            program: "spl-token".to_string(),
            kind: "transferChecked".to_string(),
            info: json!({
                "source": "TokenAcc1",
                "destination": "SinkAcc11",
                "mint": LP_MINT,
                "authority": "Wallet111",
                "tokenAmount": {"amount": "0", "decimals": 9, "uiAmount": amount}
            }),
        }
    }

    #[test]
    fn test_classify_explicit_burn() {
        let tx = create_test_tx("Sig1", vec![burn_instruction(100.0)]);
        let events = classify_transaction(&tx, LP_MINT, Some(9), &SinkRegistry::default());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].method, BurnMethod::ExplicitBurn);
        assert_eq!(events[0].amount, 100.0);
        assert_eq!(events[0].authority.as_deref(), Some("Wallet111"));
    }

    #[test]
    fn test_classify_plain_burn_uses_decimals() {
        let instruction = ParsedInstruction {
            program: "spl-token".to_string(),
            kind: "burn".to_string(),
            info: json!({
                "account": "TokenAcc1",
                "mint": LP_MINT,
                "authority": "Wallet111",
                "amount": "2500000000"
            }),
        };
        let tx = create_test_tx("Sig1", vec![instruction]);
        let events = classify_transaction(&tx, LP_MINT, Some(9), &SinkRegistry::default());
        assert_eq!(events[0].amount, 2.5);
    }

    #[test]
    fn test_classify_close_account_zeroed_balance() {
        let tx = create_test_tx("Sig2", vec![close_instruction()]);
        let events = classify_transaction(&tx, LP_MINT, Some(9), &SinkRegistry::default());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].method, BurnMethod::CloseAccount);
        // Amount is the zeroed pre-transaction balance
        assert_eq!(events[0].amount, 250.0);
    }

    #[test]
    fn test_close_account_with_surviving_balance_is_ignored() {
        let mut tx = create_test_tx("Sig2", vec![close_instruction()]);
        tx.post_token_balances.push(TokenBalance {
            account_index: 1,
            mint: LP_MINT.to_string(),
            owner: Some("Wallet111".to_string()),
            ui_amount: 250.0,
        });
        let events = classify_transaction(&tx, LP_MINT, Some(9), &SinkRegistry::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_classify_transfer_to_sink_via_destination_owner() {
        let tx = create_test_tx("Sig3", vec![sink_transfer_instruction(250.0)]);
        let events = classify_transaction(&tx, LP_MINT, Some(9), &SinkRegistry::default());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].method, BurnMethod::TransferToSink);
        assert_eq!(events[0].amount, 250.0);
    }

    #[test]
    fn test_transfer_to_regular_wallet_is_ignored() {
        let mut tx = create_test_tx("Sig3", vec![sink_transfer_instruction(250.0)]);
        // Destination owner is no longer a sink
        tx.post_token_balances[0].owner = Some("SomeWallet".to_string());
        let events = classify_transaction(&tx, LP_MINT, Some(9), &SinkRegistry::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_other_mint_is_ignored() {
        let tx = create_test_tx("Sig4", vec![burn_instruction(100.0)]);
        let events = classify_transaction(&tx, "OtherMint", Some(9), &SinkRegistry::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let tx = create_test_tx("Sig5", vec![burn_instruction(100.0), close_instruction()]);
        let sinks = SinkRegistry::default();

        let mut once = classify_transaction(&tx, LP_MINT, Some(9), &sinks);
        let twice = classify_transaction(&tx, LP_MINT, Some(9), &sinks);
        once.extend(twice);

        let merged = merge_events(once);
        assert_eq!(merged.len(), 2);
        assert_eq!(destroyed_total(&merged), 100.0); // strongest method wins
    }

    #[test]
    fn test_same_signature_two_methods_counted_once() {
        // Explicit burn and transfer-to-sink fire on the same signature for
        // the same amount; the total must count it exactly once.
        let tx = create_test_tx(
            "Sig6",
            vec![burn_instruction(250.0), sink_transfer_instruction(250.0)],
        );
        let events = classify_transaction(&tx, LP_MINT, Some(9), &SinkRegistry::default());
        assert_eq!(events.len(), 2);

        let summary = build_summary(LP_MINT, events, Some(750.0), Some(1000.0));
        assert_eq!(summary.destroyed, 250.0);
        assert_eq!(summary.dominant_method, Some(BurnMethod::ExplicitBurn));
    }

    #[test]
    fn test_snapshot_overlaps_history_sink_total() {
        // 100 seen leaving via history, 120 sitting in the sink now: the
        // sink signal is max(100, 120), not 220.
        let events = vec![
            BurnEvent {
                signature: "Sig7".to_string(),
                block_time: None,
                method: BurnMethod::TransferToSink,
                amount: 100.0,
                authority: None,
            },
            BurnEvent {
                signature: "holder:SinkAcc11".to_string(),
                block_time: None,
                method: BurnMethod::BalanceZeroedHeuristic,
                amount: 120.0,
                authority: None,
            },
        ];
        assert_eq!(destroyed_total(&events), 120.0);
    }

    #[test]
    fn test_snapshot_fallback_when_history_empty() {
        let events = vec![BurnEvent {
            signature: "holder:SinkAcc11".to_string(),
            block_time: None,
            method: BurnMethod::BalanceZeroedHeuristic,
            amount: 900.0,
            authority: None,
        }];
        let summary = build_summary(LP_MINT, events, Some(100.0), Some(1000.0));
        assert_eq!(summary.destroyed, 900.0);
        assert_eq!(summary.ratio_pct, 90.0);
        assert_eq!(summary.basis, RatioBasis::Exact);
    }

    #[test]
    fn test_exact_ratio_reference_scenario() {
        let (ratio, basis) = compute_ratio(900.0, Some(100.0), Some(1000.0));
        assert_eq!(ratio, 90.0);
        assert_eq!(basis, RatioBasis::Exact);
    }

    #[test]
    fn test_estimated_ratio_when_original_missing() {
        let (ratio, basis) = compute_ratio(900.0, Some(100.0), None);
        assert_eq!(ratio, 90.0);
        assert_eq!(basis, RatioBasis::Estimated);
    }

    #[test]
    fn test_zero_reported_supply_falls_back_to_estimation() {
        let (_, basis) = compute_ratio(500.0, Some(500.0), Some(0.0));
        assert_eq!(basis, RatioBasis::Estimated);
    }

    #[test]
    fn test_ratio_capped_at_99_9() {
        let (ratio, _) = compute_ratio(1000.0, Some(0.0), Some(1000.0));
        assert_eq!(ratio, 99.9);
        let (ratio, _) = compute_ratio(1000.0, Some(0.0), None);
        assert_eq!(ratio, 99.9);
    }

    #[test]
    fn test_no_signal_ratio_is_zero() {
        let (ratio, basis) = compute_ratio(0.0, Some(0.0), None);
        assert_eq!(ratio, 0.0);
        assert_eq!(basis, RatioBasis::Estimated);
    }

    #[test]
    fn test_unknown_circulating_never_estimates() {
        // With the circulating supply unreadable, a 5-token burn must not
        // estimate out to a near-total destruction ratio.
        let (ratio, basis) = compute_ratio(5.0, None, None);
        assert_eq!(ratio, 0.0);
        assert_eq!(basis, RatioBasis::Unavailable);

        // A provider-reported original supply still yields an exact ratio
        let (ratio, basis) = compute_ratio(900.0, None, Some(1000.0));
        assert_eq!(ratio, 90.0);
        assert_eq!(basis, RatioBasis::Exact);
    }

    // --- scanner-level tests over a mock reader ---

    struct MockReader {
        mint_data: Option<Vec<u8>>,
        signatures: Result<Vec<String>, ()>,
        txs: Vec<ParsedTx>,
        holders: Result<Vec<HolderBalance>, ()>,
        fail_tx: Vec<String>,
    }

    #[async_trait]
    impl ChainReader for MockReader {
        async fn get_account_data(&self, _address: &str) -> Result<Option<Vec<u8>>, AuditError> {
            Ok(self.mint_data.clone())
        }

        async fn get_largest_holders(
            &self,
            _mint: &str,
        ) -> Result<Vec<HolderBalance>, AuditError> {
            self.holders
                .clone()
                .map_err(|_| AuditError::unavailable("holders"))
        }

        async fn get_signatures(
            &self,
            _address: &str,
            limit: usize,
        ) -> Result<Vec<String>, AuditError> {
            self.signatures
                .clone()
                .map(|s| s.into_iter().take(limit).collect())
                .map_err(|_| AuditError::unavailable("signatures"))
        }

        async fn get_parsed_transaction(
            &self,
            signature: &str,
        ) -> Result<Option<ParsedTx>, AuditError> {
            if self.fail_tx.iter().any(|s| s == signature) {
                return Err(AuditError::unavailable("tx fetch"));
            }
            Ok(self.txs.iter().find(|t| t.signature == signature).cloned())
        }
    }

    fn lp_mint_bytes(supply: u64, decimals: u8) -> Vec<u8> {
        let mut data = vec![0u8; crate::audit::mint::MINT_ACCOUNT_LEN];
        data[36..44].copy_from_slice(&supply.to_le_bytes());
        data[44] = decimals;
        data
    }

    #[tokio::test]
    async fn test_scan_skips_failing_transactions() {
        let reader = MockReader {
            mint_data: Some(lp_mint_bytes(100_000_000_000, 9)), // 100.0 circulating
            signatures: Ok(vec!["Good1".to_string(), "Bad1".to_string()]),
            txs: vec![create_test_tx("Good1", vec![burn_instruction(900.0)])],
            holders: Ok(vec![]),
            fail_tx: vec!["Bad1".to_string()],
        };
        let scanner = BurnScanner::new(
            Arc::new(reader),
            Arc::new(SinkRegistry::default()),
            100,
        );

        let summary = scanner.scan(LP_MINT, Some(1000.0)).await;
        assert_eq!(summary.destroyed, 900.0);
        assert_eq!(summary.ratio_pct, 90.0);
        assert_eq!(summary.basis, RatioBasis::Exact);
    }

    #[tokio::test]
    async fn test_scan_degrades_to_unavailable() {
        let reader = MockReader {
            mint_data: None,
            signatures: Err(()),
            txs: vec![],
            holders: Err(()),
            fail_tx: vec![],
        };
        let scanner = BurnScanner::new(
            Arc::new(reader),
            Arc::new(SinkRegistry::default()),
            100,
        );

        let summary = scanner.scan(LP_MINT, None).await;
        assert_eq!(summary.basis, RatioBasis::Unavailable);
        assert_eq!(summary.destroyed, 0.0);
    }

    #[tokio::test]
    async fn test_scan_uses_snapshot_when_history_unavailable() {
        let reader = MockReader {
            mint_data: Some(lp_mint_bytes(100_000_000_000, 9)),
            signatures: Err(()),
            txs: vec![],
            holders: Ok(vec![HolderBalance {
                address: "SinkAcc11".to_string(),
                owner: Some(SINK.to_string()),
                ui_amount: 300.0,
            }]),
            fail_tx: vec![],
        };
        let scanner = BurnScanner::new(
            Arc::new(reader),
            Arc::new(SinkRegistry::default()),
            100,
        );

        let summary = scanner.scan(LP_MINT, None).await;
        assert_eq!(summary.destroyed, 300.0);
        assert_eq!(summary.basis, RatioBasis::Estimated);
        assert_eq!(
            summary.dominant_method,
            Some(BurnMethod::BalanceZeroedHeuristic)
        );
    }

    #[tokio::test]
    async fn test_unreadable_mint_state_flags_ratio_unavailable() {
        // The LP mint account is unreadable but history works: a small burn
        // must not estimate against a zero denominator and land in the
        // highest-destruction band.
        let reader = MockReader {
            mint_data: None,
            signatures: Ok(vec!["Good1".to_string()]),
            txs: vec![create_test_tx("Good1", vec![burn_instruction(5.0)])],
            holders: Ok(vec![]),
            fail_tx: vec![],
        };
        let scanner = BurnScanner::new(
            Arc::new(reader),
            Arc::new(SinkRegistry::default()),
            100,
        );

        let summary = scanner.scan(LP_MINT, None).await;
        assert_eq!(summary.destroyed, 5.0);
        assert_eq!(summary.ratio_pct, 0.0);
        assert_eq!(summary.basis, RatioBasis::Unavailable);
        assert_eq!(summary.events.len(), 1);
    }
}
