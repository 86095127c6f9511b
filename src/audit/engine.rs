//! Audit orchestration.
//!
//! One token's audit walks `Init -> DecodeMint -> ResolvePools ->
//! ScanBurns -> Score -> Done`. Only the decode stage can fail the audit;
//! every later stage degrades in place. The engine owns the collaborator
//! handles explicitly, so there is no process-wide state and concurrent
//! audits share nothing mutable.

use crate::audit::burns::BurnScanner;
use crate::audit::mint::decode_mint_account;
use crate::audit::pools::PoolResolver;
use crate::audit::scorer::{RiskScorer, RiskSignals};
use crate::audit::sinks::SinkRegistry;
use crate::chain::{ChainReader, HolderBalance, PoolProvider};
use crate::config::AuditConfig;
use crate::errors::AuditError;
use crate::types::{
    AuditStage, BurnSummary, ConcentrationStats, HolderShare, LpPool, RiskReport,
    TokenDescriptor,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// Context object driving audits: collaborator handles, sink registry, and
/// tuning, with no implicit globals.
pub struct AuditEngine {
    chain: Arc<dyn ChainReader>,
    resolver: PoolResolver,
    scanner: BurnScanner,
    scorer: RiskScorer,
    config: AuditConfig,
    // Token-level and pool-level parallelism draw from separate pools: an
    // audit holds its permit across the whole run, so its pool scans must
    // never compete with it for the same semaphore.
    audit_fan_out: Arc<Semaphore>,
    scan_fan_out: Arc<Semaphore>,
}

impl AuditEngine {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        pools: Arc<dyn PoolProvider>,
        config: AuditConfig,
    ) -> Self {
        let sinks = Arc::new(SinkRegistry::new(&config.extra_sinks));
        let scanner = BurnScanner::new(chain.clone(), sinks, config.history_depth);
        let scorer = RiskScorer::new(config.weights.clone(), config.thresholds.clone());
        let limit = config.fan_out.max(1);
        Self {
            chain,
            resolver: PoolResolver::new(pools),
            scanner,
            scorer,
            config,
            audit_fan_out: Arc::new(Semaphore::new(limit)),
            scan_fan_out: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Audit a single token. Fails only when the mint account is missing or
    /// malformed; collaborator outages reduce signal confidence instead.
    #[instrument(skip(self), fields(mint = %mint))]
    pub async fn audit(&self, mint: &str) -> Result<RiskReport, AuditError> {
        let mut stage = AuditStage::Init;
        debug!("Audit stage {:?}", stage);

        stage = AuditStage::DecodeMint;
        debug!("Audit stage {:?}", stage);
        let token = self.decode_mint(mint).await.map_err(|e| {
            warn!("Audit failed at {:?} for {}: {}", AuditStage::Failed, mint, e);
            e
        })?;

        stage = AuditStage::ResolvePools;
        debug!("Audit stage {:?}", stage);
        let pools = match self.resolver.resolve(mint).await {
            Ok(pools) => pools,
            Err(e) => {
                // Provider outage is not fatal; the audit continues with
                // zero pools and the score reflects what is known.
                warn!("Pool resolution degraded for {}: {}", mint, e);
                Vec::new()
            }
        };

        stage = AuditStage::ScanBurns;
        debug!("Audit stage {:?}", stage);
        let burn_summaries = self.scan_pools(&pools).await;
        let concentration = self.holder_concentration(&token).await;

        stage = AuditStage::Score;
        debug!("Audit stage {:?}", stage);
        let signals = RiskSignals::collect(
            &token,
            &burn_summaries,
            pools.len(),
            concentration.as_ref().map(|c| c.top_holder_pct),
        );
        let (score, category) = self.scorer.score(&signals);

        stage = AuditStage::Done;
        debug!("Audit stage {:?}", stage);
        info!("Audited {}: score {} ({})", mint, score, category);

        Ok(RiskReport {
            token,
            pool_count: pools.len(),
            burn_summaries,
            concentration,
            score,
            category,
            generated_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Audit a batch. Each token runs its own independent state machine
    /// under the fan-out limit; one failure never aborts the others.
    #[instrument(skip(self, mints), fields(count = mints.len()))]
    pub async fn audit_many(
        self: &Arc<Self>,
        mints: &[String],
    ) -> Vec<(String, Result<RiskReport, AuditError>)> {
        let mut tasks = JoinSet::new();
        for (index, mint) in mints.iter().enumerate() {
            let engine = self.clone();
            let mint = mint.clone();
            let permit = self.audit_fan_out.clone();
            tasks.spawn(async move {
                // Acquire never fails while the semaphore lives in the engine
                let _permit = permit.acquire_owned().await.ok();
                let result = engine.audit(&mint).await;
                (index, mint, result)
            });
        }

        let mut results = Vec::with_capacity(mints.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => warn!("Audit task panicked: {}", e),
            }
        }
        // Join order is completion order; the carried input index restores
        // caller order, including duplicate mint arguments.
        results.sort_by_key(|(index, _, _)| *index);
        results
            .into_iter()
            .map(|(_, mint, result)| (mint, result))
            .collect()
    }

    async fn decode_mint(&self, mint: &str) -> Result<TokenDescriptor, AuditError> {
        let data = self
            .chain
            .get_account_data(mint)
            .await?
            .ok_or_else(|| AuditError::NotFound(mint.to_string()))?;
        decode_mint_account(mint, &data)
    }

    /// Scan every resolved pool's LP mint concurrently under the fan-out
    /// limit. Pools with no resolved LP mint get an unavailable summary so
    /// the report still accounts for them.
    async fn scan_pools(&self, pools: &[LpPool]) -> Vec<BurnSummary> {
        let mut tasks = JoinSet::new();
        let mut summaries = Vec::new();

        for pool in pools {
            let Some(lp_mint) = pool.lp_mint.clone() else {
                debug!("Pool {} has no resolved LP mint", pool.pool_address);
                summaries.push(BurnSummary::unavailable(format!(
                    "unresolved:{}",
                    pool.pool_address
                )));
                continue;
            };
            let scanner = self.scanner.clone();
            let reported_supply = pool.lp_supply;
            let permit = self.scan_fan_out.clone();
            tasks.spawn(async move {
                let _permit = permit.acquire_owned().await.ok();
                scanner.scan(&lp_mint, reported_supply).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!("Burn scan task panicked: {}", e),
            }
        }
        summaries.sort_by(|a, b| a.lp_mint.cmp(&b.lp_mint));
        summaries
    }

    /// Top-N holder concentration. A failed holder read yields `None`; the
    /// concentration term is then simply absent from the score.
    async fn holder_concentration(&self, token: &TokenDescriptor) -> Option<ConcentrationStats> {
        let holders = match self.chain.get_largest_holders(&token.address).await {
            Ok(holders) => holders,
            Err(e) => {
                warn!("Holder snapshot degraded for {}: {}", token.address, e);
                return None;
            }
        };
        Some(concentration_from_holders(
            &holders,
            token.display_supply(),
            self.config.top_holder_count,
        ))
    }
}

/// Compute top-N concentration from a largest-first holder snapshot.
fn concentration_from_holders(
    holders: &[HolderBalance],
    display_supply: f64,
    top_n: usize,
) -> ConcentrationStats {
    let top_holders: Vec<HolderShare> = holders
        .iter()
        .take(top_n)
        .map(|holder| HolderShare {
            address: holder.address.clone(),
            owner: holder.owner.clone(),
            amount: holder.ui_amount,
            pct_of_supply: if display_supply > 0.0 {
                holder.ui_amount / display_supply * 100.0
            } else {
                0.0
            },
        })
        .collect();
    let top_holder_pct = top_holders.iter().map(|h| h.pct_of_supply).sum();
    ConcentrationStats {
        holder_count: holders.len(),
        top_holder_pct,
        top_holders,
    }
}
