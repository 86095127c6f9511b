//! Deterministic risk scoring.
//!
//! Pure function of the collected signals; no I/O. The weights and category
//! thresholds come from configuration so operators can retune them without
//! touching the decoder or scanner.

use crate::config::{CategoryThresholds, RiskWeights};
use crate::types::{BurnSummary, RatioBasis, RiskCategory, TokenDescriptor};
use tracing::debug;

/// Signals feeding one scoring pass.
#[derive(Debug, Clone, Default)]
pub struct RiskSignals {
    /// Mint authority has not been revoked
    pub mint_authority_active: bool,
    /// Freeze authority has not been revoked
    pub freeze_authority_active: bool,
    /// Pools referencing the token
    pub pool_count: usize,
    /// Best (highest) LP destruction ratio across pools, percent.
    /// `None` when no pool produced a usable summary.
    pub best_burn_ratio_pct: Option<f64>,
    /// Combined top-N holder share, percent of supply
    pub top_holder_pct: Option<f64>,
}

impl RiskSignals {
    /// Collect signals from the audit artifacts. Exact and estimated ratios
    /// feed the formula identically; the distinction stays visible on the
    /// summaries themselves.
    pub fn collect(
        token: &TokenDescriptor,
        summaries: &[BurnSummary],
        pool_count: usize,
        top_holder_pct: Option<f64>,
    ) -> Self {
        let best_burn_ratio_pct = summaries
            .iter()
            .filter(|s| s.basis != RatioBasis::Unavailable)
            .map(|s| s.ratio_pct)
            .fold(None, |best: Option<f64>, ratio| {
                Some(best.map_or(ratio, |b| b.max(ratio)))
            });
        Self {
            mint_authority_active: token.mint_authority.is_some(),
            freeze_authority_active: token.freeze_authority.is_some(),
            pool_count,
            best_burn_ratio_pct,
            top_holder_pct,
        }
    }
}

/// Weighted, additive risk scorer.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    weights: RiskWeights,
    thresholds: CategoryThresholds,
}

impl RiskScorer {
    pub fn new(mut weights: RiskWeights, thresholds: CategoryThresholds) -> Self {
        // Bands are matched highest ratio first; order them once here so
        // scoring iterates a ready slice.
        weights.burn_ratio_bands.sort_by(|a, b| {
            b.min_ratio_pct
                .partial_cmp(&a.min_ratio_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { weights, thresholds }
    }

    /// Score and categorize. The result is always in [0, 100].
    pub fn score(&self, signals: &RiskSignals) -> (u8, RiskCategory) {
        let mut score: u32 = 0;

        if signals.mint_authority_active {
            score += self.weights.mint_authority_active as u32;
        }
        if signals.freeze_authority_active {
            score += self.weights.freeze_authority_active as u32;
        }

        // The LP-destruction term only exists when pools exist; with zero
        // pools there is no liquidity to have burned.
        if signals.pool_count > 0 {
            let ratio = signals.best_burn_ratio_pct.unwrap_or(0.0);
            score += self.burn_band_points(ratio) as u32;
        }

        if let Some(pct) = signals.top_holder_pct {
            if pct > self.weights.concentration_major_pct {
                score += self.weights.concentration_major as u32;
            } else if pct > self.weights.concentration_minor_pct {
                score += self.weights.concentration_minor as u32;
            }
        }

        let score = score.min(100) as u8;
        let category = self.categorize(score);
        debug!("Scored {:?} -> {} ({})", signals, score, category);
        (score, category)
    }

    /// First matching band over the pre-sorted table; higher burn ratios
    /// never contribute more points than lower ones.
    fn burn_band_points(&self, ratio_pct: f64) -> u8 {
        for band in &self.weights.burn_ratio_bands {
            if ratio_pct >= band.min_ratio_pct {
                return band.points;
            }
        }
        self.weights.burn_ratio_fallback
    }

    /// Map a score to its category via the configured thresholds.
    pub fn categorize(&self, score: u8) -> RiskCategory {
        if score >= self.thresholds.critical {
            RiskCategory::Critical
        } else if score >= self.thresholds.high {
            RiskCategory::High
        } else if score >= self.thresholds.medium {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(RiskWeights::default(), CategoryThresholds::default())
    }
}
