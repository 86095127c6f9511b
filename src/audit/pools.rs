//! LP-pool resolution for a token.
//!
//! Thin filter over the pool-metadata provider: a token's pools are exactly
//! the provider entries whose pair includes it, in provider order.

use crate::chain::PoolProvider;
use crate::errors::AuditError;
use crate::types::LpPool;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Resolves the pools referencing a token.
pub struct PoolResolver {
    provider: Arc<dyn PoolProvider>,
}

impl PoolResolver {
    pub fn new(provider: Arc<dyn PoolProvider>) -> Self {
        Self { provider }
    }

    /// Pools whose pair includes `token`, matched by exact identifier
    /// equality on either side. No pools found is an empty list, not an
    /// error; a provider failure surfaces as `CollaboratorUnavailable` and
    /// the orchestrator treats it as zero pools.
    #[instrument(skip(self), fields(token = %token))]
    pub async fn resolve(&self, token: &str) -> Result<Vec<LpPool>, AuditError> {
        let pools = self.provider.list_pools().await?;
        let matches: Vec<LpPool> = pools
            .into_iter()
            .filter(|pool| pool.base_mint == token || pool.quote_mint == token)
            .collect();
        debug!("Resolved {} pools for {}", matches.len(), token);
        Ok(matches)
    }
}
