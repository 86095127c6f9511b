//! Error taxonomy for the audit engine.
//!
//! Only a malformed or missing mint account is fatal, and then only to that
//! single token's audit. Everything else is absorbed locally and shows up as
//! a reduced-confidence field in the report.

use thiserror::Error;

/// Engine-level errors. Estimation fallback is deliberately not here: it is
/// data quality, surfaced via `RatioBasis::Estimated`, not a failure.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The mint account bytes do not satisfy the fixed 82-byte layout.
    /// Fatal to the affected token's audit.
    #[error("malformed mint account {address}: {reason}")]
    MalformedAccount { address: String, reason: String },

    /// An account or transaction is absent on chain. For the mint account
    /// this fails the token's audit; for transactions it is a normal empty
    /// result the caller skips over.
    #[error("account or transaction {0} not found")]
    NotFound(String),

    /// A collaborator (RPC node or pool-metadata API) could not be reached
    /// or returned garbage. Recoverable: the affected signal degrades to
    /// zero/unknown instead of aborting the audit.
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),
}

impl AuditError {
    /// Shorthand used at collaborator call sites.
    pub fn unavailable(context: impl Into<String>) -> Self {
        AuditError::CollaboratorUnavailable(context.into())
    }

    /// Whether the orchestrator may continue the audit after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AuditError::CollaboratorUnavailable(_))
    }
}
