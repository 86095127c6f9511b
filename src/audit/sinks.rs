//! Registry of known sink addresses.
//!
//! Funds at these addresses are treated as unrecoverable for risk scoring.
//! The registry is read-only once built and shared across concurrent audits.

use std::collections::HashSet;

/// Addresses the ecosystem uses as permanent token sinks.
const DEFAULT_SINKS: &[&str] = &[
    // Solana incinerator
    "1nc1nerator11111111111111111111111111111111",
    // System program id, a common "nowhere" destination
    "11111111111111111111111111111111",
];

/// Static set of null-destination identifiers.
#[derive(Debug, Clone)]
pub struct SinkRegistry {
    addresses: HashSet<String>,
}

impl SinkRegistry {
    /// Registry with the built-in sink set plus operator-supplied extras.
    pub fn new(extra_sinks: &[String]) -> Self {
        let mut addresses: HashSet<String> =
            DEFAULT_SINKS.iter().map(|s| s.to_string()).collect();
        addresses.extend(extra_sinks.iter().cloned());
        Self { addresses }
    }

    /// Whether an address is a known sink.
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    /// Number of registered sinks.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sinks_present() {
        let registry = SinkRegistry::default();
        assert!(registry.contains("1nc1nerator11111111111111111111111111111111"));
        assert!(registry.contains("11111111111111111111111111111111"));
        assert!(!registry.contains("SomeRandomWallet"));
    }

    #[test]
    fn test_extra_sinks_extend_defaults() {
        let registry = SinkRegistry::new(&["CustomSink111".to_string()]);
        assert!(registry.contains("CustomSink111"));
        assert_eq!(registry.len(), DEFAULT_SINKS.len() + 1);
    }
}
