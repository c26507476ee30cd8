//! Where a one-shot read gets its data from

use serde::{Deserialize, Serialize};

/// Source options for one-shot reads
///
/// Configures where Firestore should fetch data from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Default behavior - try server first, fall back to cache if offline
    #[default]
    Default,

    /// Only fetch from server, fail with `Unavailable` if only cached data is available
    Server,

    /// Only fetch from local cache, never touching the network
    Cache,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_default() {
        assert_eq!(Source::default(), Source::Default);
    }

    #[test]
    fn test_source_from_config() {
        let parsed: Source = serde_json::from_str("\"server\"").unwrap();
        assert_eq!(parsed, Source::Server);
    }
}
