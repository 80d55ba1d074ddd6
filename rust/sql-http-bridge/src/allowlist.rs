//! Server-side mapping from opaque procedure keys to stored procedure names.

use std::collections::HashMap;
use tracing::warn;

/// Immutable after startup; the only source of procedure names that reach SQL text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    procs: HashMap<String, String>,
}

impl Allowlist {
    /// Parses the `allowed_procs` setting: comma-separated `key:procedure` pairs.
    ///
    /// Pairs without a `:` are ignored, as are pairs whose key or procedure is empty.
    /// When a key repeats, the last pair wins.
    pub fn parse(raw: &str) -> Self {
        let mut procs = HashMap::new();

        for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
            let Some((key, procedure)) = pair.split_once(':') else {
                warn!(entry = pair, "ignoring allowed_procs entry without ':'");
                continue;
            };

            let (key, procedure) = (key.trim(), procedure.trim());
            if key.is_empty() || procedure.is_empty() {
                warn!(entry = pair, "ignoring incomplete allowed_procs entry");
                continue;
            }

            procs.insert(key.to_string(), procedure.to_string());
        }

        Self { procs }
    }

    /// Exact, case-sensitive lookup.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.procs.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_and_trims_whitespace() {
        let allowlist = Allowlist::parse(" sales : dbo.usp_Sales , health:dbo.usp_Health");
        assert_eq!(allowlist.len(), 2);
        assert_eq!(allowlist.resolve("sales"), Some("dbo.usp_Sales"));
        assert_eq!(allowlist.resolve("health"), Some("dbo.usp_Health"));
    }

    #[test]
    fn splits_on_first_colon_only() {
        let allowlist = Allowlist::parse("odd:proc:name");
        assert_eq!(allowlist.resolve("odd"), Some("proc:name"));
    }

    #[test]
    fn skips_malformed_entries() {
        let allowlist = Allowlist::parse("nocolon, :dbo.usp_NoKey, nokey:, ok:dbo.usp_Ok,,");
        assert_eq!(allowlist.len(), 1);
        assert_eq!(allowlist.resolve("ok"), Some("dbo.usp_Ok"));
    }

    #[test]
    fn empty_setting_yields_empty_allowlist() {
        assert!(Allowlist::parse("").is_empty());
        assert!(Allowlist::parse("   ").is_empty());
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let allowlist = Allowlist::parse("Sales:dbo.usp_Sales");
        assert_eq!(allowlist.resolve("Sales"), Some("dbo.usp_Sales"));
        assert_eq!(allowlist.resolve("sales"), None);
        assert_eq!(allowlist.resolve("Sale"), None);
        assert_eq!(allowlist.resolve("dbo.usp_Sales"), None);
    }

    #[test]
    fn later_duplicate_key_wins() {
        let allowlist = Allowlist::parse("a:dbo.first,a:dbo.second");
        assert_eq!(allowlist.resolve("a"), Some("dbo.second"));
    }
}
