// key.rs - Canonical cache key derivation
//
// Two requests for the same granularity and the same asset set must hit
// the same cache entry and the same in-flight fetch, regardless of the
// order symbols were supplied in. Absence of a filter ("all assets") is
// its own key state and never collides with a concrete subset.

use crate::models::Granularity;

/// Canonical (granularity, sorted-asset-subset-or-none) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub granularity: Granularity,
    /// Sorted, deduplicated symbol list; None means no filter
    pub symbols: Option<Vec<String>>,
}

impl CacheKey {
    /// Derive the canonical key for a request
    ///
    /// An empty symbol slice normalizes to "no filter" - the UI sends it
    /// when every market toggle is off, which means "show everything".
    pub fn derive(granularity: Granularity, symbols: Option<&[String]>) -> Self {
        let symbols = match symbols {
            None => None,
            Some(list) if list.is_empty() => None,
            Some(list) => {
                let mut canonical: Vec<String> = list.to_vec();
                canonical.sort();
                canonical.dedup();
                Some(canonical)
            }
        };

        Self {
            granularity,
            symbols,
        }
    }

    /// Canonical string form, used in log output
    pub fn label(&self) -> String {
        match &self.symbols {
            None => format!("{}:all", self.granularity),
            Some(symbols) => format!("{}:{}", self.granularity, symbols.join(",")),
        }
    }
}
