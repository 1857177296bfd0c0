// source - Remote performance data providers
//
// The cache is generic over where series come from; the app wires in the
// HTTP client, tests wire in scripted sources.

pub mod http;

pub use http::HttpPerformanceSource;

use crate::errors::FetchError;
use crate::models::{ Granularity, PerformancePoint };
use async_trait::async_trait;

/// A remote source of portfolio performance series
///
/// Implementations perform no caching or deduplication of their own;
/// all of that is layered on top by `PerformanceCache`.
#[async_trait]
pub trait PerformanceSource: Send + Sync {
    /// Fetch the performance series for a granularity and optional
    /// asset filter. `symbols` is already canonicalized (sorted,
    /// deduplicated) by the caller; `None` means all assets.
    async fn fetch_performance(
        &self,
        granularity: Granularity,
        symbols: Option<&[String]>
    ) -> Result<Vec<PerformancePoint>, FetchError>;
}
