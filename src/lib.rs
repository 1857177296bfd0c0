pub mod config;
pub mod errors;
pub mod logger;
pub mod models;
pub mod performance;
pub mod source;

// Common imports that are used throughout the project
pub use crate::config::CacheSettings;
pub use crate::errors::FetchError;
pub use crate::models::{ Granularity, Holding, MarketCategory, PerformancePoint, SharedSeries };
pub use crate::performance::{
    global_cache,
    init_global_cache,
    CacheKey,
    CacheStats,
    PerformanceCache,
    Priority,
};
pub use crate::source::{ HttpPerformanceSource, PerformanceSource };
