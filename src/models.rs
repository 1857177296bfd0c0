// models.rs - Core data types shared across the crate
//
// Wire shapes match the portfolio API: granularities travel as their
// short range codes ("1W", "YTD", ...) and performance points carry
// decimal amounts as strings to avoid float drift in the UI.

use serde::{ Deserialize, Serialize };
use std::fmt;
use std::sync::Arc;

/// Time range of a performance series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl Granularity {
    /// Every supported granularity, in display order
    pub const ALL_GRANULARITIES: [Granularity; 5] = [
        Granularity::OneWeek,
        Granularity::OneMonth,
        Granularity::YearToDate,
        Granularity::OneYear,
        Granularity::All,
    ];

    /// Range code as the API expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::OneWeek => "1W",
            Granularity::OneMonth => "1M",
            Granularity::YearToDate => "YTD",
            Granularity::OneYear => "1Y",
            Granularity::All => "ALL",
        }
    }

    /// Parse a range code, case-insensitively
    pub fn parse(value: &str) -> Option<Granularity> {
        match value.trim().to_ascii_uppercase().as_str() {
            "1W" => Some(Granularity::OneWeek),
            "1M" => Some(Granularity::OneMonth),
            "YTD" => Some(Granularity::YearToDate),
            "1Y" => Some(Granularity::OneYear),
            "ALL" => Some(Granularity::All),
            _ => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market a holding belongs to; drives the preload filter combinations
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum MarketCategory {
    Stocks,
    Crypto,
    Metals,
}

impl MarketCategory {
    pub const ALL_CATEGORIES: [MarketCategory; 3] = [
        MarketCategory::Stocks,
        MarketCategory::Crypto,
        MarketCategory::Metals,
    ];
}

/// One asset in the portfolio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub market: MarketCategory,
}

impl Holding {
    pub fn new(symbol: &str, market: MarketCategory) -> Self {
        Self {
            symbol: symbol.to_string(),
            market,
        }
    }
}

/// One point of a performance series
///
/// Amounts stay as decimal strings end to end; the cache never does
/// arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub date: String,
    pub cost: String,
    pub value: String,
    pub returns: String,
}

/// A cached series is shared by reference across every waiting caller
pub type SharedSeries = Arc<Vec<PerformancePoint>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_codes_round_trip() {
        for granularity in Granularity::ALL_GRANULARITIES {
            assert_eq!(Granularity::parse(granularity.as_str()), Some(granularity));
        }
        assert_eq!(Granularity::parse("ytd"), Some(Granularity::YearToDate));
        assert_eq!(Granularity::parse("2W"), None);

        let encoded = serde_json::to_string(&Granularity::OneWeek).unwrap();
        assert_eq!(encoded, "\"1W\"");
    }

    #[test]
    fn test_holding_deserializes_from_api_shape() {
        let holding: Holding = serde_json
            ::from_str(r#"{"symbol": "BTC", "market": "crypto"}"#)
            .unwrap();
        assert_eq!(holding, Holding::new("BTC", MarketCategory::Crypto));
    }
}
