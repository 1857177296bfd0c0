// preload.rs - Background cache warming for predicted queries
//
// After a portfolio loads, the user is likely to flip through time
// ranges and market filters. The preloader enumerates a bounded set of
// (granularity x market-filter) combinations from the current holdings
// and pushes them all through the normal request path at Low priority,
// so foreground requests always jump ahead in the dispatcher.

use super::{ PerformanceCache, Priority };
use crate::logger::{ self, LogTag };
use crate::models::{ Granularity, Holding, MarketCategory };
use std::collections::{ BTreeMap, BTreeSet };
use std::sync::atomic::Ordering;

/// One cache-warming query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadTask {
    pub granularity: Granularity,
    pub symbols: Option<Vec<String>>,
}

/// Enumerate the market-filter combinations for a set of holdings
///
/// No filter, each non-empty single category, and each pair of distinct
/// non-empty categories. The all-categories combination is never
/// generated - it would duplicate "no filter".
pub fn market_filter_combinations(holdings: &[Holding]) -> Vec<Option<Vec<String>>> {
    let mut by_category: BTreeMap<MarketCategory, BTreeSet<String>> = BTreeMap::new();
    for holding in holdings {
        by_category
            .entry(holding.market)
            .or_default()
            .insert(holding.symbol.clone());
    }

    let categories: Vec<&BTreeSet<String>> = MarketCategory::ALL_CATEGORIES
        .iter()
        .filter_map(|category| by_category.get(category))
        .collect();

    let mut combinations: Vec<Option<Vec<String>>> = vec![None];

    for symbols in &categories {
        combinations.push(Some(symbols.iter().cloned().collect()));
    }

    for i in 0..categories.len() {
        for j in i + 1..categories.len() {
            let merged: Vec<String> = categories[i]
                .union(categories[j])
                .cloned()
                .collect();
            combinations.push(Some(merged));
        }
    }

    combinations
}

/// Cross granularities with market-filter combinations
///
/// The initially loaded granularity is skipped entirely - the screen
/// that triggered the preload already holds that data.
pub fn build_preload_plan(holdings: &[Holding], initial: Granularity) -> Vec<PreloadTask> {
    let combinations = market_filter_combinations(holdings);
    let mut plan = Vec::new();

    for granularity in Granularity::ALL_GRANULARITIES {
        if granularity == initial {
            continue;
        }
        for symbols in &combinations {
            plan.push(PreloadTask {
                granularity,
                symbols: symbols.clone(),
            });
        }
    }

    plan
}

impl PerformanceCache {
    /// Warm the cache for likely-future queries
    ///
    /// Never fails: individual task failures are logged and swallowed.
    /// Re-entrant calls (e.g. a fast re-render firing twice) are dropped
    /// while a preload is still running.
    pub async fn preload_performance_data(&self, holdings: &[Holding]) {
        if self.preload_in_progress.swap(true, Ordering::SeqCst) {
            logger::debug(LogTag::Preload, "Preload already in progress, skipping");
            return;
        }

        let plan = build_preload_plan(holdings, self.settings.initial_granularity);
        logger::info(
            LogTag::Preload,
            &format!("Preloading {} combinations for {} holding(s)", plan.len(), holdings.len())
        );

        let tasks = plan.into_iter().map(|task| async move {
            let PreloadTask { granularity, symbols } = task;
            match self.get_performance_data(granularity, symbols.as_deref(), Priority::Low).await {
                Ok(_) => true,
                Err(e) => {
                    logger::debug(
                        LogTag::Preload,
                        &format!(
                            "Preload task {} failed: {}",
                            super::CacheKey::derive(granularity, symbols.as_deref()).label(),
                            e
                        )
                    );
                    false
                }
            }
        });

        let results = futures::future::join_all(tasks).await;
        let failed = results.iter().filter(|ok| !**ok).count();

        if failed > 0 {
            logger::warning(
                LogTag::Preload,
                &format!("Preload finished with {} of {} task(s) failed", failed, results.len())
            );
        } else {
            logger::info(
                LogTag::Preload,
                &format!("Preload complete, {} task(s) warmed", results.len())
            );
        }

        self.preload_in_progress.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_holdings() -> Vec<Holding> {
        vec![
            Holding::new("AAPL", MarketCategory::Stocks),
            Holding::new("MSFT", MarketCategory::Stocks),
            Holding::new("BTC", MarketCategory::Crypto),
            Holding::new("XAU", MarketCategory::Metals)
        ]
    }

    #[test]
    fn test_three_categories_give_seven_combinations() {
        let combos = market_filter_combinations(&sample_holdings());

        // no filter + 3 singles + 3 pairs
        assert_eq!(combos.len(), 7);
        assert!(combos.contains(&None));
        assert!(combos.contains(&Some(vec!["AAPL".to_string(), "MSFT".to_string()])));
        assert!(combos.contains(&Some(vec!["BTC".to_string()])));
        assert!(combos.contains(&Some(vec!["XAU".to_string()])));
        assert!(
            combos.contains(&Some(vec!["AAPL".to_string(), "BTC".to_string(), "MSFT".to_string()]))
        );
        assert!(combos.contains(&Some(vec!["AAPL".to_string(), "MSFT".to_string(), "XAU".to_string()])));
        assert!(combos.contains(&Some(vec!["BTC".to_string(), "XAU".to_string()])));
        // The all-three combination is never enumerated
        assert!(
            !combos.contains(
                &Some(
                    vec![
                        "AAPL".to_string(),
                        "BTC".to_string(),
                        "MSFT".to_string(),
                        "XAU".to_string()
                    ]
                )
            )
        );
    }

    #[test]
    fn test_empty_categories_are_skipped() {
        let holdings = vec![Holding::new("ETH", MarketCategory::Crypto)];
        let combos = market_filter_combinations(&holdings);
        assert_eq!(combos, vec![None, Some(vec!["ETH".to_string()])]);
    }

    #[test]
    fn test_no_holdings_still_warms_unfiltered() {
        let combos = market_filter_combinations(&[]);
        assert_eq!(combos, vec![None]);
    }

    #[test]
    fn test_plan_excludes_initial_granularity() {
        let holdings = vec![
            Holding::new("AAPL", MarketCategory::Stocks),
            Holding::new("BTC", MarketCategory::Crypto)
        ];
        let plan = build_preload_plan(&holdings, Granularity::All);

        // 4 granularities x (no filter + 2 singles + 1 pair)
        assert_eq!(plan.len(), 16);
        assert!(plan.iter().all(|task| task.granularity != Granularity::All));

        let week_tasks: Vec<&PreloadTask> = plan
            .iter()
            .filter(|task| task.granularity == Granularity::OneWeek)
            .collect();
        assert_eq!(week_tasks.len(), 4);
        assert!(
            week_tasks
                .iter()
                .any(|task| task.symbols == Some(vec!["AAPL".to_string(), "BTC".to_string()]))
        );
    }

    #[test]
    fn test_duplicate_symbols_collapse_per_category() {
        let holdings = vec![
            Holding::new("BTC", MarketCategory::Crypto),
            Holding::new("BTC", MarketCategory::Crypto)
        ];
        let combos = market_filter_combinations(&holdings);
        assert_eq!(combos, vec![None, Some(vec!["BTC".to_string()])]);
    }
}
