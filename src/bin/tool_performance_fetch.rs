/// Performance Fetch Tool
///
/// Exercises the performance cache against a live API: fetches one
/// series, optionally preloads from a holdings JSON file, then prints
/// cache statistics.
///
/// Usage: cargo run --bin tool_performance_fetch -- --base-url <URL> --range 1M

use anyhow::{ anyhow, Context, Result };
use clap::{ Arg, ArgAction, Command };
use foliotrack::logger::{ self, log, LogTag };
use foliotrack::{
    init_global_cache,
    Granularity,
    Holding,
    HttpPerformanceSource,
    PerformanceCache,
    Priority,
};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    logger::init();

    let matches = Command::new("Performance Fetch Tool")
        .version("1.0")
        .about("Fetch portfolio performance series through the cache")
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Base URL of the portfolio API")
                .required(true)
        )
        .arg(
            Arg::new("range")
                .short('r')
                .long("range")
                .value_name("RANGE")
                .help("Granularity to fetch (1W, 1M, YTD, 1Y, ALL)")
                .default_value("1M")
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("SYMBOLS")
                .help("Comma-separated asset filter, e.g. BTC,ETH")
                .required(false)
        )
        .arg(
            Arg::new("holdings")
                .long("holdings")
                .value_name("FILE")
                .help("Holdings JSON file to preload the cache from")
                .required(false)
        )
        .arg(
            Arg::new("repeat")
                .long("repeat")
                .help("Fetch twice to demonstrate the cache hit")
                .action(ArgAction::SetTrue)
        )
        .get_matches();

    let base_url = matches.get_one::<String>("base-url").unwrap();
    let range = matches.get_one::<String>("range").unwrap();
    let assets = matches.get_one::<String>("assets");
    let holdings_path = matches.get_one::<String>("holdings");
    let repeat = matches.get_flag("repeat");

    log(LogTag::System, "START", "Performance Fetch Tool");

    if let Err(e) = run(base_url, range, assets, holdings_path, repeat).await {
        logger::error(LogTag::System, &format!("{:#}", e));
        logger::flush();
        process::exit(1);
    }

    logger::flush();
}

async fn run(
    base_url: &str,
    range: &str,
    assets: Option<&String>,
    holdings_path: Option<&String>,
    repeat: bool
) -> Result<()> {
    let granularity = Granularity::parse(range).ok_or_else(||
        anyhow!("Unrecognized range '{}', expected one of 1W, 1M, YTD, 1Y, ALL", range)
    )?;

    let symbols: Option<Vec<String>> = assets.map(|list|
        list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    );

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;
    let source = Arc::new(HttpPerformanceSource::new(client, base_url));
    let cache = PerformanceCache::with_defaults(source);
    init_global_cache(Arc::clone(&cache));

    if let Some(path) = holdings_path {
        let raw = std::fs
            ::read_to_string(path)
            .with_context(|| format!("Failed to read holdings file {}", path))?;
        let holdings: Vec<Holding> = serde_json
            ::from_str(&raw)
            .context("Holdings file is not a JSON array of {symbol, market}")?;
        cache.preload_performance_data(&holdings).await;
    }

    let series = cache
        .get_performance_data(granularity, symbols.as_deref(), Priority::High).await
        .context("Fetch failed")?;

    log(
        LogTag::Fetch,
        "SUCCESS",
        &format!("Received {} points for range {}", series.len(), granularity)
    );
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        log(
            LogTag::Fetch,
            "INFO",
            &format!(
                "{}: value {} -> {}: value {} (returns {})",
                first.date,
                first.value,
                last.date,
                last.value,
                last.returns
            )
        );
    }

    if repeat {
        cache.get_performance_data(granularity, symbols.as_deref(), Priority::High).await?;
        log(LogTag::Cache, "INFO", "Second fetch answered from cache");
    }

    let stats = cache.cache_stats();
    log(
        LogTag::Cache,
        "INFO",
        &format!(
            "Stats: {} entries ({} valid), {} active, {} queued",
            stats.total_entries,
            stats.valid_entries,
            stats.active_requests,
            stats.queued_requests
        )
    );

    cache.shutdown();
    Ok(())
}
