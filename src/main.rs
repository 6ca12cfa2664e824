use airpivot::{
    config::Config,
    fetch::{api::DEFAULT_ENDPOINT, cache::CacheKey, ApiPageSource, FetchCache},
    pivot::{filter_rows, PivotTable},
    process::{condition_options, normalize_records, NormalizedRow},
    render,
};
use anyhow::Result;
use reqwest::Client;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) configuration ────────────────────────────────────────────
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    info!(table = %config.table_name, "startup");

    let client = Client::new();
    let source = ApiPageSource::new(
        client,
        DEFAULT_ENDPOINT,
        &config.api_key,
        &config.base_id,
        &config.table_name,
    )?;
    let mut cache = FetchCache::new();
    let key = config.cache_key(DEFAULT_ENDPOINT);

    // ─── 3) first fetch ──────────────────────────────────────────────
    let mut rows = load_rows(&mut cache, &key, &source).await;
    if rows.is_empty() {
        println!("{}", render::NO_DATA_WARNING);
        return Ok(());
    }

    let mut options = condition_options(&rows);
    let mut selected: HashSet<String> = options.iter().cloned().collect();

    // ─── 4) interactive filter loop ──────────────────────────────────
    println!("{}: interactive pivot summary", config.table_name);
    let stdin = io::stdin();
    loop {
        let filtered = filter_rows(&rows, &selected);
        let pivot = PivotTable::from_rows(&filtered);
        println!();
        println!("{}", render::render_table(&pivot));
        println!();
        println!("{}", render::render_filter_menu(&options, &selected));
        print!("toggle <n> | all | none | refresh | quit > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "" => {}
            "quit" | "q" => break,
            "all" => selected = options.iter().cloned().collect(),
            "none" => selected.clear(),
            "refresh" => {
                cache.invalidate(&key);
                rows = load_rows(&mut cache, &key, &source).await;
                if rows.is_empty() {
                    println!("{}", render::NO_DATA_WARNING);
                    return Ok(());
                }
                options = condition_options(&rows);
                selected = options.iter().cloned().collect();
            }
            other => match other.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => {
                    let condition = &options[n - 1];
                    if !selected.remove(condition) {
                        selected.insert(condition.clone());
                    }
                }
                _ => println!("unrecognized command: {other}"),
            },
        }
    }

    Ok(())
}

/// Fetch through the cache and normalize. A failed fetch logs the error and
/// comes back empty: downstream stages never see partial data.
async fn load_rows(
    cache: &mut FetchCache,
    key: &CacheKey,
    source: &ApiPageSource,
) -> Vec<NormalizedRow> {
    match cache.get_or_fetch(key, source).await {
        Ok(records) => normalize_records(&records),
        Err(err) => {
            error!(error = %err, "fetch failed");
            Vec::new()
        }
    }
}
