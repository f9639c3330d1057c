//! Handler functions for `vitrine index` and `vitrine search`.

use std::fmt::Write as _;
use vitrine_core::{Error, Result};
use vitrine_search::{FreshnessReport, IndexReport, SearchResponse};

use crate::state::AppState;

// ============================================================================
// Handlers
// ============================================================================

/// Reindex everything, or with `check`, report freshness only.
pub async fn handle_index(state: &AppState, check: bool) -> Result<()> {
    if check {
        let report = state.indexer().check_freshness().await?;
        print!("{}", format_freshness(&report));
        return Ok(());
    }

    let report = state.indexer().reindex_all().await?;
    print!("{}", format_index_report(&report));
    Ok(())
}

/// Run one query and print the results.
pub async fn handle_search(state: &AppState, query: &str, as_json: bool) -> Result<()> {
    let response = state.router().search(query).await?;
    if as_json {
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| Error::operation(format!("failed to render response: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", format_response(&response));
    }
    Ok(())
}

// ============================================================================
// Formatting
// ============================================================================

fn format_index_report(report: &IndexReport) -> String {
    let mut out = String::new();
    for (collection, indexed) in report.indexed.iter() {
        let failed = report.failed.get(collection);
        let _ = write!(out, "{:<10} {indexed:>5} indexed", collection.key());
        if *failed > 0 {
            let _ = write!(out, " ({failed} failed)");
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "Total: {} records in {}ms",
        report.indexed.total(),
        report.duration_ms
    );
    out
}

fn format_freshness(report: &FreshnessReport) -> String {
    let mut out = String::new();
    for (collection, counts) in report.iter() {
        let _ = writeln!(
            out,
            "{:<10} fresh {:>5}  stale {:>5}  missing {:>5}",
            collection.key(),
            counts.fresh,
            counts.stale,
            counts.missing
        );
    }
    if report.iter().all(|(_, counts)| counts.is_fresh()) {
        out.push_str("Index is up to date\n");
    } else {
        out.push_str("Index is stale; run `vitrine index` to refresh\n");
    }
    out
}

fn format_response(response: &SearchResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Mode: {}", response.mode());
    for (collection, hits) in response.results().iter() {
        if hits.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}:", collection.key());
        for hit in hits {
            match hit.score {
                Some(score) => {
                    let _ = writeln!(out, "  {:.3}  {}  {}", score, hit.title, hit.locator);
                }
                None => {
                    let _ = writeln!(out, "  {}  {}", hit.title, hit.locator);
                }
            }
        }
    }
    if response.total() == 0 {
        out.push_str("No results\n");
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
