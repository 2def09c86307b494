//! Plain-text rendering for the CLI
//!
//! Each outcome gets one box: a highlighted value box when the best price
//! beats the consensus, a plain box otherwise. The pivot table follows.

use crate::aggregator::{EventOdds, OutcomeSummary, PivotTable};
use std::fmt::Write;

const VALUE_MARK: &str = "★ VALUE";

/// Render one event: header, outcome boxes, pivot table
pub fn render_event(event: &EventOdds) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} vs {}  [{}]  {}",
        event.home_team,
        event.away_team,
        event.market_key,
        event.commence_time.format("%Y-%m-%d %H:%M UTC")
    );

    for outcome in &event.outcomes {
        out.push_str(&render_outcome(outcome));
    }

    out.push('\n');
    out.push_str(&render_pivot(&event.pivot));
    out
}

fn render_outcome(outcome: &OutcomeSummary) -> String {
    let stats = &outcome.stats;
    if stats.is_value {
        format!(
            "  {} {}: {} @ {} (avg {}, +{}%)\n",
            VALUE_MARK,
            outcome.label,
            outcome.best_display,
            stats.max_price,
            stats.mean_price.round_dp(3),
            stats.value_premium_pct.round_dp(1)
        )
    } else {
        format!(
            "  {}: {} @ {} (avg {})\n",
            outcome.label,
            outcome.best_display,
            stats.max_price,
            stats.mean_price.round_dp(3)
        )
    }
}

/// Bookmaker x outcome grid; missing prices shown as `-`
pub fn render_pivot(pivot: &PivotTable) -> String {
    let source_width = pivot
        .rows
        .iter()
        .map(|r| r.source.chars().count())
        .max()
        .unwrap_or(0)
        .max("Bookmaker".len());
    let col_widths: Vec<usize> = pivot
        .outcomes
        .iter()
        .map(|o| o.as_str().chars().count().max(6))
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:<width$}", "Bookmaker", width = source_width);
    for (label, width) in pivot.outcomes.iter().zip(col_widths.iter().copied()) {
        let _ = write!(out, " | {:>width$}", label.as_str(), width = width);
    }
    out.push('\n');

    for row in &pivot.rows {
        let _ = write!(out, "{:<width$}", row.source, width = source_width);
        for (price, width) in row.prices.iter().zip(col_widths.iter().copied()) {
            let cell = price.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
            let _ = write!(out, " | {:>width$}", cell, width = width);
        }
        out.push('\n');
    }
    out
}
