//! Odds aggregation
//!
//! Turns raw per-bookmaker listings into outcome buckets, computes best and
//! mean price per outcome, and flags value prices.
//!
//! ```text
//! OddsEvent → OutcomeBuckets (one market key) → OutcomeStats per label → EventOdds
//! ```
//!
//! Malformed records are skipped at the smallest unit (outcome, bookmaker,
//! event) and never abort the rest of the response.

mod pivot;
mod stats;
#[cfg(test)]
mod tests;

pub use pivot::{PivotRow, PivotTable};
pub use stats::{BestSources, OutcomeStats};

use crate::config::ValueConfig;
use crate::types::{parse_commence_time, valid_entries, Bookmaker, OddsEvent, OutcomeLabel, Quote};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome label → quotes, in first-seen order. Never holds an empty entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeBuckets {
    entries: Vec<(OutcomeLabel, Vec<Quote>)>,
}

impl OutcomeBuckets {
    /// Bucket every outcome of every listing whose key equals `market_key`.
    ///
    /// The source is the bookmaker title (falling back to its key). Outcomes
    /// without a name or a positive price are skipped. Duplicate quotes from
    /// one bookmaker are kept.
    pub fn from_bookmakers<'a>(
        bookmakers: impl IntoIterator<Item = &'a Bookmaker>,
        market_key: &str,
    ) -> Self {
        let mut buckets = Self::default();

        for bookmaker in bookmakers {
            let Some(source) = bookmaker.title.get().or_else(|| bookmaker.key.get()) else {
                debug!("Skipping bookmaker without a title");
                continue;
            };

            let listings = valid_entries(&bookmaker.markets)
                .filter(|m| m.key.get().map(String::as_str) == Some(market_key));

            for listing in listings {
                for outcome in valid_entries(&listing.outcomes) {
                    let (Some(name), Some(price)) = (outcome.name.get(), outcome.price.get()) else {
                        debug!(source = %source, "Skipping outcome with missing name or price");
                        continue;
                    };
                    if *price <= Decimal::ZERO {
                        debug!(source = %source, outcome = %name, price = %price, "Skipping non-positive price");
                        continue;
                    }

                    let label = OutcomeLabel::new(name, outcome.point.get().copied());
                    buckets.push(label, Quote::new(source.as_str(), *price));
                }
            }
        }

        buckets
    }

    fn push(&mut self, label: OutcomeLabel, quote: Quote) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, quotes)) => quotes.push(quote),
            None => self.entries.push((label, vec![quote])),
        }
    }

    pub fn get(&self, label: &OutcomeLabel) -> Option<&[Quote]> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, quotes)| quotes.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutcomeLabel, &[Quote])> {
        self.entries.iter().map(|(l, q)| (l, q.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One outcome as handed to rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub label: OutcomeLabel,
    pub quotes: Vec<Quote>,
    #[serde(flatten)]
    pub stats: OutcomeStats,
    pub best_display: BestSources,
}

/// Aggregated view of one event for the selected market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOdds {
    pub id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    pub market_key: String,
    pub outcomes: Vec<OutcomeSummary>,
    pub pivot: PivotTable,
}

impl EventOdds {
    pub fn value_outcomes(&self) -> impl Iterator<Item = &OutcomeSummary> {
        self.outcomes.iter().filter(|o| o.stats.is_value)
    }
}

/// Aggregate one event. `None` when the event is malformed or has no usable
/// quotes for `market_key`; such events are not rendered.
pub fn aggregate_event(event: &OddsEvent, market_key: &str, cfg: &ValueConfig) -> Option<EventOdds> {
    let (Some(home_team), Some(away_team)) = (event.home_team.get(), event.away_team.get()) else {
        debug!(id = ?event.id.get(), "Skipping event without participants");
        return None;
    };
    let Some(commence_time) = event.commence_time.get().and_then(|s| parse_commence_time(s)) else {
        debug!(home = %home_team, away = %away_team, "Skipping event with invalid commence_time");
        return None;
    };

    let buckets = OutcomeBuckets::from_bookmakers(valid_entries(&event.bookmakers), market_key);
    if buckets.is_empty() {
        debug!(home = %home_team, away = %away_team, market = market_key, "No quotes for market");
        return None;
    }

    let outcomes: Vec<OutcomeSummary> = buckets
        .iter()
        .filter_map(|(label, quotes)| {
            let stats = OutcomeStats::compute(quotes, cfg.premium_threshold)?;
            Some(OutcomeSummary {
                label: label.clone(),
                quotes: quotes.to_vec(),
                best_display: stats.best_sources_display(cfg.max_best_sources),
                stats,
            })
        })
        .collect();
    if outcomes.is_empty() {
        debug!(home = %home_team, away = %away_team, market = market_key, "No outcome with usable prices");
        return None;
    }

    Some(EventOdds {
        id: event.id.get().cloned(),
        home_team: home_team.clone(),
        away_team: away_team.clone(),
        commence_time,
        market_key: market_key.to_string(),
        outcomes,
        pivot: PivotTable::from_buckets(&buckets),
    })
}

/// Aggregate a whole response, keeping upstream order
pub fn aggregate_events(events: &[OddsEvent], market_key: &str, cfg: &ValueConfig) -> Vec<EventOdds> {
    events
        .iter()
        .filter_map(|event| aggregate_event(event, market_key, cfg))
        .collect()
}
