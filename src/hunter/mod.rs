//! Odds search
//!
//! One search is one user action: check the credential, check the quota,
//! fetch odds for the selected market across regions, aggregate. Failures end
//! the current action only; nothing is retried.


use crate::aggregator::{aggregate_events, EventOdds};
use crate::client::OddsSource;
use crate::config::ValueConfig;
use crate::error::{HunterError, Result};
use crate::market::MarketSelection;
use crate::types::{QuotaStatus, Region, Sport};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a search needs, passed explicitly per call
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub api_key: String,
    pub sport: String,
    pub market: MarketSelection,
    pub regions: Vec<Region>,
}

impl SearchRequest {
    pub fn new(api_key: impl Into<String>, sport: impl Into<String>, market: MarketSelection) -> Self {
        Self {
            api_key: api_key.into(),
            sport: sport.into(),
            market,
            regions: Region::ALL.to_vec(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = regions;
        self
    }
}

/// Result of a completed search
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "events", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Nothing quoted for this sport and market right now
    NoActiveOdds,
    Found(Vec<EventOdds>),
}

impl SearchOutcome {
    pub fn events(&self) -> &[EventOdds] {
        match self {
            SearchOutcome::NoActiveOdds => &[],
            SearchOutcome::Found(events) => events,
        }
    }
}

/// Runs searches against an [`OddsSource`]
#[derive(Clone)]
pub struct OddsHunter {
    source: Arc<dyn OddsSource>,
    value: ValueConfig,
}

impl OddsHunter {
    pub fn new(source: Arc<dyn OddsSource>, value: ValueConfig) -> Self {
        Self { source, value }
    }

    /// Current quota for `api_key`
    pub async fn quota(&self, api_key: &str) -> Result<QuotaStatus> {
        let api_key = require_key(api_key)?;
        self.source.quota(api_key).await
    }

    /// Sports currently open for betting
    pub async fn active_sports(&self, api_key: &str) -> Result<Vec<Sport>> {
        let api_key = require_key(api_key)?;
        let sports = self.source.sports(api_key).await?;
        Ok(sports.into_iter().filter(|s| s.active).collect())
    }

    /// Run one search.
    ///
    /// A missing key fails before any network call. A zero quota blocks the
    /// search; an unreadable quota is logged and the search goes ahead.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let api_key = require_key(&request.api_key)?;

        match self.source.quota(api_key).await {
            Ok(quota) if quota.is_exhausted() => {
                return Err(HunterError::QuotaExhausted { used: quota.used });
            }
            Ok(_) => {}
            Err(HunterError::QuotaUnavailable(reason)) => {
                warn!("Quota unknown, searching anyway: {}", reason);
            }
            Err(e) => return Err(e),
        }

        let market_key = request.market.key();
        let raw = self
            .source
            .odds(api_key, &request.sport, &market_key, &request.regions)
            .await?;
        let events = aggregate_events(&raw, &market_key, &self.value);

        info!(
            sport = %request.sport,
            market = %market_key,
            received = raw.len(),
            shown = events.len(),
            value = events.iter().map(|e| e.value_outcomes().count()).sum::<usize>(),
            "Search complete"
        );

        if events.is_empty() {
            Ok(SearchOutcome::NoActiveOdds)
        } else {
            Ok(SearchOutcome::Found(events))
        }
    }
}

fn require_key(api_key: &str) -> Result<&str> {
    let key = api_key.trim();
    if key.is_empty() {
        Err(HunterError::MissingApiKey)
    } else {
        Ok(key)
    }
}
