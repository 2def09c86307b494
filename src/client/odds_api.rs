//! The Odds API (v4) client
//!
//! Fetches sports, quota headers and bookmaker odds.

use super::OddsSource;
use crate::config::ApiConfig;
use crate::error::{HunterError, Result};
use crate::types::{parse_events, OddsEvent, QuotaStatus, Region, Sport};
use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use std::time::Duration;
use tracing::debug;

/// Price checks and value detection assume decimal odds
const ODDS_FORMAT: &str = "decimal";

/// HTTP client for the odds API
#[derive(Clone)]
pub struct OddsApiClient {
    http: Client,
    base_url: String,
}

impl OddsApiClient {
    /// Create a new client
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sports listing response; carries the quota headers too
    async fn get_sports(&self, api_key: &str) -> Result<Response> {
        let url = format!("{}/sports", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("apiKey", api_key)])
            .send()
            .await?;
        ensure_success(resp).await
    }

    fn odds_request(
        &self,
        api_key: &str,
        sport: &str,
        market_key: &str,
        regions: &str,
    ) -> Result<Request> {
        let url = format!("{}/sports/{}/odds", self.base_url, sport);
        let request = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", api_key),
                ("regions", regions),
                ("markets", market_key),
                ("oddsFormat", ODDS_FORMAT),
                ("dateFormat", "iso"),
            ])
            .build()?;
        Ok(request)
    }
}

/// Turn a non-2xx response into `HunterError::Api` with the raw body
async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(HunterError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl OddsSource for OddsApiClient {
    async fn sports(&self, api_key: &str) -> Result<Vec<Sport>> {
        let sports: Vec<Sport> = self.get_sports(api_key).await?.json().await?;
        debug!("Fetched {} sports", sports.len());
        Ok(sports)
    }

    async fn quota(&self, api_key: &str) -> Result<QuotaStatus> {
        let resp = self.get_sports(api_key).await?;
        QuotaStatus::from_headers(resp.headers())
    }

    async fn odds(
        &self,
        api_key: &str,
        sport: &str,
        market_key: &str,
        regions: &[Region],
    ) -> Result<Vec<OddsEvent>> {
        let regions = Region::join(regions);
        let request = self.odds_request(api_key, sport, market_key, &regions)?;
        let resp = self.http.execute(request).await?;
        let resp = ensure_success(resp).await?;

        if let Ok(quota) = QuotaStatus::from_headers(resp.headers()) {
            debug!(remaining = quota.remaining, used = quota.used, "Quota after odds request");
        }

        let body = resp.text().await?;
        let events = parse_events(&body)?;
        debug!(
            "Fetched {} events for {} / {} ({})",
            events.len(),
            sport,
            market_key,
            regions
        );
        Ok(events)
    }
}
