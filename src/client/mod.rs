//! Odds API clients

mod odds_api;

pub use odds_api::OddsApiClient;

use crate::error::Result;
use crate::types::{OddsEvent, QuotaStatus, Region, Sport};
use async_trait::async_trait;

/// Upstream source of sports, quota and odds data.
///
/// Every call takes the credential explicitly; implementations hold no
/// session state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// All sports known to the source, active or not
    async fn sports(&self, api_key: &str) -> Result<Vec<Sport>>;

    /// Current request quota for `api_key`
    async fn quota(&self, api_key: &str) -> Result<QuotaStatus>;

    /// Events with bookmaker quotes for one sport and market
    async fn odds(
        &self,
        api_key: &str,
        sport: &str,
        market_key: &str,
        regions: &[Region],
    ) -> Result<Vec<OddsEvent>>;
}
