//! Core types
//!
//! Wire records mirror the odds API JSON. Every field is wrapped in
//! [`Lenient`] so a missing or mistyped value becomes `None` on that field
//! alone instead of failing the whole response.

use crate::error::HunterError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A field that parses to `Some` when well-formed and `None` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Lenient<T>(pub Option<T>);

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Lenient<T> {
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Self(Some(value))
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self(serde_json::from_value(value).ok()))
    }
}

/// One match as returned by the odds endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OddsEvent {
    #[serde(default)]
    pub id: Lenient<String>,
    #[serde(default)]
    pub sport_key: Lenient<String>,
    #[serde(default)]
    pub home_team: Lenient<String>,
    #[serde(default)]
    pub away_team: Lenient<String>,
    /// ISO-8601
    #[serde(default)]
    pub commence_time: Lenient<String>,
    #[serde(default)]
    pub bookmakers: Lenient<Vec<Lenient<Bookmaker>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: Lenient<String>,
    #[serde(default)]
    pub title: Lenient<String>,
    #[serde(default)]
    pub markets: Lenient<Vec<Lenient<MarketListing>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketListing {
    #[serde(default)]
    pub key: Lenient<String>,
    #[serde(default)]
    pub outcomes: Lenient<Vec<Lenient<OutcomeQuote>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutcomeQuote {
    #[serde(default)]
    pub name: Lenient<String>,
    #[serde(default)]
    pub price: Lenient<Decimal>,
    /// Handicap or total line
    #[serde(default)]
    pub point: Lenient<f64>,
}

/// Flatten a lenient list, dropping malformed entries.
pub(crate) fn valid_entries<T>(list: &Lenient<Vec<Lenient<T>>>) -> impl Iterator<Item = &T> {
    list.get()
        .into_iter()
        .flat_map(|items| items.iter().filter_map(Lenient::get))
}

/// Parse an odds response body. Array elements that are not events
/// (`null`, strings, broken objects) are dropped; the rest are kept in order.
pub fn parse_events(body: &str) -> serde_json::Result<Vec<OddsEvent>> {
    let raw: Vec<Lenient<OddsEvent>> = serde_json::from_str(body)?;
    let total = raw.len();
    let events: Vec<OddsEvent> = raw.into_iter().filter_map(Lenient::into_inner).collect();
    if events.len() < total {
        tracing::debug!("Dropped {} malformed event records", total - events.len());
    }
    Ok(events)
}

/// A sport listed by the sports endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sport {
    pub key: String,
    #[serde(default)]
    pub group: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub has_outrights: bool,
}

/// A single bookmaker price for one outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub source: String,
    pub price: Decimal,
}

impl Quote {
    pub fn new(source: impl Into<String>, price: Decimal) -> Self {
        Self {
            source: source.into(),
            price,
        }
    }
}

/// Outcome name, suffixed with its line when present: `"Team A (-5.5)"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeLabel(String);

impl OutcomeLabel {
    /// Integral lines print without a fraction: `220.0` gives `"Over (220)"`.
    pub fn new(name: &str, point: Option<f64>) -> Self {
        match point {
            Some(point) => Self(format!("{} ({})", name, point)),
            None => Self(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutcomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bookmaker region accepted by the odds endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Us,
    Uk,
    Eu,
    Au,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Us, Region::Uk, Region::Eu, Region::Au];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Eu => "eu",
            Region::Au => "au",
        }
    }

    /// Comma separated, as the `regions` query parameter expects
    pub fn join(regions: &[Region]) -> String {
        regions
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Region {
    type Err = HunterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "uk" => Ok(Region::Uk),
            "eu" => Ok(Region::Eu),
            "au" => Ok(Region::Au),
            other => Err(HunterError::InvalidSelection(format!(
                "unknown region '{}'",
                other
            ))),
        }
    }
}

/// Request quota reported by the odds API response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub remaining: u64,
    pub used: u64,
}

impl QuotaStatus {
    pub const REMAINING_HEADER: &'static str = "x-requests-remaining";
    pub const USED_HEADER: &'static str = "x-requests-used";

    /// Read the quota pair from response headers.
    ///
    /// Both headers must be present; counts may arrive as fractional
    /// strings and are truncated.
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Result<Self, HunterError> {
        let read = |name: &str| -> Result<u64, HunterError> {
            let raw = headers
                .get(name)
                .ok_or_else(|| HunterError::QuotaUnavailable(format!("missing {}", name)))?
                .to_str()
                .map_err(|_| HunterError::QuotaUnavailable(format!("unreadable {}", name)))?;
            parse_count(raw).ok_or_else(|| {
                HunterError::QuotaUnavailable(format!("invalid {}: '{}'", name, raw))
            })
        };

        Ok(Self {
            remaining: read(Self::REMAINING_HEADER)?,
            used: read(Self::USED_HEADER)?,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

fn parse_count(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}

/// Parse an ISO-8601 timestamp as sent in `commence_time`
pub fn parse_commence_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
