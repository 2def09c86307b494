//! Market key construction
//!
//! Maps a (bet type, period) choice onto the odds API market identifier,
//! e.g. spread + second half -> `spreads_h2`. Combinations the API does not
//! offer still produce a key; the API just returns nothing for it.

use crate::error::HunterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Moneyline,
    Spread,
    Totals,
}

impl BetType {
    pub fn base_key(&self) -> &'static str {
        match self {
            BetType::Moneyline => "h2h",
            BetType::Spread => "spreads",
            BetType::Totals => "totals",
        }
    }
}

impl FromStr for BetType {
    type Err = HunterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moneyline" | "winner" | "h2h" => Ok(BetType::Moneyline),
            "spread" | "spreads" | "handicap" => Ok(BetType::Spread),
            "totals" | "total" => Ok(BetType::Totals),
            other => Err(HunterError::InvalidSelection(format!(
                "unknown bet type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    #[default]
    FullMatch,
    FirstHalf,
    SecondHalf,
    #[serde(rename = "q1")]
    Quarter1,
    #[serde(rename = "q2")]
    Quarter2,
    #[serde(rename = "q3")]
    Quarter3,
    #[serde(rename = "q4")]
    Quarter4,
}

impl Period {
    pub fn suffix(&self) -> &'static str {
        match self {
            Period::FullMatch => "",
            Period::FirstHalf => "_h1",
            Period::SecondHalf => "_h2",
            Period::Quarter1 => "_q1",
            Period::Quarter2 => "_q2",
            Period::Quarter3 => "_q3",
            Period::Quarter4 => "_q4",
        }
    }
}

impl FromStr for Period {
    type Err = HunterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "full-match" | "match" => Ok(Period::FullMatch),
            "h1" | "first-half" => Ok(Period::FirstHalf),
            "h2" | "second-half" => Ok(Period::SecondHalf),
            "q1" => Ok(Period::Quarter1),
            "q2" => Ok(Period::Quarter2),
            "q3" => Ok(Period::Quarter3),
            "q4" => Ok(Period::Quarter4),
            other => Err(HunterError::InvalidSelection(format!(
                "unknown period '{}'",
                other
            ))),
        }
    }
}

/// The market a search is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketSelection {
    pub bet_type: BetType,
    #[serde(default)]
    pub period: Period,
}

impl MarketSelection {
    pub fn new(bet_type: BetType, period: Period) -> Self {
        Self { bet_type, period }
    }

    /// Opaque market identifier passed to the API and used to filter listings
    pub fn key(&self) -> String {
        format!("{}{}", self.bet_type.base_key(), self.period.suffix())
    }
}

impl fmt::Display for MarketSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
