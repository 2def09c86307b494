//! Per-outcome price statistics and value detection

use crate::types::Quote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Derived statistics for one outcome bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStats {
    pub max_price: Decimal,
    pub mean_price: Decimal,
    /// Every source quoting exactly `max_price`, in quote order
    pub best_sources: Vec<String>,
    pub is_value: bool,
    /// (max - mean) / mean * 100
    pub value_premium_pct: Decimal,
}

impl OutcomeStats {
    /// Compute stats for one bucket. `None` for an empty bucket, or when
    /// the prices are too large for `Decimal` arithmetic.
    ///
    /// The best price is flagged as value when it beats the mean by more
    /// than `premium_threshold` (e.g. 1.04 for a 4% premium).
    pub fn compute(quotes: &[Quote], premium_threshold: Decimal) -> Option<Self> {
        let max_price = quotes.iter().map(|q| q.price).max()?;

        let Some(mean_price) = quotes
            .iter()
            .try_fold(Decimal::ZERO, |acc, q| acc.checked_add(q.price))
            .and_then(|sum| sum.checked_div(Decimal::from(quotes.len())))
        else {
            debug!("Price overflow averaging {} quotes, skipping outcome", quotes.len());
            return None;
        };

        let Some(threshold_price) = mean_price.checked_mul(premium_threshold) else {
            debug!("Price overflow applying threshold to mean {}, skipping outcome", mean_price);
            return None;
        };

        let best_sources = quotes
            .iter()
            .filter(|q| q.price == max_price)
            .map(|q| q.source.clone())
            .collect();

        let value_premium_pct = if mean_price > Decimal::ZERO {
            max_price
                .checked_sub(mean_price)
                .and_then(|diff| diff.checked_div(mean_price))
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        Some(Self {
            max_price,
            mean_price,
            best_sources,
            is_value: max_price > threshold_price,
            value_premium_pct,
        })
    }

    /// Best sources trimmed for display
    pub fn best_sources_display(&self, limit: usize) -> BestSources {
        BestSources {
            shown: self.best_sources.iter().take(limit).cloned().collect(),
            hidden: self.best_sources.len().saturating_sub(limit),
        }
    }
}

/// Display form of the best sources: the first few plus a hidden count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSources {
    pub shown: Vec<String>,
    pub hidden: usize,
}

impl BestSources {
    pub fn has_more(&self) -> bool {
        self.hidden > 0
    }
}

impl std::fmt::Display for BestSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.shown.join(", "))?;
        if self.has_more() {
            write!(f, " (+{} more)", self.hidden)?;
        }
        Ok(())
    }
}
