//! Bookmaker x outcome price grid for manual inspection

use super::OutcomeBuckets;
use crate::types::OutcomeLabel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Column headers, in bucket order
    pub outcomes: Vec<OutcomeLabel>,
    pub rows: Vec<PivotRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub source: String,
    /// One cell per column; `None` where the source has no quote
    pub prices: Vec<Option<Decimal>>,
}

impl PivotTable {
    /// Build the grid. Rows appear in order of first appearance; if a source
    /// quoted the same outcome twice the first quote is kept.
    pub fn from_buckets(buckets: &OutcomeBuckets) -> Self {
        let outcomes: Vec<OutcomeLabel> = buckets.iter().map(|(label, _)| label.clone()).collect();
        let mut rows: Vec<PivotRow> = Vec::new();

        for (col, (_, quotes)) in buckets.iter().enumerate() {
            for quote in quotes {
                let existing = rows.iter().position(|r| r.source == quote.source);
                let idx = match existing {
                    Some(idx) => idx,
                    None => {
                        rows.push(PivotRow {
                            source: quote.source.clone(),
                            prices: vec![None; outcomes.len()],
                        });
                        rows.len() - 1
                    }
                };
                let row = &mut rows[idx];
                if row.prices[col].is_none() {
                    row.prices[col] = Some(quote.price);
                }
            }
        }

        Self { outcomes, rows }
    }

    pub fn price(&self, source: &str, label: &OutcomeLabel) -> Option<Decimal> {
        let col = self.outcomes.iter().position(|o| o == label)?;
        self.rows
            .iter()
            .find(|r| r.source == source)
            .and_then(|r| r.prices[col])
    }
}
