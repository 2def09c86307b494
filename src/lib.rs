//! Global Odds Hunter
//!
//! Queries a sports-odds API across bookmakers and regions, groups the
//! quotes per outcome, and highlights the best available price.
//!
//! ## Architecture
//!
//! ```text
//! OddsSource (HTTP) → Hunter (credential, quota) → Aggregator (buckets, stats, value)
//!                                                        ↓
//!                                             render (CLI) / monitor (dashboard)
//! ```

pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod hunter;
pub mod market;
pub mod monitor;
pub mod render;
pub mod types;
