//! Sports-betting arbitrage detection API.
//!
//! Given a sport, this service scans the odds quoted by multiple
//! bookmakers for each upcoming match and detects combinations of bets
//! that guarantee profit regardless of outcome.
//!
//! # Strategy
//!
//! For each outcome of a match, take the best (highest) decimal odds
//! quoted by any bookmaker. Each price implies a probability of
//! `1 / odds`. If the implied probabilities across all outcomes sum to
//! less than 1.0, the bookmakers disagree enough that a hedged stake
//! split locks in profit:
//!
//! ```text
//! Home win: 2.10 @ BookA  -> implied 0.4762
//! Away win: 1.95 @ BookB  -> implied 0.5128
//! ─────────────────────────────────────────
//! Total implied: 0.9890 < 1.0 ✅
//! Guaranteed return: 1.11% (stake split 48.15% / 51.85%)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Upstream and domain error types
//! - [`odds`]: Upstream odds source and match types
//! - [`arbitrage`]: The detection engine and opportunity assembly
//! - [`cache`]: TTL cache for fetched odds, owned by the API layer
//! - [`api`]: HTTP API for arbitrage queries and health
//! - [`metrics`]: Prometheus metrics

pub mod api;
pub mod arbitrage;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod odds;

pub use config::Config;
pub use error::OddsError;
