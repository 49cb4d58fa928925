//! Upstream odds source and match types.
//!
//! This module handles:
//! - Match and quote data structures
//! - The `OddsSource` seam between the API layer and the provider
//! - A reqwest client for a The-Odds-API-style provider
//! - Mock source for testing

pub mod client;
pub mod mock;
pub mod source;
pub mod types;

pub use client::OddsClient;
pub use mock::{MatchEventBuilder, MockOddsSource};
pub use source::OddsSource;
pub use types::{draw_sport_prefixes, sport_has_draw, MatchEvent, OddsQuote, OutcomeSide};
