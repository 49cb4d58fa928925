//! Mock odds source for unit testing.
//!
//! This module provides a mock source that can be used in tests
//! without making real network requests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use time::macros::datetime;
use time::OffsetDateTime;

use super::source::OddsSource;
use super::types::{MatchEvent, OddsQuote};
use crate::error::OddsError;

/// Configuration for mock source behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail fetch requests.
    pub fail_fetch: bool,
    /// Report every sport as unknown.
    pub unknown_sport: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Mock odds source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockOddsSource {
    /// Mock configuration.
    config: MockConfig,
    /// Matches keyed by sport.
    matches: Arc<Mutex<HashMap<String, Vec<MatchEvent>>>>,
    /// Number of fetches served, for cache behavior assertions.
    fetch_count: Arc<AtomicU64>,
}

impl MockOddsSource {
    /// Create a new mock source with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the matches returned for a sport.
    pub fn set_matches(&self, sport: &str, matches: Vec<MatchEvent>) {
        self.matches
            .lock()
            .unwrap()
            .insert(sport.to_string(), matches);
    }

    /// Clear all mock data.
    pub fn clear(&self) {
        self.matches.lock().unwrap().clear();
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OddsSource for MockOddsSource {
    async fn fetch_matches(&self, sport: &str) -> Result<Vec<MatchEvent>, OddsError> {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail_fetch {
            return Err(OddsError::FetchFailed {
                sport: sport.to_string(),
                reason: "mock fetch failure".to_string(),
            });
        }

        if self.config.unknown_sport {
            return Err(OddsError::UnknownSport {
                sport: sport.to_string(),
            });
        }

        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let matches = self.matches.lock().unwrap();
        Ok(matches.get(sport).cloned().unwrap_or_default())
    }
}

/// Builder for creating match events with common patterns.
pub struct MatchEventBuilder {
    name: String,
    league: String,
    start_time: OffsetDateTime,
    home: String,
    away: String,
    has_draw_market: bool,
    quotes: Vec<OddsQuote>,
}

impl MatchEventBuilder {
    /// Create a builder for a match between two named outcomes.
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        let home = home.into();
        let away = away.into();
        Self {
            name: format!("{} vs {}", home, away),
            league: "Test League".to_string(),
            start_time: datetime!(2026-09-01 18:00 UTC),
            home,
            away,
            has_draw_market: false,
            quotes: Vec::new(),
        }
    }

    /// Set the league name.
    pub fn league(mut self, league: impl Into<String>) -> Self {
        self.league = league.into();
        self
    }

    /// Set kick-off time.
    pub fn start_time(mut self, start_time: OffsetDateTime) -> Self {
        self.start_time = start_time;
        self
    }

    /// Mark this match as a 3-way (win/draw/win) market.
    pub fn with_draw_market(mut self) -> Self {
        self.has_draw_market = true;
        self
    }

    /// Add a two-way quote.
    pub fn quote(mut self, bookmaker: impl Into<String>, home: Decimal, away: Decimal) -> Self {
        self.quotes.push(OddsQuote {
            bookmaker: bookmaker.into(),
            home_odds: home,
            away_odds: away,
            draw_odds: None,
        });
        self
    }

    /// Add a three-way quote.
    pub fn quote_with_draw(
        mut self,
        bookmaker: impl Into<String>,
        home: Decimal,
        draw: Decimal,
        away: Decimal,
    ) -> Self {
        self.quotes.push(OddsQuote {
            bookmaker: bookmaker.into(),
            home_odds: home,
            away_odds: away,
            draw_odds: Some(draw),
        });
        self
    }

    /// Build the match event.
    pub fn build(self) -> MatchEvent {
        MatchEvent {
            name: self.name,
            league: self.league,
            start_time: self.start_time,
            home: self.home,
            away: self.away,
            has_draw_market: self.has_draw_market,
            quotes: self.quotes,
        }
    }
}
