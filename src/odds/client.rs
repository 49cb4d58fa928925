//! Reqwest client for a The-Odds-API-style odds provider.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use super::source::OddsSource;
use super::types::{sport_has_draw, MatchEvent, OddsQuote};
use crate::config::Config;
use crate::error::OddsError;

/// Head-to-head market key in the provider's schema.
const H2H_MARKET: &str = "h2h";

/// Raw event as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    /// Sport key, e.g. "soccer_epl".
    pub sport_key: String,
    /// Human-readable sport/league title.
    pub sport_title: Option<String>,
    /// Kick-off time (RFC 3339).
    pub commence_time: String,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Bookmakers quoting this event.
    #[serde(default)]
    pub bookmakers: Vec<RawBookmaker>,
}

/// Raw bookmaker entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBookmaker {
    /// Bookmaker display title.
    pub title: String,
    /// Markets quoted by this bookmaker.
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

/// Raw market entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMarket {
    /// Market key, e.g. "h2h".
    pub key: String,
    /// Priced outcomes.
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
}

/// Raw priced outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOutcome {
    /// Outcome name (team name or "Draw").
    pub name: String,
    /// Decimal odds.
    pub price: Decimal,
}

/// HTTP client for the upstream odds provider.
#[derive(Debug, Clone)]
pub struct OddsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    regions: String,
}

impl OddsClient {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: config.odds_api_url.trim_end_matches('/').to_string(),
            api_key: config.odds_api_key.clone(),
            regions: config.odds_regions.clone(),
        }
    }

    fn odds_url(&self, sport: &str) -> String {
        format!("{}/v4/sports/{}/odds", self.base_url, sport)
    }
}

#[async_trait]
impl OddsSource for OddsClient {
    #[instrument(skip(self))]
    async fn fetch_matches(&self, sport: &str) -> Result<Vec<MatchEvent>, OddsError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let response = self
            .http
            .get(self.odds_url(sport))
            .query(&[
                ("apiKey", api_key),
                ("regions", self.regions.as_str()),
                ("markets", H2H_MARKET),
                ("oddsFormat", "decimal"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(OddsError::Unauthorized {
                reason: format!("HTTP {}", status),
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(OddsError::UnknownSport {
                sport: sport.to_string(),
            });
        }
        if !status.is_success() {
            return Err(OddsError::FetchFailed {
                sport: sport.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let raw_events: Vec<RawEvent> = response.json().await.map_err(|e| {
            OddsError::ParseError(format!("failed to parse odds response: {}", e))
        })?;

        let matches: Vec<MatchEvent> = raw_events
            .iter()
            .filter_map(parse_event)
            .collect();

        debug!(
            sport = %sport,
            raw = raw_events.len(),
            parsed = matches.len(),
            "Fetched odds"
        );

        Ok(matches)
    }
}

/// Convert a raw provider event into a [`MatchEvent`].
///
/// Returns `None` when the event is unusable (no parseable quotes or
/// bad timestamp); individual malformed quotes are skipped with a
/// warning rather than failing the whole fetch.
pub fn parse_event(raw: &RawEvent) -> Option<MatchEvent> {
    let start_time = match OffsetDateTime::parse(&raw.commence_time, &Rfc3339) {
        Ok(t) => t,
        Err(e) => {
            warn!(
                event = %format!("{} vs {}", raw.home_team, raw.away_team),
                error = %e,
                "Skipping event with unparseable commence_time"
            );
            return None;
        }
    };

    let mut quotes = Vec::with_capacity(raw.bookmakers.len());
    let mut any_draw_quoted = false;

    for bookmaker in &raw.bookmakers {
        let Some(market) = bookmaker.markets.iter().find(|m| m.key == H2H_MARKET) else {
            continue;
        };

        let price_for = |name: &str| {
            market
                .outcomes
                .iter()
                .find(|o| o.name == name)
                .map(|o| o.price)
        };

        let (Some(home_odds), Some(away_odds)) =
            (price_for(&raw.home_team), price_for(&raw.away_team))
        else {
            warn!(
                bookmaker = %bookmaker.title,
                event = %format!("{} vs {}", raw.home_team, raw.away_team),
                "Skipping quote missing a head-to-head outcome"
            );
            continue;
        };

        // Upstream data quality guard: decimal odds must be positive.
        if home_odds <= Decimal::ZERO || away_odds <= Decimal::ZERO {
            warn!(
                bookmaker = %bookmaker.title,
                home = %home_odds,
                away = %away_odds,
                "Skipping quote with non-positive odds"
            );
            continue;
        }

        let draw_odds = price_for("Draw").filter(|p| *p > Decimal::ZERO);
        if draw_odds.is_some() {
            any_draw_quoted = true;
        }

        quotes.push(OddsQuote {
            bookmaker: bookmaker.title.clone(),
            home_odds,
            away_odds,
            draw_odds,
        });
    }

    if quotes.is_empty() {
        return None;
    }

    Some(MatchEvent {
        name: format!("{} vs {}", raw.home_team, raw.away_team),
        league: raw
            .sport_title
            .clone()
            .unwrap_or_else(|| raw.sport_key.clone()),
        start_time,
        home: raw.home_team.clone(),
        away: raw.away_team.clone(),
        has_draw_market: sport_has_draw(&raw.sport_key) || any_draw_quoted,
        quotes,
    })
}
