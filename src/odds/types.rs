//! Match and quote types shared by the odds source and the engine.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// One slot of a head-to-head market.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeSide {
    /// First (home) outcome.
    #[strum(serialize = "home", serialize = "HOME")]
    #[default]
    Home,
    /// Draw outcome, only present in 3-way markets.
    #[strum(serialize = "draw", serialize = "DRAW")]
    Draw,
    /// Second (away) outcome.
    #[strum(serialize = "away", serialize = "AWAY")]
    Away,
}

/// One bookmaker's decimal odds for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    /// Bookmaker offering these prices.
    pub bookmaker: String,
    /// Decimal odds on the home outcome.
    pub home_odds: Decimal,
    /// Decimal odds on the away outcome.
    pub away_odds: Decimal,
    /// Decimal odds on the draw, if the bookmaker prices one.
    pub draw_odds: Option<Decimal>,
}

impl OddsQuote {
    /// The price this quote offers for a given slot, if any.
    pub fn price(&self, side: OutcomeSide) -> Option<Decimal> {
        match side {
            OutcomeSide::Home => Some(self.home_odds),
            OutcomeSide::Away => Some(self.away_odds),
            OutcomeSide::Draw => self.draw_odds,
        }
    }
}

/// A single sporting event with all quotes collected for it.
///
/// Built fresh from upstream data per evaluation, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Display name, e.g. "Arsenal vs Chelsea".
    pub name: String,
    /// League or competition the match belongs to.
    pub league: String,
    /// Scheduled kick-off time.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// Name of the home (first) outcome.
    pub home: String,
    /// Name of the away (second) outcome.
    pub away: String,
    /// Whether this market settles on three outcomes (win/draw/win).
    pub has_draw_market: bool,
    /// Odds quotes from each bookmaker covering the match.
    pub quotes: Vec<OddsQuote>,
}

impl MatchEvent {
    /// Outcome name for a given slot.
    pub fn outcome_name(&self, side: OutcomeSide) -> &str {
        match side {
            OutcomeSide::Home => &self.home,
            OutcomeSide::Away => &self.away,
            OutcomeSide::Draw => "Draw",
        }
    }

    /// Number of distinct bookmakers quoting this match.
    pub fn distinct_bookmakers(&self) -> usize {
        let mut names: Vec<&str> = self.quotes.iter().map(|q| q.bookmaker.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}

/// Sport key prefixes whose head-to-head markets settle on three outcomes.
static DRAW_SPORT_PREFIXES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "soccer",
        "rugby_union",
        "rugby_league",
        "cricket",
        "boxing",
        "mma_mixed_martial_arts",
    ]
});

/// Sport key prefixes treated as 3-way (draw) markets.
pub fn draw_sport_prefixes() -> &'static [&'static str] {
    DRAW_SPORT_PREFIXES.as_slice()
}

/// Whether a provider sport key describes a market with a draw outcome.
///
/// Matches on the leading segment so league-specific keys like
/// `soccer_epl` resolve the same way as the bare sport.
pub fn sport_has_draw(sport_key: &str) -> bool {
    DRAW_SPORT_PREFIXES
        .iter()
        .any(|prefix| sport_key == *prefix || sport_key.starts_with(&format!("{}_", prefix)))
}
