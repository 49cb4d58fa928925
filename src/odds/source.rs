//! The seam between the API layer and whatever supplies odds.

use async_trait::async_trait;

use super::types::MatchEvent;
use crate::error::OddsError;

/// Supplies quoted odds for the matches of a sport.
///
/// The engine never calls this; the API layer fetches through it (and
/// caches the result) before handing plain data to the engine.
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Fetch all upcoming matches for a sport with their bookmaker quotes.
    async fn fetch_matches(&self, sport: &str) -> Result<Vec<MatchEvent>, OddsError>;
}
