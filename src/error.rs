//! Error types for the arbitrage service.

use thiserror::Error;

/// Errors from the upstream odds source.
#[derive(Error, Debug)]
pub enum OddsError {
    /// The upstream provider does not know this sport.
    #[error("unknown sport: {sport}")]
    UnknownSport {
        /// The sport key that was requested.
        sport: String,
    },

    /// Failed to fetch odds for a sport.
    #[error("failed to fetch odds for {sport}: {reason}")]
    FetchFailed {
        /// The sport key that failed.
        sport: String,
        /// Reason for failure.
        reason: String,
    },

    /// Upstream rejected our credentials.
    #[error("upstream rejected credentials: {reason}")]
    Unauthorized {
        /// Reason reported by the provider.
        reason: String,
    },

    /// Failed to parse upstream odds data.
    #[error("failed to parse odds data: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}
