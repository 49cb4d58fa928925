//! Integration tests against the real odds provider.
//!
//! These tests require a valid ODDS_API_KEY environment variable.
//! Run with: cargo test --test live_upstream -- --ignored
//!
//! Note: these tests consume upstream API quota.

use sports_arb::config::Config;
use sports_arb::odds::{OddsClient, OddsSource};

/// Get a test config from environment.
fn test_config() -> Option<Config> {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("ODDS_API_KEY").ok()?;
    if api_key.is_empty() || api_key == "test" {
        return None;
    }

    Some(Config {
        odds_api_key: Some(api_key),
        ..Config::default()
    })
}

/// Fetching a mainstream sport should parse cleanly.
#[tokio::test]
#[ignore = "requires ODDS_API_KEY"]
async fn fetch_soccer_odds() {
    let config = match test_config() {
        Some(c) => c,
        None => {
            println!("Skipping: ODDS_API_KEY not set");
            return;
        }
    };

    let client = OddsClient::new(&config);
    let result = client.fetch_matches("soccer_epl").await;
    assert!(result.is_ok(), "Failed to fetch odds: {:?}", result.err());

    let matches = result.unwrap();
    println!("Fetched {} matches", matches.len());

    for event in &matches {
        assert!(!event.quotes.is_empty());
        assert!(event.has_draw_market, "soccer should be a 3-way market");
    }
}

/// A nonsense sport key should come back as UnknownSport.
#[tokio::test]
#[ignore = "requires ODDS_API_KEY"]
async fn unknown_sport_is_reported() {
    let config = match test_config() {
        Some(c) => c,
        None => {
            println!("Skipping: ODDS_API_KEY not set");
            return;
        }
    };

    let client = OddsClient::new(&config);
    let result = client.fetch_matches("not_a_real_sport").await;

    assert!(matches!(
        result,
        Err(sports_arb::error::OddsError::UnknownSport { .. })
    ));
}
