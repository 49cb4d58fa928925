//! Request parameter normalization.
//!
//! GET and POST variants of the arbitrage endpoint accept the same
//! parameters from different places. One resolution step feeds the
//! shared handler, with priority: body field, then query parameter,
//! then nested `data` body field.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;
use utoipa::IntoParams;

use crate::arbitrage::OpportunityParams;
use crate::config::Config;

/// Query parameters accepted by the arbitrage endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ArbitrageQuery {
    /// Sport key, e.g. "soccer_epl" or "tennis_atp".
    pub sport: Option<String>,
    /// Minimum guaranteed profit percentage to include.
    #[param(value_type = Option<String>)]
    pub min_profit: Option<Decimal>,
    /// Total stake to split across legs.
    #[param(value_type = Option<String>)]
    pub total_stake: Option<Decimal>,
}

/// Fully resolved parameters for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    /// Sport to scan.
    pub sport: String,
    /// Engine post-processing parameters.
    pub params: OpportunityParams,
}

/// Parameter resolution failures.
#[derive(Error, Debug, PartialEq)]
pub enum ParamError {
    /// No sport in body, query, or nested body field.
    #[error("missing required parameter: sport")]
    MissingSport,

    /// A numeric field did not parse as a decimal number.
    #[error("invalid numeric value for {field}")]
    InvalidNumber {
        /// Offending field name.
        field: &'static str,
    },

    /// Total stake must be positive for stake amounts to mean anything.
    #[error("total_stake must be positive")]
    NonPositiveStake,
}

/// Resolve scan parameters from a query and an optional JSON body.
pub fn resolve(
    query: &ArbitrageQuery,
    body: Option<&Value>,
    config: &Config,
) -> Result<ScanRequest, ParamError> {
    let sport = string_field(body, "sport")
        .or_else(|| query.sport.clone().filter(|s| !s.is_empty()))
        .or_else(|| nested_string_field(body, "data", "sport"))
        .ok_or(ParamError::MissingSport)?;

    let min_profit = decimal_field(body, "min_profit")?
        .or(query.min_profit)
        .unwrap_or(config.min_profit_percentage);

    let total_stake = decimal_field(body, "total_stake")?
        .or(query.total_stake)
        .unwrap_or(config.default_total_stake);

    if total_stake <= Decimal::ZERO {
        return Err(ParamError::NonPositiveStake);
    }

    Ok(ScanRequest {
        sport,
        params: OpportunityParams {
            min_profit,
            total_stake,
        },
    })
}

fn string_field(body: Option<&Value>, key: &str) -> Option<String> {
    body?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn nested_string_field(body: Option<&Value>, outer: &str, key: &str) -> Option<String> {
    body?
        .get(outer)?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read a decimal body field given either as a JSON number or string.
fn decimal_field(
    body: Option<&Value>,
    field: &'static str,
) -> Result<Option<Decimal>, ParamError> {
    let Some(value) = body.and_then(|b| b.get(field)) else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Null => return Ok(None),
        _ => None,
    };

    parsed.map(Some).ok_or(ParamError::InvalidNumber { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn query(sport: Option<&str>) -> ArbitrageQuery {
        ArbitrageQuery {
            sport: sport.map(str::to_string),
            ..ArbitrageQuery::default()
        }
    }

    #[test]
    fn body_sport_beats_query_sport() {
        let body = json!({"sport": "soccer_epl"});
        let request = resolve(&query(Some("tennis_atp")), Some(&body), &Config::default()).unwrap();

        assert_eq!(request.sport, "soccer_epl");
    }

    #[test]
    fn query_sport_beats_nested_body_sport() {
        let body = json!({"data": {"sport": "basketball_nba"}});
        let request = resolve(&query(Some("tennis_atp")), Some(&body), &Config::default()).unwrap();

        assert_eq!(request.sport, "tennis_atp");
    }

    #[test]
    fn nested_body_sport_is_last_resort() {
        let body = json!({"data": {"sport": "basketball_nba"}});
        let request = resolve(&query(None), Some(&body), &Config::default()).unwrap();

        assert_eq!(request.sport, "basketball_nba");
    }

    #[test]
    fn missing_sport_is_an_error() {
        let result = resolve(&query(None), None, &Config::default());
        assert_eq!(result.unwrap_err(), ParamError::MissingSport);

        let empty = json!({"sport": ""});
        let result = resolve(&query(None), Some(&empty), &Config::default());
        assert_eq!(result.unwrap_err(), ParamError::MissingSport);
    }

    #[test]
    fn defaults_come_from_config() {
        let config = Config {
            min_profit_percentage: dec!(0.5),
            default_total_stake: dec!(250),
            ..Config::default()
        };
        let request = resolve(&query(Some("tennis_atp")), None, &config).unwrap();

        assert_eq!(
            request,
            ScanRequest {
                sport: "tennis_atp".to_string(),
                params: OpportunityParams {
                    min_profit: dec!(0.5),
                    total_stake: dec!(250),
                },
            }
        );
    }

    #[test]
    fn numeric_body_fields_accept_numbers_and_strings() {
        let body = json!({"sport": "tennis_atp", "min_profit": 1.5, "total_stake": "500"});
        let request = resolve(&query(None), Some(&body), &Config::default()).unwrap();

        assert_eq!(request.params.min_profit, dec!(1.5));
        assert_eq!(request.params.total_stake, dec!(500));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let body = json!({"sport": "tennis_atp", "total_stake": "lots"});
        let result = resolve(&query(None), Some(&body), &Config::default());

        assert_eq!(
            result.unwrap_err(),
            ParamError::InvalidNumber {
                field: "total_stake"
            }
        );
    }

    #[test]
    fn non_positive_stake_is_rejected() {
        let body = json!({"sport": "tennis_atp", "total_stake": 0});
        let result = resolve(&query(None), Some(&body), &Config::default());

        assert_eq!(result.unwrap_err(), ParamError::NonPositiveStake);
    }
}
