//! Opportunity assembly: stake amounts, filtering and sorting.
//!
//! A pure post-processing pass over engine results. The caller
//! supplies the profit threshold and total stake; nothing here is
//! cached or shared.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::calculator::evaluate_match;
use crate::odds::MatchEvent;

/// Decimal places kept on money amounts.
const ROUND_DP: u32 = 2;

/// Caller-supplied parameters for an opportunity scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpportunityParams {
    /// Minimum guaranteed profit percentage to keep a result.
    pub min_profit: Decimal,
    /// Total stake the per-leg amounts are computed from. Must be > 0
    /// for the amounts to be meaningful.
    pub total_stake: Decimal,
}

impl Default for OpportunityParams {
    fn default() -> Self {
        Self {
            min_profit: Decimal::ZERO,
            total_stake: Decimal::ONE_HUNDRED,
        }
    }
}

/// One bet within a detected opportunity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OpportunityLeg {
    /// Outcome this leg backs.
    pub outcome: String,
    /// Bookmaker to place the bet with.
    pub bookmaker: String,
    /// Decimal odds for the leg.
    #[schema(value_type = String)]
    pub odds: Decimal,
    /// Share of the total stake, percent.
    #[schema(value_type = String)]
    pub stake_percent: Decimal,
    /// Amount to stake on this leg.
    #[schema(value_type = String)]
    pub stake_amount: Decimal,
    /// Payout if this leg wins (stake_amount * odds).
    #[schema(value_type = String)]
    pub potential_return: Decimal,
}

/// A detected arbitrage opportunity, ready for rendering.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Opportunity {
    /// Unique identifier for this detection.
    pub id: Uuid,
    /// Match display name.
    pub match_name: String,
    /// League or competition.
    pub league: String,
    /// Scheduled kick-off time.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub start_time: OffsetDateTime,
    /// Guaranteed percentage return on total stake.
    #[schema(value_type = String)]
    pub profit_percentage: Decimal,
    /// Total stake the amounts below are computed from.
    #[schema(value_type = String)]
    pub total_stake: Decimal,
    /// Guaranteed profit amount at that stake.
    #[schema(value_type = String)]
    pub guaranteed_profit: Decimal,
    /// Bets to place, ordered home, (draw,) away.
    pub legs: Vec<OpportunityLeg>,
    /// When the opportunity was detected.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub detected_at: OffsetDateTime,
}

/// Evaluate every match and assemble the qualifying opportunities.
///
/// Keeps results whose guaranteed profit meets `min_profit`, computes
/// per-leg stake amounts from `total_stake`, and sorts by profit
/// descending (stable, so equal profits keep match order).
#[instrument(skip(matches), fields(matches = matches.len()))]
pub fn find_opportunities(matches: &[MatchEvent], params: OpportunityParams) -> Vec<Opportunity> {
    let mut opportunities: Vec<Opportunity> = matches
        .iter()
        .filter_map(|event| {
            let arb = evaluate_match(event)?;
            if arb.profit_percentage < params.min_profit {
                return None;
            }
            Some(assemble(event, arb, params))
        })
        .collect();

    opportunities.sort_by(|a, b| b.profit_percentage.cmp(&a.profit_percentage));
    opportunities
}

/// Attach stake amounts and metadata to one engine result.
fn assemble(
    event: &MatchEvent,
    arb: super::calculator::ArbitrageResult,
    params: OpportunityParams,
) -> Opportunity {
    // Rescale so amounts always render with two decimal places.
    let round = |value: Decimal| {
        let mut rounded =
            value.round_dp_with_strategy(ROUND_DP, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(ROUND_DP);
        rounded
    };

    let legs = arb
        .legs
        .into_iter()
        .map(|leg| {
            let stake_amount = round(params.total_stake * leg.stake_percent / Decimal::ONE_HUNDRED);
            OpportunityLeg {
                outcome: leg.outcome,
                bookmaker: leg.bookmaker,
                odds: leg.odds,
                stake_percent: leg.stake_percent,
                stake_amount,
                potential_return: round(stake_amount * leg.odds),
            }
        })
        .collect();

    Opportunity {
        id: Uuid::new_v4(),
        match_name: event.name.clone(),
        league: event.league.clone(),
        start_time: event.start_time,
        profit_percentage: arb.profit_percentage,
        total_stake: params.total_stake,
        guaranteed_profit: round(params.total_stake * arb.profit_percentage / Decimal::ONE_HUNDRED),
        legs,
        detected_at: OffsetDateTime::now_utc(),
    }
}
