//! Best-price selection and the 2-way / 3-way arbitrage calculators.
//!
//! Pure functions over immutable input. A result of `None` always
//! means "no guaranteed-profit combination exists for this match",
//! never a fault.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::odds::{MatchEvent, OddsQuote, OutcomeSide};

/// Decimal places kept on percentages and money amounts.
const ROUND_DP: u32 = 2;

/// The best price found for one outcome slot and who offers it.
#[derive(Debug, Clone, PartialEq)]
pub struct BestPrice {
    /// Highest decimal odds quoted for the slot.
    pub odds: Decimal,
    /// Bookmaker offering them.
    pub bookmaker: String,
}

/// One leg of a hedged arbitrage combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbLeg {
    /// Outcome this leg backs.
    pub outcome: String,
    /// Bookmaker to place the bet with.
    pub bookmaker: String,
    /// Decimal odds for the leg.
    pub odds: Decimal,
    /// Share of the total stake, percent, rounded to 2 dp.
    pub stake_percent: Decimal,
}

/// A detected arbitrage for one match.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageResult {
    /// Guaranteed percentage return on total stake, rounded to 2 dp.
    pub profit_percentage: Decimal,
    /// Sum of implied probabilities across the selected best prices.
    pub total_implied: Decimal,
    /// Legs ordered home, (draw,) away.
    pub legs: Vec<ArbLeg>,
}

/// Fold over quotes, retaining the strictly highest price for a slot.
///
/// First quote wins ties, so selection is stable in quote order.
/// Non-positive prices never qualify as a best price.
pub fn best_price(quotes: &[OddsQuote], side: OutcomeSide) -> Option<BestPrice> {
    quotes.iter().fold(None, |best, quote| match quote.price(side) {
        Some(odds)
            if odds > Decimal::ZERO
                && best.as_ref().map_or(true, |b: &BestPrice| odds > b.odds) =>
        {
            Some(BestPrice {
                odds,
                bookmaker: quote.bookmaker.clone(),
            })
        }
        _ => best,
    })
}

/// Evaluate a 2-way (no draw) market.
///
/// Returns `None` if either slot has no quote or the combined implied
/// probability is 1.0 or more.
pub fn calculate_two_way(event: &MatchEvent) -> Option<ArbitrageResult> {
    let home = best_price(&event.quotes, OutcomeSide::Home)?;
    let away = best_price(&event.quotes, OutcomeSide::Away)?;

    build_result(vec![
        (event.outcome_name(OutcomeSide::Home).to_string(), home),
        (event.outcome_name(OutcomeSide::Away).to_string(), away),
    ])
}

/// Evaluate a 3-way (win/draw/win) market.
///
/// All three slots must be priced; a match flagged as a draw market
/// with no draw quote anywhere never yields an opportunity.
pub fn calculate_three_way(event: &MatchEvent) -> Option<ArbitrageResult> {
    let home = best_price(&event.quotes, OutcomeSide::Home)?;
    let draw = best_price(&event.quotes, OutcomeSide::Draw)?;
    let away = best_price(&event.quotes, OutcomeSide::Away)?;

    build_result(vec![
        (event.outcome_name(OutcomeSide::Home).to_string(), home),
        (event.outcome_name(OutcomeSide::Draw).to_string(), draw),
        (event.outcome_name(OutcomeSide::Away).to_string(), away),
    ])
}

/// Dispatch on the market type of the match.
pub fn evaluate_match(event: &MatchEvent) -> Option<ArbitrageResult> {
    let result = if event.has_draw_market {
        calculate_three_way(event)
    } else {
        calculate_two_way(event)
    };

    if let Some(ref arb) = result {
        debug!(
            match_name = %event.name,
            profit_pct = %arb.profit_percentage,
            total_implied = %arb.total_implied,
            "Arbitrage detected"
        );
    }

    result
}

/// Existence test and stake split over the selected best prices.
///
/// Arbitrage exists iff the implied probabilities sum strictly below
/// 1.0. Stake percentages are rounded to 2 dp independently and are
/// not renormalized, so they may sum slightly off 100.00.
fn build_result(selected: Vec<(String, BestPrice)>) -> Option<ArbitrageResult> {
    let implied: Vec<Decimal> = selected
        .iter()
        .map(|(_, best)| Decimal::ONE / best.odds)
        .collect();
    let total_implied: Decimal = implied.iter().copied().sum();

    if total_implied >= Decimal::ONE {
        return None;
    }

    let profit_percentage = ((Decimal::ONE / total_implied - Decimal::ONE)
        * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(ROUND_DP, RoundingStrategy::MidpointAwayFromZero);

    let legs = selected
        .into_iter()
        .zip(implied)
        .map(|((outcome, best), prob)| ArbLeg {
            outcome,
            bookmaker: best.bookmaker,
            odds: best.odds,
            stake_percent: (prob / total_implied * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(ROUND_DP, RoundingStrategy::MidpointAwayFromZero),
        })
        .collect();

    Some(ArbitrageResult {
        profit_percentage,
        total_implied,
        legs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::MatchEventBuilder;
    use rust_decimal_macros::dec;

    #[test]
    fn two_way_arbitrage_detected() {
        // Implied: 0.4762 + 0.5128 = 0.9890 < 1.0
        let event = MatchEventBuilder::new("Player A", "Player B")
            .quote("BookA", dec!(2.10), dec!(1.70))
            .quote("BookB", dec!(1.90), dec!(1.95))
            .build();

        let arb = calculate_two_way(&event).unwrap();

        assert_eq!(arb.profit_percentage, dec!(1.11));
        assert_eq!(arb.legs.len(), 2);

        assert_eq!(arb.legs[0].outcome, "Player A");
        assert_eq!(arb.legs[0].bookmaker, "BookA");
        assert_eq!(arb.legs[0].odds, dec!(2.10));
        assert_eq!(arb.legs[0].stake_percent, dec!(48.15));

        assert_eq!(arb.legs[1].outcome, "Player B");
        assert_eq!(arb.legs[1].bookmaker, "BookB");
        assert_eq!(arb.legs[1].odds, dec!(1.95));
        assert_eq!(arb.legs[1].stake_percent, dec!(51.85));
    }

    #[test]
    fn no_arbitrage_when_margin_covers_spread() {
        // 1/1.80 + 1/1.80 = 1.111 >= 1.0
        let event = MatchEventBuilder::new("A", "B")
            .quote("BookA", dec!(1.80), dec!(1.80))
            .build();

        assert!(calculate_two_way(&event).is_none());
    }

    #[test]
    fn total_implied_exactly_one_is_not_arbitrage() {
        // 1/2 + 1/2 = 1.0 exactly: no guaranteed profit
        let event = MatchEventBuilder::new("A", "B")
            .quote("BookA", dec!(2.0), dec!(2.0))
            .build();

        assert!(calculate_two_way(&event).is_none());
    }

    #[test]
    fn two_way_requires_quotes() {
        let event = MatchEventBuilder::new("A", "B").build();
        assert!(calculate_two_way(&event).is_none());
    }

    #[test]
    fn three_way_arbitrage_detected_with_draw_leg_in_middle() {
        // Best prices: 3.10, 3.60, 3.50 -> implied sum ~0.8862
        let event = MatchEventBuilder::new("Arsenal", "Chelsea")
            .with_draw_market()
            .quote_with_draw("BookA", dec!(3.10), dec!(3.20), dec!(2.90))
            .quote_with_draw("BookB", dec!(2.80), dec!(3.60), dec!(3.50))
            .build();

        let arb = calculate_three_way(&event).unwrap();

        assert_eq!(arb.legs.len(), 3);
        assert_eq!(arb.legs[0].outcome, "Arsenal");
        assert_eq!(arb.legs[1].outcome, "Draw");
        assert_eq!(arb.legs[2].outcome, "Chelsea");

        assert_eq!(arb.legs[0].bookmaker, "BookA");
        assert_eq!(arb.legs[1].bookmaker, "BookB");
        assert_eq!(arb.legs[2].bookmaker, "BookB");

        assert!(arb.profit_percentage > Decimal::ZERO);
        assert!(arb.total_implied < Decimal::ONE);
    }

    #[test]
    fn three_way_missing_draw_price_never_detects() {
        // Two-way prices favorable enough for 2-way arbitrage, but the
        // match settles on three outcomes and nobody priced the draw.
        let event = MatchEventBuilder::new("A", "B")
            .with_draw_market()
            .quote("BookA", dec!(2.50), dec!(1.60))
            .quote("BookB", dec!(1.80), dec!(2.50))
            .build();

        assert!(calculate_three_way(&event).is_none());
        assert!(evaluate_match(&event).is_none());
    }

    #[test]
    fn evaluate_match_dispatches_on_market_type() {
        let two_way = MatchEventBuilder::new("A", "B")
            .quote("BookA", dec!(2.10), dec!(1.70))
            .quote("BookB", dec!(1.90), dec!(1.95))
            .build();
        let arb = evaluate_match(&two_way).unwrap();
        assert_eq!(arb.legs.len(), 2);
    }

    #[test]
    fn best_price_first_quote_wins_ties() {
        let event = MatchEventBuilder::new("A", "B")
            .quote("BookA", dec!(2.00), dec!(1.90))
            .quote("BookB", dec!(2.00), dec!(1.90))
            .build();

        let best = best_price(&event.quotes, OutcomeSide::Home).unwrap();
        assert_eq!(best.bookmaker, "BookA");
    }

    #[test]
    fn best_price_ignores_non_positive_odds() {
        let event = MatchEventBuilder::new("A", "B")
            .quote("BadBook", dec!(-1.00), dec!(0))
            .quote("GoodBook", dec!(1.50), dec!(2.40))
            .build();

        let best = best_price(&event.quotes, OutcomeSide::Home).unwrap();
        assert_eq!(best.bookmaker, "GoodBook");
        assert!(best_price(&[], OutcomeSide::Home).is_none());
    }

    #[test]
    fn stake_split_equalizes_payout() {
        let event = MatchEventBuilder::new("A", "B")
            .quote("BookA", dec!(2.10), dec!(1.70))
            .quote("BookB", dec!(1.90), dec!(1.95))
            .build();

        let arb = calculate_two_way(&event).unwrap();

        // stake_percent * odds must agree across legs within rounding.
        let payouts: Vec<Decimal> = arb
            .legs
            .iter()
            .map(|leg| leg.stake_percent * leg.odds)
            .collect();
        let spread = payouts.iter().max().unwrap() - payouts.iter().min().unwrap();
        assert!(spread < dec!(0.05), "payout spread too wide: {}", spread);

        // Independent rounding: percentages may be slightly off 100.
        let total: Decimal = arb.legs.iter().map(|l| l.stake_percent).sum();
        assert!((total - Decimal::ONE_HUNDRED).abs() <= dec!(0.02));
    }
}
