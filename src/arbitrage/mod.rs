//! Arbitrage detection engine.
//!
//! This module handles:
//! - Best-price selection across bookmakers
//! - 2-way and 3-way arbitrage calculation
//! - Opportunity assembly with stake amounts, filtering and sorting

pub mod calculator;
pub mod opportunity;

pub use calculator::{calculate_three_way, calculate_two_way, evaluate_match, ArbLeg, ArbitrageResult, BestPrice};
pub use opportunity::{find_opportunities, Opportunity, OpportunityLeg, OpportunityParams};
