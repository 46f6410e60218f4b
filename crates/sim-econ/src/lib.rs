#![deny(warnings)]

//! Economic models for the airline simulation.
//!
//! This crate provides:
//! - The modifier aggregator folding events and campaigns into multipliers
//! - Monthly settlement of the player's routes and the per-route projection
//! - The satisfaction model and on-time performance drift
//! - Aircraft resale valuation

pub mod modifiers;
pub mod on_time;
pub mod satisfaction;
pub mod settlement;
pub mod valuation;

pub use modifiers::{closed_airports, compile, Modifiers};
pub use on_time::drift_on_time;
pub use satisfaction::{age_satisfaction, next_satisfaction, price_satisfaction};
pub use settlement::{Market, RouteOutcome, Settlement, STANDARD_FARE_PER_KM};
pub use valuation::resale_value;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole currency units, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole-unit money from a float amount. Non-finite input yields zero.
pub fn money_from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value.round()).unwrap_or(Decimal::ZERO)
}

/// Multiply `value` by a float factor without leaving decimal arithmetic.
pub fn scale(value: Decimal, factor: f64) -> Decimal {
    match Decimal::from_f64(factor) {
        Some(f) => value * f,
        None => value,
    }
}

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
