//! Aircraft resale valuation.

use crate::{round_money, scale};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sim_core::{AircraftInstance, AircraftModel};

/// Largest share of the list price an aircraft can lose.
pub const MAX_DEPRECIATION: f64 = 0.8;
/// Years over which the maximum depreciation accrues linearly.
pub const DEPRECIATION_YEARS: f64 = 25.0;

/// Sale price of `aircraft` on `today`, in whole dollars.
pub fn resale_value(model: &AircraftModel, aircraft: &AircraftInstance, today: NaiveDate) -> Decimal {
    let years = aircraft.age_years(today).max(0.0);
    let depreciation = (years * MAX_DEPRECIATION / DEPRECIATION_YEARS).min(MAX_DEPRECIATION);
    round_money(scale(model.price, 1.0 - depreciation))
}
