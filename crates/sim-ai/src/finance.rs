//! Simplified monthly accounts for AI airlines.
//!
//! Competitors fly every operating route at a flat load factor and the
//! standard fare; costs are fuel, airport fees and fleet maintenance.

use crate::AiContext;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sim_core::Competitor;
use sim_econ::settlement::{standard_fare, AIRPORT_FEE_PER_FLIGHT};
use sim_econ::to_f64;
use tracing::{debug, warn};

/// Share of seats an AI airline fills every day.
pub const AI_LOAD_FACTOR: f64 = 0.7;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MonthlyAccounts {
    pub income: f64,
    pub expenses: f64,
}

impl MonthlyAccounts {
    pub fn profit(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Income and expenses of `comp` for the month described by `ctx`.
pub fn monthly_accounts(comp: &Competitor, ctx: &AiContext<'_>) -> MonthlyAccounts {
    let days = f64::from(ctx.days_in_month);
    let mut accounts = MonthlyAccounts::default();
    for (route, aircraft) in comp.network.operating() {
        let Some(model) = ctx.catalog.model(&aircraft.model) else {
            warn!(competitor = %comp.id, model = %aircraft.model, "unknown aircraft model; route skipped");
            continue;
        };
        let passengers = f64::from(model.seats) * AI_LOAD_FACTOR;
        accounts.income += passengers * standard_fare(route.distance_km) * days;
        accounts.expenses += route.distance_km * 2.0 * days * model.fuel_burn * ctx.fuel_price;
        accounts.expenses += (AIRPORT_FEE_PER_FLIGHT * 2) as f64 * days;
    }
    let maintenance: Decimal = comp
        .network
        .fleet()
        .iter()
        .filter_map(|a| ctx.catalog.model(&a.model))
        .map(|m| m.monthly_maintenance)
        .sum();
    accounts.expenses += to_f64(maintenance);
    accounts
}

/// Book this month's profit or loss, rounded to cents.
pub fn apply_month(comp: &mut Competitor, ctx: &AiContext<'_>) {
    let accounts = monthly_accounts(comp, ctx);
    let delta = Decimal::from_f64(accounts.profit())
        .unwrap_or(Decimal::ZERO)
        .round_dp(2);
    comp.cash += delta;
    debug!(competitor = %comp.id, income = accounts.income, expenses = accounts.expenses, cash = %comp.cash, "competitor accounts");
}
