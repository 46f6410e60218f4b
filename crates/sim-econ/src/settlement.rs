//! Monthly settlement of the player's network and per-route projections.
//!
//! Per route with an aircraft and both endpoints open:
//! - price, satisfaction and brand awareness combine into a player score
//! - every non-allied competitor on the same airport pair scores a flat
//!   [`COMPETITOR_SCORE`], and market share is the player's part of the total
//! - base demand is scaled by research, alliance, event, campaign and hub
//!   multipliers, then by market share and satisfaction
//! - daily passengers are capped by the aircraft's seats
//!
//! Totals are then scaled by the income and expense modifiers and rounded to
//! whole dollars. Fuel is already priced with the event-adjusted fuel price
//! and is not scaled again.

use crate::{money_from_f64, round_money, scale, to_f64, Modifiers};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sim_core::{
    Alliance, Catalog, Competitor, ExpenseBreakdown, FinancialReport, Player, Route, RouteId,
    BASE_FUEL_PRICE,
};
use tracing::{debug, info, warn};

pub const STANDARD_FARE_PER_KM: f64 = 0.30;
/// Fixed score each competing airline brings to a route.
pub const COMPETITOR_SCORE: f64 = 1.0;
pub const ALLIANCE_DEMAND_BONUS: f64 = 1.05;
pub const HUB_DEMAND_MULTIPLIER: f64 = 1.2;
/// Fee per flight at one airport; a route flies one flight each way per day.
pub const AIRPORT_FEE_PER_FLIGHT: i64 = 500;
/// Share of the per-flight fee waived at the player's hub.
pub const HUB_FEE_DISCOUNT: f64 = 0.5;
pub const BASE_SALARY: i64 = 200_000;
pub const SALARY_PER_AIRCRAFT: i64 = 40_000;
pub const SALARY_PER_ROUTE: i64 = 15_000;
/// Horizon of a route projection, in days.
pub const PROJECTION_DAYS: u32 = 30;

pub fn standard_fare(distance_km: f64) -> f64 {
    distance_km * STANDARD_FARE_PER_KM
}

/// Rewards pricing under the standard fare, penalizes pricing over it.
pub fn price_factor(distance_km: f64, ticket_price: Decimal) -> f64 {
    let fare = standard_fare(distance_km);
    let ticket = to_f64(ticket_price);
    if fare > 0.0 && ticket > 0.0 {
        (fare / ticket).max(0.1)
    } else {
        1.0
    }
}

/// 0.8 at no awareness, 1.2 at full awareness.
pub fn brand_awareness_factor(brand_awareness: f64) -> f64 {
    0.8 + (brand_awareness / 100.0) * 0.4
}

pub fn daily_airport_fee(route: &Route, hub: Option<&sim_core::AirportId>) -> Decimal {
    let per_flight = Decimal::from(AIRPORT_FEE_PER_FLIGHT);
    let mut fee = per_flight * Decimal::from(2);
    if let Some(hub) = hub {
        let waived = scale(per_flight, HUB_FEE_DISCOUNT);
        if &route.origin == hub {
            fee -= waived;
        }
        if &route.destination == hub {
            fee -= waived;
        }
    }
    fee
}

pub fn salary_cost(fleet_size: usize, route_count: usize) -> Decimal {
    Decimal::from(BASE_SALARY)
        + Decimal::from(SALARY_PER_AIRCRAFT) * Decimal::from(fleet_size as u64)
        + Decimal::from(SALARY_PER_ROUTE) * Decimal::from(route_count as u64)
}

/// Result of evaluating one route over a number of days.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteOutcome {
    pub route: RouteId,
    /// Whether the route flew at all (aircraft assigned, endpoints open).
    pub operating: bool,
    pub market_share: f64,
    pub competitors: usize,
    /// Daily demand captured by the player, before the seat cap.
    pub demand: u32,
    pub daily_passengers: u32,
    pub load_factor: f64,
    pub income: Decimal,
    pub fuel_cost: f64,
    pub airport_fees: Decimal,
}

impl RouteOutcome {
    fn grounded(route: &Route) -> Self {
        Self {
            route: route.id.clone(),
            operating: false,
            market_share: 0.0,
            competitors: 0,
            demand: 0,
            daily_passengers: 0,
            load_factor: 0.0,
            income: Decimal::ZERO,
            fuel_cost: 0.0,
            airport_fees: Decimal::ZERO,
        }
    }

    /// Income minus fuel and fees, before any modifier.
    pub fn profit(&self) -> Decimal {
        self.income - money_from_f64(self.fuel_cost) - self.airport_fees
    }
}

/// Output of one monthly settlement.
#[derive(Clone, Debug, PartialEq)]
pub struct Settlement {
    pub report: FinancialReport,
    pub new_cash: Decimal,
    /// Fuel price used this month; stored on the player for the next AI turn.
    pub fuel_price: f64,
    pub routes: Vec<RouteOutcome>,
}

impl Settlement {
    /// Write cash, fuel price and the report into the player.
    pub fn apply_to(&self, player: &mut Player) {
        player.cash = self.new_cash;
        player.fuel_price = self.fuel_price;
        player.last_month_income = Some(self.report.income);
        player.last_month_expense = Some(self.report.expenses.total);
        player.financial_history.push(self.report.clone());
    }
}

/// Read-only view of everything a settlement consults.
#[derive(Clone, Copy, Debug)]
pub struct Market<'a> {
    pub player: &'a Player,
    pub competitors: &'a [Competitor],
    pub alliances: &'a [Alliance],
    pub catalog: &'a Catalog,
    pub modifiers: &'a Modifiers,
}

impl<'a> Market<'a> {
    /// Base fuel price adjusted by events and fuel-efficiency research.
    pub fn fuel_price(&self) -> f64 {
        BASE_FUEL_PRICE * self.modifiers.fuel_price * self.player.research_modifiers.fuel_efficiency
    }

    /// Competitors outside the player's alliance flying the same airport pair.
    pub fn competitors_on(&self, route: &Route) -> usize {
        let alliance = self.player.alliance.as_ref();
        self.competitors
            .iter()
            .filter(|c| !c.is_allied_with(alliance))
            .filter(|c| c.network.serves_pair(&route.origin, &route.destination))
            .count()
    }

    /// Whether an alliance partner flies to or from either endpoint.
    pub fn partner_at_endpoint(&self, route: &Route) -> bool {
        let Some(alliance_id) = self.player.alliance.as_ref() else {
            return false;
        };
        let Some(alliance) = self.alliances.iter().find(|a| &a.id == alliance_id) else {
            return false;
        };
        alliance.competitor_members().any(|member| {
            self.competitors.iter().any(|c| {
                &c.id == member
                    && c.is_allied_with(Some(alliance_id))
                    && (c.network.serves_airport(&route.origin)
                        || c.network.serves_airport(&route.destination))
            })
        })
    }

    fn is_hub_route(&self, route: &Route) -> bool {
        self.player
            .hub
            .as_ref()
            .is_some_and(|hub| route.touches(hub))
    }

    /// Evaluate one player route over `days` at `fuel_price`.
    pub fn evaluate_route(&self, route: &Route, days: u32, fuel_price: f64) -> RouteOutcome {
        let Some(aircraft) = self.player.network.assigned_to(route) else {
            return RouteOutcome::grounded(route);
        };
        if self.modifiers.is_closed(&route.origin) || self.modifiers.is_closed(&route.destination) {
            return RouteOutcome::grounded(route);
        }
        let Some(model) = self.catalog.model(&aircraft.model) else {
            warn!(route = %route.id, model = %aircraft.model, "unknown aircraft model; route skipped");
            return RouteOutcome::grounded(route);
        };
        let (Some(origin), Some(destination)) = (
            self.catalog.airport(&route.origin),
            self.catalog.airport(&route.destination),
        ) else {
            warn!(route = %route.id, "route references an unknown airport; skipped");
            return RouteOutcome::grounded(route);
        };

        let player = self.player;
        let satisfaction = player.satisfaction();
        let score = price_factor(route.distance_km, route.ticket_price)
            * (satisfaction / 50.0)
            * brand_awareness_factor(player.brand_awareness());
        let competitors = self.competitors_on(route);
        let market_share = if competitors == 0 {
            1.0
        } else {
            let total = score + competitors as f64 * COMPETITOR_SCORE;
            if total > 0.0 {
                score / total
            } else {
                0.0
            }
        };

        let mods = self.modifiers;
        let mut base = f64::from(route.base_demand) * player.research_modifiers.base_demand;
        if self.partner_at_endpoint(route) {
            base *= ALLIANCE_DEMAND_BONUS;
        }
        base *= mods
            .airport_demand(&route.origin)
            .max(mods.airport_demand(&route.destination));
        base *= mods
            .regional_demand(&origin.region)
            .max(mods.regional_demand(&destination.region));
        if self.is_hub_route(route) {
            base = (base * HUB_DEMAND_MULTIPLIER).round();
        }

        let satisfaction_multiplier = 0.5 + satisfaction / 100.0;
        let demand = (base * market_share * satisfaction_multiplier).round().max(0.0) as u32;
        let daily_passengers = demand.min(model.seats);
        let load_factor = f64::from(daily_passengers) / f64::from(model.seats);

        let income = Decimal::from(daily_passengers) * route.ticket_price * Decimal::from(days);
        let fuel_cost = route.distance_km * 2.0 * f64::from(days) * model.fuel_burn * fuel_price;
        let airport_fees = daily_airport_fee(route, player.hub.as_ref()) * Decimal::from(days);

        debug!(
            route = %route.id,
            market_share,
            competitors,
            demand,
            daily_passengers,
            %income,
            fuel_cost,
            "route evaluated"
        );
        RouteOutcome {
            route: route.id.clone(),
            operating: true,
            market_share,
            competitors,
            demand,
            daily_passengers,
            load_factor,
            income,
            fuel_cost,
            airport_fees,
        }
    }

    /// Monthly maintenance for the whole fleet, after research.
    fn maintenance(&self) -> Decimal {
        let player = self.player;
        let sum: Decimal = player
            .network
            .fleet()
            .iter()
            .filter_map(|a| match self.catalog.model(&a.model) {
                Some(m) => Some(m.monthly_maintenance),
                None => {
                    warn!(aircraft = %a.id, model = %a.model, "unknown aircraft model; no maintenance charged");
                    None
                }
            })
            .sum();
        scale(sum, player.research_modifiers.maintenance)
    }

    /// Settle the month ending on `month` (its last day), `days` long.
    pub fn settle(&self, month: NaiveDate, days: u32) -> Settlement {
        let fuel_price = self.fuel_price();
        let routes: Vec<RouteOutcome> = self
            .player
            .network
            .routes()
            .iter()
            .map(|r| self.evaluate_route(r, days, fuel_price))
            .collect();

        let total_income: Decimal = routes.iter().map(|r| r.income).sum();
        let total_fuel: f64 = routes.iter().map(|r| r.fuel_cost).sum();
        let total_fees: Decimal = routes.iter().map(|r| r.airport_fees).sum();

        let expense = self.modifiers.expense;
        let network = &self.player.network;
        let income = round_money(scale(total_income, self.modifiers.income));
        let maintenance = round_money(scale(self.maintenance(), expense));
        let airport_fees = round_money(scale(total_fees, expense));
        let salaries = round_money(scale(
            salary_cost(network.fleet().len(), network.routes().len()),
            expense,
        ));
        let fuel = money_from_f64(total_fuel);
        let total = maintenance + fuel + airport_fees + salaries;

        let report = FinancialReport {
            month,
            income,
            expenses: ExpenseBreakdown {
                maintenance,
                fuel,
                airport_fees,
                salaries,
                total,
            },
        };
        let new_cash = self.player.cash + income - total;
        info!(
            month = %month,
            %income,
            expenses = %total,
            cash = %new_cash,
            "month settled"
        );
        Settlement {
            report,
            new_cash,
            fuel_price,
            routes,
        }
    }

    /// 30-day estimate for one player route at the player's stored fuel price.
    pub fn project(&self, route_id: &RouteId) -> Option<RouteOutcome> {
        let route = self.player.network.route(route_id)?;
        Some(self.evaluate_route(route, PROJECTION_DAYS, self.player.fuel_price))
    }
}
