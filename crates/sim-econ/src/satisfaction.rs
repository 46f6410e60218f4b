//! Monthly passenger-satisfaction update.

use crate::settlement::standard_fare;
use crate::to_f64;
use chrono::NaiveDate;
use sim_core::airline::SATISFACTION_RANGE;
use sim_core::Player;

pub const ALLIANCE_SATISFACTION_BONUS: f64 = 2.0;

/// Step function over `ticket_price / standard_fare`.
pub fn price_satisfaction(price_ratio: f64) -> f64 {
    if price_ratio < 0.8 {
        1.5
    } else if price_ratio < 1.0 {
        1.0
    } else if price_ratio < 1.2 {
        -0.5
    } else if price_ratio < 1.5 {
        -1.5
    } else {
        -3.0
    }
}

pub fn age_satisfaction(age_years: f64) -> f64 {
    if age_years > 25.0 {
        -2.0
    } else if age_years > 15.0 {
        -1.0
    } else if age_years < 5.0 {
        0.5
    } else {
        0.0
    }
}

/// Satisfaction for the next settlement, clamped to its range.
///
/// The mean price and age terms over operating routes are added to the
/// current value, together with the service-quality and on-time terms and
/// the alliance bonus.
pub fn next_satisfaction(player: &Player, today: NaiveDate) -> f64 {
    let mut points = 0.0;
    let mut active = 0u32;
    for (route, aircraft) in player.network.operating() {
        active += 1;
        let fare = standard_fare(route.distance_km);
        if fare > 0.0 {
            points += price_satisfaction(to_f64(route.ticket_price) / fare);
        }
        points += age_satisfaction(aircraft.age_years(today));
    }
    let route_change = if active > 0 {
        points / f64::from(active)
    } else {
        0.0
    };
    let service = (player.service_quality() - 70.0) / 20.0;
    let punctuality = (player.on_time_performance() - 90.0) / 10.0;
    let mut next = player.satisfaction() + route_change + service + punctuality;
    if player.alliance.is_some() {
        next += ALLIANCE_SATISFACTION_BONUS;
    }
    next.clamp(*SATISFACTION_RANGE.start(), *SATISFACTION_RANGE.end())
}
