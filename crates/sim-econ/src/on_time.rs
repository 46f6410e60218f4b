//! Monthly drift of on-time performance.

use chrono::NaiveDate;
use sim_core::airline::ON_TIME_RANGE;
use sim_core::{Player, RandomSource};

pub const AGING_THRESHOLD_YEARS: f64 = 20.0;
pub const AGING_PENALTY_CHANCE: f64 = 0.02;
pub const AGING_PENALTY: f64 = 0.1;
pub const RECOVERY_CHANCE: f64 = 0.2;
pub const RECOVERY: f64 = 0.05;

/// Next on-time performance value.
///
/// Each in-service aircraft older than twenty years may cost a little
/// punctuality; then a small recovery may apply.
pub fn drift_on_time<R: RandomSource + ?Sized>(
    player: &Player,
    today: NaiveDate,
    rng: &mut R,
) -> f64 {
    let mut value = player.on_time_performance();
    for aircraft in player.network.fleet().iter().filter(|a| !a.is_idle()) {
        if aircraft.age_years(today) > AGING_THRESHOLD_YEARS && rng.chance(AGING_PENALTY_CHANCE) {
            value -= AGING_PENALTY;
        }
    }
    if rng.chance(RECOVERY_CHANCE) {
        value += RECOVERY;
    }
    value.clamp(*ON_TIME_RANGE.start(), *ON_TIME_RANGE.end())
}
