use crate::dates;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the deterministic RNG.
    pub rng_seed: u64,
    /// First day of a new game.
    #[serde(with = "dates::iso")]
    pub start_date: NaiveDate,
    /// Player cash at the start of a new game, USD.
    pub starting_cash: Decimal,
    /// Wall-clock milliseconds per simulated day at 1x speed.
    pub base_tick_ms: u64,
    /// Monthly probability that a catalog event fires.
    pub event_chance: f64,
    /// Number of entries kept in the event history log.
    pub event_history_cap: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            starting_cash: Decimal::new(500_000_000, 0),
            base_tick_ms: 1000,
            event_chance: 0.3,
            event_history_cap: 20,
        }
    }
}
