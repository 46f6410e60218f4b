//! Game calendar and speed control.
//!
//! The clock advances one simulated day per tick. While a blocking notice
//! is pending it is held: the speed drops to zero and the previous speed is
//! restored on release.

use chrono::{Datelike, NaiveDate};
use sim_core::dates;
use std::time::Duration;

/// Allowed simulation speeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GameSpeed {
    #[default]
    Paused,
    Normal,
    Fast,
    Fastest,
}

impl GameSpeed {
    /// Accepts 0, 1, 2 and 4.
    pub fn from_multiplier(m: u8) -> Option<Self> {
        match m {
            0 => Some(GameSpeed::Paused),
            1 => Some(GameSpeed::Normal),
            2 => Some(GameSpeed::Fast),
            4 => Some(GameSpeed::Fastest),
            _ => None,
        }
    }

    pub fn multiplier(self) -> u8 {
        match self {
            GameSpeed::Paused => 0,
            GameSpeed::Normal => 1,
            GameSpeed::Fast => 2,
            GameSpeed::Fastest => 4,
        }
    }

    pub fn is_running(self) -> bool {
        self != GameSpeed::Paused
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    date: NaiveDate,
    speed: GameSpeed,
    last_speed: GameSpeed,
    /// Speed to restore once every notice is dismissed.
    held: Option<GameSpeed>,
    last_processed_month: u32,
}

impl Clock {
    /// A paused clock on `date`, treating `date`'s month as already settled.
    pub fn new(date: NaiveDate) -> Self {
        Self::resume(date, date.month(), GameSpeed::Normal)
    }

    /// A paused clock restored from saved state.
    pub fn resume(date: NaiveDate, last_processed_month: u32, last_speed: GameSpeed) -> Self {
        Self {
            date,
            speed: GameSpeed::Paused,
            last_speed: if last_speed.is_running() {
                last_speed
            } else {
                GameSpeed::Normal
            },
            held: None,
            last_processed_month,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    /// Most recent non-zero speed.
    pub fn last_speed(&self) -> GameSpeed {
        self.last_speed
    }

    pub fn last_processed_month(&self) -> u32 {
        self.last_processed_month
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    /// While held, the new speed takes effect on release.
    pub fn set_speed(&mut self, speed: GameSpeed) {
        if speed.is_running() {
            self.last_speed = speed;
        }
        match self.held.as_mut() {
            Some(resume) => *resume = speed,
            None => self.speed = speed,
        }
    }

    /// Pause, or resume at the last non-zero speed.
    pub fn toggle_pause(&mut self) {
        let next = if self.current_target().is_running() {
            GameSpeed::Paused
        } else {
            self.last_speed
        };
        self.set_speed(next);
    }

    fn current_target(&self) -> GameSpeed {
        self.held.unwrap_or(self.speed)
    }

    /// Stop the clock for a blocking notice. Nested holds keep the first speed.
    pub fn hold(&mut self) {
        if self.held.is_none() {
            self.held = Some(self.speed);
            self.speed = GameSpeed::Paused;
        }
    }

    pub fn release(&mut self) {
        if let Some(speed) = self.held.take() {
            self.speed = speed;
        }
    }

    /// Terminal stop: paused, with nothing to restore.
    pub fn stop(&mut self) {
        self.held = None;
        self.speed = GameSpeed::Paused;
    }

    /// Wall-clock time between ticks; `None` while paused.
    pub fn tick_interval(&self, base_tick_ms: u64) -> Option<Duration> {
        match self.speed.multiplier() {
            0 => None,
            m => Some(Duration::from_millis(base_tick_ms / u64::from(m))),
        }
    }

    pub fn advance_day(&mut self) -> NaiveDate {
        self.date = dates::add_days(self.date, 1);
        self.date
    }

    /// The calendar has entered a month that has not been settled yet.
    pub fn month_rolled(&self) -> bool {
        self.date.month() != self.last_processed_month
    }

    pub fn mark_processed(&mut self) {
        self.last_processed_month = self.date.month();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> Clock {
        Clock::new(NaiveDate::from_ymd_opt(2024, 1, 30).unwrap())
    }

    #[test]
    fn speeds_and_intervals() {
        assert_eq!(GameSpeed::from_multiplier(3), None);
        let mut c = clock();
        assert_eq!(c.tick_interval(1000), None);
        c.set_speed(GameSpeed::Fastest);
        assert_eq!(c.tick_interval(1000), Some(Duration::from_millis(250)));
        c.set_speed(GameSpeed::Fast);
        assert_eq!(c.tick_interval(1000), Some(Duration::from_millis(500)));
    }

    #[test]
    fn toggle_returns_to_last_running_speed() {
        let mut c = clock();
        c.toggle_pause();
        assert_eq!(c.speed(), GameSpeed::Normal);
        c.set_speed(GameSpeed::Fastest);
        c.toggle_pause();
        assert_eq!(c.speed(), GameSpeed::Paused);
        c.toggle_pause();
        assert_eq!(c.speed(), GameSpeed::Fastest);
    }

    #[test]
    fn hold_and_release_restore_speed() {
        let mut c = clock();
        c.set_speed(GameSpeed::Fast);
        c.hold();
        c.hold();
        assert_eq!(c.speed(), GameSpeed::Paused);
        assert!(c.is_held());
        c.set_speed(GameSpeed::Fastest);
        assert_eq!(c.speed(), GameSpeed::Paused);
        c.release();
        assert_eq!(c.speed(), GameSpeed::Fastest);

        c.hold();
        c.stop();
        c.release();
        assert_eq!(c.speed(), GameSpeed::Paused);
    }

    #[test]
    fn month_rollover() {
        let mut c = clock();
        c.advance_day();
        assert!(!c.month_rolled());
        c.advance_day();
        assert_eq!(c.date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!(c.month_rolled());
        c.mark_processed();
        assert!(!c.month_rolled());
    }
}
