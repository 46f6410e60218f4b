//! Event engine: expiry, monthly trigger and one-shot effects.

use chrono::NaiveDate;
use sim_core::rng::choose;
use sim_core::{ActiveGameEvent, EventPhase, GameEvent, Player, RandomSource};
use tracing::{debug, info};

/// Active events plus a newest-first history log.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventBoard {
    active: Vec<ActiveGameEvent>,
    history: Vec<ActiveGameEvent>,
    history_cap: usize,
}

impl EventBoard {
    pub fn new(history_cap: usize) -> Self {
        Self {
            active: Vec::new(),
            history: Vec::new(),
            history_cap,
        }
    }

    pub fn restore(
        active: Vec<ActiveGameEvent>,
        mut history: Vec<ActiveGameEvent>,
        history_cap: usize,
    ) -> Self {
        history.truncate(history_cap);
        Self {
            active,
            history,
            history_cap,
        }
    }

    pub fn active(&self) -> &[ActiveGameEvent] {
        &self.active
    }

    pub fn history(&self) -> &[ActiveGameEvent] {
        &self.history
    }

    /// Drop events whose expiry date has been reached.
    pub fn expire(&mut self, today: NaiveDate) -> usize {
        let before = self.active.len();
        self.active.retain(|e| e.phase_on(today) != EventPhase::Expired);
        let dropped = before - self.active.len();
        if dropped > 0 {
            debug!(dropped, "events expired");
        }
        dropped
    }

    /// With probability `chance`, fire a random catalog event starting today.
    ///
    /// The caller applies its one-shot effects; instantaneous events go
    /// straight to history.
    pub fn roll<R: RandomSource + ?Sized>(
        &mut self,
        catalog: &[GameEvent],
        today: NaiveDate,
        chance: f64,
        rng: &mut R,
    ) -> Option<ActiveGameEvent> {
        if !rng.chance(chance) {
            return None;
        }
        let event = choose(rng, catalog)?.clone();
        let bound = ActiveGameEvent::bind(event, today);
        info!(event = %bound.event.id, title = %bound.event.title, until = %bound.expiry, "event triggered");
        if !bound.event.is_instantaneous() {
            self.active.push(bound.clone());
        }
        self.history.insert(0, bound.clone());
        self.history.truncate(self.history_cap);
        Some(bound)
    }
}

/// Apply an event's immediate cash and satisfaction deltas.
pub fn apply_one_shot(player: &mut Player, event: &GameEvent) {
    if let Some(cash) = event.effects.cash {
        player.cash += cash;
    }
    if let Some(delta) = event.effects.satisfaction {
        player.adjust_satisfaction(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sim_core::{EventPolarity, GameEventEffect, ScriptedRandom};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, days: u32, effects: GameEventEffect) -> GameEvent {
        GameEvent {
            id: id.into(),
            title: id.to_string(),
            description: String::new(),
            polarity: EventPolarity::Neutral,
            duration_days: days,
            effects,
        }
    }

    fn catalog() -> Vec<GameEvent> {
        vec![
            event("boom", 30, GameEventEffect { income_modifier: Some(1.2), ..Default::default() }),
            event(
                "award",
                0,
                GameEventEffect {
                    cash: Some(Decimal::new(-1_000, 0)),
                    satisfaction: Some(40.0),
                    ..Default::default()
                },
            ),
        ]
    }

    #[test]
    fn durational_events_become_active_and_expire() {
        let mut board = EventBoard::new(20);
        let mut rng = ScriptedRandom::new([0.1, 0.0]);
        let fired = board.roll(&catalog(), ymd(2024, 2, 1), 0.3, &mut rng).unwrap();
        assert_eq!(fired.expiry, ymd(2024, 3, 2));
        assert_eq!(board.active().len(), 1);

        assert_eq!(board.expire(ymd(2024, 3, 1)), 0);
        assert_eq!(board.expire(ymd(2024, 3, 2)), 1);
        assert!(board.active().is_empty());
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn instantaneous_events_only_reach_history() {
        let mut board = EventBoard::new(20);
        let mut rng = ScriptedRandom::new([0.0, 0.9]);
        let fired = board.roll(&catalog(), ymd(2024, 2, 1), 0.3, &mut rng).unwrap();
        assert!(board.active().is_empty());
        assert_eq!(board.history()[0], fired);

        let mut player = Player::new("SkyCo", Decimal::new(500, 0));
        apply_one_shot(&mut player, &fired.event);
        assert_eq!(player.cash, Decimal::new(-500, 0));
        assert_eq!(player.satisfaction(), 100.0);
    }

    #[test]
    fn missed_roll_draws_once() {
        let mut board = EventBoard::new(20);
        let mut rng = ScriptedRandom::new([0.5, 0.0]);
        assert!(board.roll(&catalog(), ymd(2024, 2, 1), 0.3, &mut rng).is_none());
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn history_is_capped_newest_first() {
        let mut board = EventBoard::new(3);
        let mut rng = ScriptedRandom::constant(0.0);
        for day in 1..=5 {
            board.roll(&catalog(), ymd(2024, 1, day), 1.0, &mut rng);
        }
        assert_eq!(board.history().len(), 3);
        assert_eq!(board.history()[0].start, ymd(2024, 1, 5));
        assert_eq!(board.history()[2].start, ymd(2024, 1, 3));
    }
}
