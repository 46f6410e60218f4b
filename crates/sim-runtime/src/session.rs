//! The game session: state ownership, the daily/monthly pipeline, notices
//! and save/load.

use crate::clock::{Clock, GameSpeed};
use crate::events::{apply_one_shot, EventBoard};
use crate::lifecycle;
use crate::rankings::{self, Ranking};
use chrono::NaiveDate;
use persistence::{load_or_discard, save_to, PersistError, SaveGame, SaveStore, SAVE_KEY};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use sim_ai::AiContext;
use sim_core::{
    dates, ActiveGameEvent, AircraftInstance, Alliance, AirportId, Catalog, Competitor,
    FinancialReport, IdAllocator, Network, Player, RandomSource, ResearchProject, RouteId,
    SimConfig,
};
use sim_econ::{Market, Modifiers, RouteOutcome};
use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Scripted rivals of a new game: id, name, colour, cash, fleet.
const STARTING_COMPETITORS: [(&str, &str, &str, i64, [&str; 2]); 4] = [
    ("ai-1", "Quantum Airlines", "#F97316", 400_000_000, ["B737", "A320"]),
    ("ai-2", "Starlight Airways", "#EF4444", 350_000_000, ["B737", "E190"]),
    ("ai-3", "Apex Air", "#A855F7", 380_000_000, ["A320", "E190"]),
    ("ai-4", "Velocity Wings", "#EC4899", 320_000_000, ["B737", "ATR72"]),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// Cash went negative; only a restart or load continues.
    GameOver,
}

/// Something the player must acknowledge; the clock is held while any is pending.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    MonthlyReport(FinancialReport),
    Event(ActiveGameEvent),
    ResearchCompleted(ResearchProject),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteStatus {
    Unassigned,
    Operating,
    /// An endpoint is closed by an active event.
    Suspended,
}

#[derive(Clone, Debug)]
pub struct GameSession<R = ChaCha8Rng> {
    pub(crate) catalog: Catalog,
    pub(crate) config: SimConfig,
    pub(crate) state: GameState,
    pub(crate) player: Player,
    pub(crate) competitors: Vec<Competitor>,
    pub(crate) alliances: Vec<Alliance>,
    pub(crate) clock: Clock,
    pub(crate) events: EventBoard,
    pub(crate) notices: VecDeque<Notice>,
    pub(crate) ids: IdAllocator,
    pub(crate) rng: R,
    /// Airports picked so far for a new route.
    pub(crate) route_plan: Vec<AirportId>,
    /// Route whose aircraft assignment is being edited.
    pub(crate) assignment_target: Option<RouteId>,
}

fn starting_competitors(catalog: &Catalog, start: NaiveDate, ids: &mut IdAllocator) -> Vec<Competitor> {
    STARTING_COMPETITORS
        .iter()
        .map(|(id, name, color, cash, models)| {
            let mut network = Network::new();
            for model in models {
                if catalog.model(&(*model).into()).is_none() {
                    warn!(competitor = id, model, "starting aircraft model missing from catalog");
                    continue;
                }
                network.add_aircraft(AircraftInstance::new(ids.aircraft(), (*model).into(), start));
            }
            Competitor {
                id: (*id).into(),
                name: (*name).to_string(),
                color: (*color).to_string(),
                cash: Decimal::new(*cash, 0),
                network,
                alliance: None,
            }
        })
        .collect()
}

impl GameSession<ChaCha8Rng> {
    /// Start a new game seeded from `config.rng_seed`.
    pub fn new_game(catalog: Catalog, config: SimConfig, company: &str) -> Self {
        let rng = sim_core::rng::seeded(config.rng_seed);
        Self::with_rng(catalog, config, company, rng)
    }

    /// Resume the stored game, if there is a readable one.
    pub fn load<S: SaveStore + ?Sized>(
        store: &mut S,
        catalog: Catalog,
        config: SimConfig,
    ) -> Result<Option<Self>, PersistError> {
        let rng = sim_core::rng::seeded(config.rng_seed);
        Ok(load_or_discard(store)?.map(|save| Self::restore(catalog, config, save, rng)))
    }
}

impl<R: RandomSource> GameSession<R> {
    pub fn with_rng(catalog: Catalog, config: SimConfig, company: &str, rng: R) -> Self {
        let mut ids = IdAllocator::new();
        let competitors = starting_competitors(&catalog, config.start_date, &mut ids);
        info!(company, competitors = competitors.len(), "new game");
        Self {
            player: Player::new(company, config.starting_cash),
            competitors,
            alliances: Vec::new(),
            clock: Clock::new(config.start_date),
            events: EventBoard::new(config.event_history_cap),
            state: GameState::Playing,
            notices: VecDeque::new(),
            ids,
            rng,
            route_plan: Vec::new(),
            assignment_target: None,
            catalog,
            config,
        }
    }

    /// Rebuild a session from a snapshot. It starts paused.
    pub fn restore(catalog: Catalog, config: SimConfig, save: SaveGame, rng: R) -> Self {
        let last_speed = GameSpeed::from_multiplier(save.last_speed).unwrap_or(GameSpeed::Normal);
        let mut session = Self {
            player: save.player,
            competitors: save.competitors,
            alliances: save.alliances,
            clock: Clock::resume(save.game_date, save.last_processed_month, last_speed),
            events: EventBoard::restore(save.active_events, save.event_history, config.event_history_cap),
            state: GameState::Playing,
            notices: VecDeque::new(),
            ids: save.ids,
            rng,
            route_plan: Vec::new(),
            assignment_target: None,
            catalog,
            config,
        };
        info!(company = %session.player.company_name, date = %session.clock.date(), "game loaded");
        session.check_game_over();
        session
    }

    /// Throw away the stored save and begin again under `company`.
    pub fn restart<S: SaveStore + ?Sized>(&mut self, store: &mut S, company: &str) -> Result<(), PersistError> {
        store.remove(SAVE_KEY)?;
        let mut ids = IdAllocator::new();
        self.competitors = starting_competitors(&self.catalog, self.config.start_date, &mut ids);
        self.ids = ids;
        self.player = Player::new(company, self.config.starting_cash);
        self.alliances.clear();
        self.clock = Clock::new(self.config.start_date);
        self.events = EventBoard::new(self.config.event_history_cap);
        self.state = GameState::Playing;
        self.notices.clear();
        self.route_plan.clear();
        self.assignment_target = None;
        info!(company, "game restarted");
        Ok(())
    }

    pub fn snapshot(&self) -> SaveGame {
        SaveGame {
            player: self.player.clone(),
            competitors: self.competitors.clone(),
            alliances: self.alliances.clone(),
            game_date: self.clock.date(),
            last_processed_month: self.clock.last_processed_month(),
            active_events: self.events.active().to_vec(),
            event_history: self.events.history().to_vec(),
            last_speed: self.clock.last_speed().multiplier(),
            ids: self.ids.clone(),
        }
    }

    /// Store the game; returns false (and stores nothing) after game over.
    pub fn save<S: SaveStore + ?Sized>(&self, store: &mut S) -> Result<bool, PersistError> {
        if self.state != GameState::Playing {
            return Ok(false);
        }
        save_to(store, &self.snapshot())?;
        Ok(true)
    }

    // --- clock and pipeline ---

    /// One timer tick: a day passes only while the clock runs.
    pub fn tick(&mut self) -> bool {
        if !self.clock.speed().is_running() {
            return false;
        }
        self.advance_day()
    }

    /// Step one day regardless of speed.
    ///
    /// Refused while a notice is pending or after game over.
    pub fn advance_day(&mut self) -> bool {
        if self.state != GameState::Playing || !self.notices.is_empty() {
            return false;
        }
        let today = self.clock.advance_day();
        self.run_daily(today);
        self.try_settle();
        true
    }

    fn run_daily(&mut self, today: NaiveDate) {
        if let Some(project) = lifecycle::complete_research(&mut self.player, today) {
            self.push_notice(Notice::ResearchCompleted(project));
        }
        lifecycle::expire_campaigns(&mut self.player, today);
        self.check_game_over();
    }

    /// Settle the month if the calendar has rolled over and nothing blocks it.
    pub fn try_settle(&mut self) -> bool {
        if self.state != GameState::Playing || !self.notices.is_empty() || !self.clock.month_rolled() {
            return false;
        }
        self.settle_month();
        true
    }

    fn settle_month(&mut self) {
        let today = self.clock.date();
        let days = dates::days_in_previous_month(today);

        let ctx = AiContext {
            player: &self.player,
            catalog: &self.catalog,
            date: today,
            days_in_month: days,
            fuel_price: self.player.fuel_price,
        };
        let turn = sim_ai::advance_competitors(&self.competitors, &ctx, &mut self.ids, &mut self.rng);
        self.competitors = turn.competitors;
        self.alliances.extend(turn.new_alliances);

        self.events.expire(today);
        if let Some(fired) = self.events.roll(
            &self.catalog.events,
            today,
            self.config.event_chance,
            &mut self.rng,
        ) {
            apply_one_shot(&mut self.player, &fired.event);
            self.push_notice(Notice::Event(fired));
        }

        let modifiers = sim_econ::compile(self.events.active(), &self.player.active_campaigns);
        let on_time = sim_econ::drift_on_time(&self.player, today, &mut self.rng);
        self.player.set_on_time_performance(on_time);

        let market = Market {
            player: &self.player,
            competitors: &self.competitors,
            alliances: &self.alliances,
            catalog: &self.catalog,
            modifiers: &modifiers,
        };
        let settlement = market.settle(dates::last_day_of_previous_month(today), days);
        settlement.apply_to(&mut self.player);

        let satisfaction = sim_econ::next_satisfaction(&self.player, today);
        self.player.set_satisfaction(satisfaction);
        self.clock.mark_processed();
        debug!(satisfaction, on_time, "player stats updated");

        if !self.check_game_over() {
            self.push_notice(Notice::MonthlyReport(settlement.report));
        }
    }

    /// Step days until one more month is settled, dismissing every notice
    /// along the way. Returns the notices seen.
    pub fn run_month(&mut self) -> Vec<Notice> {
        let target = self.player.financial_history.len() + 1;
        let mut seen = Vec::new();
        loop {
            while let Some(notice) = self.dismiss_notice() {
                seen.push(notice);
            }
            if self.state != GameState::Playing || self.player.financial_history.len() >= target {
                break;
            }
            self.advance_day();
        }
        seen
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
        self.clock.hold();
    }

    /// Acknowledge the oldest notice. Once none remain the clock resumes and
    /// a deferred settlement runs.
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        let notice = self.notices.pop_front()?;
        if self.notices.is_empty() {
            self.clock.release();
            self.try_settle();
        }
        Some(notice)
    }

    fn check_game_over(&mut self) -> bool {
        if self.state == GameState::Playing && self.player.cash < Decimal::ZERO {
            self.state = GameState::GameOver;
            self.clock.stop();
            warn!(cash = %self.player.cash, date = %self.clock.date(), "game over");
        }
        self.state == GameState::GameOver
    }

    // --- read surface ---

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn date(&self) -> NaiveDate {
        self.clock.date()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn tick_interval(&self) -> Option<Duration> {
        self.clock.tick_interval(self.config.base_tick_ms)
    }

    pub fn active_events(&self) -> &[ActiveGameEvent] {
        self.events.active()
    }

    pub fn event_history(&self) -> &[ActiveGameEvent] {
        self.events.history()
    }

    pub fn financial_reports(&self) -> &[FinancialReport] {
        &self.player.financial_history
    }

    pub fn pending_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn route_plan(&self) -> &[AirportId] {
        &self.route_plan
    }

    pub fn assignment_target(&self) -> Option<&RouteId> {
        self.assignment_target.as_ref()
    }

    /// Current multipliers from active events and campaigns.
    pub fn modifiers(&self) -> Modifiers {
        sim_econ::compile(self.events.active(), &self.player.active_campaigns)
    }

    /// Airports closed today.
    pub fn closed_airports(&self) -> BTreeSet<AirportId> {
        let today = self.clock.date();
        let live: Vec<ActiveGameEvent> = self
            .events
            .active()
            .iter()
            .filter(|e| e.phase_on(today) == sim_core::EventPhase::Active)
            .cloned()
            .collect();
        sim_econ::closed_airports(&live)
    }

    pub fn route_status(&self, route: &RouteId) -> Option<RouteStatus> {
        let route = self.player.network.route(route)?;
        let closed = self.closed_airports();
        Some(if closed.contains(&route.origin) || closed.contains(&route.destination) {
            RouteStatus::Suspended
        } else if route.aircraft().is_some() {
            RouteStatus::Operating
        } else {
            RouteStatus::Unassigned
        })
    }

    /// 30-day estimate for one of the player's routes under today's conditions.
    pub fn project_route(&self, route: &RouteId) -> Option<RouteOutcome> {
        let mut modifiers = self.modifiers();
        modifiers.closed_airports = self.closed_airports();
        Market {
            player: &self.player,
            competitors: &self.competitors,
            alliances: &self.alliances,
            catalog: &self.catalog,
            modifiers: &modifiers,
        }
        .project(route)
    }

    pub fn rankings(&self) -> Vec<Ranking> {
        rankings::rank(&self.player, &self.competitors)
    }
}
