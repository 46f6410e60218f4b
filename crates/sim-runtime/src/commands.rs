//! Player commands. Each one validates first and then applies in full, so a
//! rejected command never leaves partial changes behind.

use crate::alliances::{self, ALLIANCE_FORMATION_COST};
use crate::clock::GameSpeed;
use crate::lifecycle::{self, ResearchBlock};
use crate::session::{GameSession, GameState};
use rust_decimal::Decimal;
use sim_core::{
    route_base_demand, AircraftId, AircraftInstance, AllianceId, AirportId, AssignmentError,
    CampaignId, CompetitorId, ModelId, RandomSource, ResearchId, Route, RouteId,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    #[error("the game is over")]
    NotPlaying,
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },
    #[error("aircraft not found: {0}")]
    UnknownAircraft(AircraftId),
    #[error("unknown aircraft model: {0}")]
    UnknownAircraftModel(ModelId),
    #[error("aircraft {0} is in service")]
    AircraftInService(AircraftId),
    #[error("route not found: {0}")]
    UnknownRoute(RouteId),
    #[error("unknown airport: {0}")]
    UnknownAirport(AirportId),
    #[error("a route needs two different airports, got {0} twice")]
    SameEndpoints(AirportId),
    #[error("ticket price must be positive, got {0}")]
    InvalidTicketPrice(Decimal),
    #[error("another research project is in progress")]
    ResearchBusy,
    #[error("research {0} is completed or missing prerequisites")]
    ResearchUnavailable(ResearchId),
    #[error("unknown research project: {0}")]
    UnknownResearch(ResearchId),
    #[error("unknown campaign: {0}")]
    UnknownCampaign(CampaignId),
    #[error("already a member of an alliance")]
    AlreadyAllied,
    #[error("not a member of an alliance")]
    NotAllied,
    #[error("unknown competitor: {0}")]
    UnknownCompetitor(CompetitorId),
    #[error(transparent)]
    Assignment(AssignmentError),
    #[error("pick two airports before creating a route")]
    NoPendingRoute,
    #[error("aircraft {aircraft} cannot reach the end of route {route}")]
    OutOfRange { aircraft: AircraftId, route: RouteId },
}

impl From<AssignmentError> for CommandError {
    fn from(err: AssignmentError) -> Self {
        match err {
            AssignmentError::UnknownRoute(id) => Self::UnknownRoute(id),
            AssignmentError::UnknownAircraft(id) => Self::UnknownAircraft(id),
            AssignmentError::AircraftInService(id) => Self::AircraftInService(id),
            other => Self::Assignment(other),
        }
    }
}

impl<R: RandomSource> GameSession<R> {
    fn ensure_playing(&self) -> Result<(), CommandError> {
        match self.state {
            GameState::Playing => Ok(()),
            GameState::GameOver => Err(CommandError::NotPlaying),
        }
    }

    fn ensure_funds(&self, needed: Decimal) -> Result<(), CommandError> {
        if self.player.cash < needed {
            return Err(CommandError::InsufficientFunds {
                needed,
                available: self.player.cash,
            });
        }
        Ok(())
    }

    // --- fleet ---

    pub fn purchase_aircraft(&mut self, model: &ModelId) -> Result<AircraftId, CommandError> {
        self.ensure_playing()?;
        let price = self
            .catalog
            .model(model)
            .ok_or_else(|| CommandError::UnknownAircraftModel(model.clone()))?
            .price;
        self.ensure_funds(price)?;
        let id = self.ids.aircraft();
        self.player.cash -= price;
        self.player
            .network
            .add_aircraft(AircraftInstance::new(id, model.clone(), self.clock.date()));
        info!(aircraft = %id, model = %model, %price, "aircraft purchased");
        Ok(id)
    }

    /// Sell an idle aircraft at its depreciated value; returns the proceeds.
    pub fn sell_aircraft(&mut self, id: AircraftId) -> Result<Decimal, CommandError> {
        self.ensure_playing()?;
        let aircraft = self
            .player
            .network
            .aircraft(id)
            .ok_or(CommandError::UnknownAircraft(id))?;
        if !aircraft.is_idle() {
            return Err(CommandError::AircraftInService(id));
        }
        let model = self
            .catalog
            .model(&aircraft.model)
            .ok_or_else(|| CommandError::UnknownAircraftModel(aircraft.model.clone()))?;
        let value = sim_econ::resale_value(model, aircraft, self.clock.date());
        self.player.network.remove_idle_aircraft(id)?;
        self.player.cash += value;
        info!(aircraft = %id, %value, "aircraft sold");
        Ok(value)
    }

    // --- routes ---

    /// Pick the next endpoint of a planned route.
    ///
    /// Picking the first endpoint again is ignored; a third pick starts a new plan.
    pub fn select_airport(&mut self, airport: &AirportId) -> Result<(), CommandError> {
        if self.catalog.airport(airport).is_none() {
            return Err(CommandError::UnknownAirport(airport.clone()));
        }
        match self.route_plan.as_slice() {
            [first] if first == airport => {}
            [_] => self.route_plan.push(airport.clone()),
            _ => self.route_plan = vec![airport.clone()],
        }
        Ok(())
    }

    pub fn cancel_route_plan(&mut self) {
        self.route_plan.clear();
    }

    /// Open a route between the two planned airports. The plan is cleared either way.
    pub fn create_planned_route(&mut self) -> Result<RouteId, CommandError> {
        let plan = std::mem::take(&mut self.route_plan);
        match plan.as_slice() {
            [origin, destination] => self.create_route(origin, destination),
            _ => Err(CommandError::NoPendingRoute),
        }
    }

    /// Open an unassigned route at the standard fare.
    pub fn create_route(
        &mut self,
        origin: &AirportId,
        destination: &AirportId,
    ) -> Result<RouteId, CommandError> {
        self.ensure_playing()?;
        if origin == destination {
            return Err(CommandError::SameEndpoints(origin.clone()));
        }
        let from = self
            .catalog
            .airport(origin)
            .ok_or_else(|| CommandError::UnknownAirport(origin.clone()))?;
        let to = self
            .catalog
            .airport(destination)
            .ok_or_else(|| CommandError::UnknownAirport(destination.clone()))?;
        let distance = from.distance_km(to);
        let fare = sim_econ::money_from_f64(sim_econ::settlement::standard_fare(distance));
        let base_demand = route_base_demand(from, to, distance);

        let id = self.ids.route(None, origin, destination);
        self.player.network.add_route(Route::new(
            id.clone(),
            origin.clone(),
            destination.clone(),
            distance,
            fare,
            base_demand,
        ))?;
        info!(route = %id, distance_km = distance.round(), %fare, base_demand, "route opened");
        Ok(id)
    }

    /// Close a route, grounding its aircraft.
    pub fn remove_route(&mut self, id: &RouteId) -> Result<Route, CommandError> {
        self.ensure_playing()?;
        let route = self.player.network.remove_route(id)?;
        if self.assignment_target.as_ref() == Some(id) {
            self.assignment_target = None;
        }
        info!(route = %id, "route closed");
        Ok(route)
    }

    pub fn set_ticket_price(&mut self, route: &RouteId, price: Decimal) -> Result<(), CommandError> {
        self.ensure_playing()?;
        if price <= Decimal::ZERO {
            return Err(CommandError::InvalidTicketPrice(price));
        }
        self.player.network.set_ticket_price(route, price)?;
        Ok(())
    }

    pub fn set_hub(&mut self, airport: &AirportId) -> Result<(), CommandError> {
        self.ensure_playing()?;
        if self.catalog.airport(airport).is_none() {
            return Err(CommandError::UnknownAirport(airport.clone()));
        }
        self.player.hub = Some(airport.clone());
        info!(hub = %airport, "hub set");
        Ok(())
    }

    // --- assignment ---

    pub fn open_assignment(&mut self, route: &RouteId) -> Result<(), CommandError> {
        if self.player.network.route(route).is_none() {
            return Err(CommandError::UnknownRoute(route.clone()));
        }
        self.assignment_target = Some(route.clone());
        Ok(())
    }

    pub fn close_assignment(&mut self) {
        self.assignment_target = None;
    }

    /// Put `aircraft` on `route`, releasing whatever either was attached to.
    ///
    /// The aircraft's model must have at least the route's distance in range.
    pub fn assign_aircraft(&mut self, route: &RouteId, aircraft: AircraftId) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let distance = self
            .player
            .network
            .route(route)
            .ok_or_else(|| CommandError::UnknownRoute(route.clone()))?
            .distance_km;
        let model = &self
            .player
            .network
            .aircraft(aircraft)
            .ok_or(CommandError::UnknownAircraft(aircraft))?
            .model;
        let range = self
            .catalog
            .model(model)
            .ok_or_else(|| CommandError::UnknownAircraftModel(model.clone()))?
            .range_km;
        if range < distance {
            return Err(CommandError::OutOfRange {
                aircraft,
                route: route.clone(),
            });
        }
        self.player.network.assign(route, aircraft)?;
        self.assignment_target = None;
        Ok(())
    }

    pub fn unassign_aircraft(&mut self, route: &RouteId) -> Result<Option<AircraftId>, CommandError> {
        self.ensure_playing()?;
        Ok(self.player.network.unassign(route)?)
    }

    // --- research and marketing ---

    pub fn start_research(&mut self, id: &ResearchId) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let project = self
            .catalog
            .research_project(id)
            .ok_or_else(|| CommandError::UnknownResearch(id.clone()))?;
        match lifecycle::research_block(&self.player, project) {
            Some(ResearchBlock::Busy) => return Err(CommandError::ResearchBusy),
            Some(_) => return Err(CommandError::ResearchUnavailable(id.clone())),
            None => {}
        }
        self.ensure_funds(project.cost)?;
        lifecycle::start_research(&mut self.player, project, self.clock.date());
        Ok(())
    }

    pub fn start_campaign(&mut self, id: &CampaignId) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let campaign = self
            .catalog
            .campaign(id)
            .ok_or_else(|| CommandError::UnknownCampaign(id.clone()))?;
        self.ensure_funds(campaign.cost)?;
        lifecycle::launch_campaign(&mut self.player, campaign, self.clock.date());
        Ok(())
    }

    // --- alliances ---

    pub fn form_alliance(&mut self, name: &str) -> Result<AllianceId, CommandError> {
        self.ensure_playing()?;
        if self.player.alliance.is_some() {
            return Err(CommandError::AlreadyAllied);
        }
        self.ensure_funds(ALLIANCE_FORMATION_COST)?;
        let id = self.ids.alliance("player");
        alliances::form(&mut self.player, &mut self.alliances, id.clone(), name);
        Ok(id)
    }

    /// Bring a competitor into the player's alliance. Invitations are always accepted.
    pub fn invite_to_alliance(&mut self, competitor: &CompetitorId) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let alliance = self.player.alliance.clone().ok_or(CommandError::NotAllied)?;
        if !alliances::invite(&mut self.competitors, &mut self.alliances, &alliance, competitor) {
            return Err(CommandError::UnknownCompetitor(competitor.clone()));
        }
        Ok(())
    }

    pub fn leave_alliance(&mut self) -> Result<AllianceId, CommandError> {
        self.ensure_playing()?;
        alliances::leave(&mut self.player, &mut self.competitors, &mut self.alliances)
            .ok_or(CommandError::NotAllied)
    }

    // --- clock ---

    pub fn set_speed(&mut self, speed: GameSpeed) -> Result<(), CommandError> {
        self.ensure_playing()?;
        self.clock.set_speed(speed);
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), CommandError> {
        self.ensure_playing()?;
        self.clock.toggle_pause();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testkit::quiet_session;
    use proptest::prelude::*;
    use sim_core::AirlineRef;

    fn cash(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    #[test]
    fn purchase_deducts_price() {
        let mut s = quiet_session();
        let price = s.catalog().model(&"A320".into()).unwrap().price;
        let id = s.purchase_aircraft(&"A320".into()).unwrap();
        assert_eq!(s.player().cash, cash(500_000_000) - price);
        let bought = s.player().network.aircraft(id).unwrap();
        assert!(bought.is_idle());
        assert_eq!(bought.purchase_date, s.date());
        // rival fleets were issued ids first
        assert!(s.competitors().iter().all(|c| c.network.fleet().iter().all(|a| a.id != id)));

        assert_eq!(
            s.purchase_aircraft(&"Concorde".into()),
            Err(CommandError::UnknownAircraftModel("Concorde".into()))
        );
    }

    #[test]
    fn purchase_without_funds_changes_nothing() {
        let mut s = quiet_session();
        s.player.cash = cash(1_000);
        let err = s.purchase_aircraft(&"A380".into()).unwrap_err();
        assert!(matches!(err, CommandError::InsufficientFunds { available, .. } if available == cash(1_000)));
        assert!(s.player().network.fleet().is_empty());
        assert_eq!(s.player().cash, cash(1_000));
    }

    #[test]
    fn in_service_aircraft_cannot_be_sold() {
        let mut s = quiet_session();
        let id = s.purchase_aircraft(&"B737".into()).unwrap();
        let route = s.create_route(&"ICN".into(), &"HND".into()).unwrap();
        s.assign_aircraft(&route, id).unwrap();
        let before = s.player().clone();

        assert_eq!(s.sell_aircraft(id), Err(CommandError::AircraftInService(id)));
        assert_eq!(s.player(), &before);
        assert_eq!(s.sell_aircraft(AircraftId(999)), Err(CommandError::UnknownAircraft(AircraftId(999))));
    }

    #[test]
    fn aircraft_cannot_fly_beyond_its_range() {
        let mut s = quiet_session();
        let short_haul = s.purchase_aircraft(&"ATR72".into()).unwrap();
        let route = s.create_route(&"ICN".into(), &"JFK".into()).unwrap();
        let before = s.player().clone();
        s.open_assignment(&route).unwrap();

        assert_eq!(
            s.assign_aircraft(&route, short_haul),
            Err(CommandError::OutOfRange {
                aircraft: short_haul,
                route: route.clone(),
            })
        );
        assert_eq!(s.player(), &before);
        assert!(s.player().network.aircraft(short_haul).unwrap().is_idle());
        assert!(s.player().network.route(&route).unwrap().aircraft().is_none());
        assert_eq!(s.assignment_target(), Some(&route));

        let long_haul = s.purchase_aircraft(&"B777".into()).unwrap();
        s.assign_aircraft(&route, long_haul).unwrap();
        assert_eq!(s.player().network.route(&route).unwrap().aircraft(), Some(long_haul));
    }

    #[test]
    fn idle_aircraft_sells_at_full_price_when_new() {
        let mut s = quiet_session();
        let price = s.catalog().model(&"E190".into()).unwrap().price;
        let id = s.purchase_aircraft(&"E190".into()).unwrap();
        assert_eq!(s.sell_aircraft(id).unwrap(), price);
        assert_eq!(s.player().cash, cash(500_000_000));
        assert!(s.player().network.fleet().is_empty());
    }

    #[test]
    fn route_planning_flow() {
        let mut s = quiet_session();
        s.select_airport(&"ICN".into()).unwrap();
        s.select_airport(&"ICN".into()).unwrap();
        assert_eq!(s.route_plan().len(), 1);
        s.select_airport(&"HND".into()).unwrap();
        assert_eq!(s.route_plan().len(), 2);
        assert_eq!(
            s.select_airport(&"XXX".into()),
            Err(CommandError::UnknownAirport("XXX".into()))
        );

        let id = s.create_planned_route().unwrap();
        assert!(s.route_plan().is_empty());
        let route = s.player().network.route(&id).unwrap();
        assert_eq!(route.origin.as_str(), "ICN");
        assert_eq!(route.destination.as_str(), "HND");
        assert!(route.aircraft().is_none());
        assert_eq!(
            route.ticket_price,
            sim_econ::money_from_f64(route.distance_km * 0.30)
        );
        assert!(route.base_demand >= 20);

        assert_eq!(s.create_planned_route(), Err(CommandError::NoPendingRoute));
        s.select_airport(&"LHR".into()).unwrap();
        s.cancel_route_plan();
        assert!(s.route_plan().is_empty());
    }

    #[test]
    fn route_needs_distinct_known_airports() {
        let mut s = quiet_session();
        assert_eq!(
            s.create_route(&"ICN".into(), &"ICN".into()),
            Err(CommandError::SameEndpoints("ICN".into()))
        );
        assert_eq!(
            s.create_route(&"ICN".into(), &"ZZZ".into()),
            Err(CommandError::UnknownAirport("ZZZ".into()))
        );
        assert!(s.player().network.routes().is_empty());
    }

    #[test]
    fn assignment_target_closes_on_assign() {
        let mut s = quiet_session();
        let a = s.purchase_aircraft(&"B737".into()).unwrap();
        let b = s.purchase_aircraft(&"A320".into()).unwrap();
        let route = s.create_route(&"ICN".into(), &"PEK".into()).unwrap();

        assert_eq!(
            s.open_assignment(&"nope".into()),
            Err(CommandError::UnknownRoute("nope".into()))
        );
        s.open_assignment(&route).unwrap();
        assert_eq!(s.assignment_target(), Some(&route));
        s.assign_aircraft(&route, a).unwrap();
        assert_eq!(s.assignment_target(), None);

        // replacing releases the previous aircraft
        s.assign_aircraft(&route, b).unwrap();
        assert!(s.player().network.aircraft(a).unwrap().is_idle());
        assert_eq!(s.player().network.route(&route).unwrap().aircraft(), Some(b));

        assert_eq!(s.unassign_aircraft(&route), Ok(Some(b)));
        assert!(s.player().network.is_consistent());
    }

    #[test]
    fn removing_a_route_grounds_its_aircraft() {
        let mut s = quiet_session();
        let a = s.purchase_aircraft(&"B737".into()).unwrap();
        let route = s.create_route(&"ICN".into(), &"PEK".into()).unwrap();
        s.assign_aircraft(&route, a).unwrap();
        s.open_assignment(&route).unwrap();

        s.remove_route(&route).unwrap();
        assert!(s.player().network.routes().is_empty());
        assert!(s.player().network.aircraft(a).unwrap().is_idle());
        assert_eq!(s.assignment_target(), None);
        assert_eq!(s.remove_route(&route), Err(CommandError::UnknownRoute(route)));
    }

    #[test]
    fn ticket_price_must_be_positive() {
        let mut s = quiet_session();
        let route = s.create_route(&"ICN".into(), &"HND".into()).unwrap();
        assert_eq!(
            s.set_ticket_price(&route, Decimal::ZERO),
            Err(CommandError::InvalidTicketPrice(Decimal::ZERO))
        );
        s.set_ticket_price(&route, cash(420)).unwrap();
        assert_eq!(s.player().network.route(&route).unwrap().ticket_price, cash(420));
    }

    #[test]
    fn hub_must_exist() {
        let mut s = quiet_session();
        assert!(s.set_hub(&"XXX".into()).is_err());
        s.set_hub(&"ICN".into()).unwrap();
        assert_eq!(s.player().hub, Some("ICN".into()));
    }

    #[test]
    fn research_rules() {
        let mut s = quiet_session();
        let advanced = s
            .catalog()
            .research
            .iter()
            .find(|p| !p.prerequisites.is_empty())
            .unwrap()
            .id
            .clone();
        let basic = s
            .catalog()
            .research
            .iter()
            .find(|p| p.prerequisites.is_empty())
            .unwrap()
            .clone();

        assert_eq!(
            s.start_research(&"warp_drive".into()),
            Err(CommandError::UnknownResearch("warp_drive".into()))
        );
        assert_eq!(
            s.start_research(&advanced),
            Err(CommandError::ResearchUnavailable(advanced.clone()))
        );
        s.start_research(&basic.id).unwrap();
        assert_eq!(s.player().cash, cash(500_000_000) - basic.cost);
        assert_eq!(s.start_research(&basic.id), Err(CommandError::ResearchBusy));
    }

    #[test]
    fn campaign_charges_up_front() {
        let mut s = quiet_session();
        let campaign = s.catalog().campaigns[0].clone();
        s.start_campaign(&campaign.id).unwrap();
        assert_eq!(s.player().cash, cash(500_000_000) - campaign.cost);
        assert_eq!(s.player().active_campaigns.len(), 1);

        s.player.cash = Decimal::ZERO;
        assert!(matches!(
            s.start_campaign(&campaign.id),
            Err(CommandError::InsufficientFunds { .. })
        ));
        assert_eq!(
            s.start_campaign(&"nope".into()),
            Err(CommandError::UnknownCampaign("nope".into()))
        );
    }

    #[test]
    fn alliance_commands() {
        let mut s = quiet_session();
        assert_eq!(s.invite_to_alliance(&"ai-1".into()), Err(CommandError::NotAllied));
        assert_eq!(s.leave_alliance(), Err(CommandError::NotAllied));

        let id = s.form_alliance("Sky Team Up").unwrap();
        assert!(id.as_str().starts_with("alliance-player-"));
        assert_eq!(s.player().cash, cash(400_000_000));
        assert_eq!(s.form_alliance("Again"), Err(CommandError::AlreadyAllied));

        assert_eq!(
            s.invite_to_alliance(&"ai-9".into()),
            Err(CommandError::UnknownCompetitor("ai-9".into()))
        );
        s.invite_to_alliance(&"ai-2".into()).unwrap();
        assert!(s.alliances()[0].contains(&AirlineRef::Competitor("ai-2".into())));

        let before = s.player().satisfaction();
        assert_eq!(s.leave_alliance(), Ok(id));
        assert!(s.alliances().is_empty());
        assert!(s.competitors().iter().all(|c| c.alliance.is_none()));
        assert_eq!(s.player().satisfaction(), before - alliances::LEAVE_SATISFACTION_PENALTY);
    }

    #[test]
    fn alliance_needs_funds() {
        let mut s = quiet_session();
        s.player.cash = cash(99_999_999);
        assert!(matches!(
            s.form_alliance("Broke"),
            Err(CommandError::InsufficientFunds { .. })
        ));
        assert!(s.player().alliance.is_none());
        assert!(s.alliances().is_empty());
    }

    #[test]
    fn speed_toggle_remembers_last_speed() {
        let mut s = quiet_session();
        s.set_speed(GameSpeed::Fastest).unwrap();
        s.toggle_pause().unwrap();
        assert_eq!(s.clock().speed(), GameSpeed::Paused);
        s.toggle_pause().unwrap();
        assert_eq!(s.clock().speed(), GameSpeed::Fastest);
    }

    #[test]
    fn commands_are_refused_after_game_over() {
        let mut s = quiet_session();
        s.state = GameState::GameOver;
        assert_eq!(s.purchase_aircraft(&"B737".into()), Err(CommandError::NotPlaying));
        assert_eq!(s.set_speed(GameSpeed::Normal), Err(CommandError::NotPlaying));
        assert_eq!(s.form_alliance("Late"), Err(CommandError::NotPlaying));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Buy(usize),
        Sell(u64),
        Open(usize, usize),
        Assign(usize, u64),
        Unassign(usize),
        Close(usize),
    }

    const MODELS: [&str; 4] = ["ATR72", "E190", "B737", "A320"];
    const AIRPORTS: [&str; 6] = ["ICN", "HND", "PEK", "LHR", "CDG", "JFK"];

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..MODELS.len()).prop_map(Op::Buy),
            (1..24u64).prop_map(Op::Sell),
            (0..AIRPORTS.len(), 0..AIRPORTS.len()).prop_map(|(a, b)| Op::Open(a, b)),
            (0..6usize, 1..24u64).prop_map(|(r, a)| Op::Assign(r, a)),
            (0..6usize).prop_map(Op::Unassign),
            (0..6usize).prop_map(Op::Close),
        ]
    }

    fn nth_route<R: RandomSource>(s: &GameSession<R>, n: usize) -> RouteId {
        s.player()
            .network
            .routes()
            .get(n)
            .map(|r| r.id.clone())
            .unwrap_or_else(|| "missing".into())
    }

    proptest! {
        #[test]
        fn rejected_commands_leave_player_untouched(ops in proptest::collection::vec(op(), 1..40)) {
            let mut s = quiet_session();
            for op in ops {
                let before = s.player().clone();
                let result = match op {
                    Op::Buy(m) => s.purchase_aircraft(&MODELS[m].into()).map(drop),
                    Op::Sell(a) => s.sell_aircraft(AircraftId(a)).map(drop),
                    Op::Open(a, b) => s.create_route(&AIRPORTS[a].into(), &AIRPORTS[b].into()).map(drop),
                    Op::Assign(r, a) => {
                        let route = nth_route(&s, r);
                        s.assign_aircraft(&route, AircraftId(a))
                    }
                    Op::Unassign(r) => {
                        let route = nth_route(&s, r);
                        s.unassign_aircraft(&route).map(drop)
                    }
                    Op::Close(r) => {
                        let route = nth_route(&s, r);
                        s.remove_route(&route).map(drop)
                    }
                };
                if result.is_err() {
                    prop_assert_eq!(s.player(), &before);
                }
                prop_assert!(s.player().network.is_consistent());
                prop_assert!(s.player().cash >= Decimal::ZERO);
            }
        }
    }
}
