//! Route expansion for AI airlines.
//!
//! A competitor with an idle aircraft first considers copying one of the
//! player's operating routes, then falls back to opening a random route from
//! a large airport. Either way the idle aircraft is put on the new route.

use crate::AiContext;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sim_core::rng::choose;
use sim_core::{
    route_base_demand, AircraftModel, Airport, Competitor, IdAllocator, RandomSource, Route,
};
use sim_econ::settlement::standard_fare;
use tracing::{debug, info, warn};

pub const TARGET_PLAYER_CHANCE: f64 = 0.3;
pub const ORGANIC_EXPANSION_CHANCE: f64 = 0.5;
/// Organic routes start from airports larger than this size class.
pub const MIN_ORIGIN_SIZE: u8 = 2;

/// Endpoints and distance of a route a competitor wants to open.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePlan<'a> {
    pub origin: &'a Airport,
    pub destination: &'a Airport,
    pub distance_km: f64,
}

/// Pick one of the player's operating routes this competitor can fly and
/// does not serve yet.
pub fn plan_competitive<'a, R: RandomSource + ?Sized>(
    comp: &Competitor,
    model: &AircraftModel,
    ctx: &AiContext<'a>,
    rng: &mut R,
) -> Option<RoutePlan<'a>> {
    let targets: Vec<_> = ctx
        .player
        .network
        .routes()
        .iter()
        .filter(|r| r.aircraft().is_some())
        .filter(|r| r.distance_km < model.range_km)
        .filter(|r| !comp.network.serves_pair(&r.origin, &r.destination))
        .collect();
    let target = choose(rng, &targets)?;
    let origin = ctx.catalog.airport(&target.origin)?;
    let destination = ctx.catalog.airport(&target.destination)?;
    Some(RoutePlan {
        origin,
        destination,
        distance_km: target.distance_km,
    })
}

/// Pick a random large origin and a reachable destination not yet served.
pub fn plan_organic<'a, R: RandomSource + ?Sized>(
    comp: &Competitor,
    model: &AircraftModel,
    ctx: &AiContext<'a>,
    rng: &mut R,
) -> Option<RoutePlan<'a>> {
    let airports = &ctx.catalog.airports;
    let origins: Vec<&Airport> = airports.iter().filter(|a| a.size > MIN_ORIGIN_SIZE).collect();
    let origin = *choose(rng, &origins)?;
    let destinations: Vec<&Airport> = airports
        .iter()
        .filter(|a| a.id != origin.id)
        .filter(|a| origin.distance_km(a) < model.range_km)
        .filter(|a| !comp.network.serves_pair(&origin.id, &a.id))
        .collect();
    let destination = *choose(rng, &destinations)?;
    Some(RoutePlan {
        origin,
        destination,
        distance_km: origin.distance_km(destination),
    })
}

/// Open a route with the competitor's first idle aircraft, if it decides to.
pub fn maybe_expand<R: RandomSource + ?Sized>(
    comp: &mut Competitor,
    ctx: &AiContext<'_>,
    ids: &mut IdAllocator,
    rng: &mut R,
) {
    let Some(idle) = comp.network.first_idle() else {
        return;
    };
    let aircraft = idle.id;
    let Some(model) = ctx.catalog.model(&idle.model) else {
        warn!(competitor = %comp.id, model = %idle.model, "unknown aircraft model; no expansion");
        return;
    };

    let allied_with_player = comp.is_allied_with(ctx.player.alliance.as_ref());
    let mut plan = None;
    if !ctx.player.network.routes().is_empty()
        && rng.chance(TARGET_PLAYER_CHANCE)
        && !allied_with_player
    {
        plan = plan_competitive(comp, model, ctx, rng);
        if plan.is_some() {
            debug!(competitor = %comp.id, "targeting a player route");
        }
    }
    if plan.is_none() && rng.chance(ORGANIC_EXPANSION_CHANCE) {
        plan = plan_organic(comp, model, ctx, rng);
    }
    let Some(plan) = plan else {
        return;
    };

    let base_demand = route_base_demand(plan.origin, plan.destination, plan.distance_km);
    let fare = Decimal::from_f64(standard_fare(plan.distance_km))
        .unwrap_or(Decimal::ZERO)
        .round_dp(2);
    let id = ids.route(Some(comp.id.as_str()), &plan.origin.id, &plan.destination.id);
    let route = Route::new(
        id.clone(),
        plan.origin.id.clone(),
        plan.destination.id.clone(),
        plan.distance_km,
        fare,
        base_demand,
    );
    if let Err(e) = comp
        .network
        .add_route(route)
        .and_then(|()| comp.network.assign(&id, aircraft))
    {
        warn!(competitor = %comp.id, route = %id, error = %e, "could not open route");
        return;
    }
    info!(competitor = %comp.id, route = %id, base_demand, "competitor opened route");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::*;
    use sim_core::{Player, ScriptedRandom};

    #[test]
    fn copies_a_player_route() {
        let cat = catalog();
        let mut player = Player::new("SkyCo", Decimal::ZERO);
        player_route(&mut player, "ICN", "HND", 1_160.0);
        let mut comp = competitor("ai-1", 0, &["SMALL"]);
        let mut ids = IdAllocator::new();
        // targeting hits, pick the only target
        let mut rng = ScriptedRandom::new([0.1, 0.0]);
        maybe_expand(&mut comp, &ctx(&player, &cat), &mut ids, &mut rng);

        let routes = comp.network.routes();
        assert_eq!(routes.len(), 1);
        assert!(routes[0].connects(&"HND".into(), &"ICN".into()));
        assert_eq!(routes[0].distance_km, 1_160.0);
        assert_eq!(routes[0].ticket_price, Decimal::new(348, 0));
        assert!(routes[0].id.as_str().starts_with("ai-1-ICN-HND-"));
        assert!(!comp.network.fleet()[0].is_idle());
        assert!(comp.network.is_consistent());
    }

    #[test]
    fn allied_competitor_does_not_target_the_player() {
        let cat = catalog();
        let mut player = Player::new("SkyCo", Decimal::ZERO);
        player.alliance = Some("alliance-player-1".into());
        player_route(&mut player, "ICN", "HND", 1_160.0);
        let mut comp = competitor("ai-1", 0, &["SMALL"]);
        comp.alliance = player.alliance.clone();
        let mut ids = IdAllocator::new();
        // targeting draw hits but is vetoed; organic draw misses
        let mut rng = ScriptedRandom::new([0.1, 0.9]);
        maybe_expand(&mut comp, &ctx(&player, &cat), &mut ids, &mut rng);
        assert!(comp.network.routes().is_empty());
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn organic_route_from_large_airport_within_range() {
        let cat = catalog();
        let player = Player::new("SkyCo", Decimal::ZERO);
        let mut comp = competitor("ai-1", 0, &["SMALL"]);
        let mut ids = IdAllocator::new();
        // no player routes: organic hits, origin ICN, first destination
        let mut rng = ScriptedRandom::new([0.1, 0.0, 0.0]);
        maybe_expand(&mut comp, &ctx(&player, &cat), &mut ids, &mut rng);
        let route = &comp.network.routes()[0];
        assert_eq!(route.origin.as_str(), "ICN");
        assert_ne!(route.destination.as_str(), "ICN");
        assert!(route.distance_km < 2_000.0);
        assert!(route.base_demand >= 20);
        assert!(comp.network.is_consistent());
    }

    #[test]
    fn out_of_range_targets_fall_back_to_organic() {
        let cat = catalog();
        let mut player = Player::new("SkyCo", Decimal::ZERO);
        player_route(&mut player, "ICN", "HND", 9_000.0);
        let mut comp = competitor("ai-1", 0, &["SMALL"]);
        let mut ids = IdAllocator::new();
        // targeting draw hits but nothing is in range; organic draw misses
        let mut rng = ScriptedRandom::new([0.1, 0.9]);
        maybe_expand(&mut comp, &ctx(&player, &cat), &mut ids, &mut rng);
        assert!(comp.network.routes().is_empty());
    }

    #[test]
    fn no_idle_aircraft_means_no_draws() {
        let cat = catalog();
        let player = Player::new("SkyCo", Decimal::ZERO);
        let mut comp = competitor("ai-1", 0, &[]);
        let mut ids = IdAllocator::new();
        let mut rng = ScriptedRandom::new([0.0]);
        maybe_expand(&mut comp, &ctx(&player, &cat), &mut ids, &mut rng);
        assert_eq!(rng.remaining(), 1);
    }
}
