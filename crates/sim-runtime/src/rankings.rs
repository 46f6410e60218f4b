//! League table of the player against every competitor.

use rust_decimal::Decimal;
use sim_core::{AirlineRef, Competitor, Player};
use std::cmp::Ordering;

/// Satisfaction shown for AI airlines, which do not track it.
pub const AI_DISPLAY_SATISFACTION: f64 = 75.0;
pub const AI_DISPLAY_BRAND_AWARENESS: f64 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    pub airline: AirlineRef,
    pub name: String,
    pub satisfaction: f64,
    pub brand_awareness: f64,
    pub cash: Decimal,
    pub fleet_size: usize,
    pub route_count: usize,
    pub satisfaction_rank: usize,
    pub brand_awareness_rank: usize,
    pub cash_rank: usize,
    pub fleet_size_rank: usize,
    pub route_count_rank: usize,
    /// Sum of the per-metric ranks; lower is better.
    pub overall_score: usize,
    pub overall_rank: usize,
}

/// Rank positions (1-based) after a stable descending sort by `cmp`.
fn ranks_by<F>(rows: &[Ranking], mut cmp: F) -> Vec<usize>
where
    F: FnMut(&Ranking, &Ranking) -> Ordering,
{
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| cmp(&rows[b], &rows[a]));
    let mut ranks = vec![0; rows.len()];
    for (pos, idx) in order.into_iter().enumerate() {
        ranks[idx] = pos + 1;
    }
    ranks
}

fn by_f64(f: fn(&Ranking) -> f64) -> impl FnMut(&Ranking, &Ranking) -> Ordering {
    move |a, b| f(a).partial_cmp(&f(b)).unwrap_or(Ordering::Equal)
}

/// Rank the player and competitors on every metric, best overall first.
///
/// Ties keep input order, player first.
pub fn rank(player: &Player, competitors: &[Competitor]) -> Vec<Ranking> {
    let row = |airline: AirlineRef,
               name: &str,
               satisfaction: f64,
               brand_awareness: f64,
               cash: Decimal,
               fleet: usize,
               routes: usize| Ranking {
        airline,
        name: name.to_string(),
        satisfaction,
        brand_awareness,
        cash,
        fleet_size: fleet,
        route_count: routes,
        satisfaction_rank: 0,
        brand_awareness_rank: 0,
        cash_rank: 0,
        fleet_size_rank: 0,
        route_count_rank: 0,
        overall_score: 0,
        overall_rank: 0,
    };
    let mut rows = vec![row(
        AirlineRef::Player,
        &player.company_name,
        player.satisfaction(),
        player.brand_awareness(),
        player.cash,
        player.network.fleet().len(),
        player.network.routes().len(),
    )];
    rows.extend(competitors.iter().map(|c| {
        row(
            c.member_ref(),
            &c.name,
            AI_DISPLAY_SATISFACTION,
            AI_DISPLAY_BRAND_AWARENESS,
            c.cash,
            c.network.fleet().len(),
            c.network.routes().len(),
        )
    }));

    let satisfaction = ranks_by(&rows, by_f64(|r| r.satisfaction));
    let brand = ranks_by(&rows, by_f64(|r| r.brand_awareness));
    let cash = ranks_by(&rows, |a, b| a.cash.cmp(&b.cash));
    let fleet = ranks_by(&rows, |a, b| a.fleet_size.cmp(&b.fleet_size));
    let routes = ranks_by(&rows, |a, b| a.route_count.cmp(&b.route_count));

    for (i, r) in rows.iter_mut().enumerate() {
        r.satisfaction_rank = satisfaction[i];
        r.brand_awareness_rank = brand[i];
        r.cash_rank = cash[i];
        r.fleet_size_rank = fleet[i];
        r.route_count_rank = routes[i];
        r.overall_score = satisfaction[i] + brand[i] + cash[i] + fleet[i] + routes[i];
    }
    rows.sort_by_key(|r| r.overall_score);
    for (pos, r) in rows.iter_mut().enumerate() {
        r.overall_rank = pos + 1;
    }
    rows
}
