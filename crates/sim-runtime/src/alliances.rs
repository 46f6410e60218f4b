//! Player-driven alliance membership changes.
//!
//! Every function keeps alliance member lists and the airlines' own
//! `alliance` links in agreement, and removes alliances that drop below two
//! members (a freshly formed player alliance starts with one).

use rust_decimal::Decimal;
use sim_core::{AirlineRef, Alliance, AllianceId, Competitor, CompetitorId, Player};
use tracing::info;

/// Cost of founding an alliance.
pub const ALLIANCE_FORMATION_COST: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);
/// Satisfaction lost by walking out of an alliance.
pub const LEAVE_SATISFACTION_PENALTY: f64 = 5.0;

/// Found a player alliance. Funds and existing membership are checked by the caller.
pub fn form(player: &mut Player, alliances: &mut Vec<Alliance>, id: AllianceId, name: &str) {
    player.cash -= ALLIANCE_FORMATION_COST;
    player.alliance = Some(id.clone());
    let alliance = Alliance::new(id, name, [AirlineRef::Player]);
    info!(alliance = %alliance.id, name = %alliance.name, "player founded alliance");
    alliances.push(alliance);
}

/// Add `competitor` to `alliance_id`, pulling it out of any other alliance first.
///
/// Returns false when either side does not exist.
pub fn invite(
    competitors: &mut [Competitor],
    alliances: &mut Vec<Alliance>,
    alliance_id: &AllianceId,
    competitor: &CompetitorId,
) -> bool {
    if !alliances.iter().any(|a| &a.id == alliance_id) {
        return false;
    }
    let Some(idx) = competitors.iter().position(|c| &c.id == competitor) else {
        return false;
    };
    if let Some(previous) = competitors[idx].alliance.clone() {
        if &previous == alliance_id {
            return true;
        }
        let member = competitors[idx].member_ref();
        detach(competitors, alliances, &previous, &member);
    }
    if let Some(alliance) = alliances.iter_mut().find(|a| &a.id == alliance_id) {
        alliance.add_member(competitors[idx].member_ref());
    }
    competitors[idx].alliance = Some(alliance_id.clone());
    info!(alliance = %alliance_id, competitor = %competitor, "competitor joined alliance");
    true
}

/// Take the player out of its alliance with a satisfaction penalty.
///
/// Returns the id of the alliance left, if any.
pub fn leave(
    player: &mut Player,
    competitors: &mut [Competitor],
    alliances: &mut Vec<Alliance>,
) -> Option<AllianceId> {
    let id = player.alliance.take()?;
    player.adjust_satisfaction(-LEAVE_SATISFACTION_PENALTY);
    detach(competitors, alliances, &id, &AirlineRef::Player);
    info!(alliance = %id, "player left alliance");
    Some(id)
}

/// Remove `member` from an alliance, dissolving it when fewer than two remain.
fn detach(
    competitors: &mut [Competitor],
    alliances: &mut Vec<Alliance>,
    alliance_id: &AllianceId,
    member: &AirlineRef,
) {
    if let AirlineRef::Competitor(cid) = member {
        if let Some(c) = competitors.iter_mut().find(|c| &c.id == cid) {
            c.alliance = None;
        }
    }
    let Some(idx) = alliances.iter().position(|a| &a.id == alliance_id) else {
        return;
    };
    alliances[idx].remove_member(member);
    if alliances[idx].is_viable() {
        return;
    }
    let dissolved = alliances.remove(idx);
    for cid in dissolved.competitor_members() {
        if let Some(c) = competitors.iter_mut().find(|c| &c.id == cid) {
            c.alliance = None;
        }
    }
    info!(alliance = %dissolved.id, "alliance dissolved");
}
