//! Alliances formed between unaligned AI airlines.

use sim_core::{Alliance, Competitor, IdAllocator, RandomSource};
use tracing::info;

pub const ALLIANCE_FORMATION_CHANCE: f64 = 0.05;

/// `"<first word> & <first word> Union"`.
pub fn alliance_name(a: &str, b: &str) -> String {
    let first = |name: &str| name.split_whitespace().next().unwrap_or(name).to_string();
    format!("{} & {} Union", first(a), first(b))
}

/// Possibly pair two unaligned competitors into a new alliance.
///
/// Both members are linked to the returned alliance.
pub fn maybe_form<R: RandomSource + ?Sized>(
    competitors: &mut [Competitor],
    ids: &mut IdAllocator,
    rng: &mut R,
) -> Option<Alliance> {
    let unaligned: Vec<usize> = competitors
        .iter()
        .enumerate()
        .filter(|(_, c)| c.alliance.is_none())
        .map(|(i, _)| i)
        .collect();
    if unaligned.len() < 2 || !rng.chance(ALLIANCE_FORMATION_CHANCE) {
        return None;
    }
    let first = rng.pick_index(unaligned.len())?;
    let mut second = rng.pick_index(unaligned.len() - 1)?;
    if second >= first {
        second += 1;
    }
    let (a, b) = (unaligned[first], unaligned[second]);

    let alliance = Alliance::new(
        ids.alliance("ai"),
        alliance_name(&competitors[a].name, &competitors[b].name),
        [competitors[a].member_ref(), competitors[b].member_ref()],
    );
    competitors[a].alliance = Some(alliance.id.clone());
    competitors[b].alliance = Some(alliance.id.clone());
    info!(alliance = %alliance.id, name = %alliance.name, "AI alliance formed");
    Some(alliance)
}
