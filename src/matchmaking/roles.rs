use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet}
};

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::model::structures::{
    player::Player,
    role::{Role, ROLE_COUNT},
    team_match::TeamSlot
};

/// Descending rating, then ascending id.
pub fn by_rating_desc(a: &Player, b: &Player) -> Ordering {
    b.rating.total_cmp(&a.rating).then(a.id.cmp(&b.id))
}

/// Gives every player in a team one role.
///
/// Higher-rated players claim first. Primaries are honoured where the role is
/// still open, then secondaries, and anyone left takes the open role the fewest
/// remaining players want. A role is open while it has been handed out no more
/// often than any other, so teams above five players reuse roles evenly.
pub fn assign_roles(team: &[&Player]) -> Vec<TeamSlot> {
    let ordered = team.iter().copied().sorted_by(|a, b| by_rating_desc(a, b)).collect_vec();
    let mut counts: BTreeMap<Role, usize> = Role::iter().map(|r| (r, 0)).collect();
    let mut assigned: Vec<Option<Role>> = vec![None; ordered.len()];

    let is_open = |counts: &BTreeMap<Role, usize>, role: Role| {
        let min = counts.values().copied().min().unwrap_or(0);
        counts.get(&role).copied().unwrap_or(0) == min
    };

    let preferences: [fn(&Player) -> Role; 2] = [|p| p.primary_role, |p| p.secondary_role];
    for preference in preferences {
        for (i, player) in ordered.iter().enumerate() {
            let role = preference(player);
            if assigned[i].is_none() && is_open(&counts, role) {
                assigned[i] = Some(role);
                *counts.entry(role).or_default() += 1;
            }
        }
    }

    for i in 0..ordered.len() {
        if assigned[i].is_some() {
            continue;
        }

        let remaining = ordered
            .iter()
            .zip(assigned.iter())
            .filter(|(_, role)| role.is_none())
            .map(|(p, _)| *p)
            .collect_vec();

        let role = Role::iter()
            .filter(|r| is_open(&counts, *r))
            .min_by_key(|r| remaining.iter().filter(|p| p.prefers(*r)).count());

        if let Some(role) = role {
            assigned[i] = Some(role);
            *counts.entry(role).or_default() += 1;
        }
    }

    ordered
        .iter()
        .zip(assigned)
        .filter_map(|(player, role)| {
            role.map(|role| TeamSlot {
                player_id: player.id,
                role,
                rating: player.rating
            })
        })
        .sorted_by_key(|slot| (slot.role, slot.player_id))
        .collect()
}

/// Distinct roles held by a player who declared them, over the number of
/// distinct roles the team can fill.
pub fn role_coverage(slots: &[TeamSlot], team: &[&Player]) -> f64 {
    let fillable = slots.len().min(ROLE_COUNT);
    if fillable == 0 {
        return 0.0;
    }

    let honoured: BTreeSet<Role> = slots
        .iter()
        .filter(|slot| {
            team.iter()
                .find(|p| p.id == slot.player_id)
                .is_some_and(|p| p.prefers(slot.role))
        })
        .map(|slot| slot.role)
        .collect();

    honoured.len() as f64 / fillable as f64
}
