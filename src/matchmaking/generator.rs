use std::{cmp::Ordering, collections::HashSet, iter, ops::Range, sync::Arc};

use itertools::Itertools;
use rayon::prelude::*;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::{
    error::{MmrError, Result},
    matchmaking::quality::{evaluate, Candidate},
    model::{
        config::ProcessorConfig,
        structures::{
            player::Player,
            role::{Role, ROLE_COUNT},
            team_match::Match
        }
    }
};

/// Bounded search for the most balanced match in a pool snapshot.
pub struct MatchGenerator {
    config: Arc<ProcessorConfig>
}

impl MatchGenerator {
    pub fn new(config: Arc<ProcessorConfig>) -> MatchGenerator {
        MatchGenerator { config }
    }

    /// Best match of `team_size` against `team_size`, or `None` when the pool
    /// is too small or nothing reaches the quality threshold.
    pub fn find_match(&self, snapshot: &[Player], team_size: usize) -> Option<Match> {
        match self.try_find_match(snapshot, team_size) {
            Ok(m) => Some(m),
            Err(e) => {
                debug!("No match formed: {}", e);
                None
            }
        }
    }

    pub fn try_find_match(&self, snapshot: &[Player], team_size: usize) -> Result<Match> {
        if team_size == 0 {
            return Err(MmrError::Configuration("team_size must be at least 1".to_string()));
        }

        let required = team_size * 2;
        if snapshot.len() < required {
            return Err(MmrError::InsufficientPool {
                available: snapshot.len(),
                required
            });
        }

        let sorted = snapshot
            .iter()
            .sorted_by(|a, b| a.rating.total_cmp(&b.rating).then(a.id.cmp(&b.id)))
            .collect_vec();
        let brackets = skill_brackets(&sorted, required, self.config.max_skill_difference);
        let sets = candidate_sets(&sorted, &brackets, team_size, self.config.search_budget);

        debug!(
            pool = sorted.len(),
            brackets = brackets.len(),
            candidate_sets = sets.len(),
            "Searching for a match"
        );

        let best = sets
            .par_iter()
            .filter_map(|set| {
                let members = set.iter().map(|&i| sorted[i]).collect_vec();
                best_split(&members, team_size, &self.config)
            })
            .reduce_with(|a, b| if rank(&a, &b) == Ordering::Greater { b } else { a })
            .ok_or(MmrError::NoQualifyingMatch { best_quality: 0.0 })?;

        if best.quality.overall < self.config.min_quality_threshold {
            return Err(MmrError::NoQualifyingMatch {
                best_quality: best.quality.overall
            });
        }

        let formed = Match::new(best.team_a, best.team_b, best.quality);
        info!(
            match_id = %formed.id,
            quality = formed.quality.overall,
            "Match formed: {:?} vs {:?}",
            formed.team_a.iter().map(|s| s.player_id).collect_vec(),
            formed.team_b.iter().map(|s| s.player_id).collect_vec()
        );

        Ok(formed)
    }
}

/// Orders candidates best first: higher quality, then lower id sum, then the
/// lexicographically smaller sorted team A, then team B.
pub fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    let sorted_b_ids = |c: &Candidate| c.team_b.iter().map(|s| s.player_id).sorted().collect_vec();

    b.quality
        .overall
        .total_cmp(&a.quality.overall)
        .then_with(|| a.id_sum().cmp(&b.id_sum()))
        .then_with(|| a.sorted_team_a_ids().cmp(&b.sorted_team_a_ids()))
        .then_with(|| sorted_b_ids(a).cmp(&sorted_b_ids(b)))
}

/// Windows of `sorted` (ascending by rating) no wider than
/// `max_skill_difference` that hold at least `required` players. A window is
/// skipped when the previous bracket already contains it. When no window is
/// large enough the whole pool forms one bracket, and the quality threshold
/// decides.
pub fn skill_brackets(sorted: &[&Player], required: usize, max_skill_difference: f64) -> Vec<Range<usize>> {
    let mut brackets = Vec::new();
    let mut end = 0;
    let mut last_end = 0;

    for start in 0..sorted.len() {
        end = end.max(start);
        while end < sorted.len() && sorted[end].rating - sorted[start].rating <= max_skill_difference {
            end += 1;
        }

        if end - start >= required && end > last_end {
            brackets.push(start..end);
            last_end = end;
        }
    }

    if brackets.is_empty() && sorted.len() >= required {
        brackets.push(0..sorted.len());
    }

    brackets
}

/// Whether `set` could give both teams a distinct declared role for each of
/// their first `min(team_size, 5)` slots.
fn role_coverable(sorted: &[&Player], set: &[usize], team_size: usize) -> bool {
    let wanted_twice = Role::iter()
        .filter(|role| set.iter().filter(|&&i| sorted[i].prefers(*role)).count() >= 2)
        .count();

    wanted_twice >= team_size.min(ROLE_COUNT)
}

/// Distinct player sets of `2 * team_size`, drawn from the brackets in turn so
/// that every bracket is searched. Inside a bracket, contiguous runs whose
/// members can cover the roles come first, then the other runs, then
/// combinations in lexicographic order. At most `budget` sets are returned,
/// except that every bracket always contributes at least one.
pub fn candidate_sets(
    sorted: &[&Player],
    brackets: &[Range<usize>],
    team_size: usize,
    budget: usize
) -> Vec<Vec<usize>> {
    let required = team_size * 2;
    let mut sources = brackets
        .iter()
        .filter(|b| b.len() >= required)
        .map(|b| {
            let (coverable, rest): (Vec<_>, Vec<_>) = (b.start..=b.end - required)
                .map(|s| (s..s + required).collect_vec())
                .partition(|set| role_coverable(sorted, set, team_size));

            coverable
                .into_iter()
                .chain(rest)
                .chain(b.clone().combinations(required))
        })
        .collect_vec();

    let limit = budget.max(sources.len());
    let mut seen = HashSet::new();
    let mut sets = Vec::new();
    loop {
        let before = sets.len();
        for source in sources.iter_mut() {
            if sets.len() >= limit {
                return sets;
            }
            if let Some(set) = source.find(|set| seen.insert(set.clone())) {
                sets.push(set);
            }
        }

        if sets.len() == before {
            return sets;
        }
    }
}

/// Team A's member indices for a snake draft over `n` players sorted by
/// ascending rating. The draft runs from the top down (A B B A A B ...), and
/// the side holding index 0 is reported as team A.
pub fn snake_draft(n: usize) -> Vec<usize> {
    let drafted: Vec<usize> = (0..n)
        .rev()
        .enumerate()
        .filter(|(pick, _)| matches!(pick % 4, 0 | 3))
        .map(|(_, index)| index)
        .sorted()
        .collect();

    if drafted.contains(&0) {
        drafted
    } else {
        (0..n).filter(|i| !drafted.contains(i)).collect()
    }
}

/// Best split of one candidate set. The snake draft is tried first, then
/// splits with the lowest-rated player pinned to team A, up to the split budget.
fn best_split(members: &[&Player], team_size: usize, config: &ProcessorConfig) -> Option<Candidate> {
    let pinned = (1..members.len()).combinations(team_size - 1).map(|rest| {
        let mut split = vec![0];
        split.extend(rest);
        split
    });

    let mut seen = HashSet::new();
    let splits = iter::once(snake_draft(members.len()))
        .chain(pinned)
        .filter(|split| seen.insert(split.clone()))
        .take(config.split_budget)
        .collect_vec();

    splits
        .iter()
        .map(|split| {
            let (team_a, team_b): (Vec<&Player>, Vec<&Player>) = members
                .iter()
                .enumerate()
                .partition_map(|(i, p)| {
                    if split.contains(&i) {
                        itertools::Either::Left(*p)
                    } else {
                        itertools::Either::Right(*p)
                    }
                });

            evaluate(&team_a, &team_b, config)
        })
        .min_by(rank)
}
