use super::option::{Assignment, MatchOption, PlayerProfiles, Team};
use super::{BEST_EFFORT_THRESHOLD, DEFAULT_OPTION_COUNT, RATING_THRESHOLDS};
use crate::error::{DraftCoreError, Result};
use crate::profile::Role;
use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

const ALGORITHM_TAG: &str = "comfort_first_progressive_v1";

/// The result of one matchmaking generation: the ranked options surfaced to
/// the lobby coordinator, and the rating threshold that batch cleared
/// (-1 means "best effort", no threshold had a survivor).
#[derive(Debug, Clone)]
pub struct MatchmakingBatch {
    pub options: Vec<MatchOption>,
    pub threshold_used: i64,
}

/// Stateless comfort-first, progressive-rating-tolerance matchmaking engine.
pub struct MatchmakingEngine;

struct TeamCandidate {
    assignments: Vec<Assignment>,
    rating_sum: i64,
    comfort_penalty: f64,
    comfort_sum: u32,
}

impl MatchmakingEngine {
    /// Given exactly ten player profiles, produce an ordered list of
    /// up to `max_options` distinct match options.
    pub fn generate(
        players: &[PlayerProfiles],
        seed: u64,
        max_options: usize,
    ) -> Result<MatchmakingBatch> {
        let base_options = Self::base_options(players)?;
        let ranked = Self::rank(base_options, seed);
        let (mut chosen, threshold_used) = Self::pick_by_threshold(&ranked, max_options);
        Self::number(&mut chosen, 0, threshold_used);
        Ok(MatchmakingBatch {
            options: chosen,
            threshold_used,
        })
    }

    /// "More options": reads the maximum threshold already
    /// returned, bumps it by 100, regenerates, and returns only
    /// compositions not already present in `existing`.
    pub fn generate_more(
        players: &[PlayerProfiles],
        existing: &[MatchOption],
        seed: u64,
        max_options: usize,
    ) -> Result<MatchmakingBatch> {
        let base_options = Self::base_options(players)?;
        let ranked = Self::rank(base_options, seed);

        let current_max = existing
            .iter()
            .map(|o| o.used_rating_threshold)
            .filter(|&t| t >= 0)
            .max()
            .unwrap_or(0);
        let next_threshold = current_max + 100;

        let seen: HashSet<Vec<(Uuid, Team, Role)>> =
            existing.iter().map(|o| o.composition_key()).collect();

        let mut survivors: Vec<MatchOption> = ranked
            .into_iter()
            .filter(|o| o.rating_diff <= next_threshold as f64)
            .filter(|o| !seen.contains(&o.composition_key()))
            .collect();
        survivors = Self::dedupe(survivors);
        survivors.truncate(max_options);

        let start_number = existing.iter().map(|o| o.option_number).max().unwrap_or(0);
        Self::number(&mut survivors, start_number, next_threshold);

        Ok(MatchmakingBatch {
            options: survivors,
            threshold_used: next_threshold,
        })
    }

    /// Step 1-2: enumerate all C(10,5) team splits and, per split, the best
    /// of the 5!x5! role assignments (the split's "base option").
    fn base_options(players: &[PlayerProfiles]) -> Result<Vec<MatchOption>> {
        if players.len() != 10 {
            return Err(DraftCoreError::NotEnoughPlayers(players.len()));
        }

        let by_id: HashMap<Uuid, &PlayerProfiles> =
            players.iter().map(|p| (p.user_id, p)).collect();
        let ids: Vec<Uuid> = players.iter().map(|p| p.user_id).collect();

        let mut base_options = Vec::with_capacity(252);

        for blue_idx in (0..10usize).combinations(5) {
            let blue_ids: Vec<Uuid> = blue_idx.iter().map(|&i| ids[i]).collect();
            let red_ids: Vec<Uuid> = (0..10usize)
                .filter(|i| !blue_idx.contains(i))
                .map(|i| ids[i])
                .collect();

            let blue_perms = Self::team_permutations(Team::Blue, &blue_ids, &by_id);
            let red_perms = Self::team_permutations(Team::Red, &red_ids, &by_id);

            let mut best: Option<MatchOption> = None;
            for blue in &blue_perms {
                for red in &red_perms {
                    let total_penalty = blue.comfort_penalty + red.comfort_penalty;
                    let rating_diff = (blue.rating_sum - red.rating_sum).unsigned_abs() as f64;
                    let score = 100.0 - total_penalty - rating_diff / 10000.0;

                    let is_better = match &best {
                        None => true,
                        Some(cur) => score > cur.balance_score,
                    };
                    if is_better {
                        best = Some(Self::build_option(blue, red, rating_diff, score));
                    }
                }
            }
            // Safe: both blue_perms and red_perms are non-empty (5 players each).
            base_options.push(best.expect("non-empty team permutations"));
        }

        Ok(base_options)
    }

    fn team_permutations(
        team: Team,
        player_ids: &[Uuid],
        by_id: &HashMap<Uuid, &PlayerProfiles>,
    ) -> Vec<TeamCandidate> {
        player_ids
            .iter()
            .copied()
            .permutations(5)
            .map(|perm| {
                let mut assignments = Vec::with_capacity(5);
                let mut rating_sum = 0i64;
                let mut comfort_penalty = 0.0;
                let mut comfort_sum = 0u32;
                for (role, user_id) in Role::ALL.into_iter().zip(perm) {
                    let profile = by_id[&user_id];
                    let role_rating = profile.rating(role);
                    let comfort = profile.comfort(role);
                    rating_sum += role_rating;
                    comfort_penalty += crate::profile::comfort_penalty(comfort);
                    comfort_sum += comfort as u32;
                    assignments.push(Assignment {
                        user_id,
                        team,
                        role,
                        role_rating,
                        comfort,
                    });
                }
                TeamCandidate {
                    assignments,
                    rating_sum,
                    comfort_penalty,
                    comfort_sum,
                }
            })
            .collect()
    }

    fn build_option(
        blue: &TeamCandidate,
        red: &TeamCandidate,
        rating_diff: f64,
        balance_score: f64,
    ) -> MatchOption {
        let mut assignments = blue.assignments.clone();
        assignments.extend(red.assignments.clone());

        let lane_diffs = Role::ALL
            .into_iter()
            .map(|role| {
                let blue_rating = blue
                    .assignments
                    .iter()
                    .find(|a| a.role == role)
                    .expect("every role assigned on blue")
                    .role_rating;
                let red_rating = red
                    .assignments
                    .iter()
                    .find(|a| a.role == role)
                    .expect("every role assigned on red")
                    .role_rating;
                (role, (blue_rating - red_rating).unsigned_abs() as f64)
            })
            .collect();

        MatchOption {
            option_number: 0,
            algorithm_tag: ALGORITHM_TAG.to_string(),
            assignments,
            blue_avg_rating: blue.rating_sum as f64 / 5.0,
            red_avg_rating: red.rating_sum as f64 / 5.0,
            rating_diff,
            lane_diffs,
            balance_score,
            blue_avg_comfort: blue.comfort_sum as f64 / 5.0,
            red_avg_comfort: red.comfort_sum as f64 / 5.0,
            used_rating_threshold: 0,
        }
    }

    /// Step 3: shuffle first (seeded) so ties break randomly across
    /// invocations, then sort by balance score descending (stable, so the
    /// seeded shuffle decides tie order).
    fn rank(mut options: Vec<MatchOption>, seed: u64) -> Vec<MatchOption> {
        let mut rng = StdRng::seed_from_u64(seed);
        options.shuffle(&mut rng);
        options.sort_by(|a, b| {
            b.balance_score
                .partial_cmp(&a.balance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        options
    }

    fn dedupe(options: Vec<MatchOption>) -> Vec<MatchOption> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(options.len());
        for option in options {
            if seen.insert(option.composition_key()) {
                out.push(option);
            }
        }
        out
    }

    /// Step 4: progressive rating threshold search.
    fn pick_by_threshold(ranked: &[MatchOption], max_options: usize) -> (Vec<MatchOption>, i64) {
        for &threshold in &RATING_THRESHOLDS {
            let survivors: Vec<MatchOption> = ranked
                .iter()
                .filter(|o| o.rating_diff <= threshold as f64)
                .cloned()
                .collect();
            let deduped = Self::dedupe(survivors);
            if !deduped.is_empty() {
                let mut top = deduped;
                top.truncate(max_options);
                return (top, threshold);
            }
        }

        // No threshold satisfied: best effort, return unfiltered top N.
        let mut top = Self::dedupe(ranked.to_vec());
        top.truncate(max_options);
        (top, BEST_EFFORT_THRESHOLD)
    }

    fn number(options: &mut [MatchOption], start: i32, threshold: i64) {
        for (i, option) in options.iter_mut().enumerate() {
            option.option_number = start + i as i32 + 1;
            option.used_rating_threshold = threshold;
        }
    }
}

impl Default for MatchmakingBatch {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            threshold_used: BEST_EFFORT_THRESHOLD,
        }
    }
}

/// Convenience default used when the caller doesn't want to think about
/// batch size; mirrors [`DEFAULT_OPTION_COUNT`].
pub fn default_max_options() -> usize {
    DEFAULT_OPTION_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RoleProfile;

    fn players_with(ratings: impl Fn(usize) -> i64, comfort: u8) -> Vec<PlayerProfiles> {
        (0..10)
            .map(|i| {
                let user_id = Uuid::new_v4();
                let profiles: Vec<RoleProfile> = Role::ALL
                    .into_iter()
                    .map(|role| RoleProfile::new(user_id, role, ratings(i), comfort).unwrap())
                    .collect();
                PlayerProfiles::from_role_profiles(user_id, &profiles).unwrap()
            })
            .collect()
    }

    #[test]
    fn rejects_wrong_player_count() {
        let players = players_with(|_| 1600, 3);
        let short = &players[..9];
        let err = MatchmakingEngine::generate(short, 1, 8).unwrap_err();
        assert_eq!(err, DraftCoreError::NotEnoughPlayers(9));
    }

    #[test]
    fn identical_profiles_yield_zero_rating_diff_and_near_perfect_score() {
        let players = players_with(|_| 1600, 3);
        let batch = MatchmakingEngine::generate(&players, 42, 8).unwrap();
        assert!(!batch.options.is_empty());
        let best = &batch.options[0];
        assert_eq!(best.rating_diff, 0.0);
        assert!(best.balance_score >= 99.0 && best.balance_score <= 100.0);
        assert_eq!(best.assignments.len(), 10);
    }

    #[test]
    fn every_option_assigns_five_distinct_roles_per_team_and_every_user_once() {
        let players = players_with(|i| 1000 + i as i64 * 37, 3);
        let batch = MatchmakingEngine::generate(&players, 7, 8).unwrap();
        for option in &batch.options {
            assert_eq!(option.assignments.len(), 10);
            let mut seen_users = HashSet::new();
            let mut blue_roles = HashSet::new();
            let mut red_roles = HashSet::new();
            for a in &option.assignments {
                assert!(seen_users.insert(a.user_id), "user appears twice");
                let roles = match a.team {
                    Team::Blue => &mut blue_roles,
                    Team::Red => &mut red_roles,
                };
                assert!(roles.insert(a.role), "role duplicated within a team");
            }
            assert_eq!(blue_roles.len(), 5);
            assert_eq!(red_roles.len(), 5);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let players = players_with(|i| 1200 + i as i64 * 11, 3);
        let a = MatchmakingEngine::generate(&players, 99, 8).unwrap();
        let b = MatchmakingEngine::generate(&players, 99, 8).unwrap();
        assert_eq!(a.threshold_used, b.threshold_used);
        assert_eq!(a.options.len(), b.options.len());
        for (x, y) in a.options.iter().zip(b.options.iter()) {
            assert_eq!(x.composition_key(), y.composition_key());
        }
    }

    #[test]
    fn raising_comfort_never_lowers_the_best_score() {
        let base = players_with(|_| 1500, 3);
        let base_batch = MatchmakingEngine::generate(&base, 5, 8).unwrap();
        let base_best = base_batch.options[0].balance_score;

        let mut improved = base.clone();
        // bump every profile's comfort for player 0 to max.
        let boosted_id = improved[0].user_id;
        let boosted_profiles: Vec<RoleProfile> = Role::ALL
            .into_iter()
            .map(|role| RoleProfile::new(boosted_id, role, 1500, 5).unwrap())
            .collect();
        improved[0] = PlayerProfiles::from_role_profiles(boosted_id, &boosted_profiles).unwrap();

        let improved_batch = MatchmakingEngine::generate(&improved, 5, 8).unwrap();
        let improved_best = improved_batch.options[0].balance_score;

        assert!(improved_best >= base_best);
    }

    #[test]
    fn generate_more_excludes_previously_returned_compositions() {
        let players = players_with(|i| 1000 + i as i64 * 53, 3);
        let first = MatchmakingEngine::generate(&players, 3, 4).unwrap();
        let more = MatchmakingEngine::generate_more(&players, &first.options, 3, 4).unwrap();

        let previous_keys: HashSet<_> =
            first.options.iter().map(|o| o.composition_key()).collect();
        for option in &more.options {
            assert!(!previous_keys.contains(&option.composition_key()));
        }
    }
}
