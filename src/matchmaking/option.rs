use crate::error::{DraftCoreError, Result};
use crate::profile::{Role, RoleProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Which side of the draft a player was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub fn other(&self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }
}

/// All five role ratings/comforts for one of the ten players being matched,
/// flattened from [`RoleProfile`] for cheap lookup during scoring.
#[derive(Debug, Clone)]
pub struct PlayerProfiles {
    pub user_id: Uuid,
    ratings: HashMap<Role, i64>,
    comforts: HashMap<Role, u8>,
}

impl PlayerProfiles {
    /// Builds from the five materialized [`RoleProfile`] rows for a user.
    /// The invariant that every user has exactly five profiles is assumed
    /// already satisfied by [`crate::profile::ProfileStore::profiles_for`].
    pub fn from_role_profiles(user_id: Uuid, profiles: &[RoleProfile]) -> Result<Self> {
        let mut ratings = HashMap::new();
        let mut comforts = HashMap::new();
        for p in profiles {
            if p.user_id != user_id {
                return Err(DraftCoreError::InvalidInput(
                    "profile belongs to a different user".into(),
                ));
            }
            ratings.insert(p.role, p.rating);
            comforts.insert(p.role, p.comfort);
        }
        for role in Role::ALL {
            if !ratings.contains_key(&role) {
                return Err(DraftCoreError::InvalidInput(format!(
                    "missing profile for role {role}"
                )));
            }
        }
        Ok(Self {
            user_id,
            ratings,
            comforts,
        })
    }

    pub fn rating(&self, role: Role) -> i64 {
        self.ratings[&role]
    }

    pub fn comfort(&self, role: Role) -> u8 {
        self.comforts[&role]
    }
}

/// One (user, team, role) entry inside a generated [`MatchOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub user_id: Uuid,
    pub team: Team,
    pub role: Role,
    pub role_rating: i64,
    pub comfort: u8,
}

/// A generated team/role assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOption {
    pub option_number: i32,
    pub algorithm_tag: String,
    pub assignments: Vec<Assignment>,
    pub blue_avg_rating: f64,
    pub red_avg_rating: f64,
    pub rating_diff: f64,
    pub lane_diffs: Vec<(Role, f64)>,
    pub balance_score: f64,
    pub blue_avg_comfort: f64,
    pub red_avg_comfort: f64,
    pub used_rating_threshold: i64,
}

impl MatchOption {
    pub fn team_assignments(&self, team: Team) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(move |a| a.team == team)
    }

    /// The team's captain defaults to its Top-role player.
    pub fn default_captain(&self, team: Team) -> Option<Uuid> {
        self.team_assignments(team)
            .min_by_key(|a| a.role.lane_order())
            .map(|a| a.user_id)
    }

    /// Canonical (user -> (team, role)) key used to dedupe compositions
    /// by composition hash.
    pub fn composition_key(&self) -> Vec<(Uuid, Team, Role)> {
        let mut key: Vec<(Uuid, Team, Role)> = self
            .assignments
            .iter()
            .map(|a| (a.user_id, a.team, a.role))
            .collect();
        key.sort_by_key(|(user_id, _, _)| *user_id);
        key
    }
}
