//! Per-user, per-role matchmaking profiles (component A).

mod role;
mod store;

pub use role::{comfort_penalty, Role};
pub use store::{InMemoryProfileStore, ProfileStore};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stable user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
}

/// Comfort is an integer in [1,5]; higher means more willing to play the role.
pub const MIN_COMFORT: u8 = 1;
pub const MAX_COMFORT: u8 = 5;

/// Default comfort assigned to a materialized (never-set) profile.
pub const DEFAULT_COMFORT: u8 = 3;

/// Baseline rating used when a user has no profile on any role yet.
pub const LADDER_BASELINE_RATING: i64 = 1000;

/// A (user, role) -> rating/comfort record. Every user has exactly five of
/// these after initialization; missing profiles are
/// materialized as defaults by [`ProfileStore::profiles_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub user_id: Uuid,
    pub role: Role,
    pub rating: i64,
    pub comfort: u8,
}

impl RoleProfile {
    pub fn new(user_id: Uuid, role: Role, rating: i64, comfort: u8) -> crate::error::Result<Self> {
        if !(MIN_COMFORT..=MAX_COMFORT).contains(&comfort) {
            return Err(crate::error::DraftCoreError::InvalidInput(format!(
                "comfort must be in [{MIN_COMFORT},{MAX_COMFORT}], got {comfort}"
            )));
        }
        if rating < 0 {
            return Err(crate::error::DraftCoreError::InvalidInput(format!(
                "rating must be >= 0, got {rating}"
            )));
        }
        Ok(Self {
            user_id,
            role,
            rating,
            comfort,
        })
    }

    /// Default profile materialized for a (user, role) pair with no stored
    /// record: rating from the rank ladder baseline (or the user's existing
    /// average rating across their other roles, when any exist), comfort 3.
    pub fn default_for(user_id: Uuid, role: Role, ladder_rating: i64) -> Self {
        Self {
            user_id,
            role,
            rating: ladder_rating,
            comfort: DEFAULT_COMFORT,
        }
    }

    /// Per-player comfort penalty: `2^(5-comfort) - 1`.
    pub fn comfort_penalty(&self) -> f64 {
        role::comfort_penalty(self.comfort)
    }
}

/// Derive the rank-ladder default rating for a user materializing a missing
/// profile: the mean of their existing role ratings, rounded, or the fixed
/// baseline if they have none yet.
pub fn ladder_default_rating(existing: &[RoleProfile]) -> i64 {
    if existing.is_empty() {
        return LADDER_BASELINE_RATING;
    }
    let sum: i64 = existing.iter().map(|p| p.rating).sum();
    sum / existing.len() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_comfort() {
        let user = Uuid::new_v4();
        assert!(RoleProfile::new(user, Role::Top, 1000, 0).is_err());
        assert!(RoleProfile::new(user, Role::Top, 1000, 6).is_err());
        assert!(RoleProfile::new(user, Role::Top, 1000, 5).is_ok());
    }

    #[test]
    fn ladder_default_is_baseline_with_no_profiles() {
        assert_eq!(ladder_default_rating(&[]), LADDER_BASELINE_RATING);
    }

    #[test]
    fn ladder_default_is_average_of_existing() {
        let user = Uuid::new_v4();
        let existing = vec![
            RoleProfile::new(user, Role::Top, 1200, 3).unwrap(),
            RoleProfile::new(user, Role::Jungle, 1400, 3).unwrap(),
        ];
        assert_eq!(ladder_default_rating(&existing), 1300);
    }
}
