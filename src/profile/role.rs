use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five lane roles. Declaration order is the "Top-role" ordering
/// used by the default-captain rule: Top -> Jungle -> Mid -> ADC -> Support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    /// Position in the Top-role ordering; lower sorts first.
    pub fn lane_order(&self) -> u8 {
        match self {
            Role::Top => 0,
            Role::Jungle => 1,
            Role::Mid => 2,
            Role::Adc => 3,
            Role::Support => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Adc => "adc",
            Role::Support => "support",
        };
        write!(f, "{s}")
    }
}

/// `2^(5-comfort) - 1`. comfort 5 -> 0, comfort 1 -> 15.
pub fn comfort_penalty(comfort: u8) -> f64 {
    2f64.powi((5 - comfort as i32).max(0)) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comfort_penalty_table() {
        assert_eq!(comfort_penalty(5), 0.0);
        assert_eq!(comfort_penalty(4), 1.0);
        assert_eq!(comfort_penalty(3), 3.0);
        assert_eq!(comfort_penalty(2), 7.0);
        assert_eq!(comfort_penalty(1), 15.0);
    }

    #[test]
    fn lane_order_matches_top_role_rule() {
        let mut roles = Role::ALL;
        roles.sort_by_key(|r| r.lane_order());
        assert_eq!(roles, Role::ALL);
    }
}
