//! Matchmaking engine: comfort-first role/team balancing
//! with a progressive rating-tolerance search.

mod engine;
mod option;

pub use engine::{MatchmakingBatch, MatchmakingEngine};
pub use option::{Assignment, MatchOption, PlayerProfiles, Team};

/// Default number of options returned per batch.
pub const DEFAULT_OPTION_COUNT: usize = 8;

/// Progressive rating thresholds tried in order.
pub const RATING_THRESHOLDS: [i64; 5] = [100, 200, 300, 400, 500];

/// Threshold value reported when no threshold in [`RATING_THRESHOLDS`]
/// yielded any surviving option ("best effort").
pub const BEST_EFFORT_THRESHOLD: i64 = -1;
