//! Plain `Deserialize`-able configuration structs: no
//! config crate is introduced, matching the corpus's matchmaking/draft
//! servers, which hand-roll config structs with defaults plus environment
//! overrides rather than pull in a dedicated config crate.

use serde::{Deserialize, Serialize};

use crate::draft::{BUFFER_SECS, EDIT_EXPIRY_SECS as DRAFT_EDIT_EXPIRY_SECS, RESUME_COUNTDOWN_SECS as DRAFT_RESUME_COUNTDOWN_SECS};
use crate::lobby::{
    DEFAULT_TURN_TIMER_SECS, MAX_TURN_TIMER_SECS, MIN_TURN_TIMER_SECS, PROPOSAL_EXPIRY_SECS,
};
use crate::matchmaking::{DEFAULT_OPTION_COUNT, RATING_THRESHOLDS};

/// Timer-related bounds and durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub default_turn_timer_secs: u32,
    pub min_turn_timer_secs: u32,
    pub max_turn_timer_secs: u32,
    pub proposal_expiry_secs: i64,
    pub edit_expiry_secs: i64,
    pub resume_countdown_secs: u8,
    pub buffer_secs: u8,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_turn_timer_secs: DEFAULT_TURN_TIMER_SECS,
            min_turn_timer_secs: MIN_TURN_TIMER_SECS,
            max_turn_timer_secs: MAX_TURN_TIMER_SECS,
            proposal_expiry_secs: PROPOSAL_EXPIRY_SECS,
            edit_expiry_secs: DRAFT_EDIT_EXPIRY_SECS,
            resume_countdown_secs: DRAFT_RESUME_COUNTDOWN_SECS,
            buffer_secs: BUFFER_SECS,
        }
    }
}

/// Matchmaking engine tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchmakingConfig {
    pub default_option_count: usize,
    pub rating_thresholds: Vec<i64>,
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            default_option_count: DEFAULT_OPTION_COUNT,
            rating_thresholds: RATING_THRESHOLDS.to_vec(),
        }
    }
}

/// Top-level configuration for a running draft-core instance, assembled
/// from [`Default`] and overridden by environment variables via
/// [`DraftCoreConfig::from_env`]. Library code never reads the environment
/// itself; the embedding binary is expected to
/// call `from_env` and thread the result through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DraftCoreConfig {
    pub timers: TimerConfig,
    pub matchmaking: MatchmakingConfig,
}

impl DraftCoreConfig {
    /// Overrides defaults from `DRAFTCORE_*` environment variables.
    /// Malformed values are ignored (the default wins) rather than
    /// failing startup, preferring graceful degradation over hard failures
    /// in non-critical paths.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_u32("DRAFTCORE_DEFAULT_TURN_TIMER_SECS") {
            config.timers.default_turn_timer_secs = v;
        }
        if let Some(v) = env_u32("DRAFTCORE_MIN_TURN_TIMER_SECS") {
            config.timers.min_turn_timer_secs = v;
        }
        if let Some(v) = env_u32("DRAFTCORE_MAX_TURN_TIMER_SECS") {
            config.timers.max_turn_timer_secs = v;
        }
        if let Some(v) = env_usize("DRAFTCORE_DEFAULT_OPTION_COUNT") {
            config.matchmaking.default_option_count = v;
        }

        config
    }
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_constants() {
        let config = DraftCoreConfig::default();
        assert_eq!(config.timers.default_turn_timer_secs, 30);
        assert_eq!(config.timers.proposal_expiry_secs, 300);
        assert_eq!(config.matchmaking.default_option_count, 8);
    }

    #[test]
    fn from_env_falls_back_to_default_on_missing_var() {
        std::env::remove_var("DRAFTCORE_DEFAULT_TURN_TIMER_SECS");
        let config = DraftCoreConfig::from_env();
        assert_eq!(config.timers.default_turn_timer_secs, 30);
    }
}
