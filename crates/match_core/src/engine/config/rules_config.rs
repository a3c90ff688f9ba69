use serde::{Deserialize, Serialize};

/// Match rules outside the clock and geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Roster size at which a waiting match may start
    pub min_players_to_start: usize,
    /// Start automatically once `min_players_to_start` is reached
    pub auto_start: bool,
    /// First goal in overtime ends the match
    pub golden_goal: bool,
    /// Consecutive team goals that trigger a momentum celebration
    pub team_streak_threshold: u32,
    /// Consecutive player goals that trigger a momentum celebration
    pub player_streak_threshold: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            min_players_to_start: 2,
            auto_start: false,
            golden_goal: false,
            team_streak_threshold: 2,
            player_streak_threshold: 3,
        }
    }
}

impl RulesConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_players_to_start == 0 {
            return Err("min_players_to_start must be at least 1".to_string());
        }
        if self.team_streak_threshold == 0 || self.player_streak_threshold == 0 {
            return Err("streak thresholds must be at least 1".to_string());
        }
        Ok(())
    }
}
