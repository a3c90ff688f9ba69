use serde::{Deserialize, Serialize};

/// Restart geometry and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    /// Kicking team's central player distance behind the ball
    pub kicker_offset: f32,
    /// Minimum clearance of defending players from the ball at kickoff
    pub ten_yard_radius: f32,
    /// Goalkeeper distance in front of its own goal line
    pub goalkeeper_inset: f32,
    /// Role depths behind the centre line, as a fraction of half the field length
    pub defender_depth: f32,
    pub midfielder_depth: f32,
    pub attacker_depth: f32,
    /// Lateral gap between players sharing a role
    pub lateral_spacing: f32,
    /// Throw-in: ball distance inside the sideline
    pub throw_in_inset: f32,
    /// Throw-in: keep the ball this far from either goal line
    pub throw_in_length_margin: f32,
    /// Corner: ball distance inside both lines
    pub corner_inset: f32,
    /// Goal kick: ball distance in front of the goal line
    pub goal_kick_offset: f32,
    pub ball_spawn_height: f32,
    pub player_spawn_height: f32,
    /// Countdown between staging a restart and resuming play
    pub countdown_seconds: u64,
    /// Delay between a goal and staging the kickoff
    pub goal_celebration_seconds: u64,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            kicker_offset: 1.5,
            ten_yard_radius: 9.0,
            goalkeeper_inset: 3.0,
            defender_depth: 0.6,
            midfielder_depth: 0.35,
            attacker_depth: 0.15,
            lateral_spacing: 8.0,
            throw_in_inset: 1.0,
            throw_in_length_margin: 2.0,
            corner_inset: 1.0,
            goal_kick_offset: 6.0,
            ball_spawn_height: 1.0,
            player_spawn_height: 1.0,
            countdown_seconds: 3,
            goal_celebration_seconds: 3,
        }
    }
}

impl RestartConfig {
    pub fn validate(&self, half_length: f32) -> Result<(), String> {
        if self.kicker_offset <= 0.0 {
            return Err(format!("kicker_offset must be positive, got {}", self.kicker_offset));
        }
        if self.kicker_offset >= self.ten_yard_radius {
            return Err(format!(
                "kicker_offset ({}) must be smaller than ten_yard_radius ({})",
                self.kicker_offset, self.ten_yard_radius
            ));
        }
        if self.ten_yard_radius >= half_length {
            return Err(format!(
                "ten_yard_radius ({}) must fit inside half the field ({})",
                self.ten_yard_radius, half_length
            ));
        }
        for (name, depth) in [
            ("defender_depth", self.defender_depth),
            ("midfielder_depth", self.midfielder_depth),
            ("attacker_depth", self.attacker_depth),
        ] {
            if !(0.0..=1.0).contains(&depth) {
                return Err(format!("{} must be 0.0-1.0, got {}", name, depth));
            }
        }
        if self.throw_in_length_margin < 0.0 || self.throw_in_length_margin >= half_length {
            return Err(format!(
                "throw_in_length_margin ({}) must be within half the field ({})",
                self.throw_in_length_margin, half_length
            ));
        }
        if self.goalkeeper_inset < 0.0 || self.goalkeeper_inset >= half_length {
            return Err(format!(
                "goalkeeper_inset must be within the half, got {}",
                self.goalkeeper_inset
            ));
        }
        Ok(())
    }
}
