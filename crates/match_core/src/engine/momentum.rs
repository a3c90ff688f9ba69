//! Momentum Tracker
//!
//! Consecutive-goal streaks per team and per player.
//! - A goal extends the scoring team's streak and the scorer's streak
//! - The conceding team, and every player on it, drops back to zero
//! - Own goals credit the team but no player
//!
//! Celebration thresholds are applied by the caller through
//! [`MomentumUpdate::celebrations`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{PlayerId, TeamId};

/// Streak state for one team or player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakRecord {
    pub consecutive_goals: u32,
    /// Engine second of the most recent goal in the streak
    pub last_goal_at: Option<u64>,
}

impl StreakRecord {
    fn extend(&mut self, at: u64) {
        self.consecutive_goals += 1;
        self.last_goal_at = Some(at);
    }

    fn reset(&mut self) {
        self.consecutive_goals = 0;
    }
}

/// Streak that crossed a celebration threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub team: TeamId,
    /// `None` for a team streak
    pub player: Option<PlayerId>,
    pub streak: u32,
}

/// Streak values right after one goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MomentumUpdate {
    pub team: TeamId,
    pub team_streak: u32,
    pub scorer: Option<(PlayerId, u32)>,
}

impl MomentumUpdate {
    /// Team celebration first, then the scorer's.
    pub fn celebrations(&self, team_threshold: u32, player_threshold: u32) -> Vec<Celebration> {
        let mut out = Vec::new();
        if self.team_streak >= team_threshold {
            out.push(Celebration {
                team: self.team,
                player: None,
                streak: self.team_streak,
            });
        }
        if let Some((player, streak)) = self.scorer {
            if streak >= player_threshold {
                out.push(Celebration {
                    team: self.team,
                    player: Some(player),
                    streak,
                });
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentumTracker {
    teams: BTreeMap<TeamId, StreakRecord>,
    players: BTreeMap<PlayerId, (TeamId, StreakRecord)>,
}

impl MomentumTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a goal for `scoring_team`. `scorer` is the player credited with
    /// the last touch and the team that player belongs to.
    pub fn record_goal(
        &mut self,
        scoring_team: TeamId,
        scorer: Option<(PlayerId, TeamId)>,
        at: u64,
    ) -> MomentumUpdate {
        let conceding = scoring_team.opponent();

        let team = self.teams.entry(scoring_team).or_default();
        team.extend(at);
        let team_streak = team.consecutive_goals;
        self.teams.entry(conceding).or_default().reset();

        for (owner, record) in self.players.values_mut() {
            if *owner == conceding {
                record.reset();
            }
        }

        let scorer = match scorer {
            Some((id, team)) if team == scoring_team => {
                let (_, record) = self
                    .players
                    .entry(id)
                    .or_insert((team, StreakRecord::default()));
                record.extend(at);
                Some((id, record.consecutive_goals))
            }
            Some((id, _)) => {
                log::debug!("Own goal by {}, no player streak credited", id);
                None
            }
            None => None,
        };

        MomentumUpdate {
            team: scoring_team,
            team_streak,
            scorer,
        }
    }

    pub fn team(&self, team: TeamId) -> StreakRecord {
        self.teams.get(&team).copied().unwrap_or_default()
    }

    pub fn player(&self, id: PlayerId) -> StreakRecord {
        self.players
            .get(&id)
            .map(|(_, record)| *record)
            .unwrap_or_default()
    }

    /// Drop a departed player's streak.
    pub fn forget_player(&mut self, id: PlayerId) {
        self.players.remove(&id);
    }

    pub fn clear(&mut self) {
        self.teams.clear();
        self.players.clear();
    }
}
