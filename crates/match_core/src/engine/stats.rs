//! Per-period match statistics behind the `half_stats` signal.

use serde::{Deserialize, Serialize};

use super::types::{RestartKind, Score, TeamId};

/// Counters for one period (half 1, half 2, overtime = 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HalfStats {
    pub period: u8,
    /// Goals scored within this period only
    pub goals: Score,
    pub throw_ins: u32,
    pub corner_kicks: u32,
    pub goal_kicks: u32,
    pub stoppage_time_added: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchStats {
    current: HalfStats,
    closed: Vec<HalfStats>,
}

impl MatchStats {
    pub fn new() -> Self {
        Self {
            current: HalfStats {
                period: 1,
                ..HalfStats::default()
            },
            closed: Vec::new(),
        }
    }

    pub fn record_goal(&mut self, team: TeamId) {
        self.current.goals.increment(team);
    }

    pub fn record_restart(&mut self, kind: RestartKind) {
        match kind {
            RestartKind::ThrowIn => self.current.throw_ins += 1,
            RestartKind::CornerKick => self.current.corner_kicks += 1,
            RestartKind::GoalKick => self.current.goal_kicks += 1,
            RestartKind::Kickoff => {}
        }
    }

    /// Close the running period and return its totals.
    pub fn close_period(&mut self, stoppage_time_added: i32) -> HalfStats {
        self.current.stoppage_time_added = stoppage_time_added;
        let closed = self.current;
        self.closed.push(closed);
        closed
    }

    pub fn begin_period(&mut self, period: u8) {
        self.current = HalfStats {
            period,
            ..HalfStats::default()
        };
    }

    pub fn current(&self) -> &HalfStats {
        &self.current
    }

    pub fn closed_periods(&self) -> &[HalfStats] {
        &self.closed
    }
}
