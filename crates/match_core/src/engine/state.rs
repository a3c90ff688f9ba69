//! Match state root
//!
//! `MatchState` is owned exclusively by `MatchEngine`. Other components get
//! copies (`ClockState` is `Copy`) or read-only borrows and hand back results.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{PlayerId, RestartKind, Score, TeamId};

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Waiting for players / operator start
    Waiting,
    /// Coin toss done, opening kickoff staged, countdown running
    Starting,
    /// Live play in regulation
    Playing,
    /// Dead ball: restart staged, countdown running
    Restarting,
    /// Between halves, waiting for the operator
    Halftime,
    /// Live play in overtime
    Overtime,
    /// Goal celebration before the kickoff is staged
    GoalScored,
    /// Match over
    Finished,
}

impl MatchStatus {
    /// Is the match clock running in this phase?
    pub fn is_clock_running(self) -> bool {
        matches!(self, MatchStatus::Playing | MatchStatus::Overtime)
    }

    /// Can goal and boundary events be accepted?
    pub fn accepts_play_events(self) -> bool {
        self.is_clock_running()
    }

    pub fn is_dead_ball(self) -> bool {
        matches!(
            self,
            MatchStatus::Starting | MatchStatus::Restarting | MatchStatus::GoalScored
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            MatchStatus::Waiting => "waiting",
            MatchStatus::Starting => "starting",
            MatchStatus::Playing => "playing",
            MatchStatus::Restarting => "restarting",
            MatchStatus::Halftime => "at halftime",
            MatchStatus::Overtime => "in overtime",
            MatchStatus::GoalScored => "celebrating a goal",
            MatchStatus::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Countdown state for the current period, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockState {
    /// Goes negative while stoppage time is being played
    pub half_time_remaining: i32,
    pub match_time_remaining: i32,
    pub stoppage_time_added: i32,
    pub stoppage_time_notified: bool,
}

impl ClockState {
    /// Fresh regulation clock: two halves of `half_seconds`.
    pub fn regulation(half_seconds: i32) -> Self {
        Self {
            half_time_remaining: half_seconds,
            match_time_remaining: half_seconds * 2,
            stoppage_time_added: 0,
            stoppage_time_notified: false,
        }
    }

    /// Clear the stoppage allowance at a period boundary.
    pub fn clear_stoppage(&mut self) {
        self.stoppage_time_added = 0;
        self.stoppage_time_notified = false;
    }

    /// Seconds of stoppage played so far (0 before the half's scheduled end).
    pub fn stoppage_elapsed(&self) -> i32 {
        (-self.half_time_remaining).max(0)
    }
}

/// Last player/team to touch the ball, as reported by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastTouch {
    pub player: Option<PlayerId>,
    pub team: TeamId,
}

/// Restart currently staged and counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRestart {
    pub kind: RestartKind,
    pub team: TeamId,
}

/// The single mutable root of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Arena/match identifier; survives a reset
    pub match_id: Uuid,
    pub status: MatchStatus,
    /// 1 or 2; overtime is tracked by `in_overtime`
    pub current_half: u8,
    pub in_overtime: bool,
    pub clock: ClockState,
    pub score: Score,
    pub kickoff_team: Option<TeamId>,
    /// Player currently carrying the ball
    pub attached_player: Option<PlayerId>,
    pub last_touch: Option<LastTouch>,
    pub pending_restart: Option<PendingRestart>,
    /// Engine seconds since creation or reset
    pub elapsed_seconds: u64,
}

impl MatchState {
    pub fn new(match_id: Uuid, half_seconds: i32) -> Self {
        Self {
            match_id,
            status: MatchStatus::Waiting,
            current_half: 1,
            in_overtime: false,
            clock: ClockState::regulation(half_seconds),
            score: Score::default(),
            kickoff_team: None,
            attached_player: None,
            last_touch: None,
            pending_restart: None,
            elapsed_seconds: 0,
        }
    }

    /// Phase that live play resumes into after a restart.
    pub fn live_status(&self) -> MatchStatus {
        if self.in_overtime {
            MatchStatus::Overtime
        } else {
            MatchStatus::Playing
        }
    }

    /// Team last touching the ball, if known.
    pub fn last_touch_team(&self) -> Option<TeamId> {
        self.last_touch.map(|touch| touch.team)
    }
}
