//! Outbound messages
//!
//! Presentation signals and world commands are fire-and-forget: the engine
//! queues them and the host drains them. `WorldPort` is the seam for the
//! physics collaborator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coin_toss::CoinTossOutcome;
use super::momentum::Celebration;
use super::restart::{PlayerPlacement, RestartDirective};
use super::roster::EffectKind;
use super::state::{MatchState, MatchStatus};
use super::stats::HalfStats;
use super::types::{PlayerId, RestartKind, Score, TeamId, Vec3};
use crate::error::{OperatorCommand, PortError};

/// Read-only view of the match for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub match_id: Uuid,
    pub status: MatchStatus,
    pub current_half: u8,
    pub in_overtime: bool,
    pub half_time_remaining: i32,
    pub match_time_remaining: i32,
    pub stoppage_time_added: i32,
    pub score: Score,
    pub kickoff_team: Option<TeamId>,
    pub elapsed_seconds: u64,
}

impl From<&MatchState> for StateSnapshot {
    fn from(state: &MatchState) -> Self {
        Self {
            match_id: state.match_id,
            status: state.status,
            current_half: state.current_half,
            in_overtime: state.in_overtime,
            half_time_remaining: state.clock.half_time_remaining,
            match_time_remaining: state.clock.match_time_remaining,
            stoppage_time_added: state.clock.stoppage_time_added,
            score: state.score,
            kickoff_team: state.kickoff_team,
            elapsed_seconds: state.elapsed_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    Snapshot(StateSnapshot),
    GoalScored {
        team: TeamId,
        scorer: Option<PlayerId>,
        own_goal: bool,
        score: Score,
    },
    StoppageTimeNotification {
        half: u8,
        seconds: i32,
    },
    ClockProgress {
        half: u8,
        half_time_remaining: i32,
        in_stoppage: bool,
        in_overtime: bool,
    },
    HalfStats(HalfStats),
    GameOver {
        winner: Option<TeamId>,
        score: Score,
        decided_in_overtime: bool,
    },
    Momentum(Celebration),
    CoinToss(CoinTossOutcome),
    RestartCountdown {
        kind: RestartKind,
        team: TeamId,
        seconds: u64,
    },
    RestartComplete {
        kind: RestartKind,
        team: TeamId,
    },
    PhaseChanged {
        from: MatchStatus,
        to: MatchStatus,
    },
    EffectExpired {
        player: PlayerId,
        effect: EffectKind,
    },
    CommandRejected {
        command: OperatorCommand,
        reason: String,
    },
}

/// Commands for the physics/roster collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WorldCommand {
    ApplyRestart(RestartDirective),
    FreezePlayers(Vec<PlayerId>),
    UnfreezePlayers(Vec<PlayerId>),
    /// Despawn everything and clear world-side effects
    ResetWorld,
}

impl WorldCommand {
    /// Execute against `world`. Failures are logged and skipped.
    pub fn apply<W: WorldPort + ?Sized>(&self, world: &mut W) -> ApplyReport {
        match self {
            WorldCommand::ApplyRestart(directive) => directive.apply(world),
            WorldCommand::FreezePlayers(ids) => set_frozen_all(world, ids, true),
            WorldCommand::UnfreezePlayers(ids) => set_frozen_all(world, ids, false),
            WorldCommand::ResetWorld => {
                if let Err(err) = world.reset_world() {
                    log::warn!("World reset failed: {}", err);
                }
                ApplyReport::default()
            }
        }
    }
}

fn set_frozen_all<W: WorldPort + ?Sized>(world: &mut W, ids: &[PlayerId], frozen: bool) -> ApplyReport {
    let mut report = ApplyReport::default();
    for id in ids {
        match world.set_frozen(*id, frozen) {
            Ok(()) => report.applied += 1,
            Err(err) => {
                log::warn!("Skipping freeze={} for {}: {}", frozen, id, err);
                report.skipped.push(*id);
            }
        }
    }
    report
}

/// Physics/roster collaborator as seen by the engine.
pub trait WorldPort {
    fn teleport_ball(&mut self, position: Vec3, velocity: Vec3) -> Result<(), PortError>;
    fn place_player(&mut self, placement: &PlayerPlacement) -> Result<(), PortError>;
    fn set_frozen(&mut self, id: PlayerId, frozen: bool) -> Result<(), PortError>;
    fn reset_world(&mut self) -> Result<(), PortError>;
}

/// Outcome of applying a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: Vec<PlayerId>,
}
