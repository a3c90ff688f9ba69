//! Match State Machine
//!
//! `MatchEngine` is the only writer of `MatchState`. Everything that changes
//! the match goes through it:
//! - operator commands (`commands.rs`), rejected with a `CommandRejection`
//! - world reports: ball position, boundary events, touches (`play_events.rs`)
//! - restart staging, countdowns and period ends (`restarts.rs`)
//! - `tick()`, one call per wall-clock second
//!
//! ```text
//! Waiting -> Starting -> Playing -> Halftime -> Playing(2) -> Finished
//!                          |  ^                     |
//!                          v  |                     v (tied)
//!                   GoalScored/Restarting        Overtime -> Finished
//! ```
//!
//! Output is queued in an outbox (`drain_outputs`) instead of being pushed to
//! collaborators directly.

mod commands;
mod play_events;
mod restarts;

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::boundary::BoundaryEvent;
use super::coin_toss::CoinTossCall;
use super::config::MatchConfig;
use super::momentum::MomentumTracker;
use super::roster::{EffectKind, Roster};
use super::scheduler::{Scheduler, TaskToken};
use super::signals::{Signal, StateSnapshot, WorldCommand};
use super::state::{MatchState, MatchStatus};
use super::stats::MatchStats;
use super::types::{PlayerId, PlayerRole, TeamId, Vec3};
use crate::error::{CommandRejection, ConfigError};

/// Operator command with its arguments, for queued submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum OperatorRequest {
    StartGame,
    ResetGame,
    StartSecondHalf,
    CoinToss {
        call: Option<CoinTossCall>,
    },
    BallReset,
    AddPlayer {
        id: PlayerId,
        name: String,
        team: TeamId,
        role: PlayerRole,
        is_ai: bool,
    },
    RemovePlayer {
        id: PlayerId,
    },
    ApplyEffect {
        id: PlayerId,
        kind: EffectKind,
        duration_seconds: u64,
    },
}

/// Anything that can reach the engine between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum MatchInput {
    Operator(OperatorRequest),
    BallPosition { position: Vec3 },
    Boundary(BoundaryEvent),
    Touch { player: PlayerId, attached: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Applied,
    /// Stale or irrelevant for the current phase; nothing changed
    Ignored,
    Rejected(CommandRejection),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "snake_case")]
pub enum EngineOutput {
    Signal(Signal),
    World(WorldCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduledTask {
    /// Countdown over: unfreeze and go live
    ResumePlay,
    /// Goal celebration over: stage the conceding team's kickoff
    StageKickoff,
    /// Golden goal celebration over
    FinishMatch,
}

pub struct MatchEngine {
    config: MatchConfig,
    state: MatchState,
    roster: Roster,
    momentum: MomentumTracker,
    stats: MatchStats,
    scheduler: Scheduler<ScheduledTask>,
    /// Task that will bring play back after the current dead ball
    pending_resume: Option<TaskToken>,
    inputs: VecDeque<MatchInput>,
    outbox: Vec<EngineOutput>,
    /// (elapsed second, from, to)
    transitions: Vec<(u64, MatchStatus, MatchStatus)>,
    rng: ChaCha8Rng,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::random())
    }

    /// Same seed, same inputs, same match. The config is validated here, so
    /// hand-built configs get the same checks as loaded ones.
    pub fn with_seed(config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = MatchState::new(Uuid::new_v4(), config.clock.half_seconds);
        log::debug!("Created match {} with seed {}", state.match_id, seed);
        Ok(Self {
            config,
            state,
            roster: Roster::new(),
            momentum: MomentumTracker::new(),
            stats: MatchStats::new(),
            scheduler: Scheduler::new(),
            pending_resume: None,
            inputs: VecDeque::new(),
            outbox: Vec::new(),
            transitions: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    // ===========================================
    // Accessors
    // ===========================================

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn status(&self) -> MatchStatus {
        self.state.status
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn momentum(&self) -> &MomentumTracker {
        &self.momentum
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::from(&self.state)
    }

    pub fn transitions(&self) -> &[(u64, MatchStatus, MatchStatus)] {
        &self.transitions
    }

    /// Is a restart countdown or goal celebration waiting to fire?
    pub fn has_pending_resume(&self) -> bool {
        self.pending_resume
            .map_or(false, |token| self.scheduler.is_pending(token))
    }

    // ===========================================
    // Outbox
    // ===========================================

    pub fn outputs(&self) -> &[EngineOutput] {
        &self.outbox
    }

    pub fn drain_outputs(&mut self) -> Vec<EngineOutput> {
        std::mem::take(&mut self.outbox)
    }

    fn emit(&mut self, signal: Signal) {
        self.outbox.push(EngineOutput::Signal(signal));
    }

    fn command_world(&mut self, command: WorldCommand) {
        self.outbox.push(EngineOutput::World(command));
    }

    fn emit_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.emit(Signal::Snapshot(snapshot));
    }

    fn set_status(&mut self, to: MatchStatus) {
        let from = self.state.status;
        if from == to {
            return;
        }
        log::info!("Match {}: {} -> {}", self.state.match_id, from, to);
        self.state.status = to;
        self.transitions.push((self.state.elapsed_seconds, from, to));
        self.emit(Signal::PhaseChanged { from, to });
    }

    // ===========================================
    // Input queue
    // ===========================================

    /// Queue an input for the next `process_inputs` (or `tick`).
    pub fn submit(&mut self, input: MatchInput) {
        self.inputs.push_back(input);
    }

    /// Apply queued inputs in arrival order. Each one is checked against the
    /// status at the moment it is processed, not when it was submitted.
    pub fn process_inputs(&mut self) -> Vec<InputOutcome> {
        let mut outcomes = Vec::with_capacity(self.inputs.len());
        while let Some(input) = self.inputs.pop_front() {
            outcomes.push(self.handle_input(input));
        }
        outcomes
    }

    pub fn handle_input(&mut self, input: MatchInput) -> InputOutcome {
        match input {
            MatchInput::Operator(request) => match self.handle_operator(request) {
                Ok(()) => InputOutcome::Applied,
                Err(rejection) => InputOutcome::Rejected(rejection),
            },
            MatchInput::BallPosition { position } => self.report_ball_position(position),
            MatchInput::Boundary(event) => self.report_boundary_event(event),
            MatchInput::Touch { player, attached } => self.report_touch(player, attached),
        }
    }

    fn handle_operator(&mut self, request: OperatorRequest) -> Result<(), CommandRejection> {
        match request {
            OperatorRequest::StartGame => self.start_game(),
            OperatorRequest::ResetGame => self.reset_game(),
            OperatorRequest::StartSecondHalf => self.start_second_half(),
            OperatorRequest::CoinToss { call } => self.perform_coin_toss(call).map(|_| ()),
            OperatorRequest::BallReset => self.handle_ball_reset(),
            OperatorRequest::AddPlayer {
                id,
                name,
                team,
                role,
                is_ai,
            } => self.add_player(id, &name, team, role, is_ai),
            OperatorRequest::RemovePlayer { id } => self.remove_player(id),
            OperatorRequest::ApplyEffect {
                id,
                kind,
                duration_seconds,
            } => self.apply_effect(id, kind, duration_seconds),
        }
    }

    // ===========================================
    // Tick
    // ===========================================

    /// Advance one wall-clock second.
    ///
    /// 1. Drain queued inputs
    /// 2. Run the clock if a live phase is active (end the period if it ran out)
    /// 3. Fire due scheduled tasks (countdowns, celebrations)
    /// 4. Expire timed effects
    pub fn tick(&mut self) {
        self.process_inputs();
        self.state.elapsed_seconds += 1;

        if self.state.status.is_clock_running() {
            self.tick_clock();
        }

        for (token, task) in self.scheduler.advance(1) {
            if self.pending_resume == Some(token) {
                self.pending_resume = None;
            }
            self.run_task(task);
        }

        let now = self.state.elapsed_seconds;
        for (player, effect) in self.roster.expire_effects(now) {
            log::debug!("{:?} expired on {}", effect.kind, player);
            self.emit(Signal::EffectExpired {
                player,
                effect: effect.kind,
            });
        }
    }
}
