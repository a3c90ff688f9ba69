//! Operator commands
//!
//! Each command checks the phase first. A rejected command changes nothing,
//! returns `Err(CommandRejection)` and leaves a `CommandRejected` signal in
//! the outbox.

use super::MatchEngine;
use crate::engine::coin_toss::{self, CoinTossCall, CoinTossOutcome};
use crate::engine::restart::RestartRequest;
use crate::engine::roster::{EffectKind, PlayerSlot};
use crate::engine::signals::{Signal, WorldCommand};
use crate::engine::state::{MatchState, MatchStatus};
use crate::engine::stats::MatchStats;
use crate::engine::clock;
use crate::engine::types::{PlayerId, PlayerRole, TeamId};
use crate::error::{CommandRejection, OperatorCommand};

impl MatchEngine {
    fn reject(&mut self, command: OperatorCommand, rejection: CommandRejection) -> CommandRejection {
        log::debug!("Rejected {}: {}", command, rejection);
        self.emit(Signal::CommandRejected {
            command: rejection.command(command),
            reason: rejection.to_string(),
        });
        rejection
    }

    fn require_status(&mut self, command: OperatorCommand, allowed: &[MatchStatus]) -> Result<(), CommandRejection> {
        let status = self.state.status;
        if allowed.contains(&status) {
            Ok(())
        } else {
            Err(self.reject(command, CommandRejection::WrongPhase { command, status }))
        }
    }

    /// Waiting -> Starting. Tosses the coin first if nobody has.
    pub fn start_game(&mut self) -> Result<(), CommandRejection> {
        let command = OperatorCommand::StartGame;
        self.require_status(command, &[MatchStatus::Waiting])?;
        if self.roster.is_empty() {
            return Err(self.reject(
                command,
                CommandRejection::NotEnoughPlayers {
                    present: 0,
                    required: 1,
                },
            ));
        }

        let team = match self.state.kickoff_team {
            Some(team) => team,
            None => self.resolve_coin_toss(None).winner,
        };
        log::info!(
            "Starting match {} with {} players, {} kicks off",
            self.state.match_id,
            self.roster.len(),
            team
        );
        self.stage_restart(RestartRequest::Kickoff { team });
        Ok(())
    }

    /// Finished -> Waiting with a fresh state. Roster, momentum, stats and
    /// scheduled tasks are cleared and the world is told to despawn.
    pub fn reset_game(&mut self) -> Result<(), CommandRejection> {
        self.require_status(OperatorCommand::ResetGame, &[MatchStatus::Finished])?;

        let cancelled = self.scheduler.cancel_all();
        let from = self.state.status;
        self.state = MatchState::new(self.state.match_id, self.config.clock.half_seconds);
        self.pending_resume = None;
        self.roster.clear();
        self.momentum.clear();
        self.stats = MatchStats::new();
        self.inputs.clear();
        self.transitions.clear();
        log::info!(
            "Reset match {} ({} scheduled tasks cancelled)",
            self.state.match_id,
            cancelled
        );

        self.command_world(WorldCommand::ResetWorld);
        self.emit(Signal::PhaseChanged {
            from,
            to: MatchStatus::Waiting,
        });
        self.emit_snapshot();
        Ok(())
    }

    /// Halftime -> kickoff of the second half by the other team.
    pub fn start_second_half(&mut self) -> Result<(), CommandRejection> {
        self.require_status(OperatorCommand::StartSecondHalf, &[MatchStatus::Halftime])?;

        self.state.current_half = 2;
        self.state.clock = clock::next_half(&self.config.clock, self.state.clock);
        self.stats.begin_period(2);
        let team = self.alternate_kickoff_team();
        self.stage_restart(RestartRequest::Kickoff { team });
        Ok(())
    }

    /// Decide the opening kickoff team. Only before the match starts.
    pub fn perform_coin_toss(&mut self, call: Option<CoinTossCall>) -> Result<CoinTossOutcome, CommandRejection> {
        self.require_status(OperatorCommand::CoinToss, &[MatchStatus::Waiting])?;
        Ok(self.resolve_coin_toss(call))
    }

    fn resolve_coin_toss(&mut self, call: Option<CoinTossCall>) -> CoinTossOutcome {
        let outcome = coin_toss::toss(&mut self.rng, call);
        log::info!("Coin toss landed {:?}, {} kicks off", outcome.landed, outcome.winner);
        self.state.kickoff_team = Some(outcome.winner);
        self.emit(Signal::CoinToss(outcome));
        outcome
    }

    /// Re-stage a kickoff for a stuck ball. The kickoff team alternates.
    pub fn handle_ball_reset(&mut self) -> Result<(), CommandRejection> {
        self.require_status(
            OperatorCommand::BallReset,
            &[MatchStatus::Playing, MatchStatus::Overtime, MatchStatus::Restarting],
        )?;
        self.state.last_touch = None;
        let team = self.alternate_kickoff_team();
        log::info!("Ball reset, {} kicks off", team);
        self.stage_restart(RestartRequest::Kickoff { team });
        Ok(())
    }

    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: &str,
        team: TeamId,
        role: PlayerRole,
        is_ai: bool,
    ) -> Result<(), CommandRejection> {
        let command = OperatorCommand::AddPlayer;
        self.require_status(
            command,
            &[
                MatchStatus::Waiting,
                MatchStatus::Starting,
                MatchStatus::Playing,
                MatchStatus::Restarting,
                MatchStatus::Halftime,
                MatchStatus::Overtime,
                MatchStatus::GoalScored,
            ],
        )?;
        let slot = PlayerSlot { id, team, role, is_ai };
        if let Err(rejection) = self.roster.add(slot, name) {
            return Err(self.reject(command, rejection));
        }
        log::debug!("{} {} joined {} as {:?}", id, name, team, role);

        let rules = &self.config.rules;
        if rules.auto_start
            && self.state.status == MatchStatus::Waiting
            && self.roster.len() >= rules.min_players_to_start
        {
            self.start_game()?;
        }
        Ok(())
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), CommandRejection> {
        if self.roster.remove(id).is_none() {
            return Err(self.reject(OperatorCommand::RemovePlayer, CommandRejection::UnknownPlayer(id)));
        }
        self.momentum.forget_player(id);
        if self.state.attached_player == Some(id) {
            self.state.attached_player = None;
        }
        log::debug!("{} left the match", id);
        Ok(())
    }

    pub fn apply_effect(&mut self, id: PlayerId, kind: EffectKind, duration_seconds: u64) -> Result<(), CommandRejection> {
        let now = self.state.elapsed_seconds;
        if let Err(rejection) = self.roster.apply_effect(id, kind, now, duration_seconds) {
            return Err(self.reject(OperatorCommand::ApplyEffect, rejection));
        }
        Ok(())
    }
}
