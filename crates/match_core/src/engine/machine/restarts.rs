//! Restart staging, countdowns and period transitions.
//!
//! A staged restart freezes play: the directive goes to the world, the status
//! moves to Starting (opening kickoff) or Restarting, and a cancellable
//! `ResumePlay` task brings play back once the countdown runs out. Staging
//! again before it fires replaces the pending countdown.

use rand::Rng;

use super::{MatchEngine, ScheduledTask};
use crate::engine::clock::{self, ClockSignal};
use crate::engine::restart::{RestartPositioner, RestartRequest};
use crate::engine::signals::{Signal, WorldCommand};
use crate::engine::state::{MatchStatus, PendingRestart};
use crate::engine::types::{RestartKind, TeamId};

impl MatchEngine {
    // ===========================================
    // Staging
    // ===========================================

    pub(super) fn stage_restart(&mut self, request: RestartRequest) {
        if let Some(token) = self.pending_resume.take() {
            if self.scheduler.cancel(token).is_some() {
                log::debug!("Cancelled pending resume {:?}", token);
            }
        }

        let kind = request.kind();
        let team = request.team();
        let players = self.roster.slots();
        let directive =
            RestartPositioner::new(&self.config.restart, &self.config.field).position(&request, &players);

        if kind != RestartKind::Kickoff {
            self.stats.record_restart(kind);
        }
        self.state.pending_restart = Some(PendingRestart { kind, team });
        self.state.attached_player = None;

        let staging = match self.state.status {
            MatchStatus::Waiting | MatchStatus::Starting => MatchStatus::Starting,
            _ => MatchStatus::Restarting,
        };
        self.set_status(staging);

        log::info!("Staged {} for {} ({} placements)", kind, team, directive.placements.len());
        self.command_world(WorldCommand::ApplyRestart(directive));

        let seconds = self.config.restart.countdown_seconds;
        self.emit(Signal::RestartCountdown { kind, team, seconds });
        self.pending_resume = Some(self.scheduler.schedule(seconds, ScheduledTask::ResumePlay));
    }

    pub(super) fn run_task(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::ResumePlay => self.resume_play(),
            ScheduledTask::StageKickoff => {
                if self.state.status != MatchStatus::GoalScored {
                    log::debug!("Dropping kickoff task while {}", self.state.status);
                    return;
                }
                let team = self.state.kickoff_team.unwrap_or_else(|| self.random_team());
                self.stage_restart(RestartRequest::Kickoff { team });
            }
            ScheduledTask::FinishMatch => self.finish(),
        }
    }

    fn resume_play(&mut self) {
        if !matches!(self.state.status, MatchStatus::Starting | MatchStatus::Restarting) {
            log::debug!("Dropping resume while {}", self.state.status);
            return;
        }
        let Some(pending) = self.state.pending_restart.take() else {
            return;
        };

        let live = self.state.live_status();
        self.set_status(live);
        self.command_world(WorldCommand::UnfreezePlayers(self.roster.ids()));
        self.emit(Signal::RestartComplete {
            kind: pending.kind,
            team: pending.team,
        });
        self.emit_snapshot();
    }

    /// Flip the kickoff team, or draw one if nobody has kicked off yet.
    pub(super) fn alternate_kickoff_team(&mut self) -> TeamId {
        let team = match self.state.kickoff_team {
            Some(team) => team.opponent(),
            None => self.random_team(),
        };
        self.state.kickoff_team = Some(team);
        team
    }

    pub(super) fn random_team(&mut self) -> TeamId {
        if self.rng.gen_bool(0.5) {
            TeamId::Home
        } else {
            TeamId::Away
        }
    }

    // ===========================================
    // Clock and periods
    // ===========================================

    pub(super) fn tick_clock(&mut self) {
        let result = if self.state.in_overtime {
            clock::tick_overtime(&self.config.clock, self.state.clock)
        } else {
            clock::tick_regulation(&self.config.clock, self.state.clock, &mut self.rng)
        };
        self.state.clock = result.clock;

        let half = self.state.current_half;
        for signal in result.signals {
            let signal = match signal {
                ClockSignal::StoppageAnnounced { seconds } => {
                    log::info!("{}s of stoppage added to half {}", seconds, half);
                    Signal::StoppageTimeNotification { half, seconds }
                }
                ClockSignal::Progress {
                    half_time_remaining,
                    in_stoppage,
                } => Signal::ClockProgress {
                    half,
                    half_time_remaining,
                    in_stoppage,
                    in_overtime: self.state.in_overtime,
                },
            };
            self.emit(signal);
        }
        self.emit_snapshot();

        if result.period_ended {
            self.end_period();
        }
    }

    fn end_period(&mut self) {
        if self.state.in_overtime {
            self.finish();
            return;
        }

        let period = self.stats.close_period(self.state.clock.stoppage_time_added);
        self.emit(Signal::HalfStats(period));

        if self.state.current_half == 1 {
            self.state.clock.clear_stoppage();
            self.state.attached_player = None;
            self.set_status(MatchStatus::Halftime);
            self.command_world(WorldCommand::FreezePlayers(self.roster.ids()));
            self.emit_snapshot();
        } else if self.state.score.is_tied() {
            self.enter_overtime();
        } else {
            self.finish();
        }
    }

    fn enter_overtime(&mut self) {
        log::info!("Tied at {}, going to overtime", self.state.score);
        self.state.in_overtime = true;
        self.state.clock = clock::overtime(&self.config.clock, self.state.clock);
        self.stats.begin_period(3);
        self.set_status(MatchStatus::Overtime);
        let team = self.alternate_kickoff_team();
        self.stage_restart(RestartRequest::Kickoff { team });
    }

    pub(super) fn finish(&mut self) {
        if self.state.status == MatchStatus::Finished {
            return;
        }
        if self.state.in_overtime {
            let period = self.stats.close_period(0);
            self.emit(Signal::HalfStats(period));
        }

        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            log::debug!("Cancelled {} scheduled tasks at full time", cancelled);
        }
        self.pending_resume = None;
        self.state.pending_restart = None;
        self.state.attached_player = None;

        self.set_status(MatchStatus::Finished);
        let score = self.state.score;
        let winner = score.leader();
        log::info!(
            "Match {} finished {} (winner: {:?})",
            self.state.match_id,
            score,
            winner
        );
        self.emit(Signal::GameOver {
            winner,
            score,
            decided_in_overtime: self.state.in_overtime,
        });
        self.command_world(WorldCommand::FreezePlayers(self.roster.ids()));
        self.emit_snapshot();
    }
}
