//! World reports: touches, raw ball positions and boundary events.
//!
//! Reports are only acted on during live play. Anything arriving in another
//! phase (a second goal event during the celebration, an out-of-bounds report
//! during a countdown) is stale: logged at debug and dropped.

use super::{InputOutcome, MatchEngine, ScheduledTask};
use crate::engine::boundary::{BoundaryCheck, BoundaryEvent, BoundaryEventKind, FieldGeometry};
use crate::engine::restart::RestartRequest;
use crate::engine::signals::Signal;
use crate::engine::state::{LastTouch, MatchStatus};
use crate::engine::types::{PlayerId, RestartKind, TeamId, Vec3};

impl MatchEngine {
    pub fn report_touch(&mut self, player: PlayerId, attached: bool) -> InputOutcome {
        if !self.state.status.accepts_play_events() {
            log::debug!("Dropping touch by {} while {}", player, self.state.status);
            return InputOutcome::Ignored;
        }
        let Some(team) = self.roster.team_of(player) else {
            log::debug!("Dropping touch by unknown player {}", player);
            return InputOutcome::Ignored;
        };

        self.state.last_touch = Some(LastTouch {
            player: Some(player),
            team,
        });
        if attached {
            self.state.attached_player = Some(player);
        } else if self.state.attached_player == Some(player) {
            self.state.attached_player = None;
        }
        InputOutcome::Applied
    }

    /// Classify a raw ball position and act on it if play must stop.
    pub fn report_ball_position(&mut self, position: Vec3) -> InputOutcome {
        if !self.state.status.accepts_play_events() {
            return InputOutcome::Ignored;
        }
        let check = self.config.field.classify(&position);
        match BoundaryEvent::from_check(check, position, self.state.last_touch_team()) {
            Some(event) => {
                self.apply_boundary(event);
                InputOutcome::Applied
            }
            None => InputOutcome::Ignored,
        }
    }

    pub fn report_boundary_event(&mut self, event: BoundaryEvent) -> InputOutcome {
        if !self.state.status.accepts_play_events() {
            log::debug!(
                "Dropping stale {:?} event while {}",
                event.kind,
                self.state.status
            );
            return InputOutcome::Ignored;
        }
        if event.kind == BoundaryEventKind::Goal {
            let confirmed = matches!(
                self.config.field.classify(&event.position),
                BoundaryCheck::Goal { side, .. } if side == event.side
            );
            if !confirmed {
                log::debug!("Goal report at {:?} not confirmed by geometry", event.position);
                return InputOutcome::Ignored;
            }
        }
        self.apply_boundary(event);
        InputOutcome::Applied
    }

    fn apply_boundary(&mut self, event: BoundaryEvent) {
        let last_touch = event.last_touch_team.or_else(|| self.state.last_touch_team());
        let field = &self.config.field;

        match event.kind {
            BoundaryEventKind::Goal => {
                let scoring_team = field.goal_on(event.side).scoring_team();
                self.score_goal(scoring_team);
            }
            BoundaryEventKind::SidelineOut => {
                let team = match FieldGeometry::sideline_restart_team(last_touch) {
                    Some(team) => team,
                    None => {
                        let team = self.random_team();
                        log::debug!("Throw-in with unknown last touch awarded to {}", team);
                        team
                    }
                };
                self.stage_restart(RestartRequest::ThrowIn {
                    team,
                    crossing: event.position,
                    side: event.side,
                });
            }
            BoundaryEventKind::GoalLineOut => {
                let request = match field.goal_line_restart(event.side, last_touch) {
                    (RestartKind::CornerKick, team) => RestartRequest::CornerKick {
                        team,
                        crossing: event.position,
                        side: event.side,
                    },
                    (_, team) => RestartRequest::GoalKick {
                        team,
                        side: event.side,
                    },
                };
                self.stage_restart(request);
            }
        }
    }

    fn score_goal(&mut self, scoring_team: TeamId) {
        let conceding = scoring_team.opponent();
        let touch = self.state.last_touch;
        let scorer = touch.and_then(|t| t.player.map(|player| (player, t.team)));
        let own_goal = touch.map_or(false, |t| t.team != scoring_team);

        self.state.score.increment(scoring_team);
        self.stats.record_goal(scoring_team);
        let update = self
            .momentum
            .record_goal(scoring_team, scorer, self.state.elapsed_seconds);

        // Conceding team kicks off next
        self.state.kickoff_team = Some(conceding);
        self.state.attached_player = None;
        self.state.last_touch = None;
        self.set_status(MatchStatus::GoalScored);

        log::info!(
            "Goal for {} ({}), score {}",
            scoring_team,
            if own_goal { "own goal" } else { "scored" },
            self.state.score
        );
        self.emit(Signal::GoalScored {
            team: scoring_team,
            scorer: scorer.map(|(player, _)| player),
            own_goal,
            score: self.state.score,
        });

        let rules = &self.config.rules;
        for celebration in update.celebrations(rules.team_streak_threshold, rules.player_streak_threshold) {
            self.emit(Signal::Momentum(celebration));
        }
        self.emit_snapshot();

        let task = if self.state.in_overtime && self.config.rules.golden_goal {
            ScheduledTask::FinishMatch
        } else {
            ScheduledTask::StageKickoff
        };
        let delay = self.config.restart.goal_celebration_seconds;
        self.pending_resume = Some(self.scheduler.schedule(delay, task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::MatchConfig;
    use crate::engine::machine::MatchInput;
    use crate::engine::types::FieldSide;
    use crate::engine::test_fixtures::{
        engine_with_players, goal_event, home_goal_position, kickoff_and_play, signals,
    };

    fn live_engine(seed: u64) -> MatchEngine {
        let mut engine = engine_with_players(MatchConfig::quick(), seed);
        engine.start_game().unwrap();
        kickoff_and_play(&mut engine);
        engine.drain_outputs();
        engine
    }

    #[test]
    fn test_events_dropped_outside_live_play() {
        let mut engine = engine_with_players(MatchConfig::quick(), 1);
        assert_eq!(engine.report_boundary_event(goal_event(FieldSide::Max)), InputOutcome::Ignored);
        assert_eq!(engine.report_touch(PlayerId(1), true), InputOutcome::Ignored);
        assert_eq!(engine.state().score.home, 0);
        assert!(engine.outputs().is_empty());
    }

    #[test]
    fn test_duplicate_goal_event_ignored() {
        let mut engine = live_engine(2);
        assert_eq!(engine.report_boundary_event(goal_event(FieldSide::Max)), InputOutcome::Applied);
        assert_eq!(engine.status(), MatchStatus::GoalScored);
        assert_eq!(engine.report_boundary_event(goal_event(FieldSide::Max)), InputOutcome::Ignored);
        assert_eq!(engine.state().score.home, 1);
        assert_eq!(engine.state().score.away, 0);
    }

    #[test]
    fn test_boundary_event_during_halftime_ignored() {
        let mut engine = live_engine(11);
        for _ in 0..400 {
            if engine.status() == MatchStatus::Halftime {
                break;
            }
            engine.tick();
        }
        assert_eq!(engine.status(), MatchStatus::Halftime);
        engine.drain_outputs();
        let before = engine.state().clone();
        let transitions = engine.transitions().len();

        let out = BoundaryEvent {
            kind: BoundaryEventKind::SidelineOut,
            side: FieldSide::Max,
            position: Vec3::new(0.0, 0.5, 33.0),
            last_touch_team: Some(TeamId::Home),
        };
        assert_eq!(engine.report_boundary_event(out), InputOutcome::Ignored);
        assert_eq!(engine.report_boundary_event(goal_event(FieldSide::Max)), InputOutcome::Ignored);
        assert_eq!(engine.report_ball_position(home_goal_position()), InputOutcome::Ignored);

        assert_eq!(engine.state(), &before);
        assert_eq!(engine.transitions().len(), transitions);
        assert!(engine.outputs().is_empty());
    }

    #[test]
    fn test_goal_and_goal_line_out_in_one_batch_transition_once() {
        let mut engine = live_engine(12);
        let transitions = engine.transitions().len();

        engine.submit(MatchInput::Boundary(goal_event(FieldSide::Max)));
        engine.submit(MatchInput::Boundary(BoundaryEvent {
            kind: BoundaryEventKind::GoalLineOut,
            side: FieldSide::Min,
            position: Vec3::new(-51.0, 0.5, 20.0),
            last_touch_team: Some(TeamId::Away),
        }));
        let outcomes = engine.process_inputs();

        assert_eq!(outcomes, vec![InputOutcome::Applied, InputOutcome::Ignored]);
        assert_eq!(engine.transitions().len(), transitions + 1);
        assert_eq!(
            engine.transitions().last().map(|(_, from, to)| (*from, *to)),
            Some((MatchStatus::Playing, MatchStatus::GoalScored))
        );
        assert_eq!(engine.state().score.home, 1);
        assert_eq!(engine.state().pending_restart, None);
    }

    #[test]
    fn test_goal_sets_conceding_kickoff() {
        let mut engine = live_engine(3);
        engine.report_touch(PlayerId(9), false);
        engine.report_ball_position(home_goal_position());

        assert_eq!(engine.state().score.away, 1);
        assert_eq!(engine.state().kickoff_team, Some(TeamId::Home));
        assert_eq!(engine.state().last_touch, None);

        kickoff_and_play(&mut engine);
        assert_eq!(engine.status(), MatchStatus::Playing);
        let kickoff = signals(&engine.drain_outputs())
            .into_iter()
            .find_map(|s| match s {
                Signal::RestartComplete { kind, team } => Some((kind, team)),
                _ => None,
            })
            .unwrap();
        assert_eq!(kickoff, (RestartKind::Kickoff, TeamId::Home));
    }

    #[test]
    fn test_own_goal_flagged() {
        let mut engine = live_engine(4);
        // Player 2 plays for the home side and puts it into the home goal
        engine.report_touch(PlayerId(2), false);
        engine.report_ball_position(home_goal_position());

        let goal = signals(&engine.drain_outputs())
            .into_iter()
            .find(|s| matches!(s, Signal::GoalScored { .. }))
            .unwrap();
        assert_eq!(
            goal,
            Signal::GoalScored {
                team: TeamId::Away,
                scorer: Some(PlayerId(2)),
                own_goal: true,
                score: crate::engine::types::Score::new(0, 1),
            }
        );
        assert_eq!(engine.momentum().player(PlayerId(2)).consecutive_goals, 0);
    }

    #[test]
    fn test_unconfirmed_goal_report_dropped() {
        let mut engine = live_engine(5);
        let mut event = goal_event(FieldSide::Max);
        event.position = Vec3::new(10.0, 1.0, 0.0);
        assert_eq!(engine.report_boundary_event(event), InputOutcome::Ignored);
        assert_eq!(engine.status(), MatchStatus::Playing);
    }

    #[test]
    fn test_sideline_out_awards_throw_in_to_other_team() {
        let mut engine = live_engine(6);
        engine.report_touch(PlayerId(7), false);
        let outcome = engine.report_ball_position(Vec3::new(12.0, 0.5, 33.0));

        assert_eq!(outcome, InputOutcome::Applied);
        assert_eq!(engine.status(), MatchStatus::Restarting);
        let pending = engine.state().pending_restart.unwrap();
        assert_eq!(pending.kind, RestartKind::ThrowIn);
        assert_eq!(pending.team, TeamId::Home);
        assert_eq!(engine.stats().current().throw_ins, 1);
    }

    #[test]
    fn test_goal_line_out_restarts() {
        let mut engine = live_engine(7);
        // Home defender last touched it over the home goal line: corner to away
        engine.report_touch(PlayerId(2), false);
        engine.report_ball_position(Vec3::new(-51.0, 0.5, 20.0));
        let pending = engine.state().pending_restart.unwrap();
        assert_eq!((pending.kind, pending.team), (RestartKind::CornerKick, TeamId::Away));

        kickoff_and_play(&mut engine);
        // Home attacker over the away goal line: goal kick to away
        engine.report_touch(PlayerId(5), false);
        engine.report_ball_position(Vec3::new(51.0, 0.5, -20.0));
        let pending = engine.state().pending_restart.unwrap();
        assert_eq!((pending.kind, pending.team), (RestartKind::GoalKick, TeamId::Away));
    }

    #[test]
    fn test_in_bounds_position_is_no_op() {
        let mut engine = live_engine(8);
        assert_eq!(engine.report_ball_position(Vec3::new(0.0, 0.5, 0.0)), InputOutcome::Ignored);
        assert_eq!(engine.status(), MatchStatus::Playing);
    }
}
