//! End-to-end match scenarios driven through the public engine surface.

use super::config::MatchConfig;
use super::machine::{EngineOutput, MatchEngine};
use super::signals::{Signal, WorldCommand};
use super::state::{MatchState, MatchStatus};
use super::test_fixtures::{engine_with_players, kickoff_and_play, score_for, signals, tick_n};
use super::types::{Score, TeamId, Vec3};
use crate::error::CommandRejection;

fn tick_until(engine: &mut MatchEngine, limit: usize, done: impl Fn(&MatchEngine) -> bool) {
    for _ in 0..limit {
        if done(engine) {
            return;
        }
        engine.tick();
    }
    assert!(done(engine), "condition not reached within {} ticks", limit);
}

fn started(config: MatchConfig, seed: u64) -> MatchEngine {
    let mut engine = engine_with_players(config, seed);
    engine.start_game().unwrap();
    kickoff_and_play(&mut engine);
    engine
}

fn play_to_halftime(engine: &mut MatchEngine) {
    tick_until(engine, 1_000, |e| e.status() == MatchStatus::Halftime);
}

fn play_second_half(engine: &mut MatchEngine) {
    engine.start_second_half().unwrap();
    kickoff_and_play(engine);
    tick_until(engine, 1_000, |e| e.status() != MatchStatus::Playing);
}

fn count_transitions(engine: &MatchEngine, from: MatchStatus, to: MatchStatus) -> usize {
    engine
        .transitions()
        .iter()
        .filter(|(_, f, t)| *f == from && *t == to)
        .count()
}

#[test]
fn scenario_tied_regulation_goes_to_overtime_then_finishes() {
    let mut engine = started(MatchConfig::quick(), 21);
    score_for(&mut engine, TeamId::Home);
    score_for(&mut engine, TeamId::Away);
    play_to_halftime(&mut engine);

    engine.start_second_half().unwrap();
    kickoff_and_play(&mut engine);
    score_for(&mut engine, TeamId::Home);
    score_for(&mut engine, TeamId::Away);
    tick_until(&mut engine, 1_000, |e| e.status() != MatchStatus::Playing);

    // 2-2: overtime, not full time
    assert_eq!(engine.state().score, Score::new(2, 2));
    assert!(engine.state().in_overtime);
    assert_ne!(engine.status(), MatchStatus::Finished);
    assert_eq!(count_transitions(&engine, MatchStatus::Playing, MatchStatus::Overtime), 1);
    assert_eq!(engine.state().clock.half_time_remaining, 60);

    kickoff_and_play(&mut engine);
    assert_eq!(engine.status(), MatchStatus::Overtime);
    score_for(&mut engine, TeamId::Home);
    assert_eq!(engine.status(), MatchStatus::Overtime);
    engine.drain_outputs();

    tick_until(&mut engine, 500, |e| e.status() == MatchStatus::Finished);
    let outputs = signals(&engine.drain_outputs());
    assert!(outputs.contains(&Signal::GameOver {
        winner: Some(TeamId::Home),
        score: Score::new(3, 2),
        decided_in_overtime: true,
    }));

    // No second overtime, nothing else happens
    tick_n(&mut engine, 200);
    assert_eq!(engine.status(), MatchStatus::Finished);
    assert_eq!(count_transitions(&engine, MatchStatus::Playing, MatchStatus::Overtime), 1);
    assert!(!engine.has_pending_resume());
}

#[test]
fn scenario_decided_regulation_finishes_without_overtime() {
    let mut engine = started(MatchConfig::quick(), 22);
    score_for(&mut engine, TeamId::Away);
    play_to_halftime(&mut engine);
    play_second_half(&mut engine);

    assert_eq!(engine.status(), MatchStatus::Finished);
    assert!(!engine.state().in_overtime);
    let game_over = signals(&engine.drain_outputs())
        .into_iter()
        .find(|s| matches!(s, Signal::GameOver { .. }))
        .unwrap();
    assert_eq!(
        game_over,
        Signal::GameOver {
            winner: Some(TeamId::Away),
            score: Score::new(0, 1),
            decided_in_overtime: false,
        }
    );
}

#[test]
fn scenario_golden_goal_ends_overtime() {
    let mut config = MatchConfig::quick();
    config.rules.golden_goal = true;
    let mut engine = started(config, 23);
    play_to_halftime(&mut engine);
    play_second_half(&mut engine);
    kickoff_and_play(&mut engine);
    assert_eq!(engine.status(), MatchStatus::Overtime);

    engine.report_ball_position(Vec3::new(-51.0, 1.0, 0.0));
    assert_eq!(engine.status(), MatchStatus::GoalScored);
    tick_until(&mut engine, 10, |e| e.status() == MatchStatus::Finished);
    assert_eq!(engine.state().score, Score::new(0, 1));
    assert!(engine.state().clock.half_time_remaining > 0);
}

#[test]
fn scenario_half_ends_exactly_after_announced_stoppage() {
    for seed in [1, 2, 3, 4, 5] {
        let mut engine = started(MatchConfig::standard(), seed);
        engine.drain_outputs();

        let mut announced = None;
        let mut last_live_remaining = None;
        for _ in 0..1_000 {
            engine.tick();
            for signal in signals(&engine.drain_outputs()) {
                if let Signal::StoppageTimeNotification { seconds, .. } = signal {
                    assert!(announced.is_none(), "stoppage announced twice");
                    announced = Some(seconds);
                }
            }
            if engine.status() == MatchStatus::Halftime {
                break;
            }
            last_live_remaining = Some(engine.state().clock.half_time_remaining);
        }

        let stoppage = announced.unwrap();
        assert!((15..=59).contains(&stoppage));
        assert_eq!(engine.status(), MatchStatus::Halftime);
        assert_eq!(engine.state().clock.half_time_remaining, -stoppage);
        assert_eq!(last_live_remaining, Some(-stoppage + 1));
    }
}

#[test]
fn scenario_goal_kickoff_and_momentum() {
    let mut engine = started(MatchConfig::quick(), 24);
    engine.drain_outputs();

    score_for(&mut engine, TeamId::Home);
    assert_eq!(engine.state().kickoff_team, Some(TeamId::Away));
    score_for(&mut engine, TeamId::Home);
    assert_eq!(engine.momentum().team(TeamId::Home).consecutive_goals, 2);
    let celebrations: Vec<_> = signals(&engine.drain_outputs())
        .into_iter()
        .filter_map(|s| match s {
            Signal::Momentum(c) => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(celebrations.len(), 1);
    assert_eq!(celebrations[0].team, TeamId::Home);
    assert_eq!(celebrations[0].streak, 2);

    score_for(&mut engine, TeamId::Away);
    assert_eq!(engine.state().kickoff_team, Some(TeamId::Home));
    assert_eq!(engine.momentum().team(TeamId::Home).consecutive_goals, 0);
    assert_eq!(engine.momentum().team(TeamId::Away).consecutive_goals, 1);
}

#[test]
fn scenario_goal_mouth_height_filter() {
    let mut engine = started(MatchConfig::quick(), 25);

    let below = engine.report_ball_position(Vec3::new(-51.0, -1.0, 0.0));
    assert_eq!(below, super::machine::InputOutcome::Ignored);
    assert_eq!(engine.status(), MatchStatus::Playing);
    assert_eq!(engine.state().score, Score::default());

    engine.report_ball_position(Vec3::new(-51.0, 1.0, 0.0));
    assert_eq!(engine.state().score, Score::new(0, 1));
}

#[test]
fn scenario_reset_only_after_full_time() {
    let mut engine = started(MatchConfig::quick(), 26);
    let before = engine.state().clone();
    assert!(matches!(
        engine.reset_game(),
        Err(CommandRejection::WrongPhase { .. })
    ));
    assert_eq!(engine.state(), &before);

    score_for(&mut engine, TeamId::Home);
    engine.apply_effect(super::types::PlayerId(3), super::roster::EffectKind::Enlarge, 500).unwrap();
    play_to_halftime(&mut engine);
    play_second_half(&mut engine);
    assert_eq!(engine.status(), MatchStatus::Finished);
    engine.drain_outputs();

    let match_id = engine.state().match_id;
    engine.reset_game().unwrap();
    assert_eq!(
        engine.state(),
        &MatchState::new(match_id, engine.config().clock.half_seconds)
    );
    assert!(engine.roster().is_empty());
    assert_eq!(engine.momentum().team(TeamId::Home).consecutive_goals, 0);
    assert!(!engine.has_pending_resume());
    assert!(engine
        .drain_outputs()
        .contains(&EngineOutput::World(WorldCommand::ResetWorld)));

    // Nothing left over fires after the reset
    tick_n(&mut engine, 600);
    assert_eq!(engine.status(), MatchStatus::Waiting);
    let leftovers: Vec<_> = signals(&engine.drain_outputs())
        .into_iter()
        .filter(|s| !matches!(s, Signal::Snapshot(_)))
        .collect();
    assert!(leftovers.is_empty(), "unexpected signals: {:?}", leftovers);
}
