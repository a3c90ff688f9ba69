//! Shared test helpers for engine tests.

use std::collections::{BTreeMap, BTreeSet};

use super::boundary::{BoundaryEvent, BoundaryEventKind};
use super::config::MatchConfig;
use super::machine::{EngineOutput, MatchEngine};
use super::restart::PlayerPlacement;
use super::roster::PlayerSlot;
use super::signals::{Signal, WorldPort};
use super::types::{FieldSide, PlayerId, PlayerRole, TeamId, Vec3};
use crate::error::PortError;

pub fn slot(id: u32, team: TeamId, role: PlayerRole) -> PlayerSlot {
    PlayerSlot {
        id: PlayerId(id),
        team,
        role,
        is_ai: false,
    }
}

/// Home 1-5, away 6-10; per side: keeper, defender, two midfielders, attacker.
pub fn five_a_side() -> Vec<PlayerSlot> {
    let roles = [
        PlayerRole::Goalkeeper,
        PlayerRole::Defender,
        PlayerRole::Midfielder,
        PlayerRole::Midfielder,
        PlayerRole::Attacker,
    ];
    let mut players = Vec::with_capacity(10);
    for (offset, team) in [(0, TeamId::Home), (5, TeamId::Away)] {
        for (i, role) in roles.iter().enumerate() {
            players.push(slot(offset + i as u32 + 1, team, *role));
        }
    }
    players
}

/// Waiting engine with `five_a_side` on the roster.
pub fn engine_with_players(config: MatchConfig, seed: u64) -> MatchEngine {
    let mut engine = MatchEngine::with_seed(config, seed).unwrap();
    for player in five_a_side() {
        engine
            .add_player(player.id, &format!("Player {}", player.id.0), player.team, player.role, player.is_ai)
            .unwrap();
    }
    engine
}

pub fn tick_n(engine: &mut MatchEngine, n: usize) {
    for _ in 0..n {
        engine.tick();
    }
}

/// Tick through any celebration and countdown until play is live again.
pub fn kickoff_and_play(engine: &mut MatchEngine) {
    for _ in 0..60 {
        if !engine.status().is_dead_ball() {
            return;
        }
        engine.tick();
    }
    panic!("play did not resume, still {}", engine.status());
}

pub fn signals(outputs: &[EngineOutput]) -> Vec<Signal> {
    outputs
        .iter()
        .filter_map(|output| match output {
            EngineOutput::Signal(signal) => Some(signal.clone()),
            EngineOutput::World(_) => None,
        })
        .collect()
}

/// Inside the goal defended by home (away scores).
pub fn home_goal_position() -> Vec3 {
    Vec3::new(-51.0, 1.0, 0.0)
}

/// Inside the goal defended by away (home scores).
pub fn away_goal_position() -> Vec3 {
    Vec3::new(51.0, 1.0, 0.0)
}

pub fn goal_event(side: FieldSide) -> BoundaryEvent {
    let position = match side {
        FieldSide::Min => home_goal_position(),
        FieldSide::Max => away_goal_position(),
    };
    BoundaryEvent {
        kind: BoundaryEventKind::Goal,
        side,
        position,
        last_touch_team: None,
    }
}

/// Score one goal for `team` and play through to the next live kickoff.
pub fn score_for(engine: &mut MatchEngine, team: TeamId) {
    let position = match team {
        TeamId::Home => away_goal_position(),
        TeamId::Away => home_goal_position(),
    };
    engine.report_ball_position(position);
    kickoff_and_play(engine);
}

/// In-memory world that records what it was told.
#[derive(Debug, Default)]
pub struct RecordingWorld {
    pub ball: Option<Vec3>,
    pub positions: BTreeMap<PlayerId, Vec3>,
    pub spawned: BTreeSet<PlayerId>,
    pub frozen: BTreeSet<PlayerId>,
    pub resets: usize,
}

impl RecordingWorld {
    pub fn with_players(ids: &[u32]) -> Self {
        Self {
            spawned: ids.iter().map(|id| PlayerId(*id)).collect(),
            ..Self::default()
        }
    }
}

impl WorldPort for RecordingWorld {
    fn teleport_ball(&mut self, position: Vec3, _velocity: Vec3) -> Result<(), PortError> {
        self.ball = Some(position);
        Ok(())
    }

    fn place_player(&mut self, placement: &PlayerPlacement) -> Result<(), PortError> {
        if !self.spawned.contains(&placement.player_id) {
            return Err(PortError::PlayerMissing(placement.player_id));
        }
        if let Some(target) = placement.target {
            self.positions.insert(placement.player_id, target);
        }
        if placement.freeze {
            self.frozen.insert(placement.player_id);
        }
        Ok(())
    }

    fn set_frozen(&mut self, id: PlayerId, frozen: bool) -> Result<(), PortError> {
        if !self.spawned.contains(&id) {
            return Err(PortError::PlayerMissing(id));
        }
        if frozen {
            self.frozen.insert(id);
        } else {
            self.frozen.remove(&id);
        }
        Ok(())
    }

    fn reset_world(&mut self) -> Result<(), PortError> {
        self.resets += 1;
        self.ball = None;
        self.positions.clear();
        self.frozen.clear();
        Ok(())
    }
}
