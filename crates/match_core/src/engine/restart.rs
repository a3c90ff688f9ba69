//! Restart Positioner
//!
//! Computes where the ball and players go for a dead-ball restart and hands
//! back a `RestartDirective`. It reads a roster copy and the static geometry;
//! it never touches match state.
//!
//! - Kickoff: full-roster placement from a mirrored role template, kicker just
//!   behind the ball, every defending player outside the ten-yard radius.
//! - Throw-in / corner / goal kick: ball placement only; players are frozen
//!   where they stand.

use serde::{Deserialize, Serialize};

use super::boundary::FieldGeometry;
use super::config::RestartConfig;
use super::roster::PlayerSlot;
use super::signals::{ApplyReport, WorldPort};
use super::types::{horizontal_distance, FieldSide, PlayerId, PlayerRole, RestartKind, TeamId, Vec3};

/// Per-player behaviour hint for the AI/roster collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartHint {
    TakeKickoff,
    SupportKickoff,
    HoldShape,
    KeepGoal,
    TakeThrowIn,
    TakeCorner,
    TakeGoalKick,
    Wait,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPlacement {
    pub player_id: PlayerId,
    /// `None` freezes the player where it stands
    pub target: Option<Vec3>,
    pub freeze: bool,
    pub hint: RestartHint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartDirective {
    pub kind: RestartKind,
    /// Team taking the restart
    pub team: TeamId,
    pub ball_position: Vec3,
    pub ball_velocity: Vec3,
    pub placements: Vec<PlayerPlacement>,
}

impl RestartDirective {
    pub fn placement(&self, id: PlayerId) -> Option<&PlayerPlacement> {
        self.placements.iter().find(|p| p.player_id == id)
    }

    /// Execute against a world collaborator. A player the world cannot place
    /// is skipped; the rest of the directive still runs.
    pub fn apply<W: WorldPort + ?Sized>(&self, world: &mut W) -> ApplyReport {
        let mut report = ApplyReport::default();
        if let Err(err) = world.teleport_ball(self.ball_position, self.ball_velocity) {
            log::warn!("Ball respawn for {} failed: {}", self.kind, err);
        }
        for placement in &self.placements {
            match world.place_player(placement) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    log::warn!("Skipping placement of {}: {}", placement.player_id, err);
                    report.skipped.push(placement.player_id);
                }
            }
        }
        report
    }
}

/// What to stage, with the data each restart needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RestartRequest {
    Kickoff { team: TeamId },
    ThrowIn { team: TeamId, crossing: Vec3, side: FieldSide },
    CornerKick { team: TeamId, crossing: Vec3, side: FieldSide },
    GoalKick { team: TeamId, side: FieldSide },
}

impl RestartRequest {
    pub fn kind(&self) -> RestartKind {
        match self {
            RestartRequest::Kickoff { .. } => RestartKind::Kickoff,
            RestartRequest::ThrowIn { .. } => RestartKind::ThrowIn,
            RestartRequest::CornerKick { .. } => RestartKind::CornerKick,
            RestartRequest::GoalKick { .. } => RestartKind::GoalKick,
        }
    }

    pub fn team(&self) -> TeamId {
        match *self {
            RestartRequest::Kickoff { team }
            | RestartRequest::ThrowIn { team, .. }
            | RestartRequest::CornerKick { team, .. }
            | RestartRequest::GoalKick { team, .. } => team,
        }
    }
}

const OUTFIELD_ROLES: [PlayerRole; 3] = [
    PlayerRole::Defender,
    PlayerRole::Midfielder,
    PlayerRole::Attacker,
];

/// Central player preference, most central first.
const CENTRAL_PREFERENCE: [PlayerRole; 3] = [
    PlayerRole::Attacker,
    PlayerRole::Midfielder,
    PlayerRole::Defender,
];

/// Lowest-id player of `team` with the first matching role in `preference`.
fn pick_by_role(players: &[PlayerSlot], team: TeamId, preference: &[PlayerRole]) -> Option<PlayerId> {
    preference.iter().find_map(|role| {
        players
            .iter()
            .filter(|p| p.team == team && p.role == *role)
            .map(|p| p.id)
            .min()
    })
}

/// Player who takes the kickoff for `team`. Falls back to the goalkeeper
/// only when the team has nobody else.
pub fn designated_kicker(players: &[PlayerSlot], team: TeamId) -> Option<PlayerId> {
    pick_by_role(players, team, &CENTRAL_PREFERENCE)
        .or_else(|| pick_by_role(players, team, &[PlayerRole::Goalkeeper]))
}

pub struct RestartPositioner<'a> {
    config: &'a RestartConfig,
    field: &'a FieldGeometry,
}

impl<'a> RestartPositioner<'a> {
    pub fn new(config: &'a RestartConfig, field: &'a FieldGeometry) -> Self {
        Self { config, field }
    }

    pub fn position(&self, request: &RestartRequest, players: &[PlayerSlot]) -> RestartDirective {
        match *request {
            RestartRequest::Kickoff { team } => self.kickoff(team, players),
            RestartRequest::ThrowIn { team, crossing, side } => self.lightweight(
                RestartKind::ThrowIn,
                team,
                self.throw_in_spot(&crossing, side),
                players,
                pick_by_role(
                    players,
                    team,
                    &[PlayerRole::Defender, PlayerRole::Midfielder, PlayerRole::Attacker],
                ),
                RestartHint::TakeThrowIn,
            ),
            RestartRequest::CornerKick { team, crossing, side } => self.lightweight(
                RestartKind::CornerKick,
                team,
                self.corner_spot(&crossing, side),
                players,
                pick_by_role(
                    players,
                    team,
                    &[PlayerRole::Midfielder, PlayerRole::Attacker, PlayerRole::Defender],
                ),
                RestartHint::TakeCorner,
            ),
            RestartRequest::GoalKick { team, side } => self.lightweight(
                RestartKind::GoalKick,
                team,
                self.goal_kick_spot(side),
                players,
                pick_by_role(players, team, &[PlayerRole::Goalkeeper, PlayerRole::Defender]),
                RestartHint::TakeGoalKick,
            ),
        }
    }

    /// Ball just inside the sideline at the crossing point, kept away from the
    /// goal lines.
    pub fn throw_in_spot(&self, crossing: &Vec3, side: FieldSide) -> Vec3 {
        let f = self.field;
        let margin = self.config.throw_in_length_margin;
        let x = clamp_or_mid(crossing.x, f.min_x + margin, f.max_x - margin);
        let z = f.sideline_z(side) - side.outward_sign() * self.config.throw_in_inset;
        Vec3::new(x, self.config.ball_spawn_height, z)
    }

    /// Corner arc on the goal line `side`, at the touchline nearer the crossing.
    pub fn corner_spot(&self, crossing: &Vec3, side: FieldSide) -> Vec3 {
        let f = self.field;
        let inset = self.config.corner_inset;
        let touchline = f.nearer_sideline(crossing.z);
        let x = f.goal_line_x(side) - side.outward_sign() * inset;
        let z = f.sideline_z(touchline) - touchline.outward_sign() * inset;
        Vec3::new(x, self.config.ball_spawn_height, z)
    }

    /// Goal area in front of the goal line on `side`.
    pub fn goal_kick_spot(&self, side: FieldSide) -> Vec3 {
        let f = self.field;
        let x = f.goal_line_x(side) - side.outward_sign() * self.config.goal_kick_offset;
        Vec3::new(x, self.config.ball_spawn_height, f.center.z)
    }

    fn lightweight(
        &self,
        kind: RestartKind,
        team: TeamId,
        ball_position: Vec3,
        players: &[PlayerSlot],
        taker: Option<PlayerId>,
        taker_hint: RestartHint,
    ) -> RestartDirective {
        let placements = players
            .iter()
            .map(|p| PlayerPlacement {
                player_id: p.id,
                target: None,
                freeze: true,
                hint: if Some(p.id) == taker {
                    taker_hint
                } else {
                    RestartHint::Wait
                },
            })
            .collect();
        RestartDirective {
            kind,
            team,
            ball_position,
            ball_velocity: Vec3::zeros(),
            placements,
        }
    }

    fn kickoff(&self, team: TeamId, players: &[PlayerSlot]) -> RestartDirective {
        let f = self.field;
        let cfg = self.config;
        let height = cfg.player_spawn_height;
        let ball_position = Vec3::new(f.center.x, cfg.ball_spawn_height, f.center.z);

        let kicker = designated_kicker(players, team);
        // Defending goalkeeper stays in goal even if alone
        let blocker = pick_by_role(players, team.opponent(), &CENTRAL_PREFERENCE);

        let mut placements = Vec::with_capacity(players.len());

        for side_team in TeamId::ALL {
            let sign = f.attack_sign(side_team);
            let kicking = side_team == team;
            let special = if kicking { kicker } else { blocker };

            if let Some(id) = special {
                let depth = if kicking { cfg.kicker_offset } else { cfg.ten_yard_radius };
                placements.push(PlayerPlacement {
                    player_id: id,
                    target: Some(Vec3::new(f.center.x - sign * depth, height, f.center.z)),
                    freeze: true,
                    hint: if kicking {
                        RestartHint::TakeKickoff
                    } else {
                        RestartHint::HoldShape
                    },
                });
            }

            for role in std::iter::once(PlayerRole::Goalkeeper).chain(OUTFIELD_ROLES) {
                let members: Vec<PlayerId> = players
                    .iter()
                    .filter(|p| p.team == side_team && p.role == role && Some(p.id) != special)
                    .map(|p| p.id)
                    .collect();
                let x = self.role_x(side_team, role);
                let count = members.len();
                for (i, id) in members.into_iter().enumerate() {
                    let mut target = Vec3::new(x, height, self.lateral_z(i, count));
                    if !kicking {
                        target = self.clear_of_ball(target, sign);
                    }
                    let hint = match (role, kicking) {
                        (PlayerRole::Goalkeeper, _) => RestartHint::KeepGoal,
                        (_, true) => RestartHint::SupportKickoff,
                        (_, false) => RestartHint::HoldShape,
                    };
                    placements.push(PlayerPlacement {
                        player_id: id,
                        target: Some(target),
                        freeze: true,
                        hint,
                    });
                }
            }
        }

        placements.sort_by_key(|p| p.player_id);
        RestartDirective {
            kind: RestartKind::Kickoff,
            team,
            ball_position,
            ball_velocity: Vec3::zeros(),
            placements,
        }
    }

    /// Template x for a role, mirrored by the team's attacking direction.
    fn role_x(&self, team: TeamId, role: PlayerRole) -> f32 {
        let f = self.field;
        let cfg = self.config;
        let sign = f.attack_sign(team);
        let depth = match role {
            PlayerRole::Goalkeeper => {
                let line = f.goal_line_x(f.goal_of(team).side);
                return line + sign * cfg.goalkeeper_inset;
            }
            PlayerRole::Defender => cfg.defender_depth,
            PlayerRole::Midfielder => cfg.midfielder_depth,
            PlayerRole::Attacker => cfg.attacker_depth,
        };
        f.center.x - sign * depth * f.half_length()
    }

    /// Spread `count` players sharing a role around the centre line.
    fn lateral_z(&self, index: usize, count: usize) -> f32 {
        let f = self.field;
        let offset = index as f32 - (count.saturating_sub(1)) as f32 / 2.0;
        clamp_or_mid(f.center.z + offset * self.config.lateral_spacing, f.min_z + 1.0, f.max_z - 1.0)
    }

    /// Push a defending player out to the ten-yard radius, staying in its own
    /// half (`sign` is the defending team's attack sign).
    fn clear_of_ball(&self, target: Vec3, sign: f32) -> Vec3 {
        let center = self.field.center;
        let radius = self.config.ten_yard_radius;
        let distance = horizontal_distance(&target, &center);
        if distance >= radius {
            return target;
        }
        let (dx, dz) = (target.x - center.x, target.z - center.z);
        let (dir_x, dir_z) = if distance < 1e-3 || dx * sign > 0.0 {
            (-sign, 0.0)
        } else {
            (dx / distance, dz / distance)
        };
        Vec3::new(center.x + dir_x * radius, target.y, center.z + dir_z * radius)
    }
}

/// `f32::clamp` that settles on the midpoint when `lo > hi` instead of panicking.
fn clamp_or_mid(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        value.clamp(lo, hi)
    }
}
