//! Shared match types: teams, players, roles, field sides, score.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// World-space position. x = field length, y = height, z = field width.
pub type Vec3 = Vector3<f32>;

/// Distance on the ground plane (x/z), ignoring height.
pub fn horizontal_distance(a: &Vec3, b: &Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// The two sides of a match. Presentation may label them red/blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamId {
    Home,
    Away,
}

impl TeamId {
    pub const ALL: [TeamId; 2] = [TeamId::Home, TeamId::Away];

    pub fn opponent(self) -> Self {
        match self {
            TeamId::Home => TeamId::Away,
            TeamId::Away => TeamId::Home,
        }
    }

    /// Colour label used by the arena presentation.
    pub fn label(self) -> &'static str {
        match self {
            TeamId::Home => "red",
            TeamId::Away => "blue",
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Formation role. Declaration order is goal-to-front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Goalkeeper,
    Defender,
    Midfielder,
    Attacker,
}

/// Which end of an axis a boundary or goal sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSide {
    Min,
    Max,
}

impl FieldSide {
    /// Unit direction pointing from the field into this side (-1 or +1).
    pub fn outward_sign(self) -> f32 {
        match self {
            FieldSide::Min => -1.0,
            FieldSide::Max => 1.0,
        }
    }
}

/// Dead-ball restart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartKind {
    Kickoff,
    ThrowIn,
    CornerKick,
    GoalKick,
}

impl fmt::Display for RestartKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RestartKind::Kickoff => "kickoff",
            RestartKind::ThrowIn => "throw-in",
            RestartKind::CornerKick => "corner kick",
            RestartKind::GoalKick => "goal kick",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}

impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn get(&self, team: TeamId) -> u8 {
        match team {
            TeamId::Home => self.home,
            TeamId::Away => self.away,
        }
    }

    pub fn increment(&mut self, team: TeamId) {
        match team {
            TeamId::Home => self.home = self.home.saturating_add(1),
            TeamId::Away => self.away = self.away.saturating_add(1),
        }
    }

    pub fn is_tied(&self) -> bool {
        self.home == self.away
    }

    /// Team currently ahead, `None` when level.
    pub fn leader(&self) -> Option<TeamId> {
        if self.home > self.away {
            Some(TeamId::Home)
        } else if self.away > self.home {
            Some(TeamId::Away)
        } else {
            None
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}
