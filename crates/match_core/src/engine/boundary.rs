//! Boundary Classifier
//!
//! Pure geometry over a ball position and the static field layout.
//!
//! ## Evaluation Order (Fixed)
//! 1. Goal mouth (a ball inside a goal volume's footprint is never out)
//! 2. Width (z) bounds -> sideline out
//! 3. Length (x) bounds -> goal-line out
//! 4. Height (y) ceiling -> sideline out on the nearer touchline
//!
//! The order makes the result total and mutually exclusive: every position
//! maps to exactly one `BoundaryCheck`.

use serde::{Deserialize, Serialize};

use super::types::{horizontal_distance, FieldSide, RestartKind, TeamId, Vec3};

/// Axis-aligned goal volume behind (or straddling) one goal line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalVolume {
    /// Team defending this goal
    pub defended_by: TeamId,
    /// End of the length axis this goal sits on
    pub side: FieldSide,
    pub min: Vec3,
    pub max: Vec3,
    /// Centre of the goal line, used by the long-range jitter filter
    pub line_center: Vec3,
}

impl GoalVolume {
    /// Inside the box on the ground plane (x/z), any height.
    pub fn footprint_contains(&self, pos: &Vec3) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.z >= self.min.z && pos.z <= self.max.z
    }

    pub fn contains(&self, pos: &Vec3) -> bool {
        self.footprint_contains(pos) && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Team awarded the goal when the ball ends up in here.
    pub fn scoring_team(&self) -> TeamId {
        self.defended_by.opponent()
    }
}

/// Result of classifying one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryCheck {
    InBounds,
    Goal { scoring_team: TeamId, side: FieldSide },
    SidelineOut { side: FieldSide },
    GoalLineOut { side: FieldSide },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryEventKind {
    Goal,
    SidelineOut,
    GoalLineOut,
}

/// Boundary crossing raised by the world collaborator; consumed once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEvent {
    pub kind: BoundaryEventKind,
    pub side: FieldSide,
    pub position: Vec3,
    pub last_touch_team: Option<TeamId>,
}

impl BoundaryEvent {
    /// Build the event for a stopping classification, `None` for in-bounds.
    pub fn from_check(check: BoundaryCheck, position: Vec3, last_touch_team: Option<TeamId>) -> Option<Self> {
        let (kind, side) = match check {
            BoundaryCheck::InBounds => return None,
            BoundaryCheck::Goal { side, .. } => (BoundaryEventKind::Goal, side),
            BoundaryCheck::SidelineOut { side } => (BoundaryEventKind::SidelineOut, side),
            BoundaryCheck::GoalLineOut { side } => (BoundaryEventKind::GoalLineOut, side),
        };
        Some(Self {
            kind,
            side,
            position,
            last_touch_team,
        })
    }
}

/// Static field layout. x = length, y = height, z = width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    /// Ceiling; above it the ball is out (no dedicated vertical restart)
    pub max_y: f32,
    /// Centre spot
    pub center: Vec3,
    /// One goal per end
    pub goals: [GoalVolume; 2],
    /// Maximum ground distance from a goal line centre for a goal to count
    pub goal_distance_threshold: f32,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            min_x: -50.0,
            max_x: 50.0,
            min_z: -32.0,
            max_z: 32.0,
            max_y: 30.0,
            center: Vec3::new(0.0, 0.0, 0.0),
            goals: [
                GoalVolume {
                    defended_by: TeamId::Home,
                    side: FieldSide::Min,
                    min: Vec3::new(-53.0, 0.0, -5.0),
                    max: Vec3::new(-49.5, 4.0, 5.0),
                    line_center: Vec3::new(-50.0, 0.0, 0.0),
                },
                // Away mouth sits slightly deeper
                GoalVolume {
                    defended_by: TeamId::Away,
                    side: FieldSide::Max,
                    min: Vec3::new(49.5, 0.0, -5.0),
                    max: Vec3::new(53.5, 4.0, 5.0),
                    line_center: Vec3::new(50.0, 0.0, 0.0),
                },
            ],
            goal_distance_threshold: 10.0,
        }
    }
}

impl FieldGeometry {
    /// Classify a ball position. Pure; safe to call every tick.
    pub fn classify(&self, pos: &Vec3) -> BoundaryCheck {
        // 1. Goal mouth
        for goal in &self.goals {
            if goal.footprint_contains(pos) && pos.y <= goal.max.y {
                let near_line =
                    horizontal_distance(pos, &goal.line_center) < self.goal_distance_threshold;
                if pos.y >= 0.0 && near_line && goal.contains(pos) {
                    return BoundaryCheck::Goal {
                        scoring_team: goal.scoring_team(),
                        side: goal.side,
                    };
                }
                // Underground artifact or jitter inside the mouth
                return BoundaryCheck::InBounds;
            }
        }

        // 2. Width -> sideline
        if pos.z < self.min_z {
            return BoundaryCheck::SidelineOut { side: FieldSide::Min };
        }
        if pos.z > self.max_z {
            return BoundaryCheck::SidelineOut { side: FieldSide::Max };
        }

        // 3. Length -> goal line
        if pos.x < self.min_x {
            return BoundaryCheck::GoalLineOut { side: FieldSide::Min };
        }
        if pos.x > self.max_x {
            return BoundaryCheck::GoalLineOut { side: FieldSide::Max };
        }

        // 4. Height -> nearer sideline
        if pos.y > self.max_y {
            return BoundaryCheck::SidelineOut {
                side: self.nearer_sideline(pos.z),
            };
        }

        BoundaryCheck::InBounds
    }

    pub fn nearer_sideline(&self, z: f32) -> FieldSide {
        if z < self.center.z {
            FieldSide::Min
        } else {
            FieldSide::Max
        }
    }

    pub fn goal_on(&self, side: FieldSide) -> &GoalVolume {
        // validate() guarantees one goal per side
        if self.goals[0].side == side {
            &self.goals[0]
        } else {
            &self.goals[1]
        }
    }

    pub fn goal_of(&self, team: TeamId) -> &GoalVolume {
        if self.goals[0].defended_by == team {
            &self.goals[0]
        } else {
            &self.goals[1]
        }
    }

    /// Team defending the goal line on `side`.
    pub fn defending_team(&self, side: FieldSide) -> TeamId {
        self.goal_on(side).defended_by
    }

    /// +1 when `team` attacks towards +x, -1 otherwise.
    pub fn attack_sign(&self, team: TeamId) -> f32 {
        -self.goal_of(team).side.outward_sign()
    }

    /// x of the goal line on `side`.
    pub fn goal_line_x(&self, side: FieldSide) -> f32 {
        match side {
            FieldSide::Min => self.min_x,
            FieldSide::Max => self.max_x,
        }
    }

    /// z of the touchline on `side`.
    pub fn sideline_z(&self, side: FieldSide) -> f32 {
        match side {
            FieldSide::Min => self.min_z,
            FieldSide::Max => self.max_z,
        }
    }

    pub fn half_length(&self) -> f32 {
        (self.max_x - self.min_x) / 2.0
    }

    /// Restart for a ball over the goal line on `side`.
    ///
    /// Defender touched it last -> corner to the attackers; attacker or
    /// unknown -> goal kick to the defenders.
    pub fn goal_line_restart(&self, side: FieldSide, last_touch: Option<TeamId>) -> (RestartKind, TeamId) {
        let defending = self.defending_team(side);
        if last_touch == Some(defending) {
            (RestartKind::CornerKick, defending.opponent())
        } else {
            (RestartKind::GoalKick, defending)
        }
    }

    /// Team awarded a throw-in: the side that did not touch it last.
    pub fn sideline_restart_team(last_touch: Option<TeamId>) -> Option<TeamId> {
        last_touch.map(TeamId::opponent)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_x >= self.max_x || self.min_z >= self.max_z {
            return Err("field bounds must have min < max on x and z".to_string());
        }
        // Kickoff spreads players one unit inside each sideline
        if self.max_z - self.min_z <= 2.0 {
            return Err(format!(
                "field must be wider than 2.0, got {}",
                self.max_z - self.min_z
            ));
        }
        if self.max_y <= 0.0 {
            return Err(format!("max_y must be positive, got {}", self.max_y));
        }
        if self.goals[0].side == self.goals[1].side {
            return Err("goals must sit on opposite ends".to_string());
        }
        if self.goals[0].defended_by == self.goals[1].defended_by {
            return Err("each team must defend exactly one goal".to_string());
        }
        for goal in &self.goals {
            if goal.min.x > goal.max.x || goal.min.y > goal.max.y || goal.min.z > goal.max.z {
                return Err(format!("goal volume on {:?} side is inverted", goal.side));
            }
        }
        if self.goal_distance_threshold <= 0.0 {
            return Err("goal_distance_threshold must be positive".to_string());
        }
        Ok(())
    }
}
