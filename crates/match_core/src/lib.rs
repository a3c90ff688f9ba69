//! # match_core - Authoritative Match Engine
//!
//! The engine owns match time, phase transitions, scoring and the geometric
//! rules that decide what happens when the ball leaves play. Everything else
//! (rendering, audio, AI movement, physics) talks to it through in-process
//! inputs and the outbox it fills.
//!
//! ## Features
//! - Seeded, reproducible matches (same seed = same stoppage draws and coin tosses)
//! - Boundary classification into goal / throw-in / corner / goal kick
//! - Kickoff placement with a ten-yard clearance
//! - Cancellable restart countdowns
//!
//! ## Usage
//! ```rust
//! use match_core::{MatchConfig, MatchEngine, PlayerId, PlayerRole, TeamId};
//!
//! let mut engine = MatchEngine::with_seed(MatchConfig::quick(), 7).unwrap();
//! engine.add_player(PlayerId(1), "Ana", TeamId::Home, PlayerRole::Attacker, false).unwrap();
//! engine.add_player(PlayerId(2), "Bo", TeamId::Away, PlayerRole::Goalkeeper, true).unwrap();
//! engine.start_game().unwrap();
//! engine.tick();
//! let outputs = engine.drain_outputs();
//! assert!(!outputs.is_empty());
//! ```

// Engine APIs pass geometry, roster views and RNGs together
#![allow(clippy::too_many_arguments)]

pub mod engine;
pub mod error;

pub use engine::boundary::{
    BoundaryCheck, BoundaryEvent, BoundaryEventKind, FieldGeometry, GoalVolume,
};
pub use engine::coin_toss::{CoinSide, CoinTossCall, CoinTossOutcome};
pub use engine::config::{ClockConfig, MatchConfig, RestartConfig, RulesConfig};
pub use engine::machine::{EngineOutput, InputOutcome, MatchEngine, MatchInput, OperatorRequest};
pub use engine::momentum::{Celebration, MomentumTracker, StreakRecord};
pub use engine::restart::{PlayerPlacement, RestartDirective, RestartHint, RestartPositioner};
pub use engine::roster::{EffectKind, PlayerSlot, Roster, TimedEffect};
pub use engine::signals::{ApplyReport, Signal, StateSnapshot, WorldCommand, WorldPort};
pub use engine::state::{ClockState, MatchState, MatchStatus};
pub use engine::types::{FieldSide, PlayerId, PlayerRole, RestartKind, Score, TeamId, Vec3};
pub use error::{CommandRejection, ConfigError, OperatorCommand, PortError};
