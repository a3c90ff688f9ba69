//! Error taxonomy
//!
//! The engine never fails a match. Stale events are dropped silently (see
//! `InputOutcome::Ignored`); only operator commands, configuration loading and
//! collaborator ports produce errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::state::MatchStatus;
use crate::engine::types::PlayerId;

/// Operator-facing entry points, used to label rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorCommand {
    StartGame,
    ResetGame,
    StartSecondHalf,
    CoinToss,
    BallReset,
    AddPlayer,
    RemovePlayer,
    ApplyEffect,
}

impl fmt::Display for OperatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OperatorCommand::StartGame => "start game",
            OperatorCommand::ResetGame => "reset game",
            OperatorCommand::StartSecondHalf => "start second half",
            OperatorCommand::CoinToss => "coin toss",
            OperatorCommand::BallReset => "ball reset",
            OperatorCommand::AddPlayer => "add player",
            OperatorCommand::RemovePlayer => "remove player",
            OperatorCommand::ApplyEffect => "apply effect",
        };
        f.write_str(name)
    }
}

/// Why an operator command was refused. No state changes on rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandRejection {
    #[error("{command} is not allowed while the match is {status}")]
    WrongPhase {
        command: OperatorCommand,
        status: MatchStatus,
    },

    #[error("not enough players to start: {present} of {required}")]
    NotEnoughPlayers { present: usize, required: usize },

    #[error("player {0} is already on the roster")]
    DuplicatePlayer(PlayerId),

    #[error("player {0} is not on the roster")]
    UnknownPlayer(PlayerId),
}

impl CommandRejection {
    /// The command label reported alongside the rejection signal.
    pub fn command(&self, fallback: OperatorCommand) -> OperatorCommand {
        match self {
            CommandRejection::WrongPhase { command, .. } => *command,
            _ => fallback,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Failure reported by a world collaborator while executing a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("player {0} is not spawned")]
    PlayerMissing(PlayerId),

    #[error("world unavailable: {0}")]
    Unavailable(String),
}
