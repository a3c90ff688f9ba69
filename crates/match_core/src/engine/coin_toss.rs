//! Coin toss for the opening kickoff.
//!
//! With a caller, the caller wins when the coin lands on its call. Without
//! one (nobody called before the countdown) the winner is drawn at random.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn flip<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinTossCall {
    pub caller: TeamId,
    pub call: CoinSide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinTossOutcome {
    pub landed: CoinSide,
    /// Team that kicks off
    pub winner: TeamId,
    pub call: Option<CoinTossCall>,
}

pub fn toss<R: Rng + ?Sized>(rng: &mut R, call: Option<CoinTossCall>) -> CoinTossOutcome {
    let landed = CoinSide::flip(rng);
    let winner = match call {
        Some(c) if c.call == landed => c.caller,
        Some(c) => c.caller.opponent(),
        None => {
            if rng.gen_bool(0.5) {
                TeamId::Home
            } else {
                TeamId::Away
            }
        }
    };
    CoinTossOutcome { landed, winner, call }
}
