//! Match engine modules, leaf-first:
//! boundary -> clock -> restart -> machine, with momentum on the side.

pub mod boundary;
pub mod clock;
pub mod coin_toss;
pub mod config;
pub mod machine;
pub mod momentum;
pub mod restart;
pub mod roster;
pub mod scheduler;
pub mod signals;
pub mod state;
pub mod stats;
pub mod types;

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod scenario_tests;
