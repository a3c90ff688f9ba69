//! Clock & Stoppage Controller
//!
//! One call per wall-clock second of live play. The controller never owns the
//! match state: it takes a `ClockState` copy and returns the next one plus
//! what happened during the tick.
//!
//! Regulation tick:
//! 1. Decrement half and match remaining time
//! 2. At exactly `stoppage_trigger_seconds` remaining, draw the stoppage
//!    allowance once
//! 3. End test: `half_time_remaining <= -stoppage_time_added` once notified,
//!    `<= 0` if the trigger was never reached
//! 4. Progress signals (observational only)

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::ClockConfig;
use super::state::ClockState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClockSignal {
    StoppageAnnounced { seconds: i32 },
    Progress { half_time_remaining: i32, in_stoppage: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockTick {
    pub clock: ClockState,
    pub signals: Vec<ClockSignal>,
    pub period_ended: bool,
}

/// Has the current regulation half run out (including stoppage)?
pub fn regulation_expired(clock: &ClockState) -> bool {
    if clock.stoppage_time_notified {
        clock.half_time_remaining <= -clock.stoppage_time_added
    } else {
        clock.half_time_remaining <= 0
    }
}

/// Advance a regulation half by one second.
pub fn tick_regulation<R: Rng + ?Sized>(config: &ClockConfig, clock: ClockState, rng: &mut R) -> ClockTick {
    let mut next = clock;
    let mut signals = Vec::new();

    next.half_time_remaining -= 1;
    next.match_time_remaining -= 1;

    if next.half_time_remaining == config.stoppage_trigger_seconds && !next.stoppage_time_notified {
        let seconds = rng.gen_range(config.stoppage_min_seconds..=config.stoppage_max_seconds);
        // Assigned once per half, never lowered
        next.stoppage_time_added = next.stoppage_time_added.max(seconds);
        next.stoppage_time_notified = true;
        signals.push(ClockSignal::StoppageAnnounced {
            seconds: next.stoppage_time_added,
        });
    }

    let period_ended = regulation_expired(&next);

    if !period_ended {
        if next.half_time_remaining > 0 {
            if next.half_time_remaining % config.progress_interval_seconds == 0 {
                signals.push(ClockSignal::Progress {
                    half_time_remaining: next.half_time_remaining,
                    in_stoppage: false,
                });
            }
        } else if next.stoppage_elapsed() % config.stoppage_progress_interval_seconds == 0 {
            signals.push(ClockSignal::Progress {
                half_time_remaining: next.half_time_remaining,
                in_stoppage: true,
            });
        }
    }

    ClockTick {
        clock: next,
        signals,
        period_ended,
    }
}

/// Advance the overtime countdown by one second. No stoppage.
pub fn tick_overtime(config: &ClockConfig, clock: ClockState) -> ClockTick {
    let mut next = clock;
    let mut signals = Vec::new();

    next.half_time_remaining -= 1;
    next.match_time_remaining -= 1;

    let period_ended = next.half_time_remaining <= 0;
    if !period_ended && next.half_time_remaining % config.progress_interval_seconds == 0 {
        signals.push(ClockSignal::Progress {
            half_time_remaining: next.half_time_remaining,
            in_stoppage: false,
        });
    }

    ClockTick {
        clock: next,
        signals,
        period_ended,
    }
}

/// Clock for the start of the next regulation half.
pub fn next_half(config: &ClockConfig, clock: ClockState) -> ClockState {
    let mut next = clock;
    next.half_time_remaining = config.half_seconds;
    next.clear_stoppage();
    next
}

/// Clock for the start of overtime.
pub fn overtime(config: &ClockConfig, clock: ClockState) -> ClockState {
    let mut next = clock;
    next.half_time_remaining = config.overtime_seconds;
    next.match_time_remaining = config.overtime_seconds;
    next.clear_stoppage();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixed_stoppage(seconds: i32) -> ClockConfig {
        ClockConfig {
            half_seconds: 120,
            stoppage_min_seconds: seconds,
            stoppage_max_seconds: seconds,
            ..ClockConfig::default()
        }
    }

    /// Tick until the period ends; returns (ticks, final clock, all signals).
    fn run_half(config: &ClockConfig, seed: u64) -> (u32, ClockState, Vec<ClockSignal>) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut clock = ClockState::regulation(config.half_seconds);
        let mut signals = Vec::new();
        for ticks in 1..10_000 {
            let tick = tick_regulation(config, clock, &mut rng);
            clock = tick.clock;
            signals.extend(tick.signals);
            if tick.period_ended {
                return (ticks, clock, signals);
            }
        }
        panic!("half never ended");
    }

    #[test]
    fn test_half_ends_exactly_at_negative_stoppage() {
        let config = fixed_stoppage(20);
        let (ticks, clock, _) = run_half(&config, 1);
        assert_eq!(clock.stoppage_time_added, 20);
        assert_eq!(clock.half_time_remaining, -20);
        assert_eq!(ticks, 140);
    }

    #[test]
    fn test_stoppage_announced_once() {
        let config = fixed_stoppage(20);
        let (_, _, signals) = run_half(&config, 2);
        let announcements = signals
            .iter()
            .filter(|s| matches!(s, ClockSignal::StoppageAnnounced { .. }))
            .count();
        assert_eq!(announcements, 1);
    }

    #[test]
    fn test_half_without_trigger_ends_at_zero() {
        // Half shorter than the trigger point: stoppage never assigned
        let config = ClockConfig {
            half_seconds: 45,
            ..ClockConfig::default()
        };
        let (ticks, clock, _) = run_half(&config, 3);
        assert!(!clock.stoppage_time_notified);
        assert_eq!(clock.half_time_remaining, 0);
        assert_eq!(ticks, 45);
    }

    #[test]
    fn test_zero_stoppage_still_ends_at_zero() {
        let config = fixed_stoppage(0);
        let (_, clock, _) = run_half(&config, 4);
        assert!(clock.stoppage_time_notified);
        assert_eq!(clock.half_time_remaining, 0);
    }

    #[test]
    fn test_notified_flag_blocks_redraw() {
        let config = fixed_stoppage(30);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let clock = ClockState {
            half_time_remaining: 61,
            match_time_remaining: 200,
            stoppage_time_added: 45,
            stoppage_time_notified: true,
        };
        let tick = tick_regulation(&config, clock, &mut rng);
        assert_eq!(tick.clock.half_time_remaining, 60);
        assert_eq!(tick.clock.stoppage_time_added, 45);
        assert!(tick.signals.iter().all(|s| !matches!(s, ClockSignal::StoppageAnnounced { .. })));
    }

    #[test]
    fn test_progress_cadence() {
        let config = fixed_stoppage(20);
        let (_, _, signals) = run_half(&config, 6);
        let regulation: Vec<i32> = signals
            .iter()
            .filter_map(|s| match s {
                ClockSignal::Progress {
                    half_time_remaining,
                    in_stoppage: false,
                } => Some(*half_time_remaining),
                _ => None,
            })
            .collect();
        assert_eq!(regulation, vec![90, 60, 30]);

        let stoppage: Vec<i32> = signals
            .iter()
            .filter_map(|s| match s {
                ClockSignal::Progress {
                    half_time_remaining,
                    in_stoppage: true,
                } => Some(*half_time_remaining),
                _ => None,
            })
            .collect();
        // 0 and -10; -20 ends the half
        assert_eq!(stoppage, vec![0, -10]);
    }

    #[test]
    fn test_overtime_countdown() {
        let config = ClockConfig::default();
        let mut clock = overtime(&config, ClockState::regulation(300));
        assert_eq!(clock.half_time_remaining, config.overtime_seconds);
        let mut ticks = 0;
        loop {
            ticks += 1;
            let tick = tick_overtime(&config, clock);
            clock = tick.clock;
            if tick.period_ended {
                break;
            }
        }
        assert_eq!(ticks, config.overtime_seconds);
        assert_eq!(clock.stoppage_time_added, 0);
    }

    #[test]
    fn test_next_half_resets_stoppage() {
        let config = ClockConfig::default();
        let clock = ClockState {
            half_time_remaining: -30,
            match_time_remaining: 270,
            stoppage_time_added: 30,
            stoppage_time_notified: true,
        };
        let next = next_half(&config, clock);
        assert_eq!(next.half_time_remaining, config.half_seconds);
        assert_eq!(next.match_time_remaining, 270);
        assert_eq!(next.stoppage_time_added, 0);
        assert!(!next.stoppage_time_notified);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Once notified, the half ends exactly at -stoppage, never earlier.
            #[test]
            fn prop_half_ends_at_negative_stoppage(
                seed in any::<u64>(),
                half in 61i32..400i32,
                min in 0i32..40i32,
                span in 0i32..40i32
            ) {
                let config = ClockConfig {
                    half_seconds: half,
                    stoppage_min_seconds: min,
                    stoppage_max_seconds: min + span,
                    ..ClockConfig::default()
                };
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let mut clock = ClockState::regulation(half);
                loop {
                    let tick = tick_regulation(&config, clock, &mut rng);
                    clock = tick.clock;
                    if tick.period_ended {
                        break;
                    }
                    prop_assert!(clock.half_time_remaining > -clock.stoppage_time_added
                        || !clock.stoppage_time_notified);
                }
                prop_assert!(clock.stoppage_time_notified);
                prop_assert_eq!(clock.half_time_remaining, -clock.stoppage_time_added);
                prop_assert!(clock.stoppage_time_added >= min);
                prop_assert!(clock.stoppage_time_added <= min + span);
            }
        }
    }
}
