//! Match CLI
//!
//! Operator front end for `match_core`:
//! - `simulate`: run a seeded match against a random-walk world
//! - `classify`: probe the boundary classifier with one position
//! - `config`: print a preset configuration as JSON

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use match_core::{
    EngineOutput, MatchConfig, MatchEngine, MatchStatus, PlayerId, PlayerPlacement, PlayerRole, PortError, Signal,
    TeamId, Vec3, WorldPort,
};

#[derive(Parser)]
#[command(name = "match_cli")]
#[command(about = "Drive and inspect the authoritative match engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Standard,
    Arcade,
    Quick,
}

impl Preset {
    fn config(self) -> MatchConfig {
        match self {
            Preset::Standard => MatchConfig::standard(),
            Preset::Arcade => MatchConfig::arcade(),
            Preset::Quick => MatchConfig::quick(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a full match against a random-walk ball
    Simulate {
        /// RNG seed for both the engine and the toy world
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Built-in configuration preset
        #[arg(long, value_enum, default_value = "quick")]
        preset: Preset,

        /// JSON configuration file (overrides --preset)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Players per team
        #[arg(long, default_value = "5")]
        players: u32,

        /// Print every engine output as a JSON line
        #[arg(long, default_value = "false")]
        json: bool,

        /// Safety cap on simulated seconds
        #[arg(long, default_value = "10000")]
        max_seconds: u64,
    },

    /// Classify one ball position
    Classify {
        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
        #[arg(allow_hyphen_values = true)]
        z: f32,

        #[arg(long, value_enum, default_value = "standard")]
        preset: Preset,
    },

    /// Print a preset configuration
    Config {
        #[arg(long, value_enum, default_value = "standard")]
        preset: Preset,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            seed,
            preset,
            config,
            players,
            json,
            max_seconds,
        } => {
            let config = match config {
                Some(path) => MatchConfig::load(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => preset.config(),
            }
            .with_env_overrides();
            config.validate().context("Invalid configuration")?;
            simulate(config, seed, players, json, max_seconds)?;
        }
        Commands::Classify { x, y, z, preset } => {
            let field = preset.config().field;
            let check = field.classify(&Vec3::new(x, y, z));
            println!("{}", serde_json::to_string_pretty(&check)?);
        }
        Commands::Config { preset } => {
            println!("{}", serde_json::to_string_pretty(&preset.config())?);
        }
    }

    Ok(())
}

fn simulate(config: MatchConfig, seed: u64, players: u32, json: bool, max_seconds: u64) -> Result<()> {
    if players == 0 {
        bail!("--players must be at least 1");
    }

    let mut engine = MatchEngine::with_seed(config, seed)?;
    let mut world = ToyWorld::new(seed);

    let roles = [
        PlayerRole::Goalkeeper,
        PlayerRole::Defender,
        PlayerRole::Midfielder,
        PlayerRole::Attacker,
    ];
    let mut next_id = 1;
    for team in TeamId::ALL {
        for i in 0..players {
            let id = PlayerId(next_id);
            next_id += 1;
            let role = roles[(i as usize).min(roles.len() - 1)];
            world.spawn(id);
            engine.add_player(id, &format!("{} {}", team, i + 1), team, role, true)?;
        }
    }
    let ids: Vec<(PlayerId, TeamId)> = engine.roster().slots().iter().map(|s| (s.id, s.team)).collect();

    info!(
        "Simulating match {} (seed {}, {} per side)",
        engine.state().match_id,
        seed,
        players
    );
    if engine.status() == MatchStatus::Waiting {
        engine.start_game()?;
    }
    flush(&mut engine, &mut world, json)?;

    for _ in 0..max_seconds {
        match engine.status() {
            MatchStatus::Finished => break,
            MatchStatus::Halftime => {
                engine.start_second_half()?;
            }
            MatchStatus::Playing | MatchStatus::Overtime => {
                if let Some((player, _)) = world.maybe_touch(&ids) {
                    engine.report_touch(player, false);
                }
                let ball = world.step();
                engine.report_ball_position(ball);
            }
            _ => {}
        }
        engine.tick();
        flush(&mut engine, &mut world, json)?;
    }

    if engine.status() != MatchStatus::Finished {
        warn!("Stopped after {} seconds while {}", max_seconds, engine.status());
    }

    let state = engine.state();
    if !json {
        println!("Final score: {} ({})", state.score, engine.status());
        for period in engine.stats().closed_periods() {
            println!(
                "  period {}: goals {}, throw-ins {}, corners {}, goal kicks {}, stoppage {}s",
                period.period,
                period.goals,
                period.throw_ins,
                period.corner_kicks,
                period.goal_kicks,
                period.stoppage_time_added
            );
        }
    }
    Ok(())
}

/// Apply world commands to the toy world and print signals.
fn flush(engine: &mut MatchEngine, world: &mut ToyWorld, json: bool) -> Result<()> {
    for output in engine.drain_outputs() {
        if json {
            println!("{}", serde_json::to_string(&output)?);
        }
        match output {
            EngineOutput::World(command) => {
                let report = command.apply(world);
                if !report.skipped.is_empty() {
                    warn!("World skipped {:?}", report.skipped);
                }
            }
            EngineOutput::Signal(Signal::GoalScored { team, score, own_goal, .. }) => {
                info!("Goal for {}{} -> {}", team, if own_goal { " (own goal)" } else { "" }, score);
            }
            EngineOutput::Signal(Signal::GameOver { winner, score, .. }) => match winner {
                Some(team) => info!("Full time {}, {} wins", score, team),
                None => info!("Full time {}, draw", score),
            },
            EngineOutput::Signal(Signal::CommandRejected { command, reason }) => {
                warn!("{} rejected: {}", command, reason);
            }
            EngineOutput::Signal(signal) => debug!("{:?}", signal),
        }
    }
    Ok(())
}

/// Random-walk stand-in for the physics collaborator.
struct ToyWorld {
    rng: ChaCha8Rng,
    ball: Vec3,
    velocity: Vec3,
    players: BTreeMap<PlayerId, Vec3>,
    frozen: BTreeSet<PlayerId>,
}

impl ToyWorld {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            ball: Vec3::zeros(),
            velocity: Vec3::zeros(),
            players: BTreeMap::new(),
            frozen: BTreeSet::new(),
        }
    }

    fn spawn(&mut self, id: PlayerId) {
        self.players.insert(id, Vec3::zeros());
    }

    fn maybe_touch(&mut self, ids: &[(PlayerId, TeamId)]) -> Option<(PlayerId, TeamId)> {
        if ids.is_empty() || !self.rng.gen_bool(0.3) {
            return None;
        }
        let (id, team) = ids[self.rng.gen_range(0..ids.len())];
        if self.frozen.contains(&id) {
            return None;
        }
        // A touch is a kick
        self.velocity = Vec3::new(
            self.rng.gen_range(-6.0..6.0),
            if self.rng.gen_bool(0.2) { self.rng.gen_range(0.0..3.0) } else { 0.0 },
            self.rng.gen_range(-4.0..4.0),
        );
        Some((id, team))
    }

    fn step(&mut self) -> Vec3 {
        self.ball += self.velocity;
        self.ball.y = (self.ball.y - 1.0).max(0.0);
        self.velocity *= 0.9;
        self.ball
    }
}

impl WorldPort for ToyWorld {
    fn teleport_ball(&mut self, position: Vec3, velocity: Vec3) -> Result<(), PortError> {
        self.ball = position;
        self.velocity = velocity;
        Ok(())
    }

    fn place_player(&mut self, placement: &PlayerPlacement) -> Result<(), PortError> {
        let Some(current) = self.players.get_mut(&placement.player_id) else {
            return Err(PortError::PlayerMissing(placement.player_id));
        };
        if let Some(target) = placement.target {
            *current = target;
        }
        if placement.freeze {
            self.frozen.insert(placement.player_id);
        }
        Ok(())
    }

    fn set_frozen(&mut self, id: PlayerId, frozen: bool) -> Result<(), PortError> {
        if !self.players.contains_key(&id) {
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
        self.players.clear();
        self.frozen.clear();
        self.ball = Vec3::zeros();
        self.velocity = Vec3::zeros();
        Ok(())
    }
}
