use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use oxiflap_engine::World;
use oxiflap_evaluator::{config::EpisodeConfig, policy::DecisionPolicy as _, sensor};

use crate::{model::policy_model::PolicyModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the policy model file (JSON format)
    model_path: PathBuf,
    /// Stream seed as 32 hex characters (random when omitted)
    #[arg(long)]
    seed: Option<String>,
    /// Ticks per second for the real-time clock gate
    #[arg(long, default_value_t = 60)]
    fps: u64,
    /// Run without the real-time clock gate
    #[arg(long, default_value_t = false)]
    turbo: bool,
    /// Stop after this many ticks even if the bird is still alive
    #[arg(long, default_value_t = 100_000)]
    tick_limit: u64,
    /// Episode configuration file (JSON); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Drives one world with a saved policy, gated to real time.
///
/// The same physics, stream, and sensor components the population harness
/// uses, with a single agent and a wall clock between ticks.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        model_path,
        seed,
        fps,
        turbo,
        tick_limit,
        config,
    } = arg;

    anyhow::ensure!(*fps > 0, "fps must be at least 1");

    let episode_config: EpisodeConfig = match config {
        Some(path) => util::read_json_file("episode config", path)?,
        None => EpisodeConfig::default(),
    };

    let model = PolicyModel::open(model_path)?;
    let policy = model.to_policy();
    eprintln!("Replaying model \"{}\" (fitness {:.3})", model.name, model.fitness);

    let mut world = match seed {
        Some(hex) => World::with_seed(episode_config.world, util::parse_seed(hex)?)?,
        None => World::new(episode_config.world)?,
    };

    let tick_duration = Duration::from_secs_f64(1.0 / (*fps as f64));
    let started = Instant::now();
    let mut last_score = 0;

    while world.state().is_running() && world.tick() < *tick_limit {
        let sensors = sensor::encode(
            world.bird(),
            world.stream().nearest_ahead(world.bird().x()),
            &episode_config,
        );
        let output = policy.activate(&sensors);
        let flap = flap_decision(&output, episode_config.flap_threshold)?;
        world.step(flap);

        if world.score() > last_score {
            last_score = world.score();
            eprintln!("tick {:6}: passed pipe #{last_score}", world.tick());
        }

        if !turbo {
            let next_tick = started + tick_duration * u32::try_from(world.tick()).unwrap_or(u32::MAX);
            if let Some(remaining) = next_tick.checked_duration_since(Instant::now()) {
                thread::sleep(remaining);
            }
        }
    }

    if world.state().is_game_over() {
        eprintln!("Game over at tick {}", world.tick());
    } else {
        eprintln!("Tick limit reached at tick {}", world.tick());
    }
    eprintln!("  Score: {}", world.score());

    Ok(())
}

/// Applies the same policy output contract the population harness enforces:
/// a first element must exist and be finite; flap iff it strictly exceeds
/// the threshold.
fn flap_decision(output: &[f32], threshold: f32) -> anyhow::Result<bool> {
    let signal = output
        .first()
        .copied()
        .context("policy produced no output")?;
    anyhow::ensure!(
        signal.is_finite(),
        "policy produced a non-finite flap signal: {signal}"
    );
    Ok(signal > threshold)
}
