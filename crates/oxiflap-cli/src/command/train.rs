use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use oxiflap_evaluator::{
    config::EpisodeConfig,
    episode::{Episode, StreamSeeding},
};
use oxiflap_stats::descriptive::DescriptiveStats;
use rand::Rng as _;

use crate::{
    model::policy_model::{LinearPolicy, PolicyModel},
    util::{self, Output},
};

const POPULATION_COUNT: usize = 30;
const MAX_GENERATIONS: usize = 50;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of candidate policies evaluated per generation
    #[arg(long, default_value_t = POPULATION_COUNT)]
    population: usize,
    /// Number of generations to run
    #[arg(long, default_value_t = MAX_GENERATIONS)]
    generations: usize,
    /// Episode seed as 32 hex characters (random when omitted)
    #[arg(long)]
    seed: Option<String>,
    /// Give every agent in a generation the identical pipe layout
    #[arg(long, default_value_t = false)]
    shared_streams: bool,
    /// Episode configuration file (JSON); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Iterated random search over linear policies.
///
/// Each generation samples a fresh batch of candidates, carries over the
/// best policy found so far, and scores everyone in one lockstep episode.
/// Deliberately mechanism-free (no crossover, no mutation): selection and
/// reproduction belong to an external optimizer; this trainer exists to
/// exercise the episode harness and the fitness-report interface end to end.
pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        population,
        generations,
        seed,
        shared_streams,
        config,
        output,
    } = arg;

    anyhow::ensure!(*population > 0, "population must be at least 1");
    anyhow::ensure!(*generations > 0, "generations must be at least 1");

    let episode_config: EpisodeConfig = match config {
        Some(path) => util::read_json_file("episode config", path)?,
        None => EpisodeConfig::default(),
    };

    let mut rng = rand::rng();
    let base_seed = match seed {
        Some(hex) => util::parse_seed(hex)?,
        None => rng.random(),
    };
    let seeding = if *shared_streams {
        StreamSeeding::Shared
    } else {
        StreamSeeding::Independent
    };

    let mut best: Option<(LinearPolicy, f32)> = None;
    for generation in 0..*generations {
        let mut policies = Vec::with_capacity(*population);
        if let Some((policy, _)) = &best {
            policies.push(policy.clone());
        }
        while policies.len() < *population {
            policies.push(LinearPolicy::from_rng(&mut rng));
        }

        let episode_seed = base_seed.with_stream_index(generation as u64);
        let episode = Episode::new(episode_config, policies.clone(), episode_seed, seeding)?;
        let report = episode.run()?;

        let stats = DescriptiveStats::new(report.iter().map(|r| r.fitness)).unwrap();
        let (best_index, best_result) = report.best().unwrap();

        eprintln!("Generation #{generation}:");
        eprintln!("  Fitness Stats:");
        eprintln!("    Min:    {:.3}", stats.min);
        eprintln!("    Max:    {:.3}", stats.max);
        eprintln!("    Mean:   {:.3}", stats.mean);
        eprintln!("    Median: {:.3}", stats.median);
        eprintln!("    Stddev: {:.3}", stats.std_dev);
        eprintln!(
            "  Best: #{best_index} => {:.3} ({} ticks, {} pipes)",
            best_result.fitness, best_result.ticks_survived, best_result.pipes_passed
        );

        if best
            .as_ref()
            .is_none_or(|(_, fitness)| best_result.fitness > *fitness)
        {
            best = Some((policies[best_index].clone(), best_result.fitness));
        }
    }

    let (best_policy, best_fitness) = best.context("no generations were run")?;
    eprintln!("Policy search completed.");

    let model = PolicyModel {
        name: "linear".to_owned(),
        trained_at: Utc::now(),
        fitness: best_fitness,
        weights: best_policy.weights(),
        bias: best_policy.bias(),
    };
    Output::save_json(&model, output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Fitness: {:.3}", model.fitness);

    Ok(())
}
