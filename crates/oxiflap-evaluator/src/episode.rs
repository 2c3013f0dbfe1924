//! The simulation-and-fitness harness: one population evaluation from
//! initialization to all-agents-dead.
//!
//! # Tick loop
//!
//! Every live agent is processed once per tick, in original-index order:
//!
//! 1. Query the nearest pipe ahead on the agent's own stream
//! 2. Encode the sensor vector
//! 3. Invoke the agent's policy and validate its output
//! 4. Flap (if the signal exceeds the threshold), gravity, position
//! 5. Advance the agent's stream
//! 6. Credit one survival tick (even if the agent dies this tick)
//! 7. Credit newly passed pipes
//! 8. Death check: out of bounds or pipe collision
//!
//! Dead agents are only *marked* during the pass; the active set is
//! compacted after every live agent has been processed, so a death never
//! skips or double-processes a neighbor. An agent's bird, stream, and policy
//! are dropped together; its reward counters are retained for the report.
//!
//! # Fitness
//!
//! Rewards are tracked as integer counters per original agent index and
//! converted to scalar fitness at report time
//! (`ticks_survived * survival_reward + pipes_passed * pass_reward`), which
//! makes fitness exactly reproducible and monotonically non-decreasing by
//! construction.

use oxiflap_engine::{Bird, PipeStream, StreamSeed};

use crate::{
    config::{EpisodeConfig, EpisodeSetupError},
    policy::{DecisionPolicy, PolicyContractViolation},
    sensor,
};

/// How agents' pipe streams are seeded within one episode.
///
/// The original trainer gave every agent an unseeded independent stream,
/// which makes fitness comparisons within a generation noisy. Both options
/// are explicit here: `Independent` derives a distinct reproducible sub-seed
/// per agent from the episode seed; `Shared` gives every agent the identical
/// layout so fitness differences come from the policies alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamSeeding {
    #[default]
    Independent,
    Shared,
}

#[derive(Debug, Clone, Copy, Default)]
struct AgentRecord {
    ticks_survived: u64,
    pipes_passed: u64,
}

#[derive(Debug)]
struct ActiveAgent<P> {
    index: usize,
    bird: Bird,
    stream: PipeStream,
    policy: P,
    died: bool,
}

/// One population evaluation: N agents stepped in lockstep until none
/// remain alive.
///
/// # Example
///
/// ```
/// use oxiflap_engine::StreamSeed;
/// use oxiflap_evaluator::{config::EpisodeConfig, episode::{Episode, StreamSeeding}};
/// use oxiflap_evaluator::sensor::SensorVector;
///
/// let policies: Vec<fn(&SensorVector) -> Vec<f32>> = vec![
///     |_| vec![0.0], // never flaps
///     |_| vec![1.0], // always flaps
/// ];
/// let seed: StreamSeed =
///     serde_json::from_str("\"0123456789abcdef0123456789abcdef\"").unwrap();
/// let episode = Episode::new(
///     EpisodeConfig::default(),
///     policies,
///     seed,
///     StreamSeeding::Shared,
/// )
/// .unwrap();
/// let report = episode.run().unwrap();
/// assert_eq!(report.len(), 2);
/// ```
#[derive(Debug)]
pub struct Episode<P> {
    config: EpisodeConfig,
    active: Vec<ActiveAgent<P>>,
    records: Vec<AgentRecord>,
    ticks_elapsed: u64,
}

impl<P> Episode<P>
where
    P: DecisionPolicy,
{
    /// Builds an episode: one bird and one seeded stream per policy, all
    /// agents alive, all reward counters zero.
    ///
    /// Fails fast on malformed configuration; nothing is simulated until the
    /// constants have been validated.
    pub fn new(
        config: EpisodeConfig,
        policies: Vec<P>,
        seed: StreamSeed,
        seeding: StreamSeeding,
    ) -> Result<Self, EpisodeSetupError> {
        config.validate()?;
        let world = config.world;
        let active = policies
            .into_iter()
            .enumerate()
            .map(|(index, policy)| {
                let stream_seed = match seeding {
                    StreamSeeding::Shared => seed,
                    StreamSeeding::Independent => seed.with_stream_index(index as u64),
                };
                Ok(ActiveAgent {
                    index,
                    bird: Bird::new(world.bird_start_x, world.bird_start_y),
                    stream: PipeStream::with_seed(world, stream_seed)?,
                    policy,
                    died: false,
                })
            })
            .collect::<Result<Vec<_>, EpisodeSetupError>>()?;
        let records = vec![AgentRecord::default(); active.len()];
        Ok(Self {
            config,
            active,
            records,
            ticks_elapsed: 0,
        })
    }

    /// Number of agents still alive.
    #[must_use]
    pub fn live_agents(&self) -> usize {
        self.active.len()
    }

    /// Ticks simulated so far.
    #[must_use]
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.active.is_empty()
    }

    /// Advances every live agent by one tick, then removes the dead.
    pub fn tick(&mut self) -> Result<(), PolicyContractViolation> {
        let world = self.config.world;
        for agent in &mut self.active {
            let sensors = sensor::encode(
                &agent.bird,
                agent.stream.nearest_ahead(agent.bird.x()),
                &self.config,
            );
            let output = agent.policy.activate(&sensors);
            let Some(signal) = output.first().copied() else {
                return Err(PolicyContractViolation::EmptyOutput { agent: agent.index });
            };
            if !signal.is_finite() {
                return Err(PolicyContractViolation::NonFiniteSignal {
                    agent: agent.index,
                    value: signal,
                });
            }

            if signal > self.config.flap_threshold {
                agent.bird.flap(world.flap_strength);
            }
            agent.bird.apply_gravity(world.gravity);
            agent.bird.step_position();
            agent.stream.advance();

            let record = &mut self.records[agent.index];
            record.ticks_survived += 1;
            record.pipes_passed += agent.stream.collect_passed(agent.bird.x()) as u64;

            let out_of_bounds =
                agent.bird.y() < 0.0 || agent.bird.y() > world.playfield_height;
            if out_of_bounds
                || agent
                    .stream
                    .collides(&agent.bird.bounds(world.bird_width, world.bird_height))
            {
                agent.died = true;
            }
        }

        // Compact only after the full pass: a mid-tick death must not skip
        // the next agent. Bird, stream, and policy drop together here.
        self.active.retain(|agent| !agent.died);
        self.ticks_elapsed += 1;
        Ok(())
    }

    /// Runs the episode to natural completion and reports fitness.
    pub fn run(mut self) -> Result<FitnessReport, PolicyContractViolation> {
        while !self.is_finished() {
            self.tick()?;
        }
        Ok(self.report())
    }

    /// Snapshots the reward counters into a per-agent report.
    ///
    /// Results are indexed by original agent identity; agents removed early
    /// keep the fitness they had accrued at death. Taken mid-episode, the
    /// report reflects fitness accrued so far.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn report(&self) -> FitnessReport {
        let results = self
            .records
            .iter()
            .map(|record| AgentResult {
                fitness: record.ticks_survived as f32 * self.config.survival_reward
                    + record.pipes_passed as f32 * self.config.pass_reward,
                ticks_survived: record.ticks_survived,
                pipes_passed: record.pipes_passed,
            })
            .collect();
        FitnessReport { results }
    }
}

/// Final outcome for one agent, indexed by its original position in the
/// policy list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentResult {
    pub fitness: f32,
    pub ticks_survived: u64,
    pub pipes_passed: u64,
}

/// Per-agent fitness at episode end, returned to the external optimizer.
#[derive(Debug, Clone)]
pub struct FitnessReport {
    results: Vec<AgentResult>,
}

impl FitnessReport {
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AgentResult> {
        self.results.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentResult> {
        self.results.iter()
    }

    /// The best-scoring agent and its result, if any agent ran.
    #[must_use]
    pub fn best(&self) -> Option<(usize, &AgentResult)> {
        self.results
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.fitness.total_cmp(&b.fitness))
    }
}

#[cfg(test)]
mod tests {
    use oxiflap_engine::WorldConfig;
    use rand::Rng as _;

    use super::*;
    use crate::sensor::SensorVector;

    fn never_flap(_: &SensorVector) -> Vec<f32> {
        vec![0.0]
    }

    fn always_flap(_: &SensorVector) -> Vec<f32> {
        vec![1.0]
    }

    fn seed() -> StreamSeed {
        rand::rng().random()
    }

    #[test]
    fn free_fall_fitness_matches_the_reward_formula_exactly() {
        let config = EpisodeConfig::default();
        let episode = Episode::new(
            config,
            vec![never_flap as fn(&SensorVector) -> Vec<f32>],
            seed(),
            StreamSeeding::Independent,
        )
        .unwrap();
        let report = episode.run().unwrap();

        let result = report.get(0).unwrap();
        // Defaults: 600-high playfield, gravity 0.25, start at 300 -> the
        // bird falls out at tick 49 (reproduced by simulation).
        assert_eq!(result.ticks_survived, 49);
        assert_eq!(result.pipes_passed, 0);
        assert_eq!(result.fitness, 49.0 * config.survival_reward);
    }

    #[test]
    fn a_signal_equal_to_the_threshold_does_not_flap() {
        let at_threshold = |_: &SensorVector| vec![0.5];
        let episode = Episode::new(
            EpisodeConfig::default(),
            vec![at_threshold],
            seed(),
            StreamSeeding::Independent,
        )
        .unwrap();
        let report = episode.run().unwrap();
        // Behaves exactly like a never-flapping agent.
        assert_eq!(report.get(0).unwrap().ticks_survived, 49);
    }

    #[test]
    fn dead_agents_keep_their_fitness_while_the_episode_continues() {
        // A weak flap keeps the always-flapping agent airborne far longer
        // than free fall lasts, so the never-flapping agent dies first and
        // its snapshot must survive its removal from the active set.
        let config = EpisodeConfig {
            world: WorldConfig {
                flap_strength: -1.0,
                ..WorldConfig::default()
            },
            ..EpisodeConfig::default()
        };
        let policies: Vec<fn(&SensorVector) -> Vec<f32>> = vec![never_flap, always_flap];
        let episode = Episode::new(config, policies, seed(), StreamSeeding::Shared).unwrap();
        let report = episode.run().unwrap();

        let never = report.get(0).unwrap();
        let always = report.get(1).unwrap();
        assert!(never.ticks_survived <= always.ticks_survived);
        assert_eq!(never.ticks_survived, 49);
        assert_eq!(never.fitness, 49.0 * config.survival_reward);
        // The always-flapping agent leaves through the top eventually.
        assert!(always.ticks_survived > 49);
    }

    #[test]
    fn shared_seeding_gives_identical_agents_identical_outcomes() {
        // A gap pinned at the bird's altitude lets zero-gravity hoverers
        // survive long enough for pipes to matter.
        let config = EpisodeConfig {
            world: WorldConfig {
                gravity: 0.0,
                gap_margin: 300.0,
                gap_height: 200.0,
                ..WorldConfig::default()
            },
            ..EpisodeConfig::default()
        };
        let policies: Vec<fn(&SensorVector) -> Vec<f32>> = vec![never_flap, never_flap];
        let mut episode = Episode::new(config, policies, seed(), StreamSeeding::Shared).unwrap();
        for _ in 0..2000 {
            episode.tick().unwrap();
        }
        assert_eq!(episode.live_agents(), 2);
        let report = episode.report();
        assert_eq!(report.get(0), report.get(1));
        assert!(report.get(0).unwrap().pipes_passed > 0);
    }

    #[test]
    fn collision_death_is_detected_inside_the_bounds() {
        // Pinned gap center at 300 with a gap narrower than the bird's
        // hovering band: death comes from the pipe, not the playfield edge.
        let config = EpisodeConfig {
            world: WorldConfig {
                gravity: 0.0,
                gap_margin: 300.0,
                gap_height: 20.0,
                ..WorldConfig::default()
            },
            ..EpisodeConfig::default()
        };
        let episode = Episode::new(
            config,
            vec![never_flap as fn(&SensorVector) -> Vec<f32>],
            seed(),
            StreamSeeding::Independent,
        )
        .unwrap();
        let report = episode.run().unwrap();

        let result = report.get(0).unwrap();
        assert_eq!(result.pipes_passed, 0);
        // The first pipe needs most of the playfield width to reach the bird.
        assert!(result.ticks_survived > u64::from(config.world.spawn_interval));
        assert!(result.ticks_survived < 1000);
    }

    #[test]
    fn fitness_is_monotonically_non_decreasing() {
        let config = EpisodeConfig::default();
        let mut episode = Episode::new(
            config,
            vec![never_flap as fn(&SensorVector) -> Vec<f32>],
            seed(),
            StreamSeeding::Independent,
        )
        .unwrap();

        let mut previous = 0.0;
        while !episode.is_finished() {
            episode.tick().unwrap();
            let fitness = episode.report().get(0).unwrap().fitness;
            assert!(fitness >= previous);
            previous = fitness;
        }
    }

    #[test]
    fn empty_policy_output_aborts_the_episode() {
        let broken = |_: &SensorVector| Vec::new();
        let mut episode = Episode::new(
            EpisodeConfig::default(),
            vec![broken],
            seed(),
            StreamSeeding::Independent,
        )
        .unwrap();
        assert!(matches!(
            episode.tick(),
            Err(PolicyContractViolation::EmptyOutput { agent: 0 })
        ));
    }

    #[test]
    fn non_finite_flap_signal_aborts_the_episode() {
        let broken = |_: &SensorVector| vec![f32::NAN];
        let mut episode = Episode::new(
            EpisodeConfig::default(),
            vec![broken],
            seed(),
            StreamSeeding::Independent,
        )
        .unwrap();
        assert!(matches!(
            episode.tick(),
            Err(PolicyContractViolation::NonFiniteSignal { agent: 0, .. })
        ));
    }

    #[test]
    fn invalid_configuration_fails_at_construction() {
        let config = EpisodeConfig {
            pass_reward: f32::INFINITY,
            ..EpisodeConfig::default()
        };
        let result = Episode::new(
            config,
            vec![never_flap as fn(&SensorVector) -> Vec<f32>],
            seed(),
            StreamSeeding::Independent,
        );
        assert!(matches!(result, Err(EpisodeSetupError::InvalidReward)));
    }

    #[test]
    fn an_empty_population_finishes_immediately() {
        let episode = Episode::new(
            EpisodeConfig::default(),
            Vec::<fn(&SensorVector) -> Vec<f32>>::new(),
            seed(),
            StreamSeeding::Independent,
        )
        .unwrap();
        assert!(episode.is_finished());
        let report = episode.run().unwrap();
        assert!(report.is_empty());
        assert!(report.best().is_none());
    }

    #[test]
    fn best_picks_the_longest_survivor() {
        let config = EpisodeConfig {
            world: WorldConfig {
                flap_strength: -1.0,
                ..WorldConfig::default()
            },
            ..EpisodeConfig::default()
        };
        let policies: Vec<fn(&SensorVector) -> Vec<f32>> = vec![never_flap, always_flap];
        let report = Episode::new(config, policies, seed(), StreamSeeding::Shared)
            .unwrap()
            .run()
            .unwrap();
        let (index, _) = report.best().unwrap();
        assert_eq!(index, 1);
    }
}
