use crate::{Bird, ConfigError, PipeStream, StreamSeed, WorldConfig};

/// Whether a world is still being simulated.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum WorldState {
    Running,
    GameOver,
}

/// A single-agent world: one bird, one pipe stream, one score.
///
/// This is the interactive/replay variant over the same components the
/// population harness uses. The caller decides each tick whether to flap
/// (a human key press, or a policy's output) and drives the world with
/// [`Self::step`]; pacing between ticks (a real-time clock gate) belongs to
/// the presentation layer, not here.
///
/// # Example
///
/// ```
/// use oxiflap_engine::{World, WorldConfig};
///
/// let mut world = World::new(WorldConfig::default()).unwrap();
/// while world.state().is_running() {
///     world.step(false); // never flap: the bird falls out of the playfield
/// }
/// assert_eq!(world.score(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    bird: Bird,
    stream: PipeStream,
    score: usize,
    tick: u64,
    state: WorldState,
}

impl World {
    /// Creates a world with a randomly seeded pipe stream.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        Ok(Self::build(config, PipeStream::new(config)?))
    }

    /// Like [`Self::new`], but with a seeded stream for deterministic replay.
    pub fn with_seed(config: WorldConfig, seed: StreamSeed) -> Result<Self, ConfigError> {
        Ok(Self::build(config, PipeStream::with_seed(config, seed)?))
    }

    fn build(config: WorldConfig, stream: PipeStream) -> Self {
        Self {
            config,
            bird: Bird::new(config.bird_start_x, config.bird_start_y),
            stream,
            score: 0,
            tick: 0,
            state: WorldState::Running,
        }
    }

    #[must_use]
    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    #[must_use]
    pub fn stream(&self) -> &PipeStream {
        &self.stream
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Advances the world by one tick. No-op after game over.
    ///
    /// Update order within the tick: flap (if requested), gravity, position,
    /// stream advance, pass scoring, death check.
    pub fn step(&mut self, flap: bool) {
        if self.state.is_game_over() {
            return;
        }
        self.tick += 1;

        if flap {
            self.bird.flap(self.config.flap_strength);
        }
        self.bird.apply_gravity(self.config.gravity);
        self.bird.step_position();

        self.stream.advance();
        self.score += self.stream.collect_passed(self.bird.x());

        if self.is_bird_dead() {
            self.state = WorldState::GameOver;
        }
    }

    fn is_bird_dead(&self) -> bool {
        let out_of_bounds =
            self.bird.y() < 0.0 || self.bird.y() > self.config.playfield_height;
        out_of_bounds
            || self.stream.collides(
                &self
                    .bird
                    .bounds(self.config.bird_width, self.config.bird_height),
            )
    }
}
