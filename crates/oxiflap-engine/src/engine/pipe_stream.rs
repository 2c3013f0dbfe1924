use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ConfigError, Pipe, Rect, WorldConfig};

/// Seed for deterministic pipe generation.
///
/// A 128-bit seed that initializes the stream's random number generator.
/// Two streams built from the same seed and configuration produce identical
/// pipe sequences, enabling:
///
/// - Reproducible episodes for debugging and testing
/// - Replaying a trained policy against the layouts it was scored on
/// - Fair fitness comparison when all agents share one layout
///
/// Serializes as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSeed([u8; 16]);

impl StreamSeed {
    /// Derives the seed for the `index`-th stream of an episode.
    ///
    /// Each index maps to a distinct, deterministic sub-seed, so a population
    /// of agents can face independent layouts that are still reproducible
    /// from one episode seed. Index 0 yields the seed itself.
    #[must_use]
    pub fn with_stream_index(self, index: u64) -> StreamSeed {
        const STREAM_MIX: u128 = 0x9e37_79b9_7f4a_7c15_f39c_c060_5ced_c835;
        let base = u128::from_be_bytes(self.0);
        let mixed = base.wrapping_add(STREAM_MIX.wrapping_mul(u128::from(index)));
        StreamSeed(mixed.to_be_bytes())
    }
}

impl Serialize for StreamSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for StreamSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `StreamSeed` values with `rng.random()`.
impl Distribution<StreamSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> StreamSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        StreamSeed(seed)
    }
}

/// Deterministic, time-gated sequence of pipes scrolling toward the bird.
///
/// The stream tracks ticks since the last spawn; when the counter reaches the
/// configured interval, a new pipe appears at the right edge with a gap
/// center drawn uniformly from `[gap_margin, playfield_height - gap_margin]`.
/// Every pipe moves left by `pipe_speed` per tick and is retired once it
/// falls past `despawn_x`. Insertion order is preserved, so the front of the
/// stream is always the leftmost surviving pipe.
#[derive(Debug, Clone)]
pub struct PipeStream {
    config: WorldConfig,
    rng: Pcg32,
    pipes: VecDeque<Pipe>,
    ticks_since_spawn: u32,
}

impl PipeStream {
    /// Creates a stream with a seed drawn from the thread-local generator.
    ///
    /// For deterministic pipe generation, use [`Self::with_seed`] instead.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but seeded for deterministic pipe generation.
    ///
    /// Fails on a malformed configuration; a stream never exists with
    /// constants that could make a later [`Self::advance`] misbehave.
    pub fn with_seed(config: WorldConfig, seed: StreamSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: Pcg32::from_seed(seed.0),
            pipes: VecDeque::new(),
            ticks_since_spawn: 0,
        })
    }

    /// Advances the stream by one tick.
    ///
    /// Spawns a pipe when the interval has elapsed, then scrolls and retires
    /// existing pipes. A freshly spawned pipe moves on the same tick, exactly
    /// like the ones already in flight.
    pub fn advance(&mut self) {
        self.ticks_since_spawn += 1;
        if self.ticks_since_spawn >= self.config.spawn_interval {
            let gap_center = self.rng.random_range(
                self.config.gap_margin..=self.config.playfield_height - self.config.gap_margin,
            );
            self.pipes.push_back(Pipe::new(
                self.config.playfield_width,
                gap_center,
                self.config.gap_height,
            ));
            self.ticks_since_spawn = 0;
        }

        for pipe in &mut self.pipes {
            pipe.shift_left(self.config.pipe_speed);
        }
        self.pipes.retain(|pipe| pipe.x() >= self.config.despawn_x);
    }

    /// The pipe with the smallest strictly positive distance ahead of `x`.
    ///
    /// A pipe exactly at `x` is not ahead. Returns `None` when no pipe is
    /// ahead of the bird.
    #[must_use]
    pub fn nearest_ahead(&self, x: f32) -> Option<&Pipe> {
        self.pipes
            .iter()
            .filter(|pipe| pipe.x() - x > 0.0)
            .min_by(|a, b| (a.x() - x).total_cmp(&(b.x() - x)))
    }

    /// Marks every not-yet-passed pipe behind `x` as passed.
    ///
    /// Returns the number of pipes newly marked this tick, so callers can
    /// credit pass rewards without re-scanning the stream.
    pub fn collect_passed(&mut self, x: f32) -> usize {
        let mut newly_passed = 0;
        for pipe in &mut self.pipes {
            if !pipe.is_passed() && pipe.x() < x {
                pipe.mark_passed();
                newly_passed += 1;
            }
        }
        newly_passed
    }

    /// Whether `bounds` intersects any pipe's top or bottom region.
    #[must_use]
    pub fn collides(&self, bounds: &Rect) -> bool {
        self.pipes.iter().any(|pipe| {
            bounds.intersects(&pipe.top_bounds(self.config.pipe_width))
                || bounds.intersects(
                    &pipe.bottom_bounds(self.config.pipe_width, self.config.playfield_height),
                )
        })
    }

    /// Pipes currently in flight, leftmost first.
    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }
}
