//! World simulation built on the core primitives.
//!
//! This module assembles the core data structures into the obstacle-game
//! simulation:
//!
//! - [`WorldConfig`] - Injected simulation constants (validated once)
//! - [`PipeStream`] - Deterministic, time-gated pipe generation
//! - [`StreamSeed`] - Seed for reproducible pipe sequences
//! - [`World`] - Single-agent world with score and game-over tracking
//!
//! # Simulation flow
//!
//! One tick of a [`World`]:
//!
//! 1. Flap if requested (velocity reset, before gravity)
//! 2. Gravity integrates into velocity, velocity into position
//! 3. The pipe stream advances (spawn, scroll, retire)
//! 4. Newly passed pipes are scored
//! 5. Death check: out of bounds or pipe collision
//!
//! The population harness in `oxiflap-evaluator` drives one bird and one
//! stream per agent through the same ordering in lockstep.

pub use self::{config::*, pipe_stream::*, world::*};

mod config;
mod pipe_stream;
mod world;
