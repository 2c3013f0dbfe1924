//! Evaluation harness: scoring decision policies over full episodes.
//!
//! This crate sits between the simulation engine (`oxiflap-engine`) and an
//! external evolutionary optimizer. It runs a population of candidate
//! controllers through the game in lockstep and reports a fitness score per
//! agent:
//!
//! 1. **Sensory encoding** ([`sensor`]) - maps agent state plus the nearest
//!    pipe ahead into a fixed 4-element normalized vector.
//! 2. **Decision policy** ([`policy`]) - the external controller interface:
//!    sensor vector in, output vector out, element 0 is the flap signal.
//!    Consumed here, never constructed.
//! 3. **Episode harness** ([`episode`]) - N agents, each with its own bird
//!    and seeded pipe stream, stepped synchronously until every agent is
//!    dead; fitness accrues per tick survived and per pipe passed.
//!
//! # Architecture
//!
//! ```text
//! Episode harness (lockstep tick loop)
//!     ↓ per live agent, per tick
//! Sensory encoding (4-element vector)
//!     ↓ fed to
//! Decision policy (external: optimizer-supplied)
//!     ↓ flap signal
//! Bird physics + pipe stream (oxiflap-engine)
//!     ↓ at episode end
//! Fitness report (per original agent index)
//! ```
//!
//! # Determinism
//!
//! All randomness lives in the pipe streams and is derived from one episode
//! seed, so an episode is a pure function of (configuration, policies, seed,
//! seeding mode). The tick loop is single-threaded and synchronous: no policy
//! ever observes another agent's state.
//!
//! # Failure semantics
//!
//! The tick loop itself cannot fail. The two error classes are construction
//! time ([`config::EpisodeSetupError`]) and a policy returning output of the
//! wrong shape ([`policy::PolicyContractViolation`]), which aborts the
//! episode rather than being silently treated as "no flap".

pub mod config;
pub mod episode;
pub mod policy;
pub mod sensor;
