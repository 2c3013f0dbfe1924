pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected simulation constants, reported at world or episode construction.
///
/// Constants are injected rather than hardcoded, so every combination has to
/// be checked once up front. None of these errors is recoverable.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("playfield dimensions must be positive and finite")]
    InvalidPlayfield,
    #[display("gravity must be a finite number")]
    InvalidGravity,
    #[display("flap strength must be a finite number")]
    InvalidFlapStrength,
    #[display("pipe speed must be positive and finite")]
    InvalidPipeSpeed,
    #[display("pipe width must be positive and finite")]
    InvalidPipeWidth,
    #[display("gap height and margins must fit inside the playfield")]
    GapDoesNotFit,
    #[display("spawn interval must be at least one tick")]
    ZeroSpawnInterval,
    #[display("bird size must be positive and finite")]
    InvalidBirdSize,
    #[display("bird start position must be inside the playfield")]
    BirdStartOutOfBounds,
}
