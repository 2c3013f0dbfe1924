//! Episode-level configuration: rewards, the flap threshold, and sensor
//! normalizers, layered on the engine's world constants.

use oxiflap_engine::{ConfigError, WorldConfig};
use serde::{Deserialize, Serialize};

/// Rejected episode configuration, surfaced at harness construction.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EpisodeSetupError {
    #[display("invalid world configuration: {_0}")]
    World(ConfigError),
    #[display("rewards must be finite and non-negative")]
    InvalidReward,
    #[display("flap threshold must be a finite number")]
    InvalidThreshold,
    #[display("sensor normalizers must be positive and finite")]
    InvalidNormalizer,
}

/// Constants for one population evaluation.
///
/// Like [`WorldConfig`], everything here is injected and validated once so
/// tests can run with alternate values. The defaults award 0.1 per tick
/// survived and 1.0 per pipe passed, and flap when the policy's first output
/// exceeds 0.5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Simulation constants shared by every agent's world.
    pub world: WorldConfig,
    /// Fitness awarded per tick survived (accrued even on the death tick).
    pub survival_reward: f32,
    /// Fitness awarded per pipe passed.
    pub pass_reward: f32,
    /// Flap iff the policy's first output strictly exceeds this.
    pub flap_threshold: f32,
    /// Divisor for the distance-to-pipe sensor (playfield width by default).
    pub lookahead_normalizer: f32,
    /// Divisor for the velocity sensor.
    pub velocity_normalizer: f32,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            survival_reward: 0.1,
            pass_reward: 1.0,
            flap_threshold: 0.5,
            lookahead_normalizer: 400.0,
            velocity_normalizer: 10.0,
        }
    }
}

impl EpisodeConfig {
    pub fn validate(&self) -> Result<(), EpisodeSetupError> {
        self.world.validate()?;
        for reward in [self.survival_reward, self.pass_reward] {
            if !reward.is_finite() || reward < 0.0 {
                return Err(EpisodeSetupError::InvalidReward);
            }
        }
        if !self.flap_threshold.is_finite() {
            return Err(EpisodeSetupError::InvalidThreshold);
        }
        for normalizer in [self.lookahead_normalizer, self.velocity_normalizer] {
            if !normalizer.is_finite() || normalizer <= 0.0 {
                return Err(EpisodeSetupError::InvalidNormalizer);
            }
        }
        Ok(())
    }
}
