use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Simulation constants, injected into every world and episode.
///
/// Nothing in the engine hardcodes these values: they are validated once at
/// construction and then read-only for the lifetime of a world or episode,
/// which keeps deterministic tests with alternate values cheap.
///
/// The defaults reproduce the classic tuning: a 400x600 playfield at 60
/// ticks per second, with a pipe spawned every 1500 ms.
///
/// # Example
///
/// ```
/// use oxiflap_engine::WorldConfig;
///
/// let config = WorldConfig {
///     gravity: 0.5,
///     ..WorldConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Right edge of the playfield, where new pipes spawn.
    pub playfield_width: f32,
    /// Vertical extent of the playfield; leaving `[0, playfield_height]` kills.
    pub playfield_height: f32,
    /// Added to the bird's velocity every tick.
    pub gravity: f32,
    /// The bird's velocity is set to this (negative, upward) value on flap.
    pub flap_strength: f32,
    /// Horizontal distance every pipe travels per tick.
    pub pipe_speed: f32,
    /// Collision width of a pipe pair.
    pub pipe_width: f32,
    /// Fixed vertical size of the gap between a pipe pair.
    pub gap_height: f32,
    /// Gap centers are drawn uniformly from
    /// `[gap_margin, playfield_height - gap_margin]`.
    pub gap_margin: f32,
    /// Ticks between pipe spawns.
    pub spawn_interval: u32,
    /// Pipes whose position falls below this are retired from the stream.
    pub despawn_x: f32,
    /// Bird bounding box width.
    pub bird_width: f32,
    /// Bird bounding box height.
    pub bird_height: f32,
    /// The bird's fixed horizontal position.
    pub bird_start_x: f32,
    /// The bird's initial vertical position.
    pub bird_start_y: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            playfield_width: 400.0,
            playfield_height: 600.0,
            gravity: 0.25,
            flap_strength: -7.0,
            pipe_speed: 3.0,
            pipe_width: 50.0,
            gap_height: 150.0,
            gap_margin: 100.0,
            spawn_interval: 90,
            despawn_x: -50.0,
            bird_width: 30.0,
            bird_height: 30.0,
            bird_start_x: 200.0,
            bird_start_y: 300.0,
        }
    }
}

impl WorldConfig {
    /// Checks every constant once, before any simulation state is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(v: f32) -> bool {
            v.is_finite() && v > 0.0
        }

        if !positive(self.playfield_width) || !positive(self.playfield_height) {
            return Err(ConfigError::InvalidPlayfield);
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidGravity);
        }
        if !self.flap_strength.is_finite() {
            return Err(ConfigError::InvalidFlapStrength);
        }
        if !positive(self.pipe_speed) {
            return Err(ConfigError::InvalidPipeSpeed);
        }
        if !positive(self.pipe_width) {
            return Err(ConfigError::InvalidPipeWidth);
        }
        if !positive(self.gap_height)
            || !self.gap_margin.is_finite()
            || self.gap_margin < 0.0
            || self.gap_margin * 2.0 > self.playfield_height
        {
            return Err(ConfigError::GapDoesNotFit);
        }
        if self.spawn_interval == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        if !positive(self.bird_width) || !positive(self.bird_height) {
            return Err(ConfigError::InvalidBirdSize);
        }
        if !self.bird_start_x.is_finite()
            || !self.bird_start_y.is_finite()
            || self.bird_start_y < 0.0
            || self.bird_start_y > self.playfield_height
        {
            return Err(ConfigError::BirdStartOutOfBounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_playfield() {
        let config = WorldConfig {
            playfield_height: 0.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlayfield)
        ));
    }

    #[test]
    fn rejects_non_finite_gravity() {
        let config = WorldConfig {
            gravity: f32::NAN,
            ..WorldConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGravity)));
    }

    #[test]
    fn rejects_margin_wider_than_playfield() {
        let config = WorldConfig {
            gap_margin: 400.0,
            ..WorldConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::GapDoesNotFit)));
    }

    #[test]
    fn accepts_degenerate_margin_that_pins_the_gap() {
        // margin * 2 == playfield_height collapses the gap center range to a
        // single value, which is still a valid (deterministic) layout.
        let config = WorldConfig {
            gap_margin: 300.0,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_flap_strength() {
        let config = WorldConfig {
            flap_strength: f32::NAN,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFlapStrength)
        ));
    }

    #[test]
    fn rejects_non_positive_pipe_speed() {
        let config = WorldConfig {
            pipe_speed: 0.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPipeSpeed)
        ));
    }

    #[test]
    fn rejects_negative_pipe_width() {
        let config = WorldConfig {
            pipe_width: -1.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPipeWidth)
        ));
    }

    #[test]
    fn rejects_zero_sized_bird() {
        let config = WorldConfig {
            bird_height: 0.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBirdSize)
        ));
    }

    #[test]
    fn rejects_bird_starting_outside_the_playfield() {
        let config = WorldConfig {
            bird_start_y: 700.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BirdStartOutOfBounds)
        ));
    }

    #[test]
    fn rejects_zero_spawn_interval() {
        let config = WorldConfig {
            spawn_interval: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSpawnInterval)
        ));
    }

    #[test]
    fn zero_gravity_is_valid() {
        let config = WorldConfig {
            gravity: 0.0,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn roundtrips_through_json() {
        let config = WorldConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
