//! Sensory encoding: agent state plus the nearest pipe ahead, as a fixed
//! normalized vector.
//!
//! The encoding is part of the policy-compatibility contract: a trained
//! policy only transfers between implementations if the constants, the
//! element order, and the no-pipe fallbacks match exactly.

use oxiflap_engine::{Bird, Pipe};

use crate::config::EpisodeConfig;

/// Number of sensor elements a policy receives.
pub const SENSOR_LEN: usize = 4;

/// The policy input vector:
///
/// 1. bird vertical position / playfield height
/// 2. gap center of the nearest pipe ahead / playfield height (0.5 when no
///    pipe is ahead)
/// 3. horizontal distance to the nearest pipe ahead / lookahead normalizer
///    (1.0 when no pipe is ahead)
/// 4. bird velocity / velocity normalizer
pub type SensorVector = [f32; SENSOR_LEN];

/// Encodes the sensor vector for one agent. Pure function of its inputs.
#[must_use]
pub fn encode(bird: &Bird, nearest_ahead: Option<&Pipe>, config: &EpisodeConfig) -> SensorVector {
    let height = config.world.playfield_height;
    let velocity = bird.velocity() / config.velocity_normalizer;
    match nearest_ahead {
        Some(pipe) => [
            bird.y() / height,
            pipe.gap_center() / height,
            (pipe.x() - bird.x()) / config.lookahead_normalizer,
            velocity,
        ],
        None => [bird.y() / height, 0.5, 1.0, velocity],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_the_nearest_pipe() {
        let config = EpisodeConfig::default();
        let mut bird = Bird::new(200.0, 300.0);
        bird.flap(-7.0);
        let pipe = Pipe::new(350.0, 450.0, 150.0);

        let sensors = encode(&bird, Some(&pipe), &config);
        assert_eq!(sensors, [0.5, 0.75, 0.375, -0.7]);
    }

    #[test]
    fn falls_back_to_neutral_values_without_a_pipe() {
        let config = EpisodeConfig::default();
        let bird = Bird::new(200.0, 150.0);

        let sensors = encode(&bird, None, &config);
        assert_eq!(sensors, [0.25, 0.5, 1.0, 0.0]);
    }

    #[test]
    fn normalizers_come_from_the_configuration() {
        let config = EpisodeConfig {
            velocity_normalizer: 5.0,
            lookahead_normalizer: 100.0,
            ..EpisodeConfig::default()
        };
        let mut bird = Bird::new(200.0, 300.0);
        bird.flap(-10.0);
        let pipe = Pipe::new(250.0, 300.0, 150.0);

        let sensors = encode(&bird, Some(&pipe), &config);
        assert_eq!(sensors[2], 0.5);
        assert_eq!(sensors[3], -2.0);
    }
}
