use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use chrono::{DateTime, Utc};
use oxiflap_evaluator::{
    policy::DecisionPolicy,
    sensor::{SENSOR_LEN, SensorVector},
};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Serialized form of a trained policy, saved at the end of a training run
/// and reloaded for replay.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub fitness: f32,
    pub weights: [f32; SENSOR_LEN],
    pub bias: f32,
}

impl PolicyModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open policy model file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to read policy model file: {}", path.display()))?;

        Ok(model)
    }

    pub fn to_policy(&self) -> LinearPolicy {
        LinearPolicy {
            weights: self.weights,
            bias: self.bias,
        }
    }
}

/// A single sigmoid neuron over the sensor vector.
///
/// The simplest controller that can thread pipes: the optimizer searches
/// its weight space directly, no network topology involved.
#[derive(Debug, Clone)]
pub struct LinearPolicy {
    weights: [f32; SENSOR_LEN],
    bias: f32,
}

impl LinearPolicy {
    /// Samples weights and bias from the standard normal distribution.
    pub fn from_rng<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut weights = [0.0; SENSOR_LEN];
        for weight in &mut weights {
            *weight = rng.sample(StandardNormal);
        }
        Self {
            weights,
            bias: rng.sample(StandardNormal),
        }
    }

    #[must_use]
    pub fn weights(&self) -> [f32; SENSOR_LEN] {
        self.weights
    }

    #[must_use]
    pub fn bias(&self) -> f32 {
        self.bias
    }
}

impl DecisionPolicy for LinearPolicy {
    fn activate(&self, sensors: &SensorVector) -> Vec<f32> {
        let sum = self
            .weights
            .iter()
            .zip(sensors)
            .map(|(w, s)| w * s)
            .sum::<f32>()
            + self.bias;
        let sigmoid = 1.0 / (1.0 + (-sum).exp());
        vec![sigmoid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_is_a_single_value_in_the_unit_interval() {
        let mut rng = rand::rng();
        let policy = LinearPolicy::from_rng(&mut rng);
        let output = policy.activate(&[0.5, 0.5, 1.0, 0.0]);
        assert_eq!(output.len(), 1);
        assert!(output[0] > 0.0 && output[0] < 1.0);
    }

    #[test]
    fn model_roundtrips_through_json() {
        let model = PolicyModel {
            name: "linear".to_owned(),
            trained_at: Utc::now(),
            fitness: 12.5,
            weights: [0.1, -0.2, 0.3, -0.4],
            bias: 0.05,
        };
        let json = serde_json::to_string(&model).unwrap();
        let parsed: PolicyModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.weights, model.weights);
        assert_eq!(parsed.bias, model.bias);
        assert_eq!(parsed.fitness, model.fitness);
    }

    #[test]
    fn reconstructed_policy_matches_the_saved_weights() {
        let model = PolicyModel {
            name: "linear".to_owned(),
            trained_at: Utc::now(),
            fitness: 0.0,
            weights: [1.0, 0.0, 0.0, 0.0],
            bias: 0.0,
        };
        let policy = model.to_policy();
        // sigmoid(1.0 * 0.0) == 0.5
        assert_eq!(policy.activate(&[0.0, 9.0, 9.0, 9.0])[0], 0.5);
    }
}
