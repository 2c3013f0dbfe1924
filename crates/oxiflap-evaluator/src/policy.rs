//! The decision-policy interface consumed by the episode harness.
//!
//! Policies are supplied per agent by an external optimizer; the harness
//! never constructs or mutates one, it only invokes it once per tick with
//! that agent's own sensor vector.

use crate::sensor::SensorVector;

/// A feed-forward controller: sensor vector in, output vector out.
///
/// The output must contain at least one element; element 0 is interpreted as
/// the flap-decision signal and compared against the configured threshold.
/// Outputs of the wrong shape are a [`PolicyContractViolation`], not a
/// silent "no flap".
pub trait DecisionPolicy {
    fn activate(&self, sensors: &SensorVector) -> Vec<f32>;
}

/// Closures work as policies, which keeps tests and ad-hoc controllers cheap.
impl<F> DecisionPolicy for F
where
    F: Fn(&SensorVector) -> Vec<f32>,
{
    fn activate(&self, sensors: &SensorVector) -> Vec<f32> {
        self(sensors)
    }
}

/// A policy returned output the harness cannot interpret.
///
/// This is a configuration error on the optimizer's side, so it aborts the
/// episode immediately instead of being retried or defaulted.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PolicyContractViolation {
    #[display("agent {agent}: policy returned an empty output vector")]
    EmptyOutput { agent: usize },
    #[display("agent {agent}: policy flap signal is not a finite number ({value})")]
    NonFiniteSignal { agent: usize, value: f32 },
}
