// crates/rbcm-sim/src/outcome.rs
//
// Bernoulli outcome model for simulated feedback.

use rand::Rng;
use serde::{Deserialize, Serialize};

use rbcm_core::RbcmError;

/// Success probabilities for the two simulation regimes.
///
/// Deserialization goes through `OutcomeModel::new`, so a serialized model
/// with a probability outside [0, 1] is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OutcomeModelParams")]
pub struct OutcomeModel {
    normal_success_probability: f64,
    rogue_success_probability: f64,
}

#[derive(Deserialize)]
struct OutcomeModelParams {
    normal_success_probability: f64,
    rogue_success_probability: f64,
}

impl TryFrom<OutcomeModelParams> for OutcomeModel {
    type Error = RbcmError;

    fn try_from(params: OutcomeModelParams) -> Result<Self, Self::Error> {
        Self::new(
            params.normal_success_probability,
            params.rogue_success_probability,
        )
    }
}

impl OutcomeModel {
    /// Build a model, rejecting probabilities outside [0, 1].
    pub fn new(normal: f64, rogue: f64) -> Result<Self, RbcmError> {
        for (name, p) in [("normal", normal), ("rogue", rogue)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(RbcmError::Validation(format!(
                    "{} success probability must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(Self {
            normal_success_probability: normal,
            rogue_success_probability: rogue,
        })
    }

    /// Probability of a successful interaction under the given regime.
    pub fn success_probability(&self, rogue: bool) -> f64 {
        if rogue {
            self.rogue_success_probability
        } else {
            self.normal_success_probability
        }
    }

    /// Draw one outcome. `true` means success.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, rogue: bool) -> bool {
        rng.gen_bool(self.success_probability(rogue))
    }
}

impl Default for OutcomeModel {
    fn default() -> Self {
        Self {
            normal_success_probability: 0.95,
            rogue_success_probability: 0.20,
        }
    }
}
