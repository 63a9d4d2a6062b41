// crates/rbcm-core/src/scoring.rs
//
// Trust-score update formula.
//
// Reward scales inversely with the distance the feedback travelled and is
// amplified by the node's current reliability; the failure penalty scales
// directly with reliability, so highly trusted nodes lose more per failure.
//
//   rdf      = e^(current / 100)
//   gradient = 1 / (1 + log10(distance + 1))
//   success: current + 5 * gradient * (1 + rdf / 10)
//   failure: current - 2 * rdf

use serde::{Deserialize, Serialize};

use crate::error::RbcmError;
use crate::node::{MAX_SCORE, MIN_SCORE};

/// Clamp a raw score into [MIN_SCORE, MAX_SCORE].
pub fn clamp_score(raw: f64) -> f64 {
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Pure score calculator. Produces an unclamped score; callers clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCalculator {
    /// Base reward applied on success before gradient/reliability weighting.
    pub reward_scale: f64,
    /// Multiplier on the reliability term applied on failure.
    pub penalty_scale: f64,
    /// Divisor damping the reliability bonus on success.
    pub reliability_damping: f64,
}

impl ScoreCalculator {
    pub fn new() -> Self {
        Self {
            reward_scale: 5.0,
            penalty_scale: 2.0,
            reliability_damping: 10.0,
        }
    }

    /// Reliability term (RDF): `e^(score / 100)`.
    pub fn reliability(current: f64) -> f64 {
        (current / 100.0).exp()
    }

    /// Reward weighting for feedback attributed at `distance`.
    ///
    /// Returns a Domain error when `distance` is not finite, when
    /// `distance <= -1` (non-positive logarithm argument), or when the
    /// denominator `1 + log10(distance + 1)` is not positive, which puts a
    /// pole at `distance = -0.9`.
    pub fn gradient(distance: f64) -> Result<f64, RbcmError> {
        if !distance.is_finite() || distance <= -1.0 {
            return Err(RbcmError::Domain(format!(
                "distance must be finite and greater than -1, got {}",
                distance
            )));
        }
        let denominator = 1.0 + (distance + 1.0).log10();
        if denominator <= 0.0 {
            return Err(RbcmError::Domain(format!(
                "distance must be greater than -0.9, got {}",
                distance
            )));
        }
        let gradient = 1.0 / denominator;
        if !gradient.is_finite() {
            return Err(RbcmError::Domain(format!(
                "gradient is not finite at distance {}",
                distance
            )));
        }
        Ok(gradient)
    }

    /// Compute the new (unclamped) score after one feedback signal.
    ///
    /// # Arguments
    /// * `current` - The node's current score.
    /// * `success` - Whether the observed interaction succeeded.
    /// * `distance` - How far the feedback travelled (1 for direct feedback).
    pub fn compute(&self, current: f64, success: bool, distance: f64) -> Result<f64, RbcmError> {
        if !current.is_finite() {
            return Err(RbcmError::Domain(format!(
                "current score must be finite, got {}",
                current
            )));
        }
        // Distance is validated on both branches.
        let gradient = Self::gradient(distance)?;
        let rdf = Self::reliability(current);

        let new_score = if success {
            current + self.reward_scale * gradient * (1.0 + rdf / self.reliability_damping)
        } else {
            current - self.penalty_scale * rdf
        };
        if !new_score.is_finite() {
            return Err(RbcmError::Domain(format!(
                "score update is not finite (current={}, distance={})",
                current, distance
            )));
        }
        Ok(new_score)
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}
