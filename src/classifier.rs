// Strategy prediction capabilities: the rule oracle and the serving-time
// approximation that stands in for the offline-trained model

use serde::{Deserialize, Serialize};

use crate::compound::Compound;
use crate::errors::PitwallError;
use crate::features::DerivedFeatures;
use crate::record::TireState;
use crate::strategy::{self, Strategy};

/// Outcome of a strategy prediction, shaped like the pit-wall report: the
/// label, how sure the classifier is, and the two headline numbers the
/// strategists read first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub strategy: Strategy,
    /// Classifier confidence in [0, 1]
    pub confidence: f32,
    pub risk_score: f32,
    pub lap_percentage: f32,
}

/// Capability interface for anything that can turn a complete tire record
/// into a strategy call. The rule cascade is the ground truth; trained
/// models plug in behind the same seam so reports and tests can swap them
/// without caring which one answered.
pub trait StrategyClassifier {
    fn predict(&self, state: &TireState) -> Result<Prediction, PitwallError>;
}

/// The rule cascade exposed as a classifier. Always answers with full
/// confidence because the cascade is the definition of correct.
pub struct RuleClassifier;

impl StrategyClassifier for RuleClassifier {
    fn predict(&self, state: &TireState) -> Result<Prediction, PitwallError> {
        state.validate()?;
        let features = DerivedFeatures::from_state(state);
        Ok(Prediction {
            strategy: strategy::decide(state),
            confidence: 1.0,
            risk_score: features.risk_score,
            lap_percentage: features.lap_percentage,
        })
    }
}

/// Threshold approximation of the cascade, standing in the slot the
/// offline-trained model occupies at serving time.
///
/// The splits mirror what a tree ensemble learns from generated data: the
/// hard safety triggers reproduce exactly, the softer calls go through
/// derived-feature thresholds instead of the cascade's per-compound windows.
/// The two classifiers are deliberately not equivalent; tests compare their
/// agreement rate instead of assuming it.
pub struct RiskProfileClassifier;

impl StrategyClassifier for RiskProfileClassifier {
    fn predict(&self, state: &TireState) -> Result<Prediction, PitwallError> {
        state.validate()?;
        let features = DerivedFeatures::from_state(state);

        let (strategy, confidence) = if state.sidewall_deformation
            || state.tyre_pressure < 17.0
            || state.tyre_pressure > 24.0
            || features.lap_percentage >= 1.0
        {
            (Strategy::PitNow, 0.98)
        } else if features.lap_percentage >= 0.85 {
            (Strategy::PitSoon, 0.93)
        } else if features.wear_severity >= 2 && features.lap_percentage > 0.75 {
            (Strategy::PitSoon, 0.85)
        } else if state.is_graining && state.compound == Compound::Soft && state.lap_number > 15 {
            (Strategy::PitSoon, 0.77)
        } else if state.tyre_temperature > 120 {
            (Strategy::PitSoon, 0.74)
        } else if features.lap_percentage < 0.60
            && features.wear_severity == 0
            && !state.is_graining
            && features.is_pressure_optimal
            && features.is_temp_optimal
        {
            (Strategy::Push, 0.88)
        } else if features.lap_percentage > 0.70 && features.lap_percentage < 0.85 {
            (Strategy::Conserve, 0.86)
        } else if state.track_temperature > 40 {
            (Strategy::Conserve, 0.79)
        } else if state.is_graining && state.lap_number < 12 {
            (Strategy::Conserve, 0.81)
        } else {
            (Strategy::Monitor, 0.72)
        };

        Ok(Prediction {
            strategy,
            confidence,
            risk_score: features.risk_score,
            lap_percentage: features.lap_percentage,
        })
    }
}

/// Fraction of records two classifiers label identically. An empty batch
/// counts as full agreement.
pub fn agreement_rate(
    reference: &dyn StrategyClassifier,
    candidate: &dyn StrategyClassifier,
    states: &[TireState],
) -> Result<f64, PitwallError> {
    if states.is_empty() {
        return Ok(1.0);
    }
    let mut agreed = 0usize;
    for state in states {
        if reference.predict(state)?.strategy == candidate.predict(state)?.strategy {
            agreed += 1;
        }
    }
    Ok(agreed as f64 / states.len() as f64)
}
