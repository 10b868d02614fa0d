// Derived feature computation shared by dataset generation and serving

use serde::{Deserialize, Serialize};

use crate::record::{TireState, WearPattern};

/// Simplified optimal bands used for the feature flags. These are fleet-wide
/// engineering targets, intentionally coarser than the per-compound windows
/// the rule cascade consults.
pub const OPTIMAL_PRESSURE_RANGE: (f32, f32) = (19.0, 21.5);
pub const OPTIMAL_TEMPERATURE_RANGE: (i32, i32) = (95, 115);

/// How alarming each wear placement is, on a 0 to 4 scale. Shoulder wear
/// points at camber or toe, crown wear at chronic overinflation, and uneven
/// wear at flat spots or damage.
fn wear_severity(pattern: WearPattern) -> u8 {
    match pattern {
        WearPattern::Even => 0,
        WearPattern::Inner => 2,
        WearPattern::Outer => 2,
        WearPattern::Center => 3,
        WearPattern::Uneven => 4,
    }
}

/// Features derived from a raw tire record. Every field is a pure function
/// of the record, so recomputing them always reproduces the stored values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    /// Expected usable stint length for the fitted compound, in laps
    pub expected_life: u32,
    /// Fraction of the expected life already used. Exceeds 1.0 when a stint
    /// runs past the compound's design life.
    pub lap_percentage: f32,
    /// Carcass temperature minus track temperature, in Celsius
    pub temp_differential: i32,
    pub is_pressure_optimal: bool,
    pub is_temp_optimal: bool,
    /// Wear placement severity, 0 (even) to 4 (uneven)
    pub wear_severity: u8,
    /// Weighted hazard score; higher is worse. Unbounded above by design
    /// since stints can run arbitrarily far past the compound's life.
    pub risk_score: f32,
}

impl DerivedFeatures {
    pub fn from_state(state: &TireState) -> Self {
        let spec = state.compound.spec();
        let expected_life = spec.expected_life;
        let lap_percentage = state.lap_number as f32 / expected_life as f32;
        let temp_differential = state.tyre_temperature - state.track_temperature;
        let is_pressure_optimal = state.tyre_pressure >= OPTIMAL_PRESSURE_RANGE.0
            && state.tyre_pressure <= OPTIMAL_PRESSURE_RANGE.1;
        let is_temp_optimal = state.tyre_temperature >= OPTIMAL_TEMPERATURE_RANGE.0
            && state.tyre_temperature <= OPTIMAL_TEMPERATURE_RANGE.1;
        let wear_severity = wear_severity(state.wear_pattern);

        let mut risk_score = lap_percentage * 40.0 + f32::from(wear_severity) * 10.0;
        if state.sidewall_deformation {
            risk_score += 50.0;
        }
        if state.is_graining {
            risk_score += 15.0;
        }
        if !is_pressure_optimal {
            risk_score += 10.0;
        }
        if !is_temp_optimal {
            risk_score += 5.0;
        }

        DerivedFeatures {
            expected_life,
            lap_percentage,
            temp_differential,
            is_pressure_optimal,
            is_temp_optimal,
            wear_severity,
            risk_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compound::Compound;

    fn baseline_state() -> TireState {
        TireState {
            compound: Compound::Soft,
            lap_number: 11,
            wear_pattern: WearPattern::Even,
            sidewall_deformation: false,
            tyre_pressure: 20.0,
            is_graining: false,
            tyre_temperature: 100,
            track_temperature: 30,
        }
    }

    #[test]
    fn test_features_for_healthy_mid_stint_tire() {
        let features = DerivedFeatures::from_state(&baseline_state());
        assert_eq!(features.expected_life, 22);
        assert_eq!(features.lap_percentage, 0.5);
        assert_eq!(features.temp_differential, 70);
        assert!(features.is_pressure_optimal);
        assert!(features.is_temp_optimal);
        assert_eq!(features.wear_severity, 0);
        assert_eq!(features.risk_score, 20.0);
    }

    #[test]
    fn test_risk_score_accumulates_every_hazard() {
        let state = TireState {
            compound: Compound::Soft,
            lap_number: 22,
            wear_pattern: WearPattern::Uneven,
            sidewall_deformation: true,
            tyre_pressure: 16.0,
            is_graining: true,
            tyre_temperature: 130,
            track_temperature: 45,
        };
        let features = DerivedFeatures::from_state(&state);
        // 1.0 * 40 + 4 * 10 + 50 + 15 + 10 + 5
        assert_eq!(features.risk_score, 160.0);
        assert!(!features.is_pressure_optimal);
        assert!(!features.is_temp_optimal);
    }

    #[test]
    fn test_lap_percentage_exceeds_one_past_design_life() {
        let mut state = baseline_state();
        state.compound = Compound::Wet;
        state.lap_number = 12;
        let features = DerivedFeatures::from_state(&state);
        assert!(features.lap_percentage > 1.0);
        assert_eq!(features.expected_life, 10);
    }

    #[test]
    fn test_optimal_band_edges_are_inclusive() {
        let mut state = baseline_state();
        state.tyre_pressure = 19.0;
        state.tyre_temperature = 115;
        let features = DerivedFeatures::from_state(&state);
        assert!(features.is_pressure_optimal);
        assert!(features.is_temp_optimal);

        state.tyre_pressure = 21.6;
        state.tyre_temperature = 94;
        let features = DerivedFeatures::from_state(&state);
        assert!(!features.is_pressure_optimal);
        assert!(!features.is_temp_optimal);
    }

    #[test]
    fn test_wear_severity_ordering() {
        assert_eq!(wear_severity(WearPattern::Even), 0);
        assert_eq!(wear_severity(WearPattern::Inner), 2);
        assert_eq!(wear_severity(WearPattern::Outer), 2);
        assert_eq!(wear_severity(WearPattern::Center), 3);
        assert_eq!(wear_severity(WearPattern::Uneven), 4);
    }

    #[test]
    fn test_negative_temp_differential_is_preserved() {
        let mut state = baseline_state();
        state.tyre_temperature = 25;
        state.track_temperature = 40;
        let features = DerivedFeatures::from_state(&state);
        assert_eq!(features.temp_differential, -15);
    }
}
