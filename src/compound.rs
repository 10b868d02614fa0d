// Static registry of tire compound physical parameters

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::errors::PitwallError;

/// Physical operating parameters for a single tire compound.
///
/// The values describe how each compound behaves over a stint: how many laps
/// it is expected to last, the carcass temperature window where the rubber
/// grips best, how quickly it degrades relative to the reference compound,
/// the cold pressure band it should be set to, and how prone it is to
/// graining when pushed outside its window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompoundSpec {
    /// Sidewall marking color, as the pit-lane cameras see it
    pub color: &'static str,
    /// Expected usable stint length in laps
    pub expected_life: u32,
    /// Optimal carcass temperature window in Celsius
    pub optimal_temp_range: (i32, i32),
    /// Degradation per lap relative to the reference compound
    pub degradation_rate: f32,
    /// Target cold pressure band in PSI
    pub pressure_range: (f32, f32),
    /// Base probability of graining under adverse conditions
    pub graining_susceptibility: f64,
}

const SOFT_SPEC: CompoundSpec = CompoundSpec {
    color: "red",
    expected_life: 22,
    optimal_temp_range: (95, 105),
    degradation_rate: 1.8,
    pressure_range: (19.5, 21.0),
    graining_susceptibility: 0.7,
};

const MEDIUM_SPEC: CompoundSpec = CompoundSpec {
    color: "yellow",
    expected_life: 32,
    optimal_temp_range: (100, 110),
    degradation_rate: 1.2,
    pressure_range: (19.0, 21.5),
    graining_susceptibility: 0.4,
};

const HARD_SPEC: CompoundSpec = CompoundSpec {
    color: "white",
    expected_life: 45,
    optimal_temp_range: (105, 115),
    degradation_rate: 0.8,
    pressure_range: (18.5, 21.0),
    graining_susceptibility: 0.3,
};

const INTERMEDIATE_SPEC: CompoundSpec = CompoundSpec {
    color: "green",
    expected_life: 15,
    optimal_temp_range: (85, 95),
    degradation_rate: 2.0,
    pressure_range: (18.0, 20.0),
    graining_susceptibility: 0.5,
};

const WET_SPEC: CompoundSpec = CompoundSpec {
    color: "blue",
    expected_life: 10,
    optimal_temp_range: (75, 85),
    degradation_rate: 2.5,
    pressure_range: (17.5, 19.5),
    graining_susceptibility: 0.3,
};

/// Tire rubber formulation fitted to the car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
}

impl Compound {
    pub const ALL: [Compound; 5] = [
        Compound::Soft,
        Compound::Medium,
        Compound::Hard,
        Compound::Intermediate,
        Compound::Wet,
    ];

    /// Returns the physical parameters for this compound. The registry is
    /// total: every compound has exactly one spec.
    pub fn spec(&self) -> &'static CompoundSpec {
        match self {
            Compound::Soft => &SOFT_SPEC,
            Compound::Medium => &MEDIUM_SPEC,
            Compound::Hard => &HARD_SPEC,
            Compound::Intermediate => &INTERMEDIATE_SPEC,
            Compound::Wet => &WET_SPEC,
        }
    }

    /// Parses a compound label received from an external collaborator, such
    /// as the vision service or a stored record. Matching is case-insensitive
    /// and ignores surrounding whitespace; anything else is rejected.
    pub fn from_label(label: &str) -> Result<Self, PitwallError> {
        match label.trim().to_lowercase().as_str() {
            "soft" => Ok(Compound::Soft),
            "medium" => Ok(Compound::Medium),
            "hard" => Ok(Compound::Hard),
            "intermediate" => Ok(Compound::Intermediate),
            "wet" => Ok(Compound::Wet),
            _ => Err(PitwallError::UnknownCompound {
                label: label.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Compound::Soft => "soft",
            Compound::Medium => "medium",
            Compound::Hard => "hard",
            Compound::Intermediate => "intermediate",
            Compound::Wet => "wet",
        }
    }
}

impl Display for Compound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
