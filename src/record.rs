// Tire observation records exchanged with the pit-lane collaborators

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::compound::Compound;
use crate::errors::PitwallError;

/// Physical bounds for sensor channels. Values outside these ranges indicate
/// a broken sensor or a corrupted record, not an unusual stint.
pub const PRESSURE_DOMAIN: (f32, f32) = (0.0, 50.0);
pub const TEMPERATURE_DOMAIN: (i32, i32) = (-40, 200);

/// Rounds a pressure reading to the gauge resolution of 0.1 PSI.
pub(crate) fn round_to_tenth(psi: f32) -> f32 {
    (psi * 10.0).round() / 10.0
}

/// Where tread wear is concentrated across the contact patch, as graded by
/// the pit-lane cameras.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WearPattern {
    Even,
    Inner,
    Outer,
    Center,
    Uneven,
}

impl WearPattern {
    pub const ALL: [WearPattern; 5] = [
        WearPattern::Even,
        WearPattern::Inner,
        WearPattern::Outer,
        WearPattern::Center,
        WearPattern::Uneven,
    ];

    /// Strict label parsing for the classification path. The rule cascade
    /// refuses to label a record it cannot fully interpret.
    pub fn from_label(label: &str) -> Result<Self, PitwallError> {
        Self::from_label_lossy(label).ok_or_else(|| PitwallError::UnknownWearPattern {
            label: label.to_string(),
        })
    }

    /// Lenient label parsing for the sensor estimator. Camera wear grades are
    /// fuzzier than compound markings, so an unrecognized grade falls back to
    /// `None` and the caller substitutes mid-range estimation bands.
    pub fn from_label_lossy(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "even" => Some(WearPattern::Even),
            "inner" => Some(WearPattern::Inner),
            "outer" => Some(WearPattern::Outer),
            "center" => Some(WearPattern::Center),
            "uneven" => Some(WearPattern::Uneven),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WearPattern::Even => "even",
            WearPattern::Inner => "inner",
            WearPattern::Outer => "outer",
            WearPattern::Center => "center",
            WearPattern::Uneven => "uneven",
        }
    }
}

impl Display for WearPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A complete tire observation for one lap of a stint. This is the unit the
/// rule cascade, the feature computer, and the generator all operate on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TireState {
    pub compound: Compound,
    /// Lap count on this tire set, starting at 1
    pub lap_number: u32,
    pub wear_pattern: WearPattern,
    /// Visible sidewall bulge or distortion
    pub sidewall_deformation: bool,
    /// Hot pressure in PSI at gauge resolution
    pub tyre_pressure: f32,
    /// Surface graining visible on the tread
    pub is_graining: bool,
    /// Carcass temperature in Celsius
    pub tyre_temperature: i32,
    /// Track surface temperature in Celsius
    pub track_temperature: i32,
}

impl TireState {
    /// Checks every sensor channel against its physical domain. Lap numbers
    /// start at 1; pressure and temperatures must stay within sensor bounds.
    pub fn validate(&self) -> Result<(), PitwallError> {
        if self.lap_number < 1 {
            return Err(PitwallError::ValueOutOfRange {
                field: "lap_number",
                value: f64::from(self.lap_number),
                min: 1.0,
                max: f64::from(u32::MAX),
            });
        }
        if !self.tyre_pressure.is_finite()
            || self.tyre_pressure <= PRESSURE_DOMAIN.0
            || self.tyre_pressure > PRESSURE_DOMAIN.1
        {
            return Err(PitwallError::ValueOutOfRange {
                field: "tyre_pressure",
                value: f64::from(self.tyre_pressure),
                min: f64::from(PRESSURE_DOMAIN.0),
                max: f64::from(PRESSURE_DOMAIN.1),
            });
        }
        for (field, value) in [
            ("tyre_temperature", self.tyre_temperature),
            ("track_temperature", self.track_temperature),
        ] {
            if value < TEMPERATURE_DOMAIN.0 || value > TEMPERATURE_DOMAIN.1 {
                return Err(PitwallError::ValueOutOfRange {
                    field,
                    value: f64::from(value),
                    min: f64::from(TEMPERATURE_DOMAIN.0),
                    max: f64::from(TEMPERATURE_DOMAIN.1),
                });
            }
        }
        Ok(())
    }
}

/// The subset of a tire record a camera can actually observe. Labels stay as
/// raw strings here: compound markings are parsed strictly wherever they are
/// consumed, wear grades leniently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisionObservation {
    pub compound: String,
    pub wear_pattern: String,
    pub sidewall_deformation: bool,
    pub is_graining: bool,
}

/// A tire record as collaborators deliver it: any field may be missing. The
/// vision service fills the visual fields, telemetry sensors fill the rest,
/// and the sensor estimator stands in when the sensors are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordDraft {
    pub compound: Option<String>,
    pub lap_number: Option<u32>,
    pub wear_pattern: Option<String>,
    pub sidewall_deformation: Option<bool>,
    pub tyre_pressure: Option<f32>,
    pub is_graining: Option<bool>,
    pub tyre_temperature: Option<i32>,
    pub track_temperature: Option<i32>,
}

impl RecordDraft {
    /// True when all three sensor channels are present and the draft can be
    /// completed without estimation.
    pub fn has_sensor_fields(&self) -> bool {
        self.tyre_pressure.is_some()
            && self.tyre_temperature.is_some()
            && self.track_temperature.is_some()
    }

    /// Extracts the camera-visible fields for the sensor estimator. Only the
    /// visual fields and the lap count must be present.
    pub fn observation(&self) -> Result<(VisionObservation, u32), PitwallError> {
        let compound = self
            .compound
            .clone()
            .ok_or(PitwallError::MissingField { field: "compound" })?;
        let wear_pattern = self
            .wear_pattern
            .clone()
            .ok_or(PitwallError::MissingField {
                field: "wear_pattern",
            })?;
        let sidewall_deformation =
            self.sidewall_deformation
                .ok_or(PitwallError::MissingField {
                    field: "sidewall_deformation",
                })?;
        let is_graining = self.is_graining.ok_or(PitwallError::MissingField {
            field: "is_graining",
        })?;
        let lap_number = self.lap_number.ok_or(PitwallError::MissingField {
            field: "lap_number",
        })?;
        Ok((
            VisionObservation {
                compound,
                wear_pattern,
                sidewall_deformation,
                is_graining,
            },
            lap_number,
        ))
    }

    /// Completes the draft into a classifiable record. Every field must be
    /// present, labels must parse strictly, and sensor values must sit inside
    /// their physical domains. Nothing is defaulted.
    pub fn complete(&self) -> Result<TireState, PitwallError> {
        let compound = Compound::from_label(
            self.compound
                .as_deref()
                .ok_or(PitwallError::MissingField { field: "compound" })?,
        )?;
        let wear_pattern = WearPattern::from_label(self.wear_pattern.as_deref().ok_or(
            PitwallError::MissingField {
                field: "wear_pattern",
            },
        )?)?;
        let state = TireState {
            compound,
            lap_number: self.lap_number.ok_or(PitwallError::MissingField {
                field: "lap_number",
            })?,
            wear_pattern,
            sidewall_deformation: self.sidewall_deformation.ok_or(
                PitwallError::MissingField {
                    field: "sidewall_deformation",
                },
            )?,
            tyre_pressure: self.tyre_pressure.ok_or(PitwallError::MissingField {
                field: "tyre_pressure",
            })?,
            is_graining: self.is_graining.ok_or(PitwallError::MissingField {
                field: "is_graining",
            })?,
            tyre_temperature: self.tyre_temperature.ok_or(PitwallError::MissingField {
                field: "tyre_temperature",
            })?,
            track_temperature: self.track_temperature.ok_or(PitwallError::MissingField {
                field: "track_temperature",
            })?,
        };
        state.validate()?;
        Ok(state)
    }
}
