// Reverse-engineering of sensor channels from pit-lane camera evidence

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::compound::Compound;
use crate::errors::PitwallError;
use crate::record::{TireState, VisionObservation, WearPattern, round_to_tenth};

/// Hard output bounds for estimated pressure, PSI.
const PRESSURE_FLOOR: f32 = 15.0;
const PRESSURE_CEIL: f32 = 25.0;

/// Sensor values fabricated for a vision-only observation. These are
/// plausible readings consistent with what the camera saw, not measurements;
/// two estimates for the same observation will differ.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorEstimate {
    pub track_temperature: i32,
    pub tyre_temperature: i32,
    pub tyre_pressure: f32,
}

/// Typical track surface temperature band for races where this compound gets
/// fitted. Harder compounds are picked for hotter venues; rain compounds
/// imply a cool, wet track.
fn ambient_band(compound: Compound) -> (f64, f64) {
    match compound {
        Compound::Soft => (20.0, 32.0),
        Compound::Medium => (25.0, 38.0),
        Compound::Hard => (32.0, 45.0),
        Compound::Intermediate => (12.0, 25.0),
        Compound::Wet => (10.0, 20.0),
    }
}

/// Cold pressure band implied by the observed wear placement. Crown wear
/// means the tire ran overinflated, shoulder wear reads as normal-to-low.
/// `None` stands for an unrecognized camera grade and gets the fleet band.
fn pressure_band(wear: Option<WearPattern>) -> (f32, f32) {
    match wear {
        Some(WearPattern::Even) => (19.5, 21.0),
        Some(WearPattern::Center) => (21.5, 23.5),
        Some(WearPattern::Inner) | Some(WearPattern::Outer) => (18.5, 21.5),
        Some(WearPattern::Uneven) => (18.0, 22.5),
        None => (19.0, 21.5),
    }
}

/// Completes vision-only tire records with plausible sensor values.
///
/// The estimator works backwards from visible evidence: graining means the
/// carcass ran cold, crown wear means it ran hot and overinflated, sidewall
/// deformation implies both heat and a pressure excursion. The estimator is
/// explicitly best-effort. It degrades to default bands on wear grades it
/// does not recognize instead of failing, unlike the rule cascade.
///
/// Draws are consumed from a caller-seeded stream in a fixed order (track
/// base, track jitter, carcass band, pressure band), so a seed reproduces
/// the same sequence of estimates.
pub struct SensorEstimator {
    rng: ChaCha8Rng,
}

impl SensorEstimator {
    pub fn new(seed: u64) -> Self {
        SensorEstimator {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fabricates the three sensor channels for one observation.
    ///
    /// The compound label must parse: estimation bands are keyed by compound
    /// and there is no sensible fallback. The wear label may be anything.
    pub fn estimate(
        &mut self,
        observation: &VisionObservation,
        lap_number: u32,
    ) -> Result<SensorEstimate, PitwallError> {
        let compound = Compound::from_label(&observation.compound)?;
        let wear = WearPattern::from_label_lossy(&observation.wear_pattern);
        if lap_number < 1 {
            return Err(PitwallError::ValueOutOfRange {
                field: "lap_number",
                value: f64::from(lap_number),
                min: 1.0,
                max: f64::from(u32::MAX),
            });
        }

        let spec = compound.spec();
        let (optimal_min, optimal_max) = spec.optimal_temp_range;
        let tmin = f64::from(optimal_min);
        let tmax = f64::from(optimal_max);
        let lap_percentage = f64::from(lap_number) / f64::from(spec.expected_life);

        let (ambient_low, ambient_high) = ambient_band(compound);
        let track_temperature =
            (self.rng.gen_range(ambient_low..ambient_high) + self.rng.gen_range(-2.0..2.0)) as i32;

        // Graining is cold-tire damage, so it pins the carcass below the
        // window regardless of wear placement.
        let mut carcass = if observation.is_graining {
            tmin - self.rng.gen_range(5.0..15.0)
        } else {
            match wear {
                Some(WearPattern::Even) | None => self.rng.gen_range(tmin..tmax),
                Some(WearPattern::Center) => tmax + self.rng.gen_range(5.0..15.0),
                Some(WearPattern::Inner) | Some(WearPattern::Outer) => {
                    self.rng.gen_range(tmin + 5.0..tmax + 10.0)
                }
                Some(WearPattern::Uneven) => self.rng.gen_range(tmin - 5.0..tmax + 15.0),
            }
        };
        carcass += (lap_percentage * 10.0).min(10.0);
        if observation.sidewall_deformation {
            carcass = carcass.max(tmax + 15.0);
        }
        let tyre_temperature = carcass as i32;

        let mut pressure = if observation.sidewall_deformation {
            // A deformed sidewall means the pressure left its band in one
            // direction or the other, most often low.
            if self.rng.gen_bool(0.7) {
                self.rng.gen_range(15.0f32..17.5)
            } else {
                self.rng.gen_range(23.0f32..25.0)
            }
        } else {
            let (pressure_low, pressure_high) = pressure_band(wear);
            self.rng.gen_range(pressure_low..pressure_high)
        };
        pressure += (tyre_temperature as f32 - 100.0) * 0.05;
        let tyre_pressure = round_to_tenth(pressure).clamp(PRESSURE_FLOOR, PRESSURE_CEIL);

        Ok(SensorEstimate {
            track_temperature,
            tyre_temperature,
            tyre_pressure,
        })
    }

    /// Merges an observation with estimated sensors into a classifiable
    /// record. Unlike [`SensorEstimator::estimate`], the wear label must
    /// parse strictly here: the rule cascade refuses to guess.
    pub fn complete(
        &mut self,
        observation: &VisionObservation,
        lap_number: u32,
    ) -> Result<TireState, PitwallError> {
        let compound = Compound::from_label(&observation.compound)?;
        let wear_pattern = WearPattern::from_label(&observation.wear_pattern)?;
        let estimate = self.estimate(observation, lap_number)?;
        let state = TireState {
            compound,
            lap_number,
            wear_pattern,
            sidewall_deformation: observation.sidewall_deformation,
            tyre_pressure: estimate.tyre_pressure,
            is_graining: observation.is_graining,
            tyre_temperature: estimate.tyre_temperature,
            track_temperature: estimate.track_temperature,
        };
        state.validate()?;
        Ok(state)
    }
}
