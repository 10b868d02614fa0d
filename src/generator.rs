// Physics-informed synthetic tire telemetry generation

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::compound::Compound;
use crate::dataset::LabeledSample;
use crate::record::{TireState, WearPattern, round_to_tenth};
use crate::strategy::Strategy;

/// Race situation a synthetic stint is sampled from. The scenario shapes the
/// lap distribution, the ambient conditions, and the wear profile so the
/// dataset covers more than routine green-flag running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// Routine stint inside the compound's design life
    NormalRacing,
    /// Hard pushing that stresses the shoulders
    AggressiveDriving,
    /// Mixed or cool conditions, shortened stints
    WeatherTransition,
    /// Recovering from contact or an off
    IncidentRecovery,
    /// Overcut or undercut attempts that stretch the stint
    StrategyGamble,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::NormalRacing,
        Scenario::AggressiveDriving,
        Scenario::WeatherTransition,
        Scenario::IncidentRecovery,
        Scenario::StrategyGamble,
    ];
}

const SCENARIO_WEIGHTS: [f64; 5] = [0.60, 0.15, 0.10, 0.10, 0.05];

/// Fitment frequency: softs and mediums dominate race weekends, rain tires
/// are rare.
const COMPOUND_WEIGHTS: [f64; 5] = [0.35, 0.40, 0.20, 0.03, 0.02];

// Wear placement profiles, in WearPattern::ALL order
// (even, inner, outer, center, uneven).
const WEAR_PROFILE_STRESSED: [f64; 5] = [0.2, 0.25, 0.25, 0.15, 0.15];
const WEAR_PROFILE_INCIDENT: [f64; 5] = [0.1, 0.2, 0.2, 0.1, 0.4];
const WEAR_PROFILE_DEFAULT: [f64; 5] = [0.6, 0.15, 0.15, 0.05, 0.05];

/// Mixing constant for per-sample seed derivation, the 64-bit golden ratio.
const SAMPLE_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Generates labeled tire condition samples from a fixed seed.
///
/// Generation is fully deterministic: the same seed always reproduces the
/// same dataset byte for byte. Each sample owns an independent random stream
/// derived from the base seed and the sample index, so a sample does not
/// depend on how many samples were generated before it.
pub struct TelemetryGenerator {
    seed: u64,
    scenario_dist: WeightedIndex<f64>,
    compound_dist: WeightedIndex<f64>,
    wear_stressed_dist: WeightedIndex<f64>,
    wear_incident_dist: WeightedIndex<f64>,
    wear_default_dist: WeightedIndex<f64>,
}

impl TelemetryGenerator {
    pub fn new(seed: u64) -> Self {
        // The weight tables are compile-time constants, all positive.
        let build = |weights: &[f64; 5]| {
            WeightedIndex::new(weights).expect("static weight table is positive and non-empty")
        };
        TelemetryGenerator {
            seed,
            scenario_dist: build(&SCENARIO_WEIGHTS),
            compound_dist: build(&COMPOUND_WEIGHTS),
            wear_stressed_dist: build(&WEAR_PROFILE_STRESSED),
            wear_incident_dist: build(&WEAR_PROFILE_INCIDENT),
            wear_default_dist: build(&WEAR_PROFILE_DEFAULT),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derives the independent random stream for one sample index.
    fn sample_rng(&self, index: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed ^ index.wrapping_mul(SAMPLE_SEED_MIX))
    }

    /// Generates a batch of labeled samples.
    pub fn generate(&self, count: usize) -> Vec<LabeledSample> {
        (0..count)
            .map(|index| self.generate_sample(index as u64))
            .collect()
    }

    /// Generates the sample at one index.
    ///
    /// The draw order inside a sample is fixed: scenario, compound, lap,
    /// track temperature, stint-stage temperature offset, warm-up delta,
    /// base pressure, pressure variance, conditional late-stint pressure
    /// bias, wear pattern, graining, deformation. Reordering any draw
    /// changes every later value for that index.
    pub fn generate_sample(&self, index: u64) -> LabeledSample {
        let mut rng = self.sample_rng(index);

        let scenario = Scenario::ALL[self.scenario_dist.sample(&mut rng)];
        let compound = Compound::ALL[self.compound_dist.sample(&mut rng)];
        let spec = compound.spec();
        let life = f64::from(spec.expected_life);

        // Where in the stint the snapshot lands depends on the scenario:
        // incidents force mid-stint stops, gambles stretch past design life.
        let lap_window = match scenario {
            Scenario::NormalRacing => 1.0..life * 0.95,
            Scenario::AggressiveDriving => 1.0..life * 0.85,
            Scenario::WeatherTransition => 1.0..life * 0.60,
            Scenario::IncidentRecovery => life * 0.30..life * 0.70,
            Scenario::StrategyGamble => life * 0.85..life * 1.15,
        };
        let lap_number = (rng.gen_range(lap_window) as u32).max(1);
        let lap_percentage = f64::from(lap_number) / life;

        // Rain compounds only make sense on a cool track.
        let track_temperature = match compound {
            Compound::Intermediate | Compound::Wet => rng.gen_range(10.0..25.0) as i32,
            _ if scenario == Scenario::WeatherTransition => rng.gen_range(15.0..30.0) as i32,
            _ => rng.gen_range(20.0..45.0) as i32,
        };

        // Carcass temperature builds over the stint: cold early, stabilized
        // mid-stint, drifting hot as the tread thins.
        let stage_offset = if lap_percentage < 0.2 {
            rng.gen_range(-10.0..0.0)
        } else if lap_percentage < 0.7 {
            rng.gen_range(-5.0..5.0)
        } else {
            rng.gen_range(0.0..15.0)
        };
        let warmup = rng.gen_range(5.0..15.0);
        let tyre_temperature = (f64::from(track_temperature) + warmup + stage_offset) as i32;

        let base_pressure = rng.gen_range(spec.pressure_range.0..spec.pressure_range.1);
        let mut pressure_delta = rng.gen_range(-1.5f32..1.5);
        if lap_percentage > 0.8 || tyre_temperature > spec.optimal_temp_range.1 + 10 {
            // Worn or overheated tires bleed pressure more often than they gain it.
            pressure_delta += rng.gen_range(-1.0f32..0.5);
        }
        let tyre_pressure = round_to_tenth(base_pressure + pressure_delta);

        let wear_dist = if scenario == Scenario::AggressiveDriving || lap_percentage > 0.75 {
            &self.wear_stressed_dist
        } else if scenario == Scenario::IncidentRecovery {
            &self.wear_incident_dist
        } else {
            &self.wear_default_dist
        };
        let wear_pattern = WearPattern::ALL[wear_dist.sample(&mut rng)];

        let mut graining_probability = spec.graining_susceptibility;
        if lap_number < 8 && track_temperature < 25 {
            graining_probability *= 2.5;
        }
        if tyre_temperature < spec.optimal_temp_range.0 {
            graining_probability *= 1.5;
        }
        let is_graining = rng.gen_bool(graining_probability.min(0.95));

        let deformation_probability = if lap_percentage >= 1.0 {
            0.25
        } else if lap_percentage > 0.9 {
            0.08
        } else if !(17.0..=24.0).contains(&tyre_pressure) {
            0.15
        } else {
            0.01
        };
        let sidewall_deformation = rng.gen_bool(deformation_probability);

        LabeledSample::labeled(TireState {
            compound,
            lap_number,
            wear_pattern,
            sidewall_deformation,
            tyre_pressure,
            is_graining,
            tyre_temperature,
            track_temperature,
        })
    }

    /// Returns the six curated boundary fixtures, named after the situations
    /// they reproduce. Labels are hand-assigned by the strategists rather
    /// than taken from the cascade: the wet-start row stays at MONITOR even
    /// though its numbers read as a push window, because a lap-3 intermediate
    /// on a drying line is not an attack opportunity.
    pub fn generate_edge_cases() -> Vec<LabeledSample> {
        vec![
            LabeledSample::curated(
                TireState {
                    compound: Compound::Intermediate,
                    lap_number: 3,
                    wear_pattern: WearPattern::Even,
                    sidewall_deformation: false,
                    tyre_pressure: 19.5,
                    is_graining: false,
                    tyre_temperature: 88,
                    track_temperature: 18,
                },
                Strategy::Monitor,
                "Monaco_rain_start",
            ),
            LabeledSample::curated(
                TireState {
                    compound: Compound::Hard,
                    lap_number: 42,
                    wear_pattern: WearPattern::Outer,
                    sidewall_deformation: false,
                    tyre_pressure: 16.5,
                    is_graining: false,
                    tyre_temperature: 118,
                    track_temperature: 35,
                },
                Strategy::PitNow,
                "Silverstone_blowout_risk",
            ),
            LabeledSample::curated(
                TireState {
                    compound: Compound::Medium,
                    lap_number: 28,
                    wear_pattern: WearPattern::Center,
                    sidewall_deformation: false,
                    tyre_pressure: 22.5,
                    is_graining: false,
                    tyre_temperature: 125,
                    track_temperature: 45,
                },
                Strategy::PitSoon,
                "Singapore_overheating",
            ),
            LabeledSample::curated(
                TireState {
                    compound: Compound::Soft,
                    lap_number: 6,
                    wear_pattern: WearPattern::Uneven,
                    sidewall_deformation: false,
                    tyre_pressure: 20.0,
                    is_graining: true,
                    tyre_temperature: 88,
                    track_temperature: 16,
                },
                Strategy::Conserve,
                "Barcelona_cold_graining",
            ),
            LabeledSample::curated(
                TireState {
                    compound: Compound::Soft,
                    lap_number: 8,
                    wear_pattern: WearPattern::Even,
                    sidewall_deformation: false,
                    tyre_pressure: 20.5,
                    is_graining: false,
                    tyre_temperature: 102,
                    track_temperature: 28,
                },
                Strategy::Push,
                "Perfect_push_conditions",
            ),
            LabeledSample::curated(
                TireState {
                    compound: Compound::Medium,
                    lap_number: 25,
                    wear_pattern: WearPattern::Even,
                    sidewall_deformation: true,
                    tyre_pressure: 20.0,
                    is_graining: false,
                    tyre_temperature: 105,
                    track_temperature: 30,
                },
                Strategy::PitNow,
                "Critical_sidewall_deformation",
            ),
        ]
    }
}
