// Library interface for pitwall
// This allows integration tests to access internal modules

pub mod classifier;
pub mod compound;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod features;
pub mod generator;
pub mod inference;
pub mod record;
pub mod strategy;

// Re-export commonly used types
pub use classifier::{Prediction, RiskProfileClassifier, RuleClassifier, StrategyClassifier};
pub use compound::{Compound, CompoundSpec};
pub use dataset::{DatasetSummary, LabeledSample};
pub use errors::PitwallError;
pub use features::DerivedFeatures;
pub use generator::{Scenario, TelemetryGenerator};
pub use inference::{SensorEstimate, SensorEstimator};
pub use record::{RecordDraft, TireState, VisionObservation, WearPattern};
pub use strategy::Strategy;
