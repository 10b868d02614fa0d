// Local defaults for the command-line workflows

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::PitwallError;

const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Batch size for `generate` when none is given on the command line
    pub default_samples: usize,
    /// Seed for `generate` and `predict` when none is given
    pub default_seed: u64,
    /// Where `generate` writes the training dataset
    pub dataset_path: PathBuf,
    /// Where `generate` writes the curated edge-case fixtures
    pub edge_case_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_samples: DEFAULT_SAMPLE_COUNT,
            default_seed: DEFAULT_SEED,
            dataset_path: PathBuf::from("data/tire_training.jsonl"),
            edge_case_path: PathBuf::from("data/edge_cases.jsonl"),
        }
    }
}

impl AppConfig {
    pub fn from_local_file() -> Option<Self> {
        let config_path = dirs::config_dir()?.join("pitwall").join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let file = std::fs::File::open(config_path).expect("Could not open config file");
            Some(serde_json::from_reader(file).expect("Could not parse config file"))
        } else {
            None
        }
    }

    pub fn save(&self) -> Result<(), PitwallError> {
        let config_path = dirs::config_dir()
            .ok_or(PitwallError::NoConfigDir)?
            .join("pitwall")
            .join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            std::fs::create_dir_all(config_path.parent().ok_or(PitwallError::NoConfigDir)?)
                .map_err(|e| PitwallError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| PitwallError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self).map_err(|e| PitwallError::ConfigSerializeError { source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.default_samples, DEFAULT_SAMPLE_COUNT);
        assert_eq!(config.default_seed, DEFAULT_SEED);
        assert_eq!(config.dataset_path, PathBuf::from("data/tire_training.jsonl"));
    }

    #[test]
    fn test_partial_config_files_fill_in_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"default_seed": 7}"#).unwrap();
        assert_eq!(config.default_seed, 7);
        assert_eq!(config.default_samples, DEFAULT_SAMPLE_COUNT);
    }
}
