// Labeled sample rows and JSON Lines dataset I/O

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_jsonlines::json_lines;

use crate::compound::Compound;
use crate::errors::PitwallError;
use crate::features::DerivedFeatures;
use crate::record::{TireState, WearPattern};
use crate::strategy::{self, Strategy};

/// One row of a training dataset: the raw record, its derived features, and
/// the strategy label. Rows serialize flat so downstream training jobs see a
/// single JSON object per line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    #[serde(flatten)]
    pub state: TireState,
    #[serde(flatten)]
    pub features: DerivedFeatures,
    pub strategy: Strategy,
    /// Set only on curated fixture rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_name: Option<String>,
}

impl LabeledSample {
    /// Builds a row by running the record through the feature computer and
    /// the rule cascade.
    pub fn labeled(state: TireState) -> Self {
        let features = DerivedFeatures::from_state(&state);
        let strategy = strategy::decide(&state);
        LabeledSample {
            state,
            features,
            strategy,
            scenario_name: None,
        }
    }

    /// Builds a curated row that keeps a hand-assigned label instead of
    /// asking the cascade. Used for the named edge-case fixtures.
    pub fn curated(state: TireState, strategy: Strategy, scenario_name: &str) -> Self {
        let features = DerivedFeatures::from_state(&state);
        LabeledSample {
            state,
            features,
            strategy,
            scenario_name: Some(scenario_name.to_string()),
        }
    }
}

/// Writes samples as JSON Lines, one object per line. Any failure aborts the
/// batch; a partial dataset on disk is worse than no dataset.
pub fn write_samples(path: &Path, samples: &[LabeledSample]) -> Result<(), PitwallError> {
    let dataset_file =
        File::create(path).map_err(|e| PitwallError::DatasetWriteError { source: e })?;
    let mut writer = BufWriter::new(dataset_file);
    for sample in samples {
        let line = serde_json::to_string(sample)
            .map_err(|e| PitwallError::DatasetEncodeError { source: e })?;
        writeln!(writer, "{line}").map_err(|e| PitwallError::DatasetWriteError { source: e })?;
    }
    writer
        .flush()
        .map_err(|e| PitwallError::DatasetWriteError { source: e })?;
    Ok(())
}

/// Reads a JSON Lines dataset back into rows.
pub fn read_samples(path: &Path) -> Result<Vec<LabeledSample>, PitwallError> {
    json_lines(path)
        .map_err(|e| PitwallError::DatasetReadError { source: e })?
        .collect::<Result<Vec<LabeledSample>, std::io::Error>>()
        .map_err(|e| PitwallError::DatasetReadError { source: e })
}

/// Distribution tallies for a generated dataset, logged after generation so
/// skewed batches are visible before anyone trains on them.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSummary {
    pub total: usize,
    pub strategies: Vec<(Strategy, usize)>,
    pub compounds: Vec<(Compound, usize)>,
    pub wear_patterns: Vec<(WearPattern, usize)>,
}

impl DatasetSummary {
    pub fn from_samples(samples: &[LabeledSample]) -> Self {
        DatasetSummary {
            total: samples.len(),
            strategies: sorted_counts(samples.iter().map(|s| s.strategy)),
            compounds: sorted_counts(samples.iter().map(|s| s.state.compound)),
            wear_patterns: sorted_counts(samples.iter().map(|s| s.state.wear_pattern)),
        }
    }
}

/// Tallies values and orders them most frequent first, breaking ties by the
/// natural order of the value so summaries are stable.
fn sorted_counts<T: Ord + Copy + std::hash::Hash>(
    values: impl Iterator<Item = T>,
) -> Vec<(T, usize)> {
    values
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .collect()
}

impl Display for DatasetSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} samples", self.total)?;
        write_distribution(f, "strategy", &self.strategies, self.total)?;
        write_distribution(f, "compound", &self.compounds, self.total)?;
        write_distribution(f, "wear", &self.wear_patterns, self.total)
    }
}

fn write_distribution<T: Display>(
    f: &mut Formatter<'_>,
    heading: &str,
    counts: &[(T, usize)],
    total: usize,
) -> std::fmt::Result {
    write!(f, "  {heading}:")?;
    for (value, count) in counts {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        write!(f, " {value}={count} ({share:.1}%)")?;
    }
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_state(lap_number: u32) -> TireState {
        TireState {
            compound: Compound::Medium,
            lap_number,
            wear_pattern: WearPattern::Even,
            sidewall_deformation: false,
            tyre_pressure: 20.0,
            is_graining: false,
            tyre_temperature: 95,
            track_temperature: 30,
        }
    }

    #[test]
    fn test_labeled_row_agrees_with_cascade() {
        let state = sample_state(20);
        let row = LabeledSample::labeled(state);
        assert_eq!(row.strategy, strategy::decide(&state));
        assert_eq!(row.features, DerivedFeatures::from_state(&state));
        assert!(row.scenario_name.is_none());
    }

    #[test]
    fn test_curated_row_keeps_assigned_label() {
        let state = sample_state(2);
        let row = LabeledSample::curated(state, Strategy::Conserve, "test_fixture");
        assert_eq!(row.strategy, Strategy::Conserve);
        assert_eq!(row.scenario_name.as_deref(), Some("test_fixture"));
    }

    #[test]
    fn test_rows_serialize_flat() {
        let row = LabeledSample::labeled(sample_state(20));
        let json = serde_json::to_string(&row).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();
        // Raw record, derived features, and label all sit at the top level.
        assert!(object.contains_key("compound"));
        assert!(object.contains_key("lap_number"));
        assert!(object.contains_key("risk_score"));
        assert!(object.contains_key("strategy"));
        assert!(!object.contains_key("state"));
        assert!(!object.contains_key("scenario_name"));
    }

    #[test]
    fn test_write_then_read_preserves_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        let rows = vec![
            LabeledSample::labeled(sample_state(4)),
            LabeledSample::labeled(sample_state(29)),
            LabeledSample::curated(sample_state(1), Strategy::Monitor, "fixture"),
        ];

        write_samples(&path, &rows).unwrap();
        let restored = read_samples(&path).unwrap();
        assert_eq!(restored, rows);
    }

    #[test]
    fn test_read_missing_file_reports_dataset_error() {
        let dir = tempdir().unwrap();
        let result = read_samples(&dir.path().join("absent.jsonl"));
        assert!(matches!(
            result,
            Err(PitwallError::DatasetReadError { .. })
        ));
    }

    #[test]
    fn test_summary_counts_and_sorts() {
        let rows = vec![
            LabeledSample::labeled(sample_state(4)),
            LabeledSample::labeled(sample_state(5)),
            LabeledSample::labeled(sample_state(31)),
        ];
        let summary = DatasetSummary::from_samples(&rows);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.compounds, vec![(Compound::Medium, 3)]);
        // 95C misses the medium window, so laps 4 and 5 monitor while lap 31
        // is nearly exhausted. Most frequent label sorts first.
        assert_eq!(
            summary.strategies,
            vec![(Strategy::Monitor, 2), (Strategy::PitSoon, 1)]
        );
    }

    #[test]
    fn test_summary_display_includes_percentages() {
        let rows = vec![
            LabeledSample::labeled(sample_state(4)),
            LabeledSample::labeled(sample_state(5)),
        ];
        let summary = DatasetSummary::from_samples(&rows);
        let text = summary.to_string();
        assert!(text.contains("2 samples"));
        assert!(text.contains("(100.0%)"));
        assert!(text.contains("compound: medium=2"));
    }
}
