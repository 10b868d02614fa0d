// Error types for pitwall

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum PitwallError {
    // Errors for labels received from external collaborators. The compound
    // and wear registries are closed: an unrecognized label is a
    // configuration problem upstream, never something to guess around.
    #[snafu(display("Unknown tire compound label: {label}"))]
    UnknownCompound { label: String },
    #[snafu(display("Unknown wear pattern label: {label}"))]
    UnknownWearPattern { label: String },

    // Errors while assembling a classifiable record
    #[snafu(display("Tire record is missing required field: {field}"))]
    MissingField { field: &'static str },
    #[snafu(display("{field} outside physical range: {value} (expected {min} to {max})"))]
    ValueOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    // Errors for dataset files
    #[snafu(display("Error writing dataset file"))]
    DatasetWriteError { source: io::Error },
    #[snafu(display("Error reading dataset file"))]
    DatasetReadError { source: io::Error },
    #[snafu(display("Error encoding dataset record"))]
    DatasetEncodeError { source: serde_json::Error },

    // Errors for the serving path
    #[snafu(display("Invalid tire record file: {path}"))]
    InvalidRecordFile { path: String },
    #[snafu(display("Error parsing tire record"))]
    RecordParseError { source: serde_json::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}
