//! Errors
//!
//! Custom error types used throughout the `cartree` crate.
use thiserror::Error;

/// Errors that can occur while validating inputs or building a tree.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    /// First value names what was compared, second is expected, third is what was found.
    #[error("Shape mismatch for {0}, expected {1} but {2} found.")]
    ShapeMismatch(String, usize, usize),
    /// Input data without any rows.
    #[error("At least one sample is required to build a tree.")]
    NoSamples,
    /// Sample weights must not be negative.
    #[error("Sample weight at position {0} is negative ({1}).")]
    NegativeWeight(usize, f64),
    /// Features must not be NaN, first value is the sample, second the feature.
    #[error("Feature {1} of sample {0} is NaN.")]
    NaNFeatureValue(usize, usize),
    /// A classification label that cannot be used as a class index.
    #[error("Label {0} for output {1} is not a valid class index.")]
    InvalidLabel(f64, usize),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to write tree to file.
    #[error("Unable to write tree to file: {0}")]
    UnableToWrite(String),
    /// Unable to read tree from file.
    #[error("Unable to read tree from a file {0}")]
    UnableToRead(String),
    /// Prediction was requested before fitting.
    #[error("The estimator has not been fitted yet.")]
    NotFitted,
}
