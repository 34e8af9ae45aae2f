//! Error types for simulation runs.

use thiserror::Error;

/// Errors encountered during a simulation run.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Cavity step {step} failed: {source}")]
    Step {
        step: usize,
        #[source]
        source: cav_core::CavError,
    },

    #[error(transparent)]
    Model(#[from] cav_core::CavError),
}

pub type SimResult<T> = Result<T, SimError>;
