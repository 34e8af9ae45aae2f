//! Fixed-step host loop for cavity simulations.
//!
//! Provides:
//! - drive and beam schedules evaluated per step
//! - a detuning hook for an external mechanical model
//! - decimated recording of the cavity observables

pub mod detuning;
pub mod error;
pub mod schedule;
pub mod sim;

pub use detuning::{ConstantDetuning, DetuningModel, NoDetuning};
pub use error::{SimError, SimResult};
pub use schedule::{BeamSchedule, DriveSchedule};
pub use sim::{RunOptions, RunRecord, Sample, run, run_with_detuning};
