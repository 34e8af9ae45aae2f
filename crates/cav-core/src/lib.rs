//! cav-core: shared foundation for the cavity simulator.
//!
//! Contains:
//! - units (uom SI types + constructors, Hz to rad/s conversion)
//! - numeric (Real, complex phasors, tolerances, finiteness checks)
//! - ids (compact mode identifiers)
//! - error (shared error type)
//! - timing (opt-in step timers)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CavError, CavResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
