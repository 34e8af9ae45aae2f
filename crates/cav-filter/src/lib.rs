//! Discrete-time pole filters for phasor signals.
//!
//! A [`Filter`] is a fixed-capacity cascade of first-order sections, one per
//! continuous-time pole. Configuration (the poles) lives in the filter; the
//! runtime memory lives in a separate [`FilterState`] so one configuration can
//! drive several independent simulation instances.
//!
//! Every section is discretized with a zero-order hold:
//!
//! ```text
//! z = exp(p * dt)
//! y[n] = z * y[n-1] + (1 - z) * x[n]
//! ```
//!
//! which gives each section, and therefore the whole cascade, unity DC gain.

pub mod filter;

pub use filter::{Filter, FilterState, Section};
