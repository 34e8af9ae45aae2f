//! Electrical model of an RF accelerating cavity.
//!
//! A [`Cavity`] is a fixed, ordered set of [`ElecMode`]s. Each mode is a
//! single-pole resonator integrated in its own rotating frame: the drive and
//! beam terms are rotated by the accumulated detuning phase, low-pass
//! filtered at the mode bandwidth, and rotated back. Cavity-level observables
//! are the sums of the per-mode contributions in ascending mode order.
//!
//! Topology and runtime state are separate objects. A [`CavityState`] borrows
//! the cavity it was created from, so it can never outlive it, and all
//! mutable data of a simulation instance lives there.
//!
//! # Example
//!
//! ```
//! use cav_model::{Cavity, CavityMeta, CavityState, ElecMode, ElecModeParams, StepInput};
//! use cav_core::Phasor;
//!
//! let params = ElecModeParams {
//!     r_over_q: 100.0,
//!     foffset: 0.0,
//!     lo_w0: 2.0 * std::f64::consts::PI * 1.3e9,
//!     q0: 3e4,
//!     q_drive: 3e4,
//!     q_probe: 3e4,
//!     rf_phase: 0.0,
//!     phase_rev: 0.0,
//!     phase_probe: 0.0,
//!     tstep: 1e-6,
//!     mech_couplings: vec![],
//! };
//! let mode = ElecMode::new(&params).unwrap();
//! let cavity = Cavity::new(vec![mode], CavityMeta::default()).unwrap();
//! let mut state = CavityState::new(&cavity);
//!
//! let v = cavity
//!     .step(&StepInput::new(0.0, Phasor::new(1.0, 0.0), 0.0), &mut state)
//!     .unwrap();
//! assert!(v.norm() > 0.0);
//! ```

pub mod bank;
pub mod cavity;
pub mod elec_mode;
pub mod state;

pub use bank::{BankState, CavityBank};
pub use cavity::{Cavity, CavityBuilder, CavityMeta, Detuning, StepInput};
pub use elec_mode::{ElecMode, ElecModeParams, ModeInput, ModeOutput};
pub use state::{CavityState, ElecModeState};
