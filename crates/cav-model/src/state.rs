//! Mutable runtime state of modes and cavities.

use cav_core::{CavError, CavResult, Phasor};
use cav_filter::FilterState;

use crate::cavity::{Cavity, StepInput};
use crate::elec_mode::ElecMode;

/// Runtime state of one electrical mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ElecModeState {
    pub(crate) delta_omega: f64,
    pub(crate) d_phase: f64,
    pub(crate) v_2: f64,
    pub(crate) filter: FilterState,
}

impl ElecModeState {
    /// Zeroed state with filter memory sized for `mode`.
    pub fn allocate(mode: &ElecMode) -> Self {
        Self {
            delta_omega: 0.0,
            d_phase: 0.0,
            v_2: 0.0,
            filter: FilterState::allocate(mode.filter()),
        }
    }

    /// Detuning perturbation applied on the last step (rad/s).
    pub fn delta_omega(&self) -> f64 {
        self.delta_omega
    }

    /// Accumulated rotating-frame phase (rad).
    pub fn d_phase(&self) -> f64 {
        self.d_phase
    }

    /// Squared magnitude of the last accelerating voltage (V^2).
    pub fn v_2(&self) -> f64 {
        self.v_2
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub(crate) fn copy_from(&mut self, other: &ElecModeState) {
        self.delta_omega = other.delta_omega;
        self.d_phase = other.d_phase;
        self.v_2 = other.v_2;
        self.filter.copy_from(&other.filter);
    }
}

/// Runtime state of one cavity.
///
/// Holds one [`ElecModeState`] per mode of the cavity it was created from,
/// in the same order, plus the cavity-level observables of the last step.
#[derive(Debug, Clone)]
pub struct CavityState<'c> {
    pub(crate) cavity: &'c Cavity,
    pub(crate) modes: Vec<ElecModeState>,
    // Staging area for fail-fast stepping; same shape as `modes`.
    pub(crate) scratch: Vec<ElecModeState>,
    pub(crate) kg: Phasor,
    pub(crate) e_probe: Phasor,
    pub(crate) e_reverse: Phasor,
    pub(crate) v: Phasor,
}

impl<'c> CavityState<'c> {
    /// Zeroed state for `cavity`, one mode state per mode.
    pub fn new(cavity: &'c Cavity) -> Self {
        let modes: Vec<ElecModeState> = cavity.modes().iter().map(ElecMode::new_state).collect();
        let scratch = modes.clone();
        Self {
            cavity,
            modes,
            scratch,
            kg: Phasor::new(0.0, 0.0),
            e_probe: Phasor::new(0.0, 0.0),
            e_reverse: Phasor::new(0.0, 0.0),
            v: Phasor::new(0.0, 0.0),
        }
    }

    /// The cavity this state belongs to.
    pub fn cavity(&self) -> &'c Cavity {
        self.cavity
    }

    /// Shorthand for [`Cavity::step`] on the owning cavity.
    pub fn step(&mut self, input: &StepInput<'_>) -> CavResult<Phasor> {
        let cavity = self.cavity;
        cavity.step(input, self)
    }

    /// Zero the observables and every mode's filter memory. Phase,
    /// detuning and `V_2` are kept.
    pub fn clear(&mut self) {
        for (mode, state) in self.cavity.modes().iter().zip(self.modes.iter_mut()) {
            mode.filter().clear_state(&mut state.filter);
        }
        self.kg = Phasor::new(0.0, 0.0);
        self.e_probe = Phasor::new(0.0, 0.0);
        self.e_reverse = Phasor::new(0.0, 0.0);
        self.v = Phasor::new(0.0, 0.0);
    }

    /// Zero every mode's phase accumulator. Not part of [`clear`](Self::clear).
    pub fn reset_phase(&mut self) {
        for state in &mut self.modes {
            state.d_phase = 0.0;
        }
    }

    pub fn mode_state(&self, index: usize) -> CavResult<&ElecModeState> {
        let len = self.modes.len();
        self.modes.get(index).ok_or(CavError::OutOfRange {
            what: "mode state",
            index,
            len,
        })
    }

    pub fn mode_states(&self) -> &[ElecModeState] {
        &self.modes
    }

    /// Forward drive applied on the last step.
    pub fn kg(&self) -> Phasor {
        self.kg
    }

    /// Summed probe signal.
    pub fn e_probe(&self) -> Phasor {
        self.e_probe
    }

    /// Summed emitted signal minus the reflected drive.
    pub fn e_reverse(&self) -> Phasor {
        self.e_reverse
    }

    /// Total accelerating voltage.
    pub fn v(&self) -> Phasor {
        self.v
    }

    pub(crate) fn belongs_to(&self, cavity: &Cavity) -> bool {
        std::ptr::eq(self.cavity, cavity)
    }
}
