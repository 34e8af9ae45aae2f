//! Cavity topology, builder and stepping.

use cav_core::{CavError, CavResult, ModeId, Phasor, ensure_finite_phasor};
use tracing::{debug, warn};

use crate::elec_mode::{ElecMode, ModeInput};
use crate::state::CavityState;

/// Scalar cavity metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CavityMeta {
    /// Electrical length (m).
    pub length: f64,
    /// Nominal accelerating gradient (V/m).
    pub nominal_gradient: f64,
    /// Beam phase relative to the RF (rad).
    pub rf_phase: f64,
    /// Design accelerating voltage (V).
    pub design_voltage: f64,
    /// Index of the fundamental (accelerating) mode.
    pub fundamental_index: usize,
}

impl Default for CavityMeta {
    fn default() -> Self {
        Self {
            length: 1.0,
            nominal_gradient: 0.0,
            rf_phase: 0.0,
            design_voltage: 0.0,
            fundamental_index: 0,
        }
    }
}

/// Detuning perturbation fed to the modes on one step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Detuning<'a> {
    /// No perturbation: every mode runs at its baseline offset.
    #[default]
    None,
    /// One perturbation per mode (rad/s), in mode order.
    PerMode(&'a [f64]),
}

impl Detuning<'_> {
    fn get(&self, index: usize) -> f64 {
        match self {
            Detuning::None => 0.0,
            Detuning::PerMode(values) => values[index],
        }
    }
}

/// Per-step inputs of a cavity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInput<'a> {
    /// Beam arrival timing offset (s).
    pub delta_tz: f64,
    /// Forward drive signal.
    pub drive: Phasor,
    /// Beam charge for this step (pC).
    pub beam_charge: f64,
    pub detuning: Detuning<'a>,
}

impl<'a> StepInput<'a> {
    pub fn new(delta_tz: f64, drive: Phasor, beam_charge: f64) -> Self {
        Self {
            delta_tz,
            drive,
            beam_charge,
            detuning: Detuning::None,
        }
    }

    pub fn with_detuning(mut self, delta_omega: &'a [f64]) -> Self {
        self.detuning = Detuning::PerMode(delta_omega);
        self
    }
}

/// Ordered, fixed set of electrical modes plus metadata.
///
/// Mode order is summation order and never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Cavity {
    modes: Vec<ElecMode>,
    meta: CavityMeta,
}

impl Cavity {
    /// Build a cavity from modes in summation order.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if modes exist and `meta.fundamental_index` does not
    /// point at one of them, or the metadata is non-finite.
    pub fn new(modes: Vec<ElecMode>, meta: CavityMeta) -> CavResult<Self> {
        if !modes.is_empty() && meta.fundamental_index >= modes.len() {
            return Err(CavError::InvalidParameter {
                what: "fundamental_index must point at a mode",
            });
        }
        let scalars = [
            meta.length,
            meta.nominal_gradient,
            meta.rf_phase,
            meta.design_voltage,
        ];
        if scalars.iter().any(|v| !v.is_finite()) {
            return Err(CavError::InvalidParameter {
                what: "cavity metadata must be finite",
            });
        }
        debug!(
            n_modes = modes.len(),
            fundamental = meta.fundamental_index,
            "cavity constructed"
        );
        Ok(Self { modes, meta })
    }

    pub fn n_modes(&self) -> usize {
        self.modes.len()
    }

    pub fn modes(&self) -> &[ElecMode] {
        &self.modes
    }

    pub fn mode(&self, index: usize) -> CavResult<&ElecMode> {
        self.modes.get(index).ok_or(CavError::OutOfRange {
            what: "mode",
            index,
            len: self.modes.len(),
        })
    }

    /// The fundamental mode, if the cavity has any modes.
    pub fn fundamental(&self) -> Option<&ElecMode> {
        self.modes.get(self.meta.fundamental_index)
    }

    pub fn meta(&self) -> &CavityMeta {
        &self.meta
    }

    pub fn length(&self) -> f64 {
        self.meta.length
    }

    pub fn nominal_gradient(&self) -> f64 {
        self.meta.nominal_gradient
    }

    pub fn rf_phase(&self) -> f64 {
        self.meta.rf_phase
    }

    pub fn design_voltage(&self) -> f64 {
        self.meta.design_voltage
    }

    /// Fresh runtime state bound to this cavity.
    pub fn new_state(&self) -> CavityState<'_> {
        CavityState::new(self)
    }

    /// Advance every mode by one step and aggregate the observables.
    ///
    /// The forward drive reaches the coupler without delay, and the same
    /// drive is subtracted from the emitted sum as the reflected wave.
    /// Contributions are summed in ascending mode order.
    ///
    /// A cavity without modes returns zero and leaves `state` untouched.
    ///
    /// # Errors
    ///
    /// - `StateMismatch` if `state` was created from another cavity.
    /// - `InvalidParameter` if a per-mode detuning slice has the wrong length.
    /// - `NonFinite` if any mode output or aggregate is NaN/Inf. Neither the
    ///   mode states nor the observables are modified in that case.
    pub fn step(&self, input: &StepInput<'_>, state: &mut CavityState<'_>) -> CavResult<Phasor> {
        if !state.belongs_to(self) {
            return Err(CavError::StateMismatch {
                what: "cavity state was created from a different cavity",
            });
        }
        if let Detuning::PerMode(values) = input.detuning {
            if values.len() != self.modes.len() {
                return Err(CavError::InvalidParameter {
                    what: "detuning slice length must equal the number of modes",
                });
            }
        }
        if self.modes.is_empty() {
            return Ok(Phasor::new(0.0, 0.0));
        }

        let kg_fwd = input.drive;

        let mut v_sum = Phasor::new(0.0, 0.0);
        let mut probe_sum = Phasor::new(0.0, 0.0);
        let mut em_sum = Phasor::new(0.0, 0.0);

        let staged = state.modes.iter().zip(state.scratch.iter_mut());
        for (index, (mode, (live, scratch))) in self.modes.iter().zip(staged).enumerate() {
            scratch.copy_from(live);
            let out = mode.step(
                &ModeInput {
                    drive: kg_fwd,
                    beam_charge: input.beam_charge,
                    delta_tz: input.delta_tz,
                    delta_omega: input.detuning.get(index),
                },
                scratch,
            );
            if let Err(err) = ensure_finite_phasor(out.v_acc, "mode accelerating voltage") {
                warn!(mode = index, "rejecting cavity step: {err}");
                return Err(err);
            }
            v_sum += out.v_acc;
            probe_sum += out.v_probe;
            em_sum += out.v_em;
        }

        let kg_rfl = input.drive;
        let e_reverse = em_sum - kg_rfl;

        for (v, what) in [
            (v_sum, "accelerating voltage"),
            (probe_sum, "probe signal"),
            (e_reverse, "reverse signal"),
        ] {
            if let Err(err) = ensure_finite_phasor(v, what) {
                warn!("rejecting cavity step: {err}");
                return Err(err);
            }
        }

        std::mem::swap(&mut state.modes, &mut state.scratch);
        state.kg = input.drive;
        state.e_probe = probe_sum;
        state.e_reverse = e_reverse;
        state.v = v_sum;

        Ok(v_sum)
    }

    /// Zero the observables and every mode's filter memory.
    ///
    /// Phase accumulators, detuning and `V_2` are kept; see
    /// [`CavityState::reset_phase`] for a phase reset.
    pub fn clear(&self, state: &mut CavityState<'_>) -> CavResult<()> {
        if !state.belongs_to(self) {
            return Err(CavError::StateMismatch {
                what: "cavity state was created from a different cavity",
            });
        }
        state.clear();
        Ok(())
    }
}

/// Fixed-capacity, index-validated cavity assembly.
///
/// Modes are placed either sequentially with [`push`](Self::push) or at an
/// explicit slot with [`insert`](Self::insert); every slot must be filled
/// exactly once before [`build`](Self::build).
#[derive(Debug)]
pub struct CavityBuilder {
    slots: Vec<Option<ElecMode>>,
    next: usize,
}

impl CavityBuilder {
    pub fn with_capacity(n_modes: usize) -> Self {
        Self {
            slots: (0..n_modes).map(|_| None).collect(),
            next: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Place `mode` in the lowest free slot and return its id.
    pub fn push(&mut self, mode: ElecMode) -> CavResult<ModeId> {
        while self.next < self.slots.len() && self.slots[self.next].is_some() {
            self.next += 1;
        }
        let index = self.next;
        self.insert(index, mode)
    }

    /// Place `mode` at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `index` is past the capacity, `Occupied` if the slot
    /// already holds a mode.
    pub fn insert(&mut self, index: usize, mode: ElecMode) -> CavResult<ModeId> {
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or(CavError::OutOfRange {
            what: "cavity mode slot",
            index,
            len,
        })?;
        if slot.is_some() {
            return Err(CavError::Occupied {
                what: "cavity mode slot",
                index,
            });
        }
        let id = u32::try_from(index)
            .ok()
            .and_then(ModeId::from_index)
            .ok_or(CavError::OutOfRange {
                what: "cavity mode slot",
                index,
                len,
            })?;
        *slot = Some(mode);
        Ok(id)
    }

    /// Freeze into a [`Cavity`].
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if a slot is still empty, plus any error of
    /// [`Cavity::new`].
    pub fn build(self, meta: CavityMeta) -> CavResult<Cavity> {
        let modes = self
            .slots
            .into_iter()
            .collect::<Option<Vec<ElecMode>>>()
            .ok_or(CavError::InvalidParameter {
                what: "every cavity mode slot must be filled",
            })?;
        Cavity::new(modes, meta)
    }
}
