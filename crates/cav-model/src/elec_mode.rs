//! Single electrical eigenmode of a cavity.
//!
//! Construction derives every coupling coefficient once from the physical
//! parameters; stepping is then a fixed amount of complex arithmetic:
//!
//! ```text
//! v_beam   = q * k_beam * exp(-j * LO_w0 * delta_tz)
//! v_drive  = Kg * k_drive
//! phi[n]   = phi[n-1] + (omega_d_0 + delta_omega) * Tstep
//! v_acc    = H{ (v_drive + v_beam) * exp(-j * phi[n]) } * exp(j * phi[n])
//! v_probe  = v_acc * k_probe
//! v_em     = v_acc * k_em
//! ```
//!
//! where `H` is a unity-DC-gain single-pole low-pass at `-omega_f`.

use std::f64::consts::PI;

use cav_core::constants::BEAM_CHARGE_SCALE;
use cav_core::{CavError, CavResult, Phasor, phase_rotation};
use cav_filter::Filter;
use tracing::debug;

use crate::state::ElecModeState;

/// Physical parameters of one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ElecModeParams {
    /// Shunt impedance over quality factor (Ohm).
    pub r_over_q: f64,
    /// Resonance offset from the nominal RF frequency (Hz).
    pub foffset: f64,
    /// Nominal RF angular frequency (rad/s).
    pub lo_w0: f64,
    /// Unloaded quality factor.
    pub q0: f64,
    /// Drive port external quality factor.
    pub q_drive: f64,
    /// Probe port external quality factor.
    pub q_probe: f64,
    /// Beam phase relative to the RF (rad).
    pub rf_phase: f64,
    /// Phase shift between the cavity cell and the reverse ADC (rad).
    pub phase_rev: f64,
    /// Phase shift between the cavity cell and the probe ADC (rad).
    pub phase_probe: f64,
    /// Simulation time step (s).
    pub tstep: f64,
    /// Electromechanical coupling magnitudes ((rad/s)/V^2), one per
    /// mechanical mode. Sign is ignored.
    pub mech_couplings: Vec<f64>,
}

impl ElecModeParams {
    /// Loaded quality factor: `1 / (1/Q0 + 1/Q_drive + 1/Q_probe)`.
    pub fn loaded_q(&self) -> f64 {
        1.0 / (1.0 / self.q0 + 1.0 / self.q_drive + 1.0 / self.q_probe)
    }

    fn validate(&self) -> CavResult<()> {
        let positive = [
            (self.r_over_q, "r_over_q must be positive and finite"),
            (self.q0, "q0 must be positive and finite"),
            (self.q_drive, "q_drive must be positive and finite"),
            (self.q_probe, "q_probe must be positive and finite"),
            (self.tstep, "tstep must be positive and finite"),
        ];
        for (v, what) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(CavError::InvalidParameter { what });
            }
        }

        let finite = [
            (self.foffset, "foffset must be finite"),
            (self.lo_w0, "lo_w0 must be finite"),
            (self.rf_phase, "rf_phase must be finite"),
            (self.phase_rev, "phase_rev must be finite"),
            (self.phase_probe, "phase_probe must be finite"),
        ];
        for (v, what) in finite {
            if !v.is_finite() {
                return Err(CavError::InvalidParameter { what });
            }
        }

        if self.mech_couplings.iter().any(|m| !m.is_finite()) {
            return Err(CavError::InvalidParameter {
                what: "mechanical couplings must be finite",
            });
        }

        if self.lo_w0 + 2.0 * PI * self.foffset <= 0.0 {
            return Err(CavError::InvalidParameter {
                what: "mode resonance frequency must be positive",
            });
        }
        Ok(())
    }
}

/// Per-step inputs of one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeInput {
    /// Forward drive at the coupler.
    pub drive: Phasor,
    /// Beam charge for this step (pC).
    pub beam_charge: f64,
    /// Beam arrival timing offset (s).
    pub delta_tz: f64,
    /// Detuning perturbation from the mechanical model (rad/s).
    pub delta_omega: f64,
}

/// Per-step outputs of one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeOutput {
    /// Accelerating voltage seen by the beam.
    pub v_acc: Phasor,
    /// Contribution to the probe signal.
    pub v_probe: Phasor,
    /// Contribution to the emitted (reverse) signal.
    pub v_em: Phasor,
}

/// One resonant mode. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ElecMode {
    loaded_q: f64,
    k_beam: Phasor,
    k_drive: f64,
    k_probe: Phasor,
    k_em: Phasor,
    lo_w0: f64,
    omega_f: f64,
    omega_d_0: f64,
    tstep: f64,
    filter: Filter,
    a: Vec<f64>,
    c: Vec<f64>,
}

impl ElecMode {
    /// Derive all coefficients of a mode from its physical parameters.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if a quality factor, R/Q or the time step is not
    /// positive, any input is non-finite, or the mode resonance frequency is
    /// not positive.
    pub fn new(params: &ElecModeParams) -> CavResult<Self> {
        params.validate()?;

        let ElecModeParams {
            r_over_q,
            foffset,
            lo_w0,
            q_drive,
            q_probe,
            rf_phase,
            phase_rev,
            phase_probe,
            tstep,
            ..
        } = *params;

        let loaded_q = params.loaded_q();

        let k_beam = phase_rotation(-rf_phase) * (r_over_q * loaded_q / tstep * BEAM_CHARGE_SCALE);
        let k_drive = 2.0 * (q_drive * r_over_q).sqrt();
        let k_probe = phase_rotation(phase_probe) / (q_probe * r_over_q).sqrt();
        let k_em = phase_rotation(phase_rev) / (q_drive * r_over_q).sqrt();

        let omega_0_mode = lo_w0 + 2.0 * PI * foffset;
        let omega_f = omega_0_mode / (2.0 * loaded_q);
        let omega_d_0 = 2.0 * PI * foffset;

        let mut filter = Filter::allocate(1);
        filter.append_poles(&[Phasor::new(-omega_f, 0.0)], tstep)?;

        let (a, c): (Vec<f64>, Vec<f64>) = params
            .mech_couplings
            .iter()
            .map(|m| {
                let m = m.abs();
                (
                    (m / r_over_q).sqrt() / omega_0_mode,
                    -omega_0_mode * (m * r_over_q).sqrt(),
                )
            })
            .unzip();

        debug!(
            loaded_q,
            omega_f,
            omega_d_0,
            n_mech = a.len(),
            "electrical mode constructed"
        );

        Ok(Self {
            loaded_q,
            k_beam,
            k_drive,
            k_probe,
            k_em,
            lo_w0,
            omega_f,
            omega_d_0,
            tstep,
            filter,
            a,
            c,
        })
    }

    /// Advance the mode by one time step.
    ///
    /// The detuning perturbation is read before the phase update that uses
    /// it, and is recorded in `state` as the last applied value. Non-finite
    /// inputs propagate into the outputs.
    pub fn step(&self, input: &ModeInput, state: &mut ElecModeState) -> ModeOutput {
        let v_beam =
            self.k_beam * input.beam_charge * phase_rotation(-self.lo_w0 * input.delta_tz);
        let v_drive = input.drive * self.k_drive;

        let omega_now = self.omega_d_0 + input.delta_omega;
        let d_phase = state.d_phase + omega_now * self.tstep;
        state.d_phase = d_phase;
        state.delta_omega = input.delta_omega;

        // No omega_f factor here: the filter is normalized to unity DC gain.
        let v_in = (v_drive + v_beam) * phase_rotation(-d_phase);
        let v_acc = self.filter.step(v_in, &mut state.filter) * phase_rotation(d_phase);

        state.v_2 = v_acc.norm_sqr();

        ModeOutput {
            v_acc,
            v_probe: v_acc * self.k_probe,
            v_em: v_acc * self.k_em,
        }
    }

    /// Fresh runtime state for this mode.
    pub fn new_state(&self) -> ElecModeState {
        ElecModeState::allocate(self)
    }

    pub fn loaded_q(&self) -> f64 {
        self.loaded_q
    }

    pub fn k_beam(&self) -> Phasor {
        self.k_beam
    }

    pub fn k_drive(&self) -> f64 {
        self.k_drive
    }

    pub fn k_probe(&self) -> Phasor {
        self.k_probe
    }

    pub fn k_em(&self) -> Phasor {
        self.k_em
    }

    pub fn lo_w0(&self) -> f64 {
        self.lo_w0
    }

    /// Open-loop half bandwidth (rad/s).
    pub fn omega_f(&self) -> f64 {
        self.omega_f
    }

    /// Baseline detuning (rad/s).
    pub fn omega_d_0(&self) -> f64 {
        self.omega_d_0
    }

    pub fn tstep(&self) -> f64 {
        self.tstep
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Mechanical mode coordinate to detuning (rad/s) coefficients, one per
    /// mechanical mode.
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Voltage-squared to force coefficients, one per mechanical mode.
    pub fn c(&self) -> &[f64] {
        &self.c
    }

    pub fn n_mech(&self) -> usize {
        self.a.len()
    }
}
