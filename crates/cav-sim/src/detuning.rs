//! Hook for an external detuning (mechanical) model.
//!
//! After step `n` has produced each mode's `V_2`, the host asks the model for
//! the perturbation to apply on step `n + 1`. The model may read the modes'
//! electromechanical coefficients (`A`, `C`) and the current mode states.

use cav_model::{Cavity, CavityState};

pub trait DetuningModel {
    /// Fill `next` (one entry per mode) with the perturbation (rad/s) for
    /// the step after `step`.
    fn update(
        &mut self,
        step: usize,
        cavity: &Cavity,
        state: &CavityState<'_>,
        next: &mut [f64],
    );
}

/// No perturbation on any mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetuning;

impl DetuningModel for NoDetuning {
    fn update(
        &mut self,
        _step: usize,
        _cavity: &Cavity,
        _state: &CavityState<'_>,
        next: &mut [f64],
    ) {
        next.fill(0.0);
    }
}

/// Fixed per-mode perturbation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDetuning {
    pub delta_omega: Vec<f64>,
}

impl DetuningModel for ConstantDetuning {
    fn update(
        &mut self,
        _step: usize,
        _cavity: &Cavity,
        _state: &CavityState<'_>,
        next: &mut [f64],
    ) {
        for (slot, &dw) in next.iter_mut().zip(&self.delta_omega) {
            *slot = dw;
        }
    }
}
