//! Independent cavities stepped in parallel.
//!
//! Cavity/state pairs share no mutable data, so a bank steps them on the
//! rayon pool. Each cavity's result is reported separately; a failure in one
//! cavity does not prevent the others from advancing.

use cav_core::{CavError, CavResult, Phasor};
use rayon::prelude::*;

use crate::cavity::{Cavity, StepInput};
use crate::state::CavityState;

/// An ordered collection of independent cavities (e.g. one cryomodule).
#[derive(Debug, Clone, PartialEq)]
pub struct CavityBank {
    cavities: Vec<Cavity>,
}

/// Runtime state of a [`CavityBank`], one [`CavityState`] per cavity.
#[derive(Debug, Clone)]
pub struct BankState<'b> {
    states: Vec<CavityState<'b>>,
}

impl CavityBank {
    pub fn new(cavities: Vec<Cavity>) -> Self {
        Self { cavities }
    }

    pub fn len(&self) -> usize {
        self.cavities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cavities.is_empty()
    }

    pub fn cavities(&self) -> &[Cavity] {
        &self.cavities
    }

    pub fn new_state(&self) -> BankState<'_> {
        BankState {
            states: self.cavities.iter().map(CavityState::new).collect(),
        }
    }

    /// Step every cavity with its own input, in parallel.
    ///
    /// Returns one result per cavity, in cavity order.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the number of inputs or states does not match
    /// the number of cavities; nothing is stepped in that case.
    pub fn step(
        &self,
        inputs: &[StepInput<'_>],
        state: &mut BankState<'_>,
    ) -> CavResult<Vec<CavResult<Phasor>>> {
        if inputs.len() != self.cavities.len() {
            return Err(CavError::InvalidParameter {
                what: "bank step needs one input per cavity",
            });
        }
        if state.states.len() != self.cavities.len() {
            return Err(CavError::InvalidParameter {
                what: "bank state does not match bank size",
            });
        }

        Ok(self
            .cavities
            .par_iter()
            .zip(state.states.par_iter_mut())
            .zip(inputs.par_iter())
            .map(|((cavity, st), input)| cavity.step(input, st))
            .collect())
    }

    /// Clear every cavity state.
    pub fn clear(&self, state: &mut BankState<'_>) -> CavResult<()> {
        for (cavity, st) in self.cavities.iter().zip(state.states.iter_mut()) {
            cavity.clear(st)?;
        }
        Ok(())
    }
}

impl<'b> BankState<'b> {
    pub fn states(&self) -> &[CavityState<'b>] {
        &self.states
    }

    pub fn state(&self, index: usize) -> CavResult<&CavityState<'b>> {
        let len = self.states.len();
        self.states.get(index).ok_or(CavError::OutOfRange {
            what: "bank cavity state",
            index,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cavity::CavityMeta;
    use crate::elec_mode::{ElecMode, ElecModeParams};

    fn cavity(q_drive: f64) -> Cavity {
        let params = ElecModeParams {
            r_over_q: 100.0,
            foffset: 0.0,
            lo_w0: 2.0 * std::f64::consts::PI * 1.3e9,
            q0: 1e10,
            q_drive,
            q_probe: 1e10,
            rf_phase: 0.0,
            phase_rev: 0.0,
            phase_probe: 0.0,
            tstep: 1e-6,
            mech_couplings: vec![],
        };
        Cavity::new(vec![ElecMode::new(&params).unwrap()], CavityMeta::default()).unwrap()
    }

    #[test]
    fn parallel_matches_sequential() {
        let bank = CavityBank::new(vec![cavity(3e6), cavity(4e6), cavity(5e6)]);
        let mut bank_state = bank.new_state();

        let singles: Vec<Cavity> = bank.cavities().to_vec();
        let mut single_states: Vec<CavityState<'_>> = singles.iter().map(CavityState::new).collect();

        let inputs = [
            StepInput::new(0.0, Phasor::new(1.0, 0.0), 0.0),
            StepInput::new(0.0, Phasor::new(0.0, 1.0), 0.0),
            StepInput::new(0.0, Phasor::new(0.5, 0.5), 0.0),
        ];
        for _ in 0..50 {
            let results = bank.step(&inputs, &mut bank_state).unwrap();
            for (i, result) in results.into_iter().enumerate() {
                let expected = singles[i].step(&inputs[i], &mut single_states[i]).unwrap();
                assert_eq!(result.unwrap(), expected);
            }
        }
        assert_eq!(bank_state.state(2).unwrap().v(), single_states[2].v());
    }

    #[test]
    fn one_failure_does_not_block_others() {
        let bank = CavityBank::new(vec![cavity(3e6), cavity(3e6)]);
        let mut st = bank.new_state();
        let inputs = [
            StepInput::new(0.0, Phasor::new(f64::NAN, 0.0), 0.0),
            StepInput::new(0.0, Phasor::new(1.0, 0.0), 0.0),
        ];
        let results = bank.step(&inputs, &mut st).unwrap();
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
        assert_eq!(st.state(0).unwrap().v(), Phasor::new(0.0, 0.0));
        assert!(st.state(1).unwrap().v().norm() > 0.0);
    }

    #[test]
    fn input_count_checked() {
        let bank = CavityBank::new(vec![cavity(3e6)]);
        let mut st = bank.new_state();
        assert!(bank.step(&[], &mut st).is_err());
    }

    #[test]
    fn clear_resets_every_cavity() {
        let bank = CavityBank::new(vec![cavity(3e6), cavity(3e6)]);
        let mut st = bank.new_state();
        let inputs = [StepInput::new(0.0, Phasor::new(1.0, 0.0), 0.0); 2];
        bank.step(&inputs, &mut st).unwrap();
        bank.clear(&mut st).unwrap();
        for s in st.states() {
            assert_eq!(s.v(), Phasor::new(0.0, 0.0));
        }
    }
}
