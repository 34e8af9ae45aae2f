//! Property and regression tests for cavity stepping.

use std::f64::consts::PI;

use cav_core::Phasor;
use cav_model::{Cavity, CavityMeta, CavityState, ElecMode, ElecModeParams, ModeInput, StepInput};
use proptest::prelude::*;

fn params(foffset: f64, q_drive: f64, phase_probe: f64, mech: Vec<f64>) -> ElecModeParams {
    ElecModeParams {
        r_over_q: 100.0,
        foffset,
        lo_w0: 2.0 * PI * 1.3e9,
        q0: 1e10,
        q_drive,
        q_probe: 1e10,
        rf_phase: 0.0,
        phase_rev: 0.0,
        phase_probe,
        tstep: 1e-6,
        mech_couplings: mech,
    }
}

fn three_mode_cavity() -> Cavity {
    let modes = vec![
        ElecMode::new(&params(0.0, 3e6, 0.0, vec![1.0])).unwrap(),
        ElecMode::new(&params(-800e3, 1e7, 1.0, vec![0.5, 2.0])).unwrap(),
        ElecMode::new(&params(1.2e6, 5e5, -2.0, vec![])).unwrap(),
    ];
    Cavity::new(modes, CavityMeta::default()).unwrap()
}

#[test]
fn zero_mode_cavity_returns_zero_and_keeps_state() {
    let cavity = Cavity::new(vec![], CavityMeta::default()).unwrap();
    let mut state = CavityState::new(&cavity);
    let v = cavity
        .step(&StepInput::new(1e-9, Phasor::new(3.0, -1.0), 5.0), &mut state)
        .unwrap();
    let zero = Phasor::new(0.0, 0.0);
    assert_eq!(v, zero);
    assert_eq!(state.v(), zero);
    assert_eq!(state.kg(), zero);
    assert_eq!(state.e_probe(), zero);
    assert_eq!(state.e_reverse(), zero);
    assert!(state.mode_states().is_empty());
}

#[test]
fn aggregation_uses_ascending_mode_order() {
    let cavity = three_mode_cavity();
    let mut state = cavity.new_state();
    let mut singles: Vec<_> = cavity.modes().iter().map(ElecMode::new_state).collect();

    for n in 0..40 {
        let drive = Phasor::from_polar(1.0, 0.1 * n as f64);
        let input = StepInput::new(0.0, drive, 0.7);
        cavity.step(&input, &mut state).unwrap();

        let outs: Vec<_> = cavity
            .modes()
            .iter()
            .zip(singles.iter_mut())
            .map(|(mode, st)| {
                mode.step(
                    &ModeInput {
                        drive,
                        beam_charge: 0.7,
                        delta_tz: 0.0,
                        delta_omega: 0.0,
                    },
                    st,
                )
            })
            .collect();

        let mut v = Phasor::new(0.0, 0.0);
        let mut probe = Phasor::new(0.0, 0.0);
        let mut em = Phasor::new(0.0, 0.0);
        for out in &outs {
            v += out.v_acc;
            probe += out.v_probe;
            em += out.v_em;
        }
        assert_eq!(state.v(), v);
        assert_eq!(state.e_probe(), probe);
        assert_eq!(state.e_reverse(), em - drive);

        let mut probe_rev = Phasor::new(0.0, 0.0);
        for out in outs.iter().rev() {
            probe_rev += out.v_probe;
        }
        let scale: f64 = outs.iter().map(|o| o.v_probe.norm()).sum();
        assert!((probe_rev - probe).norm() <= 1e-12 * scale);
    }
}

#[test]
fn clear_keeps_phase_and_detuning() {
    let cavity = three_mode_cavity();
    let mut state = cavity.new_state();
    let detuning = [10.0, -20.0, 30.0];
    let input = StepInput::new(0.0, Phasor::new(1.0, 0.0), 0.0).with_detuning(&detuning);
    for _ in 0..10 {
        state.step(&input).unwrap();
    }
    let phases: Vec<f64> = state.mode_states().iter().map(|m| m.d_phase()).collect();
    cavity.clear(&mut state).unwrap();

    let zero = Phasor::new(0.0, 0.0);
    assert_eq!(state.v(), zero);
    assert_eq!(state.e_probe(), zero);
    assert_eq!(state.e_reverse(), zero);
    assert_eq!(state.kg(), zero);
    for (i, ms) in state.mode_states().iter().enumerate() {
        assert!(ms.filter_state().is_zero());
        assert_eq!(ms.d_phase(), phases[i]);
        assert_eq!(ms.delta_omega(), detuning[i]);
    }
}

proptest! {
    #[test]
    fn mech_coefficients_ignore_sign(m in 0.0f64..10.0, foffset in -1e6f64..1e6) {
        let pos = ElecMode::new(&params(foffset, 3e6, 0.0, vec![m])).unwrap();
        let neg = ElecMode::new(&params(foffset, 3e6, 0.0, vec![-m])).unwrap();
        prop_assert_eq!(pos.a(), neg.a());
        prop_assert_eq!(pos.c(), neg.c());
    }

    #[test]
    fn clear_is_idempotent(steps in 1usize..50, re in -5.0f64..5.0, im in -5.0f64..5.0) {
        let cavity = three_mode_cavity();
        let mut state = cavity.new_state();
        let input = StepInput::new(0.0, Phasor::new(re, im), 1.0);
        for _ in 0..steps {
            state.step(&input).unwrap();
        }
        cavity.clear(&mut state).unwrap();
        let once = state.clone();
        cavity.clear(&mut state).unwrap();
        prop_assert_eq!(state.mode_states(), once.mode_states());
        prop_assert_eq!(state.v(), once.v());
        prop_assert_eq!(state.kg(), once.kg());
        prop_assert_eq!(state.e_probe(), once.e_probe());
        prop_assert_eq!(state.e_reverse(), once.e_reverse());
    }

    #[test]
    fn stepping_is_deterministic(
        drives in proptest::collection::vec((-2.0f64..2.0, -2.0f64..2.0, -1.0f64..1.0), 1..40),
        delta_tz in -1e-9f64..1e-9,
    ) {
        let cavity = three_mode_cavity();
        let mut a = cavity.new_state();
        let mut b = cavity.new_state();
        for &(re, im, q) in &drives {
            let input = StepInput::new(delta_tz, Phasor::new(re, im), q);
            let va = a.step(&input).unwrap();
            let vb = b.step(&input).unwrap();
            prop_assert_eq!(va.re.to_bits(), vb.re.to_bits());
            prop_assert_eq!(va.im.to_bits(), vb.im.to_bits());
        }
        prop_assert_eq!(a.mode_states(), b.mode_states());
        prop_assert_eq!(a.e_reverse(), b.e_reverse());
    }
}
