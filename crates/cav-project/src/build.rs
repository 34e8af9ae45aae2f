//! Turn a validated definition into a runnable cavity model.

use cav_core::{angular, as_rad_per_s, hz};
use cav_model::{Cavity, CavityBuilder, CavityMeta, ElecMode, ElecModeParams};
use tracing::info;

use crate::ProjectResult;
use crate::schema::{CavityDef, ModeDef};
use crate::validate::validate_cavity;

/// Physical parameters for `mode`, inheriting RF phase, LO frequency and
/// time step from the enclosing cavity.
pub fn mode_params(def: &CavityDef, mode: &ModeDef) -> ElecModeParams {
    ElecModeParams {
        r_over_q: mode.r_over_q_ohm,
        foffset: mode.foffset_hz,
        lo_w0: as_rad_per_s(angular(hz(def.rf_frequency_hz))),
        q0: mode.q0,
        q_drive: mode.q_drive,
        q_probe: mode.q_probe,
        rf_phase: def.rf_phase_rad,
        phase_rev: mode.phase_rev_rad,
        phase_probe: mode.phase_probe_rad,
        tstep: def.tstep_s,
        mech_couplings: mode.mech_couplings.clone(),
    }
}

/// Validate `def` and build its cavity, modes in file order.
pub fn build_cavity(def: &CavityDef) -> ProjectResult<Cavity> {
    validate_cavity(def)?;

    let mut builder = CavityBuilder::with_capacity(def.modes.len());
    for mode in &def.modes {
        builder.push(ElecMode::new(&mode_params(def, mode))?)?;
    }

    let cavity = builder.build(CavityMeta {
        length: def.length_m,
        nominal_gradient: def.nominal_gradient_v_per_m,
        rf_phase: def.rf_phase_rad,
        design_voltage: def.design_voltage_v,
        fundamental_index: def.fundamental_index,
    })?;

    info!(
        name = %def.name,
        n_modes = cavity.n_modes(),
        "cavity built from definition"
    );
    Ok(cavity)
}
