//! Cavity definition validation.

use crate::schema::{CavityDef, ModeDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_cavity(def: &CavityDef) -> Result<(), ValidationError> {
    if def.version == 0 || def.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: def.version,
        });
    }

    positive("length_m", def.length_m)?;
    finite("nominal_gradient_v_per_m", def.nominal_gradient_v_per_m)?;
    finite("rf_phase_rad", def.rf_phase_rad)?;
    finite("design_voltage_v", def.design_voltage_v)?;
    positive("tstep_s", def.tstep_s)?;
    positive("rf_frequency_hz", def.rf_frequency_hz)?;

    if !def.modes.is_empty() && def.fundamental_index >= def.modes.len() {
        return Err(ValidationError::InvalidValue {
            field: "fundamental_index".to_string(),
            value: def.fundamental_index.to_string(),
            reason: format!("cavity has {} modes", def.modes.len()),
        });
    }

    let mut ids = HashSet::new();
    for mode in &def.modes {
        if !ids.insert(&mode.id) {
            return Err(ValidationError::DuplicateId {
                id: mode.id.clone(),
                context: format!("cavity '{}' modes", def.name),
            });
        }
        validate_mode(mode, def.rf_frequency_hz)?;
    }

    Ok(())
}

fn validate_mode(mode: &ModeDef, rf_frequency_hz: f64) -> Result<(), ValidationError> {
    if mode.id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "mode id".to_string(),
            value: format!("{:?}", mode.id),
            reason: "must not be empty".to_string(),
        });
    }

    let field = |name: &str| format!("mode '{}' {name}", mode.id);
    positive(&field("r_over_q_ohm"), mode.r_over_q_ohm)?;
    positive(&field("q0"), mode.q0)?;
    positive(&field("q_drive"), mode.q_drive)?;
    positive(&field("q_probe"), mode.q_probe)?;
    finite(&field("foffset_hz"), mode.foffset_hz)?;
    finite(&field("phase_rev_rad"), mode.phase_rev_rad)?;
    finite(&field("phase_probe_rad"), mode.phase_probe_rad)?;

    if rf_frequency_hz + mode.foffset_hz <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field("foffset_hz"),
            value: mode.foffset_hz.to_string(),
            reason: "mode resonance frequency must be positive".to_string(),
        });
    }

    for (i, m) in mode.mech_couplings.iter().enumerate() {
        finite(&field(&format!("mech_couplings[{i}]")), *m)?;
    }

    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}
