//! Cavity definition schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CavityDef {
    pub version: u32,
    pub name: String,
    /// Electrical length (m).
    pub length_m: f64,
    #[serde(default)]
    pub nominal_gradient_v_per_m: f64,
    /// Beam phase relative to the RF, shared by every mode (rad).
    #[serde(default)]
    pub rf_phase_rad: f64,
    #[serde(default)]
    pub design_voltage_v: f64,
    /// Position of the accelerating mode in `modes`.
    #[serde(default)]
    pub fundamental_index: usize,
    pub tstep_s: f64,
    /// Nominal RF (local oscillator) frequency.
    pub rf_frequency_hz: f64,
    #[serde(default)]
    pub modes: Vec<ModeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModeDef {
    pub id: String,
    pub r_over_q_ohm: f64,
    #[serde(default)]
    pub foffset_hz: f64,
    pub q0: f64,
    pub q_drive: f64,
    pub q_probe: f64,
    #[serde(default)]
    pub phase_rev_rad: f64,
    #[serde(default)]
    pub phase_probe_rad: f64,
    /// Electromechanical coupling per mechanical mode ((rad/s)/V^2).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mech_couplings: Vec<f64>,
}

impl CavityDef {
    pub fn mode(&self, id: &str) -> Option<&ModeDef> {
        self.modes.iter().find(|m| m.id == id)
    }

    pub fn fundamental(&self) -> Option<&ModeDef> {
        self.modes.get(self.fundamental_index)
    }
}
