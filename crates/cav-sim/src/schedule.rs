//! Per-step drive and beam inputs.

use cav_core::Phasor;

/// Forward drive as a function of the step index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveSchedule {
    /// No drive.
    Off,
    /// The same drive on every step.
    Constant(Phasor),
    /// Zero before `on_step`, `amplitude` from `on_step` on.
    Step { on_step: usize, amplitude: Phasor },
    /// `amplitude` until `off_step`, zero afterwards (decay measurement).
    Pulse { off_step: usize, amplitude: Phasor },
}

impl DriveSchedule {
    pub fn at(&self, step: usize) -> Phasor {
        let zero = Phasor::new(0.0, 0.0);
        match *self {
            DriveSchedule::Off => zero,
            DriveSchedule::Constant(a) => a,
            DriveSchedule::Step { on_step, amplitude } => {
                if step >= on_step {
                    amplitude
                } else {
                    zero
                }
            }
            DriveSchedule::Pulse { off_step, amplitude } => {
                if step < off_step {
                    amplitude
                } else {
                    zero
                }
            }
        }
    }
}

/// Beam charge (pC) and arrival offset (s) as a function of the step index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeamSchedule {
    /// No beam.
    Off,
    /// One bunch of `charge` on every step, arriving `delta_tz` late.
    Constant { charge: f64, delta_tz: f64 },
    /// One bunch every `period` steps starting at `start`.
    Train {
        start: usize,
        period: usize,
        charge: f64,
        delta_tz: f64,
    },
}

impl BeamSchedule {
    /// `(charge, delta_tz)` for `step`.
    pub fn at(&self, step: usize) -> (f64, f64) {
        match *self {
            BeamSchedule::Off => (0.0, 0.0),
            BeamSchedule::Constant { charge, delta_tz } => (charge, delta_tz),
            BeamSchedule::Train {
                start,
                period,
                charge,
                delta_tz,
            } => {
                if step >= start && period > 0 && (step - start) % period == 0 {
                    (charge, delta_tz)
                } else {
                    (0.0, 0.0)
                }
            }
        }
    }
}
