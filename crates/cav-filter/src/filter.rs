use cav_core::{CavError, CavResult, Phasor};

/// One first-order section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// Continuous-time pole (rad/s).
    pub pole: Phasor,
    /// Discrete pole `exp(pole * dt)`.
    pub z: Phasor,
    /// Input gain `1 - z`.
    pub gain: Phasor,
}

impl Section {
    fn discretize(pole: Phasor, dt: f64) -> Self {
        let z = (pole * dt).exp();
        Self {
            pole,
            z,
            gain: Phasor::new(1.0, 0.0) - z,
        }
    }
}

/// Cascade of first-order sections with a fixed pole capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    capacity: usize,
    sections: Vec<Section>,
}

impl Filter {
    /// Create an empty filter that can hold up to `pole_capacity` poles.
    pub fn allocate(pole_capacity: usize) -> Self {
        Self {
            capacity: pole_capacity,
            sections: Vec::with_capacity(pole_capacity),
        }
    }

    /// Append continuous-time poles, discretized with time step `dt`.
    ///
    /// Nothing is appended unless every pole is accepted.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `dt` is not a positive finite number or a pole
    ///   is not strictly in the left half plane.
    /// - `OutOfRange` if the poles would exceed the filter capacity.
    pub fn append_poles(&mut self, poles: &[Phasor], dt: f64) -> CavResult<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(CavError::InvalidParameter {
                what: "filter time step must be positive and finite",
            });
        }
        if poles.iter().any(|p| !(p.re.is_finite() && p.im.is_finite() && p.re < 0.0)) {
            return Err(CavError::InvalidParameter {
                what: "filter poles must be finite with negative real part",
            });
        }
        let needed = self.sections.len() + poles.len();
        if needed > self.capacity {
            return Err(CavError::OutOfRange {
                what: "filter pole capacity",
                index: needed - 1,
                len: self.capacity,
            });
        }
        self.sections
            .extend(poles.iter().map(|&p| Section::discretize(p, dt)));
        Ok(())
    }

    /// Advance the filter one step, updating `state` in place.
    ///
    /// Section k feeds section k+1. With no poles configured this is the identity.
    pub fn step(&self, input: Phasor, state: &mut FilterState) -> Phasor {
        let mut x = input;
        for (section, y) in self.sections.iter().zip(state.outputs.iter_mut()) {
            *y = section.z * *y + section.gain * x;
            x = *y;
        }
        x
    }

    /// Zero the runtime memory of `state`.
    pub fn clear_state(&self, state: &mut FilterState) {
        state.outputs.fill(Phasor::new(0.0, 0.0));
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

/// Runtime memory for one instance of a [`Filter`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    outputs: Vec<Phasor>,
}

impl FilterState {
    /// Zeroed state sized for the full capacity of `filter`.
    pub fn allocate(filter: &Filter) -> Self {
        Self {
            outputs: vec![Phasor::new(0.0, 0.0); filter.capacity],
        }
    }

    /// Overwrite this state with `other` without reallocating.
    ///
    /// Both states must come from the same filter.
    pub fn copy_from(&mut self, other: &FilterState) {
        self.outputs.copy_from_slice(&other.outputs);
    }

    /// Per-section outputs from the last step.
    pub fn outputs(&self) -> &[Phasor] {
        &self.outputs
    }

    pub fn is_zero(&self) -> bool {
        self.outputs.iter().all(|y| y.re == 0.0 && y.im == 0.0)
    }
}
