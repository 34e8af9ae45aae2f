use num_complex::Complex64;

use crate::CavError;

/// Floating point type used throughout system
pub type Real = f64;

/// Complex phasor type used for every RF signal.
pub type Phasor = Complex64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CavError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CavError::NonFinite { what, value: v })
    }
}

/// Finiteness check on both components; reports the first offending one.
pub fn ensure_finite_phasor(v: Phasor, what: &'static str) -> Result<Phasor, CavError> {
    ensure_finite(v.re, what)?;
    ensure_finite(v.im, what)?;
    Ok(v)
}

/// Unit phasor `exp(j*theta)`.
#[inline]
pub fn phase_rotation(theta: Real) -> Phasor {
    Phasor::from_polar(1.0, theta)
}

/// Rotate `v` by `theta` radians.
#[inline]
pub fn phase_shift(v: Phasor, theta: Real) -> Phasor {
    v * phase_rotation(theta)
}
