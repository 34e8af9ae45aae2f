// cav-core/src/units.rs

use uom::si::f64::{AngularVelocity as UomAngularVelocity, Frequency as UomFrequency};

// Public canonical unit types (SI, f64)
pub type AngularVelocity = UomAngularVelocity;
pub type Frequency = UomFrequency;

#[inline]
pub fn hz(v: f64) -> Frequency {
    use uom::si::frequency::hertz;
    Frequency::new::<hertz>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

/// Angular frequency `2*pi*f` of an ordinary frequency.
#[inline]
pub fn angular(f: Frequency) -> AngularVelocity {
    use uom::si::frequency::hertz;
    rad_per_s(2.0 * core::f64::consts::PI * f.get::<hertz>())
}

/// Raw rad/s value of an angular velocity.
#[inline]
pub fn as_rad_per_s(w: AngularVelocity) -> f64 {
    use uom::si::angular_velocity::radian_per_second;
    w.get::<radian_per_second>()
}

pub mod constants {
    /// Beam charge enters the model in picocoulombs; this scales the beam
    /// coupling so that `charge * k_beam` is a voltage.
    pub const BEAM_CHARGE_SCALE: f64 = 1e-12;
}
