//! Easing curves and interpolation helpers.
//!
//! An [`Easing`] remaps normalized progress `t` (0.0 to 1.0) before it reaches
//! the wrapped action, see [`Action::ease`](super::Action::ease). Every curve
//! maps 0 to 0 and 1 to 1; `Back` curves overshoot in between.

use std::f32::consts::{FRAC_PI_2, PI};

const BACK_OVERSHOOT: f32 = 1.70158;

/// Easing functions for smooth interpolation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Easing {
    /// Constant speed (no easing).
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
    /// `t^rate`.
    In(f32),
    /// Mirror of [`Easing::In`] with the same rate.
    Out(f32),
    /// [`Easing::In`] for the first half, [`Easing::Out`] for the second.
    InOut(f32),
    SineIn,
    SineOut,
    SineInOut,
    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,
    /// Pulls back slightly before moving forward.
    BackIn,
    /// Overshoots the end and settles back.
    BackOut,
    BounceIn,
    BounceOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0.0, 1.0] first.
    pub fn apply(self, t: f32) -> f32 {
        ease(self, t)
    }

    /// The time-mirrored curve: `reverse(t) == 1 - self(1 - t)`.
    pub fn reverse(self) -> Easing {
        match self {
            Easing::Linear => Easing::Linear,
            Easing::QuadIn => Easing::QuadOut,
            Easing::QuadOut => Easing::QuadIn,
            Easing::QuadInOut => Easing::QuadInOut,
            Easing::CubicIn => Easing::CubicOut,
            Easing::CubicOut => Easing::CubicIn,
            Easing::CubicInOut => Easing::CubicInOut,
            Easing::In(rate) => Easing::Out(rate),
            Easing::Out(rate) => Easing::In(rate),
            Easing::InOut(rate) => Easing::InOut(rate),
            Easing::SineIn => Easing::SineOut,
            Easing::SineOut => Easing::SineIn,
            Easing::SineInOut => Easing::SineInOut,
            Easing::ExponentialIn => Easing::ExponentialOut,
            Easing::ExponentialOut => Easing::ExponentialIn,
            Easing::ExponentialInOut => Easing::ExponentialInOut,
            Easing::BackIn => Easing::BackOut,
            Easing::BackOut => Easing::BackIn,
            Easing::BounceIn => Easing::BounceOut,
            Easing::BounceOut => Easing::BounceIn,
        }
    }
}

fn bounce(t: f32) -> f32 {
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        7.5625 * t * t + 0.984375
    }
}

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
        Easing::In(rate) => t.powf(rate),
        Easing::Out(rate) => 1.0 - (1.0 - t).powf(rate),
        Easing::InOut(rate) => {
            let t = t * 2.0;
            if t < 1.0 {
                0.5 * t.powf(rate)
            } else {
                1.0 - 0.5 * (2.0 - t).powf(rate)
            }
        }
        Easing::SineIn => 1.0 - (t * FRAC_PI_2).cos(),
        Easing::SineOut => (t * FRAC_PI_2).sin(),
        Easing::SineInOut => -0.5 * ((PI * t).cos() - 1.0),
        Easing::ExponentialIn => {
            if t == 0.0 {
                0.0
            } else {
                2f32.powf(10.0 * (t - 1.0))
            }
        }
        Easing::ExponentialOut => {
            if t == 1.0 {
                1.0
            } else {
                1.0 - 2f32.powf(-10.0 * t)
            }
        }
        Easing::ExponentialInOut => {
            if t == 0.0 || t == 1.0 {
                t
            } else if t < 0.5 {
                0.5 * 2f32.powf(10.0 * (2.0 * t - 1.0))
            } else {
                1.0 - 0.5 * 2f32.powf(-10.0 * (2.0 * t - 1.0))
            }
        }
        Easing::BackIn => t * t * ((BACK_OVERSHOOT + 1.0) * t - BACK_OVERSHOOT),
        Easing::BackOut => {
            let p = t - 1.0;
            p * p * ((BACK_OVERSHOOT + 1.0) * p + BACK_OVERSHOOT) + 1.0
        }
        Easing::BounceIn => 1.0 - bounce(1.0 - t),
        Easing::BounceOut => bounce(t),
    }
}

/// Linearly interpolate between two floats.
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate a color channel, rounding and saturating to `u8`.
pub fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    lerp_f32(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    const ALL: [Easing; 20] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::In(2.5),
        Easing::Out(2.5),
        Easing::InOut(3.0),
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExponentialIn,
        Easing::ExponentialOut,
        Easing::ExponentialInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BounceIn,
        Easing::BounceOut,
    ];

    #[test]
    fn test_ease_endpoints() {
        for easing in ALL {
            assert!(approx_eq(ease(easing, 0.0), 0.0), "{:?} at t=0.0", easing);
            assert!(approx_eq(ease(easing, 1.0), 1.0), "{:?} at t=1.0", easing);
        }
    }

    #[test]
    fn test_ease_clamps_input() {
        for easing in ALL {
            assert!(approx_eq(ease(easing, -0.5), 0.0), "{:?} at t=-0.5", easing);
            assert!(approx_eq(ease(easing, 1.5), 1.0), "{:?} at t=1.5", easing);
        }
    }

    #[test]
    fn test_ease_quad_and_cubic_values() {
        assert!(approx_eq(ease(Easing::QuadIn, 0.5), 0.25));
        assert!(approx_eq(ease(Easing::QuadOut, 0.5), 0.75));
        assert!(approx_eq(ease(Easing::QuadInOut, 0.75), 0.875));
        assert!(approx_eq(ease(Easing::CubicIn, 0.5), 0.125));
        assert!(approx_eq(ease(Easing::CubicOut, 0.5), 0.875));
        assert!(approx_eq(ease(Easing::CubicInOut, 0.25), 0.0625));
    }

    #[test]
    fn test_reverse_is_time_mirror() {
        for easing in ALL {
            let mirrored = easing.reverse();
            for i in 0..=20 {
                let t = i as f32 / 20.0;
                let expected = 1.0 - ease(easing, 1.0 - t);
                assert!(
                    (ease(mirrored, t) - expected).abs() < 1e-4,
                    "{:?} reversed at t={}",
                    easing,
                    t
                );
            }
        }
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        for easing in ALL {
            assert_eq!(easing.reverse().reverse(), easing);
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| ease(Easing::BackOut, i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_lerp_helpers() {
        assert!(approx_eq(lerp_f32(-10.0, 10.0, 0.25), -5.0));
        assert_eq!(lerp_u8(0, 255, 0.5), 128);
        assert_eq!(lerp_u8(200, 100, 1.0), 100);
    }
}
