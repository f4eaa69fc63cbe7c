//! Look-at camera attached to a target.
//!
//! The [`Camera`] describes a per-entity view with an `eye`, a `center` it looks
//! at, and an `up` vector. [`OrbitCamera`](crate::actions::orbit::OrbitCamera) moves the
//! eye on a sphere around `center`.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Default distance of the eye from the center along +Z.
pub const DEFAULT_EYE_DISTANCE: f32 = 1.0;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Set whenever one of the vectors changes; the renderer clears it.
    pub dirty: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, DEFAULT_EYE_DISTANCE),
            center: Vec3::ZERO,
            up: Vec3::Y,
            dirty: false,
        }
    }
}

impl Camera {
    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
        self.dirty = true;
    }

    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
        self.dirty = true;
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.dirty = true;
    }

    /// Spherical coordinates of the eye relative to the center.
    ///
    /// Returns `(radius, zenith, azimuth)` with both angles in radians. Degenerate
    /// distances are nudged to `f32::EPSILON` so the angles stay finite.
    pub fn spherical(&self) -> (f32, f32, f32) {
        let d = self.eye - self.center;
        let r = d.length().max(f32::EPSILON);
        let s = d.truncate().length().max(f32::EPSILON);
        let zenith = (d.z / r).clamp(-1.0, 1.0).acos();
        let sin_azimuth = (d.y / s).clamp(-1.0, 1.0).asin();
        let azimuth = if d.x < 0.0 {
            std::f32::consts::PI - sin_azimuth
        } else {
            sin_azimuth
        };
        (r, zenith, azimuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_default_spherical_looks_down_z() {
        let (r, zenith, azimuth) = Camera::default().spherical();
        assert!(approx_eq(r, DEFAULT_EYE_DISTANCE));
        assert!(approx_eq(zenith, 0.0));
        assert!(approx_eq(azimuth, 0.0));
    }

    #[test]
    fn test_spherical_on_negative_x_axis() {
        let mut cam = Camera::default();
        cam.set_eye(Vec3::new(-2.0, 0.0, 0.0));
        let (r, zenith, azimuth) = cam.spherical();
        assert!(approx_eq(r, 2.0));
        assert!(approx_eq(zenith, std::f32::consts::FRAC_PI_2));
        assert!(approx_eq(azimuth, std::f32::consts::PI));
        assert!(cam.dirty);
    }
}
