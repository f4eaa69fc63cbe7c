//! Orbiting camera action.
//!
//! Moves a target's [`Camera`] eye along a sphere centered on the camera's
//! `center`, interpolating radius, zenith (angle from +Z) and azimuth (angle in
//! the XY plane from +X). Any starting value left as `None` is read from the
//! camera when the action starts.

use glam::Vec3;

use crate::components::camera::Camera;

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    radius: Option<f32>,
    delta_radius: f32,
    /// Degrees.
    angle_z: Option<f32>,
    delta_angle_z: f32,
    /// Degrees.
    angle_x: Option<f32>,
    delta_angle_x: f32,

    start_radius: f32,
    rad_z: f32,
    rad_x: f32,
    center: Vec3,
}

impl OrbitCamera {
    /// Orbit with explicit starting radius and angles (degrees).
    pub fn new(
        radius: f32,
        delta_radius: f32,
        angle_z: f32,
        delta_angle_z: f32,
        angle_x: f32,
        delta_angle_x: f32,
    ) -> Self {
        Self::build(
            Some(radius),
            delta_radius,
            Some(angle_z),
            delta_angle_z,
            Some(angle_x),
            delta_angle_x,
        )
    }

    /// Orbit starting from wherever the camera currently is.
    pub fn from_current(delta_radius: f32, delta_angle_z: f32, delta_angle_x: f32) -> Self {
        Self::build(None, delta_radius, None, delta_angle_z, None, delta_angle_x)
    }

    fn build(
        radius: Option<f32>,
        delta_radius: f32,
        angle_z: Option<f32>,
        delta_angle_z: f32,
        angle_x: Option<f32>,
        delta_angle_x: f32,
    ) -> Self {
        Self {
            radius,
            delta_radius,
            angle_z,
            delta_angle_z,
            angle_x,
            delta_angle_x,
            start_radius: 0.0,
            rad_z: 0.0,
            rad_x: 0.0,
            center: Vec3::ZERO,
        }
    }

    pub(crate) fn start(&mut self, camera: &Camera) {
        let (radius, zenith, azimuth) = camera.spherical();
        self.start_radius = self.radius.unwrap_or(radius);
        self.rad_z = self.angle_z.map(f32::to_radians).unwrap_or(zenith);
        self.rad_x = self.angle_x.map(f32::to_radians).unwrap_or(azimuth);
        self.center = camera.center;
    }

    pub(crate) fn update(&self, camera: &mut Camera, t: f32) {
        let r = self.start_radius + self.delta_radius * t;
        let za = self.rad_z + self.delta_angle_z.to_radians() * t;
        let xa = self.rad_x + self.delta_angle_x.to_radians() * t;
        let eye = Vec3::new(za.sin() * xa.cos(), za.sin() * xa.sin(), za.cos()) * r;
        camera.set_eye(self.center + eye);
    }

    /// Orbit back from where this one ends to where it starts.
    ///
    /// Starting values read from the camera stay unset, so the reversed orbit
    /// picks up from the camera's position at that time.
    pub(crate) fn reverse(&self) -> Self {
        Self::build(
            self.radius.map(|r| r + self.delta_radius),
            -self.delta_radius,
            self.angle_z.map(|a| a + self.delta_angle_z),
            -self.delta_angle_z,
            self.angle_x.map(|a| a + self.delta_angle_x),
            -self.delta_angle_x,
        )
    }
}
