//! Rotation of a target, animated by `RotateTo` and `RotateBy`.

use bevy_ecs::prelude::Component;

/// Rotation angle in degrees, clockwise. Not wrapped; `RotateBy` can wind it
/// past 360.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}

impl Rotation {
    pub fn new(degrees: f32) -> Self {
        Self { degrees }
    }
}
