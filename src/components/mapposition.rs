//! World-space position of a target.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Pivot position in world coordinates.
///
/// Written by the movement actions (`MoveTo`, `MoveBy`, `JumpBy`, `Place`).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
