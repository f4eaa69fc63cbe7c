//! Color tint component.
//!
//! The [`Tint`] component carries the color modulation of an entity. Its alpha
//! channel doubles as the entity's opacity, which is what the fade actions
//! (`FadeIn`, `FadeOut`, `FadeTo`) animate, while `TintTo`/`TintBy` animate the
//! RGB channels and leave alpha alone.

use bevy_ecs::prelude::Component;

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// RGB tint and opacity of an entity.
#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct Tint {
    pub color: Color,
}

impl Tint {
    /// Create a new Tint with the specified RGBA values.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            color: Color::new(r, g, b, a),
        }
    }

    /// Current opacity (the alpha channel).
    pub fn opacity(&self) -> u8 {
        self.color.a
    }

    pub fn set_opacity(&mut self, opacity: u8) {
        self.color.a = opacity;
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_opaque_white() {
        let t = Tint::default();
        assert_eq!(t.color, Color::WHITE);
        assert_eq!(t.opacity(), 255);
    }

    #[test]
    fn test_set_opacity_keeps_rgb() {
        let mut t = Tint::new(10, 20, 30, 255);
        t.set_opacity(128);
        assert_eq!(t.color, Color::new(10, 20, 30, 128));
    }
}
