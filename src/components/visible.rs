//! Visibility flag toggled by `Show`, `Hide`, `ToggleVisibility` and `Blink`.

use bevy_ecs::prelude::Component;

/// Whether the renderer should draw the entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visible(pub bool);

impl Default for Visible {
    fn default() -> Self {
        Visible(true)
    }
}
