//! Instantaneous actions.
//!
//! An instant action applies its whole effect in a single `step` and reports
//! done immediately afterwards. Most of them have no meaningful inverse, so
//! their `reverse` is a plain duplicate; [`InstantAction::is_reversible`] tells
//! the two cases apart.

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::actions::with_component_mut;
use crate::components::mapposition::MapPosition;
use crate::components::visible::Visible;

/// Callback run by [`InstantAction::CallFunc`].
///
/// Receives the world and the action's target. It may add or remove actions,
/// schedule timers, or despawn entities.
pub type CallFuncFn = Arc<dyn Fn(&mut World, Entity) + Send + Sync>;

#[derive(Clone)]
pub enum InstantAction {
    Show,
    Hide,
    ToggleVisibility,
    /// Jump straight to a position.
    Place(Vec2),
    CallFunc(CallFuncFn),
    /// Despawn the target.
    RemoveSelf,
}

impl InstantAction {
    pub(crate) fn apply(&self, world: &mut World, target: Entity) {
        match self {
            InstantAction::Show => {
                with_component_mut::<Visible>(world, target, |v| v.0 = true);
            }
            InstantAction::Hide => {
                with_component_mut::<Visible>(world, target, |v| v.0 = false);
            }
            InstantAction::ToggleVisibility => {
                with_component_mut::<Visible>(world, target, |v| v.0 = !v.0);
            }
            InstantAction::Place(pos) => {
                with_component_mut::<MapPosition>(world, target, |p| p.pos = *pos);
            }
            InstantAction::CallFunc(func) => func(world, target),
            InstantAction::RemoveSelf => {
                if world.try_despawn(target).is_err() {
                    log::debug!("RemoveSelf: {:?} was already despawned", target);
                }
            }
        }
    }

    /// Only `ToggleVisibility` is its own inverse.
    pub fn is_reversible(&self) -> bool {
        matches!(self, InstantAction::ToggleVisibility)
    }

    pub(crate) fn reverse(&self) -> InstantAction {
        if !self.is_reversible() {
            log::trace!("{:?} has no inverse, reversing to a duplicate", self);
        }
        self.clone()
    }
}

impl fmt::Debug for InstantAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstantAction::Show => f.write_str("Show"),
            InstantAction::Hide => f.write_str("Hide"),
            InstantAction::ToggleVisibility => f.write_str("ToggleVisibility"),
            InstantAction::Place(pos) => f.debug_tuple("Place").field(pos).finish(),
            InstantAction::CallFunc(_) => f.write_str("CallFunc(..)"),
            InstantAction::RemoveSelf => f.write_str("RemoveSelf"),
        }
    }
}
