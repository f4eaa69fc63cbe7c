//! Drives the [`ActionManager`] resource and offers world-level helpers for
//! handing it actions.
use bevy_ecs::prelude::*;

use crate::actions::Action;
use crate::events::action::ActionFinished;
use crate::resources::actionmanager::{ActionId, ActionManager, Visit};

/// Step every running, unpaused action by `dt`.
///
/// Actions see the world while they step and may add or remove actions,
/// their own included. Removed actions and actions whose target was despawned
/// are reclaimed when the walk reaches them. Finished actions are stopped and
/// announced with [`ActionFinished`], unless they were removed during the
/// step that finished them.
pub fn update_actions(world: &mut World, dt: f32) {
    let ids = world.resource::<ActionManager>().ordered_ids();
    for id in ids {
        let Some(target) = world.resource::<ActionManager>().handler_target(id) else {
            continue;
        };
        let alive = world.get_entity(target).is_ok();
        let mut action = match world.resource_mut::<ActionManager>().begin_step(id, alive) {
            Visit::Step(action) => action,
            Visit::Skip => continue,
        };

        action.step(world, dt);

        let finished = action.is_done() && action.target().is_some();
        if finished {
            action.stop();
        }
        let tag = action.tag();
        let removed = world.resource_mut::<ActionManager>().end_step(id, action);
        if finished && !removed {
            world.trigger(ActionFinished {
                entity: target,
                id,
                tag,
            });
        }
    }
}

/// Hand `action` to the manager for `target`.
pub fn add_action(world: &mut World, action: Action, target: Entity, paused: bool) -> ActionId {
    world.resource_scope(|world, mut manager: Mut<ActionManager>| {
        manager.add_action(world, action, target, paused)
    })
}

/// Start running `action` on `target` right away.
pub fn run_action(world: &mut World, target: Entity, action: Action) -> ActionId {
    add_action(world, action, target, false)
}
