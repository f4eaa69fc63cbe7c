//! Action completion events.
//!
//! When an action managed by the
//! [`ActionManager`](crate::resources::actionmanager::ActionManager) reports
//! done, an [`ActionFinished`] is triggered after the action has been stopped.
//! Actions removed before they finish, including during their final step, do
//! not trigger it.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|finished: On<ActionFinished>, mut commands: Commands| {
//!     if finished.tag == INTRO_TAG {
//!         commands.entity(finished.entity).insert(Ready);
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;

use crate::actions::Tag;
use crate::resources::actionmanager::ActionId;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ActionFinished {
    /// The action's target.
    pub entity: Entity,
    pub id: ActionId,
    /// The action's tag, possibly [`INVALID_TAG`](crate::actions::INVALID_TAG).
    pub tag: Tag,
}
