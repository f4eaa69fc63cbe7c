//! Registry of running actions, grouped per target entity.
//!
//! The [`ActionManager`] resource owns every [`Action`] handed to it. It is
//! stepped once per frame by
//! [`update_actions`](crate::systems::actions::update_actions), which the
//! engine schedules as an ordinary timer at
//! [`ACTION_MANAGER_PRIORITY`](crate::resources::scheduler::ACTION_MANAGER_PRIORITY).
//!
//! Removal is lazy in the same way as in the
//! [`Scheduler`](crate::resources::scheduler::Scheduler): removing an action
//! stops it at once (its target is cleared) but the record stays until the
//! next update walks past it. Actions can therefore remove themselves or their
//! siblings from inside their own step.
//!
//! Actions are stepped in target insertion order, then in the order they were
//! added to that target.

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::actions::{Action, INVALID_TAG, Tag};

new_key_type! {
    /// Handle to an action owned by the [`ActionManager`].
    pub struct ActionId;
}

#[derive(Debug)]
struct Handler {
    target: Entity,
    /// Tag of the action, kept for lookups while it is out being stepped.
    tag: Tag,
    /// `None` while the action is being stepped.
    action: Option<Action>,
    paused: bool,
    /// Removal arrived while the action was out being stepped.
    stop_requested: bool,
}

impl Handler {
    fn request_stop(&mut self) {
        match self.action.as_mut() {
            Some(action) => action.stop(),
            None => self.stop_requested = true,
        }
    }

    /// Still bound and not asked to stop.
    fn is_running(&self) -> bool {
        !self.stop_requested && self.action.as_ref().is_none_or(|a| a.target().is_some())
    }

    fn tag(&self) -> Tag {
        self.action.as_ref().map_or(self.tag, Action::tag)
    }
}

/// What the update loop should do with one handler.
pub(crate) enum Visit {
    /// Erased or being stepped further up the stack.
    Skip,
    Step(Action),
}

#[derive(Resource, Default)]
pub struct ActionManager {
    handlers: SlotMap<ActionId, Handler>,
    by_target: FxHashMap<Entity, SmallVec<[ActionId; 4]>>,
    target_order: Vec<Entity>,
}

impl ActionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action` to `target` and start managing it.
    ///
    /// A paused action keeps its place but is not stepped until
    /// [`resume_target`](Self::resume_target). Other actions on a target that
    /// is already paused are not affected.
    ///
    /// # Panics
    ///
    /// Panics if `action` is already bound.
    pub fn add_action(
        &mut self,
        world: &World,
        mut action: Action,
        target: Entity,
        paused: bool,
    ) -> ActionId {
        assert!(
            action.target().is_none(),
            "cannot add an action that is already running on {:?}",
            action.target()
        );
        action.start_with_target(world, target);
        let id = self.handlers.insert(Handler {
            target,
            tag: action.tag(),
            action: Some(action),
            paused,
            stop_requested: false,
        });
        let ids = self.by_target.entry(target).or_insert_with(|| {
            self.target_order.push(target);
            SmallVec::new()
        });
        ids.push(id);
        log::trace!("added action {:?} on {:?}", id, target);
        id
    }

    /// The action behind `id`, unless erased or currently being stepped.
    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.handlers.get(id).and_then(|h| h.action.as_ref())
    }

    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.handlers.get_mut(id).and_then(|h| h.action.as_mut())
    }

    /// First running action on `target` carrying `tag`.
    ///
    /// An action that is being stepped right now can be found by
    /// [`action_id_by_tag`](Self::action_id_by_tag) and removed by tag, but
    /// is not returned here.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is [`INVALID_TAG`].
    pub fn get_action_by_tag(&self, tag: Tag, target: Entity) -> Option<&Action> {
        self.find_by_tag(tag, target)
            .and_then(|id| self.handlers[id].action.as_ref())
    }

    pub fn get_action_by_tag_mut(&mut self, tag: Tag, target: Entity) -> Option<&mut Action> {
        let id = self.find_by_tag(tag, target)?;
        self.handlers[id].action.as_mut()
    }

    pub fn action_id_by_tag(&self, tag: Tag, target: Entity) -> Option<ActionId> {
        self.find_by_tag(tag, target)
    }

    fn find_by_tag(&self, tag: Tag, target: Entity) -> Option<ActionId> {
        assert!(tag != INVALID_TAG, "cannot look up actions by INVALID_TAG");
        self.by_target.get(&target)?.iter().copied().find(|&id| {
            let handler = &self.handlers[id];
            handler.is_running() && handler.tag() == tag
        })
    }

    /// Actions recorded for `target`, including stopped ones not yet reclaimed.
    pub fn number_of_running_actions_in_target(&self, target: Entity) -> usize {
        self.by_target.get(&target).map_or(0, |ids| ids.len())
    }

    /// Action records across all targets.
    pub fn total_actions(&self) -> usize {
        self.handlers.len()
    }

    /// Targets with at least one action record, in insertion order.
    pub fn targets(&self) -> impl Iterator<Item = Entity> + '_ {
        self.target_order.iter().copied()
    }

    pub fn is_target_paused(&self, target: Entity) -> bool {
        self.by_target
            .get(&target)
            .is_some_and(|ids| !ids.is_empty() && ids.iter().all(|&id| self.handlers[id].paused))
    }

    pub fn pause_target(&mut self, target: Entity) {
        self.set_target_paused(target, true);
    }

    pub fn resume_target(&mut self, target: Entity) {
        self.set_target_paused(target, false);
    }

    fn set_target_paused(&mut self, target: Entity, paused: bool) {
        if let Some(ids) = self.by_target.get(&target) {
            for &id in ids {
                self.handlers[id].paused = paused;
            }
        }
    }

    /// Stop one action. Returns `false` if `id` is unknown.
    pub fn remove_action(&mut self, id: ActionId) -> bool {
        match self.handlers.get_mut(id) {
            Some(handler) => {
                handler.request_stop();
                true
            }
            None => false,
        }
    }

    /// Stop the first running action on `target` with `tag`.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is [`INVALID_TAG`].
    pub fn remove_action_by_tag(&mut self, tag: Tag, target: Entity) -> bool {
        match self.find_by_tag(tag, target) {
            Some(id) => self.remove_action(id),
            None => {
                log::debug!("remove_action_by_tag: no action tagged {tag} on {target:?}");
                false
            }
        }
    }

    pub fn remove_all_actions_from_target(&mut self, target: Entity) {
        if let Some(ids) = self.by_target.get(&target) {
            for &id in ids {
                self.handlers[id].request_stop();
            }
        }
    }

    pub fn remove_all_actions(&mut self) {
        for (_, handler) in self.handlers.iter_mut() {
            handler.request_stop();
        }
    }

    // ----- update protocol, driven by `systems::actions::update_actions` -----

    /// Every action id, by target then insertion order.
    pub(crate) fn ordered_ids(&self) -> Vec<ActionId> {
        self.target_order
            .iter()
            .filter_map(|target| self.by_target.get(target))
            .flat_map(|ids| ids.iter().copied())
            .collect()
    }

    pub(crate) fn handler_target(&self, id: ActionId) -> Option<Entity> {
        self.handlers.get(id).map(|h| h.target)
    }

    /// Reclaim, skip, or hand out the action behind `id` for stepping.
    pub(crate) fn begin_step(&mut self, id: ActionId, target_alive: bool) -> Visit {
        let Some(handler) = self.handlers.get_mut(id) else {
            return Visit::Skip;
        };
        let Some(action) = handler.action.as_mut() else {
            return Visit::Skip;
        };
        if action.target().is_none() {
            self.erase(id);
            return Visit::Skip;
        }
        if !target_alive {
            log::debug!("target {:?} is gone, dropping action {:?}", handler.target, id);
            action.stop();
            self.erase(id);
            return Visit::Skip;
        }
        if handler.paused {
            return Visit::Skip;
        }
        handler.tag = action.tag();
        match handler.action.take() {
            Some(action) => Visit::Step(action),
            None => Visit::Skip,
        }
    }

    /// Put a stepped action back, applying any removal that arrived meanwhile.
    ///
    /// Returns `true` when the action was removed while it was stepping.
    pub(crate) fn end_step(&mut self, id: ActionId, mut action: Action) -> bool {
        match self.handlers.get_mut(id) {
            Some(handler) => {
                let removed = std::mem::take(&mut handler.stop_requested);
                if removed {
                    action.stop();
                }
                handler.action = Some(action);
                removed
            }
            None => {
                log::debug!("action {:?} was erased while stepping", id);
                action.stop();
                true
            }
        }
    }

    fn erase(&mut self, id: ActionId) {
        let Some(handler) = self.handlers.remove(id) else {
            return;
        };
        let target = handler.target;
        let now_empty = match self.by_target.get_mut(&target) {
            Some(ids) => {
                ids.retain(|other| *other != id);
                ids.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.by_target.remove(&target);
            self.target_order.retain(|other| *other != target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn setup() -> (World, ActionManager, Entity) {
        let mut world = World::new();
        let target = world.spawn_empty().id();
        (world, ActionManager::new(), target)
    }

    #[test]
    fn test_add_binds_and_counts() {
        let (world, mut am, target) = setup();
        let id = am.add_action(&world, Action::delay(1.0), target, false);
        assert_eq!(am.action(id).unwrap().target(), Some(target));
        assert_eq!(am.number_of_running_actions_in_target(target), 1);
        assert_eq!(am.total_actions(), 1);
        assert_eq!(am.targets().collect::<Vec<_>>(), vec![target]);
    }

    #[test]
    #[should_panic(expected = "already running")]
    fn test_adding_bound_action_panics() {
        let (world, mut am, target) = setup();
        let mut action = Action::delay(1.0);
        action.start_with_target(&world, target);
        am.add_action(&world, action, target, false);
    }

    #[test]
    fn test_lookup_by_tag_skips_stopped() {
        let (world, mut am, target) = setup();
        let first = am.add_action(&world, Action::delay(1.0).with_tag(7), target, false);
        let second = am.add_action(&world, Action::delay(2.0).with_tag(7), target, false);
        assert_eq!(am.action_id_by_tag(7, target), Some(first));
        assert!(am.remove_action_by_tag(7, target));
        assert_eq!(am.action_id_by_tag(7, target), Some(second));
        assert!(am.get_action_by_tag(8, target).is_none());
    }

    #[test]
    #[should_panic(expected = "INVALID_TAG")]
    fn test_lookup_invalid_tag_panics() {
        let (_, am, target) = setup();
        am.get_action_by_tag(INVALID_TAG, target);
    }

    #[test]
    fn test_removal_is_lazy() {
        let (world, mut am, target) = setup();
        let id = am.add_action(&world, Action::move_by(1.0, Vec2::X), target, false);
        assert!(am.remove_action(id));
        assert!(am.action(id).unwrap().target().is_none());
        assert_eq!(am.number_of_running_actions_in_target(target), 1);
        assert!(matches!(am.begin_step(id, true), Visit::Skip));
        assert_eq!(am.number_of_running_actions_in_target(target), 0);
        assert_eq!(am.targets().count(), 0);
    }

    #[test]
    fn test_removal_while_stepping_is_deferred() {
        let (world, mut am, target) = setup();
        let id = am.add_action(&world, Action::delay(1.0), target, false);
        let Visit::Step(action) = am.begin_step(id, true) else {
            panic!("expected the action to be handed out");
        };
        assert!(am.action(id).is_none());
        am.remove_action(id);
        assert!(am.end_step(id, action));
        assert!(am.action(id).unwrap().target().is_none());
    }

    #[test]
    fn test_pause_skips_and_resume_steps() {
        let (world, mut am, target) = setup();
        let id = am.add_action(&world, Action::delay(1.0), target, false);
        am.pause_target(target);
        assert!(am.is_target_paused(target));
        assert!(matches!(am.begin_step(id, true), Visit::Skip));
        am.resume_target(target);
        let Visit::Step(action) = am.begin_step(id, true) else {
            panic!("expected the action to be handed out");
        };
        am.end_step(id, action);
    }

    #[test]
    fn test_dead_target_is_reclaimed() {
        let (world, mut am, target) = setup();
        let id = am.add_action(&world, Action::delay(1.0), target, false);
        assert!(matches!(am.begin_step(id, false), Visit::Skip));
        assert_eq!(am.total_actions(), 0);
        assert!(am.action(id).is_none());
    }

    #[test]
    fn test_ordered_ids_follow_target_insertion() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut am = ActionManager::new();
        let b1 = am.add_action(&world, Action::delay(1.0), b, false);
        let a1 = am.add_action(&world, Action::delay(1.0), a, false);
        let b2 = am.add_action(&world, Action::delay(1.0), b, false);
        assert_eq!(am.ordered_ids(), vec![b1, b2, a1]);
    }
}
