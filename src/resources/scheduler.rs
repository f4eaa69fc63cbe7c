//! Priority-ordered periodic callbacks.
//!
//! The [`Scheduler`] resource owns every [`Timer`] in the world, keyed by
//! (target, [`Selector`]). It is driven once per frame by
//! [`tick`](crate::systems::scheduler::tick), which runs due timers in
//! ascending priority order (ties in scheduling order) with the delta scaled by
//! [`Scheduler::time_scale`].
//!
//! # Mutation while ticking
//!
//! Callbacks receive `&mut World` and may schedule, unschedule, pause or
//! resume anything, including their own timer. Unscheduling only clears the
//! timer's target; the record is reaped the next time the tick walks past it.
//! Timers added during a tick first run on the following tick.
//!
//! # Example
//!
//! ```ignore
//! world.resource_mut::<Scheduler>().schedule(
//!     spawner,
//!     Selector::new("spawn_wave"),
//!     |world, spawner, _dt| spawn_wave(world, spawner),
//!     2.0,   // every two seconds
//!     false, // not paused
//!     10,    // after the engine update
//! );
//! ```

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::resources::timer::{Selector, Timer, TimerCallback};

new_key_type! {
    /// Handle to a [`Timer`] inside the [`Scheduler`].
    pub struct TimerId;
}

/// Priority of the engine's own update timer, which drives the
/// [`ActionManager`](crate::resources::actionmanager::ActionManager).
///
/// Timers with a lower priority run before actions are stepped, higher ones
/// after.
pub const ACTION_MANAGER_PRIORITY: i32 = -100;

#[derive(Resource)]
pub struct Scheduler {
    timers: SlotMap<TimerId, Timer>,
    /// Live and not-yet-reaped timers sorted by (priority, seq).
    order: Vec<TimerId>,
    /// Live registrations only; cleared on unschedule.
    lookup: FxHashMap<(Entity, Selector), TimerId>,
    time_scale: f32,
    current: Option<TimerId>,
    ticking: bool,
    next_seq: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            order: Vec::new(),
            lookup: FxHashMap::default(),
            time_scale: 1.0,
            current: None,
            ticking: false,
            next_seq: 0,
        }
    }

    /// Schedule `callback` on `target` every `interval` seconds (0 = every tick).
    ///
    /// If (target, selector) is already scheduled, its interval, pause flag
    /// and priority are updated in place and the original callback is kept.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is negative or NaN.
    pub fn schedule(
        &mut self,
        target: Entity,
        selector: Selector,
        callback: impl FnMut(&mut World, Entity, f32) + Send + Sync + 'static,
        interval: f32,
        paused: bool,
        priority: i32,
    ) -> TimerId {
        assert!(
            interval >= 0.0,
            "timer interval must be non-negative, got {interval}"
        );

        if let Some(&id) = self.lookup.get(&(target, selector)) {
            let timer = &mut self.timers[id];
            timer.set_interval(interval);
            timer.set_paused(paused);
            if timer.priority != priority {
                timer.priority = priority;
                self.relocate(id);
            }
            log::trace!(
                "rescheduled {:?}/{} interval={} priority={}",
                target,
                selector.name(),
                interval,
                priority
            );
            return id;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let callback: TimerCallback = Box::new(callback);
        let id = self.timers.insert(Timer::new(
            target, selector, callback, interval, paused, priority, seq,
        ));
        self.lookup.insert((target, selector), id);
        let at = self.insertion_point(priority, seq);
        self.order.insert(at, id);
        id
    }

    /// Shorthand for a per-frame [`Selector::UPDATE`] callback.
    pub fn schedule_update(
        &mut self,
        target: Entity,
        callback: impl FnMut(&mut World, Entity, f32) + Send + Sync + 'static,
        priority: i32,
        paused: bool,
    ) -> TimerId {
        self.schedule(target, Selector::UPDATE, callback, 0.0, paused, priority)
    }

    fn insertion_point(&self, priority: i32, seq: u64) -> usize {
        self.order.partition_point(|&other| {
            let t = &self.timers[other];
            (t.priority, t.seq) < (priority, seq)
        })
    }

    fn relocate(&mut self, id: TimerId) {
        self.order.retain(|&other| other != id);
        let (priority, seq) = {
            let t = &self.timers[id];
            (t.priority, t.seq)
        };
        let at = self.insertion_point(priority, seq);
        self.order.insert(at, id);
    }

    /// Stop calling (target, selector). Returns `false` if it was not scheduled.
    pub fn unschedule(&mut self, target: Entity, selector: Selector) -> bool {
        match self.lookup.remove(&(target, selector)) {
            Some(id) => {
                self.timers[id].invalidate();
                true
            }
            None => {
                log::debug!(
                    "unschedule: {:?}/{} is not scheduled",
                    target,
                    selector.name()
                );
                false
            }
        }
    }

    /// Unschedule every timer of `target`.
    pub fn unschedule_all_for_target(&mut self, target: Entity) {
        let timers = &mut self.timers;
        self.lookup.retain(|&(owner, _), &mut id| {
            if owner == target {
                timers[id].invalidate();
                false
            } else {
                true
            }
        });
    }

    /// Unschedule every timer in the world, the engine's own update included.
    ///
    /// Nothing scheduled keeps running afterwards; meant for shutdown.
    pub fn unschedule_all(&mut self) {
        for (_, timer) in self.timers.iter_mut() {
            timer.invalidate();
        }
        self.lookup.clear();
    }

    pub fn pause_target(&mut self, target: Entity) {
        self.set_target_paused(target, true);
    }

    pub fn resume_target(&mut self, target: Entity) {
        self.set_target_paused(target, false);
    }

    fn set_target_paused(&mut self, target: Entity, paused: bool) {
        for (_, timer) in self.timers.iter_mut() {
            if timer.target() == Some(target) {
                timer.set_paused(paused);
            }
        }
    }

    /// Multiplier applied to every delta passed to callbacks.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// # Panics
    ///
    /// Panics if `scale` is not strictly positive.
    pub fn set_time_scale(&mut self, scale: f32) {
        assert!(scale > 0.0, "time scale must be positive, got {scale}");
        self.time_scale = scale;
    }

    pub fn is_scheduled(&self, target: Entity, selector: Selector) -> bool {
        self.lookup.contains_key(&(target, selector))
    }

    pub fn timer_id(&self, target: Entity, selector: Selector) -> Option<TimerId> {
        self.lookup.get(&(target, selector)).copied()
    }

    pub fn timer(&self, id: TimerId) -> Option<&Timer> {
        self.timers.get(id)
    }

    /// Number of timer records, including unscheduled ones not yet reaped.
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// The timer whose callback is running right now, if any.
    pub fn current_timer(&self) -> Option<TimerId> {
        self.current
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    // ----- tick protocol, driven by `systems::scheduler::tick` -----

    /// Enter a tick and snapshot the run order.
    pub(crate) fn begin_tick(&mut self) -> Vec<TimerId> {
        assert!(!self.ticking, "Scheduler::tick called re-entrantly");
        debug_assert!(self.current.is_none());
        self.ticking = true;
        self.order.clone()
    }

    pub(crate) fn end_tick(&mut self) {
        self.ticking = false;
        self.current = None;
    }

    /// Remove a timer record for good.
    pub(crate) fn reap(&mut self, id: TimerId) {
        if let Some(timer) = self.timers.remove(id) {
            if let Some(target) = timer.target() {
                if self.lookup.get(&(target, timer.selector())) == Some(&id) {
                    self.lookup.remove(&(target, timer.selector()));
                }
            }
            self.order.retain(|&other| other != id);
            log::trace!("reaped timer {:?}", timer);
        }
    }

    /// Advance `id` by `dt`; if due, hand out its callback and mark it current.
    pub(crate) fn fire(&mut self, id: TimerId, dt: f32) -> Option<(TimerCallback, f32)> {
        let timer = self.timers.get_mut(id)?;
        if timer.is_paused() {
            return None;
        }
        let fired = timer.advance(dt)?;
        let callback = timer.callback.take()?;
        self.current = Some(id);
        Some((callback, fired))
    }

    /// Give the callback back after it ran.
    pub(crate) fn restore(&mut self, id: TimerId, callback: TimerCallback) {
        if let Some(timer) = self.timers.get_mut(id) {
            timer.callback = Some(callback);
        }
        self.current = None;
    }
}
