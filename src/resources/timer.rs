//! A single periodic-callback registration owned by the
//! [`Scheduler`](super::scheduler::Scheduler).
//!
//! A [`Timer`] pairs a target entity and a [`Selector`] with a callback, an
//! interval, a priority and a pause flag. Unscheduling clears the target; the
//! scheduler reaps cleared timers on its next tick.

use std::fmt;

use bevy_ecs::prelude::*;

/// Names a callback for deduplication and removal.
///
/// Two registrations with the same target and selector are the same timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Selector(&'static str);

impl Selector {
    /// The conventional per-frame callback.
    pub const UPDATE: Selector = Selector("update");

    pub const fn new(name: &'static str) -> Self {
        Selector(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Callback invoked with the world, the timer's target and the elapsed time.
pub type TimerCallback = Box<dyn FnMut(&mut World, Entity, f32) + Send + Sync>;

pub struct Timer {
    target: Option<Entity>,
    selector: Selector,
    interval: f32,
    elapsed: f32,
    pub(crate) priority: i32,
    paused: bool,
    /// Insertion sequence number, breaks priority ties.
    pub(crate) seq: u64,
    /// `None` only while the callback is executing.
    pub(crate) callback: Option<TimerCallback>,
}

impl Timer {
    pub(crate) fn new(
        target: Entity,
        selector: Selector,
        callback: TimerCallback,
        interval: f32,
        paused: bool,
        priority: i32,
        seq: u64,
    ) -> Self {
        Self {
            target: Some(target),
            selector,
            interval,
            elapsed: 0.0,
            priority,
            paused,
            seq,
            callback: Some(callback),
        }
    }

    /// The target, or `None` once the timer has been unscheduled.
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Seconds between calls; `0.0` means every tick.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Time accumulated towards the next call.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn set_interval(&mut self, interval: f32) {
        self.interval = interval;
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Mark dead. Reaped on the next tick.
    pub(crate) fn invalidate(&mut self) {
        self.target = None;
    }

    /// Accumulate `dt` and return the delta to fire with, if due.
    ///
    /// Interval 0 fires every tick with `dt`. Otherwise the timer fires with
    /// the accumulated time once it reaches the interval, then starts over.
    pub(crate) fn advance(&mut self, dt: f32) -> Option<f32> {
        if self.interval <= 0.0 {
            return Some(dt);
        }
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            let fired = self.elapsed;
            self.elapsed = 0.0;
            Some(fired)
        } else {
            None
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("target", &self.target)
            .field("selector", &self.selector)
            .field("interval", &self.interval)
            .field("elapsed", &self.elapsed)
            .field("priority", &self.priority)
            .field("paused", &self.paused)
            .finish()
    }
}
