//! Composite actions: they own child actions and remap time into them.
//!
//! - [`Sequence`] runs two children back to back. Longer chains are left
//!   folded pairs, see [`Action::sequence`].
//! - [`Spawn`] runs two children in parallel; the shorter one is padded with a
//!   delay at construction so both share the same duration.
//! - [`Repeat`] runs its child `times` times, restarting it in between.
//! - [`Ease`] feeds its child a curved progress value.
//! - [`Speed`] scales the delta passed to its child.
//!
//! `RepeatForever` holds a plain boxed [`Action`] and lives in the stepping
//! logic of [`Action`] itself.

use bevy_ecs::prelude::*;

use crate::actions::Action;
use crate::actions::ease::Easing;

#[derive(Debug)]
pub struct Sequence {
    pub(crate) actions: [Action; 2],
    /// Fraction of the total duration taken by the first child.
    split: f32,
    /// Index of the child that received the last update.
    last: Option<usize>,
}

impl Sequence {
    pub(crate) fn new(first: Action, second: Action) -> Self {
        let total = first.duration() + second.duration();
        let split = first.duration() / total.max(f32::EPSILON);
        Self {
            actions: [first, second],
            split,
            last: None,
        }
    }

    pub(crate) fn start(&mut self) {
        self.last = None;
    }

    pub(crate) fn update(&mut self, world: &mut World, target: Entity, t: f32) {
        let (found, local_t) = if t >= self.split {
            let local = if self.split >= 1.0 {
                1.0
            } else {
                (t - self.split) / (1.0 - self.split)
            };
            (1, local)
        } else {
            let local = if self.split > 0.0 { t / self.split } else { 1.0 };
            (0, local)
        };

        if self.last != Some(found) {
            match self.last {
                // Jumped straight into the second child: play the first one out.
                None if found == 1 => {
                    let first = &mut self.actions[0];
                    first.start_with_target(world, target);
                    first.update(world, 1.0);
                    first.stop();
                }
                Some(prev) => {
                    let end = if prev < found { 1.0 } else { 0.0 };
                    let prev_action = &mut self.actions[prev];
                    prev_action.update(world, end);
                    prev_action.stop();
                }
                None => {}
            }
            self.actions[found].start_with_target(world, target);
        }

        self.actions[found].update(world, local_t);
        self.last = Some(found);
    }

    pub(crate) fn stop(&mut self) {
        if let Some(last) = self.last.take() {
            self.actions[last].stop();
        }
    }
}

#[derive(Debug)]
pub struct Spawn {
    pub(crate) one: Action,
    pub(crate) two: Action,
}

#[derive(Debug)]
pub struct Repeat {
    pub(crate) inner: Action,
    pub(crate) times: u32,
    /// Completed runs of `inner`.
    total: u32,
}

impl Repeat {
    pub(crate) fn new(inner: Action, times: u32) -> Self {
        Self {
            inner,
            times,
            total: 0,
        }
    }

    pub fn times(&self) -> u32 {
        self.times
    }

    pub fn completed(&self) -> u32 {
        self.total
    }

    pub(crate) fn start(&mut self, world: &World, target: Entity) {
        self.total = 0;
        if self.times > 0 {
            self.inner.start_with_target(world, target);
        }
    }

    pub(crate) fn update(&mut self, world: &mut World, target: Entity, t: f32) {
        let progress = t * self.times as f32;
        let completed = (progress.max(0.0).floor() as u32).min(self.times);
        while self.total < completed {
            self.inner.update(world, 1.0);
            self.inner.stop();
            self.total += 1;
            if self.total < self.times {
                self.inner.start_with_target(world, target);
            }
        }
        if self.total < self.times {
            self.inner.update(world, progress - self.total as f32);
        }
    }
}

#[derive(Debug)]
pub struct Ease {
    pub(crate) inner: Action,
    pub(crate) easing: Easing,
}

impl Ease {
    pub fn easing(&self) -> Easing {
        self.easing
    }
}

#[derive(Debug)]
pub struct Speed {
    pub(crate) inner: Action,
    pub(crate) speed: f32,
}

impl Speed {
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change the multiplier; takes effect on the next step.
    pub fn set_speed(&mut self, speed: f32) {
        assert!(speed > 0.0, "speed must be positive, got {speed}");
        self.speed = speed;
    }
}
