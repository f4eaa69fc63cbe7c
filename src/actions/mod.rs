//! Time-stepped actions bound to a target entity.
//!
//! An [`Action`] is a small state machine:
//!
//! ```text
//! Unbound --start_with_target--> Running --step...--> Done --stop--> Unbound
//! ```
//!
//! - `start_with_target` binds the entity and captures start values
//! - `step(dt)` advances time and applies the effect through `update(t)`
//! - `is_done` reports completion; `stop` unbinds (idempotent)
//!
//! Any action can be [reversed](Action::reverse) or
//! [duplicated](Action::duplicate) whether or not it is bound; both return a
//! fresh unbound action.
//!
//! Behavior comes from a closed set of variants in [`ActionKind`]: instants,
//! interval tweens, and composites that own their children. Most code never
//! drives actions directly; hand them to the
//! [`ActionManager`](crate::resources::actionmanager::ActionManager).
//!
//! # Example
//!
//! ```ignore
//! let bounce = Action::sequence([
//!     Action::move_by(0.5, Vec2::new(0.0, 40.0)).eased(Easing::QuadOut),
//!     Action::move_by(0.5, Vec2::new(0.0, -40.0)).eased(Easing::QuadIn),
//! ]);
//! run_action(world, ball, Action::repeat_forever(bounce));
//! ```

pub mod composite;
pub mod ease;
pub mod instant;
pub mod orbit;
pub mod tween;

use std::sync::Arc;

use bevy_ecs::component::Mutable;
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::actions::composite::{Ease, Repeat, Sequence, Spawn, Speed};
use crate::actions::ease::Easing;
use crate::actions::instant::InstantAction;
use crate::actions::orbit::OrbitCamera;
use crate::actions::tween::Tween;

/// Identifier callers attach to actions for lookup and removal.
pub type Tag = i32;

/// Sentinel meaning "no tag". Never valid as a lookup key.
pub const INVALID_TAG: Tag = -1;

/// Run `f` on the target's component `C`, or do nothing if it has none.
pub(crate) fn with_component_mut<C>(world: &mut World, target: Entity, f: impl FnOnce(&mut C))
where
    C: Component<Mutability = Mutable>,
{
    match world.get_mut::<C>(target) {
        Some(mut component) => f(&mut *component),
        None => log::trace!(
            "{:?} has no {} component",
            target,
            std::any::type_name::<C>()
        ),
    }
}

/// The behavior of an [`Action`].
#[derive(Debug)]
pub enum ActionKind {
    Instant(InstantAction),
    Tween(Tween),
    Sequence(Box<Sequence>),
    Spawn(Box<Spawn>),
    Repeat(Box<Repeat>),
    RepeatForever(Box<Action>),
    Ease(Box<Ease>),
    Speed(Box<Speed>),
}

#[derive(Debug)]
pub struct Action {
    tag: Tag,
    target: Option<Entity>,
    duration: f32,
    elapsed: f32,
    /// Instants only: set by their single step.
    done: bool,
    kind: ActionKind,
}

impl Action {
    fn new(kind: ActionKind, duration: f32) -> Self {
        assert!(
            duration >= 0.0,
            "action duration must be non-negative, got {duration}"
        );
        Self {
            tag: INVALID_TAG,
            target: None,
            duration,
            elapsed: 0.0,
            done: false,
            kind,
        }
    }

    fn instant(action: InstantAction) -> Self {
        Self::new(ActionKind::Instant(action), 0.0)
    }

    fn tween(duration: f32, tween: Tween) -> Self {
        Self::new(ActionKind::Tween(tween), duration)
    }

    // ----- instants -----

    pub fn show() -> Self {
        Self::instant(InstantAction::Show)
    }

    pub fn hide() -> Self {
        Self::instant(InstantAction::Hide)
    }

    pub fn toggle_visibility() -> Self {
        Self::instant(InstantAction::ToggleVisibility)
    }

    pub fn place(pos: Vec2) -> Self {
        Self::instant(InstantAction::Place(pos))
    }

    /// Run `func` once with the world and the target.
    pub fn call_func(func: impl Fn(&mut World, Entity) + Send + Sync + 'static) -> Self {
        Self::instant(InstantAction::CallFunc(Arc::new(func)))
    }

    pub fn remove_self() -> Self {
        Self::instant(InstantAction::RemoveSelf)
    }

    // ----- interval leaves -----

    pub fn delay(duration: f32) -> Self {
        Self::tween(duration, Tween::Delay)
    }

    pub fn move_to(duration: f32, to: Vec2) -> Self {
        Self::tween(duration, Tween::MoveTo { to, from: Vec2::ZERO })
    }

    pub fn move_by(duration: f32, delta: Vec2) -> Self {
        Self::tween(
            duration,
            Tween::MoveBy {
                delta,
                from: Vec2::ZERO,
            },
        )
    }

    /// Parabolic hops covering `delta` in total.
    pub fn jump_by(duration: f32, delta: Vec2, height: f32, jumps: u32) -> Self {
        Self::tween(
            duration,
            Tween::JumpBy {
                delta,
                height,
                jumps,
                from: Vec2::ZERO,
            },
        )
    }

    /// Rotate to an absolute angle (degrees) along the shortest arc.
    pub fn rotate_to(duration: f32, degrees: f32) -> Self {
        Self::tween(
            duration,
            Tween::RotateTo {
                to: degrees,
                from: 0.0,
                diff: 0.0,
            },
        )
    }

    pub fn rotate_by(duration: f32, degrees: f32) -> Self {
        Self::tween(
            duration,
            Tween::RotateBy {
                angle: degrees,
                from: 0.0,
            },
        )
    }

    pub fn scale_to(duration: f32, to: Vec2) -> Self {
        Self::tween(duration, Tween::ScaleTo { to, from: Vec2::ONE })
    }

    /// Multiply the current scale by `by`.
    pub fn scale_by(duration: f32, by: Vec2) -> Self {
        Self::tween(duration, Tween::ScaleBy { by, from: Vec2::ONE })
    }

    pub fn fade_to(duration: f32, opacity: u8) -> Self {
        Self::tween(
            duration,
            Tween::FadeTo {
                to: opacity,
                from: 255,
            },
        )
    }

    pub fn fade_in(duration: f32) -> Self {
        Self::tween(duration, Tween::FadeIn)
    }

    pub fn fade_out(duration: f32) -> Self {
        Self::tween(duration, Tween::FadeOut)
    }

    pub fn tint_to(duration: f32, r: u8, g: u8, b: u8) -> Self {
        Self::tween(
            duration,
            Tween::TintTo {
                to: [r, g, b],
                from: [255; 3],
            },
        )
    }

    pub fn tint_by(duration: f32, dr: i16, dg: i16, db: i16) -> Self {
        Self::tween(
            duration,
            Tween::TintBy {
                delta: [dr, dg, db],
                from: [255; 3],
            },
        )
    }

    pub fn blink(duration: f32, times: u32) -> Self {
        Self::tween(
            duration,
            Tween::Blink {
                times,
                initially_visible: true,
            },
        )
    }

    pub fn orbit_camera(duration: f32, orbit: OrbitCamera) -> Self {
        Self::tween(duration, Tween::Orbit(orbit))
    }

    // ----- composites -----

    /// Run `actions` one after another.
    ///
    /// Built as left-folded pairs: `[a, b, c]` becomes `((a, b), c)`.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty or contains an infinite action.
    pub fn sequence(actions: impl IntoIterator<Item = Action>) -> Self {
        let mut iter = actions.into_iter();
        let first = iter
            .next()
            .unwrap_or_else(|| panic!("a sequence needs at least one action"));
        iter.fold(first, Self::sequence_pair)
    }

    fn sequence_pair(first: Action, second: Action) -> Self {
        first.assert_finite("Sequence");
        second.assert_finite("Sequence");
        let duration = first.duration + second.duration;
        Self::new(
            ActionKind::Sequence(Box::new(Sequence::new(first, second))),
            duration,
        )
    }

    /// Run `actions` in parallel. Lasts as long as the longest one.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty or contains an infinite action.
    pub fn spawn(actions: impl IntoIterator<Item = Action>) -> Self {
        let mut iter = actions.into_iter();
        let first = iter
            .next()
            .unwrap_or_else(|| panic!("a spawn needs at least one action"));
        iter.fold(first, Self::spawn_pair)
    }

    fn spawn_pair(one: Action, two: Action) -> Self {
        one.assert_finite("Spawn");
        two.assert_finite("Spawn");
        let (d1, d2) = (one.duration, two.duration);
        let (one, two) = if d1 > d2 {
            (one, Self::sequence_pair(two, Self::delay(d1 - d2)))
        } else if d2 > d1 {
            (Self::sequence_pair(one, Self::delay(d2 - d1)), two)
        } else {
            (one, two)
        };
        Self::new(
            ActionKind::Spawn(Box::new(Spawn { one, two })),
            d1.max(d2),
        )
    }

    pub fn repeat(action: Action, times: u32) -> Self {
        action.assert_finite("Repeat");
        let duration = action.duration * times as f32;
        Self::new(
            ActionKind::Repeat(Box::new(Repeat::new(action, times))),
            duration,
        )
    }

    /// Restart `action` every time it finishes. Never done.
    pub fn repeat_forever(action: Action) -> Self {
        let duration = action.duration;
        Self::new(ActionKind::RepeatForever(Box::new(action)), duration)
    }

    pub fn ease(action: Action, easing: Easing) -> Self {
        action.assert_finite("Ease");
        let duration = action.duration;
        Self::new(
            ActionKind::Ease(Box::new(Ease {
                inner: action,
                easing,
            })),
            duration,
        )
    }

    /// Run `action` `speed` times faster.
    pub fn speed(action: Action, speed: f32) -> Self {
        assert!(speed > 0.0, "speed must be positive, got {speed}");
        let duration = if action.is_infinite() {
            action.duration
        } else {
            action.duration / speed
        };
        Self::new(
            ActionKind::Speed(Box::new(Speed {
                inner: action,
                speed,
            })),
            duration,
        )
    }

    /// Builder shorthand for [`Action::ease`].
    pub fn eased(self, easing: Easing) -> Self {
        Self::ease(self, easing)
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    fn assert_finite(&self, parent: &str) {
        assert!(
            !self.is_infinite(),
            "{parent} cannot contain an action that never finishes"
        );
    }

    // ----- accessors -----

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn set_tag(&mut self, tag: Tag) {
        self.tag = tag;
    }

    /// The bound entity, `None` while unbound or after `stop`.
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Seconds. Zero for instants; for `RepeatForever`, the length of one cycle.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ActionKind {
        &mut self.kind
    }

    pub fn is_instant(&self) -> bool {
        matches!(self.kind, ActionKind::Instant(_))
    }

    /// True for actions that never report done on their own.
    pub fn is_infinite(&self) -> bool {
        match &self.kind {
            ActionKind::RepeatForever(_) => true,
            ActionKind::Speed(speed) => speed.inner.is_infinite(),
            _ => false,
        }
    }

    /// Normalized progress: `elapsed / duration` clamped to [0.0, 1.0].
    ///
    /// A zero duration counts as complete.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    // ----- lifecycle -----

    /// Bind `target` and reset progress.
    ///
    /// # Panics
    ///
    /// Panics if the action is already bound.
    pub fn start_with_target(&mut self, world: &World, target: Entity) {
        assert!(
            self.target.is_none(),
            "action is already bound to {:?}",
            self.target
        );
        self.target = Some(target);
        self.elapsed = 0.0;
        self.done = false;
        match &mut self.kind {
            ActionKind::Instant(_) => {}
            ActionKind::Tween(tween) => tween.start(world, target),
            ActionKind::Sequence(seq) => seq.start(),
            ActionKind::Spawn(spawn) => {
                spawn.one.start_with_target(world, target);
                spawn.two.start_with_target(world, target);
            }
            ActionKind::Repeat(repeat) => repeat.start(world, target),
            ActionKind::RepeatForever(inner) => inner.start_with_target(world, target),
            ActionKind::Ease(ease) => ease.inner.start_with_target(world, target),
            ActionKind::Speed(speed) => speed.inner.start_with_target(world, target),
        }
    }

    /// Advance by `dt` seconds.
    ///
    /// # Panics
    ///
    /// Panics if the action is unbound.
    pub fn step(&mut self, world: &mut World, dt: f32) {
        let Some(target) = self.target else {
            panic!("step called on an unbound action");
        };
        match &mut self.kind {
            ActionKind::Instant(_) => {
                self.update(world, 1.0);
                self.done = true;
            }
            ActionKind::RepeatForever(inner) => {
                self.elapsed += dt;
                inner.step(world, dt);
                if inner.is_done() {
                    let overshoot = (inner.elapsed - inner.duration).max(0.0);
                    inner.stop();
                    inner.start_with_target(world, target);
                    if inner.duration > 0.0 {
                        inner.step(world, overshoot);
                    }
                }
            }
            ActionKind::Speed(speed) => {
                let scaled = dt * speed.speed;
                self.elapsed += dt;
                speed.inner.step(world, scaled);
            }
            _ => {
                self.elapsed += dt;
                let t = self.progress();
                self.update(world, t);
            }
        }
    }

    /// Apply progress `t` (normally 0.0 to 1.0) to the target.
    ///
    /// # Panics
    ///
    /// Panics if the action is unbound.
    pub fn update(&mut self, world: &mut World, t: f32) {
        let Some(target) = self.target else {
            panic!("update called on an unbound action");
        };
        match &mut self.kind {
            ActionKind::Instant(instant) => instant.apply(world, target),
            ActionKind::Tween(tween) => tween.update(world, target, t),
            ActionKind::Sequence(seq) => seq.update(world, target, t),
            ActionKind::Spawn(spawn) => {
                spawn.one.update(world, t);
                spawn.two.update(world, t);
            }
            ActionKind::Repeat(repeat) => repeat.update(world, target, t),
            ActionKind::RepeatForever(inner) => inner.update(world, t),
            ActionKind::Ease(ease) => {
                let eased = ease.easing.apply(t);
                ease.inner.update(world, eased);
            }
            ActionKind::Speed(speed) => speed.inner.update(world, t),
        }
    }

    pub fn is_done(&self) -> bool {
        match &self.kind {
            ActionKind::Instant(_) => self.done,
            ActionKind::RepeatForever(_) => false,
            ActionKind::Speed(speed) => speed.inner.is_done(),
            _ => self.elapsed >= self.duration,
        }
    }

    /// Unbind the target, stopping any running children. Idempotent.
    pub fn stop(&mut self) {
        match &mut self.kind {
            ActionKind::Instant(_) | ActionKind::Tween(_) => {}
            ActionKind::Sequence(seq) => seq.stop(),
            ActionKind::Spawn(spawn) => {
                spawn.one.stop();
                spawn.two.stop();
            }
            ActionKind::Repeat(repeat) => repeat.inner.stop(),
            ActionKind::RepeatForever(inner) => inner.stop(),
            ActionKind::Ease(ease) => ease.inner.stop(),
            ActionKind::Speed(speed) => speed.inner.stop(),
        }
        self.target = None;
    }

    // ----- structure -----

    /// A new unbound action playing this one backwards in time.
    ///
    /// Composites reverse their structure and every child. Actions with no
    /// meaningful inverse (absolute tweens, most instants) come back as
    /// duplicates; check [`Action::is_reversible`] when that matters.
    pub fn reverse(&self) -> Action {
        match &self.kind {
            ActionKind::Instant(instant) => Self::instant(instant.reverse()),
            ActionKind::Tween(tween) => Self::tween(self.duration, tween.reverse()),
            ActionKind::Sequence(seq) => {
                Self::sequence_pair(seq.actions[1].reverse(), seq.actions[0].reverse())
            }
            ActionKind::Spawn(spawn) => Self::spawn_pair(spawn.one.reverse(), spawn.two.reverse()),
            ActionKind::Repeat(repeat) => Self::repeat(repeat.inner.reverse(), repeat.times),
            ActionKind::RepeatForever(inner) => Self::repeat_forever(inner.reverse()),
            ActionKind::Ease(ease) => Self::ease(ease.inner.reverse(), ease.easing.reverse()),
            ActionKind::Speed(speed) => Self::speed(speed.inner.reverse(), speed.speed),
        }
    }

    /// Whether [`Action::reverse`] is a true inverse for this whole tree.
    pub fn is_reversible(&self) -> bool {
        match &self.kind {
            ActionKind::Instant(instant) => instant.is_reversible(),
            ActionKind::Tween(tween) => tween.is_reversible(),
            ActionKind::Sequence(seq) => seq.actions.iter().all(Action::is_reversible),
            ActionKind::Spawn(spawn) => spawn.one.is_reversible() && spawn.two.is_reversible(),
            ActionKind::Repeat(repeat) => repeat.inner.is_reversible(),
            ActionKind::RepeatForever(inner) => inner.is_reversible(),
            ActionKind::Ease(ease) => ease.inner.is_reversible(),
            ActionKind::Speed(speed) => speed.inner.is_reversible(),
        }
    }

    /// A new unbound action with the same parameters and tag.
    ///
    /// Shares no runtime state with `self`; `CallFunc` closures are shared
    /// through their `Arc`.
    pub fn duplicate(&self) -> Action {
        let copy = match &self.kind {
            ActionKind::Instant(instant) => Self::instant(instant.clone()),
            ActionKind::Tween(tween) => Self::tween(self.duration, tween.clone()),
            ActionKind::Sequence(seq) => {
                Self::sequence_pair(seq.actions[0].duplicate(), seq.actions[1].duplicate())
            }
            ActionKind::Spawn(spawn) => Self::new(
                ActionKind::Spawn(Box::new(Spawn {
                    one: spawn.one.duplicate(),
                    two: spawn.two.duplicate(),
                })),
                self.duration,
            ),
            ActionKind::Repeat(repeat) => Self::repeat(repeat.inner.duplicate(), repeat.times),
            ActionKind::RepeatForever(inner) => Self::repeat_forever(inner.duplicate()),
            ActionKind::Ease(ease) => Self::ease(ease.inner.duplicate(), ease.easing),
            ActionKind::Speed(speed) => Self::speed(speed.inner.duplicate(), speed.speed),
        };
        copy.with_tag(self.tag)
    }
}
