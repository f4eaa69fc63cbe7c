//! Interval leaf actions.
//!
//! A [`Tween`] turns normalized progress `t` into a component value on the
//! target. Start values are captured in `start` from the target's current
//! state, so "By" actions compose with whatever ran before them.
//!
//! - movement: `MoveTo`, `MoveBy`, `JumpBy` on [`MapPosition`]
//! - rotation: `RotateTo` (shortest arc), `RotateBy` on [`Rotation`]
//! - scale: `ScaleTo`, `ScaleBy` on [`Scale`]
//! - opacity and color: `FadeTo`, `FadeIn`, `FadeOut`, `TintTo`, `TintBy` on [`Tint`]
//! - visibility: `Blink` on [`Visible`]
//! - camera: `Orbit` on [`Camera`]
//! - `Delay` does nothing for its duration

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::actions::ease::{lerp_f32, lerp_u8};
use crate::actions::orbit::OrbitCamera;
use crate::actions::with_component_mut;
use crate::components::camera::Camera;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::tint::Tint;
use crate::components::visible::Visible;

#[derive(Clone, Debug, PartialEq)]
pub enum Tween {
    Delay,
    MoveTo { to: Vec2, from: Vec2 },
    MoveBy { delta: Vec2, from: Vec2 },
    JumpBy {
        delta: Vec2,
        height: f32,
        jumps: u32,
        from: Vec2,
    },
    RotateTo { to: f32, from: f32, diff: f32 },
    RotateBy { angle: f32, from: f32 },
    ScaleTo { to: Vec2, from: Vec2 },
    ScaleBy { by: Vec2, from: Vec2 },
    FadeTo { to: u8, from: u8 },
    /// Opacity 0 to 255.
    FadeIn,
    /// Opacity 255 to 0.
    FadeOut,
    TintTo { to: [u8; 3], from: [u8; 3] },
    TintBy { delta: [i16; 3], from: [i16; 3] },
    Blink { times: u32, initially_visible: bool },
    Orbit(OrbitCamera),
}

/// Wrap `degrees` into [-180, 180].
fn shortest_arc(degrees: f32) -> f32 {
    let mut d = degrees % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

impl Tween {
    /// Capture start values from the target.
    pub(crate) fn start(&mut self, world: &World, target: Entity) {
        match self {
            Tween::Delay | Tween::FadeIn | Tween::FadeOut => {}
            Tween::MoveTo { from, .. }
            | Tween::MoveBy { from, .. }
            | Tween::JumpBy { from, .. } => {
                if let Some(p) = world.get::<MapPosition>(target) {
                    *from = p.pos;
                }
            }
            Tween::RotateTo { to, from, diff } => {
                if let Some(r) = world.get::<Rotation>(target) {
                    *from = r.degrees % 360.0;
                }
                *diff = shortest_arc(*to - *from);
            }
            Tween::RotateBy { from, .. } => {
                if let Some(r) = world.get::<Rotation>(target) {
                    *from = r.degrees;
                }
            }
            Tween::ScaleTo { from, .. } | Tween::ScaleBy { from, .. } => {
                if let Some(s) = world.get::<Scale>(target) {
                    *from = s.scale;
                }
            }
            Tween::FadeTo { from, .. } => {
                if let Some(tint) = world.get::<Tint>(target) {
                    *from = tint.opacity();
                }
            }
            Tween::TintTo { from, .. } => {
                if let Some(tint) = world.get::<Tint>(target) {
                    *from = [tint.color.r, tint.color.g, tint.color.b];
                }
            }
            Tween::TintBy { from, .. } => {
                if let Some(tint) = world.get::<Tint>(target) {
                    *from = [
                        tint.color.r as i16,
                        tint.color.g as i16,
                        tint.color.b as i16,
                    ];
                }
            }
            Tween::Blink {
                initially_visible, ..
            } => {
                *initially_visible = world.get::<Visible>(target).is_none_or(|v| v.0);
            }
            Tween::Orbit(orbit) => {
                if let Some(camera) = world.get::<Camera>(target) {
                    orbit.start(camera);
                }
            }
        }
    }

    /// Apply progress `t` to the target.
    pub(crate) fn update(&self, world: &mut World, target: Entity, t: f32) {
        match self {
            Tween::Delay => {}
            Tween::MoveTo { to, from } => {
                with_component_mut::<MapPosition>(world, target, |p| p.pos = from.lerp(*to, t));
            }
            Tween::MoveBy { delta, from } => {
                with_component_mut::<MapPosition>(world, target, |p| p.pos = *from + *delta * t);
            }
            Tween::JumpBy {
                delta,
                height,
                jumps,
                from,
            } => {
                let frac = (t * *jumps as f32).fract();
                let y = height * 4.0 * frac * (1.0 - frac) + delta.y * t;
                let x = delta.x * t;
                with_component_mut::<MapPosition>(world, target, |p| {
                    p.pos = *from + Vec2::new(x, y)
                });
            }
            Tween::RotateTo { from, diff, .. } => {
                with_component_mut::<Rotation>(world, target, |r| r.degrees = from + diff * t);
            }
            Tween::RotateBy { angle, from } => {
                with_component_mut::<Rotation>(world, target, |r| r.degrees = from + angle * t);
            }
            Tween::ScaleTo { to, from } => {
                with_component_mut::<Scale>(world, target, |s| s.scale = from.lerp(*to, t));
            }
            Tween::ScaleBy { by, from } => {
                let to = *from * *by;
                with_component_mut::<Scale>(world, target, |s| s.scale = from.lerp(to, t));
            }
            Tween::FadeTo { to, from } => {
                with_component_mut::<Tint>(world, target, |tint| {
                    tint.set_opacity(lerp_u8(*from, *to, t))
                });
            }
            Tween::FadeIn => {
                with_component_mut::<Tint>(world, target, |tint| {
                    tint.set_opacity(lerp_u8(0, 255, t))
                });
            }
            Tween::FadeOut => {
                with_component_mut::<Tint>(world, target, |tint| {
                    tint.set_opacity(lerp_u8(255, 0, t))
                });
            }
            Tween::TintTo { to, from } => {
                with_component_mut::<Tint>(world, target, |tint| {
                    tint.color.r = lerp_u8(from[0], to[0], t);
                    tint.color.g = lerp_u8(from[1], to[1], t);
                    tint.color.b = lerp_u8(from[2], to[2], t);
                });
            }
            Tween::TintBy { delta, from } => {
                let channel = |i: usize| {
                    let start = from[i] as f32;
                    lerp_f32(start, start + delta[i] as f32, t)
                        .round()
                        .clamp(0.0, 255.0) as u8
                };
                with_component_mut::<Tint>(world, target, |tint| {
                    tint.color.r = channel(0);
                    tint.color.g = channel(1);
                    tint.color.b = channel(2);
                });
            }
            Tween::Blink {
                times,
                initially_visible,
            } => {
                let visible = if t >= 1.0 || *times == 0 {
                    *initially_visible
                } else {
                    let slice = 1.0 / *times as f32;
                    (t % slice) > slice / 2.0
                };
                with_component_mut::<Visible>(world, target, |v| v.0 = visible);
            }
            Tween::Orbit(orbit) => {
                with_component_mut::<Camera>(world, target, |camera| orbit.update(camera, t));
            }
        }
    }

    /// Whether [`Tween::reverse`] produces a real inverse.
    ///
    /// Absolute ("To") tweens depend on where the target was when they
    /// started, which a detached action cannot know.
    pub fn is_reversible(&self) -> bool {
        !matches!(
            self,
            Tween::MoveTo { .. }
                | Tween::RotateTo { .. }
                | Tween::ScaleTo { .. }
                | Tween::FadeTo { .. }
                | Tween::TintTo { .. }
        )
    }

    pub(crate) fn reverse(&self) -> Tween {
        match self {
            Tween::MoveBy { delta, .. } => Tween::MoveBy {
                delta: -*delta,
                from: Vec2::ZERO,
            },
            Tween::JumpBy {
                delta,
                height,
                jumps,
                ..
            } => Tween::JumpBy {
                delta: -*delta,
                height: *height,
                jumps: *jumps,
                from: Vec2::ZERO,
            },
            Tween::RotateBy { angle, .. } => Tween::RotateBy {
                angle: -*angle,
                from: 0.0,
            },
            Tween::ScaleBy { by, .. } => Tween::ScaleBy {
                by: Vec2::ONE / *by,
                from: Vec2::ONE,
            },
            Tween::FadeIn => Tween::FadeOut,
            Tween::FadeOut => Tween::FadeIn,
            Tween::TintBy { delta, .. } => Tween::TintBy {
                delta: delta.map(i16::saturating_neg),
                from: [0; 3],
            },
            Tween::Orbit(orbit) => Tween::Orbit(orbit.reverse()),
            Tween::Delay | Tween::Blink { .. } => self.clone(),
            Tween::MoveTo { .. }
            | Tween::RotateTo { .. }
            | Tween::ScaleTo { .. }
            | Tween::FadeTo { .. }
            | Tween::TintTo { .. } => {
                log::trace!("{:?} has no inverse, reversing to a duplicate", self);
                self.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_shortest_arc_wraps() {
        assert!(approx_eq(shortest_arc(270.0), -90.0));
        assert!(approx_eq(shortest_arc(-270.0), 90.0));
        assert!(approx_eq(shortest_arc(90.0), 90.0));
        assert!(approx_eq(shortest_arc(720.0 + 10.0), 10.0));
    }

    #[test]
    fn test_rotate_to_takes_short_way() {
        let mut world = World::new();
        let e = world.spawn(Rotation { degrees: 350.0 }).id();
        let mut tw = Tween::RotateTo {
            to: 10.0,
            from: 0.0,
            diff: 0.0,
        };
        tw.start(&world, e);
        tw.update(&mut world, e, 0.5);
        assert!(approx_eq(world.get::<Rotation>(e).unwrap().degrees, 360.0));
        tw.update(&mut world, e, 1.0);
        assert!(approx_eq(world.get::<Rotation>(e).unwrap().degrees, 370.0));
    }

    #[test]
    fn test_jump_by_lands_on_delta() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::new(0.0, 0.0)).id();
        let mut tw = Tween::JumpBy {
            delta: Vec2::new(100.0, 0.0),
            height: 20.0,
            jumps: 2,
            from: Vec2::ZERO,
        };
        tw.start(&world, e);
        tw.update(&mut world, e, 0.25);
        let mid = world.get::<MapPosition>(e).unwrap().pos;
        assert!(approx_eq(mid.x, 25.0));
        assert!(approx_eq(mid.y, 20.0));
        tw.update(&mut world, e, 1.0);
        let end = world.get::<MapPosition>(e).unwrap().pos;
        assert!(approx_eq(end.x, 100.0));
        assert!(approx_eq(end.y, 0.0));
    }

    #[test]
    fn test_tint_by_saturates() {
        let mut world = World::new();
        let e = world.spawn(Tint::new(250, 10, 100, 255)).id();
        let mut tw = Tween::TintBy {
            delta: [20, -20, 5],
            from: [0; 3],
        };
        tw.start(&world, e);
        tw.update(&mut world, e, 1.0);
        let color = world.get::<Tint>(e).unwrap().color;
        assert_eq!((color.r, color.g, color.b, color.a), (255, 0, 105, 255));
    }

    #[test]
    fn test_tint_by_extreme_delta_clamps() {
        let mut world = World::new();
        let e = world.spawn(Tint::default()).id();
        let mut tw = Tween::TintBy {
            delta: [i16::MAX, i16::MIN, 0],
            from: [0; 3],
        };
        tw.start(&world, e);
        tw.update(&mut world, e, 0.5);
        let color = world.get::<Tint>(e).unwrap().color;
        assert_eq!((color.r, color.g, color.b), (255, 0, 255));
    }

    #[test]
    fn test_tint_by_reverse_saturates_min_delta() {
        let tw = Tween::TintBy {
            delta: [i16::MIN, 7, i16::MAX],
            from: [0; 3],
        };
        assert_eq!(
            tw.reverse(),
            Tween::TintBy {
                delta: [i16::MAX, -7, -i16::MAX],
                from: [0; 3]
            }
        );
    }

    #[test]
    fn test_blink_restores_visibility_at_end() {
        let mut world = World::new();
        let e = world.spawn(Visible(true)).id();
        let mut tw = Tween::Blink {
            times: 4,
            initially_visible: false,
        };
        tw.start(&world, e);
        tw.update(&mut world, e, 0.1);
        assert!(!world.get::<Visible>(e).unwrap().0);
        tw.update(&mut world, e, 0.2);
        assert!(world.get::<Visible>(e).unwrap().0);
        tw.update(&mut world, e, 1.0);
        assert!(world.get::<Visible>(e).unwrap().0);
    }

    #[test]
    fn test_missing_component_is_ignored() {
        let mut world = World::new();
        let e = world.spawn(Rotation::default()).id();
        let mut tw = Tween::MoveBy {
            delta: Vec2::new(1.0, 1.0),
            from: Vec2::ZERO,
        };
        tw.start(&world, e);
        tw.update(&mut world, e, 1.0);
        assert!(world.get::<MapPosition>(e).is_none());
    }

    #[test]
    fn test_reverse_of_relative_tweens_negates() {
        let tw = Tween::MoveBy {
            delta: Vec2::new(3.0, -4.0),
            from: Vec2::ZERO,
        };
        assert_eq!(
            tw.reverse(),
            Tween::MoveBy {
                delta: Vec2::new(-3.0, 4.0),
                from: Vec2::ZERO
            }
        );
        assert_eq!(Tween::FadeIn.reverse(), Tween::FadeOut);
        assert!(Tween::FadeIn.is_reversible());
        assert!(
            !Tween::MoveTo {
                to: Vec2::ONE,
                from: Vec2::ZERO
            }
            .is_reversible()
        );
    }
}
