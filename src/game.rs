//! Engine assembly and the headless demo scene.
//!
//! [`Engine`] owns the [`World`], inserts the shared resources and registers
//! its own per-frame timer on the [`Scheduler`] at
//! [`ACTION_MANAGER_PRIORITY`]. That timer advances [`WorldTime`] and steps
//! the [`ActionManager`]; every other timer is ordered around it by priority.
//!
//! One frame:
//!
//! 1. closures posted through the [`MainThreadQueue`] run
//! 2. [`tick`] runs due timers in priority order with the scaled delta

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};

use crate::actions::Action;
use crate::actions::ease::Easing;
use crate::actions::orbit::OrbitCamera;
use crate::components::camera::Camera;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::tint::Tint;
use crate::components::visible::Visible;
use crate::events::action::ActionFinished;
use crate::resources::actionmanager::ActionManager;
use crate::resources::gameconfig::GameConfig;
use crate::resources::mainthread::MainThreadQueue;
use crate::resources::scheduler::{ACTION_MANAGER_PRIORITY, Scheduler};
use crate::resources::timer::Selector;
use crate::resources::worldtime::WorldTime;
use crate::systems::actions::{run_action, update_actions};
use crate::systems::mainthread::run_main_thread_calls;
use crate::systems::scheduler::tick;
use crate::systems::time::update_world_time;

/// Marker for the entity that owns the engine's update timer.
#[derive(Component, Debug)]
pub struct EngineClock;

pub struct Engine {
    world: World,
    clock: Entity,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(GameConfig::new())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let mut world = World::new();
        let mut scheduler = Scheduler::new();
        scheduler.set_time_scale(config.time_scale);
        world.insert_resource(scheduler);
        world.insert_resource(ActionManager::new());
        world.insert_resource(WorldTime::default());
        world.insert_resource(MainThreadQueue::new());
        world.insert_resource(config);

        let clock = world.spawn(EngineClock).id();
        world.resource_mut::<Scheduler>().schedule_update(
            clock,
            engine_update,
            ACTION_MANAGER_PRIORITY,
            false,
        );
        log::debug!("engine ready, clock entity {:?}", clock);

        Self { world, clock }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The entity whose timer steps actions; pausing it freezes all actions.
    pub fn clock(&self) -> Entity {
        self.clock
    }

    /// Advance one frame by `dt` unscaled seconds.
    pub fn tick(&mut self, dt: f32) {
        run_main_thread_calls(&mut self.world);
        tick(&mut self.world, dt);
    }

    /// Run `frames` ticks at the configured fixed delta.
    pub fn run_frames(&mut self, frames: u64) {
        let dt = self.world.resource::<GameConfig>().fixed_delta();
        for _ in 0..frames {
            self.tick(dt);
        }
    }
}

fn engine_update(world: &mut World, _clock: Entity, dt: f32) {
    update_world_time(world, dt);
    update_actions(world, dt);
}

/// Entities created by [`setup_demo_scene`].
#[derive(Debug, Clone, Copy)]
pub struct DemoScene {
    pub ball: Entity,
    pub ship: Entity,
    pub camera: Entity,
}

const BALL_TAG: i32 = 1;
const SHIP_TAG: i32 = 2;
const CAMERA_TAG: i32 = 3;

/// Populate the world with a few animated entities and a stats timer.
pub fn setup_demo_scene(world: &mut World) -> DemoScene {
    let ball = world
        .spawn((
            MapPosition::new(0.0, 0.0),
            Scale::new(1.0, 1.0),
            Tint::default(),
            Visible(true),
        ))
        .id();
    let ship = world
        .spawn((
            MapPosition::new(-100.0, 50.0),
            Rotation::default(),
            Tint::default(),
            Visible(true),
        ))
        .id();
    let camera = world.spawn(Camera::default()).id();

    let bounce = Action::sequence([
        Action::move_by(0.5, Vec2::new(0.0, 40.0)).eased(Easing::QuadOut),
        Action::move_by(0.5, Vec2::new(0.0, -40.0)).eased(Easing::BounceOut),
    ]);
    run_action(world, ball, Action::repeat_forever(bounce).with_tag(BALL_TAG));

    let flight = Action::sequence([
        Action::move_to(1.0, Vec2::new(100.0, 50.0)),
        Action::spawn([Action::rotate_by(0.5, 180.0), Action::tint_to(0.5, 255, 80, 80)]),
        Action::blink(0.5, 3),
        Action::fade_out(0.5),
        Action::call_func(|_, ship| log::info!("ship {:?} leaving the scene", ship)),
        Action::remove_self(),
    ]);
    run_action(world, ship, flight.with_tag(SHIP_TAG));

    let pan = Action::orbit_camera(2.0, OrbitCamera::new(10.0, 0.0, 0.0, 90.0, 0.0, 0.0));
    let pan_back = pan.reverse();
    run_action(
        world,
        camera,
        Action::repeat(Action::sequence([pan, pan_back]), 2).with_tag(CAMERA_TAG),
    );

    world.add_observer(|finished: On<ActionFinished>| {
        log::info!(
            "action {:?} (tag {}) finished on {:?}",
            finished.id,
            finished.tag,
            finished.entity
        );
    });

    world.resource_mut::<Scheduler>().schedule(
        camera,
        Selector::new("report"),
        report_stats,
        1.0,
        false,
        0,
    );

    DemoScene { ball, ship, camera }
}

fn report_stats(world: &mut World, camera: Entity, _dt: f32) {
    let time = *world.resource::<WorldTime>();
    let actions = world.resource::<ActionManager>().total_actions();
    let timers = world.resource::<Scheduler>().timer_count();
    let eye = world
        .get::<Camera>(camera)
        .map(|c| c.eye)
        .unwrap_or(Vec3::ZERO);
    log::info!(
        "t={:.2}s frame={} actions={} timers={} camera eye=({:.2}, {:.2}, {:.2})",
        time.elapsed,
        time.frame_count,
        actions,
        timers,
        eye.x,
        eye.y,
        eye.z
    );
}
