//! Drives the [`Scheduler`] resource.
use bevy_ecs::prelude::*;

use crate::resources::scheduler::Scheduler;

/// Run every due timer once, in priority order.
///
/// `dt` is multiplied by [`Scheduler::time_scale`] before it reaches any
/// timer. Timers that were unscheduled, or whose target no longer exists, are
/// reaped as the walk reaches them. Timers added by a callback wait for the
/// next tick.
///
/// # Panics
///
/// Panics if `dt` is negative or if called from inside a timer callback.
pub fn tick(world: &mut World, dt: f32) {
    assert!(dt >= 0.0, "tick delta must be non-negative, got {dt}");

    let (order, scaled) = {
        let mut scheduler = world.resource_mut::<Scheduler>();
        let order = scheduler.begin_tick();
        (order, dt * scheduler.time_scale())
    };

    for id in order {
        let target = match world.resource::<Scheduler>().timer(id) {
            Some(timer) => timer.target(),
            None => continue,
        };
        let Some(target) = target else {
            world.resource_mut::<Scheduler>().reap(id);
            continue;
        };
        if world.get_entity(target).is_err() {
            log::debug!("timer target {:?} is gone, reaping {:?}", target, id);
            world.resource_mut::<Scheduler>().reap(id);
            continue;
        }

        let Some((mut callback, fired)) = world.resource_mut::<Scheduler>().fire(id, scaled) else {
            continue;
        };
        callback(world, target, fired);
        world.resource_mut::<Scheduler>().restore(id, callback);
    }

    world.resource_mut::<Scheduler>().end_tick();
}
