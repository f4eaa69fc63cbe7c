//! Drains closures posted through a
//! [`MainThreadSender`](crate::resources::mainthread::MainThreadSender).
use bevy_ecs::prelude::*;

use crate::resources::mainthread::MainThreadQueue;

/// Run every queued call, in the order they were posted.
///
/// Calls posted while draining wait for the next frame.
pub fn run_main_thread_calls(world: &mut World) {
    let Some(queue) = world.get_resource::<MainThreadQueue>() else {
        return;
    };
    let calls = queue.drain();
    if !calls.is_empty() {
        log::trace!("running {} main thread call(s)", calls.len());
    }
    for call in calls {
        call(world);
    }
}
