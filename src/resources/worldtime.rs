use bevy_ecs::prelude::Resource;

/// Simulation clock advanced by the engine's update timer.
///
/// `delta` is the already scaled delta of the current frame; the scale itself
/// lives on the [`Scheduler`](crate::resources::scheduler::Scheduler).
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub frame_count: u64,
}
