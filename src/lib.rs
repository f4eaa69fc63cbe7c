//! Frame-driven timer scheduling and time-based actions on an ECS world.
//!
//! The crate provides the runtime core an engine loop calls once per frame:
//!
//! - [`resources::scheduler::Scheduler`] runs registered callbacks in
//!   priority order, honouring intervals, pauses and a global time scale
//! - [`resources::actionmanager::ActionManager`] steps composable
//!   [`actions::Action`]s (moves, fades, sequences, repeats, easings) against
//!   their target entities
//! - [`game::Engine`] wires both into a [`bevy_ecs::world::World`]
//!
//! Components, resources, systems and events are exposed for use in
//! integration tests and as a reusable library.

pub mod actions;
pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
