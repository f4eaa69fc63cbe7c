//! Engine systems.
//!
//! Free functions taking `&mut World` that advance the engine by one frame.
//!
//! Submodules overview
//! - [`actions`] – step the action manager and hand it new actions
//! - [`mainthread`] – run closures posted from other threads
//! - [`scheduler`] – run due timers in priority order
//! - [`time`] – update simulation time, delta and frame count

pub mod actions;
pub mod mainthread;
pub mod scheduler;
pub mod time;
