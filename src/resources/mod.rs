//! ECS resources made available to systems.
//!
//! Long-lived data injected into the world and shared by the engine drivers.
//!
//! Overview
//! - `actionmanager` – running actions per target, stepped once per frame
//! - `gameconfig` – frame rate, time scale and run length from an INI file
//! - `mainthread` – closures posted from other threads for the next tick
//! - `scheduler` – priority-ordered periodic callbacks and the global time scale
//! - `timer` – a single scheduled callback and its selector
//! - `worldtime` – simulation time, delta and frame count
pub mod actionmanager;
pub mod gameconfig;
pub mod mainthread;
pub mod scheduler;
pub mod timer;
pub mod worldtime;
