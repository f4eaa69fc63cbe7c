//! Event types triggered by the engine.
//!
//! Submodules:
//! - [`action`] – completion notifications for managed actions
pub mod action;
