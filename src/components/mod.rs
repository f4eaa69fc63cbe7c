//! ECS components describing what actions can animate.
//!
//! Targets are plain entities. An action only touches the component it needs;
//! if the target does not carry it, the action runs without visible effect.
//!
//! Submodules overview:
//! - [`camera`] – look-at camera (eye, center, up) driven by `OrbitCamera`
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rotation`] – rotation angle in degrees
//! - [`scale`] – 2D scale factor
//! - [`tint`] – RGBA color modulation; alpha is the entity's opacity
//! - [`visible`] – visibility flag toggled by `Show`, `Hide` and `Blink`

pub mod camera;
pub mod mapposition;
pub mod rotation;
pub mod scale;
pub mod tint;
pub mod visible;
