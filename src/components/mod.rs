//! ECS components for the elevator prop.
//!
//! Components define the actors the prop spawns into its local frame and the
//! per-elevator behavior state attached to them.
//!
//! Submodules overview:
//! - [`boxcollider`] – axis-aligned box collider with a collision layer
//! - [`cueregistry`] – per-elevator audio cue names, sounds, and playback state
//! - [`elevator`] – single-flight transition controller for the platform
//! - [`libraryactor`] – marks an actor as an instance of a library resource
//! - [`localtransform`] – position and scale in the prop's local frame
//! - [`triggerbutton`] – links a button actor to the elevator it starts
//! - [`tween`] – animated interpolation of local position

pub mod boxcollider;
pub mod cueregistry;
pub mod elevator;
pub mod libraryactor;
pub mod localtransform;
pub mod triggerbutton;
pub mod tween;
