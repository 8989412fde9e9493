//! Elevator prop library.
//!
//! Behavior module for an interactive elevator prop hosted in a virtual-world
//! session: a trigger button raises a platform, holds it, and lowers it back,
//! with optional audio cues. The hosting platform supplies actor creation,
//! transform interpolation, and sound playback; this crate supplies the
//! configuration resolution, cue bookkeeping, and the single-flight transition
//! state machine, wired together as bevy_ecs components, events, and systems.

pub mod components;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod game;
pub mod platform;
pub mod resources;
pub mod systems;
