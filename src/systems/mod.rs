//! Elevator systems and observers.
//!
//! Submodules overview
//! - [`audio`] – bridge with the host audio layer (forward/poll message queues)
//! - [`elevator`] – button clicks, animation completion, hold timeout
//! - [`scene`] – build the elevator actors from a descriptor source
//! - [`time`] – update the session clock
//! - [`tween`] – animate local positions over time

pub mod audio;
pub mod elevator;
pub mod scene;
pub mod time;
pub mod tween;
