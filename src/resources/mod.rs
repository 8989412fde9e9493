//! ECS resources made available to systems.
//!
//! Long-lived data injected into the ECS world and shared by the elevator
//! systems.
//!
//! Overview
//! - `audio` – bridge and channels to the host audio layer, instance handle allocator
//! - `sessionconfig` – INI-backed session and simulation settings
//! - `worldtime` – session clock and delta
pub mod audio;
pub mod sessionconfig;
pub mod worldtime;
