//! Event types exchanged between the elevator systems and the host.
//!
//! Observers react to immediate events ([`button`], [`tween`], [`scene`]);
//! audio traffic flows through buffered messages ([`audio`]).
//!
//! Submodules:
//! - [`audio`] – commands to and messages from the host audio thread
//! - [`button`] – click on a trigger button actor
//! - [`scene`] – scene construction requests and their outcome
//! - [`tween`] – completion of a position animation
pub mod audio;
pub mod button;
pub mod scene;
pub mod tween;
