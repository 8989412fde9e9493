//! Scene construction events.
//!
//! A [`BeginSceneEvent`] asks for the elevator actors to be built from a
//! [`DescriptorSource`]. Local parameters are resolved on the spot; a content
//! pack is fetched on a worker thread and the scene is built once it arrives.
//! Either way, exactly one of [`SceneReadyEvent`] or [`SceneFailedEvent`]
//! follows.

use bevy_ecs::prelude::*;

use crate::descriptor::DescriptorSource;

/// Request to build an elevator scene.
#[derive(Event, Debug, Clone)]
pub struct BeginSceneEvent {
    pub source: DescriptorSource,
}

/// The actors are spawned and the button is live.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneReadyEvent {
    pub button: Entity,
    pub platform: Entity,
}

/// Configuration could not be resolved. No actors were created.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneFailedEvent {
    pub error: String,
}
