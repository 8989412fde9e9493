//! Capability surface of the hosting platform.
//!
//! The elevator logic never talks to a renderer or an audio device directly.
//! It asks for two things:
//!
//! - [`AnimateTransform`] – interpolate an actor's local position to a target
//!   over a duration. Completion is reported back asynchronously (in the ECS
//!   wiring, as a [`TweenFinishedEvent`](crate::events::tween::TweenFinishedEvent)).
//! - [`SoundPlatform`] – start a sound on an actor and stop a running
//!   instance.
//!
//! [`EcsHost`](crate::systems::elevator::EcsHost) implements both on top of
//! bevy_ecs; tests substitute recording doubles.

use bevy_ecs::entity::Entity;
use glam::Vec3;

use crate::components::tween::Easing;
use crate::descriptor::SceneDescriptor;

/// Spread applied to attenuated cues.
const ATTENUATED_SPREAD: f32 = 0.4;

/// Identifier of a loadable sound asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub String);

impl SoundHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Handle of one playing sound instance, issued by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub u64);

/// Playback options for a sound instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundOptions {
    /// Volume in `0..=1`.
    pub volume: f32,
    pub looping: bool,
    /// Start offset in seconds.
    pub time: f32,
    pub doppler: f32,
    /// Directional spread; only set for attenuated cues.
    pub spread: Option<f32>,
    /// Distance at which attenuation starts; `None` plays the cue flat.
    pub rolloff_start_distance: Option<f32>,
}

impl Default for SoundOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: false,
            time: 0.0,
            doppler: 0.0,
            spread: None,
            rolloff_start_distance: None,
        }
    }
}

impl SoundOptions {
    /// Cue options for a scene: its volume, non-looping, from the start,
    /// attenuated only when a rolloff distance is configured.
    pub fn for_descriptor(descriptor: &SceneDescriptor) -> Self {
        let options = Self {
            volume: descriptor.volume,
            ..Self::default()
        };
        match descriptor.rolloff_start_distance {
            Some(distance) => options.with_rolloff(distance),
            None => options,
        }
    }

    /// Attach distance attenuation.
    pub fn with_rolloff(mut self, distance: f32) -> Self {
        self.spread = Some(ATTENUATED_SPREAD);
        self.rolloff_start_distance = Some(distance);
        self
    }
}

/// Transform interpolation provided by the host.
pub trait AnimateTransform {
    /// Move `target`'s local position to `destination` over `duration`
    /// seconds. The host signals completion separately; a duration of zero or
    /// less completes immediately.
    fn animate_transform(&mut self, target: Entity, destination: Vec3, duration: f32, easing: Easing);
}

/// Sound playback provided by the host.
pub trait SoundPlatform {
    /// Start `sound` on `target` and return the handle of the new instance.
    fn start_sound(
        &mut self,
        target: Entity,
        sound: &SoundHandle,
        options: &SoundOptions,
    ) -> InstanceHandle;

    /// Stop a running instance. Unknown handles are ignored.
    fn stop_instance(&mut self, instance: InstanceHandle);
}
