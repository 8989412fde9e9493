//! Single-flight transition state machine for an elevator platform.
//!
//! The [`TransitionController`] component sequences one transition cycle:
//!
//! ```text
//! Idle --trigger--> Ascending --complete--> Holding --timeout--> Descending --complete--> Idle
//! ```
//!
//! - **Idle → Ascending** – the guard flips to busy, the `move_up` cue starts,
//!   and an animation to the raised position is requested.
//! - **Ascending → Holding** – on animation completion the platform dwells for
//!   `delay` seconds of session time. No sound plays.
//! - **Holding → Descending** – the `move_down` cue starts and an animation
//!   back to rest is requested.
//! - **Descending → Idle** – the guard clears.
//!
//! A trigger that arrives outside `Idle` is dropped: no queueing, no restart.
//!
//! # Suspension points
//!
//! The controller never blocks. It returns to the caller at each point where
//! it waits and is resumed by one of three entry points:
//!
//! - [`TransitionController::trigger`] – the button was clicked
//! - [`TransitionController::animation_finished`] – the host completed the
//!   requested animation
//! - [`TransitionController::update`] – time passed; ends the hold
//!
//! A host that never reports completion leaves the controller busy for good.
//!
//! # Related
//!
//! - [`crate::systems::elevator`] – observers and systems that drive it
//! - [`crate::components::cueregistry::CueRegistry`] – cue playback it relies on

use std::fmt;

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec3;
use log::{debug, info};

use crate::components::cueregistry::CueRegistry;
use crate::components::tween::Easing;
use crate::descriptor::SceneDescriptor;
use crate::platform::{AnimateTransform, SoundOptions, SoundPlatform};

/// Cue played while the platform rises.
pub const CUE_MOVE_UP: &str = "move_up";
/// Cue played while the platform descends.
pub const CUE_MOVE_DOWN: &str = "move_down";

/// Where the controller is within a transition cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    /// At rest, accepting triggers.
    Idle,
    /// Waiting for the ascent animation to complete.
    Ascending,
    /// Dwelling at the top until session time reaches `until`.
    Holding { until: f32 },
    /// Waiting for the descent animation to complete.
    Descending,
}

impl TransitionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, TransitionState::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransitionState::Idle => "idle",
            TransitionState::Ascending => "ascending",
            TransitionState::Holding { .. } => "holding",
            TransitionState::Descending => "descending",
        }
    }
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transition controller attached to the platform entity.
///
/// Timing (`speed`, `delay`) and travel come from the [`SceneDescriptor`] the
/// controller was built from and are never revalidated. Zero or negative
/// values make the corresponding step instantaneous.
#[derive(Component, Debug, Clone)]
pub struct TransitionController {
    platform: Entity,
    rest: Vec3,
    raised: Vec3,
    speed: f32,
    delay: f32,
    easing: Easing,
    sound_options: SoundOptions,
    state: TransitionState,
    cycles_completed: u64,
}

impl TransitionController {
    /// Controller for `platform` resting at `rest`.
    ///
    /// The raised position differs from `rest` only on the vertical axis, by
    /// `descriptor.height`.
    pub fn new(platform: Entity, rest: Vec3, descriptor: &SceneDescriptor) -> Self {
        Self {
            platform,
            rest,
            raised: rest + Vec3::Y * descriptor.height,
            speed: descriptor.speed,
            delay: descriptor.delay,
            easing: descriptor.easing,
            sound_options: SoundOptions::for_descriptor(descriptor),
            state: TransitionState::Idle,
            cycles_completed: 0,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Whether a cycle is in flight.
    pub fn is_busy(&self) -> bool {
        !self.state.is_idle()
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, TransitionState::Holding { .. })
    }

    pub fn platform(&self) -> Entity {
        self.platform
    }

    pub fn rest_position(&self) -> Vec3 {
        self.rest
    }

    pub fn raised_position(&self) -> Vec3 {
        self.raised
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Start a cycle if idle.
    ///
    /// Returns `false`, with no side effects, when a cycle is already in
    /// flight.
    pub fn trigger<H>(&mut self, now: f32, cues: &mut CueRegistry, host: &mut H) -> bool
    where
        H: AnimateTransform + SoundPlatform,
    {
        if self.is_busy() {
            debug!(
                "Elevator {:?} is {}, trigger ignored at t={:.3}",
                self.platform, self.state, now
            );
            return false;
        }

        info!("Elevator {:?} starting cycle at t={:.3}", self.platform, now);
        self.enter(TransitionState::Ascending, now);
        cues.play(CUE_MOVE_UP, self.platform, self.sound_options, host);
        host.animate_transform(self.platform, self.raised, self.speed, self.easing);
        true
    }

    /// Resume after the host finished the requested animation.
    ///
    /// Completions that arrive while no animation is pending are ignored.
    pub fn animation_finished<H>(&mut self, now: f32, cues: &mut CueRegistry, host: &mut H)
    where
        H: AnimateTransform + SoundPlatform,
    {
        match self.state {
            TransitionState::Ascending => {
                self.enter(
                    TransitionState::Holding {
                        until: now + self.delay,
                    },
                    now,
                );
                // A non-positive delay ends the hold right away.
                self.update(now, cues, host);
            }
            TransitionState::Descending => {
                self.enter(TransitionState::Idle, now);
                self.cycles_completed += 1;
                info!(
                    "Elevator {:?} completed cycle {} at t={:.3}",
                    self.platform, self.cycles_completed, now
                );
            }
            TransitionState::Idle | TransitionState::Holding { .. } => {
                debug!(
                    "Elevator {:?} ignoring animation completion while {}",
                    self.platform, self.state
                );
            }
        }
    }

    /// Advance time. Ends the hold once its deadline has passed.
    pub fn update<H>(&mut self, now: f32, cues: &mut CueRegistry, host: &mut H)
    where
        H: AnimateTransform + SoundPlatform,
    {
        let TransitionState::Holding { until } = self.state else {
            return;
        };
        if now < until {
            return;
        }

        self.enter(TransitionState::Descending, now);
        cues.play(CUE_MOVE_DOWN, self.platform, self.sound_options, host);
        host.animate_transform(self.platform, self.rest, self.speed, self.easing);
    }

    fn enter(&mut self, next: TransitionState, now: f32) {
        debug!(
            "Elevator {:?}: {} -> {} at t={:.3}",
            self.platform, self.state, next, now
        );
        self.state = next;
    }
}
