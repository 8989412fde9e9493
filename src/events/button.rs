//! Click events on trigger buttons.
//!
//! The host triggers a [`ButtonClickEvent`] whenever a user clicks an actor.
//! [`button_click_observer`](crate::systems::elevator::button_click_observer)
//! looks up the [`TriggerButton`](crate::components::triggerbutton::TriggerButton)
//! on it and starts the linked elevator if it is idle.

use bevy_ecs::prelude::*;

/// A user clicked the actor `button`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonClickEvent {
    pub button: Entity,
}
