// Button actor that starts a transition cycle on its elevator when clicked.

use bevy_ecs::prelude::{Component, Entity};

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerButton {
    /// Platform entity carrying the [`TransitionController`](super::elevator::TransitionController).
    pub elevator: Entity,
}

impl TriggerButton {
    pub fn new(elevator: Entity) -> Self {
        Self { elevator }
    }
}
