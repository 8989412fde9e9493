use bevy_ecs::prelude::*;

/// Triggered when a [`TweenPosition`](crate::components::tween::TweenPosition)
/// reaches its destination. The component has already been removed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenFinishedEvent {
    pub entity: Entity,
}
