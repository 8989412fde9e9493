use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Collision layer the host assigns to a collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionLayer {
    #[default]
    Object,
    Environment,
    Hologram,
    /// Walkable surface; avatars can stand and ride on it.
    Navigation,
}

/// Axis-aligned box collider centred on the entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec3,
    pub layer: CollisionLayer,
}

impl BoxCollider {
    /// Create a BoxCollider with given size on the default layer
    pub fn new(size: Vec3) -> Self {
        Self {
            size,
            layer: CollisionLayer::default(),
        }
    }

    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }
}
