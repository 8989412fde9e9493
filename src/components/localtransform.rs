use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Position and scale of an actor relative to the prop's local frame.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub scale: Vec3,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
