//! Tween component for animated interpolation.
//!
//! [`TweenPosition`] animates an entity's
//! [`LocalTransform`](super::localtransform::LocalTransform) position toward a
//! destination. It is how the ECS host fulfils the
//! [`AnimateTransform`](crate::platform::AnimateTransform) capability.
//!
//! Progress is measured against the session clock: the tween stores the
//! instant it started, so its end time does not depend on where in the frame
//! it was inserted. See [`crate::systems::tween`] for the update system.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed (no easing).
    #[default]
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
}

impl Easing {
    /// Parse a configuration name such as `quadInOut` or `quad_in_out`.
    /// Matching ignores case and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "linear" => Some(Easing::Linear),
            "quadin" => Some(Easing::QuadIn),
            "quadout" => Some(Easing::QuadOut),
            "quadinout" => Some(Easing::QuadInOut),
            "cubicin" => Some(Easing::CubicIn),
            "cubicout" => Some(Easing::CubicOut),
            "cubicinout" => Some(Easing::CubicInOut),
            _ => None,
        }
    }
}

/// Animates an entity's local position to `to` over `duration` seconds.
///
/// `from` may be left unset, in which case the tween system captures the
/// entity's position on its first update.
#[derive(Component, Clone, Debug)]
pub struct TweenPosition {
    /// Starting position, captured on first update when `None`.
    pub from: Option<Vec3>,
    /// Destination position.
    pub to: Vec3,
    /// Duration in seconds. Zero or less finishes on the first update.
    pub duration: f32,
    /// Easing function to use.
    pub easing: Easing,
    /// Session time at which the tween started.
    pub started_at: f32,
}

impl TweenPosition {
    pub fn new(from: Vec3, to: Vec3, duration: f32, started_at: f32) -> Self {
        TweenPosition {
            from: Some(from),
            ..Self::towards(to, duration, started_at)
        }
    }

    /// Tween from wherever the entity is when the tween first runs.
    pub fn towards(to: Vec3, duration: f32, started_at: f32) -> Self {
        TweenPosition {
            from: None,
            to,
            duration,
            easing: Easing::Linear,
            started_at,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in `0..=1` at session time `now`.
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.duration <= 0.0 || now - self.started_at >= self.duration
    }
}
