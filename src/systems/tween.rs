//! Tween animation system.
//!
//! [`tween_position_system`] moves entities carrying a
//! [`TweenPosition`](crate::components::tween::TweenPosition) toward their
//! destination, measured against
//! [`WorldTime::elapsed`](crate::resources::worldtime::WorldTime). When a tween
//! completes the entity snaps to the destination, the component is removed and
//! a [`TweenFinishedEvent`] is triggered.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::localtransform::LocalTransform;
use crate::components::tween::{Easing, TweenPosition};
use crate::events::tween::TweenFinishedEvent;
use crate::resources::worldtime::WorldTime;

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub(crate) fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

/// Animate entity positions based on [`TweenPosition`] components.
pub fn tween_position_system(
    mut commands: Commands,
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut LocalTransform, &mut TweenPosition)>,
) {
    let now = world_time.elapsed;
    for (entity, mut transform, mut tw) in query.iter_mut() {
        let from = *tw.from.get_or_insert(transform.position);

        if tw.is_finished(now) {
            transform.position = tw.to;
            commands.entity(entity).remove::<TweenPosition>();
            commands.trigger(TweenFinishedEvent { entity });
            continue;
        }

        let k = ease(tw.easing, tw.progress(now));
        transform.position = Vec3::lerp(from, tw.to, k);
    }
}
