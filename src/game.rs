//! World setup and the per-tick schedule.
//!
//! [`setup_world`] inserts the shared resources and registers the observers;
//! [`build_update_schedule`] returns the systems to run once per tick, and
//! [`tick`] advances the session clock and runs them.
//!
//! Within a tick the host's audio replies are applied first, then pending
//! scenes are completed, tweens advance (possibly resuming elevators through
//! [`TweenFinishedEvent`](crate::events::tween::TweenFinishedEvent)), holds
//! expire, and finally the audio commands produced along the way are forwarded
//! to the host.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;

use crate::resources::audio::{HostAudioEndpoints, setup_audio};
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::{
    apply_audio_messages, forward_audio_cmds, poll_audio_messages, update_bevy_audio_cmds,
    update_bevy_audio_messages,
};
use crate::systems::elevator::{
    button_click_observer, elevator_hold_system, tween_finished_observer,
};
use crate::systems::scene::{begin_scene_observer, poll_pending_scenes};
use crate::systems::time::update_world_time;
use crate::systems::tween::tween_position_system;

/// Insert resources and observers. Returns the host's audio channel ends.
pub fn setup_world(world: &mut World) -> HostAudioEndpoints {
    world.insert_resource(WorldTime::default());
    let endpoints = setup_audio(world);

    world.spawn(Observer::new(begin_scene_observer));
    world.spawn(Observer::new(button_click_observer));
    world.spawn(Observer::new(tween_finished_observer));
    // Ensure the observers are registered before anything triggers events.
    world.flush();

    endpoints
}

/// Systems run once per tick, in order.
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            // Pull host replies first so cue state is current
            poll_audio_messages,
            update_bevy_audio_messages,
            apply_audio_messages,
            poll_pending_scenes,
            tween_position_system,
            elevator_hold_system,
            // Then advance AudioCmd messages and forward them to the host
            update_bevy_audio_cmds,
            forward_audio_cmds,
        )
            .chain(),
    );
    update
}

/// Advance the session clock by `dt` and run one tick.
pub fn tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}
