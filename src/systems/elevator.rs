//! Elevator observers and systems.
//!
//! These wire the [`TransitionController`] into the ECS:
//!
//! - [`button_click_observer`] – a click on a [`TriggerButton`] starts its
//!   elevator (dropped while a cycle is in flight)
//! - [`tween_finished_observer`] – completion of the platform's animation
//!   resumes the controller
//! - [`elevator_hold_system`] – ends the hold once its deadline has passed
//!
//! [`EcsHost`] is the production implementation of the platform capabilities:
//! animations become [`TweenPosition`] components and sounds become
//! [`AudioCmd`] messages for the host audio layer.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, warn};

use crate::components::cueregistry::CueRegistry;
use crate::components::elevator::TransitionController;
use crate::components::triggerbutton::TriggerButton;
use crate::components::tween::{Easing, TweenPosition};
use crate::events::audio::AudioCmd;
use crate::events::button::ButtonClickEvent;
use crate::events::tween::TweenFinishedEvent;
use crate::platform::{AnimateTransform, InstanceHandle, SoundHandle, SoundOptions, SoundPlatform};
use crate::resources::audio::SoundInstanceIds;
use crate::resources::worldtime::WorldTime;

/// Platform capabilities backed by deferred ECS commands and audio messages.
pub struct EcsHost<'a, 'w, 's, 'm> {
    commands: &'a mut Commands<'w, 's>,
    audio_cmds: &'a mut MessageWriter<'m, AudioCmd>,
    instance_ids: &'a mut SoundInstanceIds,
    now: f32,
}

impl<'a, 'w, 's, 'm> EcsHost<'a, 'w, 's, 'm> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        audio_cmds: &'a mut MessageWriter<'m, AudioCmd>,
        instance_ids: &'a mut SoundInstanceIds,
        now: f32,
    ) -> Self {
        Self {
            commands,
            audio_cmds,
            instance_ids,
            now,
        }
    }
}

impl AnimateTransform for EcsHost<'_, '_, '_, '_> {
    fn animate_transform(&mut self, target: Entity, destination: Vec3, duration: f32, easing: Easing) {
        self.commands.entity(target).insert(
            TweenPosition::towards(destination, duration, self.now).with_easing(easing),
        );
    }
}

impl SoundPlatform for EcsHost<'_, '_, '_, '_> {
    fn start_sound(
        &mut self,
        target: Entity,
        sound: &SoundHandle,
        options: &SoundOptions,
    ) -> InstanceHandle {
        let instance = self.instance_ids.allocate();
        self.audio_cmds.write(AudioCmd::StartSound {
            instance,
            target,
            sound: sound.clone(),
            options: *options,
        });
        instance
    }

    fn stop_instance(&mut self, instance: InstanceHandle) {
        self.audio_cmds.write(AudioCmd::StopInstance { instance });
    }
}

/// Start the linked elevator when a trigger button is clicked.
pub fn button_click_observer(
    trigger: On<ButtonClickEvent>,
    mut commands: Commands,
    mut audio_cmds: MessageWriter<AudioCmd>,
    mut instance_ids: ResMut<SoundInstanceIds>,
    world_time: Res<WorldTime>,
    buttons: Query<&TriggerButton>,
    mut elevators: Query<(&mut TransitionController, &mut CueRegistry)>,
) {
    let button = trigger.event().button;
    let Ok(link) = buttons.get(button) else {
        debug!("Click on {:?} ignored, not a trigger button", button);
        return;
    };
    let Ok((mut controller, mut cues)) = elevators.get_mut(link.elevator) else {
        warn!(
            "Trigger button {:?} points at {:?}, which has no elevator",
            button, link.elevator
        );
        return;
    };

    let now = world_time.elapsed;
    let mut host = EcsHost::new(&mut commands, &mut audio_cmds, &mut instance_ids, now);
    controller.trigger(now, &mut cues, &mut host);
}

/// Resume an elevator whose platform animation just completed.
pub fn tween_finished_observer(
    trigger: On<TweenFinishedEvent>,
    mut commands: Commands,
    mut audio_cmds: MessageWriter<AudioCmd>,
    mut instance_ids: ResMut<SoundInstanceIds>,
    world_time: Res<WorldTime>,
    mut elevators: Query<(&mut TransitionController, &mut CueRegistry)>,
) {
    let entity = trigger.event().entity;
    let Ok((mut controller, mut cues)) = elevators.get_mut(entity) else {
        return;
    };

    let now = world_time.elapsed;
    let mut host = EcsHost::new(&mut commands, &mut audio_cmds, &mut instance_ids, now);
    controller.animation_finished(now, &mut cues, &mut host);
}

/// End the hold of every elevator whose deadline has passed.
pub fn elevator_hold_system(
    mut commands: Commands,
    mut audio_cmds: MessageWriter<AudioCmd>,
    mut instance_ids: ResMut<SoundInstanceIds>,
    world_time: Res<WorldTime>,
    mut elevators: Query<(&mut TransitionController, &mut CueRegistry)>,
) {
    let now = world_time.elapsed;
    for (mut controller, mut cues) in elevators.iter_mut() {
        if !controller.is_holding() {
            continue;
        }
        let mut host = EcsHost::new(&mut commands, &mut audio_cmds, &mut instance_ids, now);
        controller.update(now, &mut cues, &mut host);
    }
}
