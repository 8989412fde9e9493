//! Scene construction.
//!
//! [`begin_scene_observer`] reacts to a
//! [`BeginSceneEvent`](crate::events::scene::BeginSceneEvent). Local parameters
//! are resolved immediately and the actors are spawned in the same observer.
//! A content pack source starts a background fetch and parks a
//! [`PendingScene`] entity; [`poll_pending_scenes`] finishes the job when the
//! worker answers.
//!
//! A scene is built in a fixed order: platform, its cue registry (with a load
//! request per configured sound), then the button wired to the platform. No
//! actor is spawned unless the descriptor resolved.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, TryRecvError};
use glam::Vec3;
use log::{error, info};

use crate::components::boxcollider::{BoxCollider, CollisionLayer};
use crate::components::cueregistry::CueRegistry;
use crate::components::elevator::{CUE_MOVE_DOWN, CUE_MOVE_UP, TransitionController};
use crate::components::libraryactor::LibraryActor;
use crate::components::localtransform::LocalTransform;
use crate::components::triggerbutton::TriggerButton;
use crate::descriptor::fetch::spawn_descriptor_fetch;
use crate::descriptor::{DescriptorOverrides, DescriptorSource, SceneDescriptor, resolve};
use crate::error::{ConfigError, ConfigResult};
use crate::events::audio::AudioCmd;
use crate::events::scene::{BeginSceneEvent, SceneFailedEvent, SceneReadyEvent};
use crate::platform::SoundHandle;

const BUTTON_OFFSET: Vec3 = Vec3::new(-2.5, 0.0, 0.5);
const BUTTON_SCALE: f32 = 0.4;
const PLATFORM_THICKNESS: f32 = 0.4;
const NAV_COLLIDER_MARGIN: f32 = 1.6;
const NAV_COLLIDER_HEIGHT: f32 = 0.5;

/// Entities spawned for one elevator scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorActors {
    pub button: Entity,
    pub platform: Entity,
}

/// A scene waiting for its content pack to arrive.
#[derive(Component)]
pub struct PendingScene {
    url: String,
    rx: Receiver<ConfigResult<SceneDescriptor>>,
}

impl PendingScene {
    pub fn new(url: impl Into<String>, rx: Receiver<ConfigResult<SceneDescriptor>>) -> Self {
        Self {
            url: url.into(),
            rx,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Spawn the platform, its cues and the button for a resolved descriptor.
pub fn spawn_elevator_scene(
    commands: &mut Commands,
    audio_cmds: &mut MessageWriter<AudioCmd>,
    descriptor: &SceneDescriptor,
) -> ElevatorActors {
    let rest = Vec3::ZERO;
    let platform = commands
        .spawn((
            LibraryActor::new(descriptor.elevator_id.clone(), "Elevator Platform"),
            LocalTransform::new(rest).with_scale(Vec3::new(
                descriptor.width,
                PLATFORM_THICKNESS,
                descriptor.length,
            )),
            BoxCollider::new(Vec3::new(
                NAV_COLLIDER_MARGIN + descriptor.width,
                NAV_COLLIDER_HEIGHT,
                NAV_COLLIDER_MARGIN + descriptor.length,
            ))
            .with_layer(CollisionLayer::Navigation),
        ))
        .id();

    let mut cues = CueRegistry::new();
    let cue_sounds = [
        (CUE_MOVE_UP, &descriptor.sounds.move_up_sound),
        (CUE_MOVE_DOWN, &descriptor.sounds.move_down_sound),
    ];
    let mut requested: Vec<&str> = Vec::new();
    for (cue, sound) in cue_sounds {
        cues.register(cue);
        let Some(sound) = sound else {
            continue;
        };
        cues.assign_sound(cue, SoundHandle::new(sound.as_str()));
        if !requested.contains(&sound.as_str()) {
            requested.push(sound.as_str());
            audio_cmds.write(AudioCmd::LoadSound {
                sound: SoundHandle::new(sound.as_str()),
            });
        }
    }

    commands.entity(platform).insert((
        TransitionController::new(platform, rest, descriptor),
        cues,
    ));

    let button = commands
        .spawn((
            LibraryActor::new(descriptor.button_id.clone(), "Elevator Button"),
            LocalTransform::new(
                BUTTON_OFFSET + Vec3::new(descriptor.x, descriptor.y, descriptor.z),
            )
            .with_scale(Vec3::splat(BUTTON_SCALE)),
            TriggerButton::new(platform),
        ))
        .id();

    info!(
        "Elevator scene built: platform {:?} ({}), button {:?} ({}), height={} speed={} delay={}",
        platform,
        descriptor.elevator_id,
        button,
        descriptor.button_id,
        descriptor.height,
        descriptor.speed,
        descriptor.delay
    );

    ElevatorActors { button, platform }
}

fn finish_scene(
    commands: &mut Commands,
    audio_cmds: &mut MessageWriter<AudioCmd>,
    result: ConfigResult<SceneDescriptor>,
) {
    match result {
        Ok(descriptor) => {
            let actors = spawn_elevator_scene(commands, audio_cmds, &descriptor);
            commands.trigger(SceneReadyEvent {
                button: actors.button,
                platform: actors.platform,
            });
        }
        Err(e) => {
            error!("Elevator scene not built: {}", e);
            commands.trigger(SceneFailedEvent {
                error: e.to_string(),
            });
        }
    }
}

/// Begin building a scene from the requested source.
pub fn begin_scene_observer(
    trigger: On<BeginSceneEvent>,
    mut commands: Commands,
    mut audio_cmds: MessageWriter<AudioCmd>,
) {
    let defaults = SceneDescriptor::default();
    match &trigger.event().source {
        DescriptorSource::Parameters(params) => {
            let result = resolve(&defaults, &DescriptorOverrides::from_parameters(params));
            finish_scene(&mut commands, &mut audio_cmds, result);
        }
        DescriptorSource::ContentPack { url } => {
            let rx = spawn_descriptor_fetch(url.clone(), defaults);
            commands.spawn(PendingScene::new(url.clone(), rx));
        }
    }
}

/// Complete scenes whose content pack fetch has answered.
pub fn poll_pending_scenes(
    mut commands: Commands,
    mut audio_cmds: MessageWriter<AudioCmd>,
    pending: Query<(Entity, &PendingScene)>,
) {
    for (entity, scene) in pending.iter() {
        let result = match scene.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => continue,
            Err(TryRecvError::Disconnected) => Err(ConfigError::FetchAbandoned {
                url: scene.url.clone(),
            }),
        };
        commands.entity(entity).despawn();
        finish_scene(&mut commands, &mut audio_cmds, result);
    }
}
