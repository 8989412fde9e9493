//! Systems bridging the ECS world with the host audio layer.
//!
//! - [`forward_audio_cmds`] sends [`AudioCmd`] messages written this frame to
//!   the host over the [`AudioBridge`].
//! - [`poll_audio_messages`] non-blockingly drains the host's replies into
//!   Bevy ECS' message queue.
//! - [`apply_audio_messages`] folds those replies into every
//!   [`CueRegistry`]: loaded and failed sounds, finished instances.
//! - [`update_bevy_audio_cmds`] / [`update_bevy_audio_messages`] advance the
//!   message queues once per frame.
//!
//! [`headless_audio_thread`] is a stand-in host for simulations without an
//! audio device: it logs every command and reports each load as successful.
//!
//! See also: [`crate::events::audio`] and [`crate::resources::audio`].

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

use crate::components::cueregistry::CueRegistry;
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;

/// Drain any pending replies from the host and enqueue them into the ECS
/// [`Messages<AudioMessage>`] mailbox.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`].
///
/// Run this after [`poll_audio_messages`] in your schedule.
pub fn update_bevy_audio_messages(mut events: ResMut<Messages<AudioMessage>>) {
    events.update();
}

/// Forward ECS AudioCmd messages to the host via the AudioBridge sender.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // Host may already be gone during shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd so same-frame readers can observe writes.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Update cue registries from host audio replies.
pub fn apply_audio_messages(
    mut reader: MessageReader<AudioMessage>,
    mut registries: Query<&mut CueRegistry>,
) {
    for msg in reader.read() {
        match msg {
            AudioMessage::SoundLoaded { sound } => {
                debug!("Sound '{}' loaded", sound.id());
                for mut cues in registries.iter_mut() {
                    cues.mark_sound_ready(sound);
                }
            }
            AudioMessage::SoundLoadFailed { sound, error } => {
                warn!("Sound '{}' failed to load: {}", sound.id(), error);
                for mut cues in registries.iter_mut() {
                    cues.mark_sound_failed(sound);
                }
            }
            AudioMessage::InstanceFinished { instance } => {
                for mut cues in registries.iter_mut() {
                    if cues.release_instance(*instance) {
                        break;
                    }
                }
            }
        }
    }
}

/// Entry point of a stand-in host audio thread.
///
/// Blocks on the command channel until it receives [`AudioCmd::Shutdown`] or
/// the world side disconnects.
pub fn headless_audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    info!(
        "[audio] headless host starting (id={:?})",
        std::thread::current().id()
    );

    while let Ok(cmd) = rx_cmd.recv() {
        match cmd {
            AudioCmd::LoadSound { sound } => {
                info!("[audio] load sound '{}'", sound.id());
                let _ = tx_msg.send(AudioMessage::SoundLoaded { sound });
            }
            AudioCmd::StartSound {
                instance,
                target,
                sound,
                options,
            } => {
                info!(
                    "[audio] start '{}' as {:?} on {:?} volume={} rolloff={:?}",
                    sound.id(),
                    instance,
                    target,
                    options.volume,
                    options.rolloff_start_distance
                );
            }
            AudioCmd::StopInstance { instance } => {
                info!("[audio] stop {:?}", instance);
            }
            AudioCmd::Shutdown => break,
        }
    }

    info!("[audio] headless host exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{InstanceHandle, SoundHandle, SoundOptions};
    use crate::resources::audio::{HostAudioEndpoints, setup_audio};

    fn setup() -> (World, Schedule, HostAudioEndpoints) {
        let mut world = World::new();
        let endpoints = setup_audio(&mut world);
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                poll_audio_messages,
                update_bevy_audio_messages,
                apply_audio_messages,
                forward_audio_cmds,
                update_bevy_audio_cmds,
            )
                .chain(),
        );
        (world, schedule, endpoints)
    }

    fn registry_with(sound: &str) -> CueRegistry {
        let mut cues = CueRegistry::new();
        cues.assign_sound("move_up", SoundHandle::new(sound));
        cues
    }

    #[test]
    fn test_forward_audio_cmds_sends_once() {
        let (mut world, mut schedule, endpoints) = setup();
        world
            .resource_mut::<Messages<AudioCmd>>()
            .write(AudioCmd::LoadSound {
                sound: SoundHandle::new("a"),
            });

        schedule.run(&mut world);
        schedule.run(&mut world);

        let sent: Vec<_> = endpoints.rx_cmd.try_iter().collect();
        assert_eq!(
            sent,
            vec![AudioCmd::LoadSound {
                sound: SoundHandle::new("a")
            }]
        );
    }

    #[test]
    fn test_load_failure_marks_cue_failed() {
        let (mut world, mut schedule, endpoints) = setup();
        let e = world.spawn(registry_with("bad")).id();
        endpoints
            .tx_msg
            .send(AudioMessage::SoundLoadFailed {
                sound: SoundHandle::new("bad"),
                error: "not found".into(),
            })
            .unwrap();

        schedule.run(&mut world);

        let cues = world.get::<CueRegistry>(e).unwrap();
        assert_eq!(
            cues.sound("move_up"),
            Some(&crate::components::cueregistry::CueSound::Failed(
                SoundHandle::new("bad")
            ))
        );
    }

    #[test]
    fn test_instance_finished_releases_cue() {
        struct Silent;
        impl crate::platform::SoundPlatform for Silent {
            fn start_sound(
                &mut self,
                _target: Entity,
                _sound: &SoundHandle,
                _options: &SoundOptions,
            ) -> InstanceHandle {
                InstanceHandle(7)
            }
            fn stop_instance(&mut self, _instance: InstanceHandle) {}
        }

        let (mut world, mut schedule, endpoints) = setup();
        let mut cues = registry_with("up");
        cues.play("move_up", Entity::PLACEHOLDER, SoundOptions::default(), &mut Silent);
        let e = world.spawn(cues).id();
        endpoints
            .tx_msg
            .send(AudioMessage::InstanceFinished {
                instance: InstanceHandle(7),
            })
            .unwrap();

        schedule.run(&mut world);

        let state = world.get::<CueRegistry>(e).unwrap().state("move_up").unwrap();
        assert!(!state.is_loaded);
        assert!(state.instance.is_none());
    }

    #[test]
    fn test_headless_host_acknowledges_loads() {
        let (tx_cmd, rx_cmd) = crossbeam_channel::unbounded();
        let (tx_msg, rx_msg) = crossbeam_channel::unbounded();
        let handle = std::thread::spawn(move || headless_audio_thread(rx_cmd, tx_msg));

        tx_cmd
            .send(AudioCmd::LoadSound {
                sound: SoundHandle::new("x"),
            })
            .unwrap();
        tx_cmd.send(AudioCmd::Shutdown).unwrap();
        handle.join().unwrap();

        assert_eq!(
            rx_msg.try_iter().collect::<Vec<_>>(),
            vec![AudioMessage::SoundLoaded {
                sound: SoundHandle::new("x")
            }]
        );
    }
}
