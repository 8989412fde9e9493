//! ECS resources that bridge the world with the host audio layer.
//!
//! Use [`setup_audio`] once during initialization to create the channels and
//! insert the [`AudioBridge`] and message resources. The host keeps the
//! returned [`HostAudioEndpoints`] and services them from its own audio
//! thread. Call [`shutdown_audio`] during teardown so the host can stop.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::platform::InstanceHandle;

/// Shared bridge between the ECS world and the host audio layer.
///
/// This resource is created by [`setup_audio`]. Systems send commands via
/// [`AudioBridge::tx_cmd`] and poll for replies via [`AudioBridge::rx_msg`].
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> host).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (host -> ECS).
    pub rx_msg: Receiver<AudioMessage>,
}

/// The host's ends of the audio channels.
pub struct HostAudioEndpoints {
    pub rx_cmd: Receiver<AudioCmd>,
    pub tx_msg: Sender<AudioMessage>,
}

/// Issues unique [`InstanceHandle`]s for started sounds.
///
/// Handles are allocated on the ECS side so a cue knows its instance before
/// the host has even received the start command.
#[derive(Resource, Debug, Default)]
pub struct SoundInstanceIds {
    next: u64,
}

impl SoundInstanceIds {
    pub fn allocate(&mut self) -> InstanceHandle {
        self.next += 1;
        InstanceHandle(self.next)
    }
}

/// Create the audio channels and register bridge resources.
///
/// This function:
/// - Creates command/message channels.
/// - Inserts [`AudioBridge`], [`SoundInstanceIds`] and initializes
///   `Messages<AudioCmd>` / `Messages<AudioMessage>`.
/// - Returns the host's ends of the channels.
pub fn setup_audio(world: &mut World) -> HostAudioEndpoints {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    world.insert_resource(AudioBridge { tx_cmd, rx_msg });
    world.insert_resource(SoundInstanceIds::default());
    world.insert_resource(Messages::<AudioMessage>::default());
    world.insert_resource(Messages::<AudioCmd>::default());

    HostAudioEndpoints { rx_cmd, tx_msg }
}

/// Ask the host audio layer to stop and drop the bridge.
///
/// If the bridge resource exists, sends [`AudioCmd::Shutdown`] and removes
/// the resource from the world.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
    }
}
