use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

use crate::platform::{InstanceHandle, SoundHandle, SoundOptions};

/// Commands sent *to* the host audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadSound {
        sound: SoundHandle,
    },
    StartSound {
        instance: InstanceHandle,
        target: Entity,
        sound: SoundHandle,
        options: SoundOptions,
    },
    StopInstance {
        instance: InstanceHandle,
    },
    Shutdown,
}

/// Events sent *back* from the host audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    SoundLoaded { sound: SoundHandle },
    SoundLoadFailed { sound: SoundHandle, error: String },
    InstanceFinished { instance: InstanceHandle }, // non-looping instance reached its end
}
