//! Audio cue bookkeeping for one elevator.
//!
//! A [`CueRegistry`] maps logical cue names (`"move_up"`, `"move_down"`) to
//! the sound asset that backs them and to the cue's current [`CueState`].
//! It holds no audio data, only handles and flags; the sounds themselves live
//! on the host behind the [`SoundPlatform`] capability.
//!
//! # Invariants
//!
//! - At most one playing instance per cue name. [`CueRegistry::play`] stops
//!   the running instance before it starts a new one.
//! - Entries are never removed; they are reset in place.
//!
//! Playback is best-effort: an unregistered cue, a cue without a sound, or a
//! cue whose sound failed to load is skipped without error.

use bevy_ecs::prelude::{Component, Entity};
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::platform::{InstanceHandle, SoundHandle, SoundOptions, SoundPlatform};

/// Availability of the sound behind a cue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CueSound {
    /// No sound configured; the cue is silent.
    #[default]
    Unassigned,
    /// Load requested, not yet confirmed by the host. Playable.
    Pending(SoundHandle),
    /// Loaded by the host.
    Ready(SoundHandle),
    /// The host could not load it. Never played.
    Failed(SoundHandle),
}

impl CueSound {
    fn playable(&self) -> Option<&SoundHandle> {
        match self {
            CueSound::Pending(handle) | CueSound::Ready(handle) => Some(handle),
            CueSound::Unassigned | CueSound::Failed(_) => None,
        }
    }

    fn handle(&self) -> Option<&SoundHandle> {
        match self {
            CueSound::Pending(handle) | CueSound::Ready(handle) | CueSound::Failed(handle) => {
                Some(handle)
            }
            CueSound::Unassigned => None,
        }
    }
}

/// Playback state of one cue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueState {
    /// Whether an instance of this cue is currently active.
    pub is_loaded: bool,
    /// The active instance; `Some` only while `is_loaded`.
    pub instance: Option<InstanceHandle>,
    /// Options the active instance was started with.
    pub options: Option<SoundOptions>,
}

#[derive(Debug, Clone, Default)]
struct CueEntry {
    sound: CueSound,
    state: CueState,
}

/// Per-elevator registry of audio cues.
#[derive(Component, Debug, Clone, Default)]
pub struct CueRegistry {
    cues: FxHashMap<String, CueEntry>,
}

impl CueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cue name. Existing entries are left untouched.
    pub fn register(&mut self, cue: &str) {
        self.cues.entry(cue.to_string()).or_default();
    }

    /// Back a cue with a sound asset whose load has been requested.
    ///
    /// Registers the cue if needed.
    pub fn assign_sound(&mut self, cue: &str, sound: SoundHandle) {
        self.cues.entry(cue.to_string()).or_default().sound = CueSound::Pending(sound);
    }

    /// Host confirmed that `sound` loaded.
    pub fn mark_sound_ready(&mut self, sound: &SoundHandle) {
        for entry in self.cues.values_mut() {
            if entry.sound.handle() == Some(sound) {
                entry.sound = CueSound::Ready(sound.clone());
            }
        }
    }

    /// Host could not load `sound`; cues using it go silent.
    pub fn mark_sound_failed(&mut self, sound: &SoundHandle) {
        for entry in self.cues.values_mut() {
            if entry.sound.handle() == Some(sound) {
                entry.sound = CueSound::Failed(sound.clone());
            }
        }
    }

    /// Start `cue` on `target`, replacing any instance already playing.
    ///
    /// Returns the new instance, or `None` when the cue was skipped.
    pub fn play<P: SoundPlatform + ?Sized>(
        &mut self,
        cue: &str,
        target: Entity,
        options: SoundOptions,
        platform: &mut P,
    ) -> Option<InstanceHandle> {
        let Some(entry) = self.cues.get_mut(cue) else {
            debug!("Cue '{}' is not registered, skipping playback", cue);
            return None;
        };
        let Some(sound) = entry.sound.playable().cloned() else {
            match &entry.sound {
                CueSound::Failed(sound) => {
                    warn!("Cue '{}' skipped, sound '{}' failed to load", cue, sound.id());
                }
                _ => debug!("Cue '{}' has no sound, skipping playback", cue),
            }
            return None;
        };

        if entry.state.is_loaded {
            if let Some(previous) = entry.state.instance.take() {
                platform.stop_instance(previous);
            }
        }

        let instance = platform.start_sound(target, &sound, &options);
        debug!("Cue '{}' started as {:?}", cue, instance);
        entry.state = CueState {
            is_loaded: true,
            instance: Some(instance),
            options: Some(options),
        };
        Some(instance)
    }

    /// Stop the active instance of `cue`, if any.
    pub fn stop<P: SoundPlatform + ?Sized>(&mut self, cue: &str, platform: &mut P) {
        let Some(entry) = self.cues.get_mut(cue) else {
            return;
        };
        if !entry.state.is_loaded {
            return;
        }
        if let Some(instance) = entry.state.instance.take() {
            platform.stop_instance(instance);
        }
        entry.state = CueState::default();
    }

    /// The host reports that `instance` ended on its own.
    ///
    /// Resets the owning cue in place. Returns whether any cue owned it.
    pub fn release_instance(&mut self, instance: InstanceHandle) -> bool {
        for entry in self.cues.values_mut() {
            if entry.state.instance == Some(instance) {
                entry.state = CueState::default();
                return true;
            }
        }
        false
    }

    pub fn is_registered(&self, cue: &str) -> bool {
        self.cues.contains_key(cue)
    }

    pub fn state(&self, cue: &str) -> Option<&CueState> {
        self.cues.get(cue).map(|entry| &entry.state)
    }

    pub fn sound(&self, cue: &str) -> Option<&CueSound> {
        self.cues.get(cue).map(|entry| &entry.sound)
    }

    /// Number of cues with an active instance.
    pub fn active_count(&self) -> usize {
        self.cues.values().filter(|entry| entry.state.is_loaded).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Start(String, InstanceHandle),
        Stop(InstanceHandle),
    }

    #[derive(Default)]
    struct RecordingSounds {
        next: u64,
        calls: Vec<Call>,
    }

    impl SoundPlatform for RecordingSounds {
        fn start_sound(
            &mut self,
            _target: Entity,
            sound: &SoundHandle,
            _options: &SoundOptions,
        ) -> InstanceHandle {
            self.next += 1;
            let instance = InstanceHandle(self.next);
            self.calls.push(Call::Start(sound.id().to_string(), instance));
            instance
        }

        fn stop_instance(&mut self, instance: InstanceHandle) {
            self.calls.push(Call::Stop(instance));
        }
    }

    fn registry_with_up() -> CueRegistry {
        let mut cues = CueRegistry::new();
        cues.register("up");
        cues.assign_sound("up", SoundHandle::new("artifact:up"));
        cues
    }

    // ==================== REGISTER TESTS ====================

    #[test]
    fn test_register_is_idempotent() {
        let mut cues = registry_with_up();
        cues.register("up");
        assert!(cues.is_registered("up"));
        assert_eq!(
            cues.sound("up"),
            Some(&CueSound::Pending(SoundHandle::new("artifact:up")))
        );
        assert_eq!(cues.state("up"), Some(&CueState::default()));
    }

    #[test]
    fn test_register_starts_unloaded() {
        let mut cues = CueRegistry::new();
        cues.register("down");
        assert!(!cues.state("down").unwrap().is_loaded);
        assert_eq!(cues.sound("down"), Some(&CueSound::Unassigned));
    }

    // ==================== PLAY TESTS ====================

    #[test]
    fn test_play_marks_loaded() {
        let mut cues = registry_with_up();
        let mut sounds = RecordingSounds::default();
        let options = SoundOptions::default().with_rolloff(4.0);

        let instance = cues.play("up", Entity::PLACEHOLDER, options, &mut sounds);

        assert_eq!(instance, Some(InstanceHandle(1)));
        let state = cues.state("up").unwrap();
        assert!(state.is_loaded);
        assert_eq!(state.instance, Some(InstanceHandle(1)));
        assert_eq!(state.options, Some(options));
    }

    #[test]
    fn test_play_again_stops_previous_instance_first() {
        let mut cues = registry_with_up();
        let mut sounds = RecordingSounds::default();

        cues.play("up", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds);
        cues.play("up", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds);

        assert_eq!(
            sounds.calls,
            vec![
                Call::Start("artifact:up".into(), InstanceHandle(1)),
                Call::Stop(InstanceHandle(1)),
                Call::Start("artifact:up".into(), InstanceHandle(2)),
            ]
        );
        assert_eq!(cues.active_count(), 1);
        assert_eq!(cues.state("up").unwrap().instance, Some(InstanceHandle(2)));
    }

    #[test]
    fn test_play_unregistered_is_noop() {
        let mut cues = CueRegistry::new();
        let mut sounds = RecordingSounds::default();
        let result = cues.play("ghost", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds);
        assert!(result.is_none());
        assert!(sounds.calls.is_empty());
        assert!(!cues.is_registered("ghost"));
    }

    #[test]
    fn test_play_without_sound_is_noop() {
        let mut cues = CueRegistry::new();
        cues.register("up");
        let mut sounds = RecordingSounds::default();
        assert!(cues.play("up", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds).is_none());
        assert!(sounds.calls.is_empty());
    }

    #[test]
    fn test_play_failed_sound_is_noop() {
        let mut cues = registry_with_up();
        cues.mark_sound_failed(&SoundHandle::new("artifact:up"));
        let mut sounds = RecordingSounds::default();
        assert!(cues.play("up", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds).is_none());
        assert!(sounds.calls.is_empty());
        assert!(!cues.state("up").unwrap().is_loaded);
    }

    #[test]
    fn test_mark_sound_ready_keeps_cue_playable() {
        let mut cues = registry_with_up();
        cues.mark_sound_ready(&SoundHandle::new("artifact:up"));
        assert_eq!(
            cues.sound("up"),
            Some(&CueSound::Ready(SoundHandle::new("artifact:up")))
        );
        let mut sounds = RecordingSounds::default();
        assert!(cues.play("up", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds).is_some());
    }

    // ==================== STOP / RELEASE TESTS ====================

    #[test]
    fn test_stop_resets_state() {
        let mut cues = registry_with_up();
        let mut sounds = RecordingSounds::default();
        cues.play("up", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds);

        cues.stop("up", &mut sounds);

        assert_eq!(sounds.calls.last(), Some(&Call::Stop(InstanceHandle(1))));
        assert_eq!(cues.state("up"), Some(&CueState::default()));
        assert!(cues.is_registered("up"));
    }

    #[test]
    fn test_stop_when_not_loaded_is_noop() {
        let mut cues = registry_with_up();
        let mut sounds = RecordingSounds::default();
        cues.stop("up", &mut sounds);
        cues.stop("ghost", &mut sounds);
        assert!(sounds.calls.is_empty());
    }

    #[test]
    fn test_release_instance() {
        let mut cues = registry_with_up();
        let mut sounds = RecordingSounds::default();
        let instance = cues
            .play("up", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds)
            .unwrap();

        assert!(!cues.release_instance(InstanceHandle(99)));
        assert!(cues.release_instance(instance));
        assert!(!cues.state("up").unwrap().is_loaded);

        // A later play does not try to stop the finished instance.
        cues.play("up", Entity::PLACEHOLDER, SoundOptions::default(), &mut sounds);
        assert!(!sounds.calls.contains(&Call::Stop(instance)));
    }
}
