//! Scene descriptor resolution.
//!
//! A [`SceneDescriptor`] is the immutable set of geometry, timing, and audio
//! parameters for one elevator instance. It is produced once per scene by
//! merging [`SceneDescriptor::default`] with a typed override set
//! ([`DescriptorOverrides`]) read either from local session parameters or
//! from a remotely fetched content pack document.
//!
//! # Sources
//!
//! - **Local parameters** – a string key/value set, the way a session URL
//!   carries them (`?height=3&speed=1.5`). Numeric keys are coerced.
//! - **Content pack** – the reserved `content-pack` parameter names a JSON
//!   document fetched over HTTPS (see [`fetch`]). Fetch failures are fatal.
//!
//! # Example
//!
//! ```ignore
//! let mut params = ParameterSet::default();
//! params.insert("height".into(), "3".into());
//! let overrides = DescriptorOverrides::from_parameters(&params);
//! let descriptor = resolve(&SceneDescriptor::default(), &overrides)?;
//! assert_eq!(descriptor.height, 3.0);
//! ```

pub mod fetch;
pub mod overrides;

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::components::tween::Easing;
use crate::error::{ConfigError, ConfigResult};

pub use overrides::DescriptorOverrides;

/// Raw session parameters, as handed over by the host.
pub type ParameterSet = FxHashMap<String, String>;

/// Parameter key that switches resolution to a remote content pack.
pub const CONTENT_PACK_PARAM: &str = "content-pack";
/// Placeholder replaced by the content pack id in URL templates.
pub const CONTENT_PACK_ID_PLACEHOLDER: &str = "{id}";
/// Default content pack endpoint.
pub const DEFAULT_CONTENT_PACK_URL: &str =
    "https://account.altvr.com/api/content_packs/{id}/raw.json";

const DEFAULT_HEIGHT: f32 = 5.0;
const DEFAULT_SPEED: f32 = 2.0;
const DEFAULT_DELAY: f32 = 6.0;
const DEFAULT_WIDTH: f32 = 0.4;
const DEFAULT_LENGTH: f32 = 0.4;
const DEFAULT_VOLUME: f32 = 1.0;
const DEFAULT_SHAPE: f32 = 0.0;
const DEFAULT_BUTTON_ID: &str = "artifact:1765608764049719385";

/// Platform artifacts selectable through the `shape` parameter.
const SHAPE_ARTIFACTS: [&str; 3] = [
    "artifact:1765571507825672216",
    "artifact:1765571516868591649",
    "artifact:1765571499302846486",
];
/// Artifact used for any `shape` outside [`SHAPE_ARTIFACTS`].
const FALLBACK_SHAPE_ARTIFACT: &str = "artifact:1765571490788409362";

/// Library artifact id of the platform model for a `shape` value.
pub fn elevator_artifact_for_shape(shape: f32) -> &'static str {
    SHAPE_ARTIFACTS
        .iter()
        .enumerate()
        .find(|(index, _)| *index as f32 == shape)
        .map(|(_, artifact)| *artifact)
        .unwrap_or(FALLBACK_SHAPE_ARTIFACT)
}

/// Sound ids for the two movement cues. `None` means the cue stays silent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueIds {
    pub move_up_sound: Option<String>,
    pub move_down_sound: Option<String>,
}

/// Resolved parameters for one elevator instance.
///
/// Numeric fields are always finite; resolution discards values that are not.
/// Negative values are kept as given.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescriptor {
    /// Vertical travel of the platform.
    pub height: f32,
    /// Platform scale along x.
    pub width: f32,
    /// Platform scale along z.
    pub length: f32,
    /// Duration of each ascent/descent animation, in seconds.
    pub speed: f32,
    /// Dwell time at the top, in seconds.
    pub delay: f32,
    /// Cue volume, clamped to `0..=1` on resolution.
    pub volume: f32,
    /// Distance at which cue attenuation starts. `None` plays cues flat.
    pub rolloff_start_distance: Option<f32>,
    /// Platform model selector, used when no explicit `elevator_id` is given.
    pub shape: f32,
    /// Button offset along x.
    pub x: f32,
    /// Button offset along y.
    pub y: f32,
    /// Button offset along z.
    pub z: f32,
    /// Library artifact of the button actor.
    pub button_id: String,
    /// Library artifact of the platform actor.
    pub elevator_id: String,
    /// Sound ids for the movement cues.
    pub sounds: CueIds,
    /// Easing curve of the platform animations.
    pub easing: Easing,
    /// Unknown numeric keys carried for forward-compatible extensions.
    pub extras: FxHashMap<String, f32>,
}

impl Default for SceneDescriptor {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            length: DEFAULT_LENGTH,
            speed: DEFAULT_SPEED,
            delay: DEFAULT_DELAY,
            volume: DEFAULT_VOLUME,
            rolloff_start_distance: None,
            shape: DEFAULT_SHAPE,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            button_id: DEFAULT_BUTTON_ID.to_string(),
            elevator_id: elevator_artifact_for_shape(DEFAULT_SHAPE).to_string(),
            sounds: CueIds::default(),
            easing: Easing::Linear,
            extras: FxHashMap::default(),
        }
    }
}

impl SceneDescriptor {
    /// Extension value for a key the typed fields do not cover.
    pub fn extra(&self, key: &str) -> Option<f32> {
        self.extras.get(key).copied()
    }
}

/// Merge `overrides` over `defaults`, key by key.
///
/// An explicit `elevator_id` wins over `shape`; a `shape` override without an
/// id selects the matching catalog artifact. Empty sound ids silence a cue.
/// Fails when an actor identifier ends up empty.
pub fn resolve(
    defaults: &SceneDescriptor,
    overrides: &DescriptorOverrides,
) -> ConfigResult<SceneDescriptor> {
    let mut descriptor = defaults.clone();

    let numeric = [
        (&mut descriptor.height, overrides.height),
        (&mut descriptor.width, overrides.width),
        (&mut descriptor.length, overrides.length),
        (&mut descriptor.speed, overrides.speed),
        (&mut descriptor.delay, overrides.delay),
        (&mut descriptor.volume, overrides.volume),
        (&mut descriptor.shape, overrides.shape),
        (&mut descriptor.x, overrides.x),
        (&mut descriptor.y, overrides.y),
        (&mut descriptor.z, overrides.z),
    ];
    for (field, value) in numeric {
        if let Some(value) = value {
            *field = value;
        }
    }
    if overrides.rolloff_start_distance.is_some() {
        descriptor.rolloff_start_distance = overrides.rolloff_start_distance;
    }
    if !(0.0..=1.0).contains(&descriptor.volume) {
        warn!("Clamping volume {} to 0..=1", descriptor.volume);
        descriptor.volume = descriptor.volume.clamp(0.0, 1.0);
    }
    if let Some(easing) = overrides.easing {
        descriptor.easing = easing;
    }

    if let Some(button_id) = &overrides.button_id {
        descriptor.button_id = button_id.clone();
    }
    match (&overrides.elevator_id, overrides.shape) {
        (Some(elevator_id), _) => descriptor.elevator_id = elevator_id.clone(),
        (None, Some(shape)) => {
            descriptor.elevator_id = elevator_artifact_for_shape(shape).to_string();
        }
        (None, None) => {}
    }

    if let Some(sound) = &overrides.move_up_sound {
        descriptor.sounds.move_up_sound = non_empty(sound);
    }
    if let Some(sound) = &overrides.move_down_sound {
        descriptor.sounds.move_down_sound = non_empty(sound);
    }

    for (key, value) in &overrides.extras {
        descriptor.extras.insert(key.clone(), *value);
    }

    if descriptor.button_id.trim().is_empty() {
        return Err(ConfigError::MissingIdentifier("buttonId"));
    }
    if descriptor.elevator_id.trim().is_empty() {
        return Err(ConfigError::MissingIdentifier("elevatorId"));
    }

    debug!("Resolved scene descriptor: {:?}", descriptor);
    Ok(descriptor)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Where the overrides for a scene come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorSource {
    /// Local session parameters, resolved synchronously.
    Parameters(ParameterSet),
    /// A remote content pack document, fetched before the scene is built.
    ContentPack { url: String },
}

impl DescriptorSource {
    /// Pick the source for a parameter set.
    ///
    /// A non-empty `content-pack` parameter selects the remote document,
    /// addressed by substituting its value into `url_template`.
    pub fn from_parameters(params: ParameterSet, url_template: &str) -> Self {
        match params.get(CONTENT_PACK_PARAM).map(|id| id.trim()) {
            Some(id) if !id.is_empty() => DescriptorSource::ContentPack {
                url: url_template.replace(CONTENT_PACK_ID_PLACEHOLDER, id),
            },
            _ => DescriptorSource::Parameters(params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn params(pairs: &[(&str, &str)]) -> ParameterSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ==================== DEFAULTS TESTS ====================

    #[test]
    fn test_default_descriptor_values() {
        let d = SceneDescriptor::default();
        assert!(approx_eq(d.height, 5.0));
        assert!(approx_eq(d.speed, 2.0));
        assert!(approx_eq(d.width, 0.4));
        assert!(approx_eq(d.length, 0.4));
        assert!(approx_eq(d.delay, 6.0));
        assert_eq!(d.button_id, DEFAULT_BUTTON_ID);
        assert_eq!(d.elevator_id, SHAPE_ARTIFACTS[0]);
        assert!(d.rolloff_start_distance.is_none());
        assert_eq!(d.sounds, CueIds::default());
    }

    #[test]
    fn test_shape_table() {
        assert_eq!(elevator_artifact_for_shape(0.0), SHAPE_ARTIFACTS[0]);
        assert_eq!(elevator_artifact_for_shape(1.0), SHAPE_ARTIFACTS[1]);
        assert_eq!(elevator_artifact_for_shape(2.0), SHAPE_ARTIFACTS[2]);
        assert_eq!(elevator_artifact_for_shape(3.0), FALLBACK_SHAPE_ARTIFACT);
        assert_eq!(elevator_artifact_for_shape(1.5), FALLBACK_SHAPE_ARTIFACT);
    }

    // ==================== RESOLVE TESTS ====================

    #[test]
    fn test_resolve_without_overrides_is_defaults() {
        let d = resolve(&SceneDescriptor::default(), &DescriptorOverrides::default()).unwrap();
        assert_eq!(d, SceneDescriptor::default());
    }

    #[test]
    fn test_resolve_overrides_key_by_key() {
        let overrides = DescriptorOverrides::from_parameters(&params(&[
            ("height", "3"),
            ("delay", "1.5"),
        ]));
        let d = resolve(&SceneDescriptor::default(), &overrides).unwrap();
        assert!(approx_eq(d.height, 3.0));
        assert!(approx_eq(d.delay, 1.5));
        // untouched keys keep defaults
        assert!(approx_eq(d.speed, 2.0));
        assert!(approx_eq(d.width, 0.4));
    }

    #[test]
    fn test_resolve_shape_selects_artifact() {
        let overrides = DescriptorOverrides::from_parameters(&params(&[("shape", "2")]));
        let d = resolve(&SceneDescriptor::default(), &overrides).unwrap();
        assert_eq!(d.elevator_id, SHAPE_ARTIFACTS[2]);
    }

    #[test]
    fn test_resolve_explicit_elevator_id_beats_shape() {
        let overrides = DescriptorOverrides::from_parameters(&params(&[
            ("shape", "1"),
            ("elevatorId", "artifact:42"),
        ]));
        let d = resolve(&SceneDescriptor::default(), &overrides).unwrap();
        assert_eq!(d.elevator_id, "artifact:42");
    }

    #[test]
    fn test_resolve_empty_identifier_fails() {
        let overrides = DescriptorOverrides::from_parameters(&params(&[("buttonId", "  ")]));
        let err = resolve(&SceneDescriptor::default(), &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentifier("buttonId")));

        let overrides = DescriptorOverrides::from_parameters(&params(&[("elevatorId", "")]));
        let err = resolve(&SceneDescriptor::default(), &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentifier("elevatorId")));
    }

    #[test]
    fn test_resolve_sound_ids_and_silencing() {
        let overrides = DescriptorOverrides::from_parameters(&params(&[
            ("moveUpSound", "artifact:up"),
            ("moveDownSound", ""),
        ]));
        let d = resolve(&SceneDescriptor::default(), &overrides).unwrap();
        assert_eq!(d.sounds.move_up_sound.as_deref(), Some("artifact:up"));
        assert!(d.sounds.move_down_sound.is_none());
    }

    #[test]
    fn test_resolve_keeps_negative_values() {
        let overrides = DescriptorOverrides::from_parameters(&params(&[("speed", "-1")]));
        let d = resolve(&SceneDescriptor::default(), &overrides).unwrap();
        assert!(approx_eq(d.speed, -1.0));
    }

    #[test]
    fn test_resolve_clamps_volume() {
        for (raw, expected) in [("-3", 0.0), ("7", 1.0), ("0.25", 0.25)] {
            let overrides = DescriptorOverrides::from_parameters(&params(&[("volume", raw)]));
            let d = resolve(&SceneDescriptor::default(), &overrides).unwrap();
            assert!(approx_eq(d.volume, expected), "volume {}", raw);
        }
    }

    #[test]
    fn test_resolve_easing() {
        let d = resolve(&SceneDescriptor::default(), &DescriptorOverrides::default()).unwrap();
        assert_eq!(d.easing, Easing::Linear);

        let overrides = DescriptorOverrides::from_parameters(&params(&[("easing", "cubicInOut")]));
        let d = resolve(&SceneDescriptor::default(), &overrides).unwrap();
        assert_eq!(d.easing, Easing::CubicInOut);
    }

    #[test]
    fn test_resolve_carries_extras() {
        let overrides = DescriptorOverrides::from_parameters(&params(&[("glow", "0.75")]));
        let d = resolve(&SceneDescriptor::default(), &overrides).unwrap();
        assert!(approx_eq(d.extra("glow").unwrap(), 0.75));
        assert!(d.extra("missing").is_none());
    }

    // ==================== SOURCE TESTS ====================

    #[test]
    fn test_source_local_parameters() {
        let p = params(&[("height", "2")]);
        let source = DescriptorSource::from_parameters(p.clone(), DEFAULT_CONTENT_PACK_URL);
        assert_eq!(source, DescriptorSource::Parameters(p));
    }

    #[test]
    fn test_source_content_pack_url() {
        let p = params(&[(CONTENT_PACK_PARAM, " 1234 ")]);
        let source = DescriptorSource::from_parameters(p, DEFAULT_CONTENT_PACK_URL);
        assert_eq!(
            source,
            DescriptorSource::ContentPack {
                url: "https://account.altvr.com/api/content_packs/1234/raw.json".to_string()
            }
        );
    }

    #[test]
    fn test_source_empty_content_pack_stays_local() {
        let p = params(&[(CONTENT_PACK_PARAM, "")]);
        let source = DescriptorSource::from_parameters(p, DEFAULT_CONTENT_PACK_URL);
        assert!(matches!(source, DescriptorSource::Parameters(_)));
    }
}
