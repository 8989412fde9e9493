//! Typed override set for descriptor resolution.
//!
//! Both configuration sources funnel into [`DescriptorOverrides`]: local
//! parameters through [`DescriptorOverrides::from_parameters`] and content
//! pack documents through [`DescriptorOverrides::from_json_str`]. Keys are
//! matched against a fixed list; anything else is kept only if it coerces to
//! a number.
//!
//! Keys are applied in a fixed order so duplicates resolve the same way on
//! every run: snake_case aliases first, then camelCase keys, each group sorted
//! by name. In a content pack, entries under `sounds` are applied after the
//! top-level fields and win over them.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::{CONTENT_PACK_PARAM, ParameterSet};
use crate::components::tween::Easing;
use crate::error::ConfigResult;

/// Optional value per descriptor key. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorOverrides {
    pub height: Option<f32>,
    pub width: Option<f32>,
    pub length: Option<f32>,
    pub speed: Option<f32>,
    pub delay: Option<f32>,
    pub volume: Option<f32>,
    pub rolloff_start_distance: Option<f32>,
    pub shape: Option<f32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub button_id: Option<String>,
    pub elevator_id: Option<String>,
    pub move_up_sound: Option<String>,
    pub move_down_sound: Option<String>,
    pub easing: Option<Easing>,
    pub extras: FxHashMap<String, f32>,
}

/// A single raw value before coercion.
enum RawValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl RawValue<'_> {
    fn as_number(&self, key: &str) -> Option<f32> {
        let value = match self {
            RawValue::Number(n) => *n as f32,
            RawValue::Text(text) => match text.trim().parse::<f32>() {
                Ok(value) => value,
                Err(_) => {
                    warn!("Ignoring non-numeric value '{}' for '{}'", text, key);
                    return None;
                }
            },
        };
        if value.is_finite() {
            Some(value)
        } else {
            warn!("Ignoring non-finite value for '{}'", key);
            None
        }
    }

    fn as_text(&self) -> String {
        match self {
            RawValue::Text(text) => text.to_string(),
            RawValue::Number(n) => n.to_string(),
        }
    }
}

/// Scalar as it appears in a content pack document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonScalar {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Top-level shape of a content pack document.
#[derive(Debug, Deserialize)]
struct ContentPackDocument {
    #[serde(default)]
    sounds: FxHashMap<String, JsonScalar>,
    #[serde(flatten)]
    fields: FxHashMap<String, JsonScalar>,
}

/// Entries of `map` in application order.
fn ordered<V>(map: &FxHashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| (!a.contains('_'), a).cmp(&(!b.contains('_'), b)));
    entries
}

impl DescriptorOverrides {
    /// Build overrides from local session parameters.
    ///
    /// The reserved `content-pack` key is skipped.
    pub fn from_parameters(params: &ParameterSet) -> Self {
        let mut overrides = Self::default();
        for (key, value) in ordered(params) {
            if key == CONTENT_PACK_PARAM {
                continue;
            }
            overrides.apply(key, RawValue::Text(value));
        }
        overrides
    }

    /// Build overrides from a content pack JSON document.
    ///
    /// The document must be a JSON object. Numbers may be given as JSON
    /// numbers or numeric strings; cue ids live under a nested `sounds`
    /// object. Values of other JSON types are ignored.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let document: ContentPackDocument = serde_json::from_str(json)?;
        let mut overrides = Self::default();
        for (key, value) in ordered(&document.fields)
            .into_iter()
            .chain(ordered(&document.sounds))
        {
            match value {
                JsonScalar::Number(n) => overrides.apply(key, RawValue::Number(*n)),
                JsonScalar::Text(text) => overrides.apply(key, RawValue::Text(text)),
                JsonScalar::Other(other) => {
                    debug!("Ignoring descriptor key '{}' with value {}", key, other);
                }
            }
        }
        Ok(overrides)
    }

    fn apply(&mut self, key: &str, value: RawValue<'_>) {
        let slot = match key {
            "height" => &mut self.height,
            "width" => &mut self.width,
            "length" => &mut self.length,
            "speed" => &mut self.speed,
            "delay" => &mut self.delay,
            "volume" => &mut self.volume,
            "rolloffStartDistance" | "rolloff_start_distance" => {
                &mut self.rolloff_start_distance
            }
            "shape" => &mut self.shape,
            "x" => &mut self.x,
            "y" => &mut self.y,
            "z" => &mut self.z,
            "buttonId" | "button_id" => {
                self.button_id = Some(value.as_text());
                return;
            }
            "elevatorId" | "elevator_id" => {
                self.elevator_id = Some(value.as_text());
                return;
            }
            "moveUpSound" | "move_up_sound" => {
                self.move_up_sound = Some(value.as_text());
                return;
            }
            "moveDownSound" | "move_down_sound" => {
                self.move_down_sound = Some(value.as_text());
                return;
            }
            "easing" => {
                let name = value.as_text();
                match Easing::from_name(&name) {
                    Some(easing) => self.easing = Some(easing),
                    None => warn!("Ignoring unknown easing '{}'", name),
                }
                return;
            }
            _ => {
                // Unknown keys survive only as numbers.
                if let Some(number) = value.as_number(key) {
                    self.extras.insert(key.to_string(), number);
                }
                return;
            }
        };
        if let Some(number) = value.as_number(key) {
            *slot = Some(number);
        }
    }
}
