//! Remote content pack retrieval.
//!
//! Fetching runs off the ECS thread: [`spawn_descriptor_fetch`] starts a
//! worker that performs the blocking request and reports the resolved
//! descriptor (or the error) over a crossbeam channel. The scene systems poll
//! that channel each frame, so scene construction waits for the fetch without
//! blocking the session loop.
//!
//! No timeout is applied: a request that never answers leaves the scene
//! unbuilt.

use std::time::Duration;

use crossbeam_channel::{Receiver, bounded};
use log::{info, warn};

use super::{DescriptorOverrides, SceneDescriptor, resolve};
use crate::error::{ConfigError, ConfigResult};

/// Download a content pack document and parse it into overrides.
///
/// Transport errors, non-success statuses, and malformed bodies are all
/// reported as errors.
pub fn fetch_overrides(url: &str) -> ConfigResult<DescriptorOverrides> {
    let network = |source| ConfigError::Network {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()
        .map_err(network)?;
    let response = client.get(url).send().map_err(network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConfigError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().map_err(network)?;
    DescriptorOverrides::from_json_str(&body)
}

/// Fetch and resolve a content pack on a worker thread.
///
/// The returned receiver yields exactly one result. If the worker dies first
/// the channel disconnects instead.
pub fn spawn_descriptor_fetch(
    url: String,
    defaults: SceneDescriptor,
) -> Receiver<ConfigResult<SceneDescriptor>> {
    let (tx, rx) = bounded(1);
    std::thread::spawn(move || {
        info!("Fetching scene descriptor from {}", url);
        let result = fetch_overrides(&url).and_then(|overrides| resolve(&defaults, &overrides));
        if let Err(e) = &result {
            warn!("Descriptor fetch from {} failed: {}", url, e);
        }
        // Receiver may be gone if the scene request was dropped.
        let _ = tx.send(result);
    });
    rx
}
