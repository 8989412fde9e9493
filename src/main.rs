//! Elevator prop simulation harness.
//!
//! Runs the elevator behavior headless: builds the ECS world, resolves the
//! scene from an INI session file plus command-line overrides (or fetches a
//! content pack), presses the button at the requested times, and logs the
//! platform's timeline. Audio is served by a stand-in host thread that logs
//! every command.
//!
//! # Running
//!
//! ```sh
//! cargo run -- --param height=3 --param delay=2 --press 0.5 --duration 12
//! cargo run -- --config elevator.ini --param content-pack=1234
//! ```
//!
//! Exits with status 1 when the scene configuration cannot be resolved.

use std::path::PathBuf;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use elevatorprop::components::elevator::TransitionController;
use elevatorprop::components::localtransform::LocalTransform;
use elevatorprop::descriptor::DescriptorSource;
use elevatorprop::events::button::ButtonClickEvent;
use elevatorprop::events::scene::{BeginSceneEvent, SceneFailedEvent, SceneReadyEvent};
use elevatorprop::game;
use elevatorprop::resources::audio::shutdown_audio;
use elevatorprop::resources::sessionconfig::SessionConfig;
use elevatorprop::resources::worldtime::WorldTime;
use elevatorprop::systems::audio::headless_audio_thread;

/// Elevator prop simulation harness
#[derive(Parser)]
#[command(version, about = "Simulates an elevator prop session headless")]
struct Cli {
    /// Session INI file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scene parameter override, `key=value`. Repeatable.
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Session time in seconds at which the button is clicked. Repeatable.
    #[arg(long = "press", value_name = "SECONDS")]
    presses: Vec<f32>,

    /// Simulated seconds to run (overrides the config file).
    #[arg(long, value_name = "SECONDS")]
    duration: Option<f32>,
}

/// Outcome of scene construction as observed by the harness.
#[derive(Resource, Default)]
struct SceneOutcome {
    ready: Option<SceneReadyEvent>,
    failed: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SessionConfig::with_path(path),
        None => SessionConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}; using session defaults", e);
    }
    for param in &cli.params {
        match param.split_once('=') {
            Some((key, value)) => config.set_param(key.trim(), value.trim()),
            None => warn!("Ignoring parameter '{}', expected key=value", param),
        }
    }
    if let Some(duration) = cli.duration {
        config.duration = duration;
    }
    let mut presses = cli.presses.clone();
    presses.sort_by(f32::total_cmp);

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    let endpoints = game::setup_world(&mut world);
    let audio_handle =
        std::thread::spawn(move || headless_audio_thread(endpoints.rx_cmd, endpoints.tx_msg));

    world.insert_resource(SceneOutcome::default());
    world.insert_resource(config.clone());
    world.spawn(Observer::new(
        |trigger: On<SceneReadyEvent>, mut outcome: ResMut<SceneOutcome>| {
            outcome.ready = Some(*trigger.event());
        },
    ));
    world.spawn(Observer::new(
        |trigger: On<SceneFailedEvent>, mut outcome: ResMut<SceneOutcome>| {
            outcome.failed = Some(trigger.event().error.clone());
        },
    ));
    world.flush();

    let source = DescriptorSource::from_parameters(config.params.clone(), &config.content_pack_url);
    if let DescriptorSource::ContentPack { url } = &source {
        info!("Scene will be built from content pack {}", url);
    }
    world.trigger(BeginSceneEvent { source });
    world.flush();

    let mut update = game::build_update_schedule();
    let dt = config.tick_seconds();
    let mut next_press = 0;
    let mut last_state: Option<&'static str> = None;

    // --------------- Main loop ---------------
    while world.resource::<WorldTime>().elapsed < config.duration {
        if world.resource::<SceneOutcome>().failed.is_some() {
            break;
        }
        game::tick(&mut world, &mut update, dt);
        let now = world.resource::<WorldTime>().elapsed;

        while next_press < presses.len() && presses[next_press] <= now {
            next_press += 1;
            let ready = world.resource::<SceneOutcome>().ready;
            match ready {
                Some(scene) => {
                    info!("t={:.2}s button pressed", now);
                    world.trigger(ButtonClickEvent {
                        button: scene.button,
                    });
                    world.flush();
                }
                None => warn!("t={:.2}s button pressed before the scene was ready", now),
            }
        }

        let mut elevators = world.query::<(&TransitionController, &LocalTransform)>();
        for (controller, transform) in elevators.iter(&world) {
            let label = controller.state().label();
            if last_state != Some(label) {
                info!(
                    "t={:.2}s elevator {} at y={:.2}",
                    now, label, transform.position.y
                );
                last_state = Some(label);
            }
        }
    }

    let outcome = world.resource::<SceneOutcome>();
    let failed = outcome.failed.clone();
    if failed.is_none() && outcome.ready.is_none() {
        warn!("Session ended before the scene was built");
    }

    shutdown_audio(&mut world);
    if audio_handle.join().is_err() {
        error!("Audio host thread panicked");
    }

    if let Some(e) = failed {
        error!("Scene configuration failed: {}", e);
        std::process::exit(1);
    }
}
