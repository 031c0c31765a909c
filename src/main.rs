use color_eyre::{eyre::eyre, Result};
use padflow::backend::HostPlatform;
use padflow::input::{InputEvent, InputSystem, KeyboardKey};
use padflow::{DirectionIntent, InputConfig, PlayerMovement};
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Pixels per second
const PLAYER_SPEED: f32 = 88.0;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup()?;

    let config_path = std::env::var_os("PADFLOW_CONFIG")
        .map(PathBuf::from)
        .or_else(InputConfig::default_path);
    let config = InputConfig::load_or_default(config_path.as_deref());
    info!("Loaded input configuration: {:?}", config);

    let platform =
        HostPlatform::create().map_err(|e| eyre!("Failed to start host platform: {}", e))?;
    let mut system = InputSystem::create(config.clone(), Box::new(platform))?.initialize();

    let mut intent = DirectionIntent::new(config.direction_keys);
    let mut movement = PlayerMovement::new(PLAYER_SPEED);
    let mut position = (0.0_f32, 0.0_f32);

    let tick = Duration::from_millis(config.frame.tick_ms);
    let mut interval_timer = tokio::time::interval(tick);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!(
        "Running frame loop every {} ms (arrows move, j toggles joypad, r toggles repeat, ctrl-c quits)",
        config.frame.tick_ms
    );
    loop {
        tokio::select! {
            _ = interval_timer.tick() => {}
            _ = &mut ctrl_c => {
                info!("Interrupted, leaving frame loop");
                break;
            }
        }

        let events = system.drain_frame();
        if events.iter().any(InputEvent::is_window_closing) {
            info!("Window close requested, leaving frame loop");
            break;
        }

        for event in &events {
            if let Some(direction) = event.get_direction() {
                debug!("Direction pressed: {:?}", direction);
            }
            if event.is_key_pressed(KeyboardKey::J) {
                let enabled = !system.context().is_joypad_enabled();
                system.set_joypad_enabled(enabled);
                intent.resync(system.context());
            } else if event.is_key_pressed(KeyboardKey::R) {
                let repeat = !system.context().is_key_repeat();
                system.set_key_repeat(repeat);
            }
        }

        intent.notify_all(&events);
        if movement.update(intent.wanted_direction8()) {
            info!(
                "Wanted direction {:?}, velocity {:?}, position ({:.1}, {:.1})",
                movement.get_wanted_direction8(),
                movement.velocity(),
                position.0,
                position.1
            );
        }
        let (dx, dy) = movement.displacement(tick);
        position.0 += dx;
        position.1 += dy;
    }

    let config = system.shutdown();
    info!(
        "Stopped at ({:.1}, {:.1}) with joypad {} and key repeat {}",
        position.0, position.1, config.joypad_enabled, config.key_repeat
    );
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    // Raw mode is on while the loop runs; stderr keeps logs out of the
    // keyboard stream and can be redirected to a file.
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}
