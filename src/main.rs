//! Virtual joystick runtime
//!
//! Drives a virtual joystick from an interactive prompt or a replay script and
//! logs what a tracked robot would receive.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use virtual_joystick::cli::{self, ReplInput};
use virtual_joystick::config::{AppConfig, ConfigWatcher};
use virtual_joystick::controller::{ControllerActor, ControllerHandle};
use virtual_joystick::drivers::{self, DriveCallback, DriveOutput};
use virtual_joystick::script::ReplayScript;

/// Virtual joystick - map touch, tilt and step input to drive commands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "joystick.yaml")]
    config: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// Replay a YAML input script instead of starting the prompt
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    print_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if args.print_schema {
        println!("{}", AppConfig::json_schema()?);
        return Ok(());
    }

    init_logging(&args.log_level, args.log_json)?;

    info!("Starting virtual joystick v{}...", env!("CARGO_PKG_VERSION"));

    let (watcher, config) = if args.config.exists() {
        let (watcher, config) = ConfigWatcher::new(&args.config).await?;
        info!(path = %args.config.display(), "Configuration loaded with hot-reload enabled");
        (Some(watcher), config)
    } else {
        warn!(
            path = %args.config.display(),
            "Config file not found, using built-in defaults"
        );
        (None, AppConfig::default())
    };

    let handle = spawn_controller(&config)?;
    let shutdown = shutdown_signal();

    let outcome = match &args.script {
        Some(path) => run_script(path, &handle, shutdown).await,
        None => run_repl(&handle, config, watcher, shutdown).await,
    };

    handle.shutdown();
    wait_for_controller(&handle).await;
    info!("Virtual joystick shutdown complete");

    outcome
}

fn spawn_controller(config: &AppConfig) -> Result<ControllerHandle> {
    let geometry = config.geometry()?;

    let on_drive: DriveCallback = Arc::new(|out: &DriveOutput| {
        debug!(
            direction = %out.direction,
            left = out.left,
            right = out.right,
            level = ?out.level,
            haptic = out.haptic,
            "drive output"
        );
    });
    let delegate = drivers::standard_delegate("joystick", config.drive, Some(on_drive));

    Ok(ControllerActor::spawn(
        geometry,
        config.settings(),
        delegate,
        config.source_factory(),
        config.sample_interval(),
    ))
}

async fn run_script(
    path: &Path,
    handle: &ControllerHandle,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    let script = ReplayScript::load(path).await?;

    tokio::select! {
        result = script.run(handle) => {
            let snapshot = result?;
            cli::print_snapshot(&snapshot);
        }
        _ = shutdown => {
            info!("Shutdown signal received, replay interrupted");
        }
    }
    Ok(())
}

async fn run_repl(
    handle: &ControllerHandle,
    mut config: AppConfig,
    mut watcher: Option<ConfigWatcher>,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    println!("{}", "Virtual joystick ready. Type 'help' for commands.".green().bold());
    let mut lines = cli::spawn_line_reader();

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            input = lines.recv() => {
                let line = match input {
                    Some(ReplInput::Line(line)) => line,
                    Some(ReplInput::Interrupted) | Some(ReplInput::Closed) | None => break,
                };
                match cli::parse_line(&line) {
                    Ok(Some(cmd)) => match cli::execute(cmd, handle).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => eprintln!("{} {:#}", "error:".red().bold(), e),
                    },
                    Ok(None) => {}
                    Err(e) => eprintln!("{} {:#}", "error:".red().bold(), e),
                }
            }

            Some(new_config) = next_config(&mut watcher) => {
                info!("📝 Configuration file changed, reloading...");
                match apply_config(handle, &config, &new_config).await {
                    Ok(()) => {
                        config = new_config;
                        info!("✅ Configuration reloaded");
                    }
                    Err(e) => warn!("⚠️  Failed to reload config (keeping old config): {:#}", e),
                }
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping prompt");
                break;
            }
        }
    }

    Ok(())
}

/// Push a reloaded config into the running controller
///
/// Settings always apply. A new geometry is refused while a session is
/// engaged; accelerometer and drive sections take effect on restart.
async fn apply_config(handle: &ControllerHandle, old: &AppConfig, new: &AppConfig) -> Result<()> {
    let geometry = new.geometry()?;
    if old.geometry().ok() != Some(geometry) {
        handle
            .configure(geometry)
            .await
            .context("Geometry change rejected")?;
    }

    handle.update_settings(new.settings(), new.tilt.interval_ms);

    if new.sensor != old.sensor || new.drive != old.drive {
        warn!("sensor and drive changes take effect after a restart");
    }
    Ok(())
}

async fn next_config(watcher: &mut Option<ConfigWatcher>) -> Option<AppConfig> {
    match watcher {
        Some(w) => w.next_config().await,
        None => std::future::pending().await,
    }
}

async fn wait_for_controller(handle: &ControllerHandle) {
    let stopped = tokio::time::timeout(Duration::from_secs(1), async {
        while handle.is_alive() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    if stopped.is_err() {
        warn!("Joystick controller did not stop in time");
    }
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level: {}", level))?;

    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
    });
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
