//! Command-line interface and REPL
//!
//! Lines are read on a dedicated thread (rustyline blocks) and handed to the
//! async side through a channel, so the main loop can still react to config
//! reloads and Ctrl+C while waiting for input.

use anyhow::{bail, Context, Result};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tracing::warn;

use crate::controller::{ControllerHandle, ControllerSnapshot};
use crate::engine::Direction;
use crate::geometry::Point;
use crate::script::ScriptEvent;

pub const PROMPT: &str = "joystick> ";

/// One parsed REPL line
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Event(ScriptEvent),
    State,
    Help,
    Quit,
}

/// What the reader thread saw
#[derive(Debug)]
pub enum ReplInput {
    Line(String),
    /// Ctrl+C at the prompt
    Interrupted,
    /// Ctrl+D or a terminal error
    Closed,
}

/// Parse a REPL line; `Ok(None)` for blank lines and `#` comments
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let parsed = match (cmd.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("touch", [x, y]) => ReplCommand::Event(ScriptEvent::TouchBegan {
            touches: vec![parse_point(x, y)?],
        }),
        ("move", [x, y]) => ReplCommand::Event(ScriptEvent::TouchMoved {
            touches: vec![parse_point(x, y)?],
        }),
        ("end", []) => ReplCommand::Event(ScriptEvent::TouchEnded),
        ("cancel", []) => ReplCommand::Event(ScriptEvent::TouchCancelled),
        ("tilt", [state]) => {
            let enabled = match state.to_ascii_lowercase().as_str() {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" => false,
                other => bail!("tilt expects 'on' or 'off', got '{}'", other),
            };
            ReplCommand::Event(ScriptEvent::Tilt { enabled })
        }
        ("step", [dir]) => ReplCommand::Event(ScriptEvent::Step {
            direction: dir.parse::<Direction>()?,
            repeat: 1,
        }),
        ("step", [dir, n]) => ReplCommand::Event(ScriptEvent::Step {
            direction: dir.parse::<Direction>()?,
            repeat: n
                .parse()
                .with_context(|| format!("invalid repeat count '{}'", n))?,
        }),
        ("recenter" | "stop", []) => ReplCommand::Event(ScriptEvent::Recenter),
        ("wait", [ms]) => ReplCommand::Event(ScriptEvent::Wait {
            ms: ms
                .parse()
                .with_context(|| format!("invalid duration '{}'", ms))?,
        }),
        ("state" | "status", []) => ReplCommand::State,
        ("help" | "?", []) => ReplCommand::Help,
        ("quit" | "exit", []) => ReplCommand::Quit,
        (other, _) => bail!("unknown or malformed command '{}' (try 'help')", other),
    };
    Ok(Some(parsed))
}

fn parse_point(x: &str, y: &str) -> Result<Point> {
    let x: f64 = x.parse().with_context(|| format!("invalid x coordinate '{}'", x))?;
    let y: f64 = y.parse().with_context(|| format!("invalid y coordinate '{}'", y))?;
    let point = Point::new(x, y);
    if !point.is_finite() {
        bail!("coordinates must be finite");
    }
    Ok(point)
}

/// Start the blocking line reader
///
/// Runs on a plain thread rather than the blocking pool so that a pending
/// `readline` never holds up runtime shutdown.
pub fn spawn_line_reader() -> mpsc::Receiver<ReplInput> {
    let (tx, rx) = mpsc::channel(8);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                warn!("Failed to open line editor: {}", e);
                let _ = tx.blocking_send(ReplInput::Closed);
                return;
            }
        };

        loop {
            let input = match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    ReplInput::Line(line)
                }
                Err(ReadlineError::Interrupted) => ReplInput::Interrupted,
                Err(ReadlineError::Eof) => ReplInput::Closed,
                Err(e) => {
                    warn!("Line editor error: {}", e);
                    ReplInput::Closed
                }
            };
            let closed = matches!(input, ReplInput::Closed | ReplInput::Interrupted);
            if tx.blocking_send(input).is_err() || closed {
                break;
            }
        }
    });

    rx
}

/// Run one command; returns `false` when the REPL should stop
pub async fn execute(cmd: ReplCommand, handle: &ControllerHandle) -> Result<bool> {
    match cmd {
        ReplCommand::Event(event) => {
            event.apply(handle).await?;
            // Queries are ordered after the event, so this shows its effect
            let snapshot = handle.snapshot().await?;
            print_snapshot_line(&snapshot);
        }
        ReplCommand::State => {
            let snapshot = handle.snapshot().await?;
            print_snapshot(&snapshot);
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => return Ok(false),
    }
    Ok(true)
}

pub fn print_help() {
    println!("\n{}", "Commands:".bold());
    let rows = [
        ("touch <x> <y>", "finger down at a point"),
        ("move <x> <y>", "finger moved"),
        ("end | cancel", "finger lifted / gesture cancelled"),
        ("tilt on|off", "toggle accelerometer control"),
        ("step <dir> [n]", "nudge the thumb (up, down, left, right, none)"),
        ("recenter | stop", "release the thumb"),
        ("wait <ms>", "pause"),
        ("state", "show the joystick state"),
        ("quit", "leave"),
    ];
    for (cmd, what) in rows {
        println!("  {:<18} {}", cmd.yellow(), what);
    }
    println!();
}

fn mode_label(snapshot: &ControllerSnapshot) -> ColoredString {
    let mode = snapshot.joystick.mode.to_string();
    if snapshot.joystick.engaged {
        mode.green().bold()
    } else {
        mode.dimmed()
    }
}

fn print_snapshot_line(snapshot: &ControllerSnapshot) {
    println!(
        "  {} thumb {} travel {}",
        mode_label(snapshot),
        snapshot.joystick.thumb_center.to_string().cyan(),
        format!("{:.0}%", snapshot.joystick.percentage * 100.0).yellow()
    );
}

pub fn print_snapshot(snapshot: &ControllerSnapshot) {
    let j = &snapshot.joystick;
    println!("\n{}", "Joystick".bold().cyan());
    println!("  Mode:      {}", mode_label(snapshot));
    println!("  Thumb:     {}", j.thumb_center.to_string().cyan());
    println!("  Travel:    {}", format!("{:.3}", j.percentage).yellow());
    println!(
        "  Geometry:  center {} outer {} thumb {}",
        j.geometry.center(),
        j.geometry.outer_radius(),
        j.geometry.thumb_radius()
    );
    let sampling = if snapshot.sampling {
        "sampling".green()
    } else {
        "idle".dimmed()
    };
    println!("  Sensor:    {} (epoch {})", sampling, snapshot.tilt_epoch);
    println!();
}
