//! Robot Arena headless driver
//!
//! Usage: `robot-arena [params.json] [ticks] [commands]`
//!
//! Runs the arena at a fixed step, feeding it a comma-separated command
//! script (one command every `COMMAND_INTERVAL` ticks, e.g.
//! `faster,faster,left,left,right`), then prints the final snapshot as JSON.

use std::error::Error;

use robot_arena::consts::SIM_DT;
use robot_arena::sim::{Arena, Command};
use robot_arena::ArenaParams;

const DEFAULT_TICKS: u64 = 3600;
const DEFAULT_SCRIPT: &str = "faster,faster,faster,right,right,right,left,faster";
/// Ticks between scripted commands (one second at 60 Hz)
const COMMAND_INTERVAL: u64 = 60;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Robot Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let params = match args.next() {
        Some(path) if path != "-" => ArenaParams::load(&path)?,
        _ => ArenaParams::default(),
    };
    let ticks = match args.next() {
        Some(ticks) => ticks.parse()?,
        None => DEFAULT_TICKS,
    };
    let script: Vec<Command> = args
        .next()
        .as_deref()
        .unwrap_or(DEFAULT_SCRIPT)
        .split(',')
        .map(|name| name.parse().unwrap_or_default())
        .collect();

    let mut arena = Arena::with_default_factory(&params)?;
    arena.accept_command(Command::Play);

    let mut commands = script.into_iter();
    for frame in 0..ticks {
        if frame % COMMAND_INTERVAL == 0 {
            if let Some(command) = commands.next() {
                log::debug!("Tick {}: {:?}", frame, command);
                arena.accept_command(command);
            }
        }
        if !arena.status().is_running() {
            break;
        }
        arena.advance_time(SIM_DT);
    }

    let snapshot = arena.snapshot();
    log::info!(
        "Finished after {} ticks: {} ({} lives, {} bases)",
        snapshot.ticks,
        snapshot.status.as_str(),
        snapshot.robot.lives,
        snapshot.robot.bases_captured
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
