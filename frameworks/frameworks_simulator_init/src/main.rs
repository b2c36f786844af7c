//! Memory Simulator Binary Entry Point
//!
//! Parses arguments, builds the session and runs the console on stdin.

use std::io;
use std::process;

use api_facades::MemorySession;
use clap::Parser;
use frameworks_simulator_init::{Command, Console, SimulatorArgs, SimulatorConfig};
use log::{error, info};

fn main() {
    pretty_env_logger::init();

    let args = SimulatorArgs::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let mut config = match SimulatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = args.apply(&mut config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let session = match MemorySession::new(config.session_config()) {
        Ok(session) => session,
        Err(e) => {
            error!("failed to start simulator: {}", e);
            process::exit(1);
        }
    };

    let mut console = Console::new(session, config.snapshot_path.clone(), rand::thread_rng());
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    // Same reporting as the console `load` command, including partial loads
    let result = if args.load {
        info!("restoring {} at startup", config.snapshot_path.display());
        console.execute(Command::Load(None), &mut stdout).map(|_| ())
    } else {
        Ok(())
    };
    let result = result.and_then(|()| console.run(stdin.lock(), &mut stdout));

    let mut session = console.into_session();
    session.shutdown();

    if let Err(e) = result {
        error!("console I/O failed: {}", e);
        process::exit(1);
    }
}
