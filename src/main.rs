//! Headless runner: loads balance settings and a save, then keeps the idle
//! clocks reconciling and autosaving until interrupted.
//!
//! Usage: `idle_acres [--config balance.ron] [--save save.json]`

use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use clap::Parser;

use idle_acres::config::BalanceConfig;
use idle_acres::save::SaveSettings;
use idle_acres::IdleCorePlugin;

/// Command-line arguments for the headless idle runner.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Balance settings in RON. Built-in defaults when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Save file to load on startup and autosave to. Saving is off when omitted.
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
}

fn main() {
    let args = CliArgs::parse();

    let config = match args.config.as_deref().map(BalanceConfig::load) {
        None => BalanceConfig::default(),
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("idle_acres: could not load config: {}", e);
            std::process::exit(1);
        }
    };
    let frame = Duration::from_millis((config.tick_interval_ms / 4).max(1));

    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame)),
            LogPlugin::default(),
            StatesPlugin,
        ))
        .insert_resource(config)
        .insert_resource(SaveSettings { path: args.save })
        .add_plugins(IdleCorePlugin)
        .run();
}
