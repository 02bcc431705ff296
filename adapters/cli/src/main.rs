#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Rampart session in a macroquad window.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rampart_rendering::{Color, FrameStatus, Presentation, RenderingBackend};
use rampart_rendering_macroquad::MacroquadBackend;
use rampart_simulation::{Config, Simulation};

/// Command-line arguments accepted by the Rampart binary.
#[derive(Debug, Parser)]
#[command(name = "rampart")]
#[command(about = "Defend the barrier against descending enemies")]
struct Args {
    /// Seed for the enemy spawner; a random seed is drawn when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Synchronise presentation with the display refresh rate
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,

    /// Log frame timing once per second
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Entry point for the Rampart command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let seed = args.seed();
    log::info!("starting session with seed {seed}");

    let mut simulation = Simulation::new(Config::new(seed));
    let scene = simulation
        .scene()
        .context("failed to build the scene for the standard field")?;
    let presentation = Presentation::new("Rampart", Color::BLACK, scene);

    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |input, scene| {
            let summary = simulation.advance(input.now, &input.actions);
            simulation.populate_scene(scene);
            summary.map_or(FrameStatus::Continue, FrameStatus::Finished)
        })
}
