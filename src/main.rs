//! Space Raiders headless host
//!
//! Runs the simulation without a terminal UI: input comes from the seeded
//! autopilot (or nothing at all), and the final state is printed as JSON.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use space_raiders::Settings;
use space_raiders::renderer::{Canvas, RenderFrame};
use space_raiders::sim::{GameState, IdleInput, InputSource, RandomInput, tick};

/// Ticks to run when neither the config file nor the flags set a limit
const DEFAULT_ITERATIONS: u32 = 500;

#[derive(Parser, Debug)]
#[command(name = "space-raiders")]
#[command(about = "Headless runner for the Space Raiders simulation")]
struct Cli {
    /// JSON settings file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after this many ticks
    #[arg(long)]
    iterations: Option<u32>,
    #[arg(long)]
    hard_mode: bool,
    /// Enable detonating aliens
    #[arg(long)]
    special_feature: bool,
    /// Alien lasers pass through other aliens
    #[arg(long)]
    no_aliens_friendly_fire: bool,
    #[arg(long)]
    seed: Option<u64>,
    /// Pause between ticks
    #[arg(long)]
    sleep_ms: Option<u64>,
    /// Press nothing instead of running the random autopilot
    #[arg(long)]
    idle: bool,
    #[arg(long)]
    hide_info: bool,
    /// Print the final frame as text
    #[arg(long)]
    print_frame: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        settings.hard_mode |= self.hard_mode;
        settings.special_feature |= self.special_feature;
        if self.no_aliens_friendly_fire {
            settings.aliens_friendly_fire = false;
        }
        if self.hide_info {
            settings.display_info = false;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(sleep_ms) = self.sleep_ms {
            settings.iteration_sleep_ms = sleep_ms;
        }
        settings.max_iterations = self
            .iterations
            .or(settings.max_iterations)
            .or(Some(DEFAULT_ITERATIONS));
        settings.validate().context("invalid settings")?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = cli.settings()?;
    log::info!("Space Raiders (headless) starting...");
    log::debug!("Effective settings: {}", settings.to_json()?);

    let mut input: Box<dyn InputSource> = if cli.idle {
        Box::new(IdleInput)
    } else {
        Box::new(RandomInput::new(settings.seed))
    };
    let pause = Duration::from_millis(settings.iteration_sleep_ms);

    let mut state = GameState::new(&settings);
    while state.is_running() {
        tick(&mut state, &input.next_input());
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }

    if cli.print_frame {
        let mut canvas = Canvas::new(settings.width as usize, settings.height as usize);
        canvas.draw(&RenderFrame::capture(&state));
        print!("{canvas}");
    }

    let summary = state.summary();
    log::info!(
        "Finished after {} ticks with score {}",
        summary.iteration,
        summary.score
    );
    let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
    println!("{json}");
    Ok(())
}
