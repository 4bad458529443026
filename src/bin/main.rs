use std::{fs, io, path::PathBuf, process};

use anyhow::{Context, Result};
use clap::Parser;
use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Ticker};
use log::{LevelFilter, error, info, warn};
use pacer_core::{
    CadenceProfile, ReaderConfig, ReaderEngine,
    playback::Clock,
    progress::{SessionSummary, estimate_remaining_ms},
    settings::{DEFAULT_WPM, HEARTBEAT_INTERVAL_MS, clamp_wpm},
};

use terminal::TerminalView;

#[path = "main/terminal.rs"]
mod terminal;

const ORP_ANCHOR_PERCENT: usize = 42;
const VIEWPORT_COLUMNS: usize = 48;

/// Plays text one word at a time in the terminal.
#[derive(Parser, Debug)]
#[command(name = "pacer", version, long_about = None)]
struct Args {
    /// Text file to read; stdin when omitted
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Words per minute, clamped to the supported range
    #[arg(short, long, default_value_t = u32::from(DEFAULT_WPM))]
    wpm: u32,

    /// Punctuation pause profile (normal, strong)
    #[arg(short, long, default_value = "normal")]
    cadence: CadenceProfile,

    /// Focus column as a percentage of the viewport width
    #[arg(long, default_value_t = ORP_ANCHOR_PERCENT)]
    anchor_percent: usize,

    /// Viewport width in columns
    #[arg(long, default_value_t = VIEWPORT_COLUMNS)]
    width: usize,

    /// Heartbeat period in milliseconds
    #[arg(long, default_value_t = HEARTBEAT_INTERVAL_MS)]
    heartbeat_ms: u64,
}

/// Scheduler time taken from the embassy time driver.
#[derive(Clone, Copy, Debug)]
struct EmbassyClock {
    origin: Instant,
}

impl EmbassyClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis()
    }
}

fn read_source(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => io::read_to_string(io::stdin()).context("Failed to read stdin"),
    }
}

async fn run(args: Args) -> Result<()> {
    let text = read_source(args.path.as_ref())?;

    let config = ReaderConfig::default()
        .with_wpm(clamp_wpm(args.wpm))
        .with_cadence_profile(args.cadence)
        .with_heartbeat_interval_ms(args.heartbeat_ms);
    let mut engine = ReaderEngine::with_clock(config, EmbassyClock::new());

    let units = engine
        .load_text(&text)
        .context("Nothing to read in the input")?;
    let state = engine.state();
    info!(
        "pacer: units={} wpm={} cadence={} estimate_ms={}",
        units,
        state.wpm,
        state.cadence_profile,
        estimate_remaining_ms(&state.units, 0, state.wpm, state.cadence_profile)
    );

    let mut view = TerminalView::new(args.width, args.anchor_percent);
    view.draw_guide().context("Failed to write to the terminal")?;
    engine.subscribe(move |state| {
        if let Err(err) = view.draw(state) {
            warn!("terminal: draw failed: {err}");
        }
    });

    let mut ticker = Ticker::every(Duration::from_millis(engine.heartbeat_interval_ms()));
    engine.play();
    while engine.is_heartbeat_active() {
        engine.tick();
        ticker.next().await;
    }

    let summary = SessionSummary::of(engine.state());
    println!();
    println!(
        "Read {} words at {} wpm in about {}s",
        summary.words_read, summary.wpm, summary.elapsed_secs
    );
    Ok(())
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    if let Err(err) = run(Args::parse()).await {
        error!("pacer: {err:#}");
        process::exit(1);
    }
    // The std executor never returns once the main task completes.
    process::exit(0);
}
