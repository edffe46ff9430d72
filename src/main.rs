mod terminal;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use image_slider::config::{DEFAULT_PIECE_SIZE, DEFAULT_SCRAMBLE_LIMIT};
use image_slider::image_source::SourceImage;
use image_slider::layout::GridLayout;
use image_slider::{Engine, EngineConfig, Pace, Puzzle, PuzzleError, Result, Scrambler};

#[derive(Parser, Debug)]
#[command(name = "image-slider")]
#[command(author, version, about = "Slide pieces of a picture back into place")]
struct Args {
    /// Image file to cut into pieces, as a local path or file:// URL
    image: String,

    /// Nominal piece edge in image pixels
    #[arg(long, default_value_t = DEFAULT_PIECE_SIZE)]
    piece_size: u32,

    /// Stop scrambling once this many moves are recorded
    #[arg(long, default_value_t = DEFAULT_SCRAMBLE_LIMIT)]
    scramble_limit: usize,

    /// Animation frames per slide
    #[arg(long, default_value_t = 10)]
    frames: u32,

    /// Milliseconds between animation frames
    #[arg(long, default_value_t = 10)]
    frame_ms: u64,

    /// Milliseconds between scramble moves
    #[arg(long, default_value_t = 1)]
    scramble_delay_ms: u64,

    /// Milliseconds to wait before the first scramble move
    #[arg(long, default_value_t = 2500)]
    start_delay_ms: u64,

    /// Do not start scrambling on launch
    #[arg(long)]
    no_scramble: bool,

    /// Random seed for reproducible scrambles
    #[arg(long)]
    seed: Option<u64>,

    /// Scramble to the limit, solve, and print the board instead of playing
    #[arg(long)]
    headless: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        if self.headless {
            return EngineConfig {
                scramble_limit: self.scramble_limit,
                scramble_on_start: !self.no_scramble,
                ..EngineConfig::immediate()
            };
        }
        EngineConfig {
            animation_frames: self.frames,
            frame_interval: Duration::from_millis(self.frame_ms),
            scramble_delay: Duration::from_millis(self.scramble_delay_ms),
            scramble_start_delay: Duration::from_millis(self.start_delay_ms),
            scramble_limit: self.scramble_limit,
            scramble_on_start: !self.no_scramble,
            ..EngineConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    init_logging(args.log_file.as_deref(), args.headless)?;

    let image = SourceImage::load(&args.image)?;
    let layout = GridLayout::for_image(image.width(), image.height(), args.piece_size)?;
    let puzzle = Puzzle::new(layout.columns, layout.rows)?;
    let engine = Arc::new(Engine::new(puzzle, args.engine_config()));

    if args.headless {
        run_headless(&engine, args.seed);
        return Ok(());
    }

    let scrambler = Scrambler::spawn(Arc::clone(&engine), args.seed);
    terminal::run(Arc::clone(&engine), &scrambler, &image, layout)?;
    info!(moves = engine.history_len(), "window closed");
    Ok(())
}

fn run_headless(engine: &Engine, seed: Option<u64>) {
    println!("Initial puzzle:\n{}", engine.puzzle());

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    while engine.scramble_step(&mut rng).is_some() {}
    println!(
        "Scrambled puzzle ({} moves):\n{}",
        engine.history_len(),
        engine.puzzle()
    );

    let undone = engine.solve(Pace::Instant);
    println!("Solved by undoing {} moves:\n{}", undone, engine.puzzle());
}

/// Interactive sessions own the terminal, so they only log to a file.
/// Headless runs fall back to stderr.
fn init_logging(path: Option<&Path>, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match path {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None if headless => builder.with_writer(std::io::stderr).try_init(),
        None => return Ok(()),
    };
    installed.map_err(|err| PuzzleError::Logging(err.to_string()))
}
