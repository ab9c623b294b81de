//! Jigsaw Engine demo driver
//!
//! Slices a puzzle, solves it with a naive auto-solver through the same
//! action stream a UI would send, and prints the result.

use std::path::PathBuf;

use clap::Parser;

use jigsaw_engine::audio::LogAudio;
use jigsaw_engine::haptics::LogHaptics;
use jigsaw_engine::sim::{CompletionStats, DEFAULT_SEED, Difficulty, LayoutMode, format_time};
use jigsaw_engine::{PuzzleError, PuzzleSession, Settings, SystemClock};

/// Play a jigsaw puzzle to completion headlessly.
#[derive(Parser)]
#[command(name = "jigsaw-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image reference to slice
    #[arg(long, default_value = "demo.png")]
    image: String,
    /// Grid size: 2x2, 3x3, 4x4, 5x5, 6x6 or 8x8
    #[arg(long, default_value = "3x3")]
    difficulty: Difficulty,
    /// Canvas edge length (overrides settings)
    #[arg(long)]
    canvas: Option<f32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Piece layout: spread or tray
    #[arg(long, default_value = "spread")]
    layout: String,
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<(), PuzzleError> {
    env_logger::init();
    let cli = Cli::parse();

    let mode = LayoutMode::from_str(&cli.layout)
        .ok_or_else(|| PuzzleError::InvalidInput(format!("unknown layout '{}'", cli.layout)))?;
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let seed = cli.seed.unwrap_or(DEFAULT_SEED);
    let mut options = settings.init_options("demo", &cli.image, seed);
    if let Some(canvas) = cli.canvas {
        options.canvas_size = canvas;
    }

    let mut session = PuzzleSession::new(
        Box::new(SystemClock),
        Box::new(LogAudio::new()),
        Box::new(LogHaptics::default()),
    )?;
    session.add_listener(|stats: &CompletionStats| {
        println!(
            "Solved in {} with {} moves: {} star(s)",
            format_time(stats.time_spent),
            stats.move_count,
            stats.star_rating
        );
    });

    session.init(&cli.image, cli.difficulty, &options)?;
    log::info!(
        "{} - estimated {}",
        cli.difficulty.label(),
        cli.difficulty.estimated_time()
    );
    session.set_layout(mode);

    auto_solve(&mut session);

    if let Some(stats) = session.stats() {
        println!(
            "{}% complete, {} elapsed, {} hint(s) left",
            stats.completion_percentage,
            format_time(stats.elapsed_secs),
            stats.hints_remaining
        );
    }
    session.shutdown();
    Ok(())
}

/// Drag every piece onto its slot and snap it, in id order
fn auto_solve(session: &mut PuzzleSession) {
    let Some(state) = session.state() else {
        return;
    };
    let ids: Vec<_> = state.pieces.iter().map(|p| p.id).collect();

    for id in ids {
        let Some(target) = session
            .state()
            .and_then(|s| s.piece(id))
            .map(|p| p.target_position)
        else {
            continue;
        };
        session.grab_piece(id);
        session.move_piece(id, target.x, target.y);
        if !session.snap_piece(id) {
            log::warn!("Piece {} did not snap", id);
        }
    }
}
