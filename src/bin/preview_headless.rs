//! Preview Headless Runner
//!
//! Loads a file into a frame, applies a list of movements and prints the
//! resulting frame, either as a JSON snapshot or as the text of the screen.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use preview::app::{parse_delimiter, AppError, Viewer, ViewerConfig, DEFAULT_COL_WIDTH};
use preview::frontend::{parse_moves, OffscreenSurface};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "preview-headless",
    version,
    about = "Render a frame of a delimited text file without a terminal",
    disable_help_flag = true
)]
struct Args {
    /// File to view
    path: PathBuf,

    /// Field separator (a single byte)
    #[arg(short, long, default_value = "|", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Treat the first line as data rather than column names
    #[arg(short = 'h', long)]
    no_header: bool,

    /// Screen height
    #[arg(short, long, default_value_t = 24)]
    rows: u16,

    /// Screen width
    #[arg(short, long, default_value_t = 80)]
    cols: u16,

    /// Screen columns per data column
    #[arg(short = 'w', long, default_value_t = DEFAULT_COL_WIDTH)]
    col_width: usize,

    /// Movements to apply: h/j/k/l move, f/b page down/up
    #[arg(short, long, default_value = "")]
    moves: String,

    /// Print the rendered screen instead of a JSON snapshot
    #[arg(short, long)]
    text: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let moves = match parse_moves(&args.moves) {
        Ok(moves) => moves,
        Err(c) => {
            eprintln!("Unknown movement '{}' (expected h, j, k, l, f or b)", c);
            return ExitCode::FAILURE;
        },
    };

    match render(&args, &moves) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!("Error: {}", e);
            eprintln!("preview-headless: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn render(args: &Args, moves: &[preview::core::Movement]) -> Result<String, AppError> {
    let config = ViewerConfig {
        delimiter: args.delimiter,
        headers: !args.no_header,
        col_width: args.col_width.max(1),
        ..ViewerConfig::new(&args.path)
    };

    let mut viewer = Viewer::open(config, args.rows, args.cols)?;
    for &movement in moves {
        viewer.apply(movement)?;
    }

    let output = if args.text {
        let mut surface = OffscreenSurface::new(args.rows, args.cols);
        viewer.draw(&mut surface)?;
        surface.lines().join("\n")
    } else {
        viewer
            .frame()
            .snapshot()
            .to_json()
            .map_err(|e| AppError::Io(e.into()))?
    };

    viewer.close()?;
    Ok(output)
}
