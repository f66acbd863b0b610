//! tagg CLI

use std::env;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use tracing_subscriber::EnvFilter;

use tagg_core::discovery::{PathDiscovery, TrackDiscovery};
use tagg_core::output::ScanFormat;
use tagg_core::track::{read_tracks, TrackTags};

pub mod palette;
pub mod prompt;
pub mod session;

use palette::Palette;
use prompt::TerminalPrompter;
use session::{run_edit, EditOptions, EditOutcome};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TAGG_TARGET"), ")");

/// CLI entrypoint for tagg.
#[derive(Debug, Parser)]
#[command(
    name = "tagg",
    version = VERSION,
    about = "Interactive ID3 tagging for mp3 albums"
)]
pub struct Cli {
    /// Log filter for stderr (overridden by TAGG_LOG)
    #[arg(long = "log-level", global = true, default_value = "warn")]
    log_level: String,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", global = true, default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Review and rewrite the tags of one album
    Edit(EditArgs),
    /// Print the tags currently stored in an album
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct WalkArgs {
    /// Descend into subdirectories
    #[arg(short = 'r', long = "recursive", action = ArgAction::SetTrue)]
    recursive: bool,

    /// Follow symlinks while walking paths
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Worker threads for reading tags (falls back to TAGG_JOBS)
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct EditArgs {
    /// Source directory
    #[arg(short = 's', long = "source", default_value = ".", value_hint = ValueHint::DirPath)]
    source: PathBuf,

    /// Copy retagged files under this directory instead of renaming in place
    #[arg(short = 'd', long = "dest", value_hint = ValueHint::DirPath)]
    dest: Option<PathBuf>,

    #[command(flatten)]
    walk: WalkArgs,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Album directory
    #[arg(default_value = ".", value_hint = ValueHint::DirPath)]
    path: PathBuf,

    #[command(flatten)]
    walk: WalkArgs,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Format output as padded columns
    #[arg(long = "columns", action = ArgAction::SetTrue, conflicts_with_all = ["json", "ndjson"])]
    columns: bool,
}

impl ScanArgs {
    fn format(&self) -> Option<ScanFormat> {
        if self.ndjson {
            Some(ScanFormat::Ndjson)
        } else if self.json {
            Some(ScanFormat::Json)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let stdout = io::stdout();
    let palette = Palette::new(use_color(
        cli.color,
        stdout.is_terminal(),
        env::var_os("NO_COLOR").is_some(),
    ));

    match cli.command {
        Command::Edit(args) => run_edit_command(args, palette),
        Command::Scan(args) => run_scan(args, palette),
    }
}

fn init_logging(level: &str) {
    let filter = env::var("TAGG_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn use_color(choice: ColorChoice, is_terminal: bool, no_color: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => is_terminal && !no_color,
    }
}

fn resolve_jobs(flag: Option<usize>, env_value: Option<String>) -> Option<usize> {
    flag.or_else(|| env_value.and_then(|raw| raw.trim().parse().ok()))
        .filter(|jobs| *jobs > 0)
}

fn run_edit_command(args: EditArgs, palette: Palette) -> Result<()> {
    let opts = EditOptions {
        source: args.source,
        dest: args.dest,
        recursive: args.walk.recursive,
        follow_symlinks: args.walk.follow_symlinks,
        jobs: resolve_jobs(args.walk.jobs, env::var("TAGG_JOBS").ok()),
    };
    tracing::debug!(?opts, "starting edit");

    let mut prompter = TerminalPrompter::new(palette)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match run_edit(&opts, &mut prompter, &mut handle, palette)? {
        EditOutcome::Written(paths) => tracing::info!(files = paths.len(), "edit finished"),
        EditOutcome::Cancelled => tracing::info!("edit cancelled"),
        EditOutcome::Interrupted => tracing::info!("edit interrupted"),
    }
    Ok(())
}

fn run_scan(args: ScanArgs, palette: Palette) -> Result<()> {
    let tracks = scan_tracks(&args)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if let Some(format) = args.format() {
        format.write(&tracks, &mut handle)?;
    } else if args.columns {
        write_columns(&tracks, &mut handle, palette)?;
    } else {
        write_plain(&tracks, &mut handle, palette)?;
    }

    Ok(())
}

fn scan_tracks(args: &ScanArgs) -> Result<Vec<TrackTags>> {
    if !args.path.is_dir() {
        return Err(anyhow!("no such directory: {}", args.path.display()));
    }
    let found = PathDiscovery::new([&args.path])
        .recursive(args.walk.recursive)
        .follow_symlinks(args.walk.follow_symlinks)
        .discover()?;
    if found.is_empty() {
        return Err(anyhow!("there are no mp3 files in {}", args.path.display()));
    }

    let paths: Vec<PathBuf> = found.into_iter().map(|t| t.path).collect();
    let jobs = resolve_jobs(args.walk.jobs, env::var("TAGG_JOBS").ok());
    read_tracks(&paths, jobs)
}

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or("?")
}

fn position(number: Option<u32>, total: Option<u32>) -> String {
    match (number, total) {
        (Some(n), Some(t)) => format!("{n}/{t}"),
        (Some(n), None) => n.to_string(),
        (None, Some(t)) => format!("?/{t}"),
        (None, None) => "?".to_string(),
    }
}

fn write_plain(tracks: &[TrackTags], mut w: impl Write, palette: Palette) -> Result<()> {
    for track in tracks {
        writeln!(
            w,
            "{}  {} - {} - {}",
            palette.value(&track.path.display().to_string()),
            or_missing(track.artist.as_deref()),
            or_missing(track.album.as_deref()),
            or_missing(track.title.as_deref()),
        )?;
    }
    Ok(())
}

fn write_columns(tracks: &[TrackTags], mut w: impl Write, palette: Palette) -> Result<()> {
    let rows: Vec<[String; 5]> = tracks
        .iter()
        .map(|t| {
            [
                t.path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| t.path.display().to_string()),
                format!(
                    "{} {}",
                    position(t.disc_number, t.total_discs),
                    position(t.track_number, t.total_tracks)
                ),
                or_missing(t.artist.as_deref()).to_string(),
                format!(
                    "{} {}",
                    t.year.map(|y| y.to_string()).unwrap_or_else(|| "?".into()),
                    or_missing(t.album.as_deref())
                ),
                or_missing(t.title.as_deref()).to_string(),
            ]
        })
        .collect();

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count()).min(60);
        }
    }

    for [name, pos, artist, album, title] in rows {
        let name = pad(&name, widths[0]);
        let pos = pad(&pos, widths[1]);
        let artist = pad(&artist, widths[2]);
        let album = pad(&album, widths[3]);
        writeln!(
            w,
            "{}  {}  {}  {}  {}",
            palette.value(&name),
            palette.label(&pos),
            artist,
            album,
            title
        )?;
    }

    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}
