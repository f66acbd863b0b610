//! Interactive album edit: propose, ask, confirm, write

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use tagg_core::album::{collect_words, AlbumTags, TrackFields};
use tagg_core::discovery::{PathDiscovery, TrackDiscovery};
use tagg_core::form::{Form, FormStep, FormValues};
use tagg_core::plan::{build_plan, check_destination, Delivery};
use tagg_core::track::read_tracks;
use tagg_core::writer::write_track;

use crate::palette::Palette;
use crate::prompt::{PromptInput, Prompter};

#[derive(Debug, Clone)]
pub struct EditOptions {
    pub source: PathBuf,
    pub dest: Option<PathBuf>,
    pub recursive: bool,
    pub follow_symlinks: bool,
    pub jobs: Option<usize>,
}

/// How an edit session ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Written(Vec<PathBuf>),
    Cancelled,
    Interrupted,
}

/// Everything before the first prompt: checks, discovery and tag reading.
pub(crate) struct Prepared {
    pub source: PathBuf,
    pub delivery: Delivery,
    pub album: AlbumTags,
    pub tracks: Vec<TrackFields>,
}

pub(crate) fn prepare(opts: &EditOptions) -> Result<Prepared> {
    if !opts.source.is_dir() {
        return Err(anyhow!("no such directory: {}", opts.source.display()));
    }
    let source = opts
        .source
        .canonicalize()
        .with_context(|| format!("resolving {}", opts.source.display()))?;

    let delivery = match &opts.dest {
        Some(dest) => {
            let dest = absolute(dest)?;
            check_destination(&dest)?;
            Delivery::Copy { dest }
        }
        None => Delivery::InPlace,
    };

    let found = PathDiscovery::new([&source])
        .recursive(opts.recursive)
        .follow_symlinks(opts.follow_symlinks)
        .discover()?;
    if found.is_empty() {
        return Err(anyhow!("there are no mp3 files in {}", source.display()));
    }
    let paths: Vec<PathBuf> = found.into_iter().map(|t| t.path).collect();
    let tags = read_tracks(&paths, opts.jobs)?;
    tracing::info!(tracks = tags.len(), source = %source.display(), "loaded album");

    Ok(Prepared {
        source,
        delivery,
        album: AlbumTags::from_tracks(&tags),
        tracks: tags.iter().map(TrackFields::from).collect(),
    })
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("reading current directory")?
            .join(path))
    }
}

pub fn run_edit(
    opts: &EditOptions,
    prompter: &mut impl Prompter,
    out: &mut impl Write,
    palette: Palette,
) -> Result<EditOutcome> {
    let prepared = prepare(opts)?;

    writeln!(
        out,
        "{} {}",
        palette.label("Source:"),
        palette.value(&prepared.source.display().to_string())
    )?;
    if let Delivery::Copy { dest } = &prepared.delivery {
        writeln!(
            out,
            "{} {}",
            palette.label("Destination:"),
            palette.value(&dest.display().to_string())
        )?;
    }
    writeln!(out)?;

    prompter.set_completions(collect_words(&prepared.album, &prepared.tracks));

    let Some(album_values) = edit_form(Form::album(&prepared.album), prompter, out, palette)?
    else {
        writeln!(out, "{}", palette.error("Interrupted"))?;
        return Ok(EditOutcome::Interrupted);
    };

    let mut answers = Vec::with_capacity(prepared.tracks.len());
    for track in &prepared.tracks {
        writeln!(out)?;
        writeln!(out, "{}", palette.value(&track.path.display().to_string()))?;
        let Some(values) = edit_form(Form::track(track), prompter, out, palette)? else {
            writeln!(out, "{}", palette.error("Interrupted"))?;
            return Ok(EditOutcome::Interrupted);
        };
        answers.push((track.path.clone(), values));
    }

    let plans = build_plan(&album_values, &answers, &prepared.delivery)?;

    writeln!(out)?;
    let question = format!(
        "{} {} ",
        palette.confirm("Continue?"),
        palette.confirm("[y/n]")
    );
    loop {
        match prompter.ask(&question)?.as_deref().map(str::trim) {
            Some("y") => break,
            Some("n") => {
                writeln!(out, "{}", palette.error("Cancelled!"))?;
                return Ok(EditOutcome::Cancelled);
            }
            Some(_) => writeln!(out, "Wrong answer!")?,
            None => {
                writeln!(out, "{}", palette.error("Interrupted"))?;
                return Ok(EditOutcome::Interrupted);
            }
        }
    }

    writeln!(out)?;
    let mut written = Vec::with_capacity(plans.len());
    for plan in &plans {
        write!(out, "Writing tags for {} ... ", plan.target.display())?;
        out.flush()?;
        match write_track(plan, &prepared.delivery) {
            Ok(path) => {
                writeln!(out, "{}", palette.success("OK"))?;
                written.push(path);
            }
            Err(err) => {
                writeln!(out, "{}", palette.error("FAILED"))?;
                return Err(err);
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", palette.success("Done!"))?;
    Ok(EditOutcome::Written(written))
}

/// Drive one form to completion. `None` when the user quits.
fn edit_form(
    mut form: Form,
    prompter: &mut impl Prompter,
    out: &mut impl Write,
    palette: Palette,
) -> Result<Option<FormValues>> {
    loop {
        match form.current() {
            FormStep::Field { field, default } => {
                match prompter.read_field(field.label(), &default)? {
                    PromptInput::Value(raw) => {
                        if let Err(err) = form.submit(&raw) {
                            writeln!(out, "{}", palette.error(&err.to_string()))?;
                        }
                    }
                    PromptInput::Back => form.back(),
                    PromptInput::Quit => form.interrupt(),
                }
            }
            FormStep::Interrupted => return Ok(None),
            FormStep::Finished => return form.into_values().map(Some),
        }
    }
}
