//! Rewriting tags on disk

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use id3::{Tag, TagLike, Version};

use crate::plan::{Delivery, FinalTags, TrackPlan};
use crate::tags::{
    FRAME_ALBUM, FRAME_ALBUM_ARTIST, FRAME_ARTIST, FRAME_DISC, FRAME_TITLE, FRAME_TRACK,
    FRAME_YEAR,
};

/// Apply one plan: place the file, strip old tags, write the new ID3v2.4 tag.
/// Returns the path of the written file.
pub fn write_track(plan: &TrackPlan, delivery: &Delivery) -> Result<PathBuf> {
    let renames = matches!(delivery, Delivery::InPlace) && plan.source != plan.target;
    if renames && plan.target.exists() {
        return Err(anyhow!("refusing to overwrite {}", plan.target.display()));
    }

    let working = match delivery {
        Delivery::Copy { .. } => {
            copy_into_place(&plan.source, &plan.target)?;
            plan.target.clone()
        }
        Delivery::InPlace => plan.source.clone(),
    };

    strip_tags(&working)?;
    build_tag(&plan.tags)
        .write_to_path(&working, Version::Id3v24)
        .with_context(|| format!("failed to write ID3v2 tag for {}", working.display()))?;
    tracing::info!(path = %working.display(), "tag written");

    if renames {
        fs::rename(&working, &plan.target).with_context(|| {
            format!(
                "failed to rename {} to {}",
                working.display(),
                plan.target.display()
            )
        })?;
        tracing::debug!(from = %working.display(), to = %plan.target.display(), "renamed");
    }

    Ok(plan.target.clone())
}

fn copy_into_place(source: &Path, target: &Path) -> Result<()> {
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    if target.exists() {
        return Err(anyhow!("refusing to overwrite {}", target.display()));
    }
    fs::copy(source, target).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            target.display()
        )
    })?;
    tracing::debug!(from = %source.display(), to = %target.display(), "copied");
    Ok(())
}

/// Size of an ID3v1 tag. The APE and ID3v1 readers seek this far back from
/// the end of the file, so shorter files cannot carry either tag.
const TRAILER_LEN: u64 = 128;

/// Remove APE, ID3v1 and ID3v2 tags. Missing tags are fine.
fn strip_tags(path: &Path) -> Result<()> {
    let len = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len();
    if len >= TRAILER_LEN {
        ape::remove_from_path(path)
            .with_context(|| format!("failed to remove APE tag from {}", path.display()))?;
        id3::v1::Tag::remove_from_path(path)
            .with_context(|| format!("failed to remove ID3v1 tag from {}", path.display()))?;
    } else {
        tracing::debug!(path = %path.display(), len, "too short for trailing tags");
    }
    Tag::remove_from_path(path)
        .with_context(|| format!("failed to remove ID3v2 tag from {}", path.display()))?;
    Ok(())
}

fn build_tag(tags: &FinalTags) -> Tag {
    let mut tag = Tag::new();
    tag.set_text(FRAME_ARTIST, tags.artist.clone());
    tag.set_text(FRAME_ALBUM_ARTIST, tags.album_artist.clone());
    tag.set_text(FRAME_ALBUM, tags.album.clone());
    tag.set_text(FRAME_YEAR, tags.year.to_string());
    tag.set_text(FRAME_TITLE, tags.title.clone());
    tag.set_text(
        FRAME_TRACK,
        format!("{}/{}", tags.track_number, tags.total_tracks),
    );
    tag.set_text(
        FRAME_DISC,
        format!("{}/{}", tags.disc_number, tags.total_discs),
    );
    tag
}
