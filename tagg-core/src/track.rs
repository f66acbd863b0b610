//! Reading the tags currently stored in track files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use id3::{ErrorKind as Id3ErrorKind, Tag, TagLike};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::tags::{
    split_position, FRAME_ALBUM, FRAME_ALBUM_ARTIST, FRAME_ARTIST, FRAME_DISC, FRAME_TITLE,
    FRAME_TRACK,
};

/// Tags found in a single file. Missing frames stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTags {
    pub path: PathBuf,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<i32>,
    pub title: Option<String>,
    pub track_number: Option<u32>,
    pub total_tracks: Option<u32>,
    pub disc_number: Option<u32>,
    pub total_discs: Option<u32>,
}

impl TrackTags {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    fn from_tag(path: &Path, tag: &Tag) -> Self {
        let (track_number, total_tracks) = position(tag, FRAME_TRACK);
        let (disc_number, total_discs) = position(tag, FRAME_DISC);

        Self {
            path: path.to_path_buf(),
            artist: text(tag, FRAME_ARTIST),
            album_artist: text(tag, FRAME_ALBUM_ARTIST),
            album: text(tag, FRAME_ALBUM),
            year: tag.date_recorded().map(|ts| ts.year).or_else(|| tag.year()),
            title: text(tag, FRAME_TITLE),
            track_number,
            total_tracks,
            disc_number,
            total_discs,
        }
    }
}

fn text(tag: &Tag, frame_id: &str) -> Option<String> {
    tag.get(frame_id)
        .and_then(|frame| frame.content().text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn position(tag: &Tag, frame_id: &str) -> (Option<u32>, Option<u32>) {
    match tag.get(frame_id).and_then(|frame| frame.content().text()) {
        Some(raw) => split_position(raw),
        None => (None, None),
    }
}

/// Read the ID3v2 tag of one file. A file without a tag is not an error.
pub fn read_track(path: &Path) -> Result<TrackTags> {
    match Tag::read_from_path(path) {
        Ok(tag) => {
            tracing::debug!(path = %path.display(), "read tag");
            Ok(TrackTags::from_tag(path, &tag))
        }
        Err(err) if matches!(err.kind, Id3ErrorKind::NoTag) => {
            tracing::debug!(path = %path.display(), "no tag present");
            Ok(TrackTags::empty(path))
        }
        Err(err) => {
            Err(err).with_context(|| format!("reading tags from {}", path.display()))
        }
    }
}

/// Read every file in parallel, keeping input order.
pub fn read_tracks(paths: &[PathBuf], jobs: Option<usize>) -> Result<Vec<TrackTags>> {
    let run = || -> Result<Vec<TrackTags>> {
        paths.par_iter().map(|path| read_track(path)).collect()
    };

    if let Some(jobs) = jobs {
        let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(run)
    } else {
        run()
    }
}
