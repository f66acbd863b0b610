//! Album-wide proposals built from the tags of every track

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::counter::Counter;
use crate::tags::TagField;
use crate::track::TrackTags;

/// Proposed album values, each the majority among tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumTags {
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub total_tracks: Option<String>,
    pub total_discs: Option<String>,
}

impl AlbumTags {
    pub fn from_tracks(tracks: &[TrackTags]) -> Self {
        let mut counter = Counter::new();
        for track in tracks {
            let values = [
                (TagField::Artist, track.artist.clone()),
                (TagField::AlbumArtist, track.album_artist.clone()),
                (TagField::Album, track.album.clone()),
                (TagField::Year, track.year.map(|y| y.to_string())),
                (TagField::TotalTracks, track.total_tracks.map(|n| n.to_string())),
                (TagField::TotalDiscs, track.total_discs.map(|n| n.to_string())),
            ];
            for (field, value) in values {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    counter.insert(field, value);
                }
            }
        }

        let pick = |field: TagField| counter.most_common(&field).cloned();
        Self {
            artist: pick(TagField::Artist),
            album_artist: pick(TagField::AlbumArtist),
            album: pick(TagField::Album),
            year: pick(TagField::Year),
            total_tracks: pick(TagField::TotalTracks),
            total_discs: pick(TagField::TotalDiscs),
        }
    }

    pub fn get(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Artist => self.artist.as_deref(),
            TagField::AlbumArtist => self.album_artist.as_deref(),
            TagField::Album => self.album.as_deref(),
            TagField::Year => self.year.as_deref(),
            TagField::TotalTracks => self.total_tracks.as_deref(),
            TagField::TotalDiscs => self.total_discs.as_deref(),
            _ => None,
        }
    }
}

/// Per-track proposals: the values that differ from track to track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackFields {
    pub path: PathBuf,
    pub title: Option<String>,
    pub track_number: Option<String>,
    pub disc_number: Option<String>,
}

impl From<&TrackTags> for TrackFields {
    fn from(track: &TrackTags) -> Self {
        Self {
            path: track.path.clone(),
            title: track.title.clone(),
            track_number: track.track_number.map(|n| n.to_string()),
            disc_number: track.disc_number.map(|n| n.to_string()),
        }
    }
}

impl TrackFields {
    pub fn get(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Title => self.title.as_deref(),
            TagField::TrackNumber => self.track_number.as_deref(),
            TagField::DiscNumber => self.disc_number.as_deref(),
            _ => None,
        }
    }
}

/// Words from every proposed value, offered as completions while editing.
pub fn collect_words(album: &AlbumTags, tracks: &[TrackFields]) -> Vec<String> {
    let mut words = BTreeSet::new();
    let album_values = TagField::ALBUM.iter().filter_map(|f| album.get(*f));
    let track_values = tracks
        .iter()
        .flat_map(|t| TagField::TRACK.iter().filter_map(move |f| t.get(*f)));

    for value in album_values.chain(track_values) {
        words.extend(value.split_whitespace().map(str::to_string));
    }
    words.into_iter().collect()
}
