//! Editable tag fields, their ID3 frames and input validation

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every field the user can edit, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagField {
    Artist,
    AlbumArtist,
    Album,
    Year,
    TotalTracks,
    TotalDiscs,
    TrackNumber,
    DiscNumber,
    Title,
}

/// How a field's raw input is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
}

impl TagField {
    pub const ALBUM: [TagField; 6] = [
        TagField::Artist,
        TagField::AlbumArtist,
        TagField::Album,
        TagField::Year,
        TagField::TotalTracks,
        TagField::TotalDiscs,
    ];

    pub const TRACK: [TagField; 3] = [TagField::TrackNumber, TagField::DiscNumber, TagField::Title];

    /// Label shown in front of the prompt.
    pub fn label(self) -> &'static str {
        match self {
            TagField::Artist => "ARTIST",
            TagField::AlbumArtist => "ALBUM ARTIST",
            TagField::Album => "ALBUM",
            TagField::Year => "YEAR",
            TagField::TotalTracks => "TOTAL TRACKS",
            TagField::TotalDiscs => "TOTAL DISCS",
            TagField::TrackNumber => "TRACK NUMBER",
            TagField::DiscNumber => "DISC NUMBER",
            TagField::Title => "TITLE",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TagField::Artist => "artist",
            TagField::AlbumArtist => "album_artist",
            TagField::Album => "album",
            TagField::Year => "year",
            TagField::TotalTracks => "total_tracks",
            TagField::TotalDiscs => "total_discs",
            TagField::TrackNumber => "track_number",
            TagField::DiscNumber => "disc_number",
            TagField::Title => "title",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            TagField::Artist | TagField::AlbumArtist | TagField::Album | TagField::Title => {
                ValueKind::Text
            }
            _ => ValueKind::Number,
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub const FRAME_ARTIST: &str = "TPE1";
pub const FRAME_ALBUM_ARTIST: &str = "TPE2";
pub const FRAME_ALBUM: &str = "TALB";
pub const FRAME_YEAR: &str = "TDRC";
pub const FRAME_TITLE: &str = "TIT2";
pub const FRAME_TRACK: &str = "TRCK";
pub const FRAME_DISC: &str = "TPOS";

/// Rejected input for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field}: value is required")]
    Required { field: TagField },
    #[error("{field}: accepts numeric characters only")]
    NotNumeric { field: TagField },
    #[error("{field}: number is too large")]
    OutOfRange { field: TagField },
}

/// Check raw prompt input for `field`, returning the normalised value.
pub fn validate(field: TagField, raw: &str) -> Result<String, FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::Required { field });
    }

    match field.kind() {
        ValueKind::Text => Ok(value.to_string()),
        ValueKind::Number => {
            if !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(FieldError::NotNumeric { field });
            }
            let in_range = if field == TagField::Year {
                value.parse::<i32>().is_ok()
            } else {
                value.parse::<u32>().is_ok()
            };
            if !in_range {
                return Err(FieldError::OutOfRange { field });
            }
            Ok(value.to_string())
        }
    }
}

fn position_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)?\s*(?:/\s*(\d+)\s*)?$").expect("position pattern is valid")
    })
}

/// Split an ID3 position value such as `3/12` into number and total.
pub fn split_position(raw: &str) -> (Option<u32>, Option<u32>) {
    match position_re().captures(raw) {
        Some(caps) => (
            caps.get(1).and_then(|m| m.as_str().parse().ok()),
            caps.get(2).and_then(|m| m.as_str().parse().ok()),
        ),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_require_content() {
        assert_eq!(
            validate(TagField::Artist, "   "),
            Err(FieldError::Required {
                field: TagField::Artist
            })
        );
        assert_eq!(validate(TagField::Title, "  Intro ").unwrap(), "Intro");
    }

    #[test]
    fn numeric_fields_reject_letters_and_signs() {
        assert!(matches!(
            validate(TagField::TrackNumber, "3a"),
            Err(FieldError::NotNumeric { .. })
        ));
        assert!(matches!(
            validate(TagField::Year, "-1999"),
            Err(FieldError::NotNumeric { .. })
        ));
        assert!(matches!(
            validate(TagField::TotalDiscs, "99999999999"),
            Err(FieldError::OutOfRange { .. })
        ));
        assert_eq!(validate(TagField::Year, "1999").unwrap(), "1999");
    }

    #[test]
    fn splits_positions() {
        assert_eq!(split_position("3/12"), (Some(3), Some(12)));
        assert_eq!(split_position(" 4 "), (Some(4), None));
        assert_eq!(split_position("/9"), (None, Some(9)));
        assert_eq!(split_position("side A"), (None, None));
    }

    #[test]
    fn labels_are_upper_case_keys() {
        for field in TagField::ALBUM.iter().chain(TagField::TRACK.iter()) {
            assert_eq!(field.label(), field.key().to_uppercase().replace('_', " "));
        }
    }
}
