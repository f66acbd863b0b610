//! Final tag values and target file names for every track

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::form::FormValues;
use crate::tags::TagField;

/// Where rewritten files end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Retag and rename inside the source directory.
    InPlace,
    /// Copy into `<dest>/<artist>/<year> - <album>/` and retag the copies.
    Copy { dest: PathBuf },
}

/// Complete set of values written to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalTags {
    pub artist: String,
    pub album_artist: String,
    pub album: String,
    pub year: i32,
    pub title: String,
    pub track_number: u32,
    pub total_tracks: u32,
    pub disc_number: u32,
    pub total_discs: u32,
}

impl FinalTags {
    pub fn merge(album: &FormValues, track: &FormValues) -> Result<Self> {
        let text = |values: &FormValues, field: TagField| -> Result<String> {
            values
                .get(&field)
                .cloned()
                .ok_or_else(|| anyhow!("{field} is required"))
        };
        let number = |values: &FormValues, field: TagField| -> Result<u32> {
            text(values, field)?
                .parse()
                .with_context(|| format!("invalid {field}"))
        };

        Ok(Self {
            artist: text(album, TagField::Artist)?,
            album_artist: text(album, TagField::AlbumArtist)?,
            album: text(album, TagField::Album)?,
            year: text(album, TagField::Year)?
                .parse()
                .context("invalid year")?,
            title: text(track, TagField::Title)?,
            track_number: number(track, TagField::TrackNumber)?,
            total_tracks: number(album, TagField::TotalTracks)?,
            disc_number: number(track, TagField::DiscNumber)?,
            total_discs: number(album, TagField::TotalDiscs)?,
        })
    }

    /// `TT`, or `DD-TT` for multi-disc albums.
    pub fn number_prefix(&self) -> String {
        if self.total_discs > 1 {
            format!("{:02}-{:02}", self.disc_number, self.track_number)
        } else {
            format!("{:02}", self.track_number)
        }
    }

    pub fn file_name(&self) -> String {
        format!("{} - {}.mp3", self.number_prefix(), sanitize(&self.title))
    }

    /// `<artist>/<year> - <album>` relative to a destination root.
    pub fn album_dir(&self) -> PathBuf {
        Path::new(&sanitize(&self.artist))
            .join(sanitize(&format!("{} - {}", self.year, self.album)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPlan {
    pub source: PathBuf,
    pub target: PathBuf,
    pub tags: FinalTags,
}

fn hostile_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("sanitize pattern is valid"))
}

/// Make a tag value usable as a single path component.
pub fn sanitize(raw: &str) -> String {
    let cleaned = hostile_re().replace_all(raw.trim(), "_").into_owned();
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// Fail when a copy destination is already present.
pub fn check_destination(dest: &Path) -> Result<()> {
    if dest.exists() {
        return Err(anyhow!("{} already exists", dest.display()));
    }
    Ok(())
}

/// Combine the album answers with every track's answers into write plans.
pub fn build_plan(
    album: &FormValues,
    tracks: &[(PathBuf, FormValues)],
    delivery: &Delivery,
) -> Result<Vec<TrackPlan>> {
    let mut seen = HashSet::new();
    let mut plans = Vec::with_capacity(tracks.len());

    for (source, values) in tracks {
        let tags = FinalTags::merge(album, values)
            .with_context(|| format!("preparing tags for {}", source.display()))?;
        let dir = match delivery {
            Delivery::InPlace => source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            Delivery::Copy { dest } => dest.join(tags.album_dir()),
        };
        let target = dir.join(tags.file_name());

        if !seen.insert(target.clone()) {
            return Err(anyhow!("duplicate target file name: {}", tags.file_name()));
        }
        plans.push(TrackPlan {
            source: source.clone(),
            target,
            tags,
        });
    }

    match delivery {
        Delivery::InPlace => order_renames(plans),
        Delivery::Copy { .. } => Ok(plans),
    }
}

/// Refuse renames onto files outside the album, and order the rest so that a
/// target still held by another track's source is written after that track moves.
fn order_renames(plans: Vec<TrackPlan>) -> Result<Vec<TrackPlan>> {
    let sources: HashSet<&Path> = plans.iter().map(|p| p.source.as_path()).collect();
    for plan in &plans {
        let target = plan.target.as_path();
        if target != plan.source && !sources.contains(target) && target.exists() {
            return Err(anyhow!("{} already exists", target.display()));
        }
    }

    let mut pending = plans;
    let mut ordered = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let held: HashSet<&Path> = pending.iter().map(|p| p.source.as_path()).collect();
        let ready = pending
            .iter()
            .position(|p| p.target == p.source || !held.contains(p.target.as_path()));
        match ready {
            Some(idx) => ordered.push(pending.remove(idx)),
            None => {
                return Err(anyhow!(
                    "renames overwrite each other: {}",
                    pending[0].target.display()
                ))
            }
        }
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn album_values(total_discs: &str) -> FormValues {
        [
            (TagField::Artist, "Godspeed You! Black Emperor"),
            (TagField::AlbumArtist, "Godspeed You! Black Emperor"),
            (TagField::Album, "F#A#"),
            (TagField::Year, "1997"),
            (TagField::TotalTracks, "3"),
            (TagField::TotalDiscs, total_discs),
        ]
        .into_iter()
        .map(|(f, v)| (f, v.to_string()))
        .collect()
    }

    fn track_values(number: &str, disc: &str, title: &str) -> FormValues {
        [
            (TagField::TrackNumber, number),
            (TagField::DiscNumber, disc),
            (TagField::Title, title),
        ]
        .into_iter()
        .map(|(f, v)| (f, v.to_string()))
        .collect()
    }

    #[test]
    fn single_disc_names_use_track_number_only() {
        let tracks = vec![(
            PathBuf::from("/in/a.mp3"),
            track_values("1", "1", "The Dead Flag Blues"),
        )];
        let plans = build_plan(&album_values("1"), &tracks, &Delivery::InPlace).unwrap();

        assert_eq!(plans[0].target, PathBuf::from("/in/01 - The Dead Flag Blues.mp3"));
        assert_eq!(plans[0].tags.total_tracks, 3);
    }

    #[test]
    fn multi_disc_copy_layout() {
        let tracks = vec![(
            PathBuf::from("/in/b.mp3"),
            track_values("2", "2", "East Hastings"),
        )];
        let delivery = Delivery::Copy {
            dest: PathBuf::from("/out"),
        };
        let plans = build_plan(&album_values("2"), &tracks, &delivery).unwrap();

        assert_eq!(
            plans[0].target,
            PathBuf::from("/out/Godspeed You! Black Emperor/1997 - F#A#/02-02 - East Hastings.mp3")
        );
    }

    #[test]
    fn rejects_duplicate_targets() {
        let tracks = vec![
            (PathBuf::from("/in/a.mp3"), track_values("1", "1", "Same")),
            (PathBuf::from("/in/b.mp3"), track_values("01", "1", "Same")),
        ];
        let err = build_plan(&album_values("1"), &tracks, &Delivery::InPlace).unwrap_err();
        assert!(err.to_string().contains("duplicate target file name"));
    }

    #[test]
    fn in_place_rejects_unrelated_existing_target() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path();
        for name in ["a.mp3", "b.mp3", "02 - Keep.mp3"] {
            std::fs::write(dir.join(name), b"x").expect("write");
        }
        let tracks = vec![
            (dir.join("a.mp3"), track_values("1", "1", "One")),
            (dir.join("b.mp3"), track_values("2", "1", "Keep")),
        ];

        let err = build_plan(&album_values("1"), &tracks, &Delivery::InPlace).unwrap_err();
        assert!(err.to_string().contains("02 - Keep.mp3 already exists"));
    }

    #[test]
    fn in_place_keeps_files_already_named() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let source = tmp.path().join("01 - One.mp3");
        std::fs::write(&source, b"x").expect("write");
        let tracks = vec![(source.clone(), track_values("1", "1", "One"))];

        let plans = build_plan(&album_values("1"), &tracks, &Delivery::InPlace).unwrap();
        assert_eq!(plans[0].target, source);
    }

    #[test]
    fn chained_renames_move_the_blocking_file_first() {
        let tracks = vec![
            (PathBuf::from("/in/01 - A.mp3"), track_values("2", "1", "B")),
            (PathBuf::from("/in/02 - B.mp3"), track_values("3", "1", "C")),
        ];
        let plans = build_plan(&album_values("1"), &tracks, &Delivery::InPlace).unwrap();

        let sources: Vec<&Path> = plans.iter().map(|p| p.source.as_path()).collect();
        assert_eq!(
            sources,
            vec![Path::new("/in/02 - B.mp3"), Path::new("/in/01 - A.mp3")]
        );
    }

    #[test]
    fn swapped_names_are_rejected() {
        let tracks = vec![
            (PathBuf::from("/in/01 - A.mp3"), track_values("2", "1", "B")),
            (PathBuf::from("/in/02 - B.mp3"), track_values("1", "1", "A")),
        ];
        let err = build_plan(&album_values("1"), &tracks, &Delivery::InPlace).unwrap_err();
        assert!(err.to_string().contains("overwrite each other"));
    }

    #[test]
    fn missing_track_value_is_reported() {
        let mut values = track_values("1", "1", "x");
        values.remove(&TagField::Title);
        let tracks = vec![(PathBuf::from("/in/a.mp3"), values)];
        assert!(build_plan(&album_values("1"), &tracks, &Delivery::InPlace).is_err());
    }

    #[test]
    fn sanitizes_path_separators() {
        assert_eq!(sanitize("AC/DC"), "AC_DC");
        assert_eq!(sanitize("What? Now: \"Yes\""), "What_ Now_ _Yes_");
        assert_eq!(sanitize(".."), "_");
    }

    #[test]
    fn destination_must_be_absent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(check_destination(tmp.path()).is_err());
        assert!(check_destination(&tmp.path().join("new")).is_ok());
    }

    proptest! {
        #[test]
        fn sanitized_names_are_single_components(raw in ".{0,40}") {
            let name = sanitize(&raw);
            let path = Path::new(&name);
            prop_assert_eq!(path.components().count(), 1);
            prop_assert!(!name.contains('/'));
        }
    }
}
