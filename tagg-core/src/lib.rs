//! tagg-core: album tagging without the terminal
//!
//! Everything `tagg` does to files lives here, kept apart from prompts and
//! argument parsing so it can be tested on scratch directories.
//!
//! ## Pipeline
//!
//! 1. [`discovery`] finds the mp3 files of an album directory.
//! 2. [`track`] reads whatever ID3v2 tags they already carry, in parallel.
//! 3. [`album`] proposes album-wide values by majority vote ([`counter`]).
//! 4. [`form`] is the state machine a front end walks to confirm or change
//!    every value; [`tags`] defines the fields and validates input.
//! 5. [`plan`] merges the answers into final tags and target file names.
//! 6. [`writer`] strips APE/ID3v1/ID3v2 tags, writes a fresh ID3v2.4 tag and
//!    renames or copies the file.
//!
//! [`output`] renders scan results as JSON or NDJSON.
//!
//! ```rust,no_run
//! use tagg_core::album::AlbumTags;
//! use tagg_core::discovery::{PathDiscovery, TrackDiscovery};
//! use tagg_core::track::read_tracks;
//!
//! let found = PathDiscovery::new(["./album"]).discover()?;
//! let paths: Vec<_> = found.into_iter().map(|t| t.path).collect();
//! let tracks = read_tracks(&paths, None)?;
//! let album = AlbumTags::from_tracks(&tracks);
//! println!("artist: {:?}", album.artist);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod album;
pub mod counter;
pub mod discovery;
pub mod form;
pub mod output;
pub mod plan;
pub mod tags;
pub mod track;
pub mod writer;
