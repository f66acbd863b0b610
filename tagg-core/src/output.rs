//! Machine-readable scan output

use std::io::Write;

use anyhow::{Context, Result};

use crate::track::TrackTags;

/// JSON flavours `scan` can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFormat {
    /// One array, indented.
    Json,
    /// One object per line.
    Ndjson,
}

impl ScanFormat {
    pub fn write(self, tracks: &[TrackTags], w: impl Write) -> Result<()> {
        match self {
            ScanFormat::Json => write_json_pretty(tracks, w),
            ScanFormat::Ndjson => write_ndjson(tracks, w),
        }
    }
}

/// Indented JSON array terminated by a newline.
pub fn write_json_pretty(tracks: &[TrackTags], mut w: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut w, tracks).context("serializing tracks")?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

/// NDJSON: every track on its own line, in input order.
pub fn write_ndjson(tracks: &[TrackTags], mut w: impl Write) -> Result<()> {
    for track in tracks {
        serde_json::to_writer(&mut w, track)
            .with_context(|| format!("serializing {}", track.path.display()))?;
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}
