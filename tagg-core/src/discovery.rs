//! Track discovery helpers for tagg-core

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use walkdir::WalkDir;

/// Path to a candidate track file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrackSourceRef {
    pub path: PathBuf,
}

/// Trait for enumerating tracks from some backing store.
pub trait TrackDiscovery {
    fn discover(&self) -> Result<Vec<TrackSourceRef>>;
}

/// Filesystem walker that collects mp3 files.
///
/// Only direct children of each root are considered unless `recursive` is set,
/// since an album normally lives in a single directory.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
    recursive: bool,
}

impl PathDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
            recursive: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

impl TrackDiscovery for PathDiscovery {
    fn discover(&self) -> Result<Vec<TrackSourceRef>> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                return Err(anyhow!("root path does not exist: {}", root.display()));
            }

            let mut walker = WalkDir::new(root).follow_links(self.follow_symlinks);
            if !self.recursive {
                walker = walker.max_depth(1);
            }

            for entry in walker {
                let entry = entry?;
                if entry.file_type().is_file() && is_mp3(entry.path()) {
                    found.push(TrackSourceRef {
                        path: entry.path().to_path_buf(),
                    });
                }
            }
        }

        found.sort();
        found.dedup();
        tracing::debug!(count = found.len(), "discovered tracks");
        Ok(found)
    }
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::is_mp3;
    use super::PathDiscovery;
    use super::TrackDiscovery;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn recognises_mp3_extension() {
        assert!(is_mp3("/music/a.mp3".as_ref()));
        assert!(is_mp3("/music/a.MP3".as_ref()));
        assert!(!is_mp3("/music/a.mp3.bak".as_ref()));
        assert!(!is_mp3("/music/a.flac".as_ref()));
        assert!(!is_mp3("/music/mp3".as_ref()));
    }

    #[test]
    fn skips_nested_tracks_unless_recursive() {
        let tmp = tempdir().expect("tempdir");
        let nested = tmp.path().join("cd2");
        fs::create_dir_all(&nested).expect("mkdir");
        let top = tmp.path().join("01.mp3");
        let deep = nested.join("02.mp3");
        fs::write(&top, b"").expect("touch top");
        fs::write(&deep, b"").expect("touch deep");

        let flat = PathDiscovery::new([tmp.path()]).discover().expect("discover");
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, top);

        let all = PathDiscovery::new([tmp.path()])
            .recursive(true)
            .discover()
            .expect("discover");
        assert!(all.iter().any(|t| t.path == deep));
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinks_when_enabled() {
        use std::os::unix::fs::symlink;

        let tmp = tempdir().expect("tempdir");
        let real_dir = tmp.path().join("real");
        let link_dir = tmp.path().join("link");
        fs::create_dir_all(&real_dir).expect("mkdir real");
        fs::write(real_dir.join("linked.mp3"), b"").expect("touch track");
        symlink(&real_dir, &link_dir).expect("symlink");

        let tracks = PathDiscovery::new([&link_dir])
            .follow_symlinks(true)
            .discover()
            .expect("discover");

        assert!(tracks.iter().any(|t| t.path.ends_with("linked.mp3")));
    }
}
