//! Client-local durable copy of the document.

use crate::models::Document;
use crate::store::write_json_atomic;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fixed key the cache is stored under.
pub const CACHE_KEY: &str = "tourney-state-v1";

#[derive(Clone, Debug)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    /// Cache file `<dir>/tourney-state-v1.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CACHE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparsable cache file is moved before it can be overwritten.
    pub fn quarantine_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    /// Cached document, or `None` if absent or unreadable. A file that does not
    /// parse is moved to [`quarantine_path`](Self::quarantine_path).
    pub fn load(&self) -> Option<Document> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Could not read local cache {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                let aside = self.quarantine_path();
                match fs::rename(&self.path, &aside) {
                    Ok(()) => log::error!(
                        "Local cache {} does not parse ({}); moved to {}",
                        self.path.display(),
                        e,
                        aside.display()
                    ),
                    Err(move_err) => log::error!(
                        "Local cache {} does not parse ({}) and could not be moved aside: {}",
                        self.path.display(),
                        e,
                        move_err
                    ),
                }
                None
            }
        }
    }

    pub fn save(&self, doc: &Document) -> io::Result<()> {
        write_json_atomic(&self.path, doc)
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
