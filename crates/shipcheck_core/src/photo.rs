//! On-disk photo files referenced by checklist items.
//!
//! # Responsibility
//! - Store attachment bytes under generated filenames in one directory.
//! - Delete files when their owning checklist is cleared or removed.
//!
//! # Invariants
//! - Items only hold filenames; paths are always resolved against `dir`.
//! - Filenames containing path separators are rejected, never resolved.
//! - Deleting an already-missing file is not an error.

use log::{error, info, warn};
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

const PHOTO_EXTENSION: &str = "jpg";

pub struct PhotoStorage {
    dir: PathBuf,
}

impl PhotoStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolves a stored filename, or `None` for unsafe names.
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        let is_plain = !filename.is_empty()
            && !filename.contains(['/', '\\'])
            && filename != "."
            && filename != "..";
        is_plain.then(|| self.dir.join(filename))
    }

    /// Writes `bytes` under a fresh filename and returns that filename.
    pub fn save(&self, bytes: &[u8]) -> io::Result<String> {
        std::fs::create_dir_all(&self.dir)?;
        let filename = format!("{}.{PHOTO_EXTENSION}", Uuid::new_v4());
        std::fs::write(self.dir.join(&filename), bytes)?;
        info!(
            "event=photo_save module=photo status=ok bytes={}",
            bytes.len()
        );
        Ok(filename)
    }

    /// Deletes the given files and returns how many were removed.
    pub fn delete_all(&self, filenames: &[String]) -> usize {
        let mut removed = 0;
        for filename in filenames {
            let Some(path) = self.path_for(filename) else {
                warn!("event=photo_delete module=photo status=skipped reason=unsafe_name");
                continue;
            };
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    error!("event=photo_delete module=photo status=error error={err}");
                }
            }
        }
        info!(
            "event=photo_delete module=photo status=ok requested={} removed={removed}",
            filenames.len()
        );
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::PhotoStorage;

    #[test]
    fn path_for_rejects_traversal() {
        let storage = PhotoStorage::new("/tmp/photos");
        assert!(storage.path_for("../secret").is_none());
        assert!(storage.path_for("a/b.jpg").is_none());
        assert!(storage.path_for("").is_none());
        assert!(storage.path_for("ok.jpg").is_some());
    }

    #[test]
    fn save_then_delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PhotoStorage::new(dir.path());

        let name = storage.save(b"jpeg-bytes").unwrap();
        assert!(dir.path().join(&name).exists());

        let removed = storage.delete_all(&[name.clone(), "missing.jpg".to_string()]);
        assert_eq!(removed, 1);
        assert!(!dir.path().join(&name).exists());
    }
}
