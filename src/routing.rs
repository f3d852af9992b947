// 📦 File Routing - move handled report files out of the inbox

use crate::config::Config;
use crate::parser::Disposition;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Destination folders for accepted and rejected files
#[derive(Debug, Clone, PartialEq)]
pub struct FileRouter {
    pub processed_dir: PathBuf,
    pub rejected_dir: PathBuf,
}

impl FileRouter {
    pub fn new(processed_dir: impl Into<PathBuf>, rejected_dir: impl Into<PathBuf>) -> Self {
        FileRouter {
            processed_dir: processed_dir.into(),
            rejected_dir: rejected_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.processed_dir, &config.rejected_dir)
    }

    /// Move `path` according to its disposition; returns the new location
    pub fn route(&self, path: &Path, disposition: &Disposition) -> Result<PathBuf> {
        let dir = match disposition {
            Disposition::Accepted => &self.processed_dir,
            Disposition::Rejected(_) => &self.rejected_dir,
        };
        move_into(path, dir)
    }
}

/// Move a file into `dir`, keeping its name
///
/// Falls back to copy + remove when a rename crosses devices.
pub fn move_into(path: &Path, dir: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Not a file path: {:?}", path))?;

    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {:?}", dir))?;
    let target = dir.join(file_name);

    if let Err(e) = fs::rename(path, &target) {
        tracing::debug!(error = %e, from = ?path, to = ?target, "rename failed, copying instead");
        fs::copy(path, &target).with_context(|| format!("Failed to copy {:?} to {:?}", path, target))?;
        fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))?;
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_by_disposition() {
        let root = tempfile::tempdir().unwrap();
        let router = FileRouter::new(root.path().join("Done"), root.path().join("Garbage"));

        let accepted = root.path().join("a.txt");
        let rejected = root.path().join("b.txt");
        fs::write(&accepted, "a").unwrap();
        fs::write(&rejected, "b").unwrap();

        let moved = router.route(&accepted, &Disposition::Accepted).unwrap();
        assert_eq!(moved, root.path().join("Done").join("a.txt"));
        assert!(!accepted.exists());

        let moved = router
            .route(&rejected, &Disposition::Rejected("no title".into()))
            .unwrap();
        assert_eq!(fs::read_to_string(moved).unwrap(), "b");
        assert!(!rejected.exists());
    }

    #[test]
    fn test_missing_source_is_error() {
        let root = tempfile::tempdir().unwrap();
        assert!(move_into(&root.path().join("nope.txt"), root.path()).is_err());
    }
}
