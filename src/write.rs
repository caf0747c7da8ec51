//! Guarded writing of generated files.
//!
//! Every generated page and index goes through [`write_if_allowed`], which
//! refuses to clobber an existing file unless `overwrite` is set and can run
//! in dry-run mode where all checks and logging happen but no bytes land on
//! disk. The existence check is not atomic with the write; concurrent writers
//! targeting the same tree are not supported.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("File exists, not overwriting: {0}")]
    AlreadyExists(PathBuf),
}

/// Flags shared by every write in a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteMode {
    /// Replace files that already exist.
    pub overwrite: bool,
    /// Validate and log, but write nothing.
    pub dry_run: bool,
}

impl WriteMode {
    pub fn new(overwrite: bool, dry_run: bool) -> Self {
        Self { overwrite, dry_run }
    }
}

/// Write `content` to `path`, creating parent directories on demand.
pub fn write_if_allowed(path: &Path, content: &str, mode: WriteMode) -> Result<(), WriteError> {
    if !mode.overwrite && path.exists() {
        tracing::error!("File exists, not overwriting: {}", path.display());
        return Err(WriteError::AlreadyExists(path.to_path_buf()));
    }

    tracing::info!("Writing to {}", path.display());
    if mode.dry_run {
        tracing::warn!("Skipping write of {} (dry run)", path.display());
        return Ok(());
    }

    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_directories() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("a/b/page.rst");

        write_if_allowed(&target, "hello\n", WriteMode::default()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");
    }

    #[test]
    fn existing_file_without_overwrite_is_collision() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("page.rst");
        fs::write(&target, "original").unwrap();

        let result = write_if_allowed(&target, "new", WriteMode::default());

        assert!(matches!(result, Err(WriteError::AlreadyExists(p)) if p == target));
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn existing_file_with_overwrite_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("page.rst");
        fs::write(&target, "original").unwrap();

        write_if_allowed(&target, "new", WriteMode::new(true, false)).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn dry_run_with_overwrite_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("page.rst");
        fs::write(&target, "original").unwrap();

        write_if_allowed(&target, "new", WriteMode::new(true, true)).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn dry_run_still_reports_collision() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("page.rst");
        fs::write(&target, "original").unwrap();

        let result = write_if_allowed(&target, "new", WriteMode::new(false, true));

        assert!(matches!(result, Err(WriteError::AlreadyExists(_))));
    }

    #[test]
    fn dry_run_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("sub/page.rst");

        write_if_allowed(&target, "new", WriteMode::new(false, true)).unwrap();

        assert!(!target.exists());
        assert!(!tmp.path().join("sub").exists());
    }
}
