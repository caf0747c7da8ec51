//! Shared test utilities for the autodoc-index test suite.
//!
//! [`setup_project`] gives each test its own copy of `fixtures/project/`;
//! [`relative_names`] turns discovered paths back into fixture-relative
//! strings for assertions.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::paths;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/project/` to a temp directory and return it.
///
/// The fixture is a small mixed-language project:
///
/// ```text
/// src/pkg/{__init__.py, core.py}
/// src/pkg/util/{__init__.py, helpers.py, scratch.tmp}
/// src/native/{thing.h, thing.cpp}
/// src/data/{schema.xml, app.pro, run.weird, cache.tmp}
/// docs/source/README.txt
/// ```
pub fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/project");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Path helpers
// =========================================================================

/// Paths relative to `root`, `/`-separated, in the given order.
pub fn relative_names(root: &Path, found: &[PathBuf]) -> Vec<String> {
    let root = paths::absolute(root);
    found
        .iter()
        .map(|p| paths::to_posix(&paths::relative_to(p, &root)))
        .collect()
}
