//! Source-file discovery: pattern expansion, exclusion, ordering.
//!
//! Each input is either a literal file, a literal directory, or a glob
//! pattern. Relative inputs are resolved against a base directory (the
//! current working directory unless the caller supplies one) after `~`
//! expansion.
//!
//! ```text
//! src/pkg/core.py        literal file       → itself
//! src/pkg                literal directory  → every file below it (walkdir)
//! src/**/*.py            glob               → every match that is a file
//! ```
//!
//! With `recursive = false`, `**` in a glob behaves like `*` and a literal
//! directory contributes only its immediate files. Both kinds of expansion
//! skip hidden entries (names starting with `.`) below the given path and
//! follow symlinks to files.
//!
//! ## Exclusion
//!
//! A file is skipped when any skip glob matches **either** its full path
//! **or** its bare file name. `*.tmp` therefore excludes `a/b/c.tmp` at any
//! depth, and `__init__.py` excludes every package initialiser without
//! naming directories. A pattern written for one directory also matches
//! same-named files elsewhere.
//!
//! Files found through a relative input are also tested in the form the
//! input produced them, relative to the base directory, so `src/gen/*`
//! excludes `src/gen/a.py` found by `src/**/*.py`.
//!
//! ## Ordering
//!
//! The surviving files of one call are sorted by full path as a plain
//! string, so `pkg-extra/x.py` < `pkg.py` < `pkg/core.py`. Nothing is
//! deduplicated; overlapping patterns yield repeated entries.

use crate::paths;
use glob::{MatchOptions, Pattern};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Unreadable glob match: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Compiled skip globs.
#[derive(Debug, Clone, Default)]
pub struct SkipGlobs {
    patterns: Vec<Pattern>,
}

impl SkipGlobs {
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self, DiscoverError> {
        let patterns = globs
            .iter()
            .map(|g| compile(g.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Should `path` be left out of discovery?
    pub fn excludes(&self, path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|pattern| matches_skip_glob(path, pattern))
    }
}

/// Does `pattern` match the full path or the bare file name of `path`?
pub fn matches_skip_glob(path: &Path, pattern: &Pattern) -> bool {
    let options = MatchOptions::new();
    if pattern.matches_with(&path.to_string_lossy(), options) {
        tracing::debug!("{} matches {}", path.display(), pattern);
        return true;
    }
    if let Some(name) = path.file_name()
        && pattern.matches_with(&name.to_string_lossy(), options)
    {
        tracing::debug!("{} matches {}", name.to_string_lossy(), pattern);
        return true;
    }
    false
}

/// Plain string order of two paths, byte by byte.
pub fn compare_paths(a: &Path, b: &Path) -> Ordering {
    a.as_os_str().cmp(b.as_os_str())
}

/// A discovered file: absolute, plus the form a relative input produced.
struct Found {
    path: PathBuf,
    as_found: Option<PathBuf>,
}

/// [`expand_patterns_in`] with relative inputs resolved against the
/// current working directory.
pub fn expand_patterns<S: AsRef<str>>(
    patterns: &[S],
    recursive: bool,
    skip: &SkipGlobs,
) -> Result<Vec<PathBuf>, DiscoverError> {
    expand_patterns_in(patterns, Path::new("."), recursive, skip)
}

/// Expand every pattern, drop excluded files, and sort the result.
///
/// Relative patterns are resolved against `base`. Glob metacharacters in
/// `base` itself are matched literally.
pub fn expand_patterns_in<S: AsRef<str>>(
    patterns: &[S],
    base: &Path,
    recursive: bool,
    skip: &SkipGlobs,
) -> Result<Vec<PathBuf>, DiscoverError> {
    let base = paths::absolute(base);
    let mut found = Vec::new();
    for raw in patterns {
        for file in expand_one(raw.as_ref(), &base, recursive)? {
            tracing::debug!("Trying: {}", file.path.display());
            let excluded = skip.excludes(&file.path)
                || file.as_found.as_deref().is_some_and(|p| skip.excludes(p));
            if excluded {
                tracing::info!("Skipping file {}", file.path.display());
                continue;
            }
            found.push(file.path);
        }
    }
    found.sort_by(|a, b| compare_paths(a, b));
    Ok(found)
}

fn expand_one(raw: &str, base: &Path, recursive: bool) -> Result<Vec<Found>, DiscoverError> {
    let expanded = paths::expand_user(raw);
    tracing::debug!("Looking for: {}", expanded.display());
    let relative = !expanded.is_absolute();

    let literal = paths::normalize(&base.join(&expanded));
    let files = if literal.is_dir() {
        walk_directory(&literal, recursive)?
    } else {
        glob_files(&expanded, base, recursive, raw)?
    };

    Ok(files
        .into_iter()
        .map(|path| {
            let as_found = if relative {
                paths::within(&path, base)
            } else {
                None
            };
            Found { path, as_found }
        })
        .collect())
}

fn glob_files(
    expanded: &Path,
    base: &Path,
    recursive: bool,
    raw: &str,
) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut text = if expanded.is_absolute() {
        expanded.to_string_lossy().into_owned()
    } else {
        format!(
            "{}/{}",
            Pattern::escape(&base.to_string_lossy()),
            expanded.to_string_lossy()
        )
    };
    if !recursive {
        while text.contains("**") {
            text = text.replace("**", "*");
        }
    }

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob::glob_with(&text, options).map_err(|source| DiscoverError::Pattern {
        pattern: raw.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?;
        if path.is_dir() {
            tracing::debug!("Ignoring directory match {}", path.display());
            continue;
        }
        files.push(paths::absolute(&path));
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn walk_directory(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, DiscoverError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e));
    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(paths::normalize(entry.path()));
        }
    }
    Ok(files)
}

fn compile(glob: &str) -> Result<Pattern, DiscoverError> {
    Pattern::new(glob).map_err(|source| DiscoverError::Pattern {
        pattern: glob.to_string(),
        source,
    })
}
