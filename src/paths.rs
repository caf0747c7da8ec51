//! Lexical path arithmetic shared by documents, indexes and discovery.
//!
//! Everything here is purely lexical: nothing touches the filesystem except
//! [`absolute`], which reads the current working directory. Symlinks are not
//! resolved, so a path and its normalised form always describe the same
//! location the user typed.
//!
//! ## Conventions
//!
//! - Roots and files are stored absolute and normalised (no `.` or `..`).
//! - Relative paths written into RST output use `/` separators regardless of
//!   platform, via [`to_posix`].
//! - Containment is tested with [`within`]; a directory is considered to lie
//!   within itself.

use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// - `"~"` → `$HOME`
/// - `"~/src/*.py"` → `$HOME/src/*.py`
/// - `"~other/x"` and anything else → unchanged
pub fn expand_user(raw: &str) -> PathBuf {
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
            .or_else(|| raw.strip_prefix("~\\"))
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

/// Make a path absolute against the current working directory and normalise it.
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

/// `~`-expand, absolutise and normalise a user-supplied path.
pub fn resolve_user_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => absolute(&expand_user(s)),
        None => absolute(path),
    }
}

/// Resolve `raw` against `base` when it is relative after `~` expansion.
pub fn resolve_against(raw: &str, base: &Path) -> PathBuf {
    let expanded = expand_user(raw);
    if expanded.is_absolute() {
        normalize(&expanded)
    } else {
        normalize(&base.join(expanded))
    }
}

/// Remove `.` components and fold `..` into their parent.
///
/// A `..` at the root of an absolute path is dropped; leading `..` of a
/// relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(comp),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Express `path` relative to the directory `base`, emitting `..` as needed.
///
/// Both arguments should be absolute and normalised. Equal paths yield `"."`.
/// Paths with different prefixes (e.g. Windows drives) have no relative form,
/// so `path` is returned unchanged.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    if path_parts.first() != base_parts.first() {
        return path.to_path_buf();
    }

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_parts.len() {
        result.push("..");
    }
    for part in &path_parts[common..] {
        result.push(part.as_os_str());
    }
    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// The part of `path` below `root`, or `None` when `path` lies outside it.
///
/// `within(root, root)` is `Some("")`.
pub fn within(path: &Path, root: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}

/// Render a path with `/` separators, as Sphinx expects in RST directives.
pub fn to_posix(path: &Path) -> String {
    let mut out = String::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(p) => out.push_str(&p.as_os_str().to_string_lossy()),
            Component::RootDir => out.push('/'),
            Component::CurDir => push_segment(&mut out, "."),
            Component::ParentDir => push_segment(&mut out, ".."),
            Component::Normal(s) => push_segment(&mut out, &s.to_string_lossy()),
        }
    }
    out
}

fn push_segment(out: &mut String, segment: &str) {
    if !out.is_empty() && !out.ends_with('/') {
        out.push('/');
    }
    out.push_str(segment);
}

/// Dotted Python module name for a path relative to the package root.
///
/// `pkg/sub/mod.py` → `pkg.sub.mod`. Only the final extension is removed.
pub fn dotted_module_name(rel: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let count = rel.components().count();
    for (i, comp) in rel.components().enumerate() {
        let Component::Normal(s) = comp else {
            continue;
        };
        if i + 1 == count {
            let last = Path::new(s);
            let stem = last.file_stem().unwrap_or(s);
            parts.push(stem.to_string_lossy().into_owned());
        } else {
            parts.push(s.to_string_lossy().into_owned());
        }
    }
    parts.join(".")
}
