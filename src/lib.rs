//! # Autodoc Index
//!
//! Generates reStructuredText for Sphinx from a source tree: one page per
//! source file, plus index pages whose `toctree` lists those pages and any
//! nested indexes. Python files are documented with `automodule`; anything
//! else is embedded with `literalinclude` and a highlighting language picked
//! from its extension.
//!
//! # Architecture: Build, Then Write
//!
//! ```text
//! 1. Build   autodoc.toml  →  AutodocIndex tree   (discover files, map paths)
//! 2. Write   AutodocIndex  →  docs/**/*.rst       (pages first, index last)
//! ```
//!
//! Building only reads the filesystem, so the tree can be inspected
//! ([`index::AutodocIndex::plan`]) before anything is written. Writing walks
//! the tree depth-first and never replaces an existing file unless asked to.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`index`] | `AutodocIndex`: ordered tree of pages and sub-indexes, index rendering, writing |
//! | [`document`] | `SourceDocument`: one source file's page, its paths and its content |
//! | [`discover`] | Expands files, directories and glob patterns; applies skip globs |
//! | [`config`] | `autodoc.toml` loading, validation, and construction of the index tree |
//! | [`method`] | `AutodocMethod` (best / contents / automodule) and its resolution |
//! | [`language`] | File extension → highlighting language table with overrides |
//! | [`rst`] | Heading underlines and the shared page template |
//! | [`write`] | Overwrite-protected, dry-run-aware file writing |
//! | [`paths`] | `~` expansion, lexical normalization, relative paths, module names |
//! | [`types`] | Serializable plan of an index tree (used by `plan --json`) |
//! | [`output`] | CLI output formatting for plans and write reports |
//!
//! # Page Layout
//!
//! Pages mirror the source layout below the *highest code directory* and keep
//! the full filename, so `src/native/thing.h` and `src/native/thing.cpp`
//! become `thing.h.rst` and `thing.cpp.rst` side by side. Every generated
//! file opens with a comment naming itself and a do-not-edit marker.

pub mod config;
pub mod discover;
pub mod document;
pub mod index;
pub mod language;
pub mod method;
pub mod output;
pub mod paths;
pub mod rst;
pub mod types;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
