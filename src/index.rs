//! Index pages: an ordered tree of generated pages and nested indexes.
//!
//! An [`AutodocIndex`] owns its children by value. Children are kept in
//! insertion order, which is the order they appear in the `toctree`. Files
//! found by one [`AutodocIndex::add_source_files`] call are sorted by path
//! before being appended.
//!
//! ## Page Placement
//!
//! Generated pages mirror the source layout below the *highest code
//! directory*, rooted at the autodoc RST root, and keep the full source
//! filename plus `.rst`:
//!
//! ```text
//! highest_code_dir = /proj/src          autodoc_rst_root_dir = /proj/docs
//!
//! /proj/src/a/b.py          →  /proj/docs/a/b.py.rst
//! /proj/src/native/thing.h  →  /proj/docs/native/thing.h.rst
//! /proj/src/native/thing.cpp→  /proj/docs/native/thing.cpp.rst
//! ```
//!
//! Same-named files in different directories and same-stem files with
//! different extensions therefore never share a page.
//!
//! ## Writing
//!
//! [`AutodocIndex::write_index_and_rst_files`] writes depth-first: every
//! child page, then every child index (recursively), then the index itself.
//! The first failure stops the walk; files already written stay on disk.

use crate::discover::{self, DiscoverError, SkipGlobs};
use crate::document::{DocumentError, DocumentOptions, SourceDocument};
use crate::language::LanguageOverrides;
use crate::method::AutodocMethod;
use crate::paths;
use crate::rst::{self, SPACER};
use crate::types::{DocumentPlan, IndexPlan, PlanEntry};
use crate::write::{self, WriteError, WriteMode};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INDEX_TITLE: &str = "Automatic documentation of source code";
pub const DEFAULT_SKIP_GLOBS: &[&str] = &["__init__.py"];
const EXT_RST: &str = ".rst";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("{what} {path} is not within project directory {root}")]
    OutsideRoot {
        what: &'static str,
        path: PathBuf,
        root: PathBuf,
    },
    #[error("Index title must be a single line: {0:?}")]
    InvalidTitle(String),
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Construction parameters for an [`AutodocIndex`].
///
/// [`IndexSettings::new`] takes the four required locations and fills the
/// rest with defaults; adjust fields before passing to [`AutodocIndex::new`].
#[derive(Debug, Clone)]
pub struct IndexSettings {
    /// The index `.rst` file to create.
    pub index_filename: PathBuf,
    /// Top-level directory of the whole project.
    pub project_root_dir: PathBuf,
    /// Directory that receives every generated page.
    pub autodoc_rst_root_dir: PathBuf,
    /// Directory whose layout is mirrored below `autodoc_rst_root_dir`.
    pub highest_code_dir: PathBuf,
    /// Root for dotted module names; defaults to `project_root_dir`.
    pub python_package_root_dir: Option<PathBuf>,
    /// Files, directories or globs to add at construction.
    pub source_filenames_or_globs: Vec<String>,
    /// Directory relative source patterns resolve against; defaults to the
    /// current working directory.
    pub pattern_base_dir: Option<PathBuf>,
    pub index_heading_underline_char: char,
    pub source_rst_heading_underline_char: char,
    pub title: String,
    /// Let `**` span directories and walk literal directories fully.
    pub recursive: bool,
    /// Globs matched against full path or file name to exclude files.
    pub skip_globs: Vec<String>,
    pub toctree_maxdepth: u32,
    pub method: AutodocMethod,
    /// RST placed before the title of every page and index.
    pub rst_prefix: String,
    /// RST placed after the body of every page and index.
    pub rst_suffix: String,
    pub source_rst_title_style_python: bool,
    pub pygments_language_override: LanguageOverrides,
}

impl IndexSettings {
    pub fn new(
        index_filename: impl Into<PathBuf>,
        project_root_dir: impl Into<PathBuf>,
        autodoc_rst_root_dir: impl Into<PathBuf>,
        highest_code_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            index_filename: index_filename.into(),
            project_root_dir: project_root_dir.into(),
            autodoc_rst_root_dir: autodoc_rst_root_dir.into(),
            highest_code_dir: highest_code_dir.into(),
            python_package_root_dir: None,
            source_filenames_or_globs: Vec::new(),
            pattern_base_dir: None,
            index_heading_underline_char: '-',
            source_rst_heading_underline_char: '~',
            title: DEFAULT_INDEX_TITLE.to_string(),
            recursive: true,
            skip_globs: DEFAULT_SKIP_GLOBS.iter().map(|s| s.to_string()).collect(),
            toctree_maxdepth: 1,
            method: AutodocMethod::Best,
            rst_prefix: String::new(),
            rst_suffix: String::new(),
            source_rst_title_style_python: true,
            pygments_language_override: LanguageOverrides::new(),
        }
    }
}

/// Per-call overrides for [`AutodocIndex::add_source_files`].
///
/// `None` means "use the index default".
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub method: Option<AutodocMethod>,
    pub recursive: Option<bool>,
    pub title_style_python: Option<bool>,
    pub language_overrides: Option<LanguageOverrides>,
}

/// A toctree entry.
#[derive(Debug, Clone)]
pub enum IndexEntry {
    Document(SourceDocument),
    Index(AutodocIndex),
}

#[derive(Debug, Clone)]
pub struct AutodocIndex {
    index_filename: PathBuf,
    title: String,
    project_root_dir: PathBuf,
    autodoc_rst_root_dir: PathBuf,
    highest_code_dir: PathBuf,
    python_package_root_dir: PathBuf,
    pattern_base_dir: PathBuf,
    index_heading_underline_char: char,
    source_rst_heading_underline_char: char,
    recursive: bool,
    skip: SkipGlobs,
    toctree_maxdepth: u32,
    method: AutodocMethod,
    rst_prefix: String,
    rst_suffix: String,
    source_rst_title_style_python: bool,
    pygments_language_override: LanguageOverrides,
    entries: Vec<IndexEntry>,
}

impl AutodocIndex {
    /// Validate `settings` and add any initial sources.
    pub fn new(settings: IndexSettings) -> Result<Self, IndexError> {
        let project_root_dir = paths::resolve_user_path(&settings.project_root_dir);
        let index_filename = paths::resolve_user_path(&settings.index_filename);
        let autodoc_rst_root_dir = paths::resolve_user_path(&settings.autodoc_rst_root_dir);
        let highest_code_dir = paths::resolve_user_path(&settings.highest_code_dir);
        let python_package_root_dir = match &settings.python_package_root_dir {
            Some(dir) => paths::resolve_user_path(dir),
            None => project_root_dir.clone(),
        };
        let pattern_base_dir = match &settings.pattern_base_dir {
            Some(dir) => paths::resolve_user_path(dir),
            None => paths::absolute(Path::new(".")),
        };

        if !project_root_dir.is_dir() {
            return Err(IndexError::NotADirectory(project_root_dir));
        }
        if settings.title.contains('\n') {
            return Err(IndexError::InvalidTitle(settings.title));
        }
        for (what, path) in [
            ("Index file", &index_filename),
            ("Highest code directory", &highest_code_dir),
            ("Autodoc RST root directory", &autodoc_rst_root_dir),
        ] {
            if paths::within(path, &project_root_dir).is_none() {
                return Err(IndexError::OutsideRoot {
                    what,
                    path: path.clone(),
                    root: project_root_dir,
                });
            }
        }

        let skip = SkipGlobs::new(&settings.skip_globs)?;

        let mut index = Self {
            index_filename,
            title: settings.title,
            project_root_dir,
            autodoc_rst_root_dir,
            highest_code_dir,
            python_package_root_dir,
            pattern_base_dir,
            index_heading_underline_char: settings.index_heading_underline_char,
            source_rst_heading_underline_char: settings.source_rst_heading_underline_char,
            recursive: settings.recursive,
            skip,
            toctree_maxdepth: settings.toctree_maxdepth,
            method: settings.method,
            rst_prefix: settings.rst_prefix,
            rst_suffix: settings.rst_suffix,
            source_rst_title_style_python: settings.source_rst_title_style_python,
            pygments_language_override: settings.pygments_language_override,
            entries: Vec::new(),
        };
        if !settings.source_filenames_or_globs.is_empty() {
            index.add_source_files(&settings.source_filenames_or_globs, &SourceOverrides::default())?;
        }
        Ok(index)
    }

    pub fn index_filename(&self) -> &Path {
        &self.index_filename
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Expand `source_filenames_or_globs` and append one page per file.
    ///
    /// Returns the number of pages added.
    pub fn add_source_files<S: AsRef<str>>(
        &mut self,
        source_filenames_or_globs: &[S],
        overrides: &SourceOverrides,
    ) -> Result<usize, IndexError> {
        let recursive = overrides.recursive.unwrap_or(self.recursive);
        let options = DocumentOptions {
            method: overrides.method.unwrap_or(self.method),
            python_package_root_dir: Some(self.python_package_root_dir.clone()),
            title_style_python: overrides
                .title_style_python
                .unwrap_or(self.source_rst_title_style_python),
            language_overrides: overrides
                .language_overrides
                .clone()
                .unwrap_or_else(|| self.pygments_language_override.clone()),
        };

        let files = self.get_sorted_source_files(source_filenames_or_globs, recursive)?;
        let added = files.len();
        for source in files {
            let target = self.specific_file_rst_filename(&source);
            let document =
                SourceDocument::new(&source, &self.project_root_dir, target, options.clone())?;
            self.entries.push(IndexEntry::Document(document));
        }
        Ok(added)
    }

    /// Sorted, filtered file list for a set of filenames and globs.
    pub fn get_sorted_source_files<S: AsRef<str>>(
        &self,
        source_filenames_or_globs: &[S],
        recursive: bool,
    ) -> Result<Vec<PathBuf>, IndexError> {
        Ok(discover::expand_patterns_in(
            source_filenames_or_globs,
            &self.pattern_base_dir,
            recursive,
            &self.skip,
        )?)
    }

    /// Would `path` be excluded by this index's skip globs?
    pub fn should_exclude(&self, path: &Path) -> bool {
        self.skip.excludes(path)
    }

    pub fn add_index(&mut self, index: AutodocIndex) {
        self.entries.push(IndexEntry::Index(index));
    }

    pub fn add_indexes(&mut self, indexes: impl IntoIterator<Item = AutodocIndex>) {
        for index in indexes {
            self.add_index(index);
        }
    }

    /// Page path for a source file below the highest code directory.
    ///
    /// Sources outside it land directly in the RST root.
    pub fn specific_file_rst_filename(&self, source_filename: &Path) -> PathBuf {
        let rel_dir = match paths::within(source_filename, &self.highest_code_dir) {
            Some(rel) => rel.parent().map(Path::to_path_buf).unwrap_or_default(),
            None => {
                tracing::warn!(
                    "Source {} is outside highest code directory {}",
                    source_filename.display(),
                    self.highest_code_dir.display()
                );
                PathBuf::new()
            }
        };
        let basename = source_filename
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut result = self.autodoc_rst_root_dir.clone();
        if !rel_dir.as_os_str().is_empty() {
            result.push(rel_dir);
        }
        result.push(format!("{basename}{EXT_RST}"));
        tracing::debug!(
            "Source {} -> RST {}",
            source_filename.display(),
            result.display()
        );
        result
    }

    /// Index path relative to the project root; labels the index file.
    pub fn index_filename_rel_project_root(&self) -> PathBuf {
        paths::relative_to(&self.index_filename, &self.project_root_dir)
    }

    /// This index as seen from the directory of another index file.
    pub fn index_filename_rel_other_index(&self, other: &Path) -> PathBuf {
        let other = paths::resolve_user_path(other);
        let other_dir = other.parent().unwrap_or(&other);
        paths::relative_to(&self.index_filename, other_dir)
    }

    /// Full text of the index page.
    pub fn index_content(&self) -> String {
        let mut lines = vec![
            "..  toctree::".to_string(),
            format!("{SPACER}:maxdepth: {}", self.toctree_maxdepth),
            String::new(),
        ];
        for entry in &self.entries {
            let rel = match entry {
                IndexEntry::Document(doc) => doc.rst_rel_index(&self.index_filename),
                IndexEntry::Index(index) => {
                    index.index_filename_rel_other_index(&self.index_filename)
                }
            };
            lines.push(format!("{SPACER}{}", paths::to_posix(&rel)));
        }

        rst::render_template(
            &paths::to_posix(&self.index_filename_rel_project_root()),
            &self.rst_prefix,
            &rst::rst_underline(&self.title, self.index_heading_underline_char),
            &lines.join("\n"),
            &self.rst_suffix,
        )
    }

    /// Write only the index page.
    pub fn write_index(&self, mode: WriteMode) -> Result<(), IndexError> {
        write::write_if_allowed(&self.index_filename, &self.index_content(), mode)?;
        Ok(())
    }

    /// Write every page and nested index, then this index.
    ///
    /// Returns the files written (or, in dry-run mode, that would have been
    /// written) in the order they were handled.
    pub fn write_index_and_rst_files(&self, mode: WriteMode) -> Result<Vec<PathBuf>, IndexError> {
        let mut written = Vec::new();
        for entry in &self.entries {
            match entry {
                IndexEntry::Document(doc) => {
                    doc.write_rst(
                        &self.rst_prefix,
                        &self.rst_suffix,
                        self.source_rst_heading_underline_char,
                        None,
                        mode,
                    )?;
                    written.push(doc.target_rst_filename().to_path_buf());
                }
                IndexEntry::Index(index) => {
                    written.extend(index.write_index_and_rst_files(mode)?);
                }
            }
        }
        self.write_index(mode)?;
        written.push(self.index_filename.clone());
        Ok(written)
    }

    /// Snapshot of the tree for display; nothing is written.
    pub fn plan(&self) -> IndexPlan {
        let children = self
            .entries
            .iter()
            .map(|entry| match entry {
                IndexEntry::Document(doc) => {
                    let method = doc.effective_method(None);
                    let (module, language) = match method {
                        AutodocMethod::Automodule => (Some(doc.python_module_name()), None),
                        _ => (None, Some(doc.language())),
                    };
                    PlanEntry::Document(DocumentPlan {
                        source: paths::to_posix(&doc.source_rel_project_root()),
                        rst_filename: paths::to_posix(&doc.rst_rel_project_root()),
                        method,
                        module,
                        language,
                    })
                }
                IndexEntry::Index(index) => PlanEntry::Index(index.plan()),
            })
            .collect();

        IndexPlan {
            index_filename: paths::to_posix(&self.index_filename_rel_project_root()),
            title: self.title.clone(),
            toctree_maxdepth: self.toctree_maxdepth,
            children,
        }
    }
}
