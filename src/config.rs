//! Project configuration module.
//!
//! Handles loading and validating `autodoc.toml`, and turning it into an
//! [`AutodocIndex`] tree ready to be written.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! project_root = "."
//! rst_root = "docs/source/autodoc"
//! highest_code_dir = "."
//! # python_package_root = "src"     # defaults to project_root
//! index_filename = "docs/source/autodoc/_index.rst"
//! title = "Automatic documentation of source code"
//! sources = []                      # files, directories or globs
//! recursive = true
//! skip_globs = ["__init__.py"]
//! toctree_maxdepth = 1
//! method = "best"                   # best | contents | automodule
//! title_style_python = true
//! index_underline = "-"
//! source_underline = "~"
//! rst_prefix = ""
//! rst_suffix = ""
//!
//! [language_overrides]
//! ".pro" = "none"
//!
//! [[subindex]]
//! index_filename = "docs/source/autodoc/_scripts.rst"
//! title = "Scripts"
//! sources = ["scripts/*.sh"]
//! ```
//!
//! ## Sub-indexes
//!
//! Each `[[subindex]]` becomes a nested index listed after the parent's own
//! pages, in file order. A sub-index inherits every setting from its parent
//! and may override `highest_code_dir`, `recursive`, `skip_globs`,
//! `toctree_maxdepth`, `method` and `title_style_python`. Sub-indexes nest:
//! a `[[subindex.subindex]]` table belongs to the sub-index above it.
//!
//! ## Paths
//!
//! Relative paths and source patterns are resolved against a base directory
//! supplied by the caller (the CLI uses the working directory), after `~`
//! expansion.
//!
//! Unknown keys are rejected to catch typos early.

use crate::index::{AutodocIndex, DEFAULT_INDEX_TITLE, DEFAULT_SKIP_GLOBS, IndexError, IndexSettings};
use crate::language::LanguageOverrides;
use crate::method::AutodocMethod;
use crate::paths;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILENAME: &str = "autodoc.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Top-level configuration loaded from `autodoc.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutodocConfig {
    /// Top-level directory of the project.
    pub project_root: String,
    /// Directory that receives generated pages.
    pub rst_root: String,
    /// Directory whose layout is mirrored below `rst_root`.
    pub highest_code_dir: String,
    /// Root for dotted Python module names.
    pub python_package_root: Option<String>,
    /// The top-level index file.
    pub index_filename: String,
    pub title: String,
    /// Files, directories or glob patterns to document.
    pub sources: Vec<String>,
    pub recursive: bool,
    pub skip_globs: Vec<String>,
    pub toctree_maxdepth: u32,
    pub method: AutodocMethod,
    pub title_style_python: bool,
    /// Single character underlining index titles.
    pub index_underline: String,
    /// Single character underlining page titles.
    pub source_underline: String,
    pub rst_prefix: String,
    pub rst_suffix: String,
    pub language_overrides: LanguageOverrides,
    #[serde(rename = "subindex")]
    pub subindexes: Vec<SubindexConfig>,
}

impl Default for AutodocConfig {
    fn default() -> Self {
        Self {
            project_root: ".".to_string(),
            rst_root: "docs/source/autodoc".to_string(),
            highest_code_dir: ".".to_string(),
            python_package_root: None,
            index_filename: "docs/source/autodoc/_index.rst".to_string(),
            title: DEFAULT_INDEX_TITLE.to_string(),
            sources: Vec::new(),
            recursive: true,
            skip_globs: DEFAULT_SKIP_GLOBS.iter().map(|s| s.to_string()).collect(),
            toctree_maxdepth: 1,
            method: AutodocMethod::Best,
            title_style_python: true,
            index_underline: "-".to_string(),
            source_underline: "~".to_string(),
            rst_prefix: String::new(),
            rst_suffix: String::new(),
            language_overrides: LanguageOverrides::new(),
            subindexes: Vec::new(),
        }
    }
}

/// A nested index; unset options inherit from the parent.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubindexConfig {
    pub index_filename: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub highest_code_dir: Option<String>,
    #[serde(default)]
    pub recursive: Option<bool>,
    #[serde(default)]
    pub skip_globs: Option<Vec<String>>,
    #[serde(default)]
    pub toctree_maxdepth: Option<u32>,
    #[serde(default)]
    pub method: Option<AutodocMethod>,
    #[serde(default)]
    pub title_style_python: Option<bool>,
    #[serde(default, rename = "subindex")]
    pub subindexes: Vec<SubindexConfig>,
}

fn default_title() -> String {
    DEFAULT_INDEX_TITLE.to_string()
}

impl AutodocConfig {
    /// Validate values that TOML types alone cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        single_char("index_underline", &self.index_underline)?;
        single_char("source_underline", &self.source_underline)?;
        check_index("root index", &self.index_filename, &self.title)?;
        check_maxdepth(self.toctree_maxdepth)?;
        for sub in &self.subindexes {
            sub.validate()?;
        }
        Ok(())
    }

    /// Build the index tree described by this config.
    ///
    /// Relative paths and patterns are resolved against `base`. Sources are
    /// discovered immediately; nothing is written.
    pub fn build_index(&self, base: &Path) -> Result<AutodocIndex, ConfigError> {
        self.validate()?;

        let resolve = |raw: &str| paths::resolve_against(raw, base);
        let mut settings = IndexSettings::new(
            resolve(&self.index_filename),
            resolve(&self.project_root),
            resolve(&self.rst_root),
            resolve(&self.highest_code_dir),
        );
        settings.python_package_root_dir = self.python_package_root.as_deref().map(resolve);
        settings.pattern_base_dir = Some(base.to_path_buf());
        settings.source_filenames_or_globs = self.sources.clone();
        settings.index_heading_underline_char = single_char("index_underline", &self.index_underline)?;
        settings.source_rst_heading_underline_char =
            single_char("source_underline", &self.source_underline)?;
        settings.title = self.title.clone();
        settings.recursive = self.recursive;
        settings.skip_globs = self.skip_globs.clone();
        settings.toctree_maxdepth = self.toctree_maxdepth;
        settings.method = self.method;
        settings.rst_prefix = self.rst_prefix.clone();
        settings.rst_suffix = self.rst_suffix.clone();
        settings.source_rst_title_style_python = self.title_style_python;
        settings.pygments_language_override = self.language_overrides.clone();

        build_with_children(settings, &self.subindexes, base)
    }
}

impl SubindexConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_index("subindex", &self.index_filename, &self.title)?;
        if let Some(depth) = self.toctree_maxdepth {
            check_maxdepth(depth)?;
        }
        for sub in &self.subindexes {
            sub.validate()?;
        }
        Ok(())
    }

    /// Settings for this sub-index, inheriting from `parent`.
    fn settings(&self, parent: &IndexSettings, base: &Path) -> IndexSettings {
        let mut settings = parent.clone();
        settings.index_filename = paths::resolve_against(&self.index_filename, base);
        settings.title = self.title.clone();
        settings.source_filenames_or_globs = self.sources.clone();
        if let Some(dir) = &self.highest_code_dir {
            settings.highest_code_dir = paths::resolve_against(dir, base);
        }
        if let Some(recursive) = self.recursive {
            settings.recursive = recursive;
        }
        if let Some(skip_globs) = &self.skip_globs {
            settings.skip_globs = skip_globs.clone();
        }
        if let Some(depth) = self.toctree_maxdepth {
            settings.toctree_maxdepth = depth;
        }
        if let Some(method) = self.method {
            settings.method = method;
        }
        if let Some(style) = self.title_style_python {
            settings.source_rst_title_style_python = style;
        }
        settings
    }
}

fn build_with_children(
    settings: IndexSettings,
    subindexes: &[SubindexConfig],
    base: &Path,
) -> Result<AutodocIndex, ConfigError> {
    let mut index = AutodocIndex::new(settings.clone())?;
    for sub in subindexes {
        let child = build_with_children(sub.settings(&settings, base), &sub.subindexes, base)?;
        index.add_index(child);
    }
    Ok(index)
}

fn single_char(key: &str, value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(c),
        _ => Err(ConfigError::Validation(format!(
            "{key} must be a single non-whitespace character, got {value:?}"
        ))),
    }
}

fn check_index(what: &str, index_filename: &str, title: &str) -> Result<(), ConfigError> {
    if index_filename.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{what} index_filename must not be empty"
        )));
    }
    if title.contains('\n') {
        return Err(ConfigError::Validation(format!(
            "{what} title must be a single line"
        )));
    }
    Ok(())
}

fn check_maxdepth(depth: u32) -> Result<(), ConfigError> {
    if depth == 0 {
        return Err(ConfigError::Validation(
            "toctree_maxdepth must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Parse config text, then validate.
pub fn parse_config(content: &str) -> Result<AutodocConfig, ConfigError> {
    let config: AutodocConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// Returns the stock defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<AutodocConfig, ConfigError> {
    if !path.exists() {
        tracing::warn!("No config at {}; using defaults", path.display());
        return Ok(AutodocConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `autodoc.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# autodoc-index configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Relative paths and patterns are resolved against the working directory.
# Unknown keys will cause an error.

# Top-level directory of the project. Every other path must lie inside it.
project_root = "."

# Directory that receives the generated .rst pages. The source layout below
# highest_code_dir is mirrored here: src/a/b.py -> <rst_root>/a/b.py.rst
rst_root = "docs/source/autodoc"
highest_code_dir = "."

# Root for dotted Python module names (automodule pages). Defaults to
# project_root; set it when your packages live in e.g. src/.
# python_package_root = "src"

# The index file listing every generated page.
index_filename = "docs/source/autodoc/_index.rst"
title = "Automatic documentation of source code"

# Files, directories or glob patterns to document. "**" spans directories
# when recursive = true.
sources = []
recursive = true

# Files whose full path or bare name matches any of these are skipped.
skip_globs = ["__init__.py"]

# :maxdepth: of the generated toctree.
toctree_maxdepth = 1

# best       - automodule for Python files, literalinclude for the rest
# contents   - always literalinclude
# automodule - automodule where possible, literalinclude otherwise
method = "best"

# Title automodule pages as x.y.z rather than x/y/z.py.
title_style_python = true

# Heading underline characters.
index_underline = "-"
source_underline = "~"

# RST placed before the title and after the body of every generated file,
# e.g. a copyright comment.
rst_prefix = ""
rst_suffix = ""

# ---------------------------------------------------------------------------
# Syntax-highlighting language overrides, by file extension.
# ---------------------------------------------------------------------------
[language_overrides]
# ".pro" = "none"

# ---------------------------------------------------------------------------
# Nested indexes. Each inherits the settings above and may override
# highest_code_dir, recursive, skip_globs, toctree_maxdepth, method and
# title_style_python.
# ---------------------------------------------------------------------------
# [[subindex]]
# index_filename = "docs/source/autodoc/_scripts.rst"
# title = "Scripts"
# sources = ["scripts/*.sh"]
"##
}
