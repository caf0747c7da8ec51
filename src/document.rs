//! One source file and the RST page that documents it.
//!
//! A [`SourceDocument`] knows three absolute locations (the source file, the
//! project root, and the page to generate) plus the Python package root used
//! to derive dotted module names. Every relative path needed by the page or
//! by an index that links to it is computed on demand from those.
//!
//! ## Page Contents
//!
//! Python sources rendered with `automodule`:
//!
//! ```text
//! .. docs/source/autodoc/pkg/core.py.rst
//!
//! .. THIS FILE IS AUTOMATICALLY GENERATED. DO NOT EDIT.
//!
//! pkg.core
//! ~~~~~~~~
//!
//! .. automodule:: pkg.core
//!     :members:
//! ```
//!
//! Everything else is included verbatim:
//!
//! ```text
//! src/native/thing.cpp
//! ~~~~~~~~~~~~~~~~~~~~
//!
//! .. literalinclude:: ../../../../src/native/thing.cpp
//!     :language: C++
//! ```

use crate::language::{self, LanguageOverrides};
use crate::method::AutodocMethod;
use crate::paths;
use crate::rst::{self, SPACER};
use crate::write::{self, WriteError, WriteMode};
use std::path::{Path, PathBuf};
use thiserror::Error;

const EXT_PYTHON: &str = ".py";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Not a file: {0}")]
    NotAFile(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("{what} {path} is not within project directory {root}")]
    OutsideRoot {
        what: &'static str,
        path: PathBuf,
        root: PathBuf,
    },
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Per-document settings that do not identify the file itself.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// How to render the page.
    pub method: AutodocMethod,
    /// Root for dotted module names; defaults to the project root.
    pub python_package_root_dir: Option<PathBuf>,
    /// Title automodule pages `x.y.z` rather than `x/y/z.py`.
    pub title_style_python: bool,
    /// Extension → language overrides for `literalinclude`.
    pub language_overrides: LanguageOverrides,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            method: AutodocMethod::Best,
            python_package_root_dir: None,
            title_style_python: true,
            language_overrides: LanguageOverrides::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    source_filename: PathBuf,
    project_root_dir: PathBuf,
    target_rst_filename: PathBuf,
    python_package_root_dir: PathBuf,
    method: AutodocMethod,
    title_style_python: bool,
    language_overrides: LanguageOverrides,
}

impl SourceDocument {
    /// Describe `source_filename`, to be documented at `target_rst_filename`.
    ///
    /// All paths are `~`-expanded and made absolute. Fails if the source is
    /// not an existing file, the project root is not a directory, or the
    /// source or package root lies outside the project root.
    pub fn new(
        source_filename: impl AsRef<Path>,
        project_root_dir: impl AsRef<Path>,
        target_rst_filename: impl AsRef<Path>,
        options: DocumentOptions,
    ) -> Result<Self, DocumentError> {
        let source_filename = paths::resolve_user_path(source_filename.as_ref());
        let project_root_dir = paths::resolve_user_path(project_root_dir.as_ref());
        let target_rst_filename = paths::resolve_user_path(target_rst_filename.as_ref());
        let python_package_root_dir = match &options.python_package_root_dir {
            Some(dir) => paths::resolve_user_path(dir),
            None => project_root_dir.clone(),
        };

        if !source_filename.is_file() {
            return Err(DocumentError::NotAFile(source_filename));
        }
        if !project_root_dir.is_dir() {
            return Err(DocumentError::NotADirectory(project_root_dir));
        }
        if paths::within(&source_filename, &project_root_dir).is_none() {
            return Err(DocumentError::OutsideRoot {
                what: "Source file",
                path: source_filename,
                root: project_root_dir,
            });
        }
        if paths::within(&python_package_root_dir, &project_root_dir).is_none() {
            return Err(DocumentError::OutsideRoot {
                what: "Python root",
                path: python_package_root_dir,
                root: project_root_dir,
            });
        }

        Ok(Self {
            source_filename,
            project_root_dir,
            target_rst_filename,
            python_package_root_dir,
            method: options.method,
            title_style_python: options.title_style_python,
            language_overrides: options.language_overrides,
        })
    }

    pub fn source_filename(&self) -> &Path {
        &self.source_filename
    }

    pub fn target_rst_filename(&self) -> &Path {
        &self.target_rst_filename
    }

    pub fn project_root_dir(&self) -> &Path {
        &self.project_root_dir
    }

    pub fn method(&self) -> AutodocMethod {
        self.method
    }

    /// Extension including the dot (`".py"`), or empty.
    pub fn source_extension(&self) -> String {
        self.source_filename
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    pub fn is_python(&self) -> bool {
        self.source_extension() == EXT_PYTHON
    }

    /// Source path relative to the project root; used for titles.
    pub fn source_rel_project_root(&self) -> PathBuf {
        paths::relative_to(&self.source_filename, &self.project_root_dir)
    }

    /// Source path relative to the Python package root; used for module names.
    pub fn source_rel_python_root(&self) -> PathBuf {
        paths::relative_to(&self.source_filename, &self.python_package_root_dir)
    }

    /// Directory the page will be written into.
    pub fn rst_dir(&self) -> &Path {
        self.target_rst_filename
            .parent()
            .unwrap_or(&self.target_rst_filename)
    }

    /// Source path as seen from the page, for `literalinclude`.
    pub fn source_rel_rst_file(&self) -> PathBuf {
        paths::relative_to(&self.source_filename, self.rst_dir())
    }

    /// Page path relative to the project root; used to label the page.
    pub fn rst_rel_project_root(&self) -> PathBuf {
        paths::relative_to(&self.target_rst_filename, &self.project_root_dir)
    }

    /// Page path relative to the directory of `index_filename`.
    pub fn rst_rel_index(&self, index_filename: &Path) -> PathBuf {
        let index = paths::resolve_user_path(index_filename);
        let index_dir = index.parent().unwrap_or(&index);
        paths::relative_to(&self.target_rst_filename, index_dir)
    }

    /// Dotted module name (`pkg.sub.mod`), or empty for non-Python files.
    pub fn python_module_name(&self) -> String {
        if !self.is_python() {
            return String::new();
        }
        paths::dotted_module_name(&self.source_rel_python_root())
    }

    /// Syntax-highlighting language, or [`language::CODE_TYPE_NONE`].
    pub fn language(&self) -> String {
        language::language_for(&self.source_filename, &self.language_overrides)
    }

    /// The concrete method used when rendering with an optional override.
    pub fn effective_method(&self, method: Option<AutodocMethod>) -> AutodocMethod {
        method.unwrap_or(self.method).resolve(self.is_python())
    }

    /// Full text of the page.
    pub fn rst_content(
        &self,
        prefix: &str,
        suffix: &str,
        heading_underline_char: char,
        method: Option<AutodocMethod>,
    ) -> String {
        let (title, instruction) = match self.effective_method(method) {
            AutodocMethod::Automodule => {
                let module = self.python_module_name();
                let title = if self.title_style_python {
                    module.clone()
                } else {
                    paths::to_posix(&self.source_rel_project_root())
                };
                (
                    title,
                    format!(".. automodule:: {module}\n{SPACER}:members:"),
                )
            }
            AutodocMethod::Contents | AutodocMethod::Best => (
                paths::to_posix(&self.source_rel_project_root()),
                format!(
                    ".. literalinclude:: {}\n{SPACER}:language: {}",
                    paths::to_posix(&self.source_rel_rst_file()),
                    self.language()
                ),
            ),
        };

        rst::render_template(
            &paths::to_posix(&self.rst_rel_project_root()),
            prefix,
            &rst::rst_underline(&title, heading_underline_char),
            &instruction,
            suffix,
        )
    }

    /// Render the page and write it to [`Self::target_rst_filename`].
    pub fn write_rst(
        &self,
        prefix: &str,
        suffix: &str,
        heading_underline_char: char,
        method: Option<AutodocMethod>,
        mode: WriteMode,
    ) -> Result<(), DocumentError> {
        let content = self.rst_content(prefix, suffix, heading_underline_char, method);
        write::write_if_allowed(&self.target_rst_filename, &content, mode)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::CODE_TYPE_NONE;
    use crate::rst::AUTOGENERATED_COMMENT;
    use crate::test_helpers::*;
    use std::fs;

    fn doc(root: &Path, source: &str, rst: &str) -> SourceDocument {
        SourceDocument::new(
            root.join(source),
            root,
            root.join(rst),
            DocumentOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn construct_rejects_missing_source() {
        let project = setup_project();
        let result = SourceDocument::new(
            project.path().join("src/missing.py"),
            project.path(),
            project.path().join("docs/missing.py.rst"),
            DocumentOptions::default(),
        );
        assert!(matches!(result, Err(DocumentError::NotAFile(_))));
    }

    #[test]
    fn construct_rejects_source_outside_project() {
        let project = setup_project();
        let outside = tempfile::NamedTempFile::new().unwrap();
        let result = SourceDocument::new(
            outside.path(),
            project.path().join("src"),
            project.path().join("docs/x.rst"),
            DocumentOptions::default(),
        );
        assert!(matches!(
            result,
            Err(DocumentError::OutsideRoot { what: "Source file", .. })
        ));
    }

    #[test]
    fn construct_rejects_package_root_outside_project() {
        let project = setup_project();
        let options = DocumentOptions {
            python_package_root_dir: Some(project.path().join("..")),
            ..DocumentOptions::default()
        };
        let result = SourceDocument::new(
            project.path().join("src/pkg/core.py"),
            project.path(),
            project.path().join("docs/core.py.rst"),
            options,
        );
        assert!(matches!(
            result,
            Err(DocumentError::OutsideRoot { what: "Python root", .. })
        ));
    }

    #[test]
    fn construct_rejects_project_root_that_is_a_file() {
        let project = setup_project();
        let source = project.path().join("src/pkg/core.py");
        let result = SourceDocument::new(
            &source,
            &source,
            project.path().join("docs/core.py.rst"),
            DocumentOptions::default(),
        );
        assert!(matches!(result, Err(DocumentError::NotADirectory(_))));
    }

    #[test]
    fn relative_paths() {
        let project = setup_project();
        let d = doc(
            project.path(),
            "src/pkg/core.py",
            "docs/source/autodoc/pkg/core.py.rst",
        );

        assert_eq!(d.source_rel_project_root(), PathBuf::from("src/pkg/core.py"));
        assert_eq!(
            d.source_rel_rst_file(),
            PathBuf::from("../../../../src/pkg/core.py")
        );
        assert_eq!(
            d.rst_rel_project_root(),
            PathBuf::from("docs/source/autodoc/pkg/core.py.rst")
        );
        assert_eq!(
            d.rst_rel_index(&project.path().join("docs/source/autodoc/_index.rst")),
            PathBuf::from("pkg/core.py.rst")
        );
    }

    #[test]
    fn relative_to_root_reconstructs_source() {
        let project = setup_project();
        let d = doc(project.path(), "src/pkg/util/helpers.py", "docs/h.rst");
        let rebuilt = paths::normalize(&d.project_root_dir().join(d.source_rel_project_root()));
        assert_eq!(rebuilt, d.source_filename());
    }

    #[test]
    fn module_name_uses_package_root() {
        let project = setup_project();
        let options = DocumentOptions {
            python_package_root_dir: Some(project.path().join("src")),
            ..DocumentOptions::default()
        };
        let d = SourceDocument::new(
            project.path().join("src/pkg/util/helpers.py"),
            project.path(),
            project.path().join("docs/helpers.py.rst"),
            options,
        )
        .unwrap();

        assert_eq!(d.python_module_name(), "pkg.util.helpers");
        assert_eq!(
            d.source_rel_python_root(),
            PathBuf::from("pkg/util/helpers.py")
        );
    }

    #[test]
    fn module_name_empty_for_non_python() {
        let project = setup_project();
        let d = doc(project.path(), "src/native/thing.h", "docs/thing.h.rst");
        assert!(!d.is_python());
        assert_eq!(d.source_extension(), ".h");
        assert_eq!(d.python_module_name(), "");
    }

    #[test]
    fn python_page_uses_automodule() {
        let project = setup_project();
        let options = DocumentOptions {
            python_package_root_dir: Some(project.path().join("src")),
            ..DocumentOptions::default()
        };
        let d = SourceDocument::new(
            project.path().join("src/pkg/core.py"),
            project.path(),
            project.path().join("docs/autodoc/pkg/core.py.rst"),
            options,
        )
        .unwrap();

        let text = d.rst_content("", "", '~', None);

        assert_eq!(
            text,
            format!(
                ".. docs/autodoc/pkg/core.py.rst\n\n{AUTOGENERATED_COMMENT}\n\n\n\n\
                 pkg.core\n~~~~~~~~\n\n.. automodule:: pkg.core\n    :members:\n"
            )
        );
    }

    #[test]
    fn path_title_style_for_python() {
        let project = setup_project();
        let options = DocumentOptions {
            title_style_python: false,
            ..DocumentOptions::default()
        };
        let d = SourceDocument::new(
            project.path().join("src/pkg/core.py"),
            project.path(),
            project.path().join("docs/core.py.rst"),
            options,
        )
        .unwrap();

        let text = d.rst_content("", "", '=', None);

        assert!(text.contains("src/pkg/core.py\n===============\n"));
        assert!(text.contains(".. automodule:: src.pkg.core\n"));
    }

    #[test]
    fn non_python_page_uses_literalinclude() {
        let project = setup_project();
        let d = doc(
            project.path(),
            "src/native/thing.cpp",
            "docs/autodoc/native/thing.cpp.rst",
        );

        let text = d.rst_content(".. prefix", ".. suffix", '~', None);

        assert!(text.contains(
            "src/native/thing.cpp\n~~~~~~~~~~~~~~~~~~~~\n\n\
             .. literalinclude:: ../../../src/native/thing.cpp\n    :language: C++\n\n.. suffix\n"
        ));
        assert!(text.contains(".. prefix\n"));
    }

    #[test]
    fn contents_override_on_python_file() {
        let project = setup_project();
        let d = doc(project.path(), "src/pkg/core.py", "docs/core.py.rst");

        let text = d.rst_content("", "", '~', Some(AutodocMethod::Contents));

        assert!(text.contains(".. literalinclude:: ../src/pkg/core.py\n    :language: Python"));
        assert!(!text.contains("automodule"));
    }

    #[test]
    fn unknown_extension_renders_none_language() {
        let project = setup_project();
        let d = doc(project.path(), "src/data/run.weird", "docs/run.weird.rst");

        assert_eq!(d.language(), CODE_TYPE_NONE);
        assert!(d.rst_content("", "", '~', None).contains(":language: none"));
    }

    #[test]
    fn language_override_applies() {
        let project = setup_project();
        let mut overrides = LanguageOverrides::new();
        overrides.insert(".pro".to_string(), "none".to_string());
        let options = DocumentOptions {
            language_overrides: overrides,
            ..DocumentOptions::default()
        };
        let d = SourceDocument::new(
            project.path().join("src/data/app.pro"),
            project.path(),
            project.path().join("docs/app.pro.rst"),
            options,
        )
        .unwrap();

        assert_eq!(d.language(), "none");
    }

    #[test]
    fn rendered_page_has_one_marker_and_one_trailing_newline() {
        let project = setup_project();
        let d = doc(project.path(), "src/data/schema.xml", "docs/schema.xml.rst");

        let text = d.rst_content("", "\n\n", '~', None);

        assert_eq!(text.matches(AUTOGENERATED_COMMENT).count(), 1);
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn write_rst_creates_page() {
        let project = setup_project();
        let d = doc(project.path(), "src/pkg/core.py", "docs/out/pkg/core.py.rst");

        d.write_rst("", "", '~', None, WriteMode::default()).unwrap();

        let written = fs::read_to_string(d.target_rst_filename()).unwrap();
        assert_eq!(written, d.rst_content("", "", '~', None));
    }

    #[test]
    fn write_rst_refuses_to_overwrite() {
        let project = setup_project();
        let d = doc(project.path(), "src/pkg/core.py", "docs/core.py.rst");
        fs::write(d.target_rst_filename(), "keep me").unwrap();

        let result = d.write_rst("", "", '~', None, WriteMode::default());

        assert!(matches!(
            result,
            Err(DocumentError::Write(WriteError::AlreadyExists(_)))
        ));
        assert_eq!(fs::read_to_string(d.target_rst_filename()).unwrap(), "keep me");
    }
}
