//! Syntax-highlighting language tags for `literalinclude` pages.
//!
//! Sphinx passes the `:language:` option through to Pygments, which accepts
//! lexer display names (`Python`, `C++`) as well as aliases. The built-in
//! table below uses the display names Pygments reports for each filename.
//!
//! Resolution order:
//!
//! 1. Caller overrides, keyed by extension (`".pro"` or `"pro"`)
//! 2. Whole-filename matches (`Makefile`, `CMakeLists.txt`)
//! 3. Extension matches (case-insensitive)
//! 4. [`CODE_TYPE_NONE`], with a warning

use std::collections::BTreeMap;
use std::path::Path;

/// Sentinel tag for files with no known highlighter.
pub const CODE_TYPE_NONE: &str = "none";

/// Extension → language overrides. Keys may include the leading dot.
pub type LanguageOverrides = BTreeMap<String, String>;

const FILENAME_LANGUAGES: &[(&str, &str)] = &[
    ("CMakeLists.txt", "CMake"),
    ("Dockerfile", "Docker"),
    ("GNUmakefile", "Makefile"),
    ("Makefile", "Makefile"),
    ("makefile", "Makefile"),
    ("meson.build", "Meson"),
    ("requirements.txt", "Text only"),
];

const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("bash", "Bash"),
    ("bat", "Batchfile"),
    ("c", "C"),
    ("cc", "C++"),
    ("cfg", "INI"),
    ("cmake", "CMake"),
    ("cmd", "Batchfile"),
    ("conf", "INI"),
    ("cpp", "C++"),
    ("cs", "C#"),
    ("css", "CSS"),
    ("cxx", "C++"),
    ("go", "Go"),
    ("h", "C"),
    ("hh", "C++"),
    ("hpp", "C++"),
    ("htm", "HTML"),
    ("html", "HTML"),
    ("hxx", "C++"),
    ("ini", "INI"),
    ("java", "Java"),
    ("js", "JavaScript"),
    ("json", "JSON"),
    ("kt", "Kotlin"),
    ("less", "LessCss"),
    ("lua", "Lua"),
    ("m", "Objective-C"),
    ("md", "Markdown"),
    ("mk", "Makefile"),
    ("php", "PHP"),
    ("pl", "Perl"),
    ("pm", "Perl"),
    ("pro", "Prolog"),
    ("ps1", "PowerShell"),
    ("py", "Python"),
    ("pyi", "Python"),
    ("pyx", "Cython"),
    ("qml", "QML"),
    ("r", "S"),
    ("rb", "Ruby"),
    ("rs", "Rust"),
    ("rst", "reStructuredText"),
    ("scss", "SCSS"),
    ("sh", "Bash"),
    ("sql", "SQL"),
    ("svg", "XML"),
    ("swift", "Swift"),
    ("tex", "TeX"),
    ("toml", "TOML"),
    ("ts", "TypeScript"),
    ("tsx", "TSX"),
    ("txt", "Text only"),
    ("xml", "XML"),
    ("xsd", "XML"),
    ("xsl", "XSLT"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
    ("zsh", "Bash"),
];

/// Look up the language tag for `path`, or `None` if nothing matches.
pub fn lookup(path: &Path, overrides: &LanguageOverrides) -> Option<String> {
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    if let Some(ext) = &extension {
        let found = overrides
            .iter()
            .find(|(key, _)| key.trim_start_matches('.') == ext.as_str());
        if let Some((_, language)) = found {
            return Some(language.clone());
        }
    }

    let filename = path.file_name()?.to_string_lossy();
    if let Some((_, language)) = FILENAME_LANGUAGES
        .iter()
        .find(|(name, _)| *name == filename)
    {
        return Some((*language).to_string());
    }

    let ext = extension?.to_ascii_lowercase();
    EXTENSION_LANGUAGES
        .binary_search_by(|(key, _)| (*key).cmp(ext.as_str()))
        .ok()
        .map(|i| EXTENSION_LANGUAGES[i].1.to_string())
}

/// Language tag for `path`, falling back to [`CODE_TYPE_NONE`] with a warning.
pub fn language_for(path: &Path, overrides: &LanguageOverrides) -> String {
    lookup(path, overrides).unwrap_or_else(|| {
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        tracing::warn!(
            "Don't know Pygments code type for extension {:?} ({})",
            extension,
            path.display()
        );
        CODE_TYPE_NONE.to_string()
    })
}
