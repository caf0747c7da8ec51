//! How a single source file is documented.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown autodoc method {0:?} (expected best, contents or automodule)")]
pub struct UnknownMethod(pub String);

/// Rendering method for a generated page.
///
/// - `Best`: `automodule` for Python files, `contents` for everything else
/// - `Contents`: include the file verbatim with syntax highlighting
/// - `Automodule`: let Sphinx autodoc read the module's docstrings; falls back
///   to `Contents` for non-Python files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AutodocMethod {
    #[default]
    Best,
    Contents,
    Automodule,
}

impl AutodocMethod {
    /// Resolve `Best` (and inapplicable `Automodule`) to a concrete method.
    ///
    /// The result is never `Best`.
    pub fn resolve(self, is_python: bool) -> AutodocMethod {
        match self {
            AutodocMethod::Best | AutodocMethod::Automodule if is_python => {
                AutodocMethod::Automodule
            }
            _ => AutodocMethod::Contents,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AutodocMethod::Best => "best",
            AutodocMethod::Contents => "contents",
            AutodocMethod::Automodule => "automodule",
        }
    }
}

impl fmt::Display for AutodocMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutodocMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(AutodocMethod::Best),
            "contents" => Ok(AutodocMethod::Contents),
            "automodule" => Ok(AutodocMethod::Automodule),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for AutodocMethod {
    type Error = UnknownMethod;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AutodocMethod> for String {
    fn from(method: AutodocMethod) -> Self {
        method.as_str().to_string()
    }
}
