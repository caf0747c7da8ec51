//! Serializable snapshot of an index tree.
//!
//! Produced by [`crate::index::AutodocIndex::plan`] and consumed by the
//! `plan` command (tree display or JSON) without touching the filesystem.
//! All paths are relative to the project root with `/` separators.

use crate::method::AutodocMethod;
use serde::Serialize;

/// One index page and everything it lists, in toctree order.
#[derive(Debug, Clone, Serialize)]
pub struct IndexPlan {
    pub index_filename: String,
    pub title: String,
    pub toctree_maxdepth: u32,
    pub children: Vec<PlanEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanEntry {
    Document(DocumentPlan),
    Index(IndexPlan),
}

/// One generated page.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPlan {
    pub source: String,
    pub rst_filename: String,
    /// Resolved method: `automodule` or `contents`.
    pub method: AutodocMethod,
    /// Dotted module name, for automodule pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Highlighting language, for contents pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl IndexPlan {
    /// Number of pages in this index and all nested indexes.
    pub fn document_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                PlanEntry::Document(_) => 1,
                PlanEntry::Index(i) => i.document_count(),
            })
            .sum()
    }

    /// Number of index pages, including this one.
    pub fn index_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| match c {
                PlanEntry::Document(_) => 0,
                PlanEntry::Index(i) => i.index_count(),
            })
            .sum::<usize>()
    }
}
