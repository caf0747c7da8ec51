//! CLI output formatting for the `plan` and `build` commands.
//!
//! # Output Format
//!
//! ## Plan
//!
//! Every index is a header line, its children indented one level below it
//! with a 1-based position. Pages show their source, the page they produce,
//! and how the page documents the source.
//!
//! ```text
//! Automatic documentation of source code → docs/autodoc/_index.rst
//!     001 src/pkg/core.py → docs/autodoc/pkg/core.py.rst (automodule pkg.core)
//!     002 Native code → docs/autodoc/_native.rst
//!         001 src/native/thing.h → docs/autodoc/native/thing.h.rst (contents, C)
//!
//! Planned 2 pages in 2 indexes
//! ```
//!
//! ## Build
//!
//! ```text
//! Wrote docs/autodoc/pkg/core.py.rst
//! Wrote docs/autodoc/_index.rst
//!
//! Wrote 2 files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::method::AutodocMethod;
use crate::paths;
use crate::types::{DocumentPlan, IndexPlan, PlanEntry};
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn count(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Trailing detail for a page line.
///
/// ```text
/// (automodule pkg.core)
/// (contents, C)
/// ```
fn document_detail(doc: &DocumentPlan) -> String {
    match (doc.method, &doc.module, &doc.language) {
        (AutodocMethod::Automodule, Some(module), _) => format!("(automodule {module})"),
        (_, _, Some(language)) => format!("(contents, {language})"),
        (method, _, None) => format!("({method})"),
    }
}

fn push_index(lines: &mut Vec<String>, plan: &IndexPlan, depth: usize) {
    for (i, child) in plan.children.iter().enumerate() {
        let pos = format_index(i + 1);
        match child {
            PlanEntry::Document(doc) => lines.push(format!(
                "{}{} {} → {} {}",
                indent(depth),
                pos,
                doc.source,
                doc.rst_filename,
                document_detail(doc)
            )),
            PlanEntry::Index(sub) => {
                lines.push(format!(
                    "{}{} {} → {}",
                    indent(depth),
                    pos,
                    sub.title,
                    sub.index_filename
                ));
                push_index(lines, sub, depth + 1);
            }
        }
    }
}

pub fn format_plan(plan: &IndexPlan) -> Vec<String> {
    let mut lines = vec![format!("{} → {}", plan.title, plan.index_filename)];
    push_index(&mut lines, plan, 1);
    lines.push(String::new());
    lines.push(format!(
        "Planned {} in {}",
        count(plan.document_count(), "page", "pages"),
        count(plan.index_count(), "index", "indexes")
    ));
    lines
}

pub fn print_plan(plan: &IndexPlan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

/// One line per handled file, relative to `project_root`, then a total.
pub fn format_write_report(written: &[PathBuf], project_root: &Path, dry_run: bool) -> Vec<String> {
    let verb = if dry_run { "Would write" } else { "Wrote" };
    let mut lines: Vec<String> = written
        .iter()
        .map(|path| {
            let shown = match paths::within(path, project_root) {
                Some(rel) => paths::to_posix(&rel),
                None => path.display().to_string(),
            };
            format!("{verb} {shown}")
        })
        .collect();
    lines.push(String::new());
    lines.push(format!("{verb} {}", count(written.len(), "file", "files")));
    lines
}

pub fn print_write_report(written: &[PathBuf], project_root: &Path, dry_run: bool) {
    for line in format_write_report(written, project_root, dry_run) {
        println!("{}", line);
    }
}
