//! The reStructuredText template shared by pages and indexes.
//!
//! ```text
//! .. <label>
//!
//! .. THIS FILE IS AUTOMATICALLY GENERATED. DO NOT EDIT.
//!
//! <prefix>
//!
//! <title>
//! <underline>
//!
//! <instruction>
//!
//! <suffix>
//! ```
//!
//! The assembled text is trimmed and gets exactly one trailing newline. Empty
//! prefix or suffix leave their blank lines in place; only the ends are
//! trimmed.

/// Marker placed near the top of every generated file.
pub const AUTOGENERATED_COMMENT: &str = ".. THIS FILE IS AUTOMATICALLY GENERATED. DO NOT EDIT.";

/// Indentation for directive options and toctree entries.
pub const SPACER: &str = "    ";

/// Underline a single-line heading: `"Title"` → `"Title\n====="`.
///
/// The underline matches the heading's length in characters, not bytes.
pub fn rst_underline(heading: &str, underline_char: char) -> String {
    let width = heading.chars().count();
    let mut out = String::with_capacity(heading.len() + 1 + width);
    out.push_str(heading);
    out.push('\n');
    out.extend(std::iter::repeat_n(underline_char, width));
    out
}

/// Fill the page template.
pub fn render_template(
    label: &str,
    prefix: &str,
    underlined_title: &str,
    instruction: &str,
    suffix: &str,
) -> String {
    let content = format!(
        ".. {label}\n\n{AUTOGENERATED_COMMENT}\n\n{prefix}\n\n{underlined_title}\n\n{instruction}\n\n{suffix}"
    );
    let mut out = content.trim().to_string();
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underline_matches_length() {
        assert_eq!(rst_underline("Hello", '='), "Hello\n=====");
    }

    #[test]
    fn underline_counts_characters_not_bytes() {
        assert_eq!(rst_underline("Café", '-'), "Café\n----");
    }

    #[test]
    fn template_ends_with_single_newline() {
        let text = render_template("a.rst", "", "T\n-", "body", "\n\n\n");
        assert!(text.ends_with("body\n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn template_keeps_blank_lines_for_empty_prefix() {
        let text = render_template("a.rst", "", "T\n-", "body", "");
        assert_eq!(
            text,
            format!(".. a.rst\n\n{AUTOGENERATED_COMMENT}\n\n\n\nT\n-\n\nbody\n")
        );
    }

    #[test]
    fn template_places_prefix_and_suffix() {
        let text = render_template("x.rst", ".. (c) me", "T\n~", "body", ".. end");
        assert_eq!(
            text,
            format!(".. x.rst\n\n{AUTOGENERATED_COMMENT}\n\n.. (c) me\n\nT\n~\n\nbody\n\n.. end\n")
        );
    }
}
