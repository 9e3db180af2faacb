//! Template parameter extraction.
//!
//! The compiler never renders templates; it only needs to know which
//! parameter names a template's text references. That capability is a seam:
//! resolution takes any [`TemplateScanner`], and tests substitute fixtures.
//!
//! [`MustacheScanner`] is the stock implementation for mustache-style
//! templates, where interpolation tags (`{{name}}`) reference parameters and
//! section, comment, and partial tags do not.

use std::collections::BTreeSet;

/// Extracts the set of parameter names referenced by a template string.
pub trait TemplateScanner {
    fn parameters_in(&self, template: &str) -> BTreeSet<String>;
}

/// Scanner for mustache-style `{{...}}` templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustacheScanner;

impl TemplateScanner for MustacheScanner {
    fn parameters_in(&self, template: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                break;
            };
            let mut tag = after[..close].trim();
            rest = &after[close + 2..];

            // Sections, inverted sections, closers, comments, partials, and
            // delimiter changes do not reference parameters.
            if let Some(first) = tag.chars().next() {
                if matches!(first, '#' | '^' | '/' | '!' | '>' | '=') {
                    continue;
                }
            }

            // Unescaped interpolation: {{{name}}} or {{& name}}.
            if let Some(inner) = tag.strip_prefix('{') {
                tag = inner.strip_suffix('}').unwrap_or(inner).trim();
                // The outer scan consumed only two braces of a triple close.
                if let Some(stripped) = rest.strip_prefix('}') {
                    rest = stripped;
                }
            } else if let Some(inner) = tag.strip_prefix('&') {
                tag = inner.trim();
            }

            if !tag.is_empty() {
                names.insert(tag.to_string());
            }
        }

        names
    }
}
