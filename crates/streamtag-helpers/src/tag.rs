//! Minimal tag builder for helper output.

use std::fmt;

/// Escaped, ready-to-embed HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An element with `data-*` attributes and no content.
///
/// Attribute names are written snake_case and rendered dasherized, so
/// `stream_from_sgid_value` becomes `data-stream-from-sgid-value`.
#[derive(Debug, Clone)]
pub struct Tag {
    name: &'static str,
    data: Vec<(String, String)>,
}

impl Tag {
    pub fn div() -> Self {
        Self {
            name: "div",
            data: Vec::new(),
        }
    }

    pub fn data(mut self, name: &str, value: impl Into<String>) -> Self {
        self.data.push((name.replace('_', "-"), value.into()));
        self
    }

    pub fn render(&self) -> Markup {
        let attrs: String = self
            .data
            .iter()
            .map(|(name, value)| format!(r#" data-{}="{}""#, name, html_escape(value)))
            .collect();
        Markup(format!("<{name}{attrs}></{name}>", name = self.name))
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
