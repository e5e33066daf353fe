//! Usage text rendering.
//!
//! Rendering reads tag metadata only and never touches bound values. Column
//! widths are measured on unstyled text with `unicode-width`, so styled
//! output lines up exactly like plain output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::style::Styler;
use crate::tag::Tag;

const SEP: &str = ", ";

/// Usage layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UsageStyle {
    /// One line per field: short names, long names with placeholder and
    /// default, then the description in an aligned column.
    #[default]
    SideBySide,
    /// Names on one line, the description indented below, blank line
    /// between fields.
    Stacked,
}

impl UsageStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            UsageStyle::SideBySide => "side-by-side",
            UsageStyle::Stacked => "stacked",
        }
    }
}

impl fmt::Display for UsageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsageStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "side-by-side" | "normal" => Ok(UsageStyle::SideBySide),
            "stacked" | "manual" => Ok(UsageStyle::Stacked),
            other => Err(format!(
                "unknown usage style '{other}', expected 'side-by-side' or 'stacked'"
            )),
        }
    }
}

impl TryFrom<String> for UsageStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UsageStyle> for String {
    fn from(style: UsageStyle) -> Self {
        style.as_str().to_string()
    }
}

/// Render usage text for `tags` in declaration order.
pub fn render<'t>(
    tags: impl IntoIterator<Item = &'t Tag>,
    style: UsageStyle,
    styler: &dyn Styler,
) -> String {
    let tags: Vec<&Tag> = tags.into_iter().collect();
    match style {
        UsageStyle::SideBySide => side_by_side(&tags, styler),
        UsageStyle::Stacked => stacked(&tags, styler),
    }
}

fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn spaces(n: usize) -> String {
    " ".repeat(n)
}

fn pad_left(s: &str, to: usize) -> String {
    format!("{}{s}", spaces(to.saturating_sub(width(s))))
}

/// Widest short-name column and widest long-name-plus-annotations column.
fn column_widths(tags: &[&Tag]) -> (usize, usize) {
    let mut short = 0;
    let mut long = 0;
    for tag in tags {
        let names_width = |names: &[String]| -> usize {
            names.iter().map(|n| width(n) + SEP.len()).sum()
        };
        short = short.max(names_width(&tag.short_names));

        let mut l = names_width(&tag.long_names);
        if !tag.default_value.is_empty() {
            // "[=" + default + "]"
            l += width(&tag.default_value) + 3;
        }
        if !tag.placeholder.is_empty() {
            l += width(&tag.placeholder) + 1;
        }
        long = long.max(l);
    }
    (short, long)
}

fn side_by_side(tags: &[&Tag], styler: &dyn Styler) -> String {
    let (len_short, len_long) = column_widths(tags);
    let mut out = String::new();

    for tag in tags {
        let short_str = tag.short_names.join(SEP);
        let long_str = tag.long_names.join(SEP);

        let mut default_str = String::new();
        let mut name_str = String::new();
        let mut pad = SEP.len() + len_long;
        if !tag.default_value.is_empty() {
            let plain = format!("[={}]", tag.default_value);
            pad = pad.saturating_sub(width(&plain));
            default_str = styler.dim(&plain);
        }
        if !tag.placeholder.is_empty() {
            pad = pad.saturating_sub(width(&tag.placeholder) + 1);
            name_str = format!("={}", styler.bold(&tag.placeholder));
        }
        pad = pad.saturating_sub(width(&long_str));

        let marker = if tag.required {
            styler.red("*")
        } else {
            " ".to_string()
        };

        let lead = if long_str.is_empty() {
            format!("{}{}", pad_left(&short_str, len_short), spaces(SEP.len()))
        } else if short_str.is_empty() {
            spaces(len_short + SEP.len())
        } else {
            format!("{}{SEP}", pad_left(&short_str, len_short))
        };

        out.push_str(&lead);
        out.push_str(&long_str);
        out.push_str(&name_str);
        out.push_str(&default_str);
        out.push_str(&spaces(pad));
        out.push_str(&marker);
        out.push_str(&tag.usage);
        out.push('\n');
    }
    out
}

fn stacked(tags: &[&Tag], styler: &dyn Styler) -> String {
    let mut out = String::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let names: Vec<&str> = tag.names().collect();
        out.push_str("  ");
        out.push_str(&styler.bold(&names.join(SEP)));
        if !tag.placeholder.is_empty() {
            out.push('=');
            out.push_str(&styler.bold(&tag.placeholder));
        }
        if !tag.default_value.is_empty() {
            out.push_str(&styler.dim(&format!("[={}]", tag.default_value)));
        }
        out.push('\n');
        out.push_str("      ");
        if tag.required {
            out.push_str(&styler.red("*"));
        }
        out.push_str(&tag.usage);
        out.push('\n');
    }
    out
}
