use serde::{Deserialize, Serialize};

/// Normalized per-field metadata: names, default, usage and prompt behavior.
///
/// Names are stored as spelled on the command line (`-p`, `--port`). Tags
/// are usually produced by an external tag parser, but can be built
/// directly:
///
/// ```
/// use flagbind::Tag;
///
/// let tag = Tag::new()
///     .short("-p")
///     .long("--port")
///     .placeholder("PORT")
///     .default_value("$PORT+1")
///     .usage("listen port");
/// assert_eq!(tag.names().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub short_names: Vec<String>,
    pub long_names: Vec<String>,
    /// Value placeholder shown in usage text, e.g. `PORT` in `--port=PORT`.
    pub placeholder: String,
    /// Default-value expression; empty means no default.
    pub default_value: String,
    pub usage: String,
    pub required: bool,
    pub password: bool,
    /// Prompt text; empty means the field is never prompted for.
    pub prompt: String,
}

impl Tag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn short(mut self, name: &str) -> Self {
        self.short_names.push(name.to_string());
        self
    }

    pub fn long(mut self, name: &str) -> Self {
        self.long_names.push(name.to_string());
        self
    }

    pub fn placeholder(mut self, name: &str) -> Self {
        self.placeholder = name.to_string();
        self
    }

    pub fn default_value(mut self, expr: &str) -> Self {
        self.default_value = expr.to_string();
        self
    }

    pub fn usage(mut self, text: &str) -> Self {
        self.usage = text.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn password(mut self) -> Self {
        self.password = true;
        self
    }

    pub fn prompt(mut self, text: &str) -> Self {
        self.prompt = text.to_string();
        self
    }

    /// Short names first, then long names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.short_names
            .iter()
            .chain(&self.long_names)
            .map(String::as_str)
    }

    /// Preferred display name: first long name, else first short name.
    pub fn primary_name(&self) -> &str {
        self.long_names
            .first()
            .or(self.short_names.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}
