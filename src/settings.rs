//! Process-level rendering settings.
//!
//! Settings come from three layers, lowest priority first: compiled
//! defaults, an optional TOML file, then `FLAGBIND_*` environment variables.
//! [`resolve`] works on pre-loaded data so every layer can be tested with
//! synthetic input; [`Settings::load`] does the I/O.
//!
//! ```toml
//! usage_style = "stacked"
//! color = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use confique::Config;
use toml::{Table, Value};
use tracing::debug;

use crate::error::SettingsError;
use crate::style::{ConsoleStyler, PlainStyler, Styler};
use crate::usage::UsageStyle;

/// Environment variable prefix, e.g. `FLAGBIND_USAGE_STYLE`.
pub const ENV_PREFIX: &str = "FLAGBIND";

#[derive(Config, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Layout of rendered usage text: `side-by-side` or `stacked`.
    #[config(default = "side-by-side")]
    pub usage_style: UsageStyle,

    /// Style usage text when the terminal supports it.
    #[config(default = true)]
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            usage_style: UsageStyle::default(),
            color: true,
        }
    }
}

impl Settings {
    /// Load settings from `file` (if given) and the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match file {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| SettingsError::IoError {
                    path: path.to_path_buf(),
                    source,
                })?;
                Some((path.to_path_buf(), content))
            }
            None => None,
        };
        resolve(SettingsInput {
            file,
            env_vars: std::env::vars().collect(),
        })
    }

    /// The styler matching the `color` setting.
    pub fn styler(&self) -> Box<dyn Styler> {
        if self.color {
            ConsoleStyler::detect()
        } else {
            Box::new(PlainStyler)
        }
    }
}

/// Pre-loaded settings sources. No I/O happens during [`resolve`].
#[derive(Debug, Default)]
pub struct SettingsInput {
    /// Path and contents of the settings file.
    pub file: Option<(PathBuf, String)>,
    /// Raw environment variable pairs.
    pub env_vars: Vec<(String, String)>,
}

/// Merge file and environment layers and let confique fill defaults.
pub fn resolve(input: SettingsInput) -> Result<Settings, SettingsError> {
    let mut merged = Table::new();

    if let Some((path, content)) = &input.file {
        validate_unknown_keys(content, path)?;
        let table: Table = toml::from_str(content).map_err(|source| SettingsError::ParseError {
            path: path.clone(),
            source,
        })?;
        merged.extend(table);
    }

    let env = env_to_table(ENV_PREFIX, input.env_vars);
    if !env.is_empty() {
        debug!(keys = ?env.keys().collect::<Vec<_>>(), "settings from environment");
    }
    merged.extend(env);

    let layer: <Settings as Config>::Layer = Value::Table(merged.clone())
        .try_into()
        .map_err(|e: toml::de::Error| invalid_value(&merged, e))?;

    Ok(Settings::builder().preloaded(layer).load()?)
}

/// Name the first key whose value alone fails to deserialize.
fn invalid_value(merged: &Table, err: toml::de::Error) -> SettingsError {
    for (key, value) in merged {
        let mut single = Table::new();
        single.insert(key.clone(), value.clone());
        let attempt: Result<<Settings as Config>::Layer, _> = Value::Table(single).try_into();
        if let Err(e) = attempt {
            return SettingsError::InvalidValue {
                key: key.clone(),
                reason: e.message().to_string(),
            };
        }
    }
    SettingsError::InvalidValue {
        key: String::new(),
        reason: err.message().to_string(),
    }
}

/// Reject keys the settings struct does not know.
fn validate_unknown_keys(content: &str, path: &Path) -> Result<(), SettingsError> {
    let mut unknown: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _layer: <Settings as Config>::Layer =
        serde_ignored::deserialize(deserializer, |ignored| unknown.push(ignored.to_string()))
            .map_err(|source| SettingsError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

    match unknown.into_iter().next() {
        None => Ok(()),
        Some(key) => {
            let line = find_key_line(content, &key);
            Err(SettingsError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            })
        }
    }
}

/// 1-indexed line of a top-level `key = ...` assignment, or 0.
fn find_key_line(content: &str, key: &str) -> usize {
    for (i, line) in content.lines().enumerate() {
        if let Some(rest) = line.trim().strip_prefix(key)
            && rest.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}

/// Build a table from `{PREFIX}_*` variables, lowercasing the remainder into
/// a field name.
fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}_");
    let mut table = Table::new();
    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        table.insert(rest.to_lowercase(), parse_env_value(&value));
    }
    table
}

/// Booleans become TOML booleans; everything else stays a string.
fn parse_env_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    Value::String(s.to_string())
}
