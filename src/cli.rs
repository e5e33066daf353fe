//! Clap adapter for flagbind.
//!
//! This module is the optional bridge between a [`FieldSet`] and the
//! [clap](https://docs.rs/clap) parser. It is compiled only when the `clap`
//! Cargo feature is enabled (on by default).
//!
//! [`to_args`] turns every flag spelling of every bound field into a clap
//! [`Arg`] that collects raw strings, and [`apply_matches`] feeds the parsed
//! occurrences back into the field set under the spelling that was typed.
//! Coercion, defaults and prompting stay in flagbind: clap only tokenizes
//! the command line.
//!
//! [`UsageArgs`] is a derive-ready group for controlling usage rendering from
//! the command line.

use std::collections::HashSet;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Args};

use crate::error::BindError;
use crate::field_set::FieldSet;
use crate::settings::Settings;
use crate::usage::UsageStyle;

/// How one flag spelling is presented to clap.
enum Switch {
    Short(char),
    Long(String),
}

impl Switch {
    /// Single-character names not spelled with `--` are shorts; everything
    /// else is a long. A spelling that is only dashes has no switch.
    fn parse(name: &str) -> Option<Switch> {
        let bare = name.trim_start_matches('-');
        let mut chars = bare.chars();
        match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) if !name.starts_with("--") => Some(Switch::Short(c)),
            _ => Some(Switch::Long(bare.to_string())),
        }
    }

    fn key(&self) -> String {
        match self {
            Switch::Short(c) => format!("-{c}"),
            Switch::Long(long) => format!("--{long}"),
        }
    }
}

/// Build clap arguments for every bound field, in declaration order.
///
/// Each spelling gets its own argument, keyed by the spelling itself, so
/// [`apply_matches`] can report which one was used. The field's primary
/// name carries the help text and value name; the other spellings are
/// hidden from clap's help. Boolean fields accept an optional `=value` and
/// read as `true` when given bare. Fields without names get no argument.
///
/// Two spellings that clap would read as the same switch (`-name` and
/// `--name`) are rejected with [`BindError::DuplicateName`].
pub fn to_args(set: &FieldSet<'_>) -> Result<Vec<Arg>, BindError> {
    let mut switches = HashSet::new();
    let mut args = Vec::new();
    for binder in set.binders() {
        let tag = binder.tag();
        let primary = tag.primary_name();
        for name in tag.names() {
            let Some(switch) = Switch::parse(name) else {
                continue;
            };
            if !switches.insert(switch.key()) {
                return Err(BindError::DuplicateName {
                    name: name.to_string(),
                });
            }

            let mut arg = Arg::new(name.to_string())
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(String));
            arg = match switch {
                Switch::Short(c) => arg.short(c),
                Switch::Long(long) => arg.long(long),
            };
            if name == primary {
                if !tag.usage.is_empty() {
                    arg = arg.help(tag.usage.clone());
                }
                if !tag.placeholder.is_empty() {
                    arg = arg.value_name(tag.placeholder.clone());
                }
            } else {
                arg = arg.hide(true);
            }
            if binder.is_boolean() {
                arg = arg
                    .num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true");
            }
            args.push(arg);
        }
    }
    Ok(args)
}

/// Apply every value clap parsed from the command line, field by field in
/// declaration order.
///
/// Occurrences of one field are applied in command-line order whichever
/// spelling they used, and each is applied under that spelling.
pub fn apply_matches(set: &mut FieldSet<'_>, matches: &ArgMatches) -> Result<(), BindError> {
    let fields: Vec<Vec<String>> = set
        .tags()
        .map(|tag| tag.names().map(str::to_string).collect())
        .collect();

    for names in fields {
        let mut occurrences: Vec<(usize, &str, &String)> = Vec::new();
        for name in &names {
            if matches.value_source(name) != Some(ValueSource::CommandLine) {
                continue;
            }
            let Some(values) = matches.try_get_many::<String>(name).ok().flatten() else {
                continue;
            };
            let mut indices = matches.indices_of(name).into_iter().flatten();
            let mut last = 0;
            for raw in values {
                last = indices.next().unwrap_or(last);
                occurrences.push((last, name.as_str(), raw));
            }
        }
        occurrences.sort_by_key(|&(index, _, _)| index);
        for (_, name, raw) in occurrences {
            set.apply(name, raw)?;
        }
    }
    Ok(())
}

/// Usage rendering flags.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     usage: UsageArgs,
/// }
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct UsageArgs {
    /// Usage layout: side-by-side or stacked.
    #[arg(long, global = true)]
    pub usage_style: Option<UsageStyle>,

    /// Disable ANSI styling in usage text.
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl UsageArgs {
    /// Layer these flags over loaded settings.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(style) = self.usage_style {
            settings.usage_style = style;
        }
        if self.no_color {
            settings.color = false;
        }
        settings
    }
}
