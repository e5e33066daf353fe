//! Bind command-line flags to typed fields, with declarative defaults,
//! interactive prompts and aligned usage text.
//!
//! Each field is described by a [`Tag`]: its short and long names, a default
//! expression, usage text, and whether it is required, secret or prompted
//! for. A [`FieldSet`] binds tags to caller-owned fields, applies raw
//! command-line values to them, and coerces each value into the field's
//! declared type.
//!
//! ```
//! use flagbind::{Environment, FieldSet, PlainStyler, Tag, UsageStyle};
//!
//! let mut port: u16 = 0;
//! let mut includes: Vec<String> = Vec::new();
//! let mut set = FieldSet::new().env(Environment::fixed([("BASE_PORT", "8000")]));
//! set.bind(
//!     &Tag::new()
//!         .short("-p")
//!         .long("--port")
//!         .placeholder("PORT")
//!         .default_value("$BASE_PORT+80")
//!         .usage("listen port"),
//!     &mut port,
//! )?;
//! set.bind(&Tag::new().short("-I").usage("include path"), &mut includes)?;
//!
//! set.apply_all([("-I", "src"), ("-I", "vendor")])?;
//! print!("{}", set.usage(UsageStyle::SideBySide, &PlainStyler));
//! set.finish()?;
//!
//! assert_eq!(port, 8080);
//! assert_eq!(includes, ["src", "vendor"]);
//! # Ok::<(), flagbind::BindError>(())
//! ```
//!
//! # Field kinds
//!
//! Fields implement [`FieldValue`]. Built-in implementations cover `bool`,
//! every integer and float width, `String`, `Vec<T>`, `HashMap<K, V>`,
//! `BTreeMap<K, V>` and `Option<T>`:
//!
//! | Kind | Accepted input |
//! |------|----------------|
//! | bool | `""`, `true`, `yes`, `y`, `false`, `none`, `no`, `not`, `n`, or an integer (nonzero is true) |
//! | integers | decimal, range-checked against the declared width |
//! | floats | decimal, range-checked against the declared width |
//! | string | verbatim |
//! | sequence | one element appended per occurrence |
//! | map | one `key=value` entry per occurrence, split on the first `=` |
//!
//! Out-of-range numbers fail with an overflow error, never a type mismatch.
//! Sequences and maps cannot nest inside each other.
//!
//! Any other type can either implement [`Decode`] and use [`decode_field!`],
//! or be bound with a [`FieldParser`] through
//! [`FieldSet::bind_with_parser`]. [`JsonParser`] and [`JsonFileParser`]
//! decode JSON from the raw value or from the file it names.
//!
//! # Repeated flags
//!
//! Sequence and map fields accumulate: each occurrence is coerced as soon as
//! it is applied. Every other field keeps only its most recent raw value and
//! coerces it once, in [`FieldSet::finish`]. A bad value that is later
//! overridden is never seen by the coercer.
//!
//! # Default expressions
//!
//! A tag's default may reference environment variables as `$NAME` (`$$` is a
//! literal `$`). For numeric fields the result is evaluated as arithmetic
//! (`$PORT+1`); unset variables count as `0`. Defaults are applied when the
//! field is bound and still holds its zero value. Sequence and map fields
//! never receive construction-time defaults. [`Environment::Fixed`] replaces
//! the process environment for tests or sandboxed resolution.
//!
//! # Prompting
//!
//! [`FieldSet::prompt_unassigned`] asks, in declaration order, for every
//! field that has prompt text and no value yet. Password fields read without
//! echo, boolean fields ask a yes/no question, and fields with a default
//! offer it as the pre-filled answer. [`TerminalPrompter`] reads from the
//! terminal; any [`Prompter`] implementation can stand in for it.
//!
//! # Usage text
//!
//! [`FieldSet::usage`] renders the bound tags in one of two
//! [`UsageStyle`]s. Styling is supplied by a [`Styler`]: [`PlainStyler`] for
//! bare text, [`ConsoleStyler`] for ANSI output. [`Settings`] loads the
//! preferred layout and color choice from a TOML file and `FLAGBIND_*`
//! environment variables.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`to_args`] turns a field set
//! into clap arguments and [`apply_matches`] feeds parsed values back.
//! [`UsageArgs`] adds `--usage-style` and `--no-color` flags to a clap
//! derive struct.
//!
//! # Error handling
//!
//! Binding, applying, prompting and finishing return [`BindError`], which
//! names the flag involved and wraps the [`ExprError`] or [`CoerceError`]
//! that caused it. Enable the `rich-errors` feature for `miette`
//! diagnostics.
//!
//! # Logging
//!
//! Binding and coercion emit `tracing` events at `debug` and `trace` level.
//! Install a subscriber to see them.

pub mod error;

mod binder;
#[cfg(feature = "clap")]
mod cli;
mod coerce;
mod expr;
mod field_set;
mod kind;
mod parser;
mod prompt;
mod settings;
mod style;
mod tag;
mod usage;
mod value;

#[cfg(test)]
mod fixtures;

pub use binder::{BindOptions, Binding, FieldBinder};
#[cfg(feature = "clap")]
pub use cli::{UsageArgs, apply_matches, to_args};
pub use coerce::{coerce, coerce_scalar, split_pair};
pub use error::{BindError, CoerceError, DecodeError, ExprError, SettingsError};
pub use expr::{Environment, evaluate, interpolate_with, resolve, resolve_with};
pub use field_set::FieldSet;
pub use kind::{FloatKind, IntKind, Kind, Scalar, UintKind};
pub use parser::{FieldParser, JsonFileParser, JsonParser};
pub use prompt::{Prompter, TerminalPrompter, parse_yes_no};
pub use settings::{ENV_PREFIX, Settings, SettingsInput, resolve as resolve_settings};
pub use style::{ConsoleStyler, PlainStyler, Styler};
pub use tag::Tag;
pub use usage::{UsageStyle, render};
pub use value::{Decode, FieldValue};
