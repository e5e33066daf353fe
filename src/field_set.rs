//! Ordered collection of field binders with lookup by any flag name.
//!
//! A [`FieldSet`] lives for one parse: bind every field, apply command-line
//! occurrences, optionally prompt for what is still unassigned, then
//! [`finish`](FieldSet::finish) to coerce delayed values and release the
//! borrowed fields.

use std::collections::HashMap;
use std::io;

use tracing::{debug, trace};

use crate::binder::{BindOptions, FieldBinder};
use crate::error::BindError;
use crate::expr::Environment;
use crate::parser::FieldParser;
use crate::prompt::Prompter;
use crate::style::Styler;
use crate::tag::Tag;
use crate::usage::{self, UsageStyle};
use crate::value::FieldValue;

/// Binders in declaration order plus a name index.
///
/// ```
/// use flagbind::{FieldSet, Tag};
///
/// let mut port: u16 = 0;
/// let mut verbose = false;
/// {
///     let mut set = FieldSet::new();
///     set.bind(&Tag::new().short("-p").long("--port").default_value("8080"), &mut port)?;
///     set.bind(&Tag::new().short("-v"), &mut verbose)?;
///     set.apply("-v", "")?;
///     set.finish()?;
/// }
/// assert_eq!(port, 8080);
/// assert!(verbose);
/// # Ok::<(), flagbind::BindError>(())
/// ```
#[derive(Default)]
pub struct FieldSet<'a> {
    binders: Vec<FieldBinder<'a>>,
    index: HashMap<String, usize>,
    options: BindOptions,
}

impl<'a> FieldSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not apply tag defaults to fields bound after this call.
    pub fn skip_defaults(mut self, skip: bool) -> Self {
        self.options.skip_defaults = skip;
        self
    }

    /// Environment used to resolve `$NAME` in default expressions.
    pub fn env(mut self, env: Environment) -> Self {
        self.options.env = env;
        self
    }

    /// Bind `field` using the built-in coercion for its type.
    pub fn bind<T: FieldValue + 'a>(&mut self, tag: &Tag, field: &'a mut T) -> Result<(), BindError> {
        self.check_names(tag)?;
        let binder = FieldBinder::new(tag, field, &self.options)?;
        self.push(binder);
        Ok(())
    }

    /// Bind `field` with a parser that replaces built-in coercion.
    pub fn bind_with_parser<T, P>(
        &mut self,
        tag: &Tag,
        field: &'a mut T,
        parser: P,
    ) -> Result<(), BindError>
    where
        T: Default + PartialEq + 'a,
        P: FieldParser<T> + 'a,
    {
        self.check_names(tag)?;
        let binder = FieldBinder::with_parser(tag, field, parser, &self.options)?;
        self.push(binder);
        Ok(())
    }

    fn check_names(&self, tag: &Tag) -> Result<(), BindError> {
        let mut seen: Vec<&str> = Vec::new();
        for name in tag.names() {
            if self.index.contains_key(name) || seen.contains(&name) {
                return Err(BindError::DuplicateName {
                    name: name.to_string(),
                });
            }
            seen.push(name);
        }
        Ok(())
    }

    fn push(&mut self, binder: FieldBinder<'a>) {
        let position = self.binders.len();
        for name in binder.tag().names() {
            self.index.insert(name.to_string(), position);
        }
        trace!(flag = binder.name(), kind = %binder.kind(), "bound field");
        self.binders.push(binder);
    }

    /// Look up a binder by any of its short or long names.
    pub fn get(&self, name: &str) -> Option<&FieldBinder<'a>> {
        self.index.get(name).map(|&i| &self.binders[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldBinder<'a>> {
        self.index.get(name).map(|&i| &mut self.binders[i])
    }

    /// Binders in declaration order.
    pub fn binders(&self) -> &[FieldBinder<'a>] {
        &self.binders
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.binders.iter().map(FieldBinder::tag)
    }

    pub fn len(&self) -> usize {
        self.binders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }

    /// Apply one command-line occurrence of `name`.
    pub fn apply(&mut self, name: &str, raw: &str) -> Result<(), BindError> {
        let binder = self
            .get_mut(name)
            .ok_or_else(|| BindError::UnknownFlag {
                name: name.to_string(),
            })?;
        binder.set(name, raw)
    }

    /// Apply occurrences in order, stopping at the first error.
    pub fn apply_all<I, N, V>(&mut self, occurrences: I) -> Result<(), BindError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, raw) in occurrences {
            self.apply(name.as_ref(), raw.as_ref())?;
        }
        Ok(())
    }

    /// Prompt, in declaration order, for every unassigned field that has
    /// prompt text. The first read error stops prompting.
    pub fn prompt_unassigned(&mut self, prompter: &mut dyn Prompter) -> Result<(), BindError> {
        let env = &self.options.env;
        for binder in &mut self.binders {
            if binder.is_assigned() || binder.tag().prompt.is_empty() {
                continue;
            }
            let text = format!("{}: ", binder.tag().prompt);
            let flag = binder.tag().primary_name().to_string();
            let read_error = |source: io::Error| BindError::Prompt {
                flag: flag.clone(),
                source,
            };
            debug!(flag = %flag, "prompting");

            if binder.tag().password {
                let answer = prompter.read_password(&text).map_err(read_error)?;
                if !answer.is_empty() {
                    binder.set(&flag, &answer)?;
                }
            } else if binder.is_boolean() {
                let yes = prompter.read_yes_no(&text).map_err(read_error)?;
                binder.store_bool(yes)?;
            } else if !binder.tag().default_value.is_empty() {
                let default = binder.resolved_default(env)?;
                let answer = prompter
                    .read_line_with_default(&text, &default)
                    .map_err(read_error)?;
                binder.set(&flag, &answer)?;
            } else {
                let answer = prompter
                    .read_line(&text, binder.tag().required)
                    .map_err(read_error)?;
                binder.set(&flag, &answer)?;
            }
        }
        Ok(())
    }

    /// Fail with every required field that has not been assigned.
    pub fn check_required(&self) -> Result<(), BindError> {
        let names: Vec<String> = self
            .binders
            .iter()
            .filter(|b| b.tag().required && !b.is_assigned())
            .map(|b| b.tag().primary_name().to_string())
            .collect();
        if names.is_empty() {
            Ok(())
        } else {
            Err(BindError::MissingRequired { names })
        }
    }

    /// Render usage text for the bound fields.
    pub fn usage(&self, style: UsageStyle, styler: &dyn Styler) -> String {
        usage::render(self.tags(), style, styler)
    }

    /// Coerce every delayed value, in declaration order, and release the
    /// borrowed fields.
    pub fn finish(mut self) -> Result<(), BindError> {
        for binder in &mut self.binders {
            binder.finalize()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoerceError;
    use crate::fixtures::test::{FailingPrompter, ScriptedPrompter, port_tag};
    use crate::style::PlainStyler;

    fn fixed_env() -> Environment {
        Environment::fixed([("PORT", "8079"), ("USER", "ada")])
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut a = false;
        let mut b = false;
        let mut set = FieldSet::new();
        set.bind(&Tag::new().short("-v"), &mut a).unwrap();
        let err = set
            .bind(&Tag::new().short("-x").long("-v"), &mut b)
            .unwrap_err();
        match err {
            BindError::DuplicateName { name } => assert_eq!(name, "-v"),
            other => panic!("Expected DuplicateName, got: {other:?}"),
        }
        assert_eq!(set.len(), 1);
        assert!(set.get("-x").is_none());
    }

    #[test]
    fn duplicate_within_one_tag_rejected() {
        let mut a = false;
        let mut set = FieldSet::new();
        let err = set
            .bind(&Tag::new().long("--all").long("--all"), &mut a)
            .unwrap_err();
        assert!(matches!(err, BindError::DuplicateName { .. }));
        assert!(set.is_empty());
    }

    #[test]
    fn every_name_reaches_same_binder() {
        let mut name = String::new();
        {
            let mut set = FieldSet::new();
            let tag = Tag::new().short("-n").long("--name").long("--nick");
            set.bind(&tag, &mut name).unwrap();
            set.apply("--nick", "b").unwrap();
            set.apply("-n", "c").unwrap();
            assert_eq!(set.get("--name").unwrap().actual_name(), Some("-n"));
            set.finish().unwrap();
        }
        assert_eq!(name, "c");
    }

    #[test]
    fn unknown_flag_rejected() {
        let mut set = FieldSet::new();
        let err = set.apply("--nope", "1").unwrap_err();
        assert!(matches!(err, BindError::UnknownFlag { .. }));
    }

    #[test]
    fn apply_all_stops_at_first_error() {
        let mut ports: Vec<u8> = Vec::new();
        {
            let mut set = FieldSet::new();
            set.bind(&Tag::new().long("--port"), &mut ports).unwrap();
            let err = set
                .apply_all([("--port", "1"), ("--port", "999"), ("--port", "3")])
                .unwrap_err();
            match err {
                BindError::Coerce { flag, source } => {
                    assert_eq!(flag, "--port");
                    assert!(matches!(source, CoerceError::ValueOverflow { .. }));
                }
                other => panic!("Expected Coerce, got: {other:?}"),
            }
        }
        assert_eq!(ports, vec![1]);
    }

    #[test]
    fn finish_surfaces_delayed_error() {
        let mut port: u8 = 0;
        let mut set = FieldSet::new();
        set.bind(&Tag::new().long("--port"), &mut port).unwrap();
        set.apply("--port", "300").unwrap();
        assert!(set.finish().is_err());
    }

    #[test]
    fn check_required_lists_unassigned() {
        let mut host = String::new();
        let mut user = String::new();
        let mut port: u16 = 0;
        let mut set = FieldSet::new().env(fixed_env());
        set.bind(&Tag::new().long("--host").required(), &mut host)
            .unwrap();
        set.bind(&Tag::new().short("-u").required(), &mut user).unwrap();
        set.bind(&port_tag(), &mut port).unwrap();
        let err = set.check_required().unwrap_err();
        match err {
            BindError::MissingRequired { names } => assert_eq!(names, vec!["--host", "-u"]),
            other => panic!("Expected MissingRequired, got: {other:?}"),
        }
        set.apply("--host", "db").unwrap();
        set.apply("-u", "root").unwrap();
        set.check_required().unwrap();
    }

    #[test]
    fn prompts_follow_declaration_order_and_kind() {
        let mut secret = String::new();
        let mut force = false;
        let mut port: i32 = 0;
        let mut name = String::new();
        let mut skipped = String::new();
        let mut prompter = ScriptedPrompter::new(["hunter2", "y", "", "grace"]);
        {
            let mut set = FieldSet::new().skip_defaults(true).env(fixed_env());
            set.bind(&Tag::new().long("--secret").password().prompt("Secret"), &mut secret)
                .unwrap();
            set.bind(&Tag::new().long("--force").prompt("Force"), &mut force)
                .unwrap();
            set.bind(&port_tag().prompt("Port"), &mut port).unwrap();
            set.bind(&Tag::new().long("--name").required().prompt("Name"), &mut name)
                .unwrap();
            set.bind(&Tag::new().long("--quiet"), &mut skipped).unwrap();
            set.prompt_unassigned(&mut prompter).unwrap();
            assert!(set.get("--force").unwrap().is_assigned());
            set.finish().unwrap();
        }
        assert_eq!(secret, "hunter2");
        assert!(force);
        assert_eq!(port, 8080);
        assert_eq!(name, "grace");
        assert!(skipped.is_empty());
        assert_eq!(
            prompter.asked(),
            vec![
                "password:Secret: ",
                "yes_no:Force: ",
                "default(8080):Port: ",
                "required:Name: ",
            ]
        );
    }

    #[test]
    fn assigned_fields_are_not_prompted() {
        let mut port: i32 = 0;
        let mut name = String::new();
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        {
            let mut set = FieldSet::new().env(fixed_env());
            set.bind(&port_tag().prompt("Port"), &mut port).unwrap();
            set.bind(&Tag::new().long("--name").prompt("Name"), &mut name)
                .unwrap();
            set.apply("--name", "ada").unwrap();
            set.prompt_unassigned(&mut prompter).unwrap();
            set.finish().unwrap();
        }
        assert!(prompter.asked().is_empty());
        assert_eq!(port, 8080);
        assert_eq!(name, "ada");
    }

    #[test]
    fn empty_password_answer_is_ignored() {
        let mut secret = String::new();
        let mut prompter = ScriptedPrompter::new([""]);
        {
            let mut set = FieldSet::new();
            set.bind(&Tag::new().long("--secret").password().prompt("Secret"), &mut secret)
                .unwrap();
            set.prompt_unassigned(&mut prompter).unwrap();
            assert!(!set.get("--secret").unwrap().is_assigned());
            set.finish().unwrap();
        }
        assert!(secret.is_empty());
    }

    #[test]
    fn prompt_failure_stops_prompting() {
        let mut a = String::new();
        let mut set = FieldSet::new();
        set.bind(&Tag::new().long("--a").prompt("A"), &mut a).unwrap();
        let mut prompter = FailingPrompter(io::ErrorKind::UnexpectedEof);
        let err = set.prompt_unassigned(&mut prompter).unwrap_err();
        match err {
            BindError::Prompt { flag, source } => {
                assert_eq!(flag, "--a");
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("Expected Prompt, got: {other:?}"),
        }
    }

    #[test]
    fn prompted_value_is_coerced_on_finish() {
        let mut port: u8 = 0;
        let mut prompter = ScriptedPrompter::new(["300"]);
        let mut set = FieldSet::new();
        set.bind(&Tag::new().long("--port").prompt("Port"), &mut port)
            .unwrap();
        set.prompt_unassigned(&mut prompter).unwrap();
        assert!(set.finish().is_err());
    }

    #[test]
    fn map_field_collects_pairs() {
        let mut vars: HashMap<String, i64> = HashMap::new();
        {
            let mut set = FieldSet::new();
            set.bind(&Tag::new().short("-D"), &mut vars).unwrap();
            set.apply_all(vec![("-D", "a=1"), ("-D", "b=2")]).unwrap();
            set.finish().unwrap();
        }
        assert_eq!(vars["a"], 1);
        assert_eq!(vars["b"], 2);
    }

    #[test]
    fn usage_uses_declaration_order() {
        let mut a = false;
        let mut b = false;
        let mut set = FieldSet::new();
        set.bind(&Tag::new().long("--zeta").usage("last letter"), &mut a)
            .unwrap();
        set.bind(&Tag::new().long("--alpha").usage("first letter"), &mut b)
            .unwrap();
        let text = set.usage(UsageStyle::Stacked, &PlainStyler);
        let zeta = text.find("--zeta").unwrap();
        let alpha = text.find("--alpha").unwrap();
        assert!(zeta < alpha);
    }
}
