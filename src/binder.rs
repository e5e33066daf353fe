//! One bound field: tag metadata, assignment state and binding strategy.
//!
//! A binder moves from unassigned to assigned the first time any value,
//! default or explicit, is applied, and never moves back. Explicit values
//! also mark it set and record the flag spelling that was used.
//!
//! Sequences and maps bind [`Binding::Immediate`]: every occurrence is
//! coerced on arrival and accumulates. Scalars and fields with a custom
//! parser bind [`Binding::LastWriteWins`]: occurrences only replace a pending
//! raw value, which is coerced once by [`FieldBinder::finalize`].

use tracing::debug;

use crate::coerce;
use crate::error::{BindError, CoerceError};
use crate::expr::{self, Environment};
use crate::kind::{Kind, Scalar};
use crate::parser::FieldParser;
use crate::tag::Tag;
use crate::value::FieldValue;

/// How repeated occurrences of a flag are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Coerce on every occurrence.
    Immediate,
    /// Keep the latest raw value and coerce it once, at finalize.
    LastWriteWins,
}

impl Binding {
    pub fn for_field(kind: &Kind, has_parser: bool) -> Self {
        if has_parser || !kind.accumulates() {
            Binding::LastWriteWins
        } else {
            Binding::Immediate
        }
    }
}

/// Construction options shared by every binder in a field set.
#[derive(Debug, Clone, Default)]
pub struct BindOptions {
    /// Leave fields untouched even when their tag declares a default.
    pub skip_defaults: bool,
    pub env: Environment,
}

/// Exclusive write access to one caller-owned field.
trait Slot {
    fn kind(&self) -> Kind;
    fn is_zero(&self) -> bool;
    fn has_parser(&self) -> bool;
    fn coerce(&mut self, raw: &str) -> Result<(), CoerceError>;
    fn store_bool(&mut self, value: bool) -> bool;
}

struct Plain<'a, T>(&'a mut T);

impl<T: FieldValue> Slot for Plain<'_, T> {
    fn kind(&self) -> Kind {
        self.0.field_kind()
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn has_parser(&self) -> bool {
        false
    }

    fn coerce(&mut self, raw: &str) -> Result<(), CoerceError> {
        coerce::coerce(&mut *self.0, raw)
    }

    fn store_bool(&mut self, value: bool) -> bool {
        self.0.store(Scalar::Bool(value))
    }
}

struct Parsed<'a, T, P> {
    target: &'a mut T,
    parser: P,
}

impl<T, P> Slot for Parsed<'_, T, P>
where
    T: Default + PartialEq,
    P: FieldParser<T>,
{
    fn kind(&self) -> Kind {
        Kind::Custom(std::any::type_name::<T>())
    }

    fn is_zero(&self) -> bool {
        *self.target == T::default()
    }

    fn has_parser(&self) -> bool {
        true
    }

    fn coerce(&mut self, raw: &str) -> Result<(), CoerceError> {
        self.parser
            .parse(self.target, raw)
            .map_err(|source| CoerceError::Decode {
                raw: raw.to_string(),
                source,
            })
    }

    fn store_bool(&mut self, _value: bool) -> bool {
        false
    }
}

/// Binds one field to its tag metadata and coercion behavior.
pub struct FieldBinder<'a> {
    tag: Tag,
    slot: Box<dyn Slot + 'a>,
    binding: Binding,
    assigned: bool,
    set: bool,
    actual_name: Option<String>,
    pending: Option<String>,
}

impl<'a> FieldBinder<'a> {
    /// Bind `field` with the built-in coercion for its kind.
    ///
    /// If the tag declares a default, defaulting is not skipped, and the
    /// field still holds its zero value, the default is resolved and applied.
    pub fn new<T: FieldValue + 'a>(
        tag: &Tag,
        field: &'a mut T,
        options: &BindOptions,
    ) -> Result<Self, BindError> {
        Self::from_slot(tag, Box::new(Plain(field)), options)
    }

    /// Bind `field` with a custom parser that replaces built-in coercion.
    pub fn with_parser<T, P>(
        tag: &Tag,
        field: &'a mut T,
        parser: P,
        options: &BindOptions,
    ) -> Result<Self, BindError>
    where
        T: Default + PartialEq + 'a,
        P: FieldParser<T> + 'a,
    {
        let slot = Parsed {
            target: field,
            parser,
        };
        Self::from_slot(tag, Box::new(slot), options)
    }

    fn from_slot(
        tag: &Tag,
        slot: Box<dyn Slot + 'a>,
        options: &BindOptions,
    ) -> Result<Self, BindError> {
        let binding = Binding::for_field(&slot.kind(), slot.has_parser());
        let mut binder = Self {
            tag: tag.clone(),
            slot,
            binding,
            assigned: false,
            set: false,
            actual_name: None,
            pending: None,
        };

        // Collections never receive construction-time defaults.
        let wants_default = !options.skip_defaults
            && !binder.tag.default_value.is_empty()
            && binding == Binding::LastWriteWins
            && binder.slot.is_zero();
        if wants_default {
            let resolved = binder.resolved_default(&options.env)?;
            binder.set_default(&resolved)?;
        }
        Ok(binder)
    }

    /// Resolve the tag's default expression for this field's kind.
    pub fn resolved_default(&self, env: &Environment) -> Result<String, BindError> {
        expr::resolve(&self.tag.default_value, &self.slot.kind(), env).map_err(|source| {
            BindError::Expression {
                flag: self.name().to_string(),
                source,
            }
        })
    }

    /// Apply a value that does not count as an explicit occurrence.
    pub fn set_default(&mut self, raw: &str) -> Result<(), BindError> {
        self.assigned = true;
        debug!(flag = self.name(), raw, "applying default");
        self.apply(raw)
    }

    /// Apply an explicit occurrence spelled `actual_name` on the command line.
    pub fn set(&mut self, actual_name: &str, raw: &str) -> Result<(), BindError> {
        self.assigned = true;
        self.set = true;
        self.actual_name = Some(actual_name.to_string());
        debug!(flag = actual_name, raw, binding = ?self.binding, "setting value");
        self.apply(raw)
    }

    fn apply(&mut self, raw: &str) -> Result<(), BindError> {
        match self.binding {
            Binding::LastWriteWins => {
                self.pending = Some(raw.to_string());
                Ok(())
            }
            Binding::Immediate => self.slot.coerce(raw).map_err(|source| self.error(source)),
        }
    }

    /// Coerce the pending raw value, if any. Each pending value is coerced
    /// exactly once.
    pub fn finalize(&mut self) -> Result<(), BindError> {
        let Some(raw) = self.pending.take() else {
            return Ok(());
        };
        debug!(flag = self.name(), raw = %raw, "finalizing delayed value");
        self.slot.coerce(&raw).map_err(|source| self.error(source))
    }

    /// Write a boolean answer directly, bypassing string coercion.
    pub(crate) fn store_bool(&mut self, value: bool) -> Result<(), BindError> {
        if !self.slot.store_bool(value) {
            return Err(self.error(CoerceError::TypeMismatch {
                raw: value.to_string(),
                expected: self.slot.kind().expected(),
            }));
        }
        self.assigned = true;
        self.pending = None;
        Ok(())
    }

    fn error(&self, source: CoerceError) -> BindError {
        BindError::Coerce {
            flag: self.name().to_string(),
            source,
        }
    }

    /// The flag spelling last used, else the first long name, else the
    /// first short name.
    pub fn name(&self) -> &str {
        self.actual_name
            .as_deref()
            .unwrap_or_else(|| self.tag.primary_name())
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn kind(&self) -> Kind {
        self.slot.kind()
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn is_boolean(&self) -> bool {
        self.slot.kind().is_bool()
    }

    /// True once any value, default or explicit, has been applied.
    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// True once an explicit occurrence has been applied.
    pub fn is_set(&self) -> bool {
        self.set
    }

    pub fn actual_name(&self) -> Option<&str> {
        self.actual_name.as_deref()
    }

    /// The raw value waiting to be coerced by [`finalize`](Self::finalize).
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}
