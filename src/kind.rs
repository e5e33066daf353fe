//! The closed set of value kinds a field can declare.
//!
//! Coercion is a total function over [`Kind`]. Numeric kinds carry their
//! width so range checks and error messages can name the concrete type.

use std::fmt;

/// Signed integer widths. `Isize` is the platform width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
}

impl IntKind {
    pub fn bounds(self) -> (i64, i64) {
        match self {
            IntKind::I8 => (i8::MIN.into(), i8::MAX.into()),
            IntKind::I16 => (i16::MIN.into(), i16::MAX.into()),
            IntKind::I32 => (i32::MIN.into(), i32::MAX.into()),
            IntKind::I64 => (i64::MIN, i64::MAX),
            // isize is at most 64 bits on every supported target
            IntKind::Isize => (isize::MIN as i64, isize::MAX as i64),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::Isize => "isize",
        }
    }
}

/// Unsigned integer widths. `Usize` is the platform width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UintKind {
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl UintKind {
    pub fn max(self) -> u64 {
        match self {
            UintKind::U8 => u8::MAX.into(),
            UintKind::U16 => u16::MAX.into(),
            UintKind::U32 => u32::MAX.into(),
            UintKind::U64 => u64::MAX,
            UintKind::Usize => usize::MAX as u64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UintKind::U8 => "u8",
            UintKind::U16 => "u16",
            UintKind::U32 => "u32",
            UintKind::U64 => "u64",
            UintKind::Usize => "usize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    /// Largest finite magnitude representable by this width.
    pub fn max_magnitude(self) -> f64 {
        match self {
            FloatKind::F32 => f32::MAX.into(),
            FloatKind::F64 => f64::MAX,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FloatKind::F32 => "f32",
            FloatKind::F64 => "f64",
        }
    }
}

/// The declared kind of a bound field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int(IntKind),
    Uint(UintKind),
    Float(FloatKind),
    String,
    /// Accumulates one element per occurrence.
    Sequence(Box<Kind>),
    /// Accumulates one `key=value` entry per occurrence.
    Map { key: Box<Kind>, value: Box<Kind> },
    /// Not a built-in kind; coerced through [`Decode`](crate::Decode) when
    /// the type provides it.
    Custom(&'static str),
}

impl Kind {
    pub fn is_bool(&self) -> bool {
        matches!(self, Kind::Bool)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Kind::Int(_) | Kind::Uint(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Kind::Float(_))
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Sequences and maps accumulate; every other kind is last-write-wins.
    pub fn accumulates(&self) -> bool {
        matches!(self, Kind::Sequence(_) | Kind::Map { .. })
    }

    /// Phrase used in type-mismatch messages, e.g. "an i32" or "a bool".
    pub fn expected(&self) -> String {
        let name = self.to_string();
        // "f32" reads "ef-thirty-two"; "u8" reads "you-eight"
        let article = match (self, name.chars().next()) {
            (Kind::Float(_), _) | (_, Some('a' | 'e' | 'i' | 'o')) => "an",
            _ => "a",
        };
        format!("{article} {name}")
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Bool => write!(f, "bool"),
            Kind::Int(k) => write!(f, "{}", k.name()),
            Kind::Uint(k) => write!(f, "{}", k.name()),
            Kind::Float(k) => write!(f, "{}", k.name()),
            Kind::String => write!(f, "string"),
            Kind::Sequence(elem) => write!(f, "list of {elem}"),
            Kind::Map { key, value } => write!(f, "map of {key} to {value}"),
            Kind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// A coerced, range-checked scalar ready to be stored into a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_bounds_match_widths() {
        assert_eq!(IntKind::I8.bounds(), (-128, 127));
        assert_eq!(IntKind::I32.bounds(), (i32::MIN as i64, i32::MAX as i64));
    }

    #[test]
    fn uint_max_matches_widths() {
        assert_eq!(UintKind::U8.max(), 255);
        assert_eq!(UintKind::U64.max(), u64::MAX);
    }

    #[test]
    fn expected_uses_article() {
        assert_eq!(Kind::Int(IntKind::I32).expected(), "an i32");
        assert_eq!(Kind::Uint(UintKind::U8).expected(), "a u8");
        assert_eq!(Kind::Bool.expected(), "a bool");
        assert_eq!(Kind::Float(FloatKind::F64).expected(), "an f64");
        assert_eq!(Kind::Float(FloatKind::F32).expected(), "an f32");
        assert_eq!(Kind::Custom("Format").expected(), "a Format");
    }

    #[test]
    fn only_collections_accumulate() {
        assert!(Kind::Sequence(Box::new(Kind::String)).accumulates());
        assert!(
            Kind::Map {
                key: Box::new(Kind::String),
                value: Box::new(Kind::Bool)
            }
            .accumulates()
        );
        assert!(!Kind::String.accumulates());
        assert!(!Kind::Custom("Level").accumulates());
    }

    #[test]
    fn display_nested_kinds() {
        let kind = Kind::Map {
            key: Box::new(Kind::String),
            value: Box::new(Kind::Sequence(Box::new(Kind::Int(IntKind::I64)))),
        };
        assert_eq!(kind.to_string(), "map of string to list of i64");
    }
}
