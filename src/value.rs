//! Typed write access into caller-owned fields.
//!
//! [`FieldValue`] is the settable-reference abstraction the coercer writes
//! through: it reports the field's [`Kind`], answers whether the field still
//! holds its zero value, and accepts coerced [`Scalar`]s by replacement
//! (scalars), by append (sequences) or by insert (maps).
//!
//! Implementations are provided for `bool`, every integer and float width,
//! `String`, `Vec<T>`, `HashMap<K, V>`, `BTreeMap<K, V>` and `Option<T>`.
//! Other types either implement [`Decode`] and use [`decode_field!`], or are
//! bound with a custom [`FieldParser`](crate::FieldParser).

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::error::DecodeError;
use crate::kind::{FloatKind, IntKind, Kind, Scalar, UintKind};

/// A field type the coercer can write into.
///
/// The write methods return `false` when handed a scalar of the wrong shape;
/// the coercer turns that into a type-mismatch error.
pub trait FieldValue {
    /// Kind of the type, used to describe collection elements.
    fn kind() -> Kind
    where
        Self: Sized;

    /// Kind of this field.
    fn field_kind(&self) -> Kind;

    /// True while the field holds its kind's zero value.
    fn is_zero(&self) -> bool;

    /// Build a value from a coerced scalar, for use as a collection element.
    fn from_scalar(_scalar: Scalar) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }

    /// Replace the field with `scalar`.
    fn store(&mut self, scalar: Scalar) -> bool;

    /// Append one element.
    fn push(&mut self, _element: Scalar) -> bool {
        false
    }

    /// Insert or overwrite one map entry.
    fn insert(&mut self, _key: Scalar, _value: Scalar) -> bool {
        false
    }

    /// Self-decoding fallback for kinds the coercer does not know.
    fn decoder(&mut self) -> Option<&mut dyn Decode> {
        None
    }
}

/// A type that decodes itself from a raw command-line string.
pub trait Decode {
    fn decode(&mut self, raw: &str) -> Result<(), DecodeError>;
}

fn replace<T: FieldValue>(slot: &mut T, scalar: Scalar) -> bool {
    match T::from_scalar(scalar) {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

macro_rules! scalar_field {
    ($ty:ty, $kind:expr, $zero:expr, |$s:ident| $convert:expr) => {
        impl FieldValue for $ty {
            fn kind() -> Kind {
                $kind
            }

            fn field_kind(&self) -> Kind {
                $kind
            }

            fn is_zero(&self) -> bool {
                *self == $zero
            }

            fn from_scalar($s: Scalar) -> Option<Self> {
                $convert
            }

            fn store(&mut self, scalar: Scalar) -> bool {
                replace(self, scalar)
            }
        }
    };
}

macro_rules! int_field {
    ($($ty:ty => $width:ident),* $(,)?) => {
        $(scalar_field!($ty, Kind::Int(IntKind::$width), 0, |s| match s {
            Scalar::Int(v) => <$ty>::try_from(v).ok(),
            _ => None,
        });)*
    };
}

macro_rules! uint_field {
    ($($ty:ty => $width:ident),* $(,)?) => {
        $(scalar_field!($ty, Kind::Uint(UintKind::$width), 0, |s| match s {
            Scalar::Uint(v) => <$ty>::try_from(v).ok(),
            _ => None,
        });)*
    };
}

int_field!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
uint_field!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

scalar_field!(f32, Kind::Float(FloatKind::F32), 0.0, |s| match s {
    Scalar::Float(v) => Some(v as f32),
    _ => None,
});
scalar_field!(f64, Kind::Float(FloatKind::F64), 0.0, |s| match s {
    Scalar::Float(v) => Some(v),
    _ => None,
});
scalar_field!(bool, Kind::Bool, false, |s| match s {
    Scalar::Bool(v) => Some(v),
    _ => None,
});

impl FieldValue for String {
    fn kind() -> Kind {
        Kind::String
    }

    fn field_kind(&self) -> Kind {
        Kind::String
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    fn store(&mut self, scalar: Scalar) -> bool {
        replace(self, scalar)
    }
}

/// Make room for one more element: start at 4, then grow to
/// `len + cap/2 + 1` whenever the vector is full.
fn reserve_one<T>(vec: &mut Vec<T>) {
    if vec.capacity() == 0 {
        vec.reserve_exact(4);
    } else if vec.len() == vec.capacity() {
        vec.reserve_exact(vec.capacity() / 2 + 1);
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn kind() -> Kind {
        Kind::Sequence(Box::new(T::kind()))
    }

    fn field_kind(&self) -> Kind {
        Self::kind()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn store(&mut self, _scalar: Scalar) -> bool {
        false
    }

    fn push(&mut self, element: Scalar) -> bool {
        let Some(value) = T::from_scalar(element) else {
            return false;
        };
        reserve_one(self);
        Vec::push(self, value);
        true
    }
}

impl<K, V, S> FieldValue for HashMap<K, V, S>
where
    K: FieldValue + Eq + Hash,
    V: FieldValue,
    S: BuildHasher,
{
    fn kind() -> Kind {
        Kind::Map {
            key: Box::new(K::kind()),
            value: Box::new(V::kind()),
        }
    }

    fn field_kind(&self) -> Kind {
        Self::kind()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn store(&mut self, _scalar: Scalar) -> bool {
        false
    }

    fn insert(&mut self, key: Scalar, value: Scalar) -> bool {
        match (K::from_scalar(key), V::from_scalar(value)) {
            (Some(k), Some(v)) => {
                HashMap::insert(self, k, v);
                true
            }
            _ => false,
        }
    }
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: FieldValue + Ord,
    V: FieldValue,
{
    fn kind() -> Kind {
        Kind::Map {
            key: Box::new(K::kind()),
            value: Box::new(V::kind()),
        }
    }

    fn field_kind(&self) -> Kind {
        Self::kind()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn store(&mut self, _scalar: Scalar) -> bool {
        false
    }

    fn insert(&mut self, key: Scalar, value: Scalar) -> bool {
        match (K::from_scalar(key), V::from_scalar(value)) {
            (Some(k), Some(v)) => {
                BTreeMap::insert(self, k, v);
                true
            }
            _ => false,
        }
    }
}

/// `Option<T>` binds like `T`; `None` is its zero value.
impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn kind() -> Kind {
        T::kind()
    }

    fn field_kind(&self) -> Kind {
        T::kind()
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        T::from_scalar(scalar).map(Some)
    }

    fn store(&mut self, scalar: Scalar) -> bool {
        match T::from_scalar(scalar) {
            Some(value) => {
                *self = Some(value);
                true
            }
            None => false,
        }
    }

    fn push(&mut self, element: Scalar) -> bool {
        self.get_or_insert_with(T::default).push(element)
    }

    fn insert(&mut self, key: Scalar, value: Scalar) -> bool {
        self.get_or_insert_with(T::default).insert(key, value)
    }

    fn decoder(&mut self) -> Option<&mut dyn Decode> {
        self.get_or_insert_with(T::default).decoder()
    }
}

/// Implement [`FieldValue`] for a type that implements [`Decode`].
///
/// The type must also implement `Default` and `PartialEq`; its `Default`
/// value is treated as the zero value.
///
/// ```ignore
/// #[derive(Debug, Default, PartialEq)]
/// struct Level(u8);
///
/// impl flagbind::Decode for Level { /* ... */ }
///
/// flagbind::decode_field!(Level);
/// ```
#[macro_export]
macro_rules! decode_field {
    ($ty:ty) => {
        impl $crate::FieldValue for $ty {
            fn kind() -> $crate::Kind {
                $crate::Kind::Custom(stringify!($ty))
            }

            fn field_kind(&self) -> $crate::Kind {
                $crate::Kind::Custom(stringify!($ty))
            }

            fn is_zero(&self) -> bool {
                *self == <$ty as ::std::default::Default>::default()
            }

            fn store(&mut self, _scalar: $crate::Scalar) -> bool {
                false
            }

            fn decoder(&mut self) -> Option<&mut dyn $crate::Decode> {
                Some(self as &mut dyn $crate::Decode)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_store_checks_width() {
        let mut v: u8 = 0;
        assert!(v.store(Scalar::Uint(200)));
        assert_eq!(v, 200);
        assert!(!v.store(Scalar::Uint(300)));
        assert!(!v.store(Scalar::Int(1)));
        assert_eq!(v, 200);
    }

    #[test]
    fn zero_values() {
        assert!(0i32.is_zero());
        assert!(!1i32.is_zero());
        assert!(String::new().is_zero());
        assert!(false.is_zero());
        assert!(!true.is_zero());
        assert!(Vec::<u8>::new().is_zero());
        assert!(None::<u16>.is_zero());
        assert!(!Some(0u16).is_zero());
    }

    #[test]
    fn vec_starts_with_capacity_four() {
        let mut v: Vec<i64> = Vec::new();
        assert!(FieldValue::push(&mut v, Scalar::Int(1)));
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn vec_grows_by_half_plus_one_when_full() {
        let mut v: Vec<i64> = Vec::new();
        for i in 0..4 {
            assert!(FieldValue::push(&mut v, Scalar::Int(i)));
        }
        assert_eq!(v.capacity(), 4);
        assert!(FieldValue::push(&mut v, Scalar::Int(4)));
        assert!(v.capacity() >= 4 + 4 / 2 + 1);
        assert_eq!(v, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn map_insert_overwrites() {
        let mut m: HashMap<String, i32> = HashMap::new();
        assert!(FieldValue::insert(&mut m, Scalar::Str("a".into()), Scalar::Int(1)));
        assert!(FieldValue::insert(&mut m, Scalar::Str("a".into()), Scalar::Int(2)));
        assert_eq!(m.len(), 1);
        assert_eq!(m["a"], 2);
    }

    #[test]
    fn option_stores_some() {
        let mut v: Option<String> = None;
        assert!(v.store(Scalar::Str("x".into())));
        assert_eq!(v.as_deref(), Some("x"));
        assert_eq!(v.field_kind(), Kind::String);
    }

    #[test]
    fn nested_vec_reports_nested_kind() {
        let v: Vec<Vec<i32>> = Vec::new();
        assert_eq!(
            v.field_kind(),
            Kind::Sequence(Box::new(Kind::Sequence(Box::new(Kind::Int(IntKind::I32)))))
        );
    }
}
