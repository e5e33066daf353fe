//! String to typed-value coercion.
//!
//! [`coerce`] writes one raw value into a field. Scalars are replaced,
//! sequences get one appended element per call and maps get one inserted
//! entry per call. Collection elements, keys and values are coerced as
//! sub-fields through [`coerce_scalar`], which refuses further nesting.

use std::num::IntErrorKind;

use tracing::trace;

use crate::error::CoerceError;
use crate::kind::{FloatKind, IntKind, Kind, Scalar, UintKind};
use crate::value::FieldValue;

/// Coerce `raw` into `field` according to its declared kind.
pub fn coerce(field: &mut dyn FieldValue, raw: &str) -> Result<(), CoerceError> {
    let kind = field.field_kind();
    trace!(%kind, raw, "coercing value");
    let accepted = match &kind {
        Kind::Sequence(element) => {
            let element = coerce_scalar(element, raw)?;
            field.push(element)
        }
        Kind::Map { key, value } => {
            let (key_raw, value_raw) = split_pair(raw)?;
            let key = coerce_scalar(key, key_raw)?;
            let value = coerce_scalar(value, value_raw)?;
            field.insert(key, value)
        }
        Kind::Custom(type_name) => {
            trace!(type_name, "decoding custom kind");
            return match field.decoder() {
                Some(decoder) => decoder.decode(raw).map_err(|source| CoerceError::Decode {
                    raw: raw.to_string(),
                    source,
                }),
                None => Err(CoerceError::UnsupportedType {
                    type_name: type_name.to_string(),
                }),
            };
        }
        scalar => {
            let value = coerce_scalar(scalar, raw)?;
            field.store(value)
        }
    };

    if accepted {
        Ok(())
    } else {
        Err(mismatch(raw, &kind))
    }
}

/// Coerce `raw` into a scalar of `kind`.
///
/// This is also the sub-field path for sequence elements and map keys and
/// values, so collection kinds are rejected as unsupported nesting.
pub fn coerce_scalar(kind: &Kind, raw: &str) -> Result<Scalar, CoerceError> {
    match kind {
        Kind::Bool => parse_bool(raw).map(Scalar::Bool),
        Kind::String => Ok(Scalar::Str(raw.to_string())),
        Kind::Int(width) => parse_int(raw, *width).map(Scalar::Int),
        Kind::Uint(width) => parse_uint(raw, *width).map(Scalar::Uint),
        Kind::Float(width) => parse_float(raw, *width).map(Scalar::Float),
        Kind::Sequence(_) | Kind::Map { .. } => Err(CoerceError::UnsupportedNesting {
            kind: kind.to_string(),
        }),
        Kind::Custom(type_name) => Err(CoerceError::UnsupportedType {
            type_name: format!("{type_name} as sub field"),
        }),
    }
}

/// Split `key=value` on the first `=`. A bare `key` maps to an empty value.
pub fn split_pair(raw: &str) -> Result<(&str, &str), CoerceError> {
    if raw.is_empty() {
        return Err(CoerceError::EmptyPair);
    }
    Ok(raw.split_once('=').unwrap_or((raw, "")))
}

fn mismatch(raw: &str, kind: &Kind) -> CoerceError {
    CoerceError::TypeMismatch {
        raw: raw.to_string(),
        expected: kind.expected(),
    }
}

fn overflow(raw: &str, kind: &Kind) -> CoerceError {
    CoerceError::ValueOverflow {
        raw: raw.to_string(),
        expected: kind.to_string(),
    }
}

fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw {
        "" | "true" | "yes" | "y" => Ok(true),
        "false" | "none" | "no" | "not" | "n" => Ok(false),
        _ => raw
            .parse::<i64>()
            .map(|n| n != 0)
            .map_err(|_| mismatch(raw, &Kind::Bool)),
    }
}

fn parse_int(raw: &str, width: IntKind) -> Result<i64, CoerceError> {
    let kind = Kind::Int(width);
    let value = raw.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => overflow(raw, &kind),
        _ => mismatch(raw, &kind),
    })?;
    let (min, max) = width.bounds();
    if value < min || value > max {
        return Err(overflow(raw, &kind));
    }
    Ok(value)
}

fn parse_uint(raw: &str, width: UintKind) -> Result<u64, CoerceError> {
    let kind = Kind::Uint(width);
    let value = raw.parse::<u64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => overflow(raw, &kind),
        _ => mismatch(raw, &kind),
    })?;
    if value > width.max() {
        return Err(overflow(raw, &kind));
    }
    Ok(value)
}

fn parse_float(raw: &str, width: FloatKind) -> Result<f64, CoerceError> {
    let kind = Kind::Float(width);
    let value = raw.parse::<f64>().map_err(|_| mismatch(raw, &kind))?;
    let max = width.max_magnitude();
    // NaN fails both comparisons and is reported as out of range
    if !(value >= -max && value <= max) {
        return Err(overflow(raw, &kind));
    }
    Ok(value)
}
