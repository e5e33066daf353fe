//! Custom decoder capability.
//!
//! A [`FieldParser`] takes over coercion for one bound field entirely: the
//! binder hands it the field and the last raw value, and its outcome is
//! returned as-is. Any closure `Fn(&mut T, &str) -> Result<(), DecodeError>`
//! is a parser. [`JsonParser`] and [`JsonFileParser`] decode JSON from the
//! raw value or from the file it names.

use std::fs;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Parses a raw string into a field of type `T`.
pub trait FieldParser<T> {
    fn parse(&self, target: &mut T, raw: &str) -> Result<(), DecodeError>;
}

impl<T, F> FieldParser<T> for F
where
    F: Fn(&mut T, &str) -> Result<(), DecodeError>,
{
    fn parse(&self, target: &mut T, raw: &str) -> Result<(), DecodeError> {
        self(target, raw)
    }
}

/// Decodes the raw value as JSON.
pub struct JsonParser<T>(PhantomData<fn() -> T>);

impl<T> JsonParser<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> FieldParser<T> for JsonParser<T> {
    fn parse(&self, target: &mut T, raw: &str) -> Result<(), DecodeError> {
        *target = serde_json::from_str(raw)?;
        Ok(())
    }
}

/// Treats the raw value as a path and decodes the file's contents as JSON.
pub struct JsonFileParser<T>(PhantomData<fn() -> T>);

impl<T> JsonFileParser<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonFileParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> FieldParser<T> for JsonFileParser<T> {
    fn parse(&self, target: &mut T, raw: &str) -> Result<(), DecodeError> {
        let content = fs::read_to_string(raw)?;
        *target = serde_json::from_str(&content)?;
        Ok(())
    }
}
