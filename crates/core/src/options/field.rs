//! Field descriptors for the option schema.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::schema::Options;

/// Which side of the input token a field's arguments belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Emitted before the output destination, describing an input source.
    Input,
    /// Emitted after the input group, describing the encoding target.
    Output,
}

/// Container kind of a field, which selects its serialization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Optional boolean switch.
    Flag,
    /// Optional string value.
    Text,
    /// Optional signed integer.
    Int,
    /// Optional unsigned integer.
    UInt,
    /// Ordered sequence of strings.
    List,
    /// Unordered string to string mapping.
    Pairs,
    /// Unordered mapping whose keys are emitted as flags themselves.
    Extra,
}

/// A borrowed view of one field's current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Flag(Option<bool>),
    Text(Option<&'a str>),
    Int(Option<i64>),
    UInt(Option<u32>),
    List(&'a [String]),
    Pairs(&'a HashMap<String, String>),
    Extra(&'a HashMap<String, String>),
}

impl FieldValue<'_> {
    /// Returns the shape this value was read as.
    pub fn shape(&self) -> Shape {
        match self {
            Self::Flag(_) => Shape::Flag,
            Self::Text(_) => Shape::Text,
            Self::Int(_) => Shape::Int,
            Self::UInt(_) => Shape::UInt,
            Self::List(_) => Shape::List,
            Self::Pairs(_) => Shape::Pairs,
            Self::Extra(_) => Shape::Extra,
        }
    }

    /// Whether the field was populated.
    ///
    /// Scalars count as set when present, regardless of value. Collections
    /// count as set when non-empty.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Flag(v) => v.is_some(),
            Self::Text(v) => v.is_some(),
            Self::Int(v) => v.is_some(),
            Self::UInt(v) => v.is_some(),
            Self::List(v) => !v.is_empty(),
            Self::Pairs(v) | Self::Extra(v) => !v.is_empty(),
        }
    }
}

/// Static description of one option field.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    /// Field identifier as it appears on [`Options`].
    pub name: &'static str,
    /// Command-line flag. `None` for extra-argument maps, whose keys are the flags.
    pub flag: Option<&'static str>,
    pub shape: Shape,
    pub scope: Scope,
    /// Reads the field out of an option set.
    pub read: for<'a> fn(&'a Options) -> FieldValue<'a>,
}

impl FieldDescriptor {
    /// Reads this field's value from `options`.
    pub fn value<'a>(&self, options: &'a Options) -> FieldValue<'a> {
        (self.read)(options)
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("flag", &self.flag)
            .field("shape", &self.shape)
            .field("scope", &self.scope)
            .finish()
    }
}
