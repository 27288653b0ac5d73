use std::fmt;

use serde::{Deserialize, Serialize};

/// A runtime attribute value supplied by the caller.
///
/// Values arrive untyped from the data layer; the [`AttributeDescriptor`]'s
/// declared data type decides which comparator interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A boolean value.
    Bool(bool),
    /// A 64-bit floating-point number.
    Number(f64),
    /// A UTF-8 string.
    String(String),
    /// A set-valued attribute.
    List(Vec<AttributeValue>),
    /// An explicitly absent value. Comparators treat it like a missing key.
    Null,
}

impl AttributeValue {
    /// Coerce this value to a string for string-typed comparison.
    /// `Null` coerces to the empty string.
    #[must_use]
    pub fn coerce_string(&self) -> String {
        match self {
            AttributeValue::String(s) => s.clone(),
            AttributeValue::Number(n) => n.to_string(),
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::List(items) => items
                .iter()
                .map(AttributeValue::coerce_string)
                .collect::<Vec<_>>()
                .join(","),
            AttributeValue::Null => String::new(),
        }
    }

    /// Interpret this value as a number. Numeric strings parse; everything
    /// else is non-numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret this value as a boolean. Only genuine booleans qualify.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this value counts as empty: `Null`, the empty string, or an
    /// empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::String(s) => s.is_empty(),
            AttributeValue::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl From<i64> for AttributeValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        AttributeValue::Number(v as f64)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(v: Vec<AttributeValue>) -> Self {
        AttributeValue::List(v)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(v) => write!(f, "\"{v}\""),
            AttributeValue::Null => write!(f, "null"),
            other => write!(f, "{}", other.coerce_string()),
        }
    }
}

/// Where an attribute's runtime value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeScope {
    /// On the end-user record (the default scope).
    User,
    /// On the user's company record.
    Company,
    /// On the user's membership record within a company.
    Membership,
}

/// How an attribute's values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeDataType {
    Number,
    String,
    Bool,
    List,
    DateTime,
}

/// Caller-supplied metadata describing one attribute: its identity, the key
/// its runtime value is stored under, its scope, and its comparison type.
///
/// The engine never mutates descriptors; it only resolves them by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    pub id: String,
    pub code_name: String,
    pub data_type: AttributeDataType,
    pub scope: AttributeScope,
}

impl AttributeDescriptor {
    #[must_use]
    pub fn new(
        id: &str,
        code_name: &str,
        data_type: AttributeDataType,
        scope: AttributeScope,
    ) -> Self {
        Self {
            id: id.to_owned(),
            code_name: code_name.to_owned(),
            data_type,
            scope,
        }
    }
}
