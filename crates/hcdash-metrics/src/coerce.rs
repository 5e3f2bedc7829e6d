//! Numeric coercion of form submissions
//!
//! Forms post flat objects whose numeric fields arrive either as JSON
//! numbers or as strings. Every declared field is checked against its kind;
//! anything malformed is reported, never stored.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
}

/// A field a metric form must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key of the field
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::new(name, FieldKind::Float)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

/// A field that failed coercion, with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidField {
    pub field: String,
    pub reason: String,
}

impl InvalidField {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}

impl std::fmt::Display for InvalidField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

impl std::error::Error for InvalidField {}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Valid(Number),
    Invalid(InvalidField),
}

/// Coerce one raw JSON value to the kind `spec` declares
pub fn coerce_field(raw: Option<&Value>, spec: &FieldSpec) -> FieldValue {
    let invalid = |reason: &str| FieldValue::Invalid(InvalidField::new(spec.name, reason));

    let number = match raw {
        None | Some(Value::Null) => return FieldValue::Invalid(InvalidField::missing(spec.name)),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => v,
            None => return invalid("is not a representable number"),
        },
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return invalid("must not be empty");
            }
            match trimmed.parse::<f64>() {
                Ok(v) => v,
                Err(_) => return invalid("is not a number"),
            }
        }
        Some(_) => return invalid("must be a number or numeric string"),
    };

    if !number.is_finite() {
        return invalid("must be finite");
    }

    match spec.kind {
        FieldKind::Float => FieldValue::Valid(Number::Float(number)),
        FieldKind::Int => {
            if number.fract() != 0.0 {
                invalid("must be a whole number")
            } else if number < i32::MIN as f64 || number > i32::MAX as f64 {
                invalid("is out of range")
            } else {
                FieldValue::Valid(Number::Int(number as i64))
            }
        }
    }
}

/// The validated numeric fields of one submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedRecord {
    values: BTreeMap<&'static str, Number>,
}

impl CoercedRecord {
    pub fn get(&self, name: &str) -> Option<Number> {
        self.values.get(name).copied()
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            Number::Int(v) => i32::try_from(v).ok(),
            Number::Float(_) => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).map(|n| n.as_f64())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Coerce every field in `specs` from `raw`.
///
/// Fields not named in `specs` are ignored. On failure every invalid field
/// is returned, not only the first.
pub fn coerce_record(
    raw: &Map<String, Value>,
    specs: &[FieldSpec],
) -> Result<CoercedRecord, Vec<InvalidField>> {
    let mut record = CoercedRecord::default();
    let mut errors = Vec::new();

    for spec in specs {
        match coerce_field(raw.get(spec.name), spec) {
            FieldValue::Valid(n) => {
                record.values.insert(spec.name, n);
            }
            FieldValue::Invalid(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(errors)
    }
}
