//! Tool argument extraction and validation.
//!
//! Arguments arrive as an untyped JSON object. Each lookup is resolved into an
//! [`Extracted`] value (present, missing, or the wrong type) and the
//! [`ParamValidator`] chain copies the good values into a target map while
//! collecting every failure. Nothing short-circuits: a chain with three bad
//! parameters reports all three.
//!
//! ```ignore
//! let mut payload = Arguments::new();
//! let mut v = ParamValidator::new(&args);
//! v.required_int(&mut payload, "amount")
//!     .required_string(&mut payload, "currency")
//!     .optional_string(&mut payload, "receipt");
//! if let Err(errors) = v.finish() {
//!     return errors.into();
//! }
//! ```
//!
//! # Optional values
//!
//! For optional parameters an empty string, a numeric zero, an empty object
//! and an empty array count as "not supplied" and are not written to the
//! target. Booleans are always written when supplied, `false` included.
//! `null` is treated as absent everywhere. Required parameters are only
//! type-checked, so an explicit `""` satisfies a required string.

use crate::protocol::CallToolResult;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Raw tool arguments as received in `tools/call`.
pub type Arguments = Map<String, Value>;

/// Outcome of looking up a single argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Present(T),
    Missing,
    WrongType,
}

/// A JSON shape a parameter can be checked against.
pub trait ArgumentKind: Sized {
    /// Convert a non-null JSON value, or `None` if it has the wrong shape.
    fn extract(value: &Value) -> Option<Self>;

    /// Whether an optional value of this kind counts as not supplied.
    fn is_empty_value(&self) -> bool;

    fn into_value(self) -> Value;
}

impl ArgumentKind for String {
    fn extract(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

/// Integers accept any JSON number without a fractional part, so `100.0`
/// extracts as `100` while `100.5` is the wrong type.
impl ArgumentKind for i64 {
    fn extract(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else {
            return None;
        };
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    }

    fn is_empty_value(&self) -> bool {
        *self == 0
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl ArgumentKind for f64 {
    fn extract(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn is_empty_value(&self) -> bool {
        *self == 0.0
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl ArgumentKind for bool {
    fn extract(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn is_empty_value(&self) -> bool {
        false
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl ArgumentKind for Map<String, Value> {
    fn extract(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn into_value(self) -> Value {
        Value::Object(self)
    }
}

impl ArgumentKind for Vec<Value> {
    fn extract(value: &Value) -> Option<Self> {
        value.as_array().cloned()
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn into_value(self) -> Value {
        Value::Array(self)
    }
}

impl ArgumentKind for Vec<String> {
    fn extract(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(Value::String).collect())
    }
}

/// Look up `name` in `args` and check it against `T`.
pub fn extract<T: ArgumentKind>(args: &Arguments, name: &str) -> Extracted<T> {
    match args.get(name) {
        None | Some(Value::Null) => Extracted::Missing,
        Some(value) => match T::extract(value) {
            Some(v) => Extracted::Present(v),
            None => Extracted::WrongType,
        },
    }
}

/// A single argument failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing required parameter: {0}")]
    Missing(String),

    #[error("invalid parameter type: {0}")]
    InvalidType(String),

    #[error("invalid parameter value: {0}")]
    InvalidValue(String),
}

/// Every failure from one validation pass, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ParamError>);

impl ValidationErrors {
    pub fn push(&mut self, error: ParamError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// One error renders as its own message; several render as a bullet list
/// under a `Validation errors:` header.
impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => Ok(()),
            [single] => write!(f, "{}", single),
            many => {
                write!(f, "Validation errors:")?;
                for error in many {
                    write!(f, "\n- {}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for CallToolResult {
    fn from(errors: ValidationErrors) -> Self {
        CallToolResult::error(errors.to_string())
    }
}

/// Accumulating argument validator.
///
/// Every method records failures and returns `&mut Self` so checks can be
/// chained; a failed check leaves the target untouched.
#[derive(Debug)]
pub struct ParamValidator<'a> {
    args: &'a Arguments,
    errors: ValidationErrors,
}

impl<'a> ParamValidator<'a> {
    pub fn new(args: &'a Arguments) -> Self {
        Self {
            args,
            errors: ValidationErrors::default(),
        }
    }

    /// Require `name` and copy it into `target` under the same key.
    pub fn required<T: ArgumentKind>(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.required_to::<T>(target, name, name)
    }

    /// Require `name` and copy it into `target` under `key`.
    pub fn required_to<T: ArgumentKind>(
        &mut self,
        target: &mut Arguments,
        name: &str,
        key: &str,
    ) -> &mut Self {
        if let Some(value) = self.value::<T>(name) {
            target.insert(key.to_string(), value.into_value());
        }
        self
    }

    /// Copy `name` into `target` if supplied and non-empty.
    pub fn optional<T: ArgumentKind>(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.optional_to::<T>(target, name, name)
    }

    /// Copy `name` into `target` under `key` if supplied and non-empty.
    pub fn optional_to<T: ArgumentKind>(
        &mut self,
        target: &mut Arguments,
        name: &str,
        key: &str,
    ) -> &mut Self {
        if let Some(value) = self.optional_value::<T>(name) {
            target.insert(key.to_string(), value.into_value());
        }
        self
    }

    /// Extract a required value for local use (path segments and the like).
    pub fn value<T: ArgumentKind>(&mut self, name: &str) -> Option<T> {
        match extract::<T>(self.args, name) {
            Extracted::Present(value) => Some(value),
            Extracted::Missing => {
                self.errors.push(ParamError::Missing(name.to_string()));
                None
            }
            Extracted::WrongType => {
                self.errors.push(ParamError::InvalidType(name.to_string()));
                None
            }
        }
    }

    /// Extract an optional value for local use. Empty values come back as `None`.
    pub fn optional_value<T: ArgumentKind>(&mut self, name: &str) -> Option<T> {
        match extract::<T>(self.args, name) {
            Extracted::Present(value) if !value.is_empty_value() => Some(value),
            Extracted::Present(_) | Extracted::Missing => None,
            Extracted::WrongType => {
                self.errors.push(ParamError::InvalidType(name.to_string()));
                None
            }
        }
    }

    /// Extract a required id for use as one URL path segment.
    ///
    /// Unlike other required strings an empty id counts as missing. The
    /// dot segments `.` and `..` are rejected; anything else comes back
    /// percent-encoded so it cannot leave its segment.
    pub fn path_segment(&mut self, name: &str) -> Option<String> {
        let id: String = self.value(name)?;
        match id.as_str() {
            "" => {
                self.errors.push(ParamError::Missing(name.to_string()));
                None
            }
            "." | ".." => {
                self.errors.push(ParamError::InvalidValue(name.to_string()));
                None
            }
            _ => Some(urlencoding::encode(&id).into_owned()),
        }
    }

    pub fn required_string(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.required::<String>(target, name)
    }

    pub fn required_string_to(&mut self, target: &mut Arguments, name: &str, key: &str) -> &mut Self {
        self.required_to::<String>(target, name, key)
    }

    pub fn optional_string(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.optional::<String>(target, name)
    }

    pub fn optional_string_to(&mut self, target: &mut Arguments, name: &str, key: &str) -> &mut Self {
        self.optional_to::<String>(target, name, key)
    }

    pub fn required_int(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.required::<i64>(target, name)
    }

    pub fn optional_int(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.optional::<i64>(target, name)
    }

    pub fn optional_int_to(&mut self, target: &mut Arguments, name: &str, key: &str) -> &mut Self {
        self.optional_to::<i64>(target, name, key)
    }

    pub fn required_float(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.required::<f64>(target, name)
    }

    pub fn optional_float(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.optional::<f64>(target, name)
    }

    pub fn required_bool(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.required::<bool>(target, name)
    }

    pub fn optional_bool(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.optional::<bool>(target, name)
    }

    pub fn optional_bool_to(&mut self, target: &mut Arguments, name: &str, key: &str) -> &mut Self {
        self.optional_to::<bool>(target, name, key)
    }

    pub fn required_map(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.required::<Map<String, Value>>(target, name)
    }

    pub fn optional_map(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.optional::<Map<String, Value>>(target, name)
    }

    pub fn required_array(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.required::<Vec<Value>>(target, name)
    }

    pub fn optional_array(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.optional::<Vec<Value>>(target, name)
    }

    pub fn optional_string_array(&mut self, target: &mut Arguments, name: &str) -> &mut Self {
        self.optional::<Vec<String>>(target, name)
    }

    pub fn optional_string_array_to(
        &mut self,
        target: &mut Arguments,
        name: &str,
        key: &str,
    ) -> &mut Self {
        self.optional_to::<Vec<String>>(target, name, key)
    }

    /// Optional `count` and `skip` list parameters.
    pub fn pagination(&mut self, target: &mut Arguments) -> &mut Self {
        self.optional_int(target, "count").optional_int(target, "skip")
    }

    /// Optional `expand` string array, sent to the API as `expand[]`.
    pub fn expand(&mut self, target: &mut Arguments) -> &mut Self {
        self.optional_string_array_to(target, "expand", "expand[]")
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Finish the pass: `Ok(())` when every check passed.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}
