//! Parameter declarations and JSON Schema rendering.
//!
//! Tools declare their parameters with [`ParamSpec`]; the declarations are
//! rendered into the `inputSchema` advertised by `tools/list`. Constraints
//! such as `minimum` or `pattern` are advertised to the caller only; the
//! handlers themselves check presence and type.

use serde_json::{Map, Value, json};

/// JSON type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    StringArray,
}

impl ParamKind {
    /// The `type` keyword for this kind.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Object => "object",
            ParamKind::Array | ParamKind::StringArray => "array",
        }
    }
}

/// A single declared tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub description: Option<String>,
    pub minimum: Option<Value>,
    pub maximum: Option<Value>,
    pub pattern: Option<String>,
    pub enum_values: Vec<String>,
    pub max_properties: Option<u64>,
}

impl ParamSpec {
    fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            description: None,
            minimum: None,
            maximum: None,
            pattern: None,
            enum_values: Vec::new(),
            max_properties: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Boolean)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Object)
    }

    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Array)
    }

    pub fn string_array(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::StringArray)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn minimum(mut self, minimum: impl Into<Value>) -> Self {
        self.minimum = Some(minimum.into());
        self
    }

    pub fn maximum(mut self, maximum: impl Into<Value>) -> Self {
        self.maximum = Some(maximum.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_properties(mut self, max: u64) -> Self {
        self.max_properties = Some(max);
        self
    }

    /// Render this parameter as a JSON Schema property.
    pub fn to_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.kind.json_type()));

        if let Some(description) = &self.description {
            schema.insert("description".into(), json!(description));
        }
        if self.kind == ParamKind::StringArray {
            schema.insert("items".into(), json!({"type": "string"}));
        }
        if let Some(minimum) = &self.minimum {
            schema.insert("minimum".into(), minimum.clone());
        }
        if let Some(maximum) = &self.maximum {
            schema.insert("maximum".into(), maximum.clone());
        }
        if let Some(pattern) = &self.pattern {
            schema.insert("pattern".into(), json!(pattern));
        }
        if !self.enum_values.is_empty() {
            schema.insert("enum".into(), json!(self.enum_values));
        }
        if let Some(max) = self.max_properties {
            schema.insert("maxProperties".into(), json!(max));
        }

        Value::Object(schema)
    }
}

/// Render a tool's `inputSchema` from its parameter list.
///
/// `required` lists the required parameters in declaration order.
pub fn input_schema(params: &[ParamSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in params {
        properties.insert(param.name.clone(), param.to_schema());
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
