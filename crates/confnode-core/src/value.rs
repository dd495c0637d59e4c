//! Leaf values and leaf types
//!
//! Values are what a `Node` hands back from a field read and accepts on a
//! field write. Types are declared on leaf definitions and used to coerce
//! decoded documents and schema defaults.

use serde_json::Value as Json;

/// Type of a leaf or leaf-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int,
    UInt,
    Decimal,
    Bool,
    Enumeration(Vec<String>),
}

/// A single leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    UInt(u64),
    Decimal(f64),
    Bool(bool),
    Enum(String),
    /// Value of a leaf-list
    List(Vec<Value>),
}

impl ValueType {
    /// Parse a type name as used in schema definitions
    pub fn from_name(name: &str, enumeration: &[String]) -> Option<Self> {
        match name {
            "string" => Some(ValueType::String),
            "int8" | "int16" | "int32" | "int64" | "int" => Some(ValueType::Int),
            "uint8" | "uint16" | "uint32" | "uint64" | "uint" => Some(ValueType::UInt),
            "decimal64" | "decimal" => Some(ValueType::Decimal),
            "boolean" | "bool" => Some(ValueType::Bool),
            "enumeration" if !enumeration.is_empty() => {
                Some(ValueType::Enumeration(enumeration.to_vec()))
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int64",
            ValueType::UInt => "uint64",
            ValueType::Decimal => "decimal64",
            ValueType::Bool => "boolean",
            ValueType::Enumeration(_) => "enumeration",
        }
    }

    /// Coerce a decoded JSON scalar into a value of this type
    ///
    /// Numbers may arrive as JSON strings (64-bit integers are quoted in
    /// RESTCONF JSON), booleans may arrive as `"true"`/`"false"`.
    ///
    /// # Errors
    ///
    /// Returns a short description of what was found when the value does not fit.
    pub fn coerce(&self, json: &Json) -> std::result::Result<Value, String> {
        let found = || describe(json);
        match (self, json) {
            (ValueType::String, Json::String(s)) => Ok(Value::String(s.clone())),
            (ValueType::Int, Json::Number(n)) => n.as_i64().map(Value::Int).ok_or_else(found),
            (ValueType::Int, Json::String(s)) => s.parse().map(Value::Int).map_err(|_| found()),
            (ValueType::UInt, Json::Number(n)) => n.as_u64().map(Value::UInt).ok_or_else(found),
            (ValueType::UInt, Json::String(s)) => s.parse().map(Value::UInt).map_err(|_| found()),
            (ValueType::Decimal, Json::Number(n)) => {
                n.as_f64().map(Value::Decimal).ok_or_else(found)
            }
            (ValueType::Decimal, Json::String(s)) => {
                s.parse().map(Value::Decimal).map_err(|_| found())
            }
            (ValueType::Bool, Json::Bool(b)) => Ok(Value::Bool(*b)),
            (ValueType::Bool, Json::String(s)) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(found()),
            },
            (ValueType::Enumeration(allowed), Json::String(s)) if allowed.contains(s) => {
                Ok(Value::Enum(s.clone()))
            }
            _ => Err(found()),
        }
    }

    /// Coerce a JSON array into a leaf-list value
    ///
    /// # Errors
    ///
    /// Fails when the input is not an array or any element does not fit.
    pub fn coerce_list(&self, json: &Json) -> std::result::Result<Value, String> {
        let items = json.as_array().ok_or_else(|| describe(json))?;
        items
            .iter()
            .map(|item| self.coerce(item))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::List)
    }

    /// Whether a value written by a client fits this type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::String, Value::String(_))
            | (ValueType::Int, Value::Int(_))
            | (ValueType::UInt, Value::UInt(_))
            | (ValueType::Decimal, Value::Decimal(_))
            | (ValueType::Bool, Value::Bool(_)) => true,
            (ValueType::Enumeration(allowed), Value::Enum(s)) => allowed.contains(s),
            _ => false,
        }
    }
}

fn describe(json: &Json) -> String {
    match json {
        Json::Null => "null".to_string(),
        Json::Array(_) => "array".to_string(),
        Json::Object(_) => "object".to_string(),
        other => other.to_string(),
    }
}

impl Value {
    pub fn to_json(&self) -> Json {
        match self {
            Value::String(s) | Value::Enum(s) => Json::String(s.clone()),
            Value::Int(n) => Json::from(*n),
            Value::UInt(n) => Json::from(*n),
            Value::Decimal(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Bool(b) => Json::Bool(*b),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
        }
    }

    /// Short type label used in mismatch messages
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) => "int64",
            Value::UInt(_) => "uint64",
            Value::Decimal(_) => "decimal64",
            Value::Bool(_) => "boolean",
            Value::Enum(_) => "enumeration",
            Value::List(_) => "leaf-list",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) | Value::Enum(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Decimal(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Render a list key as `k1,k2`
pub fn format_key(key: &[Value]) -> String {
    key.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
