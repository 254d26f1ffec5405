//! Supported value shapes and their canonical string encoding.

use errors::ConfigError;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A configuration value in one of the supported shapes.
///
/// Native Rust values convert through `From`; dynamically typed input
/// (`serde_json::Value`) converts through `TryFrom` and is rejected with
/// `ConfigError::UnsupportedValueType` when it has no matching shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    IntList(Vec<i64>),
    StringList(Vec<String>),
    StringIntMap(BTreeMap<String, i64>),
    StringStringMap(BTreeMap<String, String>),
}

impl ConfigValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float64",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::IntList(_) => "[]int",
            ConfigValue::StringList(_) => "[]string",
            ConfigValue::StringIntMap(_) => "map[string]int",
            ConfigValue::StringStringMap(_) => "map[string]string",
        }
    }

    /// Canonical string form stored locally and remotely.
    ///
    /// Floats are written with six fractional digits, so values needing more
    /// precision lose it. Maps are encoded with sorted keys.
    pub fn encode(&self) -> String {
        match self {
            ConfigValue::String(s) => s.clone(),
            ConfigValue::Int(i) => i.to_string(),
            ConfigValue::Float(f) => format!("{:.6}", f),
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::IntList(list) => {
                Value::Array(list.iter().map(|i| Value::from(*i)).collect()).to_string()
            }
            ConfigValue::StringList(list) => {
                Value::Array(list.iter().map(|s| Value::from(s.as_str())).collect()).to_string()
            }
            ConfigValue::StringIntMap(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(*v)))
                    .collect::<Map<String, Value>>(),
            )
            .to_string(),
            ConfigValue::StringStringMap(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                    .collect::<Map<String, Value>>(),
            )
            .to_string(),
        }
    }
}

/// Parses booleans the lenient way: `1 t T TRUE true True` and their false
/// counterparts.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn unsupported(type_name: &str) -> ConfigError {
    ConfigError::UnsupportedValueType {
        type_name: type_name.to_string(),
    }
}

impl TryFrom<Value> for ConfigValue {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Err(unsupported("null")),
            Value::Bool(b) => Ok(ConfigValue::Bool(b)),
            Value::String(s) => Ok(ConfigValue::String(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ConfigValue::Int(i))
                } else if n.is_f64() {
                    n.as_f64()
                        .map(ConfigValue::Float)
                        .ok_or_else(|| unsupported("number"))
                } else {
                    Err(unsupported("u64 out of int range"))
                }
            }
            Value::Array(items) => {
                if items.iter().all(Value::is_string) {
                    Ok(ConfigValue::StringList(
                        items
                            .into_iter()
                            .filter_map(|v| match v {
                                Value::String(s) => Some(s),
                                _ => None,
                            })
                            .collect(),
                    ))
                } else if items.iter().all(Value::is_i64) {
                    Ok(ConfigValue::IntList(
                        items.iter().filter_map(Value::as_i64).collect(),
                    ))
                } else {
                    Err(unsupported("array of mixed or nested values"))
                }
            }
            Value::Object(fields) => {
                if fields.values().all(Value::is_string) {
                    Ok(ConfigValue::StringStringMap(
                        fields
                            .into_iter()
                            .filter_map(|(k, v)| match v {
                                Value::String(s) => Some((k, s)),
                                _ => None,
                            })
                            .collect(),
                    ))
                } else if fields.values().all(Value::is_i64) {
                    Ok(ConfigValue::StringIntMap(
                        fields
                            .into_iter()
                            .filter_map(|(k, v)| v.as_i64().map(|i| (k, i)))
                            .collect(),
                    ))
                } else {
                    Err(unsupported("object of mixed or nested values"))
                }
            }
        }
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<&String> for ConfigValue {
    fn from(value: &String) -> Self {
        ConfigValue::String(value.clone())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(i64::from(value))
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::Int(i64::from(value))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<Vec<i64>> for ConfigValue {
    fn from(value: Vec<i64>) -> Self {
        ConfigValue::IntList(value)
    }
}

impl From<Vec<i32>> for ConfigValue {
    fn from(value: Vec<i32>) -> Self {
        ConfigValue::IntList(value.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        ConfigValue::StringList(value)
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(value: Vec<&str>) -> Self {
        ConfigValue::StringList(value.into_iter().map(str::to_string).collect())
    }
}

impl From<HashMap<String, i64>> for ConfigValue {
    fn from(value: HashMap<String, i64>) -> Self {
        ConfigValue::StringIntMap(value.into_iter().collect())
    }
}

impl From<BTreeMap<String, i64>> for ConfigValue {
    fn from(value: BTreeMap<String, i64>) -> Self {
        ConfigValue::StringIntMap(value)
    }
}

impl From<HashMap<String, String>> for ConfigValue {
    fn from(value: HashMap<String, String>) -> Self {
        ConfigValue::StringStringMap(value.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for ConfigValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        ConfigValue::StringStringMap(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(ConfigValue::from("hello").encode(), "hello");
        assert_eq!(ConfigValue::from(-42).encode(), "-42");
        assert_eq!(ConfigValue::from(2.75).encode(), "2.750000");
        assert_eq!(ConfigValue::from(true).encode(), "true");
        assert_eq!(ConfigValue::from(false).encode(), "false");
    }

    #[test]
    fn test_encode_float_loses_precision() {
        assert_eq!(ConfigValue::from(0.123_456_789).encode(), "0.123457");
    }

    #[test]
    fn test_encode_composites_as_json() {
        assert_eq!(ConfigValue::from(vec![1, 2, 3]).encode(), "[1,2,3]");
        assert_eq!(
            ConfigValue::from(vec!["what's", "up"]).encode(),
            r#"["what's","up"]"#
        );
        assert_eq!(ConfigValue::from(Vec::<i64>::new()).encode(), "[]");
    }

    #[test]
    fn test_encode_maps_with_sorted_keys() {
        let mut map = HashMap::new();
        map.insert("height".to_string(), 180_i64);
        map.insert("age".to_string(), 18_i64);

        assert_eq!(
            ConfigValue::from(map).encode(),
            r#"{"age":18,"height":180}"#
        );
    }

    #[test]
    fn test_try_from_json_supported_shapes() {
        assert_eq!(
            ConfigValue::try_from(json!(7)).unwrap(),
            ConfigValue::Int(7)
        );
        assert_eq!(
            ConfigValue::try_from(json!(2.5)).unwrap(),
            ConfigValue::Float(2.5)
        );
        assert_eq!(
            ConfigValue::try_from(json!([1, 2])).unwrap(),
            ConfigValue::IntList(vec![1, 2])
        );
        assert_eq!(
            ConfigValue::try_from(json!({"bio": "biu"})).unwrap().type_name(),
            "map[string]string"
        );
        assert_eq!(
            ConfigValue::try_from(json!({"age": 18})).unwrap().type_name(),
            "map[string]int"
        );
    }

    #[test]
    fn test_try_from_json_rejects_unsupported_shapes() {
        for value in [
            json!(null),
            json!([1, "two"]),
            json!([1.5, 2.5]),
            json!([[1], [2]]),
            json!({"nested": {"a": 1}}),
            json!({"mixed": 1, "other": "x"}),
        ] {
            let err = ConfigValue::try_from(value.clone()).unwrap_err();
            assert!(
                matches!(err, ConfigError::UnsupportedValueType { .. }),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_bool_lenient() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Some(true));
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(false));
        }
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
    }
}
