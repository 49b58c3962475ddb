//! Loosely typed key/value bag used for action arguments.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// JSON object wrapper with typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vars {
    inner: Map<String, Value>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key, deserialized into `T`.
    ///
    /// Returns `None` when the key is absent or the value has a different shape.
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        self.inner.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set<T: Into<Value>>(
        &mut self,
        key: &str,
        value: T,
    ) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// View as a JSON value without consuming.
    pub fn to_value(&self) -> Value {
        Value::Object(self.inner.clone())
    }
}

impl From<Value> for Vars {
    /// Non-object values yield an empty set.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(inner) => Self {
                inner,
            },
            _ => Self::default(),
        }
    }
}

impl From<Map<String, Value>> for Vars {
    fn from(inner: Map<String, Value>) -> Self {
        Self {
            inner,
        }
    }
}

impl From<Vars> for Value {
    fn from(vars: Vars) -> Self {
        Value::Object(vars.inner)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut vars = Vars::new();
        vars.set("city", "Paris");
        vars.set("days", 3);

        assert_eq!(vars.get::<String>("city"), Some("Paris".to_string()));
        assert_eq!(vars.get::<u32>("days"), Some(3));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_get_wrong_shape() {
        let mut vars = Vars::new();
        vars.set("city", 42);
        assert_eq!(vars.get::<String>("city"), None);
        assert_eq!(vars.get::<String>("missing"), None);
    }

    #[test]
    fn test_from_non_object() {
        assert!(Vars::from(json!([1, 2])).is_empty());
        assert!(Vars::from(Value::Null).is_empty());
    }

    #[test]
    fn test_into_value() {
        let vars = Vars::from(json!({"city": "London"}));
        let value: Value = vars.into();
        assert_eq!(value, json!({"city": "London"}));
    }
}
