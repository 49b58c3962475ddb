//! Argument schemas of flow actions.
//!
//! Parameters are declared in JSON-schema form and compiled once, when the
//! graph is built. Calls are checked against the compiled validator so a bad
//! schema fails at construction instead of in the middle of a conversation.

use std::{collections::BTreeMap, fmt, sync::Arc};

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{FlowError, Result, common::Vars};

/// JSON type of a parameter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub param_type: ParamType,
    pub required: bool,
    pub description: String,
}

#[derive(Deserialize)]
struct PropertyMetadata {
    #[serde(rename = "type")]
    param_type: ParamType,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Default)]
struct ParametersMetadata {
    #[serde(default)]
    properties: BTreeMap<String, PropertyMetadata>,
    #[serde(default)]
    required: Vec<String>,
}

/// Declared input schema of an action.
#[derive(Clone)]
pub struct ActionSchema {
    params: BTreeMap<String, ParamSpec>,
    document: Value,
    validator: Arc<Validator>,
}

impl ActionSchema {
    /// Schema accepting any object.
    pub fn empty() -> Result<Self> {
        Self::new(BTreeMap::new())
    }

    /// Parse a `{"type": "object", "properties": ..., "required": [...]}` declaration.
    ///
    /// `null` is treated as an action without parameters.
    pub fn from_parameters(parameters: &Value) -> Result<Self> {
        let metadata = match parameters {
            Value::Null => ParametersMetadata::default(),
            _ => serde_json::from_value::<ParametersMetadata>(parameters.clone()).map_err(|e| FlowError::Config(format!("invalid parameters schema: {}", e)))?,
        };

        if let Some(name) = metadata.required.iter().find(|name| !metadata.properties.contains_key(*name)) {
            return Err(FlowError::Config(format!("required parameter '{}' is not declared in properties", name)));
        }

        let params = metadata
            .properties
            .into_iter()
            .map(|(name, property)| {
                let required = metadata.required.contains(&name);
                (
                    name,
                    ParamSpec {
                        param_type: property.param_type,
                        required,
                        description: property.description,
                    },
                )
            })
            .collect();

        Self::new(params)
    }

    pub fn new(params: BTreeMap<String, ParamSpec>) -> Result<Self> {
        let document = Self::document(&params);
        let validator = jsonschema::validator_for(&document).map_err(|e| FlowError::Config(format!("invalid parameters schema: {}", e)))?;

        Ok(Self {
            params,
            document,
            validator: Arc::new(validator),
        })
    }

    fn document(params: &BTreeMap<String, ParamSpec>) -> Value {
        let properties: Map<String, Value> = params
            .iter()
            .map(|(name, spec)| {
                (
                    name.clone(),
                    json!({
                        "type": spec.param_type.as_ref(),
                        "description": spec.description,
                    }),
                )
            })
            .collect();
        let required: Vec<&String> = params.iter().filter(|(_, spec)| spec.required).map(|(name, _)| name).collect();

        let mut document = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            document["required"] = json!(required);
        }
        document
    }

    pub fn params(&self) -> &BTreeMap<String, ParamSpec> {
        &self.params
    }

    /// The schema as a JSON document, as handed to the LLM.
    pub fn document_json(&self) -> &Value {
        &self.document
    }

    /// Check call arguments, collecting every missing or mistyped field.
    pub fn validate(
        &self,
        action: &str,
        args: &Vars,
    ) -> Result<()> {
        let instance = args.to_value();
        let errors: Vec<String> = self.validator.iter_errors(&instance).map(|e| e.to_string()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FlowError::Validation {
                action: action.to_string(),
                errors,
            })
        }
    }
}

impl fmt::Debug for ActionSchema {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ActionSchema").field("params", &self.params).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_schema() -> ActionSchema {
        ActionSchema::from_parameters(&json!({
            "type": "object",
            "properties": {
                "city": {"type": "string", "description": "City name"},
                "days": {"type": "integer"}
            },
            "required": ["city"]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_params() {
        let schema = city_schema();
        let city = &schema.params()["city"];
        assert_eq!(city.param_type, ParamType::String);
        assert!(city.required);
        assert_eq!(city.description, "City name");
        assert!(!schema.params()["days"].required);
    }

    #[test]
    fn test_valid_args() {
        let schema = city_schema();
        let args = Vars::from(json!({"city": "Paris", "days": 2}));
        assert!(schema.validate("get_weather", &args).is_ok());
    }

    #[test]
    fn test_missing_required() {
        let schema = city_schema();
        let err = schema.validate("get_weather", &Vars::new()).unwrap_err();
        match err {
            FlowError::Validation {
                action,
                errors,
            } => {
                assert_eq!(action, "get_weather");
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("city"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mistyped_fields_are_all_listed() {
        let schema = city_schema();
        let args = Vars::from(json!({"city": 12, "days": "two"}));
        let err = schema.validate("get_weather", &args).unwrap_err();
        match err {
            FlowError::Validation {
                errors, ..
            } => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_null_parameters_accept_anything() {
        let schema = ActionSchema::from_parameters(&Value::Null).unwrap();
        assert!(schema.params().is_empty());
        assert!(schema.validate("end_conversation", &Vars::from(json!({"extra": 1}))).is_ok());
    }

    #[test]
    fn test_empty_object_parameters() {
        let schema = ActionSchema::from_parameters(&json!({"type": "object", "properties": {}})).unwrap();
        assert!(schema.document_json().get("required").is_none());
        assert!(schema.validate("end_conversation", &Vars::new()).is_ok());
    }

    #[test]
    fn test_undeclared_required() {
        let err = ActionSchema::from_parameters(&json!({"properties": {}, "required": ["city"]})).unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }

    #[test]
    fn test_unknown_type() {
        let err = ActionSchema::from_parameters(&json!({"properties": {"city": {"type": "text"}}})).unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }
}
