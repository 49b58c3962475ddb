use serde::{Deserialize, Serialize};

fn default_kind() -> String {
    "function".to_string()
}

/// Tool declaration in the OpenAI function-calling layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionModel {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// json schema of the arguments, `{"type": "object", "properties": ..., "required": [...]}`
    #[serde(default)]
    pub parameters: serde_json::Value,
    /// name of a registered handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_to: Option<String>,
}
