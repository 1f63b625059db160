//! Variable binding types
//!
//! Deploy steps carry their box variables as a serialized JSON list. A
//! variable of type `Binding` holds a reference to another step instead of
//! literal data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::BindingError;

/// Variable type marking a reference to another step's instance
pub const BINDING_TYPE: &str = "Binding";

/// A single box variable sent with a deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub name: String,

    #[serde(rename = "type")]
    pub variable_type: String,

    pub value: String,

    /// Box in the deployed stack the variable belongs to.
    /// `None` and `Some("")` are different things to the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Fields not modeled here, passed through as received
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl VariableBinding {
    pub fn new(
        name: impl Into<String>,
        variable_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            variable_type: variable_type.into(),
            value: value.into(),
            scope: None,
            extra: Map::new(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Whether the value references another step rather than literal data
    pub fn is_binding(&self) -> bool {
        self.variable_type == BINDING_TYPE
    }

    /// Parses the serialized variable list of a deploy step
    ///
    /// A blank string is an empty list.
    pub fn parse_list(serialized: &str) -> Result<Vec<Self>, BindingError> {
        if serialized.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(serialized)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_keeps_unknown_fields() {
        let parsed = VariableBinding::parse_list(
            r#"[{"name":"db","type":"Binding","value":"ebox.steps.DeployBox-1","scope":"","visibility":"public"}]"#,
        )
        .unwrap();

        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].is_binding());
        assert_eq!(parsed[0].scope.as_deref(), Some(""));
        assert_eq!(parsed[0].extra.get("visibility"), Some(&JsonValue::from("public")));
    }

    #[test]
    fn test_parse_list_blank_is_empty() {
        assert!(VariableBinding::parse_list("").unwrap().is_empty());
        assert!(VariableBinding::parse_list("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_list_rejects_garbage() {
        assert!(VariableBinding::parse_list("{not json").is_err());
        assert!(VariableBinding::parse_list(r#"[{"name":"x"}]"#).is_err());
    }

    #[test]
    fn test_missing_scope_is_not_serialized() {
        let binding = VariableBinding::new("port", "Port", "8080");
        let json = serde_json::to_value(&binding).unwrap();
        assert!(json.get("scope").is_none());
        assert_eq!(json["type"], "Port");

        let scoped = binding.with_scope("");
        let json = serde_json::to_value(&scoped).unwrap();
        assert_eq!(json["scope"], "");
    }
}
