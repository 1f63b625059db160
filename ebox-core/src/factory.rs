//! Box factories
//!
//! The single place where raw API records become typed descriptors. A record
//! either converts completely or the factory returns a
//! [`ModelConversionError`]; callers never see a half-built box.

use serde_json::{Map, Value as JsonValue};

use crate::domain::boxes::{BoxDescriptor, BoxKind, GenericBox, PolicyBox, ScriptBox};
use crate::domain::provider::ProviderType;
use crate::error::ModelConversionError;

/// Template value marking a CloudFormation policy
pub const CLOUD_FORMATION_TEMPLATE: &str = "cloudformation";

/// Builds a typed value from one raw box record
pub trait BoxFactory {
    type Output;

    fn create(&self, record: &JsonValue) -> Result<Self::Output, ModelConversionError>;
}

/// Dispatches on the discriminator: policy, script or generic
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericBoxFactory;

/// Accepts only policy records
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyBoxFactory;

/// Accepts only script records
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptBoxFactory;

impl BoxFactory for GenericBoxFactory {
    type Output = BoxDescriptor;

    fn create(&self, record: &JsonValue) -> Result<BoxDescriptor, ModelConversionError> {
        let fields = as_object(record)?;
        let id = record_id(fields)?;

        match discriminator(fields, &id)? {
            BoxKind::Policy => Ok(BoxDescriptor::Policy(build_policy(fields, id)?)),
            BoxKind::Script => Ok(BoxDescriptor::Script(ScriptBox {
                name: record_name(fields, &id)?,
                id,
                raw: fields.clone(),
            })),
            kind => Ok(BoxDescriptor::Generic(GenericBox {
                name: record_name(fields, &id)?,
                id,
                kind,
                raw: fields.clone(),
            })),
        }
    }
}

impl BoxFactory for PolicyBoxFactory {
    type Output = PolicyBox;

    fn create(&self, record: &JsonValue) -> Result<PolicyBox, ModelConversionError> {
        let fields = as_object(record)?;
        let id = record_id(fields)?;

        match discriminator(fields, &id)? {
            BoxKind::Policy => build_policy(fields, id),
            other => Err(ModelConversionError::UnexpectedKind {
                id,
                expected: BoxKind::Policy.to_string(),
                actual: other.to_string(),
            }),
        }
    }
}

impl BoxFactory for ScriptBoxFactory {
    type Output = ScriptBox;

    fn create(&self, record: &JsonValue) -> Result<ScriptBox, ModelConversionError> {
        let fields = as_object(record)?;
        let id = record_id(fields)?;

        match discriminator(fields, &id)? {
            BoxKind::Script => Ok(ScriptBox {
                name: record_name(fields, &id)?,
                id,
                raw: fields.clone(),
            }),
            other => Err(ModelConversionError::UnexpectedKind {
                id,
                expected: BoxKind::Script.to_string(),
                actual: other.to_string(),
            }),
        }
    }
}

/// Kind of a raw record, if it can be determined
///
/// Used by the classification predicates, which only need to peek.
pub fn record_kind(record: &JsonValue) -> Option<BoxKind> {
    let fields = record.as_object()?;
    let id = fields.get("id").and_then(JsonValue::as_str).unwrap_or_default();
    discriminator(fields, id).ok()
}

fn build_policy(
    fields: &Map<String, JsonValue>,
    id: String,
) -> Result<PolicyBox, ModelConversionError> {
    let template = match fields.get("template") {
        Some(JsonValue::String(template)) => template,
        Some(_) => {
            return Err(ModelConversionError::MalformedField {
                id,
                field: "template",
                reason: "expected a string".to_string(),
            });
        }
        None => return Err(ModelConversionError::MissingField { id, field: "template" }),
    };

    let provider_type = match fields.get("provider_type") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(label)) => Some(ProviderType::parse(label)),
        Some(_) => {
            return Err(ModelConversionError::MalformedField {
                id,
                field: "provider_type",
                reason: "expected a string".to_string(),
            });
        }
    };

    Ok(PolicyBox {
        is_cloud_formation_template: template.eq_ignore_ascii_case(CLOUD_FORMATION_TEMPLATE),
        provider_type,
        name: record_name(fields, &id)?,
        id,
        raw: fields.clone(),
    })
}

fn as_object(record: &JsonValue) -> Result<&Map<String, JsonValue>, ModelConversionError> {
    record.as_object().ok_or(ModelConversionError::NotAnObject)
}

fn record_id(fields: &Map<String, JsonValue>) -> Result<String, ModelConversionError> {
    match fields.get("id") {
        Some(JsonValue::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(ModelConversionError::MissingId),
    }
}

fn record_name(
    fields: &Map<String, JsonValue>,
    id: &str,
) -> Result<Option<String>, ModelConversionError> {
    match fields.get("name") {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(name)) => Ok(Some(name.clone())),
        Some(_) => Err(ModelConversionError::MalformedField {
            id: id.to_string(),
            field: "name",
            reason: "expected a string".to_string(),
        }),
    }
}

/// `schema` wins over `kind`; the kind is the schema URL's last segment.
fn discriminator(
    fields: &Map<String, JsonValue>,
    id: &str,
) -> Result<BoxKind, ModelConversionError> {
    let value = match (fields.get("schema"), fields.get("kind")) {
        (Some(JsonValue::String(schema)), _) => schema
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default(),
        (Some(_), _) => {
            return Err(ModelConversionError::MalformedField {
                id: id.to_string(),
                field: "schema",
                reason: "expected a schema URL".to_string(),
            });
        }
        (None, Some(JsonValue::String(kind))) => kind.as_str(),
        (None, Some(_)) => {
            return Err(ModelConversionError::MalformedField {
                id: id.to_string(),
                field: "kind",
                reason: "expected a string".to_string(),
            });
        }
        (None, None) => "",
    };

    if value.is_empty() {
        return Err(ModelConversionError::MissingDiscriminator { id: id.to_string() });
    }

    Ok(BoxKind::parse(value))
}
