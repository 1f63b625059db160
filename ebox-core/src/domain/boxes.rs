//! Box domain types
//!
//! A box is a deployable unit on the remote platform. Every descriptor keeps
//! the raw record it was built from, so fields this crate does not model are
//! carried along untouched when a descriptor is serialized again.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::domain::provider::ProviderType;

/// Base URL of the schemas used as box discriminators
pub const SCHEMA_BASE: &str = "http://elasticbox.net/schemas/";

/// Discriminator of a box record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoxKind {
    Script,
    Policy,
    Application,
    /// Any kind this crate has no dedicated model for (docker, template, ...)
    Other(String),
}

impl BoxKind {
    /// Parses a discriminator value, ignoring ASCII case
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "script" => BoxKind::Script,
            "policy" => BoxKind::Policy,
            "application" => BoxKind::Application,
            other => BoxKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BoxKind::Script => "script",
            BoxKind::Policy => "policy",
            BoxKind::Application => "application",
            BoxKind::Other(kind) => kind,
        }
    }

    /// Schema URL the platform uses for this kind
    pub fn schema(&self) -> String {
        format!("{}boxes/{}", SCHEMA_BASE, self.as_str())
    }
}

impl std::fmt::Display for BoxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A box with no kind-specific structure
#[derive(Debug, Clone, PartialEq)]
pub struct GenericBox {
    pub id: String,
    pub kind: BoxKind,
    pub name: Option<String>,
    pub raw: Map<String, JsonValue>,
}

/// A box whose deployment is governed by a policy document
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyBox {
    pub id: String,
    pub name: Option<String>,
    pub is_cloud_formation_template: bool,
    pub provider_type: Option<ProviderType>,
    pub raw: Map<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptBox {
    pub id: String,
    pub name: Option<String>,
    pub raw: Map<String, JsonValue>,
}

/// Typed box descriptor
///
/// Built only through [`crate::factory`], so the variant always agrees with
/// the discriminator found in `raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxDescriptor {
    Generic(GenericBox),
    Policy(PolicyBox),
    Script(ScriptBox),
}

impl BoxDescriptor {
    pub fn id(&self) -> &str {
        match self {
            BoxDescriptor::Generic(b) => &b.id,
            BoxDescriptor::Policy(b) => &b.id,
            BoxDescriptor::Script(b) => &b.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            BoxDescriptor::Generic(b) => b.name.as_deref(),
            BoxDescriptor::Policy(b) => b.name.as_deref(),
            BoxDescriptor::Script(b) => b.name.as_deref(),
        }
    }

    pub fn kind(&self) -> BoxKind {
        match self {
            BoxDescriptor::Generic(b) => b.kind.clone(),
            BoxDescriptor::Policy(_) => BoxKind::Policy,
            BoxDescriptor::Script(_) => BoxKind::Script,
        }
    }

    /// The full record received from the platform
    pub fn raw_fields(&self) -> &Map<String, JsonValue> {
        match self {
            BoxDescriptor::Generic(b) => &b.raw,
            BoxDescriptor::Policy(b) => &b.raw,
            BoxDescriptor::Script(b) => &b.raw,
        }
    }

    pub fn as_policy(&self) -> Option<&PolicyBox> {
        match self {
            BoxDescriptor::Policy(policy) => Some(policy),
            BoxDescriptor::Generic(_) | BoxDescriptor::Script(_) => None,
        }
    }
}

impl From<PolicyBox> for BoxDescriptor {
    fn from(policy: PolicyBox) -> Self {
        BoxDescriptor::Policy(policy)
    }
}

impl Serialize for BoxDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw_fields().serialize(serializer)
    }
}
