//! Instance provider capability
//!
//! A pipeline step that has deployed something exposes the remote instance id
//! so later steps can bind variables to it.

/// Capability of a completed step to answer with the instance it deployed
pub trait InstanceProvider: Send + Sync {
    /// Key other steps use to reference this one
    fn provider_key(&self) -> &str;

    /// Id of the deployed instance, absent until the step has completed
    fn resolved_instance_id(&self) -> Option<&str>;
}

/// Plain provider record, handy when the step itself is not at hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstance {
    pub key: String,
    pub instance_id: Option<String>,
}

impl ResolvedInstance {
    pub fn new(key: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            instance_id: Some(instance_id.into()),
        }
    }

    /// A provider that has not produced an instance yet
    pub fn pending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            instance_id: None,
        }
    }
}

impl InstanceProvider for ResolvedInstance {
    fn provider_key(&self) -> &str {
        &self.key
    }

    fn resolved_instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }
}
