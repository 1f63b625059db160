//! Variable binding resolver
//!
//! Rewrites the variables of a deploy step so bindings that reference an
//! earlier step carry that step's instance id instead.

use crate::domain::binding::VariableBinding;
use crate::domain::instance::InstanceProvider;

/// Prefix shared by the keys of every instance-providing step
pub const PROVIDER_KEY_PREFIX: &str = "ebox.steps.";

/// Resolves step references and drops empty scopes
///
/// For each `Binding` variable whose value is a step key, the first provider
/// with that key supplies the instance id. A reference no provider answers
/// is passed through unchanged so the platform can reject it. Binding order
/// is preserved and `providers` is only read.
pub fn resolve_bindings(
    bindings: &[VariableBinding],
    providers: &[&dyn InstanceProvider],
) -> Vec<VariableBinding> {
    bindings
        .iter()
        .map(|binding| {
            let mut resolved = binding.clone();

            if resolved.is_binding() && resolved.value.starts_with(PROVIDER_KEY_PREFIX) {
                let instance_id = providers
                    .iter()
                    .find(|provider| provider.provider_key() == resolved.value)
                    .and_then(|provider| provider.resolved_instance_id());

                if let Some(instance_id) = instance_id {
                    resolved.value = instance_id.to_string();
                }
            }

            if resolved.scope.as_deref() == Some("") {
                resolved.scope = None;
            }

            resolved
        })
        .collect()
}
