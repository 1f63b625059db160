//! Box classification criteria
//!
//! Each criterion scans a raw box collection, keeps the records that belong
//! to its bucket and builds them with the matching factory. Output order is
//! input order and the input is never modified.
//!
//! Over well-formed records the buckets partition the collection: a box is
//! either a policy box or lands in `NoPolicyBoxes`, and a policy box is
//! either a CloudFormation template or not.

use serde_json::Value as JsonValue;

use crate::domain::boxes::{BoxDescriptor, BoxKind, PolicyBox};
use crate::error::ModelConversionError;
use crate::factory::{BoxFactory, GenericBoxFactory, PolicyBoxFactory, record_kind};

/// Selects the records of one bucket out of a raw collection
pub trait BoxCriteria {
    type Output;

    fn select(&self, records: &[JsonValue]) -> Result<Vec<Self::Output>, ModelConversionError>;
}

/// Every box that is not a policy box
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPolicyBoxes;

/// Boxes that are neither policy nor application boxes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPolicyAndNoApplicationBoxes;

/// Policy boxes whose template is a CloudFormation template
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudFormationPolicyBoxes;

/// Policy boxes whose template is anything else
#[derive(Debug, Clone, Copy, Default)]
pub struct NonCloudFormationPolicyBoxes;

impl BoxCriteria for NoPolicyBoxes {
    type Output = BoxDescriptor;

    fn select(&self, records: &[JsonValue]) -> Result<Vec<BoxDescriptor>, ModelConversionError> {
        records
            .iter()
            .filter(|record| !is_policy(record))
            .map(|record| GenericBoxFactory.create(record))
            .collect()
    }
}

impl BoxCriteria for NoPolicyAndNoApplicationBoxes {
    type Output = BoxDescriptor;

    fn select(&self, records: &[JsonValue]) -> Result<Vec<BoxDescriptor>, ModelConversionError> {
        records
            .iter()
            .filter(|record| {
                !matches!(
                    record_kind(record),
                    Some(BoxKind::Policy) | Some(BoxKind::Application)
                )
            })
            .map(|record| GenericBoxFactory.create(record))
            .collect()
    }
}

impl BoxCriteria for CloudFormationPolicyBoxes {
    type Output = PolicyBox;

    fn select(&self, records: &[JsonValue]) -> Result<Vec<PolicyBox>, ModelConversionError> {
        select_policies(records, true)
    }
}

impl BoxCriteria for NonCloudFormationPolicyBoxes {
    type Output = PolicyBox;

    fn select(&self, records: &[JsonValue]) -> Result<Vec<PolicyBox>, ModelConversionError> {
        select_policies(records, false)
    }
}

fn is_policy(record: &JsonValue) -> bool {
    record_kind(record) == Some(BoxKind::Policy)
}

// Every policy record is built, so a malformed one fails both policy buckets.
fn select_policies(
    records: &[JsonValue],
    cloud_formation: bool,
) -> Result<Vec<PolicyBox>, ModelConversionError> {
    let mut selected = Vec::new();
    for record in records.iter().filter(|record| is_policy(record)) {
        let policy = PolicyBoxFactory.create(record)?;
        if policy.is_cloud_formation_template == cloud_formation {
            selected.push(policy);
        }
    }
    Ok(selected)
}
