//! Error types for the pure layers

use thiserror::Error;

/// A raw box record could not be turned into a typed descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelConversionError {
    /// The record is not a JSON object
    #[error("box record is not a JSON object")]
    NotAnObject,

    /// The record carries no usable `id`
    #[error("box record has no `id` field")]
    MissingId,

    /// Neither `schema` nor `kind` identifies what sort of box this is
    #[error("box {id} has no kind discriminator")]
    MissingDiscriminator { id: String },

    /// A field required by the box kind is absent
    #[error("box {id} is missing required field `{field}`")]
    MissingField { id: String, field: &'static str },

    /// A field is present but has the wrong shape
    #[error("box {id} has a malformed `{field}` field: {reason}")]
    MalformedField {
        id: String,
        field: &'static str,
        reason: String,
    },

    /// A kind-specific factory was handed a record of another kind
    #[error("box {id} is a {actual} box, expected a {expected} box")]
    UnexpectedKind {
        id: String,
        expected: String,
        actual: String,
    },
}

/// The serialized variable list of a deploy step could not be parsed
#[derive(Debug, Error)]
#[error("invalid variable list: {0}")]
pub struct BindingError(#[from] pub serde_json::Error);

/// A deployment request violates its own invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{0} is required to deploy a box")]
    MissingField(&'static str),

    #[error("number of instances must be a positive number, got {0}")]
    InvalidInstanceCount(u32),
}
