//! Error types for zone lifecycle operations

use thiserror::Error;

use crate::controller::AdapterError;
use cap_model::ZoneType;

pub type ZoneResult<T> = Result<T, ZoneError>;

/// Failures surfaced by the zone lifecycle manager.
///
/// Validation and not-found failures are terminal and produce no mutation.
/// A controller failure after a partially completed external sequence is
/// passed through verbatim; already-created external resources are not
/// rolled back.
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("{message}")]
    MalformedRequest { message: String },

    #[error("required property {property} is missing or does not carry exactly one entry")]
    PropertyMissing { property: &'static str },

    #[error("{resource} data for uri {uri} not found")]
    NotFound { resource: &'static str, uri: String },

    #[error("{resource} already exists with name {name}")]
    AlreadyExists { resource: &'static str, name: String },

    #[error("zone {uri} cannot be deleted as there are dependent resources still tied to it")]
    CannotDelete { uri: String },

    #[error("no handler implemented for zone type {zone_type}")]
    NotImplemented { zone_type: ZoneType },

    #[error("fabric controller error: {0}")]
    Controller(#[from] AdapterError),
}
