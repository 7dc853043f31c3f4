//! FHIR resource models used by the Patient conformance runner.
//!
//! Only the elements the checks read are typed; everything else a server
//! returns is kept in a flattened `extra` map so that deep comparisons see
//! the whole resource. No validation happens here, just data representation
//! and safe accessors.

pub mod accessor;
pub mod common;
mod error;
pub mod resources;

pub use accessor::{equals_ignoring, find_by_id, values_equal_ignoring, IDENTITY_IGNORED};
pub use common::complex::{HumanName, Identifier, Narrative};
pub use error::{Error, Result};
pub use resources::bundle::{Bundle, BundleEntry};
pub use resources::capability_statement::{
    CapabilityResource, CapabilityRest, CapabilityStatement, ResourceInteraction,
};
pub use resources::patient::Patient;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A FHIR resource with a fixed `resourceType`.
pub trait Resource: Serialize + DeserializeOwned {
    /// Value of `resourceType` for this resource.
    const TYPE: &'static str;

    /// Logical id, if the resource carries one.
    fn id(&self) -> Option<&str>;

    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode a resource, checking `resourceType` first so that a Bundle or
    /// OperationOutcome is reported as such instead of as a field error.
    fn from_value(value: Value) -> Result<Self> {
        match value.get("resourceType").and_then(Value::as_str) {
            Some(found) if found == Self::TYPE => Ok(serde_json::from_value(value)?),
            Some(found) => Err(Error::UnexpectedResourceType {
                expected: Self::TYPE,
                found: found.to_string(),
            }),
            None => Err(Error::MissingResourceType),
        }
    }
}
