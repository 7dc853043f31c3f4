//! FHIR Patient resource
//!
//! Typed access to the demographic elements the search checks rely on.
//! All accessors are non-panicking and return `None` when an element is
//! absent or empty.

use crate::common::complex::{HumanName, Identifier, Narrative};
use crate::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Resource type - always "Patient"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    /// male | female | other | unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_resource_type() -> String {
    Patient::TYPE.to_string()
}

impl Default for Patient {
    fn default() -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            text: None,
            identifier: Vec::new(),
            name: Vec::new(),
            gender: None,
            birth_date: None,
            extra: Map::new(),
        }
    }
}

impl Resource for Patient {
    const TYPE: &'static str = "Patient";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Patient {
    /// `identifier[0].value`
    pub fn first_identifier_value(&self) -> Option<&str> {
        self.identifier
            .first()
            .and_then(|i| i.value.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// `name[0].family`
    pub fn first_family(&self) -> Option<&str> {
        self.name
            .first()
            .and_then(|n| n.family.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// First non-null `name[0].given`
    pub fn first_given(&self) -> Option<&str> {
        self.name
            .first()
            .and_then(HumanName::first_given)
            .filter(|v| !v.is_empty())
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref().filter(|v| !v.is_empty())
    }

    pub fn birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_r4_patient_and_keeps_unknown_elements() {
        let value = json!({
            "resourceType": "Patient",
            "id": "example",
            "active": true,
            "identifier": [{ "system": "urn:oid:1.2.36.146.595.217.0.1", "value": "12345" }],
            "name": [{ "use": "official", "family": "Chalmers", "given": ["Peter", "James"] }],
            "gender": "male",
            "birthDate": "1974-12-25"
        });

        let patient = Patient::from_value(value.clone()).unwrap();
        assert_eq!(patient.id(), Some("example"));
        assert_eq!(patient.first_identifier_value(), Some("12345"));
        assert_eq!(patient.first_family(), Some("Chalmers"));
        assert_eq!(patient.first_given(), Some("Peter"));
        assert_eq!(patient.gender(), Some("male"));
        assert_eq!(patient.birth_date(), Some("1974-12-25"));
        assert_eq!(patient.extra.get("active"), Some(&json!(true)));
        assert_eq!(patient.to_value().unwrap(), value);
    }

    #[test]
    fn accessors_are_none_for_missing_or_empty_elements() {
        let patient = Patient {
            name: vec![HumanName {
                family: Some(String::new()),
                ..HumanName::default()
            }],
            ..Patient::default()
        };
        assert_eq!(patient.first_identifier_value(), None);
        assert_eq!(patient.first_family(), None);
        assert_eq!(patient.first_given(), None);
        assert_eq!(patient.gender(), None);
        assert_eq!(patient.birth_date(), None);
    }

    #[test]
    fn rejects_other_resource_types() {
        let err = Patient::from_value(json!({ "resourceType": "Bundle" })).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::UnexpectedResourceType { found, .. } if found == "Bundle"
        ));
        assert!(matches!(
            Patient::from_value(json!({ "id": "x" })),
            Err(crate::Error::MissingResourceType)
        ));
    }

    #[test]
    fn null_given_placeholders_decode_and_round_trip() {
        let value = json!({
            "resourceType": "Patient",
            "id": "ext",
            "name": [{
                "family": "Smith",
                "given": [null, "John", null],
                "_given": [{ "extension": [] }, null, { "extension": [] }]
            }]
        });

        let patient = Patient::from_value(value.clone()).unwrap();
        assert_eq!(patient.first_given(), Some("John"));
        assert_eq!(patient.name[0].given.len(), 3);
        assert_eq!(patient.to_value().unwrap(), value);
    }

    #[test]
    fn dstu2_family_array_reduces_to_first_entry() {
        let patient = Patient::from_value(json!({
            "resourceType": "Patient",
            "id": "legacy",
            "name": [{ "family": ["Van", "Houten"], "given": ["Ann"] }]
        }))
        .unwrap();
        assert_eq!(patient.first_family(), Some("Van"));

        let empty = Patient::from_value(json!({
            "resourceType": "Patient",
            "name": [{ "family": [] }]
        }))
        .unwrap();
        assert_eq!(empty.first_family(), None);
    }

    #[test]
    fn partial_narrative_does_not_block_decoding() {
        let patient = Patient::from_value(json!({
            "resourceType": "Patient",
            "id": "n",
            "text": { "div": "<div>x</div>", "id": "t1" }
        }))
        .unwrap();
        let text = patient.text.unwrap();
        assert_eq!(text.status, None);
        assert_eq!(text.div.as_deref(), Some("<div>x</div>"));
        assert_eq!(text.extra.get("id"), Some(&json!("t1")));
    }
}
