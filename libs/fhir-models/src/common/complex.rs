//! FHIR complex types shared across resources
//!
//! Each type keeps unknown elements in `extra` so that a resource decoded from
//! a server response serializes back to the same JSON.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier - business identifier assigned to a resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>, // usual | official | temp | secondary | old

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identifier {
    pub fn new(system: Option<&str>, value: &str) -> Self {
        Self {
            system: system.map(str::to_string),
            value: Some(value.to_string()),
            ..Self::default()
        }
    }
}

/// HumanName - name of a person
///
/// `family` is a single string in R4; the DSTU2 array form is accepted and
/// reduced to its first entry. `given` may hold `null` placeholders whose
/// content lives in `_given` extensions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>, // usual | official | temp | nickname | anonymous | old | maiden

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(
        default,
        deserialize_with = "string_or_first",
        skip_serializing_if = "Option::is_none"
    )]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<Option<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HumanName {
    pub fn new(family: &str, given: &[&str]) -> Self {
        Self {
            family: Some(family.to_string()),
            given: given.iter().map(|g| Some(g.to_string())).collect(),
            ..Self::default()
        }
    }

    /// First non-null `given`.
    pub fn first_given(&self) -> Option<&str> {
        self.given.iter().flatten().next().map(String::as_str)
    }
}

/// Narrative - human readable summary of a resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>, // generated | extensions | additional | empty

    #[serde(skip_serializing_if = "Option::is_none")]
    pub div: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Either a single string or an array of (possibly null) strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<Option<String>>),
}

fn string_or_first<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => Some(s),
        Some(OneOrMany::Many(values)) => values.into_iter().flatten().next(),
        None => None,
    })
}
