//! FHIR Bundle, as returned by search interactions

use crate::{find_by_id, Resource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Resource type - always "Bundle"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// searchset | batch | transaction | history | ...
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_resource_type() -> String {
    Bundle::TYPE.to_string()
}

impl Resource for Bundle {
    const TYPE: &'static str = "Bundle";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Bundle {
    pub fn searchset(resources: impl IntoIterator<Item = Value>) -> Self {
        let entry: Vec<BundleEntry> = resources
            .into_iter()
            .map(|resource| BundleEntry {
                resource: Some(resource),
                ..BundleEntry::default()
            })
            .collect();
        Self {
            resource_type: default_resource_type(),
            id: None,
            type_: Some("searchset".to_string()),
            total: Some(entry.len() as u64),
            entry,
            extra: Map::new(),
        }
    }

    pub fn is_searchset(&self) -> bool {
        self.type_.as_deref() == Some("searchset")
    }

    /// Raw entry resources whose `resourceType` is `R::TYPE`.
    pub fn resources_of<R: Resource>(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entry
            .iter()
            .filter_map(|e| e.resource.as_ref())
            .filter(|r| r.get("resourceType").and_then(Value::as_str) == Some(R::TYPE))
    }

    /// Entry resources of type `R` that decode; the rest are skipped.
    pub fn decoded<R: Resource>(&self) -> Vec<R> {
        self.resources_of::<R>()
            .filter_map(|r| R::from_value(r.clone()).ok())
            .collect()
    }

    /// Decode the entry resource of type `R` with logical id `id`.
    ///
    /// A server returning a broken copy of the record is indistinguishable
    /// from one not returning it.
    pub fn get_by_id<R: Resource + Clone>(&self, id: &str) -> Option<R> {
        find_by_id(&self.decoded::<R>(), id).cloned()
    }
}
