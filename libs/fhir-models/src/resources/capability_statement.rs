//! FHIR CapabilityStatement (only the parts needed to tell which
//! interactions a server declares per resource type)

use crate::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatement {
    /// Resource type - always "CapabilityStatement"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_version: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rest: Vec<CapabilityRest>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapabilityRest {
    /// client | server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<CapabilityResource>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityResource {
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interaction: Vec<ResourceInteraction>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInteraction {
    /// read | vread | update | patch | delete | history-instance |
    /// history-type | create | search-type
    pub code: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_resource_type() -> String {
    CapabilityStatement::TYPE.to_string()
}

impl Resource for CapabilityStatement {
    const TYPE: &'static str = "CapabilityStatement";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl CapabilityStatement {
    /// Whether any server-mode `rest` entry declares `interaction` for
    /// `resource_type`. A missing `mode` is treated as server.
    pub fn supports(&self, resource_type: &str, interaction: &str) -> bool {
        self.rest
            .iter()
            .filter(|rest| rest.mode.as_deref().unwrap_or("server") == "server")
            .flat_map(|rest| rest.resource.iter())
            .filter(|res| res.type_ == resource_type)
            .flat_map(|res| res.interaction.iter())
            .any(|i| i.code == interaction)
    }
}
