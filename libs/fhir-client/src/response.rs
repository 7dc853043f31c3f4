use crate::{ClientError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use zunder_models::Resource;

/// A server response: status, raw headers (names lower-cased) and the body
/// parsed as JSON when it is JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct FhirResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl FhirResponse {
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: Option<Value>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(status, error = %e, "Response body is not JSON");
                    None
                }
            }
        };
        Ok(Self::new(status, headers, body))
    }

    /// Status is `200 OK`, the only success code for read and search.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.header("last-modified")
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.get("resourceType"))
            .and_then(Value::as_str)
    }

    /// Logical id of the returned resource.
    pub fn id(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.get("id"))
            .and_then(Value::as_str)
    }

    /// Decode the body as `R`.
    pub fn resource<R: Resource>(&self) -> Result<R> {
        let body = self.body.clone().ok_or(ClientError::MissingBody)?;
        Ok(R::from_value(body)?)
    }
}
