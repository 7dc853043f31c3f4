use crate::{FhirResponse, Result, SearchRequest};
use async_trait::async_trait;

/// The FHIR REST interactions the conformance suite exercises.
#[async_trait]
pub trait FhirClient: Send + Sync {
    /// `GET [base]/[type]/[id]`
    async fn read(&self, resource_type: &str, id: &str) -> Result<FhirResponse>;

    /// Type-level search in the wire form selected by the request.
    async fn search(&self, request: &SearchRequest) -> Result<FhirResponse>;

    /// `GET [base]/metadata`
    async fn capabilities(&self) -> Result<FhirResponse>;
}
