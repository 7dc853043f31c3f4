//! Async FHIR REST client for the interactions the conformance runner uses:
//! instance `read`, type-level `search` and `capabilities`.
//!
//! The [`FhirClient`] trait is the seam the conformance suite is written
//! against; [`HttpFhirClient`] is the reqwest-backed implementation.
//! Non-success HTTP statuses are returned as ordinary [`FhirResponse`]s so the
//! caller can judge them; only transport failures are errors.

mod client;
mod error;
mod http;
mod response;
pub mod search;

pub use client::FhirClient;
pub use error::{ClientError, Result};
pub use http::HttpFhirClient;
pub use response::FhirResponse;
pub use search::{SearchForm, SearchParam, SearchRequest};

/// Media type requested from servers and expected back.
pub const FHIR_JSON: &str = "application/fhir+json";
