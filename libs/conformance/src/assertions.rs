//! Response checks shared by the cases.
//!
//! Hard checks return `CaseFailure`; advisory checks return the warning text
//! and leave it to the caller to record.

use crate::CaseFailure;
use serde_json::Value;
use zunder_client::FhirResponse;
use zunder_models::{Bundle, Resource};

/// Media types accepted for a FHIR resource body (current and DSTU2 forms).
const FHIR_MEDIA_TYPES: &[&str] = &[
    "application/fhir+json",
    "application/json+fhir",
    "application/fhir+xml",
    "application/xml+fhir",
];

pub fn assert_response_ok(reply: &FhirResponse) -> Result<(), CaseFailure> {
    if reply.is_ok() {
        return Ok(());
    }
    let mut message = format!("Bad response code: expected 200, but found {}.", reply.status);
    if let Some(diagnostics) = outcome_diagnostics(reply) {
        message.push_str(&format!(" Server said: {diagnostics}"));
    }
    Err(CaseFailure::Protocol(message))
}

/// The body must be a Bundle; if `Bundle.type` is given it must be `searchset`.
pub fn assert_bundle_response(reply: &FhirResponse) -> Result<Bundle, CaseFailure> {
    match reply.resource_type() {
        Some(found) if found == Bundle::TYPE => {}
        Some(other) => {
            return Err(CaseFailure::Protocol(format!(
                "Expected FHIR Bundle but found: {other}"
            )))
        }
        None => {
            return Err(CaseFailure::Protocol(
                "Expected FHIR Bundle but response has no resource".to_string(),
            ))
        }
    }

    let bundle: Bundle = reply
        .resource()
        .map_err(|e| CaseFailure::Protocol(format!("Malformed Bundle: {e}")))?;

    match bundle.type_.as_deref() {
        None | Some("searchset") => Ok(bundle),
        Some(other) => Err(CaseFailure::Protocol(format!(
            "Expected Bundle of type searchset but found: {other}"
        ))),
    }
}

pub fn check_content_type(reply: &FhirResponse) -> Option<String> {
    let Some(content_type) = reply.content_type() else {
        return Some("Content-Type header not present".to_string());
    };
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if FHIR_MEDIA_TYPES.contains(&media_type.as_str()) {
        None
    } else {
        Some(format!(
            "Content-Type '{content_type}' is not a FHIR resource media type"
        ))
    }
}

pub fn check_last_modified(reply: &FhirResponse) -> Option<String> {
    match reply.last_modified() {
        Some(v) if !v.trim().is_empty() => None,
        _ => Some("Last-Modified header not present".to_string()),
    }
}

/// `issue[*].diagnostics` of an OperationOutcome body, joined.
fn outcome_diagnostics(reply: &FhirResponse) -> Option<String> {
    if reply.resource_type() != Some("OperationOutcome") {
        return None;
    }
    let issues = reply.body.as_ref()?.get("issue")?.as_array()?;
    let diagnostics: Vec<&str> = issues
        .iter()
        .filter_map(|i| i.get("diagnostics").and_then(Value::as_str))
        .collect();
    (!diagnostics.is_empty()).then(|| diagnostics.join("; "))
}
