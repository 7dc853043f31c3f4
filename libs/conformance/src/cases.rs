//! The two case bodies: the baseline read and the single-parameter search.

use crate::assertions::{
    assert_bundle_response, assert_response_ok, check_content_type, check_last_modified,
};
use crate::{CaseFailure, SuiteContext};
use zunder_client::{FhirClient, SearchForm, SearchParam, SearchRequest};
use zunder_models::{equals_ignoring, Patient, Resource, IDENTITY_IGNORED};

const WRONG_PATIENT: &str = "Server returned wrong patient.";

/// Value of `param` on the baseline, as the search cases query it.
pub fn expected_value(patient: &Patient, param: SearchParam) -> Option<&str> {
    match param {
        SearchParam::Identifier => patient.first_identifier_value(),
        SearchParam::Name | SearchParam::Family => patient.first_family(),
        SearchParam::Given => patient.first_given(),
        SearchParam::Gender => patient.gender(),
        SearchParam::Birthdate => patient.birth_date(),
    }
}

/// Read the target patient and capture it as the baseline.
pub(crate) async fn read_baseline<C: FhirClient + ?Sized>(
    client: &C,
    ctx: &mut SuiteContext,
    warnings: &mut Vec<String>,
) -> Result<(), CaseFailure> {
    let reply = client.read(Patient::TYPE, ctx.patient_id()).await?;
    assert_response_ok(&reply)?;

    if reply.id() != Some(ctx.patient_id()) {
        return Err(CaseFailure::Mismatch(format!(
            "{WRONG_PATIENT} Expected id '{}', found {}",
            ctx.patient_id(),
            reply
                .id()
                .map(|id| format!("'{id}'"))
                .unwrap_or_else(|| "none".to_string())
        )));
    }

    let patient: Patient = reply.resource()?;
    warnings.extend(check_content_type(&reply));
    warnings.extend(check_last_modified(&reply));

    tracing::debug!(patient_id = %ctx.patient_id(), "Baseline patient captured");
    ctx.capture(patient);
    Ok(())
}

/// Search by one demographic field of the baseline and expect the baseline back.
pub(crate) async fn search_by<C: FhirClient + ?Sized>(
    client: &C,
    ctx: &SuiteContext,
    param: SearchParam,
    form: SearchForm,
) -> Result<(), CaseFailure> {
    let baseline = ctx.baseline().ok_or_else(|| {
        CaseFailure::Setup(format!(
            "No {param} for patient: baseline patient was not captured"
        ))
    })?;

    let request = SearchRequest::new(
        Patient::TYPE,
        param,
        expected_value(baseline, param),
        form,
    )?;
    tracing::debug!(request = %request, "Searching");

    let reply = client.search(&request).await?;
    assert_response_ok(&reply)?;
    let bundle = assert_bundle_response(&reply)?;

    match bundle.get_by_id::<Patient>(ctx.patient_id()) {
        Some(found) if equals_ignoring(&found, baseline, IDENTITY_IGNORED) => Ok(()),
        Some(_) => Err(CaseFailure::Mismatch(format!(
            "{WRONG_PATIENT} Patient '{}' in the search result differs from the one returned by read",
            ctx.patient_id()
        ))),
        None => Err(CaseFailure::Mismatch(format!(
            "{WRONG_PATIENT} Patient '{}' not among {} search result entries",
            ctx.patient_id(),
            bundle.entry.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zunder_models::{HumanName, Identifier};

    #[test]
    fn expected_values_follow_first_elements() {
        let patient = Patient {
            identifier: vec![Identifier::new(None, "A1"), Identifier::new(None, "B2")],
            name: vec![
                HumanName::new("Smith", &["Eve", "Ann"]),
                HumanName::new("Jones", &["Kay"]),
            ],
            gender: Some("female".to_string()),
            birth_date: Some("1980-02-29".to_string()),
            ..Patient::default()
        };

        assert_eq!(expected_value(&patient, SearchParam::Identifier), Some("A1"));
        assert_eq!(expected_value(&patient, SearchParam::Name), Some("Smith"));
        assert_eq!(expected_value(&patient, SearchParam::Family), Some("Smith"));
        assert_eq!(expected_value(&patient, SearchParam::Given), Some("Eve"));
        assert_eq!(expected_value(&patient, SearchParam::Gender), Some("female"));
        assert_eq!(
            expected_value(&patient, SearchParam::Birthdate),
            Some("1980-02-29")
        );

        for param in SearchParam::ALL {
            assert_eq!(expected_value(&Patient::default(), param), None);
        }
    }
}
