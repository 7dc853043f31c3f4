use crate::catalog::{catalog, descriptor, CaseDescriptor, CaseKind, BASELINE_CASE};
use crate::report::{CaseOutcome, CaseStatus, ReportHeader, SuiteReport};
use crate::{cases, SuiteContext, UnknownCase};
use chrono::Utc;
use std::collections::BTreeSet;
use std::time::Instant;
use zunder_client::FhirClient;
use zunder_models::CapabilityStatement;

pub const SUITE_ID: &str = "ArgonautSprint1Test";
pub const SUITE_DESCRIPTION: &str = "Argonaut Sprint 1 tests: read patient by ID, \
     search for patients by various demographics.";
pub const SUITE_TAGS: &[&str] = &["argonaut"];

#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    /// Fetch `metadata` first and skip cases whose required interactions the
    /// server does not declare.
    pub check_capabilities: bool,
    selected: Option<BTreeSet<&'static str>>,
}

impl SuiteOptions {
    pub fn with_capability_check(mut self, enabled: bool) -> Self {
        self.check_capabilities = enabled;
        self
    }

    /// Restrict the run to `ids`. The baseline read is always kept when any
    /// case is selected; an empty list selects everything.
    pub fn with_cases<I, S>(mut self, ids: I) -> Result<Self, UnknownCase>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = BTreeSet::new();
        for id in ids {
            let id = id.as_ref();
            let case = descriptor(id).ok_or_else(|| UnknownCase(id.to_string()))?;
            selected.insert(case.id);
        }
        if selected.is_empty() {
            self.selected = None;
        } else {
            selected.insert(BASELINE_CASE);
            self.selected = Some(selected);
        }
        Ok(self)
    }

    pub fn is_selected(&self, case_id: &str) -> bool {
        self.selected
            .as_ref()
            .map_or(true, |selected| selected.contains(case_id))
    }
}

/// Runs the Patient read/search cases, in catalog order, against one server.
pub struct ConformanceSuite<'a, C: FhirClient + ?Sized> {
    client: &'a C,
    server: String,
    patient_id: String,
    options: SuiteOptions,
}

impl<'a, C: FhirClient + ?Sized> ConformanceSuite<'a, C> {
    pub fn new(
        client: &'a C,
        server: impl Into<String>,
        patient_id: impl Into<String>,
        options: SuiteOptions,
    ) -> Self {
        Self {
            client,
            server: server.into(),
            patient_id: patient_id.into(),
            options,
        }
    }

    /// Execute every case once. Each run starts from a fresh context, so a
    /// suite can be run repeatedly.
    pub async fn run(&self) -> SuiteReport {
        let header = ReportHeader {
            suite_id: SUITE_ID.to_string(),
            description: SUITE_DESCRIPTION.to_string(),
            tags: SUITE_TAGS.iter().map(|t| t.to_string()).collect(),
            server: self.server.clone(),
            patient_id: self.patient_id.clone(),
            started_at: Utc::now(),
        };
        tracing::info!(
            suite = SUITE_ID,
            server = %self.server,
            patient_id = %self.patient_id,
            "Starting conformance suite"
        );

        let mut ctx = SuiteContext::new(self.patient_id.as_str());
        let mut suite_warnings = Vec::new();
        let capabilities = if self.options.check_capabilities {
            self.load_capabilities(&mut suite_warnings).await
        } else {
            None
        };

        let mut outcomes = Vec::with_capacity(catalog().len());
        for case in catalog() {
            let outcome = self.run_case(case, &mut ctx, capabilities.as_ref()).await;
            log_outcome(&outcome);
            outcomes.push(outcome);
        }

        let report = SuiteReport::new(header, suite_warnings, outcomes);
        tracing::info!(
            passed = report.summary.passed,
            failed = report.summary.failed,
            errors = report.summary.errors,
            skipped = report.summary.skipped,
            "Conformance suite finished"
        );
        report
    }

    async fn run_case(
        &self,
        case: &CaseDescriptor,
        ctx: &mut SuiteContext,
        capabilities: Option<&CapabilityStatement>,
    ) -> CaseOutcome {
        if !self.options.is_selected(case.id) {
            return CaseOutcome::skipped(case, "Not selected");
        }
        if let Some(cs) = capabilities {
            let missing = missing_interactions(cs, case);
            if !missing.is_empty() {
                return CaseOutcome::skipped(
                    case,
                    format!("Server does not declare: {}", missing.join(", ")),
                );
            }
        }

        let started = Instant::now();
        let mut warnings = Vec::new();
        let result = match case.kind {
            CaseKind::Read => {
                let result = cases::read_baseline(self.client, ctx, &mut warnings).await;
                if let Err(failure) = &result {
                    ctx.fail(failure.to_string());
                }
                result
            }
            CaseKind::Search { param, form } => {
                cases::search_by(self.client, ctx, param, form).await
            }
        };
        CaseOutcome::from_result(case, &result, warnings, started.elapsed())
    }

    async fn load_capabilities(&self, warnings: &mut Vec<String>) -> Option<CapabilityStatement> {
        let result = match self.client.capabilities().await {
            Ok(reply) if reply.is_ok() => reply
                .resource::<CapabilityStatement>()
                .map_err(|e| e.to_string()),
            Ok(reply) => Err(format!("status {}", reply.status)),
            Err(e) => Err(e.to_string()),
        };
        match result {
            Ok(cs) => Some(cs),
            Err(reason) => {
                let message =
                    format!("CapabilityStatement unavailable ({reason}); not gating cases on it");
                tracing::warn!(reason = %reason, "CapabilityStatement unavailable");
                warnings.push(message);
                None
            }
        }
    }
}

/// Required interactions of `case` that `cs` does not declare, as
/// `"<type> <code>"`.
fn missing_interactions(cs: &CapabilityStatement, case: &CaseDescriptor) -> Vec<String> {
    case.requires
        .iter()
        .flat_map(|cap| {
            cap.methods
                .iter()
                .filter(|m| !cs.supports(cap.resource, m.code()))
                .map(move |m| format!("{} {}", cap.resource, m.code()))
        })
        .collect()
}

fn log_outcome(outcome: &CaseOutcome) {
    let message = outcome.message.as_deref().unwrap_or_default();
    match outcome.status {
        CaseStatus::Pass | CaseStatus::Skip => tracing::info!(
            case = %outcome.case_id,
            status = %outcome.status,
            duration_ms = outcome.duration_ms,
            detail = message,
            "Case finished"
        ),
        CaseStatus::Fail | CaseStatus::Error => tracing::warn!(
            case = %outcome.case_id,
            status = %outcome.status,
            kind = ?outcome.failure_kind,
            duration_ms = outcome.duration_ms,
            detail = message,
            "Case finished"
        ),
    }
}
