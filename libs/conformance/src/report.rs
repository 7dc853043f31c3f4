//! Run results: one outcome per case plus a suite-level summary.

use crate::catalog::{CaseDescriptor, Capability};
use crate::{CaseFailure, FailureKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Pass,
    Fail,
    Error,
    Skip,
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStatus::Pass => "PASS",
            CaseStatus::Fail => "FAIL",
            CaseStatus::Error => "ERROR",
            CaseStatus::Skip => "SKIP",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    pub case_id: String,
    pub title: String,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub links: Vec<String>,
    pub validates: Vec<Capability>,
    pub duration_ms: u64,
}

impl CaseOutcome {
    fn base(descriptor: &CaseDescriptor, status: CaseStatus) -> Self {
        Self {
            case_id: descriptor.id.to_string(),
            title: descriptor.title.to_string(),
            status,
            failure_kind: None,
            message: None,
            warnings: Vec::new(),
            links: descriptor.links.clone(),
            validates: descriptor.validates.clone(),
            duration_ms: 0,
        }
    }

    pub fn skipped(descriptor: &CaseDescriptor, reason: impl Into<String>) -> Self {
        Self {
            message: Some(reason.into()),
            ..Self::base(descriptor, CaseStatus::Skip)
        }
    }

    pub fn from_result(
        descriptor: &CaseDescriptor,
        result: &Result<(), CaseFailure>,
        warnings: Vec<String>,
        elapsed: Duration,
    ) -> Self {
        let mut outcome = match result {
            Ok(()) => Self::base(descriptor, CaseStatus::Pass),
            Err(failure) => {
                let status = match failure {
                    CaseFailure::Transport(_) => CaseStatus::Error,
                    _ => CaseStatus::Fail,
                };
                Self {
                    failure_kind: failure.kind(),
                    message: Some(failure.to_string()),
                    ..Self::base(descriptor, status)
                }
            }
        };
        outcome.warnings = warnings;
        outcome.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        outcome
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub warnings: usize,
}

impl Summary {
    fn of(outcomes: &[CaseOutcome], suite_warnings: usize) -> Self {
        let count = |status: CaseStatus| outcomes.iter().filter(|o| o.status == status).count();
        Self {
            total: outcomes.len(),
            passed: count(CaseStatus::Pass),
            failed: count(CaseStatus::Fail),
            errors: count(CaseStatus::Error),
            skipped: count(CaseStatus::Skip),
            warnings: suite_warnings + outcomes.iter().map(|o| o.warnings.len()).sum::<usize>(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub suite_id: String,
    pub description: String,
    pub tags: Vec<String>,
    pub server: String,
    pub patient_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub summary: Summary,
    pub outcomes: Vec<CaseOutcome>,
}

/// Suite-level fields known before the cases run.
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub suite_id: String,
    pub description: String,
    pub tags: Vec<String>,
    pub server: String,
    pub patient_id: String,
    pub started_at: DateTime<Utc>,
}

impl SuiteReport {
    pub fn new(header: ReportHeader, warnings: Vec<String>, outcomes: Vec<CaseOutcome>) -> Self {
        let summary = Summary::of(&outcomes, warnings.len());
        Self {
            run_id: Uuid::new_v4(),
            suite_id: header.suite_id,
            description: header.description,
            tags: header.tags,
            server: header.server,
            patient_id: header.patient_id,
            started_at: header.started_at,
            finished_at: Utc::now(),
            warnings,
            summary,
            outcomes,
        }
    }

    /// No case failed or errored.
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0 && self.summary.errors == 0
    }

    pub fn outcome(&self, case_id: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.case_id == case_id)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} against {} (patient {})",
            self.suite_id, self.server, self.patient_id
        )?;
        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        for o in &self.outcomes {
            write!(f, "  {:<5}  {}  {}", o.status, o.case_id, o.title)?;
            if let Some(message) = &o.message {
                match o.failure_kind {
                    Some(kind) => write!(f, "  [{}] {message}", kind_label(kind))?,
                    None => write!(f, "  {message}")?,
                }
            }
            writeln!(f)?;
            for warning in &o.warnings {
                writeln!(f, "         warning: {warning}")?;
            }
        }
        let s = &self.summary;
        write!(
            f,
            "{} cases: {} passed, {} failed, {} errors, {} skipped, {} warnings",
            s.total, s.passed, s.failed, s.errors, s.skipped, s.warnings
        )
    }
}

fn kind_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::SetupDefect => "setup",
        FailureKind::Protocol => "protocol",
        FailureKind::DataMismatch => "mismatch",
    }
}
