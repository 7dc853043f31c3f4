//! Patient read/search conformance suite.
//!
//! # Flow
//!
//! ```text
//! AS001 read Patient/[id] ──► baseline captured ──► AS002..AS013 search by
//!                                                   identifier, name, family,
//!                                                   given, gender, birthdate
//!                                                   (keyword + shorthand form)
//! ```
//!
//! Cases run sequentially in [`catalog()`] order against any [`FhirClient`].
//! Each search case takes its query value from the baseline patient and
//! expects the same patient back, compared while ignoring `id` and `text`.
//!
//! Failures stay local to the case that raised them. If the baseline read
//! fails, the search cases are still attempted; they fail as setup defects
//! before sending anything, since there is no value to search with.
//!
//! [`FhirClient`]: zunder_client::FhirClient

pub mod assertions;
mod cases;
pub mod catalog;
mod context;
mod error;
pub mod report;
mod suite;

pub use cases::expected_value;
pub use catalog::{catalog, descriptor, CaseDescriptor, CaseKind, Capability, Interaction};
pub use context::{Baseline, SuiteContext};
pub use error::{CaseFailure, FailureKind, UnknownCase};
pub use report::{CaseOutcome, CaseStatus, Summary, SuiteReport};
pub use suite::{ConformanceSuite, SuiteOptions, SUITE_DESCRIPTION, SUITE_ID, SUITE_TAGS};
