//! Static case catalog: identifiers, titles, documentation links and the
//! capabilities each case requires and validates.
//!
//! The table only carries metadata. The runner consults `requires` for the
//! optional capability gate; nothing else here affects execution.

use serde::Serialize;
use std::sync::LazyLock;
use zunder_client::{SearchForm, SearchParam};

pub const REST_SPEC_LINK: &str = "https://hl7.org/fhir/R4/http.html";
pub const BASE_SPEC_LINK: &str = "https://hl7.org/fhir/R4";

pub const RESOURCE_TYPE: &str = "Patient";
pub const BASELINE_CASE: &str = "AS001";

/// FHIR REST interaction a case relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    Read,
    Search,
}

impl Interaction {
    /// Code used in `CapabilityStatement.rest.resource.interaction.code`.
    pub fn code(self) -> &'static str {
        match self {
            Interaction::Read => "read",
            Interaction::Search => "search-type",
        }
    }

    /// Anchor of the interaction in the RESTful API page.
    pub fn anchor(self) -> &'static str {
        match self {
            Interaction::Read => "read",
            Interaction::Search => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capability {
    pub resource: &'static str,
    pub methods: Vec<Interaction>,
}

impl Capability {
    fn patient(methods: &[Interaction]) -> Self {
        Self {
            resource: RESOURCE_TYPE,
            methods: methods.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CaseKind {
    /// Direct read that captures the baseline patient.
    Read,
    Search {
        param: SearchParam,
        form: SearchForm,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: CaseKind,
    pub links: Vec<String>,
    pub requires: Vec<Capability>,
    pub validates: Vec<Capability>,
}

const SEARCH_CASES: [(&str, &str, SearchParam, SearchForm); 12] = [
    ("AS002", "Search by ID", SearchParam::Identifier, SearchForm::Keyword),
    ("AS003", "ID without search keyword", SearchParam::Identifier, SearchForm::Shorthand),
    ("AS004", "Search by Name", SearchParam::Name, SearchForm::Keyword),
    ("AS005", "Name without search keyword", SearchParam::Name, SearchForm::Shorthand),
    ("AS006", "Search by Family", SearchParam::Family, SearchForm::Keyword),
    ("AS007", "Family without search keyword", SearchParam::Family, SearchForm::Shorthand),
    ("AS008", "Search by Given", SearchParam::Given, SearchForm::Keyword),
    ("AS009", "Given without search keyword", SearchParam::Given, SearchForm::Shorthand),
    ("AS010", "Search by Gender", SearchParam::Gender, SearchForm::Keyword),
    ("AS011", "Gender without search keyword", SearchParam::Gender, SearchForm::Shorthand),
    ("AS012", "Search by Birthdate", SearchParam::Birthdate, SearchForm::Keyword),
    ("AS013", "Birthdate without search keyword", SearchParam::Birthdate, SearchForm::Shorthand),
];

static CATALOG: LazyLock<Vec<CaseDescriptor>> = LazyLock::new(build_catalog);

fn build_catalog() -> Vec<CaseDescriptor> {
    let resource_page = format!("{BASE_SPEC_LINK}/{}.html", RESOURCE_TYPE.to_lowercase());

    let mut cases = vec![CaseDescriptor {
        id: BASELINE_CASE,
        title: "Get patient by ID",
        kind: CaseKind::Read,
        links: vec![format!("{REST_SPEC_LINK}#{}", Interaction::Read.anchor())],
        requires: vec![Capability::patient(&[Interaction::Read, Interaction::Search])],
        validates: vec![Capability::patient(&[Interaction::Read, Interaction::Search])],
    }];

    cases.extend(SEARCH_CASES.iter().map(|&(id, title, param, form)| CaseDescriptor {
        id,
        title,
        kind: CaseKind::Search { param, form },
        links: vec![
            format!("{REST_SPEC_LINK}#{}", Interaction::Search.anchor()),
            resource_page.clone(),
        ],
        requires: vec![Capability::patient(&[Interaction::Search])],
        validates: vec![Capability::patient(&[Interaction::Search])],
    }));

    cases
}

/// All cases in execution order.
pub fn catalog() -> &'static [CaseDescriptor] {
    &CATALOG
}

pub fn descriptor(id: &str) -> Option<&'static CaseDescriptor> {
    catalog().iter().find(|c| c.id == id)
}
