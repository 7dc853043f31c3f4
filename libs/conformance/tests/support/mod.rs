//! In-memory FHIR server used to drive the suite without a network.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use zunder_client::{ClientError, FhirClient, FhirResponse, SearchForm, SearchParam, SearchRequest};
use zunder_models::{HumanName, Identifier, Patient};

pub const PATIENT_ID: &str = "p1";

/// What the fake answers for one interaction.
#[derive(Debug, Clone)]
pub enum Canned {
    Reply(FhirResponse),
    Transport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Read(String),
    Search(SearchRequest),
    Metadata,
}

#[derive(Default)]
pub struct FakeServer {
    patients: Vec<Patient>,
    read_reply: Option<Canned>,
    search_replies: HashMap<(SearchParam, SearchForm), Canned>,
    capabilities: Option<Value>,
    bare_headers: bool,
    seen: Mutex<Vec<Seen>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patient(mut self, patient: Patient) -> Self {
        self.patients.push(patient);
        self
    }

    pub fn with_read_reply(mut self, canned: Canned) -> Self {
        self.read_reply = Some(canned);
        self
    }

    pub fn with_search_reply(mut self, param: SearchParam, form: SearchForm, canned: Canned) -> Self {
        self.search_replies.insert((param, form), canned);
        self
    }

    pub fn with_capabilities(mut self, statement: Value) -> Self {
        self.capabilities = Some(statement);
        self
    }

    /// Answer without Content-Type and Last-Modified.
    pub fn without_headers(mut self) -> Self {
        self.bare_headers = true;
        self
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<SearchRequest> {
        self.seen()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Search(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, seen: Seen) {
        self.seen.lock().unwrap().push(seen);
    }

    fn headers(&self) -> BTreeMap<String, String> {
        if self.bare_headers {
            return BTreeMap::new();
        }
        BTreeMap::from([
            ("Content-Type".to_string(), "application/fhir+json; charset=utf-8".to_string()),
            ("Last-Modified".to_string(), "Wed, 01 Jan 2025 00:00:00 GMT".to_string()),
        ])
    }

    fn answer(canned: &Canned) -> zunder_client::Result<FhirResponse> {
        match canned {
            Canned::Reply(reply) => Ok(reply.clone()),
            Canned::Transport => Err(ClientError::InvalidUrl {
                url: "http://unreachable.invalid".to_string(),
                source: url::ParseError::EmptyHost,
            }),
        }
    }
}

fn matches(patient: &Patient, param: SearchParam, value: &str) -> bool {
    match param {
        SearchParam::Identifier => patient
            .identifier
            .iter()
            .any(|i| i.value.as_deref() == Some(value)),
        SearchParam::Name => patient.name.iter().any(|n| {
            n.family.as_deref() == Some(value) || n.given.iter().flatten().any(|g| g == value)
        }),
        SearchParam::Family => patient
            .name
            .iter()
            .any(|n| n.family.as_deref() == Some(value)),
        SearchParam::Given => patient
            .name
            .iter()
            .any(|n| n.given.iter().flatten().any(|g| g == value)),
        SearchParam::Gender => patient.gender.as_deref() == Some(value),
        SearchParam::Birthdate => patient.birth_date.as_deref() == Some(value),
    }
}

#[async_trait]
impl FhirClient for FakeServer {
    async fn read(&self, resource_type: &str, id: &str) -> zunder_client::Result<FhirResponse> {
        self.record(Seen::Read(format!("{resource_type}/{id}")));
        if let Some(canned) = &self.read_reply {
            return Self::answer(canned);
        }
        match self.patients.iter().find(|p| p.id.as_deref() == Some(id)) {
            Some(patient) => Ok(FhirResponse::new(
                200,
                self.headers(),
                Some(serde_json::to_value(patient).unwrap()),
            )),
            None => Ok(not_found(&format!("{resource_type}/{id} is not known"))),
        }
    }

    async fn search(&self, request: &SearchRequest) -> zunder_client::Result<FhirResponse> {
        self.record(Seen::Search(request.clone()));
        if let Some(canned) = self.search_replies.get(&(request.param(), request.form())) {
            return Self::answer(canned);
        }
        let hits = self
            .patients
            .iter()
            .filter(|p| matches(p, request.param(), request.value()))
            .map(|p| serde_json::to_value(p).unwrap());
        Ok(FhirResponse::new(200, self.headers(), Some(searchset(hits))))
    }

    async fn capabilities(&self) -> zunder_client::Result<FhirResponse> {
        self.record(Seen::Metadata);
        match &self.capabilities {
            Some(statement) => Ok(FhirResponse::new(200, self.headers(), Some(statement.clone()))),
            None => Ok(not_found("metadata is not served")),
        }
    }
}

pub fn smith() -> Patient {
    Patient {
        id: Some(PATIENT_ID.to_string()),
        identifier: vec![Identifier::new(Some("urn:oid:1.2.36.146.595.217.0.1"), "12345")],
        name: vec![HumanName::new("Smith", &["John", "Q"])],
        gender: Some("male".to_string()),
        birth_date: Some("1970-01-01".to_string()),
        ..Patient::default()
    }
}

pub fn reply(status: u16, body: Value) -> Canned {
    Canned::Reply(FhirResponse::new(status, BTreeMap::new(), Some(body)))
}

pub fn searchset(resources: impl IntoIterator<Item = Value>) -> Value {
    let entry: Vec<Value> = resources
        .into_iter()
        .map(|resource| json!({ "resource": resource }))
        .collect();
    json!({
        "resourceType": "Bundle",
        "type": "searchset",
        "total": entry.len(),
        "entry": entry,
    })
}

pub fn capability_statement(interactions: &[&str]) -> Value {
    let interaction: Vec<Value> = interactions.iter().map(|c| json!({ "code": c })).collect();
    json!({
        "resourceType": "CapabilityStatement",
        "fhirVersion": "4.0.1",
        "rest": [{
            "mode": "server",
            "resource": [{ "type": "Patient", "interaction": interaction }]
        }]
    })
}

fn not_found(diagnostics: &str) -> FhirResponse {
    FhirResponse::new(
        404,
        BTreeMap::new(),
        Some(json!({
            "resourceType": "OperationOutcome",
            "issue": [{ "severity": "error", "code": "not-found", "diagnostics": diagnostics }]
        })),
    )
}
