//! Search request construction.
//!
//! A [`SearchRequest`] is a single `param=value` filter on one resource type
//! plus the wire form to send it in. Both forms are equivalent per the REST
//! API; servers are expected to answer them identically:
//!
//! ```text
//! Keyword:   POST [base]/Patient/_search   (body: family=Smith)
//! Shorthand: GET  [base]/Patient?family=Smith
//! ```

use crate::{ClientError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Demographic Patient search parameters covered by the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchParam {
    Name,
    Family,
    Given,
    Identifier,
    Gender,
    Birthdate,
}

impl SearchParam {
    pub const ALL: [SearchParam; 6] = [
        SearchParam::Name,
        SearchParam::Family,
        SearchParam::Given,
        SearchParam::Identifier,
        SearchParam::Gender,
        SearchParam::Birthdate,
    ];

    /// Parameter code as sent on the wire.
    pub fn code(self) -> &'static str {
        match self {
            SearchParam::Name => "name",
            SearchParam::Family => "family",
            SearchParam::Given => "given",
            SearchParam::Identifier => "identifier",
            SearchParam::Gender => "gender",
            SearchParam::Birthdate => "birthdate",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == s)
    }
}

impl fmt::Display for SearchParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which of the two equivalent search URLs to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchForm {
    /// `POST [base]/[type]/_search` with a form-encoded body
    Keyword,
    /// `GET [base]/[type]?params`
    Shorthand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    resource_type: String,
    param: SearchParam,
    value: String,
    form: SearchForm,
}

impl SearchRequest {
    /// Build a single-parameter search.
    ///
    /// An absent or blank `value` is rejected: it means the record the value
    /// was taken from lacks the element, and sending an empty filter would
    /// test nothing.
    pub fn new(
        resource_type: impl Into<String>,
        param: SearchParam,
        value: Option<&str>,
        form: SearchForm,
    ) -> Result<Self> {
        let value = value
            .filter(|v| !v.trim().is_empty())
            .ok_or(ClientError::EmptySearchValue { param })?;

        Ok(Self {
            resource_type: resource_type.into(),
            param,
            value: value.to_string(),
            form,
        })
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn param(&self) -> SearchParam {
        self.param
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn form(&self) -> SearchForm {
        self.form
    }

    pub fn method(&self) -> Method {
        match self.form {
            SearchForm::Keyword => Method::POST,
            SearchForm::Shorthand => Method::GET,
        }
    }

    /// Path relative to the server base.
    pub fn path(&self) -> String {
        match self.form {
            SearchForm::Keyword => format!("{}/_search", self.resource_type),
            SearchForm::Shorthand => self.resource_type.clone(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        vec![(self.param.code(), self.value.as_str())]
    }

    /// Encoded `param=value` string, as it appears in a URL or form body.
    pub fn encoded_query(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            SearchForm::Keyword => write!(
                f,
                "{} {} [{}]",
                self.method(),
                self.path(),
                self.encoded_query()
            ),
            SearchForm::Shorthand => {
                write!(f, "{} {}?{}", self.method(), self.path(), self.encoded_query())
            }
        }
    }
}
