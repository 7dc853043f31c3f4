use crate::{ClientError, FhirClient, FhirResponse, Result, SearchForm, SearchRequest, FHIR_JSON};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use std::time::Duration;

/// reqwest-backed [`FhirClient`] talking to one FHIR base URL.
#[derive(Clone)]
pub struct HttpFhirClient {
    base_url: Url,
    client: reqwest::Client,
    token: Option<String>,
    timeout: Duration,
}

impl HttpFhirClient {
    /// Build a client for `base_url` (e.g. `https://server.example/fhir`).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref();
        let mut url = Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        // `Url::join` replaces the last segment unless the base ends with '/'.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("zunder-conformance/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: url,
            client,
            token: None,
            timeout: Duration::from_secs(30),
        })
    }

    /// Attach a bearer token that will be sent with each request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the request timeout (default 30 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<FhirResponse> {
        let builder = builder.header(ACCEPT, FHIR_JSON).timeout(self.timeout);
        let response = self.apply_auth(builder).send().await?;
        FhirResponse::from_reqwest(response).await
    }
}

#[async_trait]
impl FhirClient for HttpFhirClient {
    async fn read(&self, resource_type: &str, id: &str) -> Result<FhirResponse> {
        let url = self.url(&format!("{resource_type}/{}", urlencoding::encode(id)))?;
        tracing::debug!(method = "GET", url = %url, "FHIR read");
        let response = self.send(self.client.get(url)).await?;
        tracing::debug!(status = response.status, "FHIR read completed");
        Ok(response)
    }

    async fn search(&self, request: &SearchRequest) -> Result<FhirResponse> {
        let url = self.url(&request.path())?;
        tracing::debug!(
            method = %request.method(),
            url = %url,
            query = %request.encoded_query(),
            "FHIR search"
        );
        let builder = match request.form() {
            SearchForm::Keyword => self.client.post(url).form(&request.query_pairs()),
            SearchForm::Shorthand => self.client.get(url).query(&request.query_pairs()),
        };
        let response = self.send(builder).await?;
        tracing::debug!(status = response.status, "FHIR search completed");
        Ok(response)
    }

    async fn capabilities(&self) -> Result<FhirResponse> {
        let url = self.url("metadata")?;
        tracing::debug!(method = "GET", url = %url, "FHIR capabilities");
        self.send(self.client.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = HttpFhirClient::new("http://localhost:8080/fhir").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/fhir/");
        assert_eq!(
            client.url("Patient/_search").unwrap().as_str(),
            "http://localhost:8080/fhir/Patient/_search"
        );

        let client = HttpFhirClient::new("http://localhost:8080/fhir/").unwrap();
        assert_eq!(
            client.url("metadata").unwrap().as_str(),
            "http://localhost:8080/fhir/metadata"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpFhirClient::new("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }
}
