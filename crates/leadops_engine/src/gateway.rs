use std::time::Duration;

use leadops_core::{Job, LeadId, LeadPage, LeadQuery, Stats, TaskId};
use leadops_logging::leadops_debug;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::wire::{self, BulkDeleteRequest, JobWire, LeadPageWire, ScrapeRequest, StatsWire};
use crate::{FailureKind, GatewayError};

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// The remote leads/jobs service.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn create_job(&self, keywords: &[String], locations: &[String])
        -> Result<Job, GatewayError>;

    async fn job_status(&self, task_id: &TaskId) -> Result<Job, GatewayError>;

    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage, GatewayError>;

    async fn list_keywords(&self) -> Result<Vec<String>, GatewayError>;

    async fn stats(&self) -> Result<Stats, GatewayError>;

    async fn delete_lead(&self, id: &LeadId) -> Result<(), GatewayError>;

    async fn bulk_delete(&self, ids: &[LeadId]) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| GatewayError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // Keep any path prefix when joining endpoint segments.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GatewayError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|err| GatewayError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn leads_url(&self, query: &LeadQuery) -> Result<Url, GatewayError> {
        let mut url = self.endpoint("leads/all")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("limit", &query.page_size.to_string());
            let search = query.search.trim();
            if !search.is_empty() {
                pairs.append_pair("search", search);
            }
            if let Some(keyword) = query.keyword.as_deref().filter(|kw| !kw.is_empty()) {
                pairs.append_pair("keyword", keyword);
            }
        }
        Ok(url)
    }

    /// Sends a request and returns the body of a successful answer.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, GatewayError> {
        leadops_debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::new(FailureKind::NotFound, status.to_string()));
        }
        if !status.is_success() {
            return Err(GatewayError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl Gateway for ReqwestGateway {
    async fn create_job(
        &self,
        keywords: &[String],
        locations: &[String],
    ) -> Result<Job, GatewayError> {
        let body = to_value(&ScrapeRequest {
            keywords,
            locations,
        })?;
        let url = self.endpoint("scrape")?;
        let bytes = self.send(Method::POST, url, Some(body)).await?;
        wire::parse::<JobWire>(&bytes)?.into_job(None)
    }

    async fn job_status(&self, task_id: &TaskId) -> Result<Job, GatewayError> {
        let url = self.endpoint(&format!("status/{}", encode_segment(task_id.as_str())))?;
        let bytes = self.send(Method::GET, url, None).await?;
        wire::parse::<JobWire>(&bytes)?.into_job(Some(task_id))
    }

    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage, GatewayError> {
        let url = self.leads_url(query)?;
        let bytes = self.send(Method::GET, url, None).await?;
        wire::parse::<LeadPageWire>(&bytes)?.into_page(query.page)
    }

    async fn list_keywords(&self) -> Result<Vec<String>, GatewayError> {
        let url = self.endpoint("keywords")?;
        let bytes = self.send(Method::GET, url, None).await?;
        let keywords: Vec<Option<String>> = wire::parse(&bytes)?;
        Ok(keywords
            .into_iter()
            .flatten()
            .filter(|kw| !kw.trim().is_empty())
            .collect())
    }

    async fn stats(&self) -> Result<Stats, GatewayError> {
        let url = self.endpoint("stats")?;
        let bytes = self.send(Method::GET, url, None).await?;
        Ok(wire::parse::<StatsWire>(&bytes)?.into())
    }

    async fn delete_lead(&self, id: &LeadId) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("leads/{}", encode_segment(id.as_str())))?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn bulk_delete(&self, ids: &[LeadId]) -> Result<(), GatewayError> {
        let body = to_value(&BulkDeleteRequest {
            lead_ids: ids.iter().map(LeadId::as_str).collect(),
        })?;
        let url = self.endpoint("leads/bulk-delete")?;
        self.send(Method::POST, url, Some(body)).await?;
        Ok(())
    }
}

fn to_value<T: serde::Serialize>(body: &T) -> Result<serde_json::Value, GatewayError> {
    serde_json::to_value(body).map_err(|err| GatewayError::new(FailureKind::Malformed, err.to_string()))
}

/// Percent-encodes an opaque id for use as a single path segment.
fn encode_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return GatewayError::new(FailureKind::Malformed, err.to_string());
    }
    GatewayError::new(FailureKind::Network, err.to_string())
}
