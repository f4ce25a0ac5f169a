//! Stateless HTTP request builder and response parser for the job board API.
//!
//! # Design
//! `JobsClient` holds only the base URL. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. A `Transport` executes the round-trip in
//! between, so everything here is deterministic.
//!
//! All paths follow the backend's trailing-slash convention.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::normalize::{normalize_into, Page};
use crate::types::{AnalysisKind, Company, Filters, Job, Pagination};

/// Page size used when sampling jobs to derive filter options.
pub const OPTION_SAMPLE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct JobsClient {
    base_url: String,
}

impl JobsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}{path}", self.base_url))
    }

    pub fn build_list_jobs(&self, filters: &Filters, pagination: &Pagination) -> HttpRequest {
        self.get("/jobs/").with_query(job_query(filters, pagination))
    }

    /// First page of up to `OPTION_SAMPLE_SIZE` jobs, no filters.
    pub fn build_sample_jobs(&self) -> HttpRequest {
        self.get("/jobs/").with_query(vec![
            ("page".to_string(), "1".to_string()),
            ("page_size".to_string(), OPTION_SAMPLE_SIZE.to_string()),
        ])
    }

    pub fn build_get_job(&self, id: u64) -> HttpRequest {
        self.get(&format!("/jobs/{id}/"))
    }

    pub fn build_list_companies(&self, search: Option<&str>, page: u32, page_size: u32) -> HttpRequest {
        let mut query = vec![
            ("page".to_string(), page.to_string()),
            ("page_size".to_string(), page_size.to_string()),
        ];
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.push(("search".to_string(), search.to_string()));
        }
        self.get("/companies/").with_query(query)
    }

    pub fn build_get_company(&self, id: u64) -> HttpRequest {
        self.get(&format!("/companies/{id}/"))
    }

    pub fn build_all_analysis(&self) -> HttpRequest {
        self.get("/analysis/all/")
    }

    /// `None` for kinds that have no endpoint of their own.
    pub fn build_analysis(&self, kind: AnalysisKind) -> Option<HttpRequest> {
        kind.endpoint()
            .map(|segment| self.get(&format!("/analysis/{segment}/")))
    }

    /// Check the status and decode the body into a JSON value.
    ///
    /// A `null` or empty body is an `EmptyResponse`.
    pub fn parse_json(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        let value: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        if value.is_null() {
            return Err(ApiError::EmptyResponse);
        }
        tracing::debug!(status = response.status, "response ok");
        Ok(value)
    }

    pub fn parse_list_jobs(&self, response: HttpResponse) -> Result<(Page<Job>, Value), ApiError> {
        let body = self.parse_json(response)?;
        Ok((normalize_into(&body)?, body))
    }

    pub fn parse_get_job(&self, response: HttpResponse) -> Result<Job, ApiError> {
        decode(self.parse_json(response)?)
    }

    pub fn parse_list_companies(&self, response: HttpResponse) -> Result<Page<Company>, ApiError> {
        normalize_into(&self.parse_json(response)?)
    }

    pub fn parse_get_company(&self, response: HttpResponse) -> Result<Company, ApiError> {
        decode(self.parse_json(response)?)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx statuses into the error taxonomy, logging what gets dropped.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    tracing::error!(status = response.status, body = %response.body, "request failed");
    Err(ApiError::from_status(response.status, &response.body))
}

/// Query parameters for the job list: pagination first, then every filter
/// that holds a value. Empty strings, zero salaries and an empty tag set are
/// left out; tags are sent as a JSON array string.
pub fn job_query(filters: &Filters, pagination: &Pagination) -> Vec<(String, String)> {
    let mut query = vec![
        ("page".to_string(), pagination.current_page.to_string()),
        ("page_size".to_string(), pagination.page_size.to_string()),
    ];
    let text = [
        ("keyword", &filters.keyword),
        ("province", &filters.province),
        ("city", &filters.city),
        ("industry", &filters.industry),
        ("job_type", &filters.job_type),
        ("personnel_type", &filters.personnel_type),
    ];
    for (key, value) in text {
        if !value.is_empty() {
            query.push((key.to_string(), value.clone()));
        }
    }
    for (key, value) in [("salary_min", filters.salary_min), ("salary_max", filters.salary_max)] {
        if let Some(v) = value.filter(|v| *v != 0) {
            query.push((key.to_string(), v.to_string()));
        }
    }
    if !filters.ordering.is_empty() {
        query.push(("ordering".to_string(), filters.ordering.clone()));
    }
    if !filters.tags.is_empty() {
        // Serializing a Vec<String> cannot fail.
        let tags = serde_json::to_string(&filters.tags).unwrap_or_default();
        query.push(("tags".to_string(), tags));
    }
    query
}
