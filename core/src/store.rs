//! Client-side application state and the async actions that fill it.
//!
//! # Design
//! `AppState` is plain data and changes only through `AppState::apply`, one
//! `Mutation` at a time. `Store` owns the state, a `JobsClient` and a
//! `Transport`; each action builds a request from the current state, runs it
//! through the transport, parses and normalizes the response, and commits.
//!
//! Actions take `&self` and may overlap. The state lock is never held across
//! an await. Two consequences are handled explicitly:
//! - loading is an in-flight counter, raised and lowered by a guard, so it
//!   reads false once every action has finished, whichever way it finished;
//! - every job-list request gets a sequence number and a response older than
//!   the one already committed is dropped, so the last request issued wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::client::JobsClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::normalize::{normalize, Page};
use crate::options::{distinct_values, OptionsCache};
use crate::transport::Transport;
use crate::types::{
    AnalysisData, AnalysisKind, Company, FilterPatch, Filters, Job, OptionField, Pagination,
    PaginationPatch, SelectOption,
};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub jobs: Vec<Job>,
    pub job: Option<Job>,
    pub companies: Vec<Company>,
    pub companies_total: u64,
    pub company: Option<Company>,
    pub in_flight: u32,
    pub error: Option<String>,
    pub filters: Filters,
    pub pagination: Pagination,
    pub analysis: AnalysisData,
    pub options: OptionsCache,
    /// Sequence number of the job list currently in `jobs`.
    pub jobs_seq: u64,
}

/// Every state transition the store can make.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// An action started: one more in flight, previous error cleared.
    Begin,
    /// An action finished, successfully or not.
    End,
    SetError(String),
    SetJobs { seq: u64, page: Page<Job> },
    /// A job-list request failed. Ignored when a newer list is already in.
    SetJobsError { seq: u64, message: String },
    SetJob(Job),
    SetCompanies(Page<Company>),
    SetCompany(Company),
    /// Merge filters and go back to page 1 in one step.
    SetFilters(FilterPatch),
    SetPagination(PaginationPatch),
    SetAnalysis(AnalysisKind, Value),
    SetOptions(OptionField, Vec<String>),
    InvalidateOptions(OptionField),
    ClearOptions,
}

impl AppState {
    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Begin => {
                self.in_flight += 1;
                self.error = None;
            }
            Mutation::End => self.in_flight = self.in_flight.saturating_sub(1),
            Mutation::SetError(message) => self.error = Some(message),
            Mutation::SetJobs { seq, page } => {
                if seq < self.jobs_seq {
                    tracing::debug!(seq, current = self.jobs_seq, "dropping stale job list");
                    return;
                }
                self.jobs_seq = seq;
                self.jobs = page.items;
                self.pagination.total = page.total;
            }
            Mutation::SetJobsError { seq, message } => {
                if seq < self.jobs_seq {
                    tracing::debug!(seq, current = self.jobs_seq, "dropping stale job list error");
                    return;
                }
                self.error = Some(message);
            }
            Mutation::SetJob(job) => self.job = Some(job),
            Mutation::SetCompanies(page) => {
                self.companies = page.items;
                self.companies_total = page.total;
            }
            Mutation::SetCompany(company) => self.company = Some(company),
            Mutation::SetFilters(patch) => {
                self.filters.merge(patch);
                self.pagination.current_page = 1;
            }
            Mutation::SetPagination(patch) => self.pagination.merge(patch),
            Mutation::SetAnalysis(kind, data) => {
                self.analysis.insert(kind, data);
            }
            Mutation::SetOptions(field, values) => self.options.insert(field, values),
            Mutation::InvalidateOptions(field) => self.options.invalidate(field),
            Mutation::ClearOptions => self.options.clear(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Lowers the loading counter when the action that raised it ends.
struct Loading<'a> {
    state: &'a RwLock<AppState>,
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        write(self.state).apply(Mutation::End);
    }
}

fn write(state: &RwLock<AppState>) -> std::sync::RwLockWriteGuard<'_, AppState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

pub struct Store<T> {
    client: JobsClient,
    transport: T,
    state: RwLock<AppState>,
    next_seq: AtomicU64,
}

impl<T: Transport> Store<T> {
    pub fn new(client: JobsClient, transport: T) -> Self {
        Self {
            client,
            transport,
            state: RwLock::new(AppState::default()),
            next_seq: AtomicU64::new(0),
        }
    }

    // --- state access ---

    pub fn commit(&self, mutation: Mutation) {
        write(&self.state).apply(mutation);
    }

    /// Run `f` against the current state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    pub fn snapshot(&self) -> AppState {
        self.read(AppState::clone)
    }

    pub fn is_loading(&self) -> bool {
        self.read(AppState::is_loading)
    }

    pub fn has_error(&self) -> bool {
        self.read(AppState::has_error)
    }

    pub fn error_message(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.read(|s| s.jobs.clone())
    }

    pub fn job_detail(&self) -> Option<Job> {
        self.read(|s| s.job.clone())
    }

    pub fn companies(&self) -> Vec<Company> {
        self.read(|s| s.companies.clone())
    }

    pub fn company_detail(&self) -> Option<Company> {
        self.read(|s| s.company.clone())
    }

    pub fn filters(&self) -> Filters {
        self.read(|s| s.filters.clone())
    }

    pub fn pagination(&self) -> Pagination {
        self.read(|s| s.pagination)
    }

    pub fn analysis(&self, kind: AnalysisKind) -> Option<Value> {
        self.read(|s| s.analysis.get(&kind).cloned())
    }

    // --- plumbing ---

    fn begin(&self) -> Loading<'_> {
        self.commit(Mutation::Begin);
        Loading { state: &self.state }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Ok(self.transport.execute(request).await?)
    }

    /// Record the display message and hand the error back to the caller.
    fn fail(&self, err: ApiError, action: &str) -> ApiError {
        tracing::error!(action, error = %err, "action failed");
        self.commit(Mutation::SetError(err.to_string()));
        err
    }

    // --- jobs ---

    /// Fetch the current page under the current filters. Returns the raw
    /// response body.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_jobs(&self) -> Result<Value, ApiError> {
        let _loading = self.begin();
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let request = self.read(|s| self.client.build_list_jobs(&s.filters, &s.pagination));

        let result = self
            .send(request)
            .await
            .and_then(|response| self.client.parse_list_jobs(response));
        match result {
            Ok((page, raw)) => {
                tracing::debug!(seq, items = page.items.len(), total = page.total, "jobs fetched");
                self.commit(Mutation::SetJobs { seq, page });
                Ok(raw)
            }
            Err(err) => {
                tracing::error!(action = "fetch_jobs", seq, error = %err, "action failed");
                self.commit(Mutation::SetJobsError {
                    seq,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_job_detail(&self, id: u64) -> Result<Job, ApiError> {
        let _loading = self.begin();
        let result = self
            .send(self.client.build_get_job(id))
            .await
            .and_then(|response| self.client.parse_get_job(response));
        match result {
            Ok(job) => {
                self.commit(Mutation::SetJob(job.clone()));
                Ok(job)
            }
            Err(err) => Err(self.fail(err, "fetch_job_detail")),
        }
    }

    /// Merge `patch` into the filters, reset to page 1, and refetch.
    pub async fn set_filters(&self, patch: FilterPatch) -> Result<Value, ApiError> {
        self.commit(Mutation::SetFilters(patch));
        self.fetch_jobs().await
    }

    pub async fn filter_by_tags(&self, tags: Vec<String>) -> Result<Value, ApiError> {
        self.set_filters(FilterPatch {
            tags: Some(tags),
            ..Default::default()
        })
        .await
    }

    pub async fn set_pagination(&self, patch: PaginationPatch) -> Result<Value, ApiError> {
        self.commit(Mutation::SetPagination(patch));
        self.fetch_jobs().await
    }

    // --- companies ---

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_companies(
        &self,
        search: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Company>, ApiError> {
        let _loading = self.begin();
        let result = self
            .send(self.client.build_list_companies(search, page, page_size))
            .await
            .and_then(|response| self.client.parse_list_companies(response));
        match result {
            Ok(companies) => {
                self.commit(Mutation::SetCompanies(companies.clone()));
                Ok(companies)
            }
            Err(err) => Err(self.fail(err, "fetch_companies")),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_company_detail(&self, id: u64) -> Result<Company, ApiError> {
        let _loading = self.begin();
        let result = self
            .send(self.client.build_get_company(id))
            .await
            .and_then(|response| self.client.parse_get_company(response));
        match result {
            Ok(company) => {
                self.commit(Mutation::SetCompany(company.clone()));
                Ok(company)
            }
            Err(err) => Err(self.fail(err, "fetch_company_detail")),
        }
    }

    // --- analysis ---

    /// Fetch every distribution in one request. Distributions missing from
    /// the response keep whatever value they had.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_all_analysis_data(&self) -> Result<Value, ApiError> {
        let _loading = self.begin();
        let result = self
            .send(self.client.build_all_analysis())
            .await
            .and_then(|response| self.client.parse_json(response));
        let body = match result {
            Ok(body) => body,
            Err(err) => return Err(self.fail(err, "fetch_all_analysis_data")),
        };

        self.commit_distributions(&body);
        // The backend has been seen to JSON-encode this payload twice.
        if let Value::String(encoded) = &body {
            match serde_json::from_str::<Value>(encoded) {
                Ok(decoded) => self.commit_distributions(&decoded),
                Err(e) => tracing::warn!(error = %e, "analysis payload is a string but not JSON"),
            }
        }
        Ok(body)
    }

    fn commit_distributions(&self, body: &Value) {
        for kind in AnalysisKind::ALL {
            if let Some(data) = body.get(kind.response_key()).filter(|v| !v.is_null()) {
                tracing::debug!(%kind, "distribution updated");
                self.commit(Mutation::SetAnalysis(kind, data.clone()));
            }
        }
    }

    /// Fetch one distribution from its own endpoint. Kinds without one are
    /// read out of a full `fetch_all_analysis_data`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_analysis(&self, kind: AnalysisKind) -> Result<Option<Value>, ApiError> {
        let Some(request) = self.client.build_analysis(kind) else {
            self.fetch_all_analysis_data().await?;
            return Ok(self.analysis(kind));
        };
        let _loading = self.begin();
        let result = self
            .send(request)
            .await
            .and_then(|response| self.client.parse_json(response));
        match result {
            Ok(data) => {
                self.commit(Mutation::SetAnalysis(kind, data.clone()));
                Ok(Some(data))
            }
            Err(err) => Err(self.fail(err, "fetch_analysis")),
        }
    }

    // --- derived filter options ---

    /// Distinct values of `field` over a sample of jobs, cached until
    /// invalidated. A cached non-empty list costs no request.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_options(&self, field: OptionField) -> Result<Vec<String>, ApiError> {
        if let Some(cached) = self.read(|s| s.options.get(field).map(<[String]>::to_vec)) {
            tracing::debug!(?field, "options served from cache");
            return Ok(cached);
        }

        let _loading = self.begin();
        let result = self
            .send(self.client.build_sample_jobs())
            .await
            .and_then(|response| self.client.parse_json(response));
        match result {
            Ok(body) => {
                let values = distinct_values(&normalize(&body).items, field);
                self.commit(Mutation::SetOptions(field, values.clone()));
                Ok(values)
            }
            Err(err) => Err(self.fail(err, "fetch_options")),
        }
    }

    pub fn invalidate_options(&self, field: OptionField) {
        self.commit(Mutation::InvalidateOptions(field));
    }

    /// Drop every cached option list; the next fetch of each goes out again.
    pub fn invalidate_all_options(&self) {
        self.commit(Mutation::ClearOptions);
    }

    pub async fn fetch_personnel_types(&self) -> Result<Vec<String>, ApiError> {
        self.fetch_options(OptionField::PersonnelType).await
    }

    pub async fn fetch_job_types(&self) -> Result<Vec<String>, ApiError> {
        self.fetch_options(OptionField::JobType).await
    }

    pub async fn fetch_provinces(&self) -> Result<Vec<SelectOption>, ApiError> {
        let provinces = self.fetch_options(OptionField::Province).await?;
        Ok(provinces.iter().map(|p| SelectOption::from(p.as_str())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// One scripted reply. `arrived` fires when the request reaches the
    /// transport; the reply is held back until `gate` resolves.
    struct Step {
        reply: Result<HttpResponse, TransportError>,
        arrived: Option<oneshot::Sender<()>>,
        gate: Option<oneshot::Receiver<()>>,
    }

    impl Step {
        fn ok(body: Value) -> Self {
            Self::status(200, &body.to_string())
        }

        fn status(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(HttpResponse::new(status, body)),
                arrived: None,
                gate: None,
            }
        }
    }

    #[derive(Default)]
    struct Scripted {
        steps: Mutex<VecDeque<Step>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn with(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                requests: Mutex::default(),
            }
        }
    }

    impl Transport for Scripted {
        fn execute(
            &self,
            request: HttpRequest,
        ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
            self.requests.lock().unwrap().push(request);
            let step = self.steps.lock().unwrap().pop_front();
            async move {
                let step = step.expect("unexpected request");
                if let Some(arrived) = step.arrived {
                    let _ = arrived.send(());
                }
                if let Some(gate) = step.gate {
                    let _ = gate.await;
                }
                step.reply
            }
        }
    }

    fn store(steps: Vec<Step>) -> Store<Scripted> {
        Store::new(JobsClient::new("http://api.test/api"), Scripted::with(steps))
    }

    fn requests(store: &Store<Scripted>) -> Vec<HttpRequest> {
        store.transport.requests.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn fetch_jobs_commits_items_and_total() {
        let store = store(vec![Step::ok(json!({
            "count": 42,
            "results": [{"id": 1, "title": "Backend"}, {"id": 2, "title": "Frontend"}]
        }))]);
        let raw = store.fetch_jobs().await.unwrap();
        assert_eq!(raw["count"], 42);
        assert_eq!(store.jobs().len(), 2);
        assert_eq!(store.pagination().total, 42);
        assert!(!store.is_loading());
        assert!(!store.has_error());
    }

    #[tokio::test]
    async fn fetch_jobs_accepts_bare_array() {
        let store = store(vec![Step::ok(json!([{"id": 1}, {"id": 2}, {"id": 3}]))]);
        store.fetch_jobs().await.unwrap();
        assert_eq!(store.pagination().total, 3);
    }

    #[tokio::test]
    async fn set_filters_resets_page_before_fetch() {
        let store = store(vec![Step::ok(json!([])), Step::ok(json!([]))]);
        store
            .set_pagination(PaginationPatch {
                current_page: Some(4),
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .set_filters(FilterPatch {
                keyword: Some("rust".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let sent = requests(&store);
        assert_eq!(sent[0].query_value("page"), Some("4"));
        assert_eq!(sent[1].query_value("page"), Some("1"));
        assert_eq!(sent[1].query_value("keyword"), Some("rust"));
        assert_eq!(store.pagination().current_page, 1);
    }

    #[tokio::test]
    async fn filter_by_tags_sends_json_array() {
        let store = store(vec![Step::ok(json!([]))]);
        store
            .filter_by_tags(vec!["a".into(), "b".into()])
            .await
            .unwrap();
        assert_eq!(requests(&store)[0].query_value("tags"), Some(r#"["a","b"]"#));
    }

    #[tokio::test]
    async fn not_found_records_fixed_message_and_rethrows() {
        let store = store(vec![Step::status(404, r#"{"detail":"No Job matches."}"#)]);
        let err = store.fetch_job_detail(99).await.unwrap_err();
        assert_eq!(err, ApiError::NotFound);
        assert_eq!(store.error_message().as_deref(), Some("resource not found"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn next_action_clears_previous_error() {
        let store = store(vec![Step::status(500, ""), Step::ok(json!({"id": 5}))]);
        store.fetch_jobs().await.unwrap_err();
        assert_eq!(store.error_message().as_deref(), Some("internal server error"));
        store.fetch_job_detail(5).await.unwrap();
        assert!(!store.has_error());
        assert_eq!(store.job_detail().map(|j| j.id), Some(5));
    }

    #[tokio::test]
    async fn transport_failure_is_no_response() {
        let store = store(vec![Step {
            reply: Err(TransportError::NoResponse("timed out".into())),
            arrived: None,
            gate: None,
        }]);
        let err = store.fetch_all_analysis_data().await.unwrap_err();
        assert_eq!(err.to_string(), "server did not respond");
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn null_body_is_empty_response() {
        let store = store(vec![Step::status(200, "null")]);
        let err = store.fetch_jobs().await.unwrap_err();
        assert_eq!(err, ApiError::EmptyResponse);
        assert_eq!(store.error_message().as_deref(), Some("empty response from server"));
    }

    #[tokio::test]
    async fn loading_is_raised_while_pending() {
        let (arrived_tx, arrived_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let store = store(vec![Step {
            reply: Ok(HttpResponse::new(200, "[]")),
            arrived: Some(arrived_tx),
            gate: Some(release_rx),
        }]);
        assert!(!store.is_loading());

        let (result, ()) = tokio::join!(store.fetch_jobs(), async {
            arrived_rx.await.unwrap();
            assert!(store.is_loading());
            release_tx.send(()).unwrap();
        });
        result.unwrap();
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn stale_job_list_is_dropped() {
        let (release_tx, release_rx) = oneshot::channel();
        let (arrived_tx, arrived_rx) = oneshot::channel();
        let store = store(vec![
            Step {
                reply: Ok(HttpResponse::new(200, r#"[{"id": 1, "title": "old"}]"#)),
                arrived: Some(arrived_tx),
                gate: Some(release_rx),
            },
            Step::ok(json!([{"id": 2, "title": "new"}])),
        ]);

        let slow = store.set_filters(FilterPatch {
            keyword: Some("old".into()),
            ..Default::default()
        });
        let fast = async {
            arrived_rx.await.unwrap();
            store
                .set_filters(FilterPatch {
                    keyword: Some("new".into()),
                    ..Default::default()
                })
                .await
                .unwrap();
            release_tx.send(()).unwrap();
        };
        let (slow_result, ()) = tokio::join!(slow, fast);
        slow_result.unwrap();

        let jobs = store.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title.as_deref(), Some("new"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn stale_job_list_failure_is_dropped() {
        let (release_tx, release_rx) = oneshot::channel();
        let (arrived_tx, arrived_rx) = oneshot::channel();
        let store = store(vec![
            Step {
                reply: Ok(HttpResponse::new(500, "boom")),
                arrived: Some(arrived_tx),
                gate: Some(release_rx),
            },
            Step::ok(json!([{"id": 2, "title": "new"}])),
        ]);

        let slow = store.set_filters(FilterPatch {
            keyword: Some("old".into()),
            ..Default::default()
        });
        let fast = async {
            arrived_rx.await.unwrap();
            store
                .set_filters(FilterPatch {
                    keyword: Some("new".into()),
                    ..Default::default()
                })
                .await
                .unwrap();
            release_tx.send(()).unwrap();
        };
        let (slow_result, ()) = tokio::join!(slow, fast);

        assert_eq!(slow_result.unwrap_err(), ApiError::ServerError);
        let jobs = store.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, 2);
        assert!(!store.has_error());
        assert!(!store.is_loading());
    }

    #[test]
    fn job_list_error_for_current_request_is_kept() {
        let mut state = AppState::default();
        state.apply(Mutation::SetJobs {
            seq: 3,
            page: Page::default(),
        });
        state.apply(Mutation::SetJobsError {
            seq: 2,
            message: "stale".into(),
        });
        assert!(!state.has_error());
        state.apply(Mutation::SetJobsError {
            seq: 4,
            message: "internal server error".into(),
        });
        assert_eq!(state.error.as_deref(), Some("internal server error"));
    }

    #[tokio::test]
    async fn analysis_commits_present_keys_only() {
        let store = store(vec![
            Step::ok(json!({
                "industry_distribution": {"IT": 10},
                "salary_distribution": {"5k-10k": 3}
            })),
            Step::ok(json!({
                "industry_distribution": {"IT": 12},
                "salary_distribution": null
            })),
        ]);
        store.fetch_all_analysis_data().await.unwrap();
        store.fetch_all_analysis_data().await.unwrap();

        assert_eq!(store.analysis(AnalysisKind::Industry), Some(json!({"IT": 12})));
        assert_eq!(store.analysis(AnalysisKind::Salary), Some(json!({"5k-10k": 3})));
        assert_eq!(store.analysis(AnalysisKind::Location), None);
    }

    #[tokio::test]
    async fn analysis_decodes_double_encoded_payload() {
        let inner = json!({
            "location_distribution": {"Chengdu": 5},
            "education_salary_distribution": [{"education": "Bachelor", "avg": 9000}]
        })
        .to_string();
        let store = store(vec![Step::ok(Value::String(inner))]);
        store.fetch_all_analysis_data().await.unwrap();
        assert_eq!(store.analysis(AnalysisKind::Location), Some(json!({"Chengdu": 5})));
        assert!(store.analysis(AnalysisKind::EducationSalary).is_some());
    }

    #[tokio::test]
    async fn malformed_double_encoding_is_swallowed() {
        let store = store(vec![Step::ok(json!("{not json"))]);
        let raw = store.fetch_all_analysis_data().await.unwrap();
        assert_eq!(raw, json!("{not json"));
        assert!(store.snapshot().analysis.is_empty());
        assert!(!store.has_error());
    }

    #[tokio::test]
    async fn single_analysis_endpoint() {
        let store = store(vec![Step::ok(json!({"Full-time": 30}))]);
        let data = store.fetch_analysis(AnalysisKind::JobType).await.unwrap();
        assert_eq!(data, Some(json!({"Full-time": 30})));
        assert_eq!(requests(&store)[0].url, "http://api.test/api/analysis/job_type/");
    }

    #[tokio::test]
    async fn education_salary_goes_through_all() {
        let store = store(vec![Step::ok(json!({
            "education_salary_distribution": {"Master": 12000}
        }))]);
        let data = store.fetch_analysis(AnalysisKind::EducationSalary).await.unwrap();
        assert_eq!(data, Some(json!({"Master": 12000})));
        assert_eq!(requests(&store)[0].url, "http://api.test/api/analysis/all/");
    }

    #[tokio::test]
    async fn options_are_memoized() {
        let store = store(vec![Step::ok(json!({"results": [
            {"id": 1, "personnel_type": "Graduate"},
            {"id": 2, "personnel_type": "Experienced"},
            {"id": 3, "personnel_type": "Graduate"},
            {"id": 4, "personnel_type": ""}
        ]}))]);
        let first = store.fetch_personnel_types().await.unwrap();
        let second = store.fetch_personnel_types().await.unwrap();
        assert_eq!(first, vec!["Experienced", "Graduate"]);
        assert_eq!(first, second);
        assert_eq!(requests(&store).len(), 1);
        assert_eq!(requests(&store)[0].query_value("page_size"), Some("100"));
    }

    #[tokio::test]
    async fn empty_options_are_fetched_again() {
        let store = store(vec![
            Step::ok(json!([{"id": 1}])),
            Step::ok(json!([{"id": 1, "job_type": "Intern"}])),
        ]);
        assert!(store.fetch_job_types().await.unwrap().is_empty());
        assert_eq!(store.fetch_job_types().await.unwrap(), vec!["Intern"]);
        assert_eq!(requests(&store).len(), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let store = store(vec![
            Step::ok(json!([{"id": 1, "province": "Sichuan"}])),
            Step::ok(json!([{"id": 1, "province": "Beijing"}, {"id": 2, "province": "Sichuan"}])),
        ]);
        let provinces = store.fetch_provinces().await.unwrap();
        assert_eq!(
            provinces,
            vec![SelectOption {
                value: "Sichuan".into(),
                label: "Sichuan".into()
            }]
        );
        store.invalidate_options(OptionField::Province);
        let provinces = store.fetch_provinces().await.unwrap();
        assert_eq!(provinces.len(), 2);
        assert_eq!(provinces[0].value, "Beijing");
    }

    #[tokio::test]
    async fn invalidate_all_drops_every_field() {
        let sample = json!([{"id": 1, "province": "Sichuan", "job_type": "Full-time"}]);
        let store = store(vec![
            Step::ok(sample.clone()),
            Step::ok(sample.clone()),
            Step::ok(sample.clone()),
            Step::ok(sample),
        ]);
        store.fetch_provinces().await.unwrap();
        store.fetch_job_types().await.unwrap();
        store.fetch_job_types().await.unwrap();
        assert_eq!(requests(&store).len(), 2);

        store.invalidate_all_options();
        store.fetch_provinces().await.unwrap();
        store.fetch_job_types().await.unwrap();
        assert_eq!(requests(&store).len(), 4);
    }

    #[tokio::test]
    async fn companies_list_and_detail() {
        let store = store(vec![
            Step::ok(json!({"count": 7, "results": [{"id": 1, "name": "Acme"}]})),
            Step::ok(json!({"id": 1, "name": "Acme", "industry": "IT"})),
        ]);
        let page = store.fetch_companies(Some("Ac"), 1, 10).await.unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(store.companies().len(), 1);
        assert_eq!(store.snapshot().companies_total, 7);

        let company = store.fetch_company_detail(1).await.unwrap();
        assert_eq!(company.industry.as_deref(), Some("IT"));
        assert_eq!(store.company_detail(), Some(company));
    }

    #[test]
    fn reducer_end_never_underflows() {
        let mut state = AppState::default();
        state.apply(Mutation::End);
        assert_eq!(state.in_flight, 0);
        state.apply(Mutation::Begin);
        state.apply(Mutation::Begin);
        state.apply(Mutation::End);
        assert!(state.is_loading());
        state.apply(Mutation::End);
        assert!(!state.is_loading());
    }
}
