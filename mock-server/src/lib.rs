//! An in-memory stand-in for the job board backend.
//!
//! Serves the read-only REST surface under `/api` with the same shapes the
//! real backend produces: paginated `{count, next, previous, results}`
//! envelopes for lists, plain objects for details, and `{categories, data}`
//! distributions for analysis.

pub mod data;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use data::{Company, Dataset, Job, JobView};

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

pub type Db = Arc<RwLock<Dataset>>;

pub fn app() -> Router {
    app_with(Dataset::seed())
}

pub fn app_with(data: Dataset) -> Router {
    let db: Db = Arc::new(RwLock::new(data));
    let api = Router::new()
        .route("/jobs/", get(list_jobs))
        .route("/jobs/{id}/", get(get_job))
        .route("/companies/", get(list_companies))
        .route("/companies/{id}/", get(get_company))
        .route("/analysis/all/", get(all_analysis))
        .route("/analysis/{kind}/", get(one_analysis));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, data: Dataset) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(data)).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"detail": message}))).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub keyword: Option<String>,
    pub company: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub industry: Option<String>,
    pub job_type: Option<String>,
    pub personnel_type: Option<String>,
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
    pub tags: Option<String>,
    pub ordering: Option<String>,
    pub search: Option<String>,
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_int(name: &str, value: &str) -> Result<i64, Response> {
    value
        .parse()
        .map_err(|_| detail(StatusCode::BAD_REQUEST, &format!("{name} must be an integer")))
}

/// Parse the JSON tag list; anything that is not a JSON array of strings is
/// treated as one literal tag.
fn parse_tags(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| vec![raw.to_string()])
}

fn filter_jobs(data: &Dataset, q: &JobQuery) -> Result<Vec<JobView>, Response> {
    let salary_min = set(&q.salary_min).map(|v| parse_int("salary_min", v)).transpose()?;
    let salary_max = set(&q.salary_max).map(|v| parse_int("salary_max", v)).transpose()?;
    let tags = set(&q.tags).map(parse_tags).unwrap_or_default();

    let mut jobs: Vec<JobView> = data
        .jobs
        .iter()
        .map(|job| data.view(job))
        .filter(|v| set(&q.company).is_none_or(|c| contains(v.company_name.as_deref(), c)))
        .filter(|v| set(&q.industry).is_none_or(|i| contains(v.industry.as_deref(), i)))
        .filter(|v| set(&q.job_type).is_none_or(|t| contains(v.job.job_type.as_deref(), t)))
        .filter(|v| {
            set(&q.personnel_type).is_none_or(|t| contains(v.job.personnel_type.as_deref(), t))
        })
        .filter(|v| set(&q.province).is_none_or(|p| contains(v.job.province.as_deref(), p)))
        .filter(|v| set(&q.city).is_none_or(|c| contains(v.job.city.as_deref(), c)))
        .filter(|v| salary_min.is_none_or(|min| v.job.salary_min.is_some_and(|s| s >= min)))
        .filter(|v| salary_max.is_none_or(|max| v.job.salary_max.is_some_and(|s| s <= max)))
        .filter(|v| {
            set(&q.keyword).is_none_or(|k| {
                contains(Some(v.job.title.as_str()), k)
                    || contains(v.job.description.as_deref(), k)
                    || contains(v.job.requirement.as_deref(), k)
            })
        })
        .filter(|v| {
            set(&q.search).is_none_or(|s| {
                contains(Some(v.job.title.as_str()), s)
                    || contains(v.company_name.as_deref(), s)
                    || contains(v.job.city.as_deref(), s)
            })
        })
        .filter(|v| tags.iter().all(|t| v.job.tags.iter().any(|jt| contains(Some(jt.as_str()), t))))
        .collect();

    let ordering = set(&q.ordering).unwrap_or("-publish_date");
    let (field, descending) = match ordering.strip_prefix('-') {
        Some(field) => (field, true),
        None => (ordering, false),
    };
    match field {
        "publish_date" => jobs.sort_by(|a, b| a.job.publish_date.cmp(&b.job.publish_date)),
        "salary_min" => jobs.sort_by_key(|v| v.job.salary_min),
        "company__name" => jobs.sort_by(|a, b| a.company_name.cmp(&b.company_name)),
        _ => {}
    }
    if descending {
        jobs.reverse();
    }
    Ok(jobs)
}

/// Slice `items` into the requested page, DRF style.
fn paginate<T: serde::Serialize>(items: Vec<T>, q: &JobQuery) -> Response {
    let page = match set(&q.page).map(str::parse::<usize>) {
        None => 1,
        Some(Ok(p)) if p >= 1 => p,
        Some(_) => return detail(StatusCode::NOT_FOUND, "Invalid page."),
    };
    let page_size = set(&q.page_size)
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|s| *s > 0)
        .map_or(DEFAULT_PAGE_SIZE, |s| s.min(MAX_PAGE_SIZE));

    let count = items.len();
    let Some(start) = (page - 1).checked_mul(page_size) else {
        return detail(StatusCode::NOT_FOUND, "Invalid page.");
    };
    if start >= count && page != 1 {
        return detail(StatusCode::NOT_FOUND, "Invalid page.");
    }
    let results: Vec<T> = items.into_iter().skip(start).take(page_size).collect();
    let has_next = start.saturating_add(page_size) < count;
    Json(json!({
        "count": count,
        "next": has_next.then(|| format!("?page={}", page + 1)),
        "previous": (page > 1).then(|| format!("?page={}", page - 1)),
        "results": results,
    }))
    .into_response()
}

async fn list_jobs(State(db): State<Db>, Query(q): Query<JobQuery>) -> Response {
    let data = db.read().await;
    match filter_jobs(&data, &q) {
        Ok(jobs) => paginate(jobs, &q),
        Err(response) => response,
    }
}

async fn get_job(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let data = db.read().await;
    match data.jobs.iter().find(|j| j.id == id) {
        Some(job) => Json(data.view(job)).into_response(),
        None => detail(StatusCode::NOT_FOUND, "No Job matches the given query."),
    }
}

async fn list_companies(State(db): State<Db>, Query(q): Query<JobQuery>) -> Response {
    let data = db.read().await;
    let mut companies: Vec<Company> = data
        .companies
        .iter()
        .filter(|c| {
            set(&q.search)
                .is_none_or(|s| contains(Some(c.name.as_str()), s) || contains(c.industry.as_deref(), s))
        })
        .cloned()
        .collect();
    companies.sort_by(|a, b| a.name.cmp(&b.name));
    paginate(companies, &q)
}

async fn get_company(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let data = db.read().await;
    match data.company(id) {
        Some(company) => Json(company.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "No Company matches the given query."),
    }
}

async fn all_analysis(State(db): State<Db>) -> Response {
    let data = db.read().await;
    let payload: Value = data
        .distributions()
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.unwrap_or(Value::Null)))
        .collect::<serde_json::Map<_, _>>()
        .into();
    if data.double_encode_analysis {
        Json(Value::String(payload.to_string())).into_response()
    } else {
        Json(payload).into_response()
    }
}

async fn one_analysis(State(db): State<Db>, Path(kind): Path<String>) -> Response {
    let key = format!("{kind}_distribution");
    let data = db.read().await;
    match data.distributions().remove(key.as_str()) {
        Some(Some(value)) => Json(value).into_response(),
        Some(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("no {kind} distribution available")})),
        )
            .into_response(),
        None => detail(StatusCode::NOT_FOUND, "Not found."),
    }
}
