//! Domain DTOs for the job board API.
//!
//! # Design
//! The backend owns these records and the client only reads them, so every
//! field apart from `id` is optional and missing fields decode as `None`.
//! These types are defined independently from the mock-server crate;
//! integration tests catch schema drift.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Company id.
    #[serde(default)]
    pub company: Option<u64>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub personnel_type: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "tags_from_list_or_csv")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    /// "Province City", "Province", "City", or an empty string.
    pub fn location(&self) -> String {
        [self.province.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Human-readable salary range, e.g. "8000-12000" or "8000+".
    pub fn salary_range(&self) -> Option<String> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some(format!("{min}-{max}")),
            (Some(min), None) => Some(format!("{min}+")),
            (None, Some(max)) => Some(format!("up to {max}")),
            (None, None) => None,
        }
    }
}

/// The backend has stored tags both as a JSON array and as a
/// comma-separated string; accept either, and `null`.
fn tags_from_list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::List(list)) => list,
        Some(Tags::Csv(csv)) => csv
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    })
}

/// A hiring company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

/// Current job-list filters. Empty strings and `None` mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub keyword: String,
    pub province: String,
    pub city: String,
    pub industry: String,
    pub job_type: String,
    pub personnel_type: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub tags: Vec<String>,
    pub ordering: String,
}

/// A partial update to `Filters`; only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub keyword: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub industry: Option<String>,
    pub job_type: Option<String>,
    pub personnel_type: Option<String>,
    pub salary_min: Option<Option<i64>>,
    pub salary_max: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
    pub ordering: Option<String>,
}

impl Filters {
    pub fn merge(&mut self, patch: FilterPatch) {
        let FilterPatch {
            keyword,
            province,
            city,
            industry,
            job_type,
            personnel_type,
            salary_min,
            salary_max,
            tags,
            ordering,
        } = patch;
        set_if(&mut self.keyword, keyword);
        set_if(&mut self.province, province);
        set_if(&mut self.city, city);
        set_if(&mut self.industry, industry);
        set_if(&mut self.job_type, job_type);
        set_if(&mut self.personnel_type, personnel_type);
        set_if(&mut self.salary_min, salary_min);
        set_if(&mut self.salary_max, salary_max);
        set_if(&mut self.tags, tags);
        set_if(&mut self.ordering, ordering);
    }
}

fn set_if<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Page position and the server-reported total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: 10,
            total: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationPatch {
    pub current_page: Option<u32>,
    pub page_size: Option<u32>,
    pub total: Option<u64>,
}

impl Pagination {
    pub fn merge(&mut self, patch: PaginationPatch) {
        set_if(&mut self.current_page, patch.current_page);
        set_if(&mut self.page_size, patch.page_size);
        set_if(&mut self.total, patch.total);
    }
}

/// The five distributions the analysis endpoints produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Industry,
    Salary,
    Location,
    JobType,
    EducationSalary,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 5] = [
        AnalysisKind::Industry,
        AnalysisKind::Salary,
        AnalysisKind::Location,
        AnalysisKind::JobType,
        AnalysisKind::EducationSalary,
    ];

    /// Key of this distribution in the `/analysis/all/` payload.
    pub fn response_key(self) -> &'static str {
        match self {
            AnalysisKind::Industry => "industry_distribution",
            AnalysisKind::Salary => "salary_distribution",
            AnalysisKind::Location => "location_distribution",
            AnalysisKind::JobType => "job_type_distribution",
            AnalysisKind::EducationSalary => "education_salary_distribution",
        }
    }

    /// Path segment of the per-distribution endpoint. Education-salary is
    /// only served through `/analysis/all/`.
    pub fn endpoint(self) -> Option<&'static str> {
        match self {
            AnalysisKind::Industry => Some("industry"),
            AnalysisKind::Salary => Some("salary"),
            AnalysisKind::Location => Some("location"),
            AnalysisKind::JobType => Some("job_type"),
            AnalysisKind::EducationSalary => None,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::Industry => write!(f, "industry"),
            AnalysisKind::Salary => write!(f, "salary"),
            AnalysisKind::Location => write!(f, "location"),
            AnalysisKind::JobType => write!(f, "job-type"),
            AnalysisKind::EducationSalary => write!(f, "education-salary"),
        }
    }
}

/// Opaque distributions keyed by kind. A kind is absent until some fetch
/// delivered a non-null value for it.
pub type AnalysisData = BTreeMap<AnalysisKind, serde_json::Value>;

/// Job fields whose distinct values back a filter dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionField {
    PersonnelType,
    JobType,
    Province,
}

impl OptionField {
    /// JSON key of this field on a job record.
    pub fn job_key(self) -> &'static str {
        match self {
            OptionField::PersonnelType => "personnel_type",
            OptionField::JobType => "job_type",
            OptionField::Province => "province",
        }
    }
}

/// A `{value, label}` pair for select widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl From<&str> for SelectOption {
    fn from(s: &str) -> Self {
        Self {
            value: s.to_string(),
            label: s.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_decodes_with_missing_fields() {
        let job: Job = serde_json::from_str(r#"{"id":7,"title":"Rust engineer"}"#).unwrap();
        assert_eq!(job.id, 7);
        assert_eq!(job.title.as_deref(), Some("Rust engineer"));
        assert!(job.tags.is_empty());
        assert!(job.province.is_none());
    }

    #[test]
    fn job_tags_accept_list_csv_and_null() {
        let job: Job = serde_json::from_str(r#"{"id":1,"tags":["remote","senior"]}"#).unwrap();
        assert_eq!(job.tags, vec!["remote", "senior"]);

        let job: Job = serde_json::from_str(r#"{"id":1,"tags":"remote, senior,"}"#).unwrap();
        assert_eq!(job.tags, vec!["remote", "senior"]);

        let job: Job = serde_json::from_str(r#"{"id":1,"tags":null}"#).unwrap();
        assert!(job.tags.is_empty());
    }

    #[test]
    fn job_decodes_backend_dates() {
        let job: Job = serde_json::from_str(
            r#"{"id":1,"publish_date":"2024-03-01","created_at":"2024-03-01T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(job.publish_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(job.created_at.is_some());
    }

    #[test]
    fn location_and_salary_formatting() {
        let job = Job {
            id: 1,
            province: Some("Sichuan".into()),
            city: Some("Chengdu".into()),
            salary_min: Some(8000),
            salary_max: Some(12000),
            ..Default::default()
        };
        assert_eq!(job.location(), "Sichuan Chengdu");
        assert_eq!(job.salary_range().as_deref(), Some("8000-12000"));

        let job = Job {
            id: 2,
            city: Some("Chengdu".into()),
            ..Default::default()
        };
        assert_eq!(job.location(), "Chengdu");
        assert_eq!(job.salary_range(), None);
    }

    #[test]
    fn filter_patch_only_touches_given_fields() {
        let mut filters = Filters {
            keyword: "rust".into(),
            city: "Chengdu".into(),
            salary_min: Some(5000),
            ..Default::default()
        };
        filters.merge(FilterPatch {
            city: Some(String::new()),
            salary_min: Some(None),
            tags: Some(vec!["remote".into()]),
            ..Default::default()
        });
        assert_eq!(filters.keyword, "rust");
        assert_eq!(filters.city, "");
        assert_eq!(filters.salary_min, None);
        assert_eq!(filters.tags, vec!["remote"]);
    }

    #[test]
    fn pagination_defaults_and_merge() {
        let mut p = Pagination::default();
        assert_eq!((p.current_page, p.page_size, p.total), (1, 10, 0));
        p.merge(PaginationPatch {
            current_page: Some(3),
            ..Default::default()
        });
        assert_eq!((p.current_page, p.page_size), (3, 10));
    }

    #[test]
    fn analysis_keys_match_backend() {
        assert_eq!(AnalysisKind::JobType.response_key(), "job_type_distribution");
        assert_eq!(AnalysisKind::EducationSalary.endpoint(), None);
        assert_eq!(AnalysisKind::Location.endpoint(), Some("location"));
    }
}
