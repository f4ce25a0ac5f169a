//! In-memory dataset and the distributions computed from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub industry: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub title: String,
    pub company: u64,
    pub job_type: Option<String>,
    pub personnel_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub education: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub requirement: Option<String>,
    pub publish_date: Option<String>,
    pub source_url: Option<String>,
}

/// A job as the list and detail endpoints render it, with the company's
/// name and industry flattened in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub company_name: Option<String>,
    pub industry: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub companies: Vec<Company>,
    pub jobs: Vec<Job>,
    /// Serve `/analysis/all/` as a JSON string containing the JSON object.
    pub double_encode_analysis: bool,
}

impl Dataset {
    pub fn company(&self, id: u64) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub fn view(&self, job: &Job) -> JobView {
        let company = self.company(job.company);
        JobView {
            job: job.clone(),
            company_name: company.map(|c| c.name.clone()),
            industry: company.and_then(|c| c.industry.clone()),
        }
    }

    /// A small fixed dataset covering every filterable field.
    pub fn seed() -> Self {
        let companies = vec![
            company(1, "Tianfu Software", Some("Internet")),
            company(2, "Jinjiang Bank", Some("Finance")),
            company(3, "Panda Logistics", Some("Logistics")),
            company(4, "Rongcheng Hospital", Some("Healthcare")),
            company(5, "Stealth Startup", None),
        ];
        #[rustfmt::skip]
        let jobs = vec![
            job(1, "Rust Backend Engineer", 1, "Full-time", "Experienced", (18000, 30000), ("Sichuan", "Chengdu"), "Bachelor", &["rust", "remote"], "2024-05-20"),
            job(2, "Frontend Developer", 1, "Full-time", "Graduate", (9000, 14000), ("Sichuan", "Chengdu"), "Bachelor", &["vue"], "2024-05-18"),
            job(3, "Risk Analyst", 2, "Full-time", "Experienced", (15000, 22000), ("Sichuan", "Chengdu"), "Master", &["finance", "sql"], "2024-05-10"),
            job(4, "Teller", 2, "Contract", "Graduate", (5000, 7000), ("Chongqing", "Chongqing"), "Associate", &[], "2024-04-28"),
            job(5, "Warehouse Planner", 3, "Full-time", "Experienced", (8000, 12000), ("Sichuan", "Mianyang"), "Bachelor", &["logistics"], "2024-04-22"),
            job(6, "Data Intern", 3, "Internship", "Student", (3000, 4000), ("Beijing", "Beijing"), "Bachelor", &["sql", "remote"], "2024-04-15"),
            job(7, "Nurse", 4, "Full-time", "Experienced", (7000, 11000), ("Sichuan", "Chengdu"), "Associate", &["healthcare"], "2024-03-30"),
            job(8, "Medical Data Engineer", 4, "Full-time", "Experienced", (20000, 35000), ("Beijing", "Beijing"), "Master", &["rust", "sql"], "2024-03-12"),
            job(9, "Founding Engineer", 5, "Part-time", "Experienced", (25000, 40000), ("Shanghai", "Shanghai"), "Doctorate", &["rust"], "2024-02-01"),
        ];
        Self {
            companies,
            jobs,
            double_encode_analysis: false,
        }
    }

    /// Every distribution, or `None` where there is nothing to aggregate.
    pub fn distributions(&self) -> BTreeMap<&'static str, Option<Value>> {
        BTreeMap::from([
            ("industry_distribution", self.industry_distribution()),
            ("salary_distribution", self.salary_distribution()),
            ("location_distribution", self.location_distribution()),
            ("job_type_distribution", self.job_type_distribution()),
            ("education_salary_distribution", self.education_salary_distribution()),
        ])
    }

    fn industry_distribution(&self) -> Option<Value> {
        categories(self.companies.iter().filter_map(|c| c.industry.as_deref()))
    }

    fn salary_distribution(&self) -> Option<Value> {
        const RANGES: [(i64, i64, &str); 6] = [
            (0, 5000, "<5K"),
            (5000, 10000, "5K-10K"),
            (10000, 15000, "10K-15K"),
            (15000, 20000, "15K-20K"),
            (20000, 30000, "20K-30K"),
            (30000, i64::MAX, "30K+"),
        ];
        let mins: Vec<i64> = self
            .jobs
            .iter()
            .filter(|j| j.salary_max.is_some())
            .filter_map(|j| j.salary_min)
            .collect();
        if mins.is_empty() {
            return None;
        }
        let data: Vec<usize> = RANGES
            .iter()
            .map(|(lo, hi, _)| mins.iter().filter(|m| *m >= lo && *m < hi).count())
            .collect();
        let labels: Vec<&str> = RANGES.iter().map(|(_, _, label)| *label).collect();
        Some(json!({"categories": labels, "data": data}))
    }

    fn location_distribution(&self) -> Option<Value> {
        categories(self.jobs.iter().filter_map(|j| j.province.as_deref()))
    }

    fn job_type_distribution(&self) -> Option<Value> {
        categories(self.jobs.iter().filter_map(|j| j.job_type.as_deref()))
    }

    fn education_salary_distribution(&self) -> Option<Value> {
        let mut sums: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
        for job in &self.jobs {
            if let (Some(edu), Some(min), Some(max)) =
                (job.education.as_deref(), job.salary_min, job.salary_max)
            {
                let entry = sums.entry(edu).or_default();
                entry.0 += (min + max) / 2;
                entry.1 += 1;
            }
        }
        if sums.is_empty() {
            return None;
        }
        let labels: Vec<&str> = sums.keys().copied().collect();
        let data: Vec<i64> = sums.values().map(|(sum, n)| sum / n).collect();
        Some(json!({"categories": labels, "data": data}))
    }
}

/// Count occurrences of non-empty values, most frequent first.
fn categories<'a>(values: impl Iterator<Item = &'a str>) -> Option<Value> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values.filter(|v| !v.is_empty()) {
        *counts.entry(v).or_default() += 1;
    }
    if counts.is_empty() {
        return None;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let labels: Vec<&str> = ranked.iter().map(|(k, _)| *k).collect();
    let data: Vec<usize> = ranked.iter().map(|(_, n)| *n).collect();
    Some(json!({"categories": labels, "data": data}))
}

fn company(id: u64, name: &str, industry: Option<&str>) -> Company {
    Company {
        id,
        name: name.to_string(),
        industry: industry.map(str::to_string),
    }
}

#[allow(clippy::too_many_arguments)]
fn job(
    id: u64,
    title: &str,
    company: u64,
    job_type: &str,
    personnel_type: &str,
    (salary_min, salary_max): (i64, i64),
    (province, city): (&str, &str),
    education: &str,
    tags: &[&str],
    publish_date: &str,
) -> Job {
    Job {
        id,
        title: title.to_string(),
        company,
        job_type: Some(job_type.to_string()),
        personnel_type: Some(personnel_type.to_string()),
        salary_min: Some(salary_min),
        salary_max: Some(salary_max),
        province: Some(province.to_string()),
        city: Some(city.to_string()),
        education: Some(education.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        description: Some(format!("{title} wanted.")),
        requirement: None,
        publish_date: Some(publish_date.to_string()),
        source_url: None,
    }
}
