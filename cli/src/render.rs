//! Plain-text rendering of what the store exposes.

use std::fmt::Write;

use jobboard_core::{Company, Job, Pagination, SelectOption};
use serde_json::Value;

const DASH: &str = "-";

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(DASH)
}

/// One line per job, then the page position.
pub fn job_list(jobs: &[Job], pagination: &Pagination) -> String {
    let mut out = String::new();
    if jobs.is_empty() {
        out.push_str("no jobs match\n");
    }
    for job in jobs {
        let _ = writeln!(
            out,
            "{:>5}  {:<28}  {:<20}  {:<18}  {}",
            job.id,
            or_dash(job.title.as_deref()),
            or_dash(job.company_name.as_deref()),
            or_dash(Some(job.location().as_str())),
            job.salary_range().as_deref().unwrap_or(DASH),
        );
    }
    let pages = pagination.total.div_ceil(u64::from(pagination.page_size.max(1)));
    let _ = writeln!(
        out,
        "page {} of {} ({} jobs)",
        pagination.current_page,
        pages.max(1),
        pagination.total
    );
    out
}

pub fn job_detail(job: &Job) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", or_dash(job.title.as_deref()));
    let fields = [
        ("company", job.company_name.clone()),
        ("industry", job.industry.clone()),
        ("location", Some(job.location())),
        ("salary", job.salary_range()),
        ("type", job.job_type.clone()),
        ("personnel", job.personnel_type.clone()),
        ("education", job.education.clone()),
        ("published", job.publish_date.map(|d| d.to_string())),
        ("source", job.source_url.clone()),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "  {label:<10} {}", or_dash(value.as_deref()));
    }
    if !job.tags.is_empty() {
        let _ = writeln!(out, "  {:<10} {}", "tags", job.tags.join(", "));
    }
    for (label, text) in [("description", &job.description), ("requirement", &job.requirement)] {
        if let Some(text) = text.as_deref().filter(|t| !t.is_empty()) {
            let _ = writeln!(out, "\n{label}:\n{text}");
        }
    }
    out
}

pub fn company_list(companies: &[Company], total: u64) -> String {
    let mut out = String::new();
    for company in companies {
        let _ = writeln!(out, "{}", company_line(company));
    }
    let _ = writeln!(out, "{total} companies");
    out
}

pub fn company_line(company: &Company) -> String {
    format!(
        "{:>5}  {:<28}  {}",
        company.id,
        or_dash(company.name.as_deref()),
        or_dash(company.industry.as_deref())
    )
}

/// A `{categories, data}` distribution as aligned `label  value` rows.
/// Anything else is printed as JSON.
pub fn distribution(title: &str, value: &Value) -> String {
    let mut out = format!("{title}\n");
    let pairs = value["categories"]
        .as_array()
        .zip(value["data"].as_array())
        .map(|(labels, data)| labels.iter().zip(data.iter()).collect::<Vec<_>>());
    match pairs {
        Some(pairs) => {
            for (label, datum) in pairs {
                let label = label.as_str().map_or_else(|| label.to_string(), str::to_string);
                let _ = writeln!(out, "  {label:<20} {datum}");
            }
        }
        None => {
            let _ = writeln!(out, "  {value}");
        }
    }
    out
}

pub fn options(values: &[String]) -> String {
    values.iter().map(|v| format!("{v}\n")).collect()
}

pub fn select_options(values: &[SelectOption]) -> String {
    values
        .iter()
        .map(|o| format!("{}\t{}\n", o.value, o.label))
        .collect()
}
