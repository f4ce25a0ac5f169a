//! Filter dropdown values derived from a sample of jobs.
//!
//! The backend has no endpoint listing the distinct provinces, job types or
//! personnel types, so they are read off the first `OPTION_SAMPLE_SIZE` jobs.
//! The result is an approximation of the real domain.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::types::OptionField;

/// Unique, non-empty, sorted string values of `field` across `items`.
/// Items that are not objects, or hold a non-string value, are skipped.
pub fn distinct_values(items: &[Value], field: OptionField) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.get(field.job_key()))
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Derived option lists keyed by field. An empty list counts as a miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsCache {
    entries: HashMap<OptionField, Vec<String>>,
}

impl OptionsCache {
    pub fn get(&self, field: OptionField) -> Option<&[String]> {
        self.entries
            .get(&field)
            .filter(|values| !values.is_empty())
            .map(Vec::as_slice)
    }

    pub fn insert(&mut self, field: OptionField, values: Vec<String>) {
        self.entries.insert(field, values);
    }

    pub fn invalidate(&mut self, field: OptionField) {
        self.entries.remove(&field);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_are_unique_sorted_and_non_empty() {
        let items = vec![
            json!({"province": "Sichuan"}),
            json!({"province": "Beijing"}),
            json!({"province": ""}),
            json!({"province": null}),
            json!({"province": "Sichuan"}),
            json!({"city": "Chengdu"}),
            json!("not an object"),
        ];
        assert_eq!(
            distinct_values(&items, OptionField::Province),
            vec!["Beijing", "Sichuan"]
        );
    }

    #[test]
    fn each_field_reads_its_own_key() {
        let items = vec![json!({"job_type": "Full-time", "personnel_type": "Graduate"})];
        assert_eq!(distinct_values(&items, OptionField::JobType), vec!["Full-time"]);
        assert_eq!(
            distinct_values(&items, OptionField::PersonnelType),
            vec!["Graduate"]
        );
    }

    #[test]
    fn empty_entries_are_misses() {
        let mut cache = OptionsCache::default();
        cache.insert(OptionField::JobType, Vec::new());
        assert!(cache.get(OptionField::JobType).is_none());

        cache.insert(OptionField::JobType, vec!["Intern".into()]);
        assert_eq!(cache.get(OptionField::JobType), Some(&["Intern".to_string()][..]));

        cache.invalidate(OptionField::JobType);
        assert!(cache.get(OptionField::JobType).is_none());
    }
}
