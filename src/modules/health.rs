//! Health metrics list: recorded measurements for one child over time.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::backend::Backend;
use crate::list::{ListFilter, PaginatedListController, date_param};

#[derive(Debug, Clone, Deserialize)]
pub struct HealthRecord {
    pub id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthFilter {
    pub student_id: Option<String>,
    /// Metric name, e.g. "height" or "weight".
    pub metric: Option<String>,
    pub recorded_from: Option<NaiveDate>,
    pub recorded_to: Option<NaiveDate>,
}

impl HealthFilter {
    #[must_use]
    pub fn for_student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            ..Self::default()
        }
    }
}

impl ListFilter for HealthFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(student_id) = &self.student_id {
            pairs.push(("studentId", student_id.clone()));
        }
        if let Some(metric) = &self.metric {
            pairs.push(("metric", metric.clone()));
        }
        if let Some(from) = &self.recorded_from {
            pairs.push(("recordedFrom", date_param(from)));
        }
        if let Some(to) = &self.recorded_to {
            pairs.push(("recordedTo", date_param(to)));
        }
        pairs
    }

    fn clear(&mut self, key: &str) -> bool {
        match key {
            "studentId" => self.student_id.take().is_some(),
            "metric" => self.metric.take().is_some(),
            "recordedFrom" => self.recorded_from.take().is_some(),
            "recordedTo" => self.recorded_to.take().is_some(),
            _ => false,
        }
    }
}

pub type HealthListController = PaginatedListController<HealthRecord, HealthFilter>;

pub fn health_list(backend: Arc<dyn Backend>, page_size: u32) -> HealthListController {
    PaginatedListController::new(backend, "health-records", page_size)
}
