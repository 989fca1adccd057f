//! Activities list: what a student did, scoped to one child and
//! optionally narrowed by category or date range.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::backend::Backend;
use crate::list::{ListFilter, PaginatedListController, date_param};

#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Everything else the backend sends; opaque to the core.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub student_id: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ActivityFilter {
    /// Filter scoped to one child, no other constraints.
    #[must_use]
    pub fn for_student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            ..Self::default()
        }
    }
}

impl ListFilter for ActivityFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(student_id) = &self.student_id {
            pairs.push(("studentId", student_id.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(from) = &self.date_from {
            pairs.push(("dateFrom", date_param(from)));
        }
        if let Some(to) = &self.date_to {
            pairs.push(("dateTo", date_param(to)));
        }
        pairs
    }

    fn clear(&mut self, key: &str) -> bool {
        match key {
            "studentId" => self.student_id.take().is_some(),
            "category" => self.category.take().is_some(),
            "dateFrom" => self.date_from.take().is_some(),
            "dateTo" => self.date_to.take().is_some(),
            _ => false,
        }
    }
}

pub type ActivityListController = PaginatedListController<Activity, ActivityFilter>;

pub fn activity_list(backend: Arc<dyn Backend>, page_size: u32) -> ActivityListController {
    PaginatedListController::new(backend, "activities", page_size)
}
