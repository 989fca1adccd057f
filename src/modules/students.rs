//! Students list: the roster a teacher or admin browses.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::Backend;
use crate::list::{ListFilter, PaginatedListController};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Graduated,
    Withdrawn,
}

impl EnrollmentStatus {
    #[must_use]
    pub fn as_param(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Graduated => "graduated",
            EnrollmentStatus::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Student {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "crate::modules::lenient_enum")]
    pub status: Option<EnrollmentStatus>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Educational level / class the roster is narrowed to.
    pub level: Option<String>,
    pub status: Option<EnrollmentStatus>,
    pub search: Option<String>,
}

impl ListFilter for StudentFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(level) = &self.level {
            pairs.push(("level", level.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_param().to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }

    fn clear(&mut self, key: &str) -> bool {
        match key {
            "level" => self.level.take().is_some(),
            "status" => self.status.take().is_some(),
            "search" => self.search.take().is_some(),
            _ => false,
        }
    }
}

pub type StudentListController = PaginatedListController<Student, StudentFilter>;

pub fn student_list(backend: Arc<dyn Backend>, page_size: u32) -> StudentListController {
    PaginatedListController::new(backend, "students", page_size)
}
