//! Fees list: outstanding and settled fees for one child.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::Backend;
use crate::list::{ListFilter, PaginatedListController, date_param};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Pending,
    Paid,
    Overdue,
    Waived,
}

impl FeeStatus {
    #[must_use]
    pub fn as_param(&self) -> &'static str {
        match self {
            FeeStatus::Pending => "pending",
            FeeStatus::Paid => "paid",
            FeeStatus::Overdue => "overdue",
            FeeStatus::Waived => "waived",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fee {
    pub id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "crate::modules::lenient_enum")]
    pub status: Option<FeeStatus>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeFilter {
    pub student_id: Option<String>,
    pub status: Option<FeeStatus>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}

impl FeeFilter {
    #[must_use]
    pub fn for_student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            ..Self::default()
        }
    }
}

impl ListFilter for FeeFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(student_id) = &self.student_id {
            pairs.push(("studentId", student_id.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_param().to_string()));
        }
        if let Some(from) = &self.due_from {
            pairs.push(("dueFrom", date_param(from)));
        }
        if let Some(to) = &self.due_to {
            pairs.push(("dueTo", date_param(to)));
        }
        pairs
    }

    fn clear(&mut self, key: &str) -> bool {
        match key {
            "studentId" => self.student_id.take().is_some(),
            "status" => self.status.take().is_some(),
            "dueFrom" => self.due_from.take().is_some(),
            "dueTo" => self.due_to.take().is_some(),
            _ => false,
        }
    }
}

pub type FeeListController = PaginatedListController<Fee, FeeFilter>;

pub fn fee_list(backend: Arc<dyn Backend>, page_size: u32) -> FeeListController {
    PaginatedListController::new(backend, "fees", page_size)
}
