//! Notes list: remarks exchanged between teachers and parents about a
//! student.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::backend::Backend;
use crate::list::{ListFilter, PaginatedListController};
use crate::session::model::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "crate::modules::lenient_enum")]
    pub author_role: Option<Role>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub student_id: Option<String>,
    pub author_role: Option<Role>,
    pub search: Option<String>,
}

impl NoteFilter {
    #[must_use]
    pub fn for_student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            ..Self::default()
        }
    }
}

impl ListFilter for NoteFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(student_id) = &self.student_id {
            pairs.push(("studentId", student_id.clone()));
        }
        if let Some(role) = &self.author_role {
            pairs.push(("authorRole", role.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }

    fn clear(&mut self, key: &str) -> bool {
        match key {
            "studentId" => self.student_id.take().is_some(),
            "authorRole" => self.author_role.take().is_some(),
            "search" => self.search.take().is_some(),
            _ => false,
        }
    }
}

pub type NoteListController = PaginatedListController<Note, NoteFilter>;

pub fn note_list(backend: Arc<dyn Backend>, page_size: u32) -> NoteListController {
    PaginatedListController::new(backend, "notes", page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_role_serialized_lowercase() {
        let filter = NoteFilter {
            author_role: Some(Role::Teacher),
            ..NoteFilter::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("authorRole", "teacher".to_string())]
        );
    }
}
