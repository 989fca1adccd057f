//! Posts list: school and class announcements.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::Backend;
use crate::list::{ListFilter, PaginatedListController};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostAudience {
    School,
    Class,
    Parents,
    Teachers,
}

impl PostAudience {
    #[must_use]
    pub fn as_param(&self) -> &'static str {
        match self {
            PostAudience::School => "school",
            PostAudience::Class => "class",
            PostAudience::Parents => "parents",
            PostAudience::Teachers => "teachers",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default, deserialize_with = "crate::modules::lenient_enum")]
    pub audience: Option<PostAudience>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub audience: Option<PostAudience>,
    pub author_id: Option<String>,
    pub search: Option<String>,
}

impl ListFilter for PostFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(audience) = &self.audience {
            pairs.push(("audience", audience.as_param().to_string()));
        }
        if let Some(author_id) = &self.author_id {
            pairs.push(("authorId", author_id.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }

    fn clear(&mut self, key: &str) -> bool {
        match key {
            "audience" => self.audience.take().is_some(),
            "authorId" => self.author_id.take().is_some(),
            "search" => self.search.take().is_some(),
            _ => false,
        }
    }
}

pub type PostListController = PaginatedListController<Post, PostFilter>;

pub fn post_list(backend: Arc<dyn Backend>, page_size: u32) -> PostListController {
    PaginatedListController::new(backend, "posts", page_size)
}
