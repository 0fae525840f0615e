use serde::{Deserialize, Serialize};
use shelf_http::error::AppError;

use super::entity;
use crate::utils::Violations;

/// Book as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub count_pages: i32,
    pub seller_id: i32,
}

impl From<entity::Model> for Book {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            year: model.year,
            count_pages: model.count_pages,
            seller_id: model.seller_id,
        }
    }
}

/// Wrapper for the list endpoint: `{"books": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

/// Body of `POST /books/`. Clients send the page count as `pages`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingBook {
    pub title: String,
    pub author: String,
    #[serde(rename = "pages", alias = "count_pages")]
    pub count_pages: i32,
    pub year: i32,
    pub seller_id: i32,
}

/// Body of `PUT /books/{id}`: every mutable field, plus an optional echo of the id.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatedBook {
    #[serde(default)]
    pub id: Option<i32>,
    pub title: String,
    pub author: String,
    #[serde(alias = "pages")]
    pub count_pages: i32,
    pub year: i32,
    pub seller_id: i32,
}

fn validate(title: &str, author: &str, count_pages: i32) -> Result<(), AppError> {
    Violations::new()
        .require_text("title", title)
        .require_text("author", author)
        .require_positive("count_pages", count_pages)
        .finish("invalid book")
}

impl IncomingBook {
    pub fn validate(&self) -> Result<(), AppError> {
        validate(&self.title, &self.author, self.count_pages)
    }
}

impl UpdatedBook {
    pub fn validate(&self) -> Result<(), AppError> {
        validate(&self.title, &self.author, self.count_pages)
    }
}
