use serde::{Deserialize, Serialize};
use shelf_http::error::AppError;

use super::entity;
use crate::modules::books::models::Book;
use crate::utils::Violations;

/// Seller as returned by the API; the password is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seller {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<entity::Model> for Seller {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
        }
    }
}

/// Single-seller view with the seller's catalogue nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerWithBooks {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub books: Vec<Book>,
}

impl SellerWithBooks {
    pub fn new(seller: entity::Model, books: Vec<Book>) -> Self {
        Self {
            first_name: seller.first_name,
            last_name: seller.last_name,
            email: seller.email,
            books,
        }
    }
}

/// Wrapper for the list endpoint: `{"sellers": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerList {
    pub sellers: Vec<Seller>,
}

/// Body of `POST /sellers/`.
#[derive(Clone, Deserialize)]
pub struct IncomingSeller {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for IncomingSeller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncomingSeller")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl IncomingSeller {
    pub fn validate(&self) -> Result<(), AppError> {
        Violations::new()
            .require_text("first_name", &self.first_name)
            .require_text("last_name", &self.last_name)
            .require_email("email", &self.email)
            .require_text("password", &self.password)
            .finish("invalid seller")
    }
}

/// Body of `PUT /sellers/{id}`. The password cannot be changed here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatedSeller {
    #[serde(default)]
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UpdatedSeller {
    pub fn validate(&self) -> Result<(), AppError> {
        Violations::new()
            .require_text("first_name", &self.first_name)
            .require_text("last_name", &self.last_name)
            .require_email("email", &self.email)
            .finish("invalid seller")
    }
}
