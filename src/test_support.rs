//! Harness for driving the full router against an in-memory database.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use shelf_kernel::{
    settings::{DatabaseSettings, Settings},
    AppState,
};
use tower::ServiceExt;

use crate::modules::{books, sellers};

pub(crate) struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

impl TestApp {
    pub async fn new() -> Self {
        let settings = Settings {
            database: DatabaseSettings::in_memory(),
            ..Settings::default()
        };
        let registry = crate::registry();
        let db = shelf_db::connect(&settings.database).await.unwrap();
        shelf_db::run_migrations(&db, &registry.collect_migrations())
            .await
            .unwrap();
        let router = shelf_http::build_router(&registry, &settings, AppState::new(db.clone()));

        Self { router, db }
    }

    /// Send one request; an empty response body comes back as `Value::Null`.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Insert a seller directly, bypassing the HTTP layer.
    pub async fn seed_seller(&self, first_name: &str, last_name: &str, email: &str) -> sellers::entity::Model {
        sellers::entity::ActiveModel {
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            email: Set(email.to_string()),
            password: Set("1234".to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    /// Insert a book directly, bypassing the HTTP layer.
    pub async fn seed_book(
        &self,
        seller_id: i32,
        title: &str,
        author: &str,
        year: i32,
        count_pages: i32,
    ) -> books::entity::Model {
        books::entity::ActiveModel {
            title: Set(title.to_string()),
            author: Set(author.to_string()),
            year: Set(year),
            count_pages: Set(count_pages),
            seller_id: Set(seller_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }
}
