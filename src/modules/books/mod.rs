pub mod entity;
pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use shelf_kernel::{AppState, InitCtx, Migration, Module};

/// Books module: catalogue records owned by sellers
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = entity::Entity::find().count(ctx.db).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router<AppState> {
        routes::router()
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "description": "Error",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let book = json!({
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Book" }
                }
            }
        });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer" }
        }]);

        Some(json!({
            "paths": {
                "/books/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookList" }
                                    }
                                }
                            },
                            "500": error
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/IncomingBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": { "description": "Created book", "content": book["content"] },
                            "422": error
                        }
                    }
                },
                "/books/{id}": {
                    "parameters": id_param,
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "The book", "content": book["content"] },
                            "404": error
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdatedBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": { "description": "Updated book", "content": book["content"] },
                            "404": error,
                            "422": error
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "year": { "type": "integer" },
                            "count_pages": { "type": "integer" },
                            "seller_id": { "type": "integer" }
                        },
                        "required": ["id", "title", "author", "year", "count_pages", "seller_id"]
                    },
                    "BookList": {
                        "type": "object",
                        "properties": {
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["books"]
                    },
                    "IncomingBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "pages": { "type": "integer", "minimum": 1 },
                            "year": { "type": "integer" },
                            "seller_id": { "type": "integer" }
                        },
                        "required": ["title", "author", "pages", "year", "seller_id"]
                    },
                    "UpdatedBook": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "count_pages": { "type": "integer", "minimum": 1 },
                            "year": { "type": "integer" },
                            "seller_id": { "type": "integer" }
                        },
                        "required": ["title", "author", "count_pages", "year", "seller_id"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                id: "001_init",
                up: r#"
                CREATE TABLE books (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    title       TEXT    NOT NULL,
                    author      TEXT    NOT NULL,
                    year        INTEGER NOT NULL,
                    count_pages INTEGER NOT NULL,
                    seller_id   INTEGER NOT NULL REFERENCES sellers (id) ON DELETE CASCADE
                )
                "#,
            },
            Migration {
                id: "002_seller_index",
                up: "CREATE INDEX books_seller_id_idx ON books (seller_id)",
            },
        ]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::json;

    use super::entity;
    use crate::test_support::TestApp;

    #[tokio::test]
    async fn test_create_book() {
        let app = TestApp::new().await;
        let seller = app.seed_seller("Michail", "Smirnov", "msm@mail.ru").await;

        let (status, body) = app
            .request(
                Method::POST,
                "/api/v1/books/",
                Some(json!({
                    "title": "Wrong Code",
                    "author": "Robert Martin",
                    "pages": 104,
                    "year": 2007,
                    "seller_id": seller.id
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().expect("generated id");
        assert_eq!(
            body,
            json!({
                "title": "Wrong Code",
                "author": "Robert Martin",
                "count_pages": 104,
                "year": 2007,
                "id": id,
                "seller_id": seller.id
            })
        );

        let stored = entity::Entity::find_by_id(id as i32)
            .one(&app.db)
            .await
            .unwrap()
            .expect("book persisted");
        assert_eq!(stored.title, "Wrong Code");
    }

    #[tokio::test]
    async fn test_create_book_for_unknown_seller() {
        let app = TestApp::new().await;

        let (status, body) = app
            .request(
                Method::POST,
                "/api/v1/books/",
                Some(json!({
                    "title": "Wrong Code",
                    "author": "Robert Martin",
                    "pages": 104,
                    "year": 2007,
                    "seller_id": 42
                })),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["details"][0]["field"], "seller_id");
        assert_eq!(entity::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_book_rejects_invalid_fields() {
        let app = TestApp::new().await;
        let seller = app.seed_seller("Michail", "Smirnov", "msm@mail.ru").await;

        let (status, body) = app
            .request(
                Method::POST,
                "/api/v1/books/",
                Some(json!({
                    "title": "",
                    "author": "Robert Martin",
                    "pages": 0,
                    "year": 2007,
                    "seller_id": seller.id
                })),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);

        let (status, _) = app
            .request(
                Method::POST,
                "/api/v1/books/",
                Some(json!({ "title": "Wrong Code", "author": "Robert Martin" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_books() {
        let app = TestApp::new().await;
        let seller = app.seed_seller("Michail", "Smirnov", "msm@mail.ru").await;
        let book_1 = app
            .seed_book(seller.id, "Eugeny Onegin", "Pushkin", 2001, 104)
            .await;
        let book_2 = app.seed_book(seller.id, "Mziri", "Lermontov", 1997, 104).await;

        let (status, body) = app.request(Method::GET, "/api/v1/books/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["books"].as_array().unwrap().len(), 2);
        assert_eq!(
            body,
            json!({
                "books": [
                    {
                        "id": book_1.id,
                        "title": "Eugeny Onegin",
                        "author": "Pushkin",
                        "year": 2001,
                        "count_pages": 104,
                        "seller_id": seller.id
                    },
                    {
                        "id": book_2.id,
                        "title": "Mziri",
                        "author": "Lermontov",
                        "year": 1997,
                        "count_pages": 104,
                        "seller_id": seller.id
                    }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_list_without_trailing_slash() {
        let app = TestApp::new().await;

        let (status, body) = app.request(Method::GET, "/api/v1/books", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "books": [] }));
    }

    #[tokio::test]
    async fn test_get_single_book() {
        let app = TestApp::new().await;
        let seller = app.seed_seller("Michail", "Smirnov", "msm@mail.ru").await;
        let book = app
            .seed_book(seller.id, "Eugeny Onegin", "Pushkin", 2001, 104)
            .await;
        app.seed_book(seller.id, "Mziri", "Lermontov", 1997, 104).await;

        let (status, body) = app
            .request(Method::GET, &format!("/api/v1/books/{}", book.id), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "title": "Eugeny Onegin",
                "author": "Pushkin",
                "year": 2001,
                "count_pages": 104,
                "id": book.id,
                "seller_id": seller.id
            })
        );
    }

    #[tokio::test]
    async fn test_get_missing_book() {
        let app = TestApp::new().await;

        let (status, body) = app.request(Method::GET, "/api/v1/books/999", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_delete_book() {
        let app = TestApp::new().await;
        let seller = app.seed_seller("Michail", "Smirnov", "msm@mail.ru").await;
        let book = app
            .seed_book(seller.id, "Eugeny Onegin", "Pushkin", 2001, 104)
            .await;

        let (status, body) = app
            .request(Method::DELETE, &format!("/api/v1/books/{}", book.id), None)
            .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());
        assert!(entity::Entity::find().all(&app.db).await.unwrap().is_empty());

        let (status, _) = app
            .request(Method::DELETE, &format!("/api/v1/books/{}", book.id), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_book() {
        let app = TestApp::new().await;
        let seller = app.seed_seller("Michail", "Smirnov", "msm@mail.ru").await;
        let book = app
            .seed_book(seller.id, "Eugeny Onegin", "Pushkin", 2001, 104)
            .await;

        let (status, body) = app
            .request(
                Method::PUT,
                &format!("/api/v1/books/{}", book.id),
                Some(json!({
                    "title": "Mziri",
                    "author": "Lermontov",
                    "count_pages": 100,
                    "year": 2007,
                    "id": book.id,
                    "seller_id": seller.id
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Mziri");

        let stored = entity::Entity::find_by_id(book.id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Mziri");
        assert_eq!(stored.author, "Lermontov");
        assert_eq!(stored.count_pages, 100);
        assert_eq!(stored.year, 2007);
        assert_eq!(stored.id, book.id);
        assert_eq!(stored.seller_id, seller.id);
    }

    #[tokio::test]
    async fn test_update_book_moves_it_to_another_seller() {
        let app = TestApp::new().await;
        let first = app.seed_seller("Michail", "Smirnov", "msm@mail.ru").await;
        let second = app.seed_seller("Cazzi", "Opeia", "tattoo@ya.ru").await;
        let book = app.seed_book(first.id, "Mziri", "Lermontov", 1997, 104).await;

        let (status, body) = app
            .request(
                Method::PUT,
                &format!("/api/v1/books/{}", book.id),
                Some(json!({
                    "title": "Mziri",
                    "author": "Lermontov",
                    "count_pages": 104,
                    "year": 1997,
                    "seller_id": second.id
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["seller_id"], second.id);
    }

    #[tokio::test]
    async fn test_update_book_rejections() {
        let app = TestApp::new().await;
        let seller = app.seed_seller("Michail", "Smirnov", "msm@mail.ru").await;
        let book = app.seed_book(seller.id, "Mziri", "Lermontov", 1997, 104).await;
        let body = |id: i32, seller_id: i32| {
            json!({
                "title": "Mziri",
                "author": "Lermontov",
                "count_pages": 104,
                "year": 1997,
                "id": id,
                "seller_id": seller_id
            })
        };

        let (status, _) = app
            .request(
                Method::PUT,
                &format!("/api/v1/books/{}", book.id),
                Some(body(book.id + 1, seller.id)),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .request(
                Method::PUT,
                &format!("/api/v1/books/{}", book.id),
                Some(body(book.id, seller.id + 10)),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .request(Method::PUT, "/api/v1/books/999", Some(body(999, seller.id)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
