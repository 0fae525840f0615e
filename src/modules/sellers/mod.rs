pub mod entity;
pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use shelf_kernel::{AppState, InitCtx, Migration, Module};

/// Sellers module: book vendors and their catalogues
pub struct SellersModule;

impl SellersModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for SellersModule {
    fn name(&self) -> &'static str {
        "sellers"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let sellers = entity::Entity::find().count(ctx.db).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            sellers,
            "sellers module initialized"
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
        let seller = json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Seller" }
            }
        });

        Some(json!({
            "paths": {
                "/sellers/": {
                    "get": {
                        "summary": "List sellers",
                        "tags": ["Sellers"],
                        "responses": {
                            "200": {
                                "description": "All sellers",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SellerList" }
                                    }
                                }
                            },
                            "500": error
                        }
                    },
                    "post": {
                        "summary": "Register a seller",
                        "tags": ["Sellers"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/IncomingSeller" }
                                }
                            }
                        },
                        "responses": {
                            "201": { "description": "Created seller", "content": seller },
                            "409": error,
                            "422": error
                        }
                    }
                },
                "/sellers/{id}": {
                    "parameters": [{
                        "name": "id",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "integer" }
                    }],
                    "get": {
                        "summary": "Get a seller with their books",
                        "tags": ["Sellers"],
                        "responses": {
                            "200": {
                                "description": "The seller",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SellerWithBooks" }
                                    }
                                }
                            },
                            "404": error
                        }
                    },
                    "put": {
                        "summary": "Update a seller's contact details",
                        "tags": ["Sellers"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdatedSeller" }
                                }
                            }
                        },
                        "responses": {
                            "200": { "description": "Updated seller", "content": seller },
                            "404": error,
                            "409": error,
                            "422": error
                        }
                    },
                    "delete": {
                        "summary": "Delete a seller and their books",
                        "tags": ["Sellers"],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Seller": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "email": { "type": "string", "format": "email" }
                        },
                        "required": ["id", "first_name", "last_name", "email"]
                    },
                    "SellerWithBooks": {
                        "type": "object",
                        "properties": {
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "email": { "type": "string", "format": "email" },
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["first_name", "last_name", "email", "books"]
                    },
                    "SellerList": {
                        "type": "object",
                        "properties": {
                            "sellers": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Seller" }
                            }
                        },
                        "required": ["sellers"]
                    },
                    "IncomingSeller": {
                        "type": "object",
                        "properties": {
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "email": { "type": "string", "format": "email" },
                            "password": { "type": "string", "format": "password" }
                        },
                        "required": ["first_name", "last_name", "email", "password"]
                    },
                    "UpdatedSeller": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "email": { "type": "string", "format": "email" }
                        },
                        "required": ["first_name", "last_name", "email"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE sellers (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name TEXT NOT NULL,
                    last_name  TEXT NOT NULL,
                    email      TEXT NOT NULL UNIQUE,
                    password   TEXT NOT NULL
                )
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "sellers module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "sellers module stopped");
        Ok(())
    }
}

/// Create a new instance of the sellers module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(SellersModule::new())
}
