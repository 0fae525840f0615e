use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use serde_json::json;
use shelf_http::{error::AppError, extract::ApiJson};
use shelf_kernel::AppState;

use super::{
    entity,
    models::{Book, BookList, IncomingBook, UpdatedBook},
};
use crate::{modules::sellers, utils};

/// HTTP routes of the books module, relative to the API prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books", post(create_book).get(list_books))
        .route("/books/", post(create_book).get(list_books))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
}

/// A book must always point at an existing seller.
async fn ensure_seller_exists<C: ConnectionTrait>(db: &C, seller_id: i32) -> Result<(), AppError> {
    let seller = sellers::entity::Entity::find_by_id(seller_id).one(db).await?;
    if seller.is_none() {
        return Err(AppError::validation(
            vec![json!({ "field": "seller_id", "error": "seller does not exist" })],
            format!("seller {} does not exist", seller_id),
        ));
    }
    Ok(())
}

async fn find_book<C: ConnectionTrait>(db: &C, book_id: i32) -> Result<entity::Model, AppError> {
    entity::Entity::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("book {} not found", book_id)))
}

async fn create_book(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<IncomingBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    payload.validate()?;
    ensure_seller_exists(&state.db, payload.seller_id).await?;

    let book = entity::ActiveModel {
        title: Set(payload.title),
        author: Set(payload.author),
        year: Set(payload.year),
        count_pages: Set(payload.count_pages),
        seller_id: Set(payload.seller_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(book_id = book.id, seller_id = book.seller_id, "book created");
    Ok((StatusCode::CREATED, Json(book.into())))
}

async fn list_books(State(state): State<AppState>) -> Result<Json<BookList>, AppError> {
    let books = entity::Entity::find()
        .order_by_asc(entity::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(BookList {
        books: books.into_iter().map(Book::from).collect(),
    }))
}

async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> Result<Json<Book>, AppError> {
    let book = find_book(&state.db, book_id).await?;
    Ok(Json(book.into()))
}

async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
    ApiJson(payload): ApiJson<UpdatedBook>,
) -> Result<Json<Book>, AppError> {
    utils::ensure_same_id(book_id, payload.id)?;
    payload.validate()?;

    let mut book = find_book(&state.db, book_id).await?.into_active_model();
    ensure_seller_exists(&state.db, payload.seller_id).await?;

    book.title = Set(payload.title);
    book.author = Set(payload.author);
    book.year = Set(payload.year);
    book.count_pages = Set(payload.count_pages);
    book.seller_id = Set(payload.seller_id);
    let book = book.update(&state.db).await?;

    tracing::info!(book_id = book.id, "book updated");
    Ok(Json(book.into()))
}

async fn delete_book(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = entity::Entity::delete_by_id(book_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found(format!("book {} not found", book_id)));
    }

    tracing::info!(book_id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
