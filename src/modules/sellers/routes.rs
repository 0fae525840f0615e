use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde_json::json;
use shelf_http::{error::AppError, extract::ApiJson};
use shelf_kernel::AppState;

use super::{
    entity,
    models::{IncomingSeller, Seller, SellerList, SellerWithBooks, UpdatedSeller},
};
use crate::{
    modules::books::{self, models::Book},
    utils,
};

/// HTTP routes of the sellers module, relative to the API prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sellers", post(create_seller).get(list_sellers))
        .route("/sellers/", post(create_seller).get(list_sellers))
        .route(
            "/sellers/{id}",
            get(get_seller).put(update_seller).delete(delete_seller),
        )
}

/// Map a unique-index violation on `email` to 409.
fn email_conflict(err: DbErr, email: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(
            vec![json!({ "field": "email", "error": "already registered" })],
            format!("email {} is already registered", email),
        ),
        _ => AppError::from(err),
    }
}

async fn find_seller<C: ConnectionTrait>(
    db: &C,
    seller_id: i32,
) -> Result<entity::Model, AppError> {
    entity::Entity::find_by_id(seller_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("seller {} not found", seller_id)))
}

async fn create_seller(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<IncomingSeller>,
) -> Result<(StatusCode, Json<Seller>), AppError> {
    payload.validate()?;

    let email = payload.email.clone();
    let seller = entity::ActiveModel {
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        email: Set(payload.email),
        password: Set(payload.password),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|err| email_conflict(err, &email))?;

    tracing::info!(seller_id = seller.id, "seller created");
    Ok((StatusCode::CREATED, Json(seller.into())))
}

async fn list_sellers(State(state): State<AppState>) -> Result<Json<SellerList>, AppError> {
    let sellers = entity::Entity::find()
        .order_by_asc(entity::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(SellerList {
        sellers: sellers.into_iter().map(Seller::from).collect(),
    }))
}

async fn get_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
) -> Result<Json<SellerWithBooks>, AppError> {
    let seller = find_seller(&state.db, seller_id).await?;
    let books = seller
        .find_related(books::entity::Entity)
        .order_by_asc(books::entity::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(SellerWithBooks::new(
        seller,
        books.into_iter().map(Book::from).collect(),
    )))
}

async fn update_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
    ApiJson(payload): ApiJson<UpdatedSeller>,
) -> Result<Json<Seller>, AppError> {
    utils::ensure_same_id(seller_id, payload.id)?;
    payload.validate()?;

    let mut seller = find_seller(&state.db, seller_id).await?.into_active_model();
    seller.first_name = Set(payload.first_name);
    seller.last_name = Set(payload.last_name);
    seller.email = Set(payload.email.clone());
    let seller = seller
        .update(&state.db)
        .await
        .map_err(|err| email_conflict(err, &payload.email))?;

    tracing::info!(seller_id = seller.id, "seller updated");
    Ok(Json(seller.into()))
}

/// Deletes the seller together with every book they own.
async fn delete_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let txn = state.db.begin().await?;

    let seller = find_seller(&txn, seller_id).await?;
    let books = books::entity::Entity::delete_many()
        .filter(books::entity::Column::SellerId.eq(seller.id))
        .exec(&txn)
        .await?;
    seller.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        seller_id,
        books_removed = books.rows_affected,
        "seller deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
