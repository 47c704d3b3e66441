//! Sweet routes: catalog CRUD, search, and the stock operations.
//!
//! Every route here sits behind the auth middleware; handlers receive the
//! caller as a [`CurrentAccount`] extension. Admin-only handlers call
//! `require_admin` first, so a valid token with the wrong role gets 403
//! (never 401, which is reserved for authentication failures).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use tracing::info;

use sweetshop_core::{validation, CoreError, NewSweet, SweetFilter, SweetUpdate};
use sweetshop_db::StockUpdate;

use crate::auth::CurrentAccount;
use crate::dto::{
    CreateSweetRequest, MessageResponse, SearchParams, StockRequest, SweetDto, UpdateSweetRequest,
};
use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sweets).post(create_sweet))
        .route("/search", get(search_sweets))
        .route("/:id", put(update_sweet).delete(delete_sweet))
        .route("/:id/purchase", post(purchase_sweet))
        .route("/:id/restock", post(restock_sweet))
}

/// GET /api/sweets
async fn list_sweets(
    State(state): State<AppState>,
    Extension(_account): Extension<CurrentAccount>,
) -> Result<Json<Vec<SweetDto>>, ApiError> {
    let sweets = state.db.sweets().list().await?;
    Ok(Json(sweets.into_iter().map(SweetDto::from).collect()))
}

/// POST /api/sweets (admin)
async fn create_sweet(
    State(state): State<AppState>,
    Extension(account): Extension<CurrentAccount>,
    Json(req): Json<CreateSweetRequest>,
) -> Result<(StatusCode, Json<SweetDto>), ApiError> {
    account.require_admin()?;

    let new = NewSweet {
        name: validation::validate_sweet_name(&req.name)?,
        category: validation::validate_category(&req.category)?,
        price: req.price,
        quantity: req.quantity,
    };
    validation::validate_price(new.price)?;
    validation::validate_quantity(new.quantity)?;

    let sweet = state.db.sweets().insert(&new).await?;
    info!(id = sweet.id, name = %sweet.name, "Sweet created");

    Ok((StatusCode::CREATED, Json(sweet.into())))
}

/// GET /api/sweets/search
///
/// All provided criteria are ANDed; blank strings are treated as absent.
async fn search_sweets(
    State(state): State<AppState>,
    Extension(_account): Extension<CurrentAccount>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SweetDto>>, ApiError> {
    if let Some(min) = params.min_price {
        validation::validate_price_bound("min_price", min)?;
    }
    if let Some(max) = params.max_price {
        validation::validate_price_bound("max_price", max)?;
    }

    let filter = SweetFilter {
        name: non_blank(params.name),
        category: non_blank(params.category),
        min_price: params.min_price,
        max_price: params.max_price,
    };

    let sweets = state.db.sweets().search(&filter).await?;
    Ok(Json(sweets.into_iter().map(SweetDto::from).collect()))
}

/// PUT /api/sweets/{id} (admin)
async fn update_sweet(
    State(state): State<AppState>,
    Extension(account): Extension<CurrentAccount>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSweetRequest>,
) -> Result<Json<SweetDto>, ApiError> {
    account.require_admin()?;

    let update = SweetUpdate {
        name: req
            .name
            .as_deref()
            .map(validation::validate_sweet_name)
            .transpose()?,
        category: req
            .category
            .as_deref()
            .map(validation::validate_category)
            .transpose()?,
        price: req.price,
        quantity: req.quantity,
    };
    if let Some(price) = update.price {
        validation::validate_price(price)?;
    }
    if let Some(quantity) = update.quantity {
        validation::validate_quantity(quantity)?;
    }

    let sweet = state
        .db
        .sweets()
        .update(id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Sweet", id))?;

    info!(id, "Sweet updated");
    Ok(Json(sweet.into()))
}

/// DELETE /api/sweets/{id} (admin)
async fn delete_sweet(
    State(state): State<AppState>,
    Extension(account): Extension<CurrentAccount>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    account.require_admin()?;

    if !state.db.sweets().delete(id).await? {
        return Err(ApiError::not_found("Sweet", id));
    }

    info!(id, "Sweet deleted");
    Ok(Json(MessageResponse::new("Sweet deleted")))
}

/// POST /api/sweets/{id}/purchase
async fn purchase_sweet(
    State(state): State<AppState>,
    Extension(account): Extension<CurrentAccount>,
    Path(id): Path<i64>,
    Json(req): Json<StockRequest>,
) -> Result<Json<SweetDto>, ApiError> {
    validation::validate_stock_delta(req.quantity)?;

    match state.db.sweets().purchase(id, req.quantity).await? {
        StockUpdate::Applied(sweet) => {
            info!(id, quantity = req.quantity, buyer = %account.email, "Purchase applied");
            Ok(Json(sweet.into()))
        }
        StockUpdate::Insufficient {
            available,
            requested,
        } => Err(CoreError::InsufficientStock {
            id,
            available,
            requested,
        }
        .into()),
        StockUpdate::NotFound => Err(ApiError::not_found("Sweet", id)),
    }
}

/// POST /api/sweets/{id}/restock (admin)
async fn restock_sweet(
    State(state): State<AppState>,
    Extension(account): Extension<CurrentAccount>,
    Path(id): Path<i64>,
    Json(req): Json<StockRequest>,
) -> Result<Json<SweetDto>, ApiError> {
    account.require_admin()?;
    validation::validate_stock_delta(req.quantity)?;

    match state.db.sweets().restock(id, req.quantity).await? {
        StockUpdate::Applied(sweet) => {
            info!(id, quantity = req.quantity, "Restock applied");
            Ok(Json(sweet.into()))
        }
        // Restock never reports insufficiency
        _ => Err(ApiError::not_found("Sweet", id)),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
