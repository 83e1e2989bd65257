use crate::auth::gate::{AdminUser, AuthUser};
use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::sweet::{
    CreateSweetRequest, MessageResponse, PurchaseRequest, RestockRequest, SearchQuery,
    SweetListResponse, SweetResponse, UpdateSweetRequest,
};
use crate::search::filter::SweetFilter;
use crate::stores::sweet_store::{StoreError, SweetChanges};
use crate::validation::input;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Create a sweet (admin only)
///
/// POST /api/sweets
pub async fn create_sweet(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(body): Json<CreateSweetRequest>,
) -> Result<Response, ApiError> {
    let name = input::required_text(&body.name, "Name")?;
    let category = input::required_text(&body.category, "Category")?;
    let price = input::validate_price(body.price)?;
    let quantity = body.quantity.unwrap_or(0);

    let sweet = state.sweets.insert(name, category, price, quantity)?;

    info!(
        sweet_id = %sweet.id,
        name = %sweet.name,
        quantity = sweet.quantity,
        admin = %admin.username,
        "Sweet created"
    );

    Ok((
        StatusCode::CREATED,
        Json(SweetResponse {
            message: "Sweet created successfully".to_string(),
            sweet,
        }),
    )
        .into_response())
}

/// List all sweets, most-recently-created first
///
/// GET /api/sweets
pub async fn list_sweets(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Response, ApiError> {
    let sweets = state.sweets.list();
    Ok(Json(SweetListResponse { sweets }).into_response())
}

/// Search sweets by optional name/category substring and price range
///
/// GET /api/sweets/search?name=&category=&minPrice=&maxPrice=
pub async fn search_sweets(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let filter = SweetFilter::from_query(query);
    let sweets = state.sweets.search(&filter);
    Ok(Json(SweetListResponse { sweets }).into_response())
}

/// Update any subset of a sweet's fields (admin only)
///
/// PUT /api/sweets/{id}
pub async fn update_sweet(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSweetRequest>,
) -> Result<Response, ApiError> {
    let changes = SweetChanges {
        name: body
            .name
            .map(|name| input::required_text(&name, "Name"))
            .transpose()?,
        category: body
            .category
            .map(|category| input::required_text(&category, "Category"))
            .transpose()?,
        price: body.price.map(input::validate_price).transpose()?,
        quantity: body.quantity,
    };

    let sweet = state.sweets.update(id, changes)?;

    info!(sweet_id = %sweet.id, admin = %admin.username, "Sweet updated");

    Ok(Json(SweetResponse {
        message: "Sweet updated successfully".to_string(),
        sweet,
    })
    .into_response())
}

/// Permanently delete a sweet (admin only)
///
/// DELETE /api/sweets/{id}
pub async fn delete_sweet(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let sweet = state.sweets.remove(id)?;

    info!(sweet_id = %id, name = %sweet.name, admin = %admin.username, "Sweet deleted");

    Ok(Json(MessageResponse {
        message: "Sweet deleted successfully".to_string(),
    })
    .into_response())
}

/// Purchase: atomically decrement stock, bounded by availability
///
/// POST /api/sweets/{id}/purchase
pub async fn purchase_sweet(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<PurchaseRequest>,
) -> Result<Response, ApiError> {
    let amount = input::purchase_amount(body.quantity)?;

    let sweet = match state.sweets.purchase(id, amount) {
        Ok(sweet) => sweet,
        Err(err @ StoreError::InsufficientStock { .. }) => {
            warn!(sweet_id = %id, user = %user.username, amount, "Purchase rejected: {}", err);
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    info!(
        sweet_id = %sweet.id,
        user = %user.username,
        amount,
        remaining = sweet.quantity,
        "Purchase successful"
    );

    Ok(Json(SweetResponse {
        message: "Purchase successful".to_string(),
        sweet,
    })
    .into_response())
}

/// Restock: atomically increment stock (admin only)
///
/// POST /api/sweets/{id}/restock
pub async fn restock_sweet(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RestockRequest>,
) -> Result<Response, ApiError> {
    let amount = input::restock_amount(body.quantity)?;

    let sweet = state.sweets.restock(id, amount)?;

    info!(
        sweet_id = %sweet.id,
        admin = %admin.username,
        amount,
        quantity = sweet.quantity,
        "Restock successful"
    );

    Ok(Json(SweetResponse {
        message: "Restock successful".to_string(),
        sweet,
    })
    .into_response())
}
