use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::drivers::{InventoryBatchRequest, InventoryView},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(view_inventory).put(update_inventory))
}

#[utoipa::path(
    get,
    path = "/api/driver/inventory",
    responses(
        (status = 200, description = "Current driver's inventory", body = ApiResponse<InventoryView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn view_inventory(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<InventoryView>>> {
    let resp = inventory_service::view_inventory(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/driver/inventory",
    request_body = InventoryBatchRequest,
    responses(
        (status = 200, description = "Apply a stock batch to the driver's inventory", body = ApiResponse<InventoryView>),
        (status = 400, description = "Invalid item(s); nothing applied"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<InventoryBatchRequest>,
) -> AppResult<Json<ApiResponse<InventoryView>>> {
    let resp = inventory_service::update_inventory(&state, &user, payload).await?;
    Ok(Json(resp))
}
