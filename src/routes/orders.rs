use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, UpdateNotesRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::Pagination,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_all_orders))
        .route("/active", get(list_active_orders))
        .route("/me", get(my_orders))
        .route("/active/me", get(my_active_order))
        .route("/notes", put(update_notes))
        .route("/{id}", get(get_order).delete(cancel_order))
        .route("/{id}/accept", put(accept_order))
        .route("/{id}/advance", put(advance_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Create order from the current cart", body = ApiResponse<Order>),
        (status = 400, description = "Active order exists or cart is empty"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::create_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_all_orders(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/active", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn list_active_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_active_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/me", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn my_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::my_orders(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/active/me", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn my_active_order(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::my_active_order(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/{id}", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Driver accepts the order", body = ApiResponse<Order>),
        (status = 400, description = "Insufficient stock or already assigned"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn accept_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::accept_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/advance",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Advance the order one delivery state", body = ApiResponse<Order>),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Not the assigned driver"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn advance_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::advance_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/orders/notes", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn update_notes(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateNotesRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_notes(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Cancel the order", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Order is not cancellable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = order_service::cancel_order(&state, &user, id).await?;
    Ok(Json(resp))
}
