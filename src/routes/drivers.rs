use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::drivers::{DriverList, RegisterDriverRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::DriverProfile,
    response::ApiResponse,
    routes::params::Pagination,
    services::driver_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_driver).get(list_drivers))
        .route("/{id}", get(get_driver))
}

#[utoipa::path(
    post,
    path = "/api/drivers",
    request_body = RegisterDriverRequest,
    responses(
        (status = 200, description = "Promote the calling account to driver", body = ApiResponse<DriverProfile>),
        (status = 400, description = "Driver profile already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Drivers"
)]
pub async fn register_driver(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RegisterDriverRequest>,
) -> AppResult<Json<ApiResponse<DriverProfile>>> {
    let resp = driver_service::register_driver(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/drivers", security(("bearer_auth" = [])), tag = "Drivers")]
pub async fn list_drivers(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<DriverList>>> {
    let resp = driver_service::list_drivers(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/drivers/{id}", security(("bearer_auth" = [])), tag = "Drivers")]
pub async fn get_driver(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DriverProfile>>> {
    let resp = driver_service::get_driver(&state, &user, id).await?;
    Ok(Json(resp))
}
