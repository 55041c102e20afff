use uuid::Uuid;

use crate::{
    dto::drivers::{DriverList, RegisterDriverRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_driver},
    models::{DriverProfile, Role},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Promote the calling account to the driver role and create its profile.
pub async fn register_driver(
    state: &AppState,
    user: &AuthUser,
    payload: RegisterDriverRequest,
) -> AppResult<ApiResponse<DriverProfile>> {
    if state
        .store
        .find_driver_by_account(user.account_id)
        .await?
        .is_some()
    {
        return Err(AppError::InvalidInput(
            "driver profile already exists".into(),
        ));
    }

    let account = state
        .store
        .find_account(user.account_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut promoted = account;
    promoted.role = Role::Driver;
    state.store.update_account(promoted.clone()).await?;

    let profile = DriverProfile::new(promoted.id, payload.phone.or_else(|| promoted.phone.clone()));
    if let Err(err) = state.store.insert_driver(profile.clone()).await {
        // profile never landed; put the role back
        let mut reverted = promoted;
        reverted.role = Role::Customer;
        if let Err(err) = state.store.update_account(reverted).await {
            tracing::error!(account = %user.account_id, error = %err, "role rollback failed after driver registration");
        }
        return Err(err.into());
    }

    tracing::info!(account = %user.account_id, driver = %profile.id, "driver registered");
    Ok(ApiResponse::success(
        "Driver registered",
        profile,
        Some(Meta::empty()),
    ))
}

pub async fn list_drivers(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<DriverList>> {
    ensure_driver(user)?;
    let (page, limit, offset) = pagination.normalize();
    let all = state.store.list_drivers().await?;
    let total = all.len() as i64;
    let items = all
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Drivers", DriverList { items }, Some(meta)))
}

pub async fn get_driver(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<DriverProfile>> {
    ensure_driver(user)?;
    let profile = state
        .store
        .find_driver(id)
        .await?
        .ok_or(AppError::UnknownDriver(id))?;
    Ok(ApiResponse::success("Driver", profile, None))
}
