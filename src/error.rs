use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::OrderStatus;
use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("product {0} not found")]
    UnknownProduct(Uuid),

    #[error("order {0} not found")]
    UnknownOrder(Uuid),

    #[error("driver {0} not found")]
    UnknownDriver(Uuid),

    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },

    #[error("product {0} is not in the cart")]
    ItemNotInCart(Uuid),

    #[error("you may only place one order at a time")]
    AlreadyHasActiveOrder,

    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("order is already assigned to a driver")]
    AlreadyAssigned,

    #[error("you are not authorized to do this")]
    NotAuthorized,

    #[error("invalid or missing credentials")]
    Unauthenticated,

    #[error("Not Found")]
    NotFound,

    #[error("store error")]
    Store(#[from] StoreError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_)
            | AppError::UnknownProduct(_)
            | AppError::InsufficientStock { .. }
            | AppError::ItemNotInCart(_)
            | AppError::AlreadyHasActiveOrder
            | AppError::InvalidTransition { .. }
            | AppError::AlreadyAssigned => StatusCode::BAD_REQUEST,
            AppError::UnknownOrder(_) | AppError::UnknownDriver(_) | AppError::NotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::NotAuthorized => StatusCode::FORBIDDEN,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
