use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;
use serde_json::json;

pub use server::{
    DEFAULT_PURCHASE_DEADLINE, ServerState, router, run, run_with_listener, spawn_with_listener,
};

mod health;
mod pharmacies;
mod purchase;
mod reports;
mod search;
mod server;
mod validation;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Invalid {
        error: String,
        code: &'static str,
        details: Option<serde_json::Value>,
    },
    /// The request deadline elapsed before the purchase committed; the
    /// transaction has been rolled back.
    Timeout,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::UserNotFound(_)
        | EngineError::PharmacyNotFound(_)
        | EngineError::MaskNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::MaskPharmacyMismatch { .. }
        | EngineError::InsufficientBalance { .. }
        | EngineError::InvalidQuantity(_)
        | EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        EngineError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    match err {
        EngineError::UserNotFound(user_id) => ErrorBody {
            error: "User not found".to_string(),
            code: "USER_NOT_FOUND".to_string(),
            details: Some(json!({ "user_id": user_id })),
        },
        EngineError::MaskNotFound(mask_id) => ErrorBody {
            error: "Mask not found".to_string(),
            code: "MASK_NOT_FOUND".to_string(),
            details: Some(json!({ "mask_id": mask_id })),
        },
        EngineError::PharmacyNotFound(pharmacy_id) => ErrorBody {
            error: "Pharmacy not found".to_string(),
            code: "PHARMACY_NOT_FOUND".to_string(),
            details: Some(json!({ "pharmacy_id": pharmacy_id })),
        },
        EngineError::MaskPharmacyMismatch {
            mask_pharmacy_id,
            requested_pharmacy_id,
        } => ErrorBody {
            error: "Mask does not belong to specified pharmacy".to_string(),
            code: "MASK_PHARMACY_MISMATCH".to_string(),
            details: Some(json!({
                "mask_pharmacy_id": mask_pharmacy_id,
                "requested_pharmacy_id": requested_pharmacy_id,
            })),
        },
        EngineError::InsufficientBalance {
            required_cents,
            balance_cents,
        } => ErrorBody {
            error: "Insufficient balance".to_string(),
            code: "INSUFFICIENT_BALANCE".to_string(),
            details: Some(json!({
                "required_amount_cents": required_cents,
                "current_balance_cents": balance_cents,
                "shortage_cents": required_cents - balance_cents,
            })),
        },
        EngineError::InvalidQuantity(message) => ErrorBody {
            error: message,
            code: "INVALID_QUANTITY".to_string(),
            details: None,
        },
        EngineError::InvalidInput(message) => ErrorBody {
            error: message,
            code: "INVALID_INPUT".to_string(),
            details: None,
        },
        EngineError::Timeout(message) => {
            tracing::warn!("store timeout: {message}");
            ErrorBody {
                error: "Database query timeout".to_string(),
                code: "DB_TIMEOUT".to_string(),
                details: None,
            }
        }
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorBody {
                error: "internal server error".to_string(),
                code: "DB_ERROR".to_string(),
                details: None,
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Invalid {
                error,
                code,
                details,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    code: code.to_string(),
                    details,
                },
            ),
            ServerError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                ErrorBody {
                    error: "Database query timeout".to_string(),
                    code: "DB_TIMEOUT".to_string(),
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::UserNotFound(9)).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = ServerError::from(EngineError::PharmacyNotFound(9)).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = ServerError::from(EngineError::MaskNotFound(9)).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_business_rule_maps_to_400() {
        let res = ServerError::from(EngineError::InsufficientBalance {
            required_cents: 6_000,
            balance_cents: 5_000,
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = ServerError::from(EngineError::MaskPharmacyMismatch {
            mask_pharmacy_id: 7,
            requested_pharmacy_id: 9,
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_timeout_maps_to_408() {
        let res =
            ServerError::from(EngineError::Timeout("pool exhausted".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn deadline_timeout_maps_to_408() {
        let res = ServerError::Timeout.into_response();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "boom".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_400() {
        let res = ServerError::Invalid {
            error: "Invalid input".to_string(),
            code: "INVALID_INPUT",
            details: None,
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
