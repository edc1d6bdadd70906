//! Purchase endpoint

use api_types::purchase::{PurchaseDetails, PurchaseRequest, PurchaseResponse};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, validation};

/// Runs one purchase through the engine, bounded by the configured deadline.
///
/// If the deadline elapses while the engine is blocked on a row lock or on
/// store I/O, the engine future is dropped, its uncommitted transaction rolls
/// back and no lock is held past this point.
pub async fn process(
    State(state): State<ServerState>,
    Json(payload): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ServerError> {
    let cmd = validation::validate_purchase(&payload)?;

    let outcome = match tokio::time::timeout(
        state.purchase_deadline,
        state.engine.process_purchase(cmd),
    )
    .await
    {
        Ok(result) => result?,
        Err(_elapsed) => return Err(ServerError::Timeout),
    };

    let details = outcome.details;
    Ok(Json(PurchaseResponse {
        success: true,
        message: "Purchase completed successfully".to_string(),
        purchase_ids: outcome.purchase_ids,
        details: PurchaseDetails {
            user_id: details.user_id,
            user_name: details.user_name,
            pharmacy_id: details.pharmacy_id,
            pharmacy_name: details.pharmacy_name,
            mask_id: details.mask_id,
            mask_name: details.mask_name,
            unit_price_cents: details.unit_price_cents,
            quantity: details.quantity,
            total_amount_cents: details.total_cents,
            previous_balance_cents: details.previous_balance_cents,
            new_balance_cents: details.new_balance_cents,
        },
        timestamp: outcome.completed_at,
    }))
}
