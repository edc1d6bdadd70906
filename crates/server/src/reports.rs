//! Aggregate reporting endpoints

use api_types::reports::{
    TopUsersRequest, TopUsersResponse, TransactionSummaryData, TransactionSummaryRequest,
    TransactionSummaryResponse, UserTransactionSummary,
};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, validation};

pub async fn top_users(
    State(state): State<ServerState>,
    Json(payload): Json<TopUsersRequest>,
) -> Result<Json<TopUsersResponse>, ServerError> {
    let (start, end, limit) = validation::validate_top_users(&payload)?;
    let rows = state.engine.top_users(start, end, limit).await?;

    let top_users: Vec<_> = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let average_amount_cents = if row.transaction_count > 0 {
                row.total_amount_cents / row.transaction_count
            } else {
                0
            };
            UserTransactionSummary {
                user_id: row.user_id,
                user_name: row.user_name,
                total_amount_cents: row.total_amount_cents,
                transaction_count: row.transaction_count,
                average_amount_cents,
                rank: index + 1,
            }
        })
        .collect();

    Ok(Json(TopUsersResponse {
        count: top_users.len(),
        limit: limit as i64,
        top_users,
    }))
}

pub async fn summary(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionSummaryRequest>,
) -> Result<Json<TransactionSummaryResponse>, ServerError> {
    let (start, end) = validation::validate_summary(&payload)?;
    let totals = state.engine.transaction_summary(start, end).await?;

    let average_value_cents = if totals.total_masks > 0 {
        totals.total_value_cents / totals.total_masks
    } else {
        0
    };
    // Inclusive day count; the range was validated as start <= end.
    let days = (end - start).num_days() + 1;
    let daily_average_cents = if totals.total_value_cents > 0 {
        totals.total_value_cents / days
    } else {
        0
    };

    Ok(Json(TransactionSummaryResponse {
        summary: TransactionSummaryData {
            total_masks: totals.total_masks,
            total_value_cents: totals.total_value_cents,
            // One unit per record, so the record count is the mask count.
            transaction_count: totals.total_masks,
            average_value_cents,
            daily_average_cents,
        },
    }))
}
