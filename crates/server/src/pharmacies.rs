//! Pharmacy catalog endpoints

use api_types::pharmacy::{
    MaskView, OpenPharmaciesRequest, OpenPharmaciesResponse, PharmacyFilterRequest,
    PharmacyFilterResponse, PharmacyMasksRequest, PharmacyMasksResponse, PharmacyView,
    PharmacyWithCount,
};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, validation};

fn pharmacy_view(model: engine::pharmacies::Model) -> PharmacyView {
    PharmacyView {
        id: model.id,
        name: model.name,
        cash_balance_cents: model.cash_balance_cents,
    }
}

pub async fn open(
    State(state): State<ServerState>,
    Json(payload): Json<OpenPharmaciesRequest>,
) -> Result<Json<OpenPharmaciesResponse>, ServerError> {
    let (day, time) = validation::validate_open(&payload)?;
    let rows = state.engine.open_pharmacies(&day, &time).await?;

    let pharmacies: Vec<_> = rows.into_iter().map(pharmacy_view).collect();
    Ok(Json(OpenPharmaciesResponse {
        count: pharmacies.len(),
        pharmacies,
    }))
}

pub async fn masks(
    State(state): State<ServerState>,
    Json(payload): Json<PharmacyMasksRequest>,
) -> Result<Json<PharmacyMasksResponse>, ServerError> {
    let (pharmacy_id, sort, order) = validation::validate_masks(&payload)?;
    let (pharmacy, masks) = state.engine.pharmacy_masks(pharmacy_id, sort, order).await?;

    let masks: Vec<_> = masks
        .into_iter()
        .map(|mask| MaskView {
            id: mask.id,
            name: mask.name,
            price_cents: mask.price_cents,
            pharmacy_id: mask.pharmacy_id,
        })
        .collect();
    Ok(Json(PharmacyMasksResponse {
        pharmacy_id: pharmacy.id,
        pharmacy_name: pharmacy.name,
        count: masks.len(),
        masks,
    }))
}

pub async fn filter(
    State(state): State<ServerState>,
    Json(payload): Json<PharmacyFilterRequest>,
) -> Result<Json<PharmacyFilterResponse>, ServerError> {
    let (operator, count, min_price_cents, max_price_cents) =
        validation::validate_filter(&payload)?;
    let rows = state
        .engine
        .pharmacies_by_mask_count(operator, count, min_price_cents, max_price_cents)
        .await?;

    let pharmacies: Vec<_> = rows
        .into_iter()
        .map(|row| PharmacyWithCount {
            id: row.id,
            name: row.name,
            cash_balance_cents: row.cash_balance_cents,
            mask_count: row.mask_count,
        })
        .collect();
    Ok(Json(PharmacyFilterResponse {
        count: pharmacies.len(),
        pharmacies,
    }))
}
