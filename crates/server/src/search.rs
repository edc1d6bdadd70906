//! Name search endpoint

use api_types::search::{SearchRequest, SearchResponse, SearchResult};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, validation};

pub async fn search(
    State(state): State<ServerState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ServerError> {
    let (query, kind) = validation::validate_search(&payload)?;
    let hits = state.engine.search(&query, kind).await?;

    let results: Vec<_> = hits
        .into_iter()
        .map(|hit| SearchResult {
            kind: hit.kind.to_string(),
            id: hit.id,
            name: hit.name,
            price_cents: hit.price_cents,
            pharmacy_id: hit.pharmacy_id,
            relevance: hit.relevance,
        })
        .collect();

    Ok(Json(SearchResponse {
        count: results.len(),
        results,
        query,
        kind: kind.as_str().to_string(),
    }))
}
