use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error envelope returned by every failing endpoint.
///
/// `code` is machine-readable (`USER_NOT_FOUND`, `INSUFFICIENT_BALANCE`, ...)
/// and `details` carries kind-specific context fields, enough for a caller to
/// explain the failure without reading server logs.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

pub mod pharmacy {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OpenPharmaciesRequest {
        /// Day of the week, e.g. "Monday".
        pub day: String,
        /// Time of day in "HH:MM".
        pub time: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PharmacyView {
        pub id: i64,
        pub name: String,
        pub cash_balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OpenPharmaciesResponse {
        pub pharmacies: Vec<PharmacyView>,
        pub count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PharmacyMasksRequest {
        pub pharmacy_id: i64,
        /// "name" (default) or "price".
        pub sort: Option<String>,
        /// "asc" (default) or "desc".
        pub order: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MaskView {
        pub id: i64,
        pub name: String,
        pub price_cents: i64,
        pub pharmacy_id: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PharmacyMasksResponse {
        pub pharmacy_id: i64,
        pub pharmacy_name: String,
        pub masks: Vec<MaskView>,
        pub count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PharmacyFilterRequest {
        /// "more" or "less".
        pub operator: String,
        pub count: i64,
        pub min_price_cents: i64,
        pub max_price_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PharmacyWithCount {
        pub id: i64,
        pub name: String,
        pub cash_balance_cents: i64,
        pub mask_count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PharmacyFilterResponse {
        pub pharmacies: Vec<PharmacyWithCount>,
        pub count: usize,
    }
}

pub mod reports {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopUsersRequest {
        /// "YYYY-MM-DD", inclusive.
        pub start_date: String,
        /// "YYYY-MM-DD", inclusive (covers the whole day).
        pub end_date: String,
        pub limit: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserTransactionSummary {
        pub user_id: i64,
        pub user_name: String,
        pub total_amount_cents: i64,
        pub transaction_count: i64,
        pub average_amount_cents: i64,
        pub rank: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopUsersResponse {
        pub top_users: Vec<UserTransactionSummary>,
        pub count: usize,
        pub limit: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionSummaryRequest {
        pub start_date: String,
        pub end_date: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionSummaryData {
        pub total_masks: i64,
        pub total_value_cents: i64,
        pub transaction_count: i64,
        pub average_value_cents: i64,
        pub daily_average_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionSummaryResponse {
        pub summary: TransactionSummaryData,
    }
}

pub mod search {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SearchRequest {
        pub query: String,
        /// "pharmacy", "mask", "user" or "all" (default).
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SearchResult {
        #[serde(rename = "type")]
        pub kind: String,
        pub id: i64,
        pub name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub price_cents: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub pharmacy_id: Option<i64>,
        pub relevance: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SearchResponse {
        pub results: Vec<SearchResult>,
        pub count: usize,
        pub query: String,
        #[serde(rename = "type")]
        pub kind: String,
    }
}

pub mod purchase {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseRequest {
        pub user_id: i64,
        pub pharmacy_id: i64,
        pub mask_id: i64,
        /// Units to buy; 1..=999.
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseDetails {
        pub user_id: i64,
        pub user_name: String,
        pub pharmacy_id: i64,
        pub pharmacy_name: String,
        pub mask_id: i64,
        pub mask_name: String,
        pub unit_price_cents: i64,
        pub quantity: u32,
        pub total_amount_cents: i64,
        pub previous_balance_cents: i64,
        pub new_balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseResponse {
        pub success: bool,
        pub message: String,
        /// One id per purchased unit, in creation order.
        pub purchase_ids: Vec<i64>,
        pub details: PurchaseDetails,
        pub timestamp: DateTime<Utc>,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthResponse {
        pub status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reason: Option<String>,
    }
}
