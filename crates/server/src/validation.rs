//! Structural validation of incoming requests.
//!
//! Everything here runs before the engine and rejects malformed input with a
//! field-by-field error map. Data-dependent checks (mask ownership, balance
//! sufficiency) stay in the engine, which re-checks them regardless of what
//! passed here.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use api_types::{
    pharmacy::{OpenPharmaciesRequest, PharmacyFilterRequest, PharmacyMasksRequest},
    purchase::PurchaseRequest,
    reports::{TopUsersRequest, TransactionSummaryRequest},
    search::SearchRequest,
};
use engine::{
    CountFilter, MAX_PURCHASE_QUANTITY, MaskSort, PurchaseCmd, SearchKind, SortOrder,
    opening_hours,
};

use crate::ServerError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const MIN_SEARCH_LENGTH: usize = 2;
const MAX_SEARCH_LENGTH: usize = 100;
const DEFAULT_TOP_USERS_LIMIT: u64 = 10;

type FieldErrors = BTreeMap<&'static str, String>;

fn invalid_input(details: FieldErrors) -> ServerError {
    ServerError::Invalid {
        error: "Invalid input".to_string(),
        code: "INVALID_INPUT",
        details: Some(serde_json::json!(details)),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn validate_date_range(
    start_date: &str,
    end_date: &str,
    errors: &mut FieldErrors,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = parse_date(start_date);
    if start.is_none() {
        errors.insert("start_date", "Start date must be in YYYY-MM-DD format".to_string());
    }
    let end = parse_date(end_date);
    if end.is_none() {
        errors.insert("end_date", "End date must be in YYYY-MM-DD format".to_string());
    }
    let (start, end) = (start?, end?);
    if start > end {
        errors.insert("end_date", "End date must not be before start date".to_string());
        return None;
    }
    Some((start, end))
}

pub(crate) fn validate_open(
    req: &OpenPharmaciesRequest,
) -> Result<(String, String), ServerError> {
    let mut errors = FieldErrors::new();

    let day = opening_hours::canonical_day(&req.day);
    if day.is_none() {
        errors.insert("day", "Day must be a valid day of the week".to_string());
    }
    let time = req.time.trim();
    if NaiveTime::parse_from_str(time, TIME_FORMAT).is_err() {
        errors.insert("time", "Time must be in HH:MM format".to_string());
    }

    if !errors.is_empty() {
        return Err(invalid_input(errors));
    }
    Ok((day.unwrap_or_default().to_string(), time.to_string()))
}

pub(crate) fn validate_masks(
    req: &PharmacyMasksRequest,
) -> Result<(i64, MaskSort, SortOrder), ServerError> {
    let mut errors = FieldErrors::new();

    if req.pharmacy_id <= 0 {
        errors.insert(
            "pharmacy_id",
            "Pharmacy ID is required and must be greater than 0".to_string(),
        );
    }

    let sort = match req.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => MaskSort::default(),
        Some(raw) => MaskSort::try_from(raw).unwrap_or_else(|_| {
            errors.insert("sort", "Sort must be name or price".to_string());
            MaskSort::default()
        }),
    };
    let order = match req.order.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => SortOrder::default(),
        Some(raw) => SortOrder::try_from(raw).unwrap_or_else(|_| {
            errors.insert("order", "Order must be asc or desc".to_string());
            SortOrder::default()
        }),
    };

    if !errors.is_empty() {
        return Err(invalid_input(errors));
    }
    Ok((req.pharmacy_id, sort, order))
}

pub(crate) fn validate_filter(
    req: &PharmacyFilterRequest,
) -> Result<(CountFilter, i64, i64, i64), ServerError> {
    let mut errors = FieldErrors::new();

    let operator = CountFilter::try_from(req.operator.trim()).unwrap_or_else(|_| {
        errors.insert(
            "operator",
            "Operator is required and must be 'more' or 'less'".to_string(),
        );
        CountFilter::MoreThan
    });
    if req.count < 0 {
        errors.insert("count", "Count cannot be negative".to_string());
    }
    if req.min_price_cents <= 0 {
        errors.insert("min_price_cents", "Min price must be greater than 0".to_string());
    }
    if req.max_price_cents <= 0 {
        errors.insert("max_price_cents", "Max price must be greater than 0".to_string());
    }
    if !errors.is_empty() {
        return Err(invalid_input(errors));
    }

    if req.min_price_cents > req.max_price_cents {
        return Err(ServerError::Invalid {
            error: "min_price_cents cannot be greater than max_price_cents".to_string(),
            code: "INVALID_PRICE_RANGE",
            details: Some(serde_json::json!({
                "min_price_cents": req.min_price_cents,
                "max_price_cents": req.max_price_cents,
            })),
        });
    }

    Ok((operator, req.count, req.min_price_cents, req.max_price_cents))
}

pub(crate) fn validate_top_users(
    req: &TopUsersRequest,
) -> Result<(NaiveDate, NaiveDate, u64), ServerError> {
    let mut errors = FieldErrors::new();
    let range = validate_date_range(&req.start_date, &req.end_date, &mut errors);

    let mut limit = DEFAULT_TOP_USERS_LIMIT;
    match req.limit {
        Some(value) if value < 0 => {
            errors.insert("limit", "Limit must be a positive number or zero".to_string());
        }
        Some(value) if value > 0 => limit = value as u64,
        // Zero or absent falls back to the default.
        _ => {}
    }

    match range {
        Some((start, end)) if errors.is_empty() => Ok((start, end, limit)),
        _ => Err(invalid_input(errors)),
    }
}

pub(crate) fn validate_summary(
    req: &TransactionSummaryRequest,
) -> Result<(NaiveDate, NaiveDate), ServerError> {
    let mut errors = FieldErrors::new();
    match validate_date_range(&req.start_date, &req.end_date, &mut errors) {
        Some(range) if errors.is_empty() => Ok(range),
        _ => Err(invalid_input(errors)),
    }
}

fn is_safe_search_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || c == '-' || c == '\'' || c == '.'
}

pub(crate) fn validate_search(req: &SearchRequest) -> Result<(String, SearchKind), ServerError> {
    let mut errors = FieldErrors::new();

    let query = req.query.trim();
    let length = query.chars().count();
    if length < MIN_SEARCH_LENGTH || length > MAX_SEARCH_LENGTH {
        errors.insert(
            "query",
            format!("Query must be {MIN_SEARCH_LENGTH}-{MAX_SEARCH_LENGTH} characters"),
        );
    } else if !query.chars().all(is_safe_search_char) {
        errors.insert(
            "query",
            "Query may contain only letters, numbers, spaces, hyphens, apostrophes, and periods"
                .to_string(),
        );
    }

    let kind = match req.kind.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => SearchKind::default(),
        Some(raw) => {
            SearchKind::try_from(raw.to_lowercase().as_str()).unwrap_or_else(|_| {
                errors.insert(
                    "type",
                    "Type must be 'pharmacy', 'mask', 'user', or 'all'".to_string(),
                );
                SearchKind::default()
            })
        }
    };

    if !errors.is_empty() {
        return Err(invalid_input(errors));
    }
    Ok((query.to_string(), kind))
}

pub(crate) fn validate_purchase(req: &PurchaseRequest) -> Result<PurchaseCmd, ServerError> {
    let mut errors = FieldErrors::new();

    if req.user_id <= 0 {
        errors.insert("user_id", "User ID must be a positive number".to_string());
    }
    if req.pharmacy_id <= 0 {
        errors.insert("pharmacy_id", "Pharmacy ID must be a positive number".to_string());
    }
    if req.mask_id <= 0 {
        errors.insert("mask_id", "Mask ID must be a positive number".to_string());
    }
    if req.quantity <= 0 || req.quantity >= i64::from(MAX_PURCHASE_QUANTITY) {
        errors.insert(
            "quantity",
            format!("Quantity must be a positive number below {MAX_PURCHASE_QUANTITY}"),
        );
    }

    if !errors.is_empty() {
        return Err(invalid_input(errors));
    }
    Ok(PurchaseCmd {
        user_id: req.user_id,
        pharmacy_id: req.pharmacy_id,
        mask_id: req.mask_id,
        quantity: req.quantity as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_request_requires_day_and_time_format() {
        let ok = OpenPharmaciesRequest {
            day: "monday".to_string(),
            time: "14:30".to_string(),
        };
        let (day, time) = validate_open(&ok).unwrap();
        assert_eq!(day, "Monday");
        assert_eq!(time, "14:30");

        let bad = OpenPharmaciesRequest {
            day: "Mondayish".to_string(),
            time: "25:99".to_string(),
        };
        assert!(validate_open(&bad).is_err());
    }

    #[test]
    fn masks_request_defaults_sort_and_order() {
        let req = PharmacyMasksRequest {
            pharmacy_id: 3,
            sort: None,
            order: None,
        };
        let (id, sort, order) = validate_masks(&req).unwrap();
        assert_eq!(id, 3);
        assert_eq!(sort, MaskSort::Name);
        assert_eq!(order, SortOrder::Asc);

        let req = PharmacyMasksRequest {
            pharmacy_id: 0,
            sort: Some("size".to_string()),
            order: Some("sideways".to_string()),
        };
        assert!(validate_masks(&req).is_err());
    }

    #[test]
    fn filter_request_rejects_inverted_price_range() {
        let req = PharmacyFilterRequest {
            operator: "more".to_string(),
            count: 2,
            min_price_cents: 900,
            max_price_cents: 100,
        };
        let err = validate_filter(&req).unwrap_err();
        assert!(matches!(
            err,
            ServerError::Invalid {
                code: "INVALID_PRICE_RANGE",
                ..
            }
        ));
    }

    #[test]
    fn date_ranges_must_be_ordered() {
        let req = TransactionSummaryRequest {
            start_date: "2026-02-01".to_string(),
            end_date: "2026-01-01".to_string(),
        };
        assert!(validate_summary(&req).is_err());

        let req = TransactionSummaryRequest {
            start_date: "2026-01-01".to_string(),
            end_date: "2026-01-31".to_string(),
        };
        assert!(validate_summary(&req).is_ok());
    }

    #[test]
    fn top_users_limit_defaults_to_ten() {
        let req = TopUsersRequest {
            start_date: "2026-01-01".to_string(),
            end_date: "2026-01-31".to_string(),
            limit: None,
        };
        let (_, _, limit) = validate_top_users(&req).unwrap();
        assert_eq!(limit, 10);

        let req = TopUsersRequest {
            start_date: "2026-01-01".to_string(),
            end_date: "2026-01-31".to_string(),
            limit: Some(-1),
        };
        assert!(validate_top_users(&req).is_err());
    }

    #[test]
    fn search_query_length_and_charset_are_checked() {
        let req = SearchRequest {
            query: "a".to_string(),
            kind: None,
        };
        assert!(validate_search(&req).is_err());

        let req = SearchRequest {
            query: "care; DROP TABLE masks".to_string(),
            kind: None,
        };
        assert!(validate_search(&req).is_err());

        let req = SearchRequest {
            query: "  O'Hara's No. 5  ".to_string(),
            kind: Some("MASK".to_string()),
        };
        let (query, kind) = validate_search(&req).unwrap();
        assert_eq!(query, "O'Hara's No. 5");
        assert_eq!(kind, SearchKind::Mask);
    }

    #[test]
    fn purchase_request_bounds_quantity() {
        fn request(user_id: i64, quantity: i64) -> PurchaseRequest {
            PurchaseRequest {
                user_id,
                pharmacy_id: 1,
                mask_id: 1,
                quantity,
            }
        }

        assert!(validate_purchase(&request(1, 999)).is_ok());
        assert!(validate_purchase(&request(1, 1_000)).is_err());
        assert!(validate_purchase(&request(1, 0)).is_err());
        assert!(validate_purchase(&request(-4, 1)).is_err());
    }
}
