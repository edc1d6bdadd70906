use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ActiveValue, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use engine::{Engine, masks, opening_hours, pharmacies, users};
use migration::MigratorTrait;
use server::{ServerState, router};

struct Fixture {
    app: Router,
    user_id: i64,
    pharmacy_id: i64,
    other_pharmacy_id: i64,
    mask_id: i64,
}

async fn fixture() -> Fixture {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let user_id = seed_user(&db, "Ada", 10_000).await;
    let pharmacy_id = seed_pharmacy(&db, "CarePoint").await;
    let other_pharmacy_id = seed_pharmacy(&db, "Night Owl").await;
    let mask_id = seed_mask(&db, "True Barrier (green)", 3_000, pharmacy_id).await;
    seed_window(&db, pharmacy_id, "Monday", "08:00", "12:00").await;

    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    let app = router(ServerState::new(engine, db, Duration::from_secs(5)));

    Fixture {
        app,
        user_id,
        pharmacy_id,
        other_pharmacy_id,
        mask_id,
    }
}

async fn seed_user(db: &DatabaseConnection, name: &str, cash_balance_cents: i64) -> i64 {
    users::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name.to_string()),
        cash_balance_cents: ActiveValue::Set(cash_balance_cents),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_pharmacy(db: &DatabaseConnection, name: &str) -> i64 {
    pharmacies::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name.to_string()),
        cash_balance_cents: ActiveValue::Set(0),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_mask(db: &DatabaseConnection, name: &str, price_cents: i64, pharmacy_id: i64) -> i64 {
    masks::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name.to_string()),
        price_cents: ActiveValue::Set(price_cents),
        pharmacy_id: ActiveValue::Set(pharmacy_id),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_window(db: &DatabaseConnection, pharmacy_id: i64, day: &str, open: &str, close: &str) {
    opening_hours::ActiveModel {
        id: ActiveValue::NotSet,
        pharmacy_id: ActiveValue::Set(pharmacy_id),
        day_of_week: ActiveValue::Set(day.to_string()),
        open_time: ActiveValue::Set(open.to_string()),
        close_time: ActiveValue::Set(close.to_string()),
    }
    .insert(db)
    .await
    .unwrap();
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn purchase_returns_full_success_envelope() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(post_json(
            "/api/v1/pharmacies/purchase",
            json!({
                "user_id": fx.user_id,
                "pharmacy_id": fx.pharmacy_id,
                "mask_id": fx.mask_id,
                "quantity": 3,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["purchase_ids"].as_array().unwrap().len(), 3);
    assert_eq!(body["details"]["previous_balance_cents"], json!(10_000));
    assert_eq!(body["details"]["new_balance_cents"], json!(1_000));
    assert_eq!(body["details"]["total_amount_cents"], json!(9_000));
    assert_eq!(body["details"]["user_name"], json!("Ada"));
    assert_eq!(body["details"]["pharmacy_name"], json!("CarePoint"));
}

#[tokio::test]
async fn purchase_with_insufficient_balance_reports_shortage() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(post_json(
            "/api/v1/pharmacies/purchase",
            json!({
                "user_id": fx.user_id,
                "pharmacy_id": fx.pharmacy_id,
                "mask_id": fx.mask_id,
                "quantity": 4,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("INSUFFICIENT_BALANCE"));
    assert_eq!(body["details"]["required_amount_cents"], json!(12_000));
    assert_eq!(body["details"]["current_balance_cents"], json!(10_000));
    assert_eq!(body["details"]["shortage_cents"], json!(2_000));
}

#[tokio::test]
async fn purchase_through_wrong_pharmacy_reports_both_ids() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(post_json(
            "/api/v1/pharmacies/purchase",
            json!({
                "user_id": fx.user_id,
                "pharmacy_id": fx.other_pharmacy_id,
                "mask_id": fx.mask_id,
                "quantity": 1,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("MASK_PHARMACY_MISMATCH"));
    assert_eq!(body["details"]["mask_pharmacy_id"], json!(fx.pharmacy_id));
    assert_eq!(
        body["details"]["requested_pharmacy_id"],
        json!(fx.other_pharmacy_id)
    );
}

#[tokio::test]
async fn purchase_for_unknown_user_is_404() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(post_json(
            "/api/v1/pharmacies/purchase",
            json!({
                "user_id": 424242,
                "pharmacy_id": fx.pharmacy_id,
                "mask_id": fx.mask_id,
                "quantity": 1,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("USER_NOT_FOUND"));
}

#[tokio::test]
async fn purchase_validation_failures_name_the_field() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(post_json(
            "/api/v1/pharmacies/purchase",
            json!({
                "user_id": fx.user_id,
                "pharmacy_id": fx.pharmacy_id,
                "mask_id": fx.mask_id,
                "quantity": 0,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("INVALID_INPUT"));
    assert!(body["details"]["quantity"].is_string());
}

#[tokio::test]
async fn open_endpoint_lists_matching_pharmacies() {
    let fx = fixture().await;

    let response = fx
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/pharmacies/open",
            json!({ "day": "Monday", "time": "09:30" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["pharmacies"][0]["name"], json!("CarePoint"));

    let response = fx
        .app
        .oneshot(post_json(
            "/api/v1/pharmacies/open",
            json!({ "day": "Blursday", "time": "09:30" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_endpoint_returns_ranked_hits() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(post_json(
            "/api/v1/pharmacies/search",
            json!({ "query": "care", "type": "pharmacy" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["results"][0]["type"], json!("pharmacy"));
    assert_eq!(body["results"][0]["name"], json!("CarePoint"));
    assert_eq!(body["results"][0]["relevance"], json!(90.0));
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let fx = fixture().await;

    let response = fx
        .app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/pharmacies/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("healthy"));
}
