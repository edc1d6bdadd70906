use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use engine::etl::{self, RawPharmacy, RawUser};
use engine::{masks, opening_hours, pharmacies, purchases, users};
use migration::MigratorTrait;

async fn db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

fn sample_users() -> Vec<RawUser> {
    serde_json::from_str(
        r#"[
            {
                "name": "Yvonne Guerrero",
                "cashBalance": 191.83,
                "purchaseHistories": [
                    {
                        "pharmacyName": "Keystone Pharmacy",
                        "maskName": "True Barrier (green) (3 per pack)",
                        "transactionAmount": 12.35,
                        "transactionDate": "2021-01-04 15:18:51"
                    },
                    {
                        "pharmacyName": "Keystone Pharmacy",
                        "maskName": "Second Smile (black)",
                        "transactionAmount": 5.84,
                        "transactionDate": "not-a-date"
                    }
                ]
            },
            {
                "name": "Murray Frost",
                "cashBalance": 461.51,
                "purchaseHistories": []
            }
        ]"#,
    )
    .unwrap()
}

fn sample_pharmacies() -> Vec<RawPharmacy> {
    serde_json::from_str(
        r#"[
            {
                "name": "DFW Wellness",
                "cashBalance": 328.41,
                "openingHours": "Mon, Wed 08:00 - 12:00 / Tue 2pm - 6pm",
                "masks": [
                    { "name": "True Barrier (green) (3 per pack)", "price": 13.7 },
                    { "name": "Second Smile (black)", "price": 5.84 }
                ]
            }
        ]"#,
    )
    .unwrap()
}

#[tokio::test]
async fn user_import_converts_amounts_and_skips_bad_dates() {
    let db = db().await;
    let imported = etl::import_users(&db, &sample_users()).await.unwrap();
    assert_eq!(imported, 2);

    let yvonne = users::Entity::find()
        .filter(users::Column::Name.eq("Yvonne Guerrero"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(yvonne.cash_balance_cents, 19_183);

    // One history row had an unparseable date and must have been dropped.
    let histories = purchases::Entity::find()
        .filter(purchases::Column::UserId.eq(yvonne.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].amount_cents, 1_235);
    assert_eq!(histories[0].pharmacy_name, "Keystone Pharmacy");
}

#[tokio::test]
async fn user_import_is_idempotent_by_name() {
    let db = db().await;
    assert_eq!(etl::import_users(&db, &sample_users()).await.unwrap(), 2);
    assert_eq!(etl::import_users(&db, &sample_users()).await.unwrap(), 0);
    assert_eq!(users::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(purchases::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn pharmacy_import_creates_catalog_and_opening_windows() {
    let db = db().await;
    let imported = etl::import_pharmacies(&db, &sample_pharmacies())
        .await
        .unwrap();
    assert_eq!(imported, 1);

    let pharmacy = pharmacies::Entity::find()
        .filter(pharmacies::Column::Name.eq("DFW Wellness"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pharmacy.cash_balance_cents, 32_841);

    let catalog = masks::Entity::find()
        .filter(masks::Column::PharmacyId.eq(pharmacy.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.iter().any(|mask| mask.price_cents == 1_370));
    assert!(catalog.iter().any(|mask| mask.price_cents == 584));

    let windows = opening_hours::Entity::find()
        .filter(opening_hours::Column::PharmacyId.eq(pharmacy.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(windows.len(), 3);
    assert!(windows.iter().any(|w| {
        w.day_of_week == "Monday" && w.open_time == "08:00" && w.close_time == "12:00"
    }));
    assert!(windows.iter().any(|w| {
        w.day_of_week == "Tuesday" && w.open_time == "14:00" && w.close_time == "18:00"
    }));

    // Re-import must not duplicate anything.
    assert_eq!(
        etl::import_pharmacies(&db, &sample_pharmacies())
            .await
            .unwrap(),
        0
    );
    assert_eq!(opening_hours::Entity::find().count(&db).await.unwrap(), 3);
}
