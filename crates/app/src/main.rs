use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "mascherina={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let server_settings = settings.server;
    let db = parse_database(&server_settings.database).await?;

    if let Some(seed) = &server_settings.seed {
        seed_data(&db, seed).await?;
    }

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await?;

    let bind = server_settings
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server_settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let purchase_deadline = server_settings
        .purchase_timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(server::DEFAULT_PURCHASE_DEADLINE);

    server::run_with_listener(engine, db, purchase_deadline, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

async fn seed_data(
    db: &sea_orm::DatabaseConnection,
    seed: &settings::Seed,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(path) = &seed.users {
        let data = std::fs::read_to_string(path)?;
        let raw: Vec<engine::etl::RawUser> = serde_json::from_str(&data)?;
        let imported = engine::etl::import_users(db, &raw).await?;
        tracing::info!("seeded {imported} users from {path}");
    }
    if let Some(path) = &seed.pharmacies {
        let data = std::fs::read_to_string(path)?;
        let raw: Vec<engine::etl::RawPharmacy> = serde_json::from_str(&data)?;
        let imported = engine::etl::import_pharmacies(db, &raw).await?;
        tracing::info!("seeded {imported} pharmacies from {path}");
    }
    Ok(())
}
