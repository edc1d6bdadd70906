use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use migration::MigratorTrait;
use sea_orm::Database;

#[derive(Parser, Debug)]
#[command(name = "mascherina_admin")]
#[command(about = "Admin utilities for Mascherina (migrate, seed sample data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./mascherina.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or update the schema.
    Migrate,
    /// Import users (with purchase histories) from a JSON file.
    SeedUsers(SeedArgs),
    /// Import pharmacies (with catalogs and opening hours) from a JSON file.
    SeedPharmacies(SeedArgs),
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long)]
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.command {
        Command::Migrate => {
            migration::Migrator::up(&db, None).await?;
            println!("schema is up to date");
        }
        Command::SeedUsers(args) => {
            migration::Migrator::up(&db, None).await?;
            let data = std::fs::read_to_string(&args.file)?;
            let raw: Vec<engine::etl::RawUser> = serde_json::from_str(&data)?;
            let imported = engine::etl::import_users(&db, &raw).await?;
            println!("imported {imported} users from {}", args.file.display());
        }
        Command::SeedPharmacies(args) => {
            migration::Migrator::up(&db, None).await?;
            let data = std::fs::read_to_string(&args.file)?;
            let raw: Vec<engine::etl::RawPharmacy> = serde_json::from_str(&data)?;
            let imported = engine::etl::import_pharmacies(&db, &raw).await?;
            println!(
                "imported {imported} pharmacies from {}",
                args.file.display()
            );
        }
    }

    Ok(())
}
