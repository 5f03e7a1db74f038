use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Statement};

use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "barista={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    if let Some(bootstrap) = &settings.bootstrap {
        seed_admin(&db, bootstrap).await?;
    }

    let translations: engine::Translations = settings
        .translations
        .clone()
        .into_iter()
        .collect();
    let engine = engine::Engine::builder()
        .database(db.clone())
        .translations(translations)
        .build()
        .await?;

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(engine, db, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

/// Creates the configured admin account if it does not exist yet.
async fn seed_admin(
    db: &sea_orm::DatabaseConnection,
    bootstrap: &settings::Bootstrap,
) -> Result<(), sea_orm::DbErr> {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT OR IGNORE INTO users (name, password, roles, balance, drinks) \
         VALUES (?, ?, 'staff,admin', 0, 0)",
        vec![
            bootstrap.admin.clone().into(),
            bootstrap.password.clone().into(),
        ],
    ))
    .await?;
    tracing::info!("bootstrap admin '{}' is available", bootstrap.admin);
    Ok(())
}
