//! SeaORM connection factory and the module migration runner.

use std::time::Duration;

use anyhow::Context;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};
use shelf_kernel::{settings::DatabaseSettings, Migration};

const BOOKKEEPING_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Open a pooled connection to the configured database.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(settings.sqlx_logging);

    tracing::info!(
        target: "shelf-db",
        url = %settings.url,
        max_connections = settings.max_connections,
        "connecting to database"
    );

    Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database at '{}'", settings.url))
}

/// Apply every migration that has not been recorded yet.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row. Returns the number of migrations applied by this call.
pub async fn run_migrations(
    db: &DatabaseConnection,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    db.execute_unprepared(BOOKKEEPING_TABLE)
        .await
        .context("failed to create schema_migrations table")?;

    let backend = db.get_database_backend();
    let mut applied = 0;

    for (module, migration) in migrations {
        let seen = db
            .query_one(Statement::from_sql_and_values(
                backend,
                "SELECT id FROM schema_migrations WHERE module = ? AND id = ?",
                [module.as_str().into(), migration.id.into()],
            ))
            .await
            .with_context(|| format!("failed to look up migration {}/{}", module, migration.id))?;

        if seen.is_some() {
            tracing::debug!(target: "shelf-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let txn = db.begin().await.context("failed to open migration transaction")?;
        txn.execute_unprepared(migration.up)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        txn.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO schema_migrations (module, id) VALUES (?, ?)",
            [module.as_str().into(), migration.id.into()],
        ))
        .await
        .with_context(|| format!("failed to record migration {}/{}", module, migration.id))?;
        txn.commit()
            .await
            .with_context(|| format!("failed to commit migration {}/{}", module, migration.id))?;

        tracing::info!(target: "shelf-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
