//! Application bootstrap: schema setup and the module/server lifecycle.

use anyhow::Context;
use sea_orm::DatabaseConnection;
use shelf_kernel::{settings::Settings, AppState, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry holding every module this application ships.
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

async fn prepare_database(
    settings: &Settings,
    registry: &ModuleRegistry,
) -> anyhow::Result<(DatabaseConnection, usize)> {
    let db = shelf_db::connect(&settings.database).await?;
    let applied = shelf_db::run_migrations(&db, &registry.collect_migrations())
        .await
        .context("failed to apply module migrations")?;
    Ok((db, applied))
}

/// Apply pending migrations and exit. Returns how many were applied.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let registry = registry();
    let (db, applied) = prepare_database(settings, &registry).await?;
    tracing::info!(applied, "migrations complete");
    db.close().await.context("failed to close database")?;
    Ok(applied)
}

/// Run the service until Ctrl-C.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let registry = registry();
    let (db, applied) = prepare_database(&settings, &registry).await?;
    tracing::info!(applied, "database ready");

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = shelf_http::start_server(
        &registry,
        &settings,
        AppState::new(db.clone()),
        shutdown_signal(),
    )
    .await;

    registry.stop_modules().await?;
    db.close().await.context("failed to close database")?;
    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_kernel::settings::DatabaseSettings;

    #[test]
    fn registry_contains_domain_modules() {
        let registry = registry();
        assert!(registry.get_module("sellers").is_some());
        assert!(registry.get_module("books").is_some());
        assert_eq!(registry.collect_migrations().len(), 3);
    }

    #[tokio::test]
    async fn prepare_database_creates_schema_once() {
        let settings = Settings {
            database: DatabaseSettings::in_memory(),
            ..Settings::default()
        };
        let registry = registry();

        let (db, applied) = prepare_database(&settings, &registry).await.unwrap();
        assert_eq!(applied, 3);
        let again = shelf_db::run_migrations(&db, &registry.collect_migrations())
            .await
            .unwrap();
        assert_eq!(again, 0);
    }
}
