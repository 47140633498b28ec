//! User Service Library
//!
//! This crate provides user management over HTTP: a JSON resource at
//! `/api/users` backed by a SeaORM database or an in-memory store.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::{StoreBackend, UserServiceConfig};
use crate::infra::Database;
use crate::repository::{InMemoryUserStore, UserRepository, UserStore};

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &UserServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Build the record store selected by the configuration.
pub async fn build_store(
    config: &UserServiceConfig,
) -> Result<Arc<dyn UserRepository>, Box<dyn std::error::Error>> {
    let store: Arc<dyn UserRepository> = match config.store {
        StoreBackend::Database => {
            let db = Database::connect(&config.database).await?;
            Arc::new(UserStore::new(db.get_connection()))
        }
        StoreBackend::Memory => {
            info!("Using in-memory user store; data is lost on exit");
            Arc::new(InMemoryUserStore::new())
        }
    };

    Ok(store)
}

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = build_store(&config).await?;
    let app = create_router(AppState::from_store(store));

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("User service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
