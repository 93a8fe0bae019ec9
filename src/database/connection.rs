use crate::config::{DatabaseConfig, StorageBackend};
use crate::database::{MemoryStore, SeaOrmStore, SharedStore};
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let pool = Database::connect(options).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &DatabaseConnection) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    Ok(())
}

/// 按配置构建存储后端（数据库会先执行迁移）
pub async fn build_store(config: &DatabaseConfig) -> AppResult<SharedStore> {
    match config.backend {
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage, data will be lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Database => {
            let pool = create_pool(config).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(SeaOrmStore::new(pool)))
        }
    }
}
