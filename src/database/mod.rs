pub mod connection;
pub mod memory_store;
pub mod sea_orm_store;
pub mod store;

pub use connection::{build_store, create_pool, run_migrations};
pub use memory_store::MemoryStore;
pub use sea_orm_store::SeaOrmStore;
pub use store::*;
