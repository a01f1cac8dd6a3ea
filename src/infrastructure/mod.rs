//! Infrastructure layer
//!
//! Persistence behind the domain repository traits: SeaORM over SQLite for
//! production, a DashMap-backed in-memory store for development and tests.

pub mod database;
pub mod memory;

pub use database::{init_database, DatabaseConfig, Migrator};
pub use memory::InMemoryStore;
