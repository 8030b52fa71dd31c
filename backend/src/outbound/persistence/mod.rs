//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories only translate between Diesel rows and domain types. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) stay private to
//! this module, and every database failure is mapped to the owning port's
//! error type.
//!
//! # Example
//!
//! ```ignore
//! use inventory_backend::outbound::persistence::{DbPool, DieselPartsRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/inventario")).await?;
//! let parts = DieselPartsRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_helpers;
mod diesel_illustrative_image_repository;
mod diesel_parts_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_illustrative_image_repository::DieselIllustrativeImageRepository;
pub use diesel_parts_repository::{DieselPartsRepository, PARTS_WRITE_LOCK_KEY};
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
