//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **spreadsheet**: workbook parsing with `calamine`
//! - **assets**: signed image uploads to Cloudinary
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod assets;
pub mod persistence;
pub mod spreadsheet;
