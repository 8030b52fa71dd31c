//! Auto-parts inventory backend.
//!
//! Loads stock workbooks into PostgreSQL, searches parts by code or brand,
//! and publishes illustrative images per category to Cloudinary. The crate
//! is laid out hexagonally: [`domain`] holds the model, services and ports;
//! [`inbound`] exposes them over HTTP; [`outbound`] implements the ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
