//! HTTP inbound adapter exposing the inventory REST endpoints.

pub mod error;
pub mod health;
pub mod images;
pub mod multipart;
pub mod parts;
pub mod state;
pub mod stock;

use actix_web::web;

pub use error::ApiResult;

/// Register the inventory endpoints on an app or scope.
///
/// Handlers expect `web::Data<HttpState>` to be registered alongside.
/// Health probes are registered separately because they depend on
/// [`health::HealthState`].
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use inventory_backend::inbound::http::{configure, state::HttpState};
///
/// let _app = App::new()
///     .app_data(web::Data::new(HttpState::default()))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::root)
        .service(stock::upload_stock_workbook)
        .service(stock::clear_stock)
        .service(images::upload_images)
        .service(parts::search_parts);
}
