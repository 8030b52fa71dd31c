//! Stock workbook endpoints.
//!
//! ```text
//! POST   /stock/excel?mode=append|replace   (multipart field `archivo`)
//! DELETE /stock/eliminar-todo
//! ```

use actix_multipart::Multipart;
use actix_web::{delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{IngestMode, IngestRequest};
use crate::domain::{Error, is_workbook_file};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::collect_form;
use crate::inbound::http::state::HttpState;

/// Multipart field carrying the workbook.
pub const WORKBOOK_FIELD: &str = "archivo";

/// Message returned when a non-spreadsheet file is uploaded.
pub const WORKBOOK_TYPE_MESSAGE: &str = "Solo se permiten archivos Excel (.xlsx, .xls, .xlsm)";

/// Query parameters for [`upload_stock_workbook`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockUploadParams {
    /// `append` keeps existing parts; `replace` swaps them atomically.
    #[param(example = "replace")]
    pub mode: Option<String>,
}

/// Multipart body accepted by [`upload_stock_workbook`].
#[derive(ToSchema)]
pub struct StockUploadForm {
    /// Workbook file (`.xlsx`, `.xls`, or `.xlsm`).
    #[schema(value_type = String, format = Binary)]
    pub archivo: Vec<u8>,
}

/// Summary returned after a workbook load.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockUploadResponse {
    /// Human-readable summary.
    #[schema(example = "✅ Se cargaron 120 repuestos desde Excel.")]
    pub message: String,
    /// Rows persisted.
    pub accepted: usize,
    /// Blank rows dropped.
    pub skipped: usize,
    /// Mode used for the load.
    pub mode: IngestMode,
}

/// Summary returned after clearing the inventory.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearStockResponse {
    /// Human-readable summary.
    #[schema(example = "🗑️ Todos los repuestos fueron eliminados.")]
    pub message: String,
    /// Rows removed.
    pub deleted: u64,
}

fn resolve_mode(raw: Option<&str>, default: IngestMode) -> ApiResult<IngestMode> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            Error::invalid_request("El parámetro mode debe ser 'append' o 'replace'")
                .with_details(json!({ "mode": value }))
        }),
    }
}

fn accept_workbook(field: &str, file_name: &str) -> Result<(), Error> {
    if field == WORKBOOK_FIELD && !is_workbook_file(file_name) {
        return Err(Error::unsupported_file_type(WORKBOOK_TYPE_MESSAGE)
            .with_details(json!({ "fileName": file_name })));
    }
    Ok(())
}

/// Load a stock workbook into the parts table.
#[utoipa::path(
    post,
    path = "/stock/excel",
    tags = ["stock"],
    params(StockUploadParams),
    request_body(content = StockUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Workbook loaded", body = StockUploadResponse),
        (status = 400, description = "Missing file, wrong file type, or unreadable workbook", body = Error),
        (status = 413, description = "Upload too large", body = Error),
        (status = 500, description = "Persistence failure", body = Error)
    )
)]
#[post("/stock/excel")]
pub async fn upload_stock_workbook(
    state: web::Data<HttpState>,
    params: web::Query<StockUploadParams>,
    payload: Multipart,
) -> ApiResult<web::Json<StockUploadResponse>> {
    let mode = resolve_mode(params.mode.as_deref(), state.limits.default_ingest_mode)?;
    let form = collect_form(payload, state.limits.max_upload_bytes, accept_workbook).await?;
    let file = form
        .into_files_named(WORKBOOK_FIELD)
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_request("No se recibió ningún archivo"))?;

    let report = state
        .ingestion
        .ingest(IngestRequest {
            workbook: file.bytes,
            mode,
        })
        .await?;
    Ok(web::Json(StockUploadResponse {
        message: format!("✅ Se cargaron {} repuestos desde Excel.", report.accepted),
        accepted: report.accepted,
        skipped: report.skipped,
        mode: report.mode,
    }))
}

/// Delete every stored part.
#[utoipa::path(
    delete,
    path = "/stock/eliminar-todo",
    tags = ["stock"],
    responses(
        (status = 200, description = "Inventory cleared", body = ClearStockResponse),
        (status = 500, description = "Persistence failure", body = Error)
    )
)]
#[delete("/stock/eliminar-todo")]
pub async fn clear_stock(state: web::Data<HttpState>) -> ApiResult<web::Json<ClearStockResponse>> {
    let deleted = state.ingestion.clear_inventory().await?;
    Ok(web::Json(ClearStockResponse {
        message: "🗑️ Todos los repuestos fueron eliminados.".to_owned(),
        deleted,
    }))
}
