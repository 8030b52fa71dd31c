//! Part search endpoint.
//!
//! ```text
//! GET /repuestos?query=<term>
//! ```

use actix_web::{get, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, SearchKeyword, SearchKeywordError, StoredPart};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Message returned when the search term is missing.
pub const MISSING_QUERY_MESSAGE: &str = "Falta el parámetro de búsqueda";

/// Query parameters for [`search_parts`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Substring matched against part code and brand, ignoring case.
    #[param(example = "bosch")]
    pub query: Option<String>,
}

/// One part in search results. Field names follow the table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PartDto {
    /// Store identifier.
    pub id: i32,
    /// Part code.
    pub codigo: Option<String>,
    /// Brand.
    pub marca: Option<String>,
    /// Units received.
    pub entradas: i32,
    /// Units dispatched.
    pub salidas: i32,
    /// Units on hand.
    pub stock: i32,
    /// Unit price as a decimal string.
    #[schema(value_type = Option<String>, example = "1250.50")]
    pub precios: Option<Decimal>,
    /// Stock value as a decimal string.
    #[schema(value_type = Option<String>, example = "7503.00")]
    pub importe_inventario: Option<Decimal>,
}

impl From<StoredPart> for PartDto {
    fn from(stored: StoredPart) -> Self {
        let StoredPart { id, part } = stored;
        Self {
            id,
            codigo: part.code,
            marca: part.brand,
            entradas: part.entries,
            salidas: part.exits,
            stock: part.stock,
            precios: part.unit_price,
            importe_inventario: part.inventory_value,
        }
    }
}

/// Search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    /// Matching parts in store order.
    pub productos: Vec<PartDto>,
    /// URL of the first matching illustrative image.
    #[serde(rename = "imagenIlustrativa")]
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/filtros.png")]
    pub imagen_ilustrativa: Option<String>,
}

fn parse_keyword(raw: Option<&str>) -> ApiResult<SearchKeyword> {
    SearchKeyword::new(raw.unwrap_or_default()).map_err(|err| match err {
        SearchKeywordError::Empty => Error::invalid_request(MISSING_QUERY_MESSAGE),
        SearchKeywordError::TooLong { max } => {
            Error::invalid_request("El parámetro de búsqueda es demasiado largo")
                .with_details(json!({ "maxLength": max }))
        }
    })
}

/// Search parts by code or brand.
#[utoipa::path(
    get,
    path = "/repuestos",
    tags = ["parts"],
    params(SearchParams),
    responses(
        (status = 200, description = "Matching parts", body = SearchResponse),
        (status = 400, description = "Missing or invalid search term", body = Error),
        (status = 500, description = "Search failed", body = Error)
    )
)]
#[get("/repuestos")]
pub async fn search_parts(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<SearchResponse>> {
    let keyword = parse_keyword(params.query.as_deref())?;
    let result = state.parts.search(keyword).await?;
    Ok(web::Json(SearchResponse {
        productos: result.parts.into_iter().map(PartDto::from).collect(),
        imagen_ilustrativa: result.illustrative_image_url.map(String::from),
    }))
}
