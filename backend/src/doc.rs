//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the request and response schemas they reference. The document backs
//! Swagger UI in debug builds and is exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::ports::IngestMode;
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::MessageResponse;
use crate::inbound::http::images::{ImageUploadForm, ImageUploadResponse, StoredImageDto};
use crate::inbound::http::parts::{PartDto, SearchResponse};
use crate::inbound::http::stock::{ClearStockResponse, StockUploadForm, StockUploadResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory backend API",
        description = "Stock workbook ingestion, part search, and illustrative image uploads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::root,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::stock::upload_stock_workbook,
        crate::inbound::http::stock::clear_stock,
        crate::inbound::http::parts::search_parts,
        crate::inbound::http::images::upload_images,
    ),
    components(schemas(
        Error,
        ErrorCode,
        IngestMode,
        MessageResponse,
        StockUploadForm,
        StockUploadResponse,
        ClearStockResponse,
        PartDto,
        SearchResponse,
        ImageUploadForm,
        StoredImageDto,
        ImageUploadResponse,
    )),
    tags(
        (name = "stock", description = "Workbook ingestion and inventory reset"),
        (name = "parts", description = "Part search"),
        (name = "images", description = "Illustrative images by category"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/")]
    #[case("/health/ready")]
    #[case("/health/live")]
    #[case("/stock/excel")]
    #[case("/stock/eliminar-todo")]
    #[case("/repuestos")]
    #[case("/imagenes")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn error_schema_uses_the_error_envelope() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "error");
        assert_object_schema_has_field(error_schema, "code");
    }

    #[rstest]
    fn search_schema_uses_wire_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let search = schemas.get("SearchResponse").expect("SearchResponse schema");

        assert_object_schema_has_field(search, "productos");
        assert_object_schema_has_field(search, "imagenIlustrativa");
    }
}
