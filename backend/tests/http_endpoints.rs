//! End-to-end HTTP tests: real handlers and services over in-memory adapters.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::Value;

use inventory_backend::Trace;
use inventory_backend::domain::{
    CellValue, IllustrativeImageService, InventoryIngestionService, PartSearchService,
};
use inventory_backend::inbound::http::configure;
use inventory_backend::inbound::http::state::{HttpState, UploadLimits};
use inventory_backend::test_support::{
    InMemoryIllustrativeImageRepository, InMemoryPartsRepository, MultipartBody,
    RecordingAssetStore, StaticWorkbookReader, stock_ledger_header, text,
};
use rstest::{fixture, rstest};

struct Adapters {
    parts: Arc<InMemoryPartsRepository>,
    images: Arc<InMemoryIllustrativeImageRepository>,
    assets: Arc<RecordingAssetStore>,
    state: HttpState,
}

#[fixture]
fn adapters() -> Adapters {
    let parts = Arc::new(InMemoryPartsRepository::new());
    let images = Arc::new(InMemoryIllustrativeImageRepository::new());
    let assets = Arc::new(RecordingAssetStore::new());
    let reader = Arc::new(StaticWorkbookReader::inventory(vec![
        stock_ledger_header(),
        vec![
            text("FLT-100"),
            text("Bosch"),
            CellValue::Integer(10),
            CellValue::Integer(4),
            CellValue::Integer(6),
            text("$1,250.50"),
            CellValue::Number(7503.0),
        ],
        vec![CellValue::Empty; 7],
        vec![text("BUJ-7"), text("NGK")],
    ]));
    let state = HttpState::new(
        Arc::new(InventoryIngestionService::new(reader, parts.clone())),
        Arc::new(PartSearchService::new(parts.clone(), images.clone())),
        Arc::new(IllustrativeImageService::new(assets.clone(), images.clone())),
    )
    .with_limits(UploadLimits {
        max_upload_bytes: 64 * 1024,
        ..UploadLimits::default()
    });
    Adapters {
        parts,
        images,
        assets,
        state,
    }
}

async fn app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(configure),
    )
    .await
}

fn multipart(uri: &str, body: MultipartBody) -> actix_http::Request {
    let (content_type, bytes) = body.finish();
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("content-type", content_type))
        .set_payload(bytes)
        .to_request()
}

fn workbook_upload(uri: &str) -> actix_http::Request {
    multipart(
        uri,
        MultipartBody::new().file("archivo", "Inventario.xlsx", b"PK\x03\x04"),
    )
}

#[rstest]
#[actix_web::test]
async fn upload_then_search_returns_parts(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;

    let upload: Value =
        test::call_and_read_body_json(&app, workbook_upload("/stock/excel?mode=replace")).await;
    assert_eq!(
        upload.get("message").and_then(Value::as_str),
        Some("✅ Se cargaron 2 repuestos desde Excel.")
    );
    assert_eq!(upload.get("skipped").and_then(Value::as_u64), Some(1));

    let search: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/repuestos?query=BOSCH").to_request(),
    )
    .await;
    let productos = search
        .get("productos")
        .and_then(Value::as_array)
        .expect("productos array");
    assert_eq!(productos.len(), 1);
    let part = productos.first().expect("one part");
    assert_eq!(part.get("codigo").and_then(Value::as_str), Some("FLT-100"));
    assert_eq!(part.get("precios").and_then(Value::as_str), Some("1250.50"));
    assert_eq!(search.get("imagenIlustrativa"), Some(&Value::Null));
}

#[rstest]
#[actix_web::test]
async fn repeated_replace_keeps_one_copy(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;

    for _ in 0..2 {
        let res = test::call_service(&app, workbook_upload("/stock/excel?mode=replace")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(adapters.parts.snapshot().len(), 2);
}

#[rstest]
#[actix_web::test]
async fn default_mode_appends(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;

    for _ in 0..2 {
        let res = test::call_service(&app, workbook_upload("/stock/excel")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(adapters.parts.snapshot().len(), 4);
}

#[rstest]
#[actix_web::test]
async fn clearing_reports_deleted_rows(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;
    test::call_service(&app, workbook_upload("/stock/excel")).await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::delete().uri("/stock/eliminar-todo").to_request(),
    )
    .await;

    assert_eq!(body.get("deleted").and_then(Value::as_u64), Some(2));
    assert!(adapters.parts.snapshot().is_empty());
}

#[rstest]
#[actix_web::test]
async fn persistence_failures_surface_as_500(adapters: Adapters) {
    adapters.parts.fail_writes();
    let app = app(adapters.state.clone()).await;

    let res = test::call_service(&app, workbook_upload("/stock/excel")).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("internal_error"));
}

#[rstest]
#[case("/repuestos")]
#[case("/repuestos?query=")]
#[actix_web::test]
async fn search_requires_a_keyword(adapters: Adapters, #[case] uri: &str) {
    let app = app(adapters.state.clone()).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("Falta el parámetro de búsqueda")
    );
}

#[rstest]
#[actix_web::test]
async fn non_workbook_uploads_are_refused(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;

    let res = test::call_service(
        &app,
        multipart(
            "/stock/excel",
            MultipartBody::new().file("archivo", "inventario.txt", b"hola"),
        ),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(adapters.parts.snapshot().is_empty());
}

#[rstest]
#[actix_web::test]
async fn oversized_uploads_are_refused(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;

    let res = test::call_service(
        &app,
        multipart(
            "/stock/excel",
            MultipartBody::new().file("archivo", "Inventario.xlsx", &vec![0_u8; 128 * 1024]),
        ),
    )
    .await;

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[rstest]
#[actix_web::test]
async fn image_uploads_overwrite_by_category(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;

    for file in ["filtro-a.png", "filtro-b.png"] {
        let res = test::call_service(
            &app,
            multipart(
                "/imagenes",
                MultipartBody::new()
                    .text("categoria", " Filtros ")
                    .file("imagenes", file, b"\x89PNG"),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let stored = adapters.images.snapshot();
    assert_eq!(stored.len(), 1);
    let image = stored.first().expect("one image");
    assert_eq!(image.category.as_str(), "filtros");
    assert_eq!(image.url.as_str(), "https://assets.invalid/v2/filtro-b.png");
    assert_eq!(adapters.assets.uploaded().len(), 2);
}

#[rstest]
#[actix_web::test]
async fn unlabeled_images_get_positional_categories(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;

    let body: Value = test::call_and_read_body_json(
        &app,
        multipart(
            "/imagenes",
            MultipartBody::new()
                .file("imagenes", "a.jpg", b"jpg")
                .file("imagenes", "b.webp", b"webp"),
        ),
    )
    .await;

    let categories: Vec<&str> = body
        .get("imagenes")
        .and_then(Value::as_array)
        .expect("imagenes array")
        .iter()
        .filter_map(|image| image.get("categoria").and_then(Value::as_str))
        .collect();
    assert_eq!(categories, vec!["elemento 1", "elemento 2"]);
}

#[rstest]
#[actix_web::test]
async fn invalid_images_abort_the_whole_batch(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;

    let res = test::call_service(
        &app,
        multipart(
            "/imagenes",
            MultipartBody::new()
                .file("imagenes", "ok.png", b"png")
                .file("imagenes", "malo.gif", b"gif"),
        ),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(adapters.assets.uploaded().is_empty());
    assert!(adapters.images.snapshot().is_empty());
}

#[rstest]
#[actix_web::test]
async fn search_returns_matching_image(adapters: Adapters) {
    let app = app(adapters.state.clone()).await;
    test::call_service(
        &app,
        multipart(
            "/imagenes",
            MultipartBody::new()
                .text("categoria", "Bujías NGK")
                .file("imagenes", "bujia.png", b"png"),
        ),
    )
    .await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/repuestos?query=ngk").to_request(),
    )
    .await;

    assert_eq!(
        body.get("imagenIlustrativa").and_then(Value::as_str),
        Some("https://assets.invalid/v1/bujia.png")
    );
}
