//! HTTP adapter tests: envelope shape, status mapping, identity
//! extraction, and the scan/override/checklist/photo endpoints end to end
//! over in-memory adapters.

mod support;

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, http::StatusCode, test, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use gearpass::domain::{
    AdminStageService, ChecklistService, ChecklistTemplates, PhotoPolicy, ScanService, Stage,
};
use gearpass::inbound::http::{self, HttpState};
use gearpass::middleware::Trace;

use support::{
    MemoryBlobStore, MemoryChecklistRepository, MemoryPhotoRepository,
    MemoryReservationRepository, RecordingNotifier, reservation,
};

use gearpass::domain::HandoffStage;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

fn build_state() -> (Arc<MemoryReservationRepository>, web::Data<HttpState>) {
    let reservations = Arc::new(MemoryReservationRepository::new());
    let checklists = Arc::new(MemoryChecklistRepository::new());
    let photos = Arc::new(MemoryPhotoRepository::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let scan = Arc::new(ScanService::new(
        Arc::clone(&reservations),
        Arc::clone(&checklists),
        Arc::clone(&photos),
        Arc::clone(&notifier),
        ChecklistTemplates::default(),
    ));
    let admin = Arc::new(AdminStageService::new(
        Arc::clone(&reservations),
        Arc::clone(&notifier),
    ));
    let checklist_service = Arc::new(ChecklistService::new(
        Arc::clone(&reservations),
        checklists,
        photos,
        blobs,
        ChecklistTemplates::default(),
        PhotoPolicy::default(),
    ));

    let state = web::Data::new(HttpState::new(
        scan,
        admin,
        checklist_service.clone(),
        checklist_service,
    ));
    (reservations, state)
}

async fn build_app(
    state: web::Data<HttpState>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(http::configure)),
    )
    .await
}

#[actix_web::test]
async fn requests_without_an_identity_are_refused() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::PreDropoff));
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/reservations/progress_scan")
            .set_json(json!({"code": "111111"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(res.headers().contains_key("trace-id"));

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "FORBIDDEN");
    assert!(body["traceId"].is_string());
}

#[actix_web::test]
async fn scan_preview_returns_the_camel_case_envelope() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::PreDropoff));
    reservations.seed_code(1, HandoffStage::PreDropoff, "111111");
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/reservations/progress_scan")
            .insert_header(("x-actor-role", "admin"))
            .set_json(json!({"code": "111111"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["needsConfirmation"], true);
    assert_eq!(body["stage"], "pre_dropoff");
    assert_eq!(body["nextStage"], "pre_pickup");
    assert_eq!(body["satisfied"], false);
    assert!(body["checklist"]["items"].is_array());
    assert_eq!(body["reservation"]["id"], 1);
}

#[actix_web::test]
async fn scan_without_a_code_is_a_validation_error() {
    let (_, state) = build_state();
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/reservations/progress_scan")
            .insert_header(("x-actor-role", "admin"))
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn unknown_codes_read_as_not_found() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::PreDropoff));
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/reservations/progress_scan")
            .insert_header(("x-actor-role", "admin"))
            .set_json(json!({"code": "999999"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "CODE_NOT_FOUND");
}

#[actix_web::test]
async fn stage_override_normalises_legacy_tokens() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::Done));
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/admin/reservations/1/status")
            .insert_header(("x-actor-role", "admin"))
            .set_json(json!({"status": "pending"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["from"], "done");
    assert_eq!(body["to"], "pre_dropoff");
    let code = body["code"].as_str().expect("code issued");
    assert_eq!(code.len(), 6);
    assert_eq!(reservations.stage_of(1), Some(Stage::PreDropoff));
}

#[actix_web::test]
async fn stage_override_rejects_unknown_tokens() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::PreDropoff));
    let app = build_app(state).await;

    for body in [json!({"status": "warehouse"}), json!({})] {
        let res = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri("/api/v1/admin/reservations/1/status")
                .insert_header(("x-actor-role", "admin"))
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn owners_fetch_their_checklist_but_not_others() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::PreDropoff));
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/reservations/1/checklists/pre_dropoff")
            .insert_header(("x-actor-role", "customer"))
            .insert_header(("x-actor-customer-id", "1001"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert!(!body["items"].as_array().expect("items").is_empty());
    assert_eq!(body["completed"], false);
    assert_eq!(body["photoCount"], 0);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/reservations/1/checklists/pre_dropoff")
            .insert_header(("x-actor-role", "customer"))
            .insert_header(("x-actor-customer-id", "2002"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn the_terminal_stage_carries_no_checklist() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::Done));
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/reservations/1/checklists/done")
            .insert_header(("x-actor-role", "admin"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "CODE_STAGE_MISMATCH");
}

#[actix_web::test]
async fn photo_upload_fetch_and_removal_round_trip() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::PreDropoff));
    let app = build_app(state).await;
    let owner_headers = [
        ("x-actor-role", "customer"),
        ("x-actor-customer-id", "1001"),
    ];

    let data_url = format!("data:image/png;base64,{}", BASE64.encode(PNG_MAGIC));
    let mut upload = test::TestRequest::post()
        .uri("/api/v1/reservations/1/checklists/pre_dropoff/photos")
        .set_json(json!({"data": data_url, "name": "shelf.png"}));
    for header in owner_headers {
        upload = upload.insert_header(header);
    }
    let res = test::call_service(&app, upload.to_request()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["contentType"], "image/png");
    assert_eq!(body["byteSize"], PNG_MAGIC.len() as i64);
    let photo_id = body["id"].as_i64().expect("photo id");

    let mut raw = test::TestRequest::get().uri(&format!(
        "/api/v1/reservations/1/checklists/pre_dropoff/photos/{photo_id}/raw"
    ));
    for header in owner_headers {
        raw = raw.insert_header(header);
    }
    let res = test::call_service(&app, raw.to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("image/png")
    );
    let bytes = test::read_body(res).await;
    assert_eq!(bytes.as_ref(), PNG_MAGIC);

    let mut delete = test::TestRequest::delete().uri(&format!(
        "/api/v1/reservations/1/checklists/pre_dropoff/photos/{photo_id}"
    ));
    for header in owner_headers {
        delete = delete.insert_header(header);
    }
    let res = test::call_service(&app, delete.to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["photoCount"], 0);

    let mut raw_again = test::TestRequest::get().uri(&format!(
        "/api/v1/reservations/1/checklists/pre_dropoff/photos/{photo_id}/raw"
    ));
    for header in owner_headers {
        raw_again = raw_again.insert_header(header);
    }
    let res = test::call_service(&app, raw_again.to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn non_image_payloads_are_rejected() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::PreDropoff));
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/reservations/1/checklists/pre_dropoff/photos")
            .insert_header(("x-actor-role", "customer"))
            .insert_header(("x-actor-customer-id", "1001"))
            .set_json(json!({"data": BASE64.encode(b"just some text")}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "UNSUPPORTED_TYPE");
}

#[actix_web::test]
async fn undecodable_payloads_are_validation_errors() {
    let (reservations, state) = build_state();
    reservations.insert(reservation(1, Stage::PreDropoff));
    let app = build_app(state).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/reservations/1/checklists/pre_dropoff/photos")
            .insert_header(("x-actor-role", "customer"))
            .insert_header(("x-actor-customer-id", "1001"))
            .set_json(json!({"data": "%%% not base64 %%%"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
