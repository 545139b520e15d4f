//! Router-level API tests over nullable backends.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fichua_nullables::{NullClock, NullDirectory, NullGateway, NullStore};
use fichua_reveal::{DisclosureResolver, RevealController, RevealMetrics};
use fichua_rpc::{build_router, AppState};
use fichua_store::reveal::RevealStore;
use fichua_types::{Clock, ContactCard, FeePolicy, TargetRef, TargetType};

struct Api {
    router: Router,
    gateway: Arc<NullGateway>,
    directory: Arc<NullDirectory>,
}

fn api() -> Api {
    let store = Arc::new(NullStore::new());
    let gateway = Arc::new(NullGateway::new());
    let directory = Arc::new(NullDirectory::new());
    let clock = Arc::new(NullClock::new(1_000_000));

    let store_dyn: Arc<dyn RevealStore> = store;
    let directory_dyn: Arc<dyn fichua_directory::Directory> = directory.clone();
    let clock_dyn: Arc<dyn Clock> = clock;

    let controller = Arc::new(RevealController::new(
        store_dyn.clone(),
        gateway.clone(),
        directory_dyn.clone(),
        clock_dyn,
        FeePolicy::default(),
        600,
        Arc::new(RevealMetrics::new()),
    ));
    let resolver = Arc::new(DisclosureResolver::new(store_dyn, directory_dyn));

    Api {
        router: build_router(AppState {
            controller,
            resolver,
        }),
        gateway,
        directory,
    }
}

fn seed_fundi(api: &Api) {
    api.directory.insert(
        &TargetRef::new(TargetType::Fundi, "42"),
        ContactCard {
            name: "Juma Otieno".to_string(),
            phone: "+254711222333".to_string(),
            email: "juma@example.com".to_string(),
        },
    );
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn reveal_request_body() -> Value {
    json!({
        "requester_phone": "+254700000001",
        "target_type": "fundi",
        "target_id": "42",
    })
}

#[tokio::test]
async fn full_reveal_flow_over_http() {
    let api = api();
    seed_fundi(&api);

    // Request the reveal.
    let (status, body) = send(
        &api.router,
        post_json("/reveal/request", reveal_request_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "awaiting_confirmation");
    assert_eq!(body["amount"], 150);
    let reveal_id = body["reveal_id"].as_str().unwrap().to_string();

    // Poll: no disclosure yet.
    let (status, body) = send(&api.router, get(&format!("/reveal/status/{reveal_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "awaiting_confirmation");
    assert!(body.get("disclosure").is_none());

    // Gateway confirms.
    let (status, body) = send(
        &api.router,
        post_json(
            "/gateway/callback",
            json!({
                "transaction_id": "TX1",
                "outcome": "success",
                "provider_reference": "MPESA-001",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);

    // Poll again: completed with the protected fields.
    let (status, body) = send(&api.router, get(&format!("/reveal/status/{reveal_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["disclosure"]["name"], "Juma Otieno");
    assert_eq!(body["disclosure"]["phone"], "+254711222333");
    assert_eq!(body["disclosure"]["email"], "juma@example.com");
}

#[tokio::test]
async fn repeated_request_returns_existing_with_200() {
    let api = api();
    seed_fundi(&api);

    let (first_status, first_body) = send(
        &api.router,
        post_json("/reveal/request", reveal_request_body()),
    )
    .await;
    let (second_status, second_body) = send(
        &api.router,
        post_json("/reveal/request", reveal_request_body()),
    )
    .await;

    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first_body["reveal_id"], second_body["reveal_id"]);
    assert_eq!(api.gateway.push_count(), 1);
}

#[tokio::test]
async fn invalid_phone_rejected_without_gateway_call() {
    let api = api();
    seed_fundi(&api);

    let (status, body) = send(
        &api.router,
        post_json(
            "/reveal/request",
            json!({
                "requester_phone": "invalid",
                "target_type": "fundi",
                "target_id": "42",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("phone"));
    assert_eq!(api.gateway.push_count(), 0);
}

#[tokio::test]
async fn unknown_target_type_rejected() {
    let api = api();

    let (status, _) = send(
        &api.router,
        post_json(
            "/reveal/request",
            json!({
                "requester_phone": "+254700000001",
                "target_type": "boat",
                "target_id": "1",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_target_rejected() {
    let api = api();

    let (status, _) = send(
        &api.router,
        post_json("/reveal/request", reveal_request_body()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_of_unknown_reveal_is_404() {
    let api = api();
    let (status, _) = send(&api.router, get("/reveal/status/deadbeef")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_callback_still_acknowledged() {
    let api = api();
    let (status, body) = send(
        &api.router,
        post_json(
            "/gateway/callback",
            json!({
                "transaction_id": "TX999",
                "outcome": "success",
                "provider_reference": null,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
}

#[tokio::test]
async fn health_and_metrics_endpoints() {
    let api = api();
    seed_fundi(&api);
    send(
        &api.router,
        post_json("/reveal/request", reveal_request_body()),
    )
    .await;

    let (status, body) = send(&api.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["reveal_count"], 1);

    let response = api.router.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("fichua_reveals_requested_total"));
}
