use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use wema_core::config::{AdminConfig, FrontendConfig, RateLimitConfig, SharedConfig, WindowConfig};
use wema_core::provider::{ProviderError, ProviderPaymentIntent};
use wema_core::testing::FakeProvider;

use crate::server::build_router;
use crate::state::AppState;

const ORIGIN: &str = "https://wemacharity.org";
const ADMIN_EMAIL: &str = "admin@wemacharity.org";
const ADMIN_PASSWORD: &str = "correct horse battery staple";

fn admin_config_with_secret(secret: &[u8]) -> AdminConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();
    AdminConfig::new(ADMIN_EMAIL.to_string(), hash, secret.to_vec())
}

fn admin_config() -> AdminConfig {
    admin_config_with_secret(b"test-jwt-secret")
}

fn state_with(provider: Arc<FakeProvider>, rate_limit: RateLimitConfig) -> AppState {
    let config = SharedConfig::new(
        FrontendConfig::new(Url::parse(ORIGIN).unwrap(), vec![], false),
        Some(admin_config()),
    );
    AppState::new(provider, config, rate_limit)
}

fn app_with(provider: Arc<FakeProvider>, rate_limit: RateLimitConfig) -> Router {
    build_router(state_with(provider, rate_limit), &[ORIGIN.to_string()])
}

fn app(provider: Arc<FakeProvider>) -> Router {
    app_with(provider, RateLimitConfig::default())
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let mut req = builder.body(body).unwrap();
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([203, 0, 113, 7], 40000))));
    req
}

async fn admin_token(app: &Router) -> String {
    let (status, _, body) = send(
        app,
        request(
            Method::POST,
            "/api/admin/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    format!("Bearer {}", body["token"].as_str().unwrap())
}

fn authorized(method: Method, uri: &str, bearer: &str) -> Request<Body> {
    let mut req = request(method, uri, None);
    req.headers_mut()
        .insert(header::AUTHORIZATION, bearer.parse().unwrap());
    req
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

#[tokio::test]
async fn test_create_donation_returns_session() {
    let provider = Arc::new(FakeProvider::new());
    let app = app(provider.clone());

    let (status, headers, body) = send(
        &app,
        request(
            Method::POST,
            "/api/donations",
            Some(json!({ "amount": 50, "name": "Jane" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sessionId"], "cs_test_1");
    assert!(body["checkoutUrl"].as_str().unwrap().ends_with("/cs_test_1"));
    assert_eq!(headers["ratelimit-limit"], "20");
    assert_eq!(headers["ratelimit-remaining"], "19");

    let specs = provider.created_specs();
    assert_eq!(specs[0].line_items[0].unit_amount, 5000);
    assert_eq!(specs[0].line_items[0].name, "Donation from Jane");
}

#[tokio::test]
async fn test_invalid_amount_is_rejected_before_provider() {
    let provider = Arc::new(FakeProvider::new());
    let app = app(provider.clone());

    for amount in [json!(-5), json!(0), json!("ten"), json!(null)] {
        let (status, _, body) = send(
            &app,
            request(Method::POST, "/api/donations", Some(json!({ "amount": amount }))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid amount" }));
    }
    assert_eq!(provider.create_calls(), 0);
}

#[tokio::test]
async fn test_provider_failure_is_not_leaked() {
    let provider = Arc::new(FakeProvider::new());
    provider.fail_next_create(ProviderError::Rejected {
        status: 400,
        message: "No such price: sk_live_leak".to_string(),
    });
    let app = app(provider);

    let (status, _, body) = send(
        &app,
        request(Method::POST, "/api/donations", Some(json!({ "amount": 10 }))),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to create donation" }));
}

#[tokio::test]
async fn test_idempotency_key_is_forwarded() {
    let provider = Arc::new(FakeProvider::new());
    let app = app(provider.clone());

    let mut req = request(Method::POST, "/api/donations", Some(json!({ "amount": "25" })));
    req.headers_mut()
        .insert("Idempotency-Key", "donation-123".parse().unwrap());
    let (status, _, _) = send(&app, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        provider.created_specs()[0].idempotency_key.as_deref(),
        Some("donation-123")
    );
}

#[tokio::test]
async fn test_malformed_json_is_a_json_400() {
    let app = app(Arc::new(FakeProvider::new()));
    let mut req = Request::builder()
        .method(Method::POST)
        .uri("/api/donations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ amount: "))
        .unwrap();
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([203, 0, 113, 7], 40000))));

    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn test_listing_includes_paid_session() {
    let provider = Arc::new(FakeProvider::new());
    let app = app(provider.clone());

    let (_, _, created) = send(
        &app,
        request(Method::POST, "/api/donations", Some(json!({ "amount": 19.99 }))),
    )
    .await;
    let session_id = created["sessionId"].as_str().unwrap().to_string();

    let (status, _, listed) = send(&app, request(Method::GET, "/api/donations", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    assert!(provider.mark_paid(&session_id, Some("jane@example.com")));
    let (_, _, listed) = send(&app, request(Method::GET, "/api/donations", None)).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], session_id.as_str());
    assert_eq!(listed[0]["amount"], 19.99);
    assert_eq!(listed[0]["currency"], "usd");
    assert_eq!(listed[0]["donor"], "jane@example.com");
    assert!(listed[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_listing_failure() {
    let provider = Arc::new(FakeProvider::new());
    provider.fail_listing();
    let app = app(provider);

    let (status, _, body) = send(&app, request(Method::GET, "/api/donations", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch donations" }));
}

#[tokio::test]
async fn test_contact_validation_and_ack() {
    let app = app(Arc::new(FakeProvider::new()));

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/api/contact",
            Some(json!({ "name": "Jane", "email": "", "subject": " ", "message": "Hi" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["fields"], json!(["email", "subject"]));

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/api/contact",
            Some(json!({ "name": "Jane", "email": "jane", "subject": "Hi", "message": "Hi" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid email address" }));

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/api/contact",
            Some(json!({
                "name": "Jane",
                "email": "jane@example.com",
                "phone": "+254700000000",
                "subject": "Volunteering",
                "message": "How can I help?"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Thanks for reaching out to Wema!" })
    );
}

#[tokio::test]
async fn test_health() {
    let app = app(Arc::new(FakeProvider::new()));
    let (status, _, body) = send(&app, request(Method::GET, "/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_checkout_rate_limit() {
    let rate_limit = RateLimitConfig {
        checkout: WindowConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        },
        ..RateLimitConfig::default()
    };
    let provider = Arc::new(FakeProvider::new());
    let app = app_with(provider.clone(), rate_limit);

    for _ in 0..2 {
        let (status, _, _) = send(
            &app,
            request(Method::POST, "/api/donations", Some(json!({ "amount": 5 }))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, headers, body) = send(
        &app,
        request(Method::POST, "/api/donations", Some(json!({ "amount": 5 }))),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body,
        json!({ "error": "Too many requests, please try again later." })
    );
    assert_eq!(headers["ratelimit-remaining"], "0");
    assert!(headers.contains_key(header::RETRY_AFTER));
    assert_eq!(provider.create_calls(), 2);

    // Listing is not subject to the checkout limit.
    let (status, headers, _) = send(&app, request(Method::GET, "/api/donations", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["ratelimit-limit"], "100");
}

#[tokio::test]
async fn test_admin_login_and_protected_routes() {
    let provider = Arc::new(FakeProvider::new());
    provider.push_payment_intent(ProviderPaymentIntent {
        id: "pi_1".to_string(),
        amount_received: 2500,
        currency: "usd".to_string(),
        status: "succeeded".to_string(),
        created: 1_700_000_000,
    });
    let app = app(provider);

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/api/admin/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid credentials" }));

    let (status, _, _) = send(&app, request(Method::GET, "/api/admin/stats", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut bad = request(Method::GET, "/api/admin/stats", None);
    bad.headers_mut()
        .insert(header::AUTHORIZATION, "Bearer not-a-token".parse().unwrap());
    let (status, _, _) = send(&app, bad).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/api/admin/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());

    let mut stats = request(Method::GET, "/api/admin/stats", None);
    stats
        .headers_mut()
        .insert(header::AUTHORIZATION, bearer.parse().unwrap());
    let (status, _, body) = send(&app, stats).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "totalDonations": 1, "totalAmount": 25.0 }));

    let mut payments = request(Method::GET, "/api/admin/donations", None);
    payments
        .headers_mut()
        .insert(header::AUTHORIZATION, bearer.parse().unwrap());
    let (status, _, body) = send(&app, payments).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "pi_1");
    assert_eq!(body[0]["currency"], "USD");
    assert_eq!(body[0]["status"], "succeeded");
}

#[tokio::test]
async fn test_cors_preflight_for_frontend_origin() {
    let app = app(Arc::new(FakeProvider::new()));
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/donations")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        ORIGIN
    );
}

#[tokio::test]
async fn test_login_with_missing_field_is_invalid_credentials() {
    let app = app(Arc::new(FakeProvider::new()));

    for body in [json!({ "email": ADMIN_EMAIL }), json!({ "password": ADMIN_PASSWORD })] {
        let (status, _, body) =
            send(&app, request(Method::POST, "/api/admin/login", Some(body))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Invalid credentials" }));
    }
}

#[tokio::test]
async fn test_admin_provider_failures_name_the_resource() {
    let provider = Arc::new(FakeProvider::new());
    let app = app(provider.clone());
    let bearer = admin_token(&app).await;
    provider.fail_listing();

    let (status, _, body) = send(
        &app,
        authorized(Method::GET, "/api/admin/donations", &bearer),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch donations" }));

    let (status, _, body) = send(&app, authorized(Method::GET, "/api/admin/stats", &bearer)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch stats" }));
}

#[tokio::test]
async fn test_reloaded_config_applies_to_later_requests() {
    let provider = Arc::new(FakeProvider::new());
    let state = state_with(provider.clone(), RateLimitConfig::default());
    let app = build_router(state.clone(), &[ORIGIN.to_string()]);
    let old_bearer = admin_token(&app).await;

    state
        .config
        .update_all(
            FrontendConfig::new(
                Url::parse("https://donate.wemacharity.org").unwrap(),
                vec![],
                true,
            ),
            Some(admin_config_with_secret(b"rotated-jwt-secret")),
        )
        .await;

    let (status, _, _) = send(
        &app,
        request(Method::POST, "/api/donations", Some(json!({ "amount": 10 }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let specs = provider.created_specs();
    assert_eq!(
        specs[0].success_url,
        "https://donate.wemacharity.org/success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(specs[0].cancel_url, "https://donate.wemacharity.org/cancel");

    let (status, _, _) = send(
        &app,
        authorized(Method::GET, "/api/admin/stats", &old_bearer),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let new_bearer = admin_token(&app).await;
    let (status, _, _) = send(
        &app,
        authorized(Method::GET, "/api/admin/stats", &new_bearer),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
