use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Router, middleware};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use portcullis::middleware::auth::{CurrentIdentity, require_logged_in};
use portcullis::middleware::role::require_roles;
use portcullis::{
    AuthGate, CookieIdentityProvider, GateConfig, Identity, IdentityProvider, TokenConfig,
    encode_identity,
};

fn test_token_config() -> TokenConfig {
    TokenConfig::new("test-secret-key-at-least-32-characters-long")
}

fn test_gate_config() -> GateConfig {
    let mut config = GateConfig::new("/Accounts/Login");
    config.invalid_role_url = Some("/Accounts/InvalidPermissions".to_string());
    config
}

fn test_gate() -> AuthGate {
    AuthGate::new(test_gate_config(), test_token_config()).unwrap()
}

/// Builds the `Cookie` header value a browser would send back after a
/// sign-in response.
fn auth_cookie(identity: &Identity) -> String {
    let provider = CookieIdentityProvider::new("authorization", test_token_config());
    let mut headers = HeaderMap::new();
    provider.attach(&mut headers, identity).unwrap();

    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Route protected by `require_logged_in`, counting downstream invocations.
fn logged_in_app(gate: AuthGate, path: &str, hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            path,
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_logged_in))
}

/// Route protected by `require_roles`, counting downstream invocations.
fn role_app(gate: AuthGate, path: &str, roles: Vec<String>, hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            path,
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(
            gate,
            move |state: axum::extract::State<AuthGate>, req: Request, next: Next| {
                require_roles(state, req, next, roles.clone())
            },
        ))
}

fn roles(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn get_request(path: &str, cookie: Option<&str>) -> Request {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_require_logged_in_without_cookie_redirects_to_login() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = logged_in_app(test_gate(), "/Foo", hits.clone());

    let response = app.oneshot(get_request("/Foo", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/Accounts/Login?ret=%2FFoo");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_require_logged_in_with_valid_cookie_passes_through() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = logged_in_app(test_gate(), "/Foo", hits.clone());

    let cookie = auth_cookie(&Identity::new("foo", "user"));
    let response = app
        .oneshot(get_request("/Foo", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_require_roles_without_cookie_redirects_to_login() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = role_app(test_gate(), "/Admin/Dash", roles(&["admin"]), hits.clone());

    let response = app.oneshot(get_request("/Admin/Dash", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/Accounts/Login?ret=%2FAdmin%2FDash");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_require_roles_wrong_role_gets_invalid_role_redirect() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = role_app(test_gate(), "/Foo/Bar", roles(&["editor"]), hits.clone());

    let cookie = auth_cookie(&Identity::new("u1", "viewer"));
    let response = app
        .oneshot(get_request("/Foo/Bar", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(location(&response), "/Accounts/InvalidPermissions");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_require_roles_matching_role_serves_protected_content() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = role_app(test_gate(), "/Foo/Bar", roles(&["viewer"]), hits.clone());

    let cookie = auth_cookie(&Identity::new("u1", "viewer"));
    let response = app
        .oneshot(get_request("/Foo/Bar", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_require_roles_matches_any_entry() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = role_app(
        test_gate(),
        "/Posts",
        roles(&["viewer", "editor"]),
        hits.clone(),
    );

    let cookie = auth_cookie(&Identity::new("u1", "editor"));
    let response = app
        .oneshot(get_request("/Posts", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_tampered_cookie_is_treated_as_logged_out() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = logged_in_app(test_gate(), "/Foo", hits.clone());

    let cookie = format!("{}tampered", auth_cookie(&Identity::new("u1", "viewer")));
    let response = app
        .oneshot(get_request("/Foo", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/Accounts/Login?ret=%2FFoo");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expired_token_is_treated_as_logged_out() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = logged_in_app(test_gate(), "/Foo", hits.clone());

    let token = encode_identity(
        &Identity::new("u1", "viewer"),
        Utc::now() - Duration::hours(2),
        &test_token_config(),
    )
    .unwrap();
    let cookie = format!("authorization={token}");
    let response = app
        .oneshot(get_request("/Foo", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_custom_invalid_role_handler_is_invoked() {
    let mut config = test_gate_config();
    config.invalid_role_url = None;
    let gate = AuthGate::with_invalid_role_handler(config, test_token_config(), |_req| async {
        (StatusCode::FORBIDDEN, "custom denied page").into_response()
    })
    .unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let app = role_app(gate, "/Foo/Bar", roles(&["editor"]), hits.clone());

    let cookie = auth_cookie(&Identity::new("u1", "viewer"));
    let response = app
        .oneshot(get_request("/Foo/Bar", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"custom denied page");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_authorized_response_passes_through_unmodified() {
    let app = Router::new()
        .route(
            "/created",
            get(|| async {
                (
                    StatusCode::CREATED,
                    [("x-request-tag", "downstream")],
                    "payload",
                )
            }),
        )
        .route_layer(middleware::from_fn_with_state(
            test_gate(),
            require_logged_in,
        ));

    let cookie = auth_cookie(&Identity::new("u1", "viewer"));
    let response = app
        .oneshot(get_request("/created", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get("x-request-tag").unwrap(),
        &HeaderValue::from_static("downstream")
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"payload");
}

async fn whoami(CurrentIdentity(identity): CurrentIdentity) -> String {
    identity.user_id
}

#[tokio::test]
async fn test_current_identity_extractor_standalone() {
    let gate = test_gate();
    let app = Router::new().route("/me", get(whoami)).with_state(gate);

    let cookie = auth_cookie(&Identity::new("u1", "viewer"));
    let response = app
        .clone()
        .oneshot(get_request("/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"u1");

    let response = app.oneshot(get_request("/me", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/Accounts/Login?ret=%2Fme");
}

#[tokio::test]
async fn test_current_identity_reuses_middleware_resolution() {
    let gate = test_gate();
    let app = Router::new()
        .route("/me", get(whoami))
        .route_layer(middleware::from_fn_with_state(
            gate.clone(),
            require_logged_in,
        ))
        .with_state(gate);

    let cookie = auth_cookie(&Identity::new("u42", "viewer"));
    let response = app
        .oneshot(get_request("/me", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"u42");
}
