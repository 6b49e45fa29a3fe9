//! In-process counterpart server speaking the envelope protocol, for tests.
//!
//! Routes mirror the real API under `/weather_app`, plus a few endpoints that
//! produce specific malformed or failing responses.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::protocol::{EnvelopeRequest, EnvelopeResponse};
use envelope::{EnvelopeCodec, SharedSecret};
use serde_json::{json, Value};

use super::client::ApiClient;
use crate::config::Config;

pub(crate) const TEST_SECRET: &str = "weatherapp2024secure";

type Reply = (StatusCode, Json<EnvelopeResponse>);

pub(crate) fn test_config(base_url: &str) -> Config {
    Config {
        encryption_key: TEST_SECRET.into(),
        api_base_url: base_url.into(),
        auth_path: "auth".into(),
        request_timeout_secs: 5,
        log_level: "debug".into(),
    }
}

pub(crate) fn test_client(base_url: &str) -> ApiClient {
    test_client_from(&test_config(base_url))
}

/// Build a client that talks to loopback directly, ignoring any system proxy.
pub(crate) fn test_client_from(cfg: &Config) -> ApiClient {
    ApiClient::with_builder(cfg, reqwest::Client::builder().no_proxy()).unwrap()
}

/// Bind the counterpart on an ephemeral port and return its base URL.
pub(crate) async fn spawn_counterpart() -> String {
    let codec = EnvelopeCodec::new(&SharedSecret::new(TEST_SECRET).unwrap());
    let app = Router::new()
        .route("/weather_app/auth/login.php", post(login))
        .route("/weather_app/auth/register.php", post(register))
        .route("/weather_app/index.php", post(weather))
        .route("/weather_app/history.php", get(history))
        .route("/weather_app/echo.php", post(echo_body).get(echo_query))
        .route("/weather_app/plain.php", post(plain))
        .route("/weather_app/bare.php", post(bare))
        .route("/weather_app/garbled.php", post(garbled))
        .route("/weather_app/foreign.php", post(foreign))
        .route("/weather_app/html.php", post(html))
        .with_state(codec);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/weather_app")
}

fn ok(codec: &EnvelopeCodec, value: Value) -> Reply {
    let sealed = codec.seal_envelope(&value).unwrap();
    (StatusCode::OK, Json(EnvelopeResponse::sealed(sealed)))
}

fn fail(status: StatusCode, message: &str) -> Reply {
    (status, Json(EnvelopeResponse::failure(message)))
}

fn open(codec: &EnvelopeCodec, req: &EnvelopeRequest) -> Result<Value, Reply> {
    codec
        .open_envelope(&req.data)
        .map_err(|_| fail(StatusCode::BAD_REQUEST, "Invalid request data"))
}

async fn login(State(codec): State<EnvelopeCodec>, Json(req): Json<EnvelopeRequest>) -> Reply {
    let payload = match open(&codec, &req) {
        Ok(p) => p,
        Err(reply) => return reply,
    };
    if payload["username"] == "alice" && payload["password"] == "x" {
        ok(&codec, json!({"user_id": 1, "username": "alice", "token": "t-alice"}))
    } else {
        fail(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn register(State(codec): State<EnvelopeCodec>, Json(req): Json<EnvelopeRequest>) -> Reply {
    let payload = match open(&codec, &req) {
        Ok(p) => p,
        Err(reply) => return reply,
    };
    if payload["username"] == "alice" {
        return fail(StatusCode::CONFLICT, "Username already exists");
    }
    ok(&codec, json!({"user_id": 2, "username": payload["username"]}))
}

async fn weather(State(codec): State<EnvelopeCodec>, Json(req): Json<EnvelopeRequest>) -> Reply {
    let payload = match open(&codec, &req) {
        Ok(p) => p,
        Err(reply) => return reply,
    };
    let Some(city) = payload["city"].as_str() else {
        return fail(StatusCode::BAD_REQUEST, "City is required");
    };
    if city == "Atlantis" {
        // This endpoint reports failures through `error` rather than `message`.
        let body = EnvelopeResponse {
            success: false,
            data: None,
            message: None,
            error: Some("City not found".into()),
        };
        return (StatusCode::NOT_FOUND, Json(body));
    }
    ok(
        &codec,
        json!({
            "city": city,
            "temperature": 21.5,
            "has_user_id": payload.get("user_id").is_some(),
            "user_id": payload.get("user_id").cloned().unwrap_or(Value::Null),
        }),
    )
}

async fn history(State(codec): State<EnvelopeCodec>, Query(req): Query<EnvelopeRequest>) -> Reply {
    match open(&codec, &req) {
        Ok(p) if p == json!({}) => ok(&codec, json!([{"city": "Oslo"}, {"city": "Lima"}])),
        Ok(_) => fail(StatusCode::BAD_REQUEST, "Unexpected history query"),
        Err(reply) => reply,
    }
}

async fn echo_body(State(codec): State<EnvelopeCodec>, Json(req): Json<EnvelopeRequest>) -> Reply {
    match open(&codec, &req) {
        Ok(p) => ok(&codec, p),
        Err(reply) => reply,
    }
}

async fn echo_query(State(codec): State<EnvelopeCodec>, Query(req): Query<EnvelopeRequest>) -> Reply {
    match open(&codec, &req) {
        Ok(p) => ok(&codec, p),
        Err(reply) => reply,
    }
}

async fn plain() -> Reply {
    let body = EnvelopeResponse {
        success: true,
        data: None,
        message: Some("Saved".into()),
        error: None,
    };
    (StatusCode::OK, Json(body))
}

async fn bare() -> Reply {
    let body = EnvelopeResponse {
        success: false,
        data: None,
        message: None,
        error: None,
    };
    (StatusCode::BAD_REQUEST, Json(body))
}

async fn garbled() -> Reply {
    (StatusCode::OK, Json(EnvelopeResponse::sealed("not-base64!!")))
}

async fn foreign() -> Reply {
    let other = EnvelopeCodec::new(&SharedSecret::new("a-different-secret").unwrap());
    ok(&other, json!({"token": "t-other"}))
}

async fn html() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "<html><body>Bad Gateway</body></html>")
}
