#![allow(dead_code)]

use aerostep_back::{AppState, app, config::CorsConfig, utils::jwt::JwtKeys};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const FRONTEND: &str = "http://localhost:5173";

pub fn keys() -> JwtKeys {
    JwtKeys::new(SECRET, 3600)
}

pub fn router(db: PgPool) -> Router {
    let state = AppState {
        db,
        jwt: keys(),
        secure_cookies: false,
    };
    let cors = CorsConfig {
        allowed_origins: vec![FRONTEND.to_string()],
    };
    app::build_router(state, &cors, 1 << 20).unwrap()
}

pub fn bearer(user_id: i32, email: &str) -> String {
    format!("Bearer {}", keys().generate_token(user_id, email).unwrap())
}

pub fn json_request(method: Method, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    read_json(response).await
}
