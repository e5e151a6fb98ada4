use axum::response::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Liveness check. Does not touch the contacts API.
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "contacts is alive".into(),
    })
}
