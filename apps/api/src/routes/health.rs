use axum::Json;
use serde::Serialize;

use crate::templates;

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    templates: usize,
}

/// GET /health
pub async fn health_handler() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        templates: templates::available_templates().len(),
    })
}
