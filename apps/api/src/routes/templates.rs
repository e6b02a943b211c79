use axum::Json;

use crate::templates::{available_templates, TemplateMeta};

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<&'static [TemplateMeta]> {
    Json(available_templates())
}
