//! Feature schema handler

use axum::Json;

use scoring_core::LayoutInfo;

pub async fn get() -> Json<LayoutInfo> {
    Json(LayoutInfo::current())
}
