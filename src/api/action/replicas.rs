use axum::{Extension, Json};
use axum::response::IntoResponse;
use http::StatusCode;
use crate::api::server::Replicas;

pub(crate) async fn list(Extension(replicas): Extension<Replicas>) -> impl IntoResponse {
    (StatusCode::OK, Json(replicas.as_ref().clone()))
}
