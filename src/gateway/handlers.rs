use super::api::VotesGateway;
use crate::backend::protocol::Record;
use crate::error::GatewayError;

use axum::{
    Extension, Json, Router,
    body::Body,
    extract::Path,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Public collection endpoint.
pub const ENDPOINT_VOTES: &str = "/votes";
/// Same collection under the `/api` prefix.
pub const ENDPOINT_API_VOTES: &str = "/api/votes";
/// Casing used by existing front ends of the voting service.
pub const ENDPOINT_API_VOTES_LEGACY: &str = "/api/Votes";
pub const ENDPOINT_HEALTH: &str = "/health";

pub fn routes(gateway: Arc<VotesGateway>) -> Router {
    let mut router = Router::new();
    for collection in [ENDPOINT_VOTES, ENDPOINT_API_VOTES, ENDPOINT_API_VOTES_LEGACY] {
        router = router.route(collection, get(handle_list_votes)).route(
            &format!("{}/:name", collection),
            put(handle_put_vote).delete(handle_delete_vote),
        );
    }

    router
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(gateway))
}

fn request_span(op: &'static str) -> tracing::Span {
    tracing::info_span!("votes", request_id = %Uuid::new_v4(), op)
}

pub async fn handle_list_votes(
    Extension(gateway): Extension<Arc<VotesGateway>>,
) -> Result<Json<Vec<Record>>, GatewayError> {
    async move {
        let records = gateway.list(gateway.deadline()).await?;
        tracing::info!("Listed {} records", records.len());
        Ok(Json(records))
    }
    .instrument(request_span("list"))
    .await
}

pub async fn handle_put_vote(
    Extension(gateway): Extension<Arc<VotesGateway>>,
    Path(name): Path<String>,
) -> Result<Response, GatewayError> {
    async move {
        let backend = gateway.upsert(&name, gateway.deadline()).await?;
        tracing::info!("Upsert {:?} -> {}", name, backend.status);

        let content_type = backend
            .content_type
            .as_deref()
            .and_then(|value| HeaderValue::from_str(value).ok());
        // A bare body adds no Content-Type of its own
        let mut response = (backend.status, Body::from(backend.body)).into_response();
        if let Some(content_type) = content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        Ok(response)
    }
    .instrument(request_span("upsert"))
    .await
}

pub async fn handle_delete_vote(
    Extension(gateway): Extension<Arc<VotesGateway>>,
    Path(name): Path<String>,
) -> Result<StatusCode, GatewayError> {
    async move {
        let status = gateway.remove(&name, gateway.deadline()).await?;
        tracing::info!("Delete {:?} -> {}", name, status);
        Ok(status)
    }
    .instrument(request_span("remove"))
    .await
}

pub async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
