//! HTTP routes for the off-chain read gateway

use std::time::Instant;

use alloy_primitives::{hex, Address};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use ccip_core::OffchainRequest;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

use crate::error::{Result, ServerError};
use crate::metrics::{
    record_request, FUNCTION_INVALID, OUTCOME_CLIENT_ERROR, OUTCOME_OK, OUTCOME_SERVER_ERROR,
};
use crate::state::SharedState;

pub const SERVICE_NAME: &str = "suins-ens-gateway";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    /// Address the resolver contract must trust
    pub signer: Address,
    pub parent_domain: String,
}

/// POST body of an off-chain lookup
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupRequest {
    pub sender: String,
    pub data: String,
}

/// Lookup response: `0x`-hex ABI `(bytes result, uint64 expires, bytes sig)`
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    pub data: String,
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        signer: state.gateway.signer_address(),
        parent_domain: state.gateway.config().parent_domain.clone(),
    })
}

/// `GET /lookup/{sender}/{data}` with an optional `.json` suffix on `data`
async fn lookup_get(
    State(state): State<SharedState>,
    Path((sender, data)): Path<(String, String)>,
) -> Result<Json<LookupResponse>> {
    let data = data.strip_suffix(".json").unwrap_or(&data);
    answer(&state, &sender, data).await
}

async fn lookup_post(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<LookupResponse>> {
    let Json(body) = payload.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
    answer(&state, &body.sender, &body.data).await
}

async fn answer(state: &SharedState, sender: &str, data: &str) -> Result<Json<LookupResponse>> {
    let started = Instant::now();

    let request = match OffchainRequest::parse(sender, data) {
        Ok(request) => request,
        Err(e) => {
            record_request(FUNCTION_INVALID, OUTCOME_CLIENT_ERROR, started.elapsed());
            debug!(sender, error = %e, "Rejected malformed lookup");
            return Err(ServerError::InvalidRequest(e.to_string()));
        }
    };

    let query = match state.gateway.decode(&request) {
        Ok(query) => query,
        Err(e) => {
            let outcome = if e.is_client_error() {
                OUTCOME_CLIENT_ERROR
            } else {
                OUTCOME_SERVER_ERROR
            };
            record_request(FUNCTION_INVALID, outcome, started.elapsed());
            debug!(sender = %request.sender, error = %e, "Request did not decode");
            return Err(e.into());
        }
    };

    let function = query.query.function_name();
    let result = state.gateway.respond(&request, &query).await;

    match result {
        Ok(response) => {
            record_request(function, OUTCOME_OK, started.elapsed());
            debug!(sender = %request.sender, function, expires = response.expires, "Signed response");
            Ok(Json(LookupResponse {
                data: hex::encode_prefixed(response.abi_encode()),
            }))
        }
        Err(e) if e.is_client_error() => {
            record_request(function, OUTCOME_CLIENT_ERROR, started.elapsed());
            debug!(sender = %request.sender, function, error = %e, "Lookup rejected");
            Err(e.into())
        }
        Err(e) => {
            record_request(function, OUTCOME_SERVER_ERROR, started.elapsed());
            warn!(sender = %request.sender, function, error = %e, "Lookup failed");
            Err(e.into())
        }
    }
}

async fn metrics(State(state): State<SharedState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Metrics disabled" })),
        )
            .into_response(),
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Create the router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/lookup", post(lookup_post))
        .route("/lookup/{sender}/{data}", get(lookup_get))
        .fallback(not_found)
        .layer(cors())
        .with_state(state)
}
