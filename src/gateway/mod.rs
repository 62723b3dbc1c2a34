//! HTTP gateway (Axum) for pair classification and threshold management.
//!
//! This module is primarily used by the `relate` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderName, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    get_thresholds_handler, predict_handler, put_thresholds_handler, related_handler,
};
pub use state::HandlerState;

use crate::constants::{RELATE_STATUS_ERROR, RELATE_STATUS_HEADER, RELATE_STATUS_HEALTHY};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/healthz", get(health_handler))
        .route("/run/predict", post(predict_handler))
        .route("/v1/related", post(related_handler))
        .route(
            "/v1/thresholds",
            get(get_thresholds_handler).put(put_thresholds_handler),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(RELATE_STATUS_HEADER),
            HeaderValue::from_static(RELATE_STATUS_ERROR),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub stages: Vec<String>,
    pub embedder_mode: &'static str,
    pub reranker_mode: &'static str,
}

/// Liveness; `HEAD /` is answered by the same route.
#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        RELATE_STATUS_HEADER,
        HeaderValue::from_static(RELATE_STATUS_HEALTHY),
    );

    let stages = state
        .service
        .snapshot()
        .stage_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: "ok",
            stages,
            embedder_mode: state.embedder_mode,
            reranker_mode: state.reranker_mode,
        }),
    )
        .into_response()
}
