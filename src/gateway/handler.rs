use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::classifier::ChainDecision;
use crate::constants::{RELATE_STATUS_CLASSIFIED, RELATE_STATUS_HEADER, RELATE_STATUS_THRESHOLDS};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    ClassifyInput, PredictRequest, PredictResponse, RelatedRequest, RelatedResponse,
    ThresholdTable, ThresholdsUpdateResponse, parse_updates,
};
use crate::gateway::state::HandlerState;

/// `POST /run/predict`: gradio-compatible classification.
#[instrument(skip(state, body))]
pub async fn predict_handler(
    State(state): State<HandlerState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let request: PredictRequest = parse_body(body)?;
    let input = ClassifyInput::try_from(request)?;

    let decision = run_classification(&state, input).await?;

    Ok(make_response(
        RELATE_STATUS_CLASSIFIED,
        PredictResponse::from_verdict(decision.verdict),
    ))
}

/// `POST /v1/related`: classification with the per-stage trace.
#[instrument(skip(state, body))]
pub async fn related_handler(
    State(state): State<HandlerState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let request: RelatedRequest = parse_body(body)?;
    let input = ClassifyInput::try_from(request)?;

    let decision = run_classification(&state, input).await?;

    Ok(make_response(
        RELATE_STATUS_CLASSIFIED,
        RelatedResponse::from(decision),
    ))
}

#[instrument(skip(state))]
pub async fn get_thresholds_handler(State(state): State<HandlerState>) -> Response {
    make_response(
        RELATE_STATUS_THRESHOLDS,
        ThresholdTable(state.service.thresholds()),
    )
}

#[instrument(skip(state, body))]
pub async fn put_thresholds_handler(
    State(state): State<HandlerState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(value) =
        body.map_err(|e| GatewayError::InvalidRequest(format!("Invalid JSON body: {}", e)))?;
    let updates = parse_updates(value)?;

    let (chain, changed) = state.service.reconfigure(&updates)?;

    Ok(make_response(
        RELATE_STATUS_THRESHOLDS,
        ThresholdsUpdateResponse {
            changed,
            thresholds: ThresholdTable(chain.thresholds()),
        },
    ))
}

/// Runs the chain off the async runtime; both models are CPU-bound.
pub(crate) async fn run_classification(
    state: &HandlerState,
    input: ClassifyInput,
) -> Result<ChainDecision, GatewayError> {
    debug!(
        query_len = input.query.len(),
        snippet_len = input.snippet.len(),
        updates = input.new_thresholds.as_ref().map_or(0, |u| u.len()),
        "Classifying pair"
    );

    let service = Arc::clone(&state.service);
    let decision = tokio::task::spawn_blocking(move || {
        service.classify(
            &input.query,
            &input.snippet,
            input.new_thresholds.as_ref(),
        )
    })
    .await
    .map_err(|e| GatewayError::InternalError(format!("Classification task failed: {}", e)))??;

    info!(
        verdict = %decision.verdict,
        decided_by = decision.decided_by.as_deref().unwrap_or("none"),
        stages_run = decision.stages.len(),
        "Pair classified"
    );

    Ok(decision)
}

pub(crate) fn parse_body<T: DeserializeOwned>(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<T, GatewayError> {
    let Json(value) =
        body.map_err(|e| GatewayError::InvalidRequest(format!("Invalid JSON body: {}", e)))?;

    serde_json::from_value(value)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

pub(crate) fn make_response<T: serde::Serialize>(status: &'static str, body: T) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(RELATE_STATUS_HEADER, HeaderValue::from_static(status));
    (StatusCode::OK, headers, Json(body)).into_response()
}
