//! Request and response bodies.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::classifier::{ChainDecision, StageOutcome, ThresholdUpdates, Thresholds, Verdict};
use crate::gateway::error::GatewayError;

/// Gradio-style predict call: `{"data": [query, snippet, new_thresholds?]}`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub data: Vec<serde_json::Value>,
}

/// `{"data": ["<verdict int>"]}`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub data: Vec<String>,
}

impl PredictResponse {
    pub fn from_verdict(verdict: Verdict) -> Self {
        Self {
            data: vec![verdict.to_int().to_string()],
        }
    }
}

/// A validated classification request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyInput {
    pub query: String,
    pub snippet: String,
    pub new_thresholds: Option<ThresholdUpdates>,
}

impl ClassifyInput {
    pub fn new(
        query: String,
        snippet: String,
        new_thresholds: Option<ThresholdUpdates>,
    ) -> Result<Self, GatewayError> {
        require_text("query", &query)?;
        require_text("snippet", &snippet)?;

        Ok(Self {
            query,
            snippet,
            new_thresholds,
        })
    }
}

impl TryFrom<PredictRequest> for ClassifyInput {
    type Error = GatewayError;

    fn try_from(request: PredictRequest) -> Result<Self, Self::Error> {
        let mut data = request.data.into_iter();

        let query = positional_text(data.next(), "query", 0)?;
        let snippet = positional_text(data.next(), "snippet", 1)?;
        let new_thresholds = match data.next() {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => Some(parse_updates(value)?),
        };

        if data.next().is_some() {
            return Err(GatewayError::InvalidRequest(
                "`data` takes at most 3 elements: [query, snippet, new_thresholds]".to_string(),
            ));
        }

        Self::new(query, snippet, new_thresholds)
    }
}

/// `POST /v1/related` body.
#[derive(Debug, Deserialize)]
pub struct RelatedRequest {
    pub query: String,
    pub snippet: String,
    #[serde(default)]
    pub new_thresholds: Option<ThresholdUpdates>,
}

impl TryFrom<RelatedRequest> for ClassifyInput {
    type Error = GatewayError;

    fn try_from(request: RelatedRequest) -> Result<Self, Self::Error> {
        Self::new(request.query, request.snippet, request.new_thresholds)
    }
}

#[derive(Debug, Serialize)]
pub struct RelatedResponse {
    pub related: i8,
    pub verdict: Verdict,
    pub decided_by: Option<String>,
    pub stages: Vec<StageReport>,
}

impl From<ChainDecision> for RelatedResponse {
    fn from(decision: ChainDecision) -> Self {
        Self {
            related: decision.verdict.to_int(),
            verdict: decision.verdict,
            decided_by: decision.decided_by,
            stages: decision.stages.into_iter().map(StageReport::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub score: f32,
    pub verdict: Verdict,
    pub elapsed_ms: f64,
}

impl From<StageOutcome> for StageReport {
    fn from(outcome: StageOutcome) -> Self {
        Self {
            stage: outcome.stage,
            score: outcome.score,
            verdict: outcome.verdict,
            elapsed_ms: outcome.elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Thresholds as a JSON object keyed by stage, in chain order.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable(pub Vec<(String, Thresholds)>);

impl Serialize for ThresholdTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (stage, thresholds) in &self.0 {
            map.serialize_entry(stage, thresholds)?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct ThresholdsUpdateResponse {
    pub changed: Vec<String>,
    pub thresholds: ThresholdTable,
}

/// Parses a `{stage: [true, false]}` object.
pub fn parse_updates(value: serde_json::Value) -> Result<ThresholdUpdates, GatewayError> {
    serde_json::from_value(value).map_err(|e| {
        GatewayError::InvalidRequest(format!(
            "new_thresholds must map stage names to [true, false] pairs: {}",
            e
        ))
    })
}

fn positional_text(
    value: Option<serde_json::Value>,
    field: &str,
    index: usize,
) -> Result<String, GatewayError> {
    match value {
        Some(serde_json::Value::String(text)) => Ok(text),
        Some(other) => Err(GatewayError::InvalidRequest(format!(
            "data[{}] ({}) must be a string, got {}",
            index, field, other
        ))),
        None => Err(GatewayError::InvalidRequest(format!(
            "data[{}] ({}) is missing",
            index, field
        ))),
    }
}

fn require_text(field: &str, text: &str) -> Result<(), GatewayError> {
    if text.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(format!(
            "`{}` must not be empty",
            field
        )));
    }
    Ok(())
}
