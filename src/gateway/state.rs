use std::sync::Arc;

use crate::classifier::RelatednessService;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct HandlerState {
    pub service: Arc<RelatednessService>,

    /// `"real"` or `"stub"`, reported by the health endpoints.
    pub embedder_mode: &'static str,

    pub reranker_mode: &'static str,
}

impl HandlerState {
    pub fn new(service: Arc<RelatednessService>) -> Self {
        Self {
            service,
            embedder_mode: "stub",
            reranker_mode: "stub",
        }
    }

    pub fn with_model_modes(mut self, embedder_is_stub: bool, reranker_is_stub: bool) -> Self {
        self.embedder_mode = mode_label(embedder_is_stub);
        self.reranker_mode = mode_label(reranker_is_stub);
        self
    }
}

fn mode_label(is_stub: bool) -> &'static str {
    if is_stub { "stub" } else { "real" }
}
