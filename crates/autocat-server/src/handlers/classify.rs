//! Classification and learning handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use autocat_core::{Band, ClassificationEngine, LearningCoordinator, Rule, Suggestion};

/// Request body for classifying a description
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub description: String,
    #[serde(default)]
    pub amount: f64,
}

/// Suggestion plus the action band the form should take
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub band: Band,
    /// False when the description was too short to be sent to the engine
    pub evaluated: bool,
}

/// POST /api/classify - Propose a classification for a description
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    if !state.settings.should_classify(&req.description) {
        let suggestion = Suggestion::none();
        return Ok(Json(ClassifyResponse {
            band: suggestion.band(),
            suggestion,
            evaluated: false,
        }));
    }

    let engine = ClassificationEngine::new(state.store.as_ref());
    let suggestion = engine.classify(&req.description, req.amount)?;

    Ok(Json(ClassifyResponse {
        band: suggestion.band(),
        suggestion,
        evaluated: true,
    }))
}

/// Request body for recording a decision on a suggestion
#[derive(Debug, Deserialize)]
pub struct LearnRequest {
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    pub suggestion: Suggestion,
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct LearnResponse {
    pub learned: bool,
    pub rule: Option<Rule>,
}

/// POST /api/learn - Learn a rule from a confirmed suggestion
pub async fn learn(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LearnRequest>,
) -> Result<Json<LearnResponse>, AppError> {
    let coordinator = LearningCoordinator::new(state.store.as_ref());
    let rule =
        coordinator.learn_from(&req.description, req.amount, &req.suggestion, req.confirmed)?;

    Ok(Json(LearnResponse {
        learned: rule.is_some(),
        rule,
    }))
}
