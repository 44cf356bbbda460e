//! Rule management handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};
use autocat_core::{ClassificationEngine, InvalidRule, NewRule, Rule, RuleId, RuleMatch};

/// GET /api/health - Liveness check (no auth)
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRulesQuery {
    /// Include inactive rules
    #[serde(default)]
    pub all: bool,
}

/// GET /api/rules - Active rules in match order (`?all=true` for every rule)
pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRulesQuery>,
) -> Result<Json<Vec<Rule>>, AppError> {
    let rules = if query.all {
        state.store.list_rules()?
    } else {
        state.store.active_rules()?
    };
    Ok(Json(rules))
}

/// POST /api/rules - Create a rule
pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewRule>,
) -> Result<Json<Rule>, AppError> {
    let rule = state.store.add(req)?;
    info!(rule_id = rule.id, pattern = %rule.pattern, "Created rule");
    Ok(Json(rule))
}

/// GET /api/rules/:id - Get a specific rule
pub async fn get_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RuleId>,
) -> Result<Json<Rule>, AppError> {
    let rule = state
        .store
        .get(id)?
        .ok_or_else(|| AppError::not_found("Rule not found"))?;
    Ok(Json(rule))
}

#[derive(Debug, Serialize)]
pub struct DeactivateResponse {
    /// False if the rule was absent or already inactive
    pub deactivated: bool,
}

/// POST /api/rules/:id/deactivate - Deactivate a rule (idempotent)
pub async fn deactivate_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RuleId>,
) -> Result<Json<DeactivateResponse>, AppError> {
    let deactivated = state.store.deactivate(id)?;
    if deactivated {
        info!(rule_id = id, "Deactivated rule");
    }
    Ok(Json(DeactivateResponse { deactivated }))
}

/// Request body for testing rules
#[derive(Debug, Deserialize)]
pub struct TestRulesRequest {
    pub description: String,
}

/// Response for testing rules
#[derive(Debug, Serialize)]
pub struct TestRulesResponse {
    pub matches: Vec<RuleMatch>,
    pub invalid_rules: Vec<InvalidRule>,
}

/// POST /api/rules/test - Test which rules match a description
pub async fn test_rules(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TestRulesRequest>,
) -> Result<Json<TestRulesResponse>, AppError> {
    let engine = ClassificationEngine::new(state.store.as_ref());
    let classification = engine.classify_detailed(&req.description, 0.0)?;

    Ok(Json(TestRulesResponse {
        matches: classification.matches,
        invalid_rules: classification.invalid_rules,
    }))
}
