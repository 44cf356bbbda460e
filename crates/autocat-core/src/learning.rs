//! Supervised learning from confirmed suggestions
//!
//! When the user confirms a mid-confidence suggestion, the coordinator turns
//! it into a new `contains` rule keyed on the first word of the description.
//! A single word keeps one confirmation from overfitting to a full sentence.

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{NewRule, PatternType, Rule, Suggestion};
use crate::store::RuleStore;

/// Confidence given to every learned rule
pub const LEARNED_RULE_CONFIDENCE: f64 = 0.8;

/// Priority given to every learned rule (below curated rules, above defaults)
pub const LEARNED_RULE_PRIORITY: i32 = 5;

/// First whitespace-delimited token of a description
pub fn first_token(description: &str) -> Option<&str> {
    description.split_whitespace().next()
}

/// Writes rules learned from user feedback back into the store
pub struct LearningCoordinator<'a> {
    store: &'a dyn RuleStore,
}

impl<'a> LearningCoordinator<'a> {
    pub fn new(store: &'a dyn RuleStore) -> Self {
        Self { store }
    }

    /// Record the user's accept/reject decision on a suggestion
    ///
    /// Rejections never touch the store and return `None`. Confirmations
    /// store and return the learned rule. A description without any word
    /// fails validation in the store.
    pub fn learn_from(
        &self,
        description: &str,
        amount: f64,
        suggestion: &Suggestion,
        confirmed: bool,
    ) -> Result<Option<Rule>> {
        if !confirmed {
            debug!(description, amount, "Suggestion rejected, nothing learned");
            return Ok(None);
        }

        let rule = self.store.add(learned_rule(description, suggestion))?;

        info!(
            rule_id = rule.id,
            pattern = %rule.pattern,
            category = ?rule.category,
            amount,
            "Learned rule from confirmed suggestion"
        );

        Ok(Some(rule))
    }
}

/// Build the rule a confirmation would create
pub fn learned_rule(description: &str, suggestion: &Suggestion) -> NewRule {
    let pattern = first_token(description).unwrap_or_default().to_string();

    NewRule {
        name: format!("Learned: {}", pattern),
        pattern,
        pattern_type: PatternType::Contains,
        entity: suggestion.entity.clone(),
        category: suggestion.category.clone(),
        subcategory: suggestion.subcategory.clone(),
        tags: suggestion.tags.clone(),
        confidence: LEARNED_RULE_CONFIDENCE,
        priority: LEARNED_RULE_PRIORITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ClassificationEngine;
    use crate::error::Error;
    use crate::models::Band;
    use crate::store::MemoryRuleStore;

    fn mid_confidence_suggestion() -> Suggestion {
        Suggestion {
            entity: Some("Continente".to_string()),
            category: Some("Alimentação".to_string()),
            subcategory: Some("Supermercado".to_string()),
            tags: vec!["mercearia".to_string()],
            confidence: 0.6,
            ai_processed: true,
            source_rule_ids: vec![3],
        }
    }

    #[test]
    fn test_first_token() {
        assert_eq!(first_token("Continente supermercado"), Some("Continente"));
        assert_eq!(first_token("   Galp\tEnergia"), Some("Galp"));
        assert_eq!(first_token("   "), None);
    }

    #[test]
    fn test_confirmed_creates_rule() {
        let store = MemoryRuleStore::new();
        let coordinator = LearningCoordinator::new(&store);

        let rule = coordinator
            .learn_from(
                "Continente supermercado",
                42.5,
                &mid_confidence_suggestion(),
                true,
            )
            .unwrap()
            .unwrap();

        assert_eq!(rule.pattern, "Continente");
        assert_eq!(rule.pattern_type, PatternType::Contains);
        assert_eq!(rule.priority, 5);
        assert_eq!(rule.confidence, 0.8);
        assert!(rule.active);
        assert_eq!(rule.entity.as_deref(), Some("Continente"));
        assert_eq!(rule.category.as_deref(), Some("Alimentação"));
        assert_eq!(rule.subcategory.as_deref(), Some("Supermercado"));
        assert_eq!(rule.tags, vec!["mercearia"]);
        assert_eq!(rule.name, "Learned: Continente");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_rejected_does_not_mutate_store() {
        let store = MemoryRuleStore::new();
        let coordinator = LearningCoordinator::new(&store);

        let before = store.count().unwrap();
        let result = coordinator
            .learn_from("Continente", 1.0, &mid_confidence_suggestion(), false)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.count().unwrap(), before);
    }

    #[test]
    fn test_blank_description_fails_validation() {
        let store = MemoryRuleStore::new();
        let coordinator = LearningCoordinator::new(&store);

        let result = coordinator.learn_from("  ", 1.0, &mid_confidence_suggestion(), true);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_learned_rule_ignores_suggestion_confidence() {
        let mut suggestion = mid_confidence_suggestion();
        suggestion.confidence = 0.45;
        let rule = learned_rule("Pingo Doce", &suggestion);
        assert_eq!(rule.confidence, LEARNED_RULE_CONFIDENCE);
        assert_eq!(rule.pattern, "Pingo");
    }

    #[test]
    fn test_feedback_loop() {
        let store = MemoryRuleStore::with_rules(vec![NewRule {
            pattern: "super".to_string(),
            category: Some("Alimentação".to_string()),
            confidence: 0.55,
            priority: 1,
            ..Default::default()
        }])
        .unwrap();
        let engine = ClassificationEngine::new(&store);
        let coordinator = LearningCoordinator::new(&store);

        let first = engine.classify("Mercadona supermercado", 30.0).unwrap();
        assert_eq!(first.band(), Band::Confirm);

        coordinator
            .learn_from("Mercadona supermercado", 30.0, &first, true)
            .unwrap();

        // The learned rule outranks the weak rule and lifts confidence
        let second = engine.classify("MERCADONA Porto", 12.0).unwrap();
        assert_eq!(second.category.as_deref(), Some("Alimentação"));
        assert_eq!(second.confidence, LEARNED_RULE_CONFIDENCE);
        assert_eq!(second.band(), Band::AutoApply);
    }
}
