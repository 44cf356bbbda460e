//! Classification engine for automatic transaction categorization
//!
//! Given a description (and amount), the engine evaluates every active rule
//! against the normalized description and merges the matches into a single
//! [`Suggestion`]:
//!
//! - Rules are visited by priority descending, then insertion order. Rules
//!   sharing a priority form a tier; tiers are processed highest first.
//! - Each classification field (entity, category, subcategory) takes the
//!   first non-null value seen, so a lower tier never overwrites a higher one.
//! - Tags are a union across all matching rules, in first-seen order.
//! - Confidence is the confidence of the highest-priority rule that set a
//!   classification field. Weak incidental matches never dilute it.
//!
//! The amount is accepted but does not influence matching yet.

use regex::RegexBuilder;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Classification, InvalidRule, PatternType, Rule, RuleMatch, Suggestion};
use crate::store::RuleStore;

/// Classifies descriptions against the rules of a store
pub struct ClassificationEngine<'a> {
    store: &'a dyn RuleStore,
}

impl<'a> ClassificationEngine<'a> {
    pub fn new(store: &'a dyn RuleStore) -> Self {
        Self { store }
    }

    /// Propose a classification for a transaction
    ///
    /// Only fails if the store cannot be read; zero matches yield
    /// [`Suggestion::none`].
    pub fn classify(&self, description: &str, amount: f64) -> Result<Suggestion> {
        Ok(self.classify_detailed(description, amount)?.suggestion)
    }

    /// Like [`classify`](Self::classify), with the per-rule match report
    pub fn classify_detailed(&self, description: &str, amount: f64) -> Result<Classification> {
        let rules = self.store.active_rules()?;
        let classification = classify_rules(&rules, description);

        debug!(
            description,
            amount,
            matches = classification.matches.len(),
            confidence = classification.suggestion.confidence,
            band = %classification.suggestion.band(),
            "Classified description"
        );

        Ok(classification)
    }
}

/// Trim and case-fold text before matching
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Check if a description matches a pattern
///
/// Both sides are normalized, so matching is case-insensitive for every
/// pattern type. Returns an error only for a regex that does not compile.
pub fn pattern_matches(description: &str, pattern: &str, pattern_type: PatternType) -> Result<bool> {
    let description = normalize(description);
    matches_normalized(&description, pattern, pattern_type)
}

fn matches_normalized(description: &str, pattern: &str, pattern_type: PatternType) -> Result<bool> {
    match pattern_type {
        PatternType::Contains => Ok(description.contains(&normalize(pattern))),
        PatternType::StartsWith => Ok(description.starts_with(&normalize(pattern))),
        PatternType::Exact => Ok(description == normalize(pattern)),
        PatternType::Regex => {
            let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            Ok(re.is_match(description))
        }
    }
}

/// Set `slot` from `value` if it is still empty; true if it was set
fn fill(slot: &mut Option<String>, value: &Option<String>) -> bool {
    if slot.is_none() && value.is_some() {
        *slot = value.clone();
        true
    } else {
        false
    }
}

/// Classify a description against a rule snapshot
///
/// Inactive rules are ignored and the rest are put in matching order, so the
/// result depends only on the rule set and the description.
pub fn classify_rules(rules: &[Rule], description: &str) -> Classification {
    let normalized = normalize(description);
    let mut suggestion = Suggestion::none();
    let mut matches = Vec::new();
    let mut invalid_rules = Vec::new();

    if normalized.is_empty() {
        return Classification {
            suggestion,
            matches,
            invalid_rules,
        };
    }

    let mut ordered: Vec<&Rule> = rules.iter().filter(|r| r.active).collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));

    let mut field_confidence: Option<f64> = None;
    let mut tag_confidence: Option<f64> = None;

    for rule in ordered {
        match matches_normalized(&normalized, &rule.pattern, rule.pattern_type) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!(
                    rule_id = rule.id,
                    pattern = %rule.pattern,
                    error = %e,
                    "Skipping rule with invalid regex"
                );
                invalid_rules.push(InvalidRule {
                    rule_id: rule.id,
                    pattern: rule.pattern.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        }

        suggestion.ai_processed = true;

        let mut set_field = false;
        set_field |= fill(&mut suggestion.entity, &rule.entity);
        set_field |= fill(&mut suggestion.category, &rule.category);
        set_field |= fill(&mut suggestion.subcategory, &rule.subcategory);

        let mut added_tag = false;
        for tag in &rule.tags {
            if !suggestion.tags.contains(tag) {
                suggestion.tags.push(tag.clone());
                added_tag = true;
            }
        }

        if set_field && field_confidence.is_none() {
            field_confidence = Some(rule.confidence);
        }
        if added_tag && tag_confidence.is_none() {
            tag_confidence = Some(rule.confidence);
        }

        let contributed = set_field || added_tag;
        if contributed {
            suggestion.source_rule_ids.push(rule.id);
        }

        debug!(
            rule_id = rule.id,
            priority = rule.priority,
            contributed,
            "Rule matched"
        );

        matches.push(RuleMatch {
            rule_id: rule.id,
            name: rule.name.clone(),
            pattern: rule.pattern.clone(),
            pattern_type: rule.pattern_type,
            priority: rule.priority,
            confidence: rule.confidence,
            contributed,
        });
    }

    // Tag-only matches still carry their own confidence
    suggestion.confidence = field_confidence.or(tag_confidence).unwrap_or(0.0);

    Classification {
        suggestion,
        matches,
        invalid_rules,
    }
}
