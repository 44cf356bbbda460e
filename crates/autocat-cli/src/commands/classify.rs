//! Classification and learning command implementations

use anyhow::Result;
use autocat_core::{ClassificationEngine, Database, LearningCoordinator, Rule, Suggestion};

use super::or_dash;

fn print_suggestion(description: &str, suggestion: &Suggestion) {
    println!();
    println!("🏷️  {}", description);
    println!("   ─────────────────────────────────────────");
    if !suggestion.ai_processed {
        println!("   No rule matched");
        return;
    }
    println!("   Entity:      {}", or_dash(suggestion.entity.as_deref()));
    println!("   Category:    {}", or_dash(suggestion.category.as_deref()));
    println!("   Subcategory: {}", or_dash(suggestion.subcategory.as_deref()));
    if !suggestion.tags.is_empty() {
        println!("   Tags:        {}", suggestion.tags.join(", "));
    }
    println!(
        "   Confidence:  {:.2} ({})",
        suggestion.confidence,
        suggestion.band()
    );
    let ids: Vec<String> = suggestion
        .source_rule_ids
        .iter()
        .map(|id| format!("#{}", id))
        .collect();
    println!("   Rules:       {}", ids.join(", "));
}

pub fn cmd_classify(db: &Database, description: &str, amount: f64, json: bool) -> Result<()> {
    let engine = ClassificationEngine::new(db);
    let classification = engine.classify_detailed(description, amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
        return Ok(());
    }

    print_suggestion(description, &classification.suggestion);
    for m in &classification.matches {
        println!(
            "     {} #{} {} (priority {}, confidence {:.2})",
            if m.contributed { "✓" } else { "·" },
            m.rule_id,
            m.name,
            m.priority,
            m.confidence
        );
    }
    for invalid in &classification.invalid_rules {
        println!(
            "   ⚠️  Rule #{} skipped, invalid pattern: {}",
            invalid.rule_id, invalid.error
        );
    }

    Ok(())
}

/// Classify a description, then learn from the user's decision
///
/// Only suggestions that would be surfaced and that propose something can be
/// confirmed. Returns the learned rule when the suggestion was confirmed.
pub fn cmd_learn(
    db: &Database,
    description: &str,
    amount: f64,
    confirmed: bool,
) -> Result<Option<Rule>> {
    let engine = ClassificationEngine::new(db);
    let suggestion = engine.classify(description, amount)?;
    print_suggestion(description, &suggestion);

    if !suggestion.ai_processed {
        println!();
        println!("Nothing to learn: add a rule with `autocat rules add` first");
        return Ok(None);
    }

    if !suggestion.is_learnable() {
        println!();
        if suggestion.proposes_anything() {
            println!(
                "Nothing to learn: confidence {:.2} is too low to be suggested",
                suggestion.confidence
            );
        } else {
            println!("Nothing to learn: the matching rules propose no classification");
        }
        return Ok(None);
    }

    let coordinator = LearningCoordinator::new(db);
    let learned = coordinator.learn_from(description, amount, &suggestion, confirmed)?;

    println!();
    match &learned {
        Some(rule) => println!(
            "✅ Learned rule #{} '{}' (confidence {:.2}, priority {})",
            rule.id, rule.name, rule.confidence, rule.priority
        ),
        None => println!("❌ Suggestion rejected, nothing learned"),
    }

    Ok(learned)
}
