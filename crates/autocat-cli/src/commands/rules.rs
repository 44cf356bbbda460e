//! Rule management command implementations

use std::path::Path;

use anyhow::{Context, Result};
use autocat_core::{
    load_rules_file, ClassificationEngine, Database, NewRule, PatternType, Rule, RuleId,
    RuleStore,
};

use super::{or_dash, truncate};

/// Parse a `--type` argument into a pattern type
pub fn parse_pattern_type(input: &str) -> Result<PatternType> {
    input.parse().map_err(|e: String| {
        anyhow::anyhow!("{} (valid types: contains, starts_with, exact, regex)", e)
    })
}

pub fn cmd_rules_list(db: &Database, all: bool) -> Result<()> {
    let rules = if all { db.list_rules()? } else { db.active_rules()? };

    if rules.is_empty() {
        println!("No rules defined. Add one with:");
        println!("  autocat rules add <pattern> --category <name> [--type contains|starts_with|exact|regex]");
        return Ok(());
    }

    println!();
    println!("📋 Classification Rules");
    println!("   ─────────────────────────────────────────────────────────────────────────");
    println!(
        "   {:>4} │ {:>4} │ {:>4} │ {:11} │ {:20} │ {}",
        "ID", "Pri", "Conf", "Type", "Pattern", "Category"
    );
    println!("   ─────┼──────┼──────┼─────────────┼──────────────────────┼─────────────────");

    for rule in &rules {
        let marker = if rule.active { "" } else { " (inactive)" };
        println!(
            "   {:>4} │ {:>4} │ {:>4.2} │ {:11} │ {:20} │ {}{}",
            rule.id,
            rule.priority,
            rule.confidence,
            rule.pattern_type.as_str(),
            truncate(&rule.pattern, 20),
            truncate(or_dash(rule.category.as_deref()), 24),
            marker
        );
    }

    Ok(())
}

pub fn cmd_rules_add(db: &Database, rule: NewRule) -> Result<Rule> {
    let rule = db.add(rule)?;
    println!(
        "✅ Created rule #{} '{}': {} ({}, priority {}, confidence {:.2})",
        rule.id,
        rule.name,
        rule.pattern,
        rule.pattern_type.as_str(),
        rule.priority,
        rule.confidence
    );

    if rule.pattern_type == PatternType::Regex {
        if let Err(e) = autocat_core::engine::pattern_matches("", &rule.pattern, rule.pattern_type)
        {
            println!("   ⚠️  Pattern does not compile and will never match: {}", e);
        }
    }

    Ok(rule)
}

pub fn cmd_rules_show(db: &Database, id: RuleId) -> Result<()> {
    let rule = db
        .get(id)?
        .with_context(|| format!("Rule #{} not found", id))?;

    println!();
    println!("📌 Rule #{} - {}", rule.id, rule.name);
    println!("   ─────────────────────────────────────────");
    println!("   Pattern:     {} ({})", rule.pattern, rule.pattern_type);
    println!("   Entity:      {}", or_dash(rule.entity.as_deref()));
    println!("   Category:    {}", or_dash(rule.category.as_deref()));
    println!("   Subcategory: {}", or_dash(rule.subcategory.as_deref()));
    if rule.tags.is_empty() {
        println!("   Tags:        -");
    } else {
        println!("   Tags:        {}", rule.tags.join(", "));
    }
    println!("   Confidence:  {:.2}", rule.confidence);
    println!("   Priority:    {}", rule.priority);
    println!(
        "   Status:      {}",
        if rule.active { "active" } else { "inactive" }
    );
    println!("   Created:     {}", rule.created_at.format("%Y-%m-%d %H:%M"));

    Ok(())
}

pub fn cmd_rules_deactivate(db: &Database, id: RuleId) -> Result<()> {
    if db.deactivate(id)? {
        println!("✅ Deactivated rule #{}", id);
    } else {
        println!("Rule #{} is unknown or already inactive", id);
    }

    Ok(())
}

/// Import every rule of a `[[rules]]` TOML file, all-or-nothing on parse errors
pub fn cmd_rules_import(db: &Database, file: &Path) -> Result<usize> {
    let rules = load_rules_file(file)
        .with_context(|| format!("Failed to load rules from {}", file.display()))?;

    let count = rules.len();
    for rule in rules {
        db.add(rule)?;
    }

    println!("✅ Imported {} rules from {}", count, file.display());
    Ok(count)
}

pub fn cmd_rules_test(db: &Database, description: &str) -> Result<()> {
    let engine = ClassificationEngine::new(db);
    let classification = engine.classify_detailed(description, 0.0)?;

    for invalid in &classification.invalid_rules {
        println!(
            "⚠️  Rule #{} has an invalid pattern '{}': {}",
            invalid.rule_id, invalid.pattern, invalid.error
        );
    }

    if classification.matches.is_empty() {
        println!("No rules match \"{}\"", description);
        return Ok(());
    }

    println!();
    println!("🔍 Rules matching \"{}\":", description);
    println!("   ─────────────────────────────────────────────────────────────");

    for m in &classification.matches {
        println!(
            "   Rule #{} (priority {}, confidence {:.2}) {} ({}: {}){}",
            m.rule_id,
            m.priority,
            m.confidence,
            m.name,
            m.pattern_type.as_str(),
            m.pattern,
            if m.contributed { "" } else { " [shadowed]" }
        );
    }

    Ok(())
}
