//! Integration tests for autocat-core
//!
//! These tests exercise the full classify → confirm → learn → classify loop
//! over the SQLite store.

use std::sync::Arc;
use std::thread;

use autocat_core::{
    store::seed_default_rules, Band, ClassificationEngine, Database, LearningCoordinator, NewRule,
    PatternType, RuleStore, Suggestion,
};

fn continente_rule() -> NewRule {
    NewRule {
        name: "Continente".to_string(),
        pattern: "Continente".to_string(),
        pattern_type: PatternType::Contains,
        category: Some("Alimentação".to_string()),
        confidence: 0.9,
        priority: 10,
        ..Default::default()
    }
}

#[test]
fn test_scenarios_over_sqlite() {
    let db = Database::in_memory().expect("Failed to create test database");
    db.add(continente_rule()).unwrap();

    let engine = ClassificationEngine::new(&db);

    let hit = engine.classify("Compras Continente Lisboa", 42.50).unwrap();
    assert_eq!(hit.category.as_deref(), Some("Alimentação"));
    assert_eq!(hit.confidence, 0.9);
    assert!(hit.ai_processed);

    let miss = engine.classify("Restaurante XYZ", 20.0).unwrap();
    assert!(!miss.ai_processed);
    assert_eq!(miss.confidence, 0.0);
    assert!(miss.tags.is_empty());
}

#[test]
fn test_confirm_band_learning_workflow() {
    let db = Database::in_memory().unwrap();
    db.add(NewRule {
        pattern: "farmácia".to_string(),
        category: Some("Saúde".to_string()),
        tags: vec!["farmácia".to_string()],
        confidence: 0.5,
        priority: 1,
        ..Default::default()
    })
    .unwrap();

    let engine = ClassificationEngine::new(&db);
    let coordinator = LearningCoordinator::new(&db);

    let description = "Wells farmácia Colombo";
    let suggestion = engine.classify(description, 15.30).unwrap();
    assert_eq!(suggestion.band(), Band::Confirm);

    // User rejects first: nothing changes
    assert!(coordinator
        .learn_from(description, 15.30, &suggestion, false)
        .unwrap()
        .is_none());
    assert_eq!(db.count().unwrap(), 1);

    // Then confirms
    let learned = coordinator
        .learn_from(description, 15.30, &suggestion, true)
        .unwrap()
        .expect("confirmed suggestion should produce a rule");
    assert_eq!(learned.pattern, "Wells");
    assert_eq!(learned.priority, 5);
    assert_eq!(learned.confidence, 0.8);
    assert_eq!(db.count().unwrap(), 2);

    let next = engine.classify("WELLS Amoreiras", 8.0).unwrap();
    assert_eq!(next.category.as_deref(), Some("Saúde"));
    assert_eq!(next.tags, vec!["farmácia"]);
    assert_eq!(next.band(), Band::AutoApply);
    assert_eq!(next.source_rule_ids, vec![learned.id]);
}

#[test]
fn test_deactivated_learned_rule_stops_matching() {
    let db = Database::in_memory().unwrap();
    let coordinator = LearningCoordinator::new(&db);
    let suggestion = Suggestion {
        category: Some("Transportes".to_string()),
        confidence: 0.6,
        ai_processed: true,
        ..Suggestion::none()
    };

    let rule = coordinator
        .learn_from("Bolt ride", 6.0, &suggestion, true)
        .unwrap()
        .unwrap();
    assert!(db.deactivate(rule.id).unwrap());

    let engine = ClassificationEngine::new(&db);
    assert_eq!(engine.classify("Bolt ride", 6.0).unwrap(), Suggestion::none());
    assert!(db.get(rule.id).unwrap().is_some());
}

#[test]
fn test_seeded_defaults_classify() {
    let db = Database::in_memory().unwrap();
    seed_default_rules(&db).unwrap();
    let engine = ClassificationEngine::new(&db);

    let edp = engine.classify("EDP Comercial fatura", 61.2).unwrap();
    assert_eq!(edp.category.as_deref(), Some("Habitação"));
    assert_eq!(edp.band(), Band::AutoApply);

    let uber = engine.classify("UBER *TRIP", 9.1).unwrap();
    assert_eq!(uber.category.as_deref(), Some("Transportes"));
}

#[test]
fn test_classify_while_learning_concurrently() {
    let db = Arc::new(Database::in_memory().unwrap());
    db.add(continente_rule()).unwrap();

    let writer = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            let coordinator = LearningCoordinator::new(db.as_ref());
            let suggestion = Suggestion {
                category: Some("Alimentação".to_string()),
                confidence: 0.6,
                ai_processed: true,
                ..Suggestion::none()
            };
            for i in 0..20 {
                coordinator
                    .learn_from(&format!("Loja{} centro", i), 1.0, &suggestion, true)
                    .unwrap();
            }
        })
    };

    let engine = ClassificationEngine::new(db.as_ref());
    for _ in 0..20 {
        let s = engine.classify("Continente", 1.0).unwrap();
        assert_eq!(s.category.as_deref(), Some("Alimentação"));
        assert_eq!(s.confidence, 0.9);
    }

    writer.join().unwrap();
    assert_eq!(db.count().unwrap(), 21);
}
