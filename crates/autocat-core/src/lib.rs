//! autocat Core Library
//!
//! Transaction auto-categorization for the personal finance dashboard:
//! - Rule model and confidence bands
//! - Rule store trait with in-memory and SQLite backends
//! - Classification engine (ordered multi-criteria matching, per-field merge)
//! - Learning coordinator that turns confirmed suggestions into rules
//! - Settings and rule import files

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod learning;
pub mod models;
pub mod store;

pub use config::{load_rules_file, parse_rules, Settings};
pub use db::Database;
pub use engine::ClassificationEngine;
pub use error::{Error, Result};
pub use learning::{LearningCoordinator, LEARNED_RULE_CONFIDENCE, LEARNED_RULE_PRIORITY};
pub use models::{
    Band, Classification, InvalidRule, NewRule, PatternType, Rule, RuleId, RuleMatch, Suggestion,
};
pub use store::{MemoryRuleStore, RuleStore};
