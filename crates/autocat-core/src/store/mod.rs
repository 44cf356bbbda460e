//! Rule store abstraction
//!
//! The engine and the learning coordinator only see the [`RuleStore`] trait.
//! Two backends are provided:
//! - `memory` - `RwLock`-guarded in-process store
//! - [`crate::db::Database`] - SQLite (optionally SQLCipher-encrypted)
//!
//! Every backend must give readers all-or-nothing visibility of writes: an
//! `active_rules()` call sees a rule set either before or after a concurrent
//! `add`/`deactivate`, never a mix.

use tracing::info;

use crate::config::parse_rules;
use crate::error::Result;
use crate::models::{NewRule, Rule, RuleId};

mod memory;

pub use memory::MemoryRuleStore;

/// Embedded default rule set, seeded into empty stores
const DEFAULT_RULES: &str = include_str!("../../../../config/default_rules.toml");

/// Persistence boundary for classification rules
pub trait RuleStore: Send + Sync {
    /// Validate, assign an id, store as active and return the stored rule
    fn add(&self, rule: NewRule) -> Result<Rule>;

    /// Active rules ordered by priority descending, then insertion order
    fn active_rules(&self) -> Result<Vec<Rule>>;

    fn get(&self, id: RuleId) -> Result<Option<Rule>>;

    /// Mark a rule inactive
    ///
    /// Returns `false` when the rule is absent or already inactive.
    fn deactivate(&self, id: RuleId) -> Result<bool>;

    /// Every rule, including inactive ones, in insertion order
    fn list_rules(&self) -> Result<Vec<Rule>>;

    fn count(&self) -> Result<usize> {
        Ok(self.list_rules()?.len())
    }
}

/// The default rules shipped with autocat
pub fn default_rules() -> Result<Vec<NewRule>> {
    parse_rules(DEFAULT_RULES)
}

/// Seed the default rules into an empty store
///
/// Returns the number of rules inserted (0 if the store already had rules).
pub fn seed_default_rules(store: &dyn RuleStore) -> Result<usize> {
    if store.count()? > 0 {
        return Ok(0);
    }

    let rules = default_rules()?;
    let count = rules.len();
    for rule in rules {
        store.add(rule)?;
    }

    info!("Seeded {} default rules", count);
    Ok(count)
}

/// Order rules for matching: priority descending, id ascending
pub(crate) fn sort_for_matching(rules: &mut [Rule]) {
    rules.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
}
