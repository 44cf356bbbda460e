//! In-process rule store
//!
//! Single-writer/multi-reader: `add` and `deactivate` hold the write lock for
//! the whole mutation, `active_rules` clones a snapshot under the read lock.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::debug;

use super::{sort_for_matching, RuleStore};
use crate::error::{Error, Result};
use crate::models::{NewRule, Rule, RuleId};

#[derive(Debug, Default)]
struct Inner {
    /// Kept in insertion order
    rules: Vec<Rule>,
    next_id: RuleId,
}

/// Rule store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    inner: RwLock<Inner>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rules (validated like `add`)
    pub fn with_rules(rules: impl IntoIterator<Item = NewRule>) -> Result<Self> {
        let store = Self::new();
        for rule in rules {
            store.add(rule)?;
        }
        Ok(store)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| Error::Store("rule store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| Error::Store("rule store lock poisoned".to_string()))
    }
}

impl RuleStore for MemoryRuleStore {
    fn add(&self, rule: NewRule) -> Result<Rule> {
        rule.validate()?;

        let mut inner = self.write()?;
        inner.next_id += 1;
        let stored = Rule::from_new(inner.next_id, rule, Utc::now());
        inner.rules.push(stored.clone());

        debug!(id = stored.id, pattern = %stored.pattern, "Added rule");
        Ok(stored)
    }

    fn active_rules(&self) -> Result<Vec<Rule>> {
        let mut rules: Vec<Rule> = self
            .read()?
            .rules
            .iter()
            .filter(|r| r.active)
            .cloned()
            .collect();
        sort_for_matching(&mut rules);
        Ok(rules)
    }

    fn get(&self, id: RuleId) -> Result<Option<Rule>> {
        Ok(self.read()?.rules.iter().find(|r| r.id == id).cloned())
    }

    fn deactivate(&self, id: RuleId) -> Result<bool> {
        let mut inner = self.write()?;
        match inner.rules.iter_mut().find(|r| r.id == id) {
            Some(rule) if rule.active => {
                rule.active = false;
                debug!(id, "Deactivated rule");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn list_rules(&self) -> Result<Vec<Rule>> {
        Ok(self.read()?.rules.clone())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.rules.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn rule(pattern: &str) -> NewRule {
        NewRule {
            pattern: pattern.to_string(),
            confidence: 0.8,
            priority: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_with_rules() {
        let store = MemoryRuleStore::with_rules(vec![rule("a"), rule("b")]).unwrap();
        assert_eq!(store.count().unwrap(), 2);
        assert!(MemoryRuleStore::with_rules(vec![rule("")]).is_err());
    }

    #[test]
    fn test_concurrent_writers_get_unique_ids() {
        let store = Arc::new(MemoryRuleStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..25 {
                        store.add(rule(&format!("p{}-{}", i, j))).unwrap();
                    }
                })
            })
            .collect();

        // Readers only ever see fully written rules
        for _ in 0..50 {
            for r in store.active_rules().unwrap() {
                assert!(!r.pattern.is_empty());
            }
        }

        for h in handles {
            h.join().unwrap();
        }

        let mut ids: Vec<RuleId> = store.list_rules().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 200);
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }
}
