//! Rule persistence

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewRule, PatternType, Rule, RuleId};
use crate::store::RuleStore;

const RULE_COLUMNS: &str = "id, name, pattern, pattern_type, entity, category, subcategory, \
                            tags, confidence, priority, active, created_at";

/// Map a `rules` row (selected with `RULE_COLUMNS`) to a Rule
fn map_rule_row(row: &Row<'_>) -> rusqlite::Result<Rule> {
    let pattern_type_str: String = row.get(3)?;
    let tags_json: String = row.get(7)?;
    let created_at_str: String = row.get(11)?;

    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let pattern_type: PatternType = pattern_type_str.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(Rule {
        id: row.get(0)?,
        name: row.get(1)?,
        pattern: row.get(2)?,
        pattern_type,
        entity: row.get(4)?,
        category: row.get(5)?,
        subcategory: row.get(6)?,
        tags,
        confidence: row.get(8)?,
        priority: row.get(9)?,
        active: row.get(10)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    fn query_rules(&self, where_clause: &str) -> Result<Vec<Rule>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM rules {}", RULE_COLUMNS, where_clause);
        let mut stmt = conn.prepare(&sql)?;

        let rules = stmt
            .query_map([], map_rule_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rules)
    }
}

impl RuleStore for Database {
    fn add(&self, rule: NewRule) -> Result<Rule> {
        rule.validate()?;

        let name = if rule.name.trim().is_empty() {
            rule.pattern.clone()
        } else {
            rule.name.clone()
        };
        let tags = serde_json::to_string(&rule.tags)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO rules (name, pattern, pattern_type, entity, category, subcategory,
                               tags, confidence, priority, active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
            "#,
            params![
                name,
                rule.pattern,
                rule.pattern_type.as_str(),
                rule.entity,
                rule.category,
                rule.subcategory,
                tags,
                rule.confidence,
                rule.priority,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        debug!(id, pattern = %rule.pattern, "Added rule");

        self.get(id)?
            .ok_or_else(|| Error::NotFound(format!("rule {} after insert", id)))
    }

    fn active_rules(&self) -> Result<Vec<Rule>> {
        self.query_rules("WHERE active = 1 ORDER BY priority DESC, id ASC")
    }

    fn get(&self, id: RuleId) -> Result<Option<Rule>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM rules WHERE id = ?", RULE_COLUMNS);
        let rule = conn
            .query_row(&sql, params![id], map_rule_row)
            .optional()?;
        Ok(rule)
    }

    fn deactivate(&self, id: RuleId) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE rules SET active = 0 WHERE id = ? AND active = 1",
            params![id],
        )?;
        if changed > 0 {
            debug!(id, "Deactivated rule");
        }
        Ok(changed > 0)
    }

    fn list_rules(&self) -> Result<Vec<Rule>> {
        self.query_rules("ORDER BY id ASC")
    }

    fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM rules", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
