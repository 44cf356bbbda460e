//! Domain models for autocat

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rule identifier, assigned by the store in insertion order
pub type RuleId = i64;

/// Confidence above which a suggestion is applied (or offered for one-click apply)
pub const AUTO_APPLY_THRESHOLD: f64 = 0.7;

/// Confidence above which a suggestion is surfaced for confirmation
pub const CONFIRM_THRESHOLD: f64 = 0.4;

/// Pattern matching type for rules
///
/// All variants match case-insensitively against the trimmed description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Substring match anywhere in the description
    #[default]
    Contains,
    /// Description begins with the pattern
    StartsWith,
    /// Whole description equals the pattern
    Exact,
    /// Regular expression match
    Regex,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::Exact => "exact",
            Self::Regex => "regex",
        }
    }
}

impl std::str::FromStr for PatternType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contains" => Ok(Self::Contains),
            "starts_with" | "startswith" | "prefix" => Ok(Self::StartsWith),
            "exact" => Ok(Self::Exact),
            "regex" => Ok(Self::Regex),
            _ => Err(format!("Unknown pattern type: {}", s)),
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRule {
    /// Display label, no effect on matching
    #[serde(default)]
    pub name: String,
    /// Fragment tested against the transaction description
    pub pattern: String,
    #[serde(default)]
    pub pattern_type: PatternType,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Tags to propose, in display order
    #[serde(default)]
    pub tags: Vec<String>,
    /// Base confidence (0.0-1.0) in this rule's own correctness
    pub confidence: f64,
    /// Higher priority rules are considered first
    #[serde(default)]
    pub priority: i32,
}

impl NewRule {
    /// Reject inputs the store must never persist
    pub fn validate(&self) -> Result<()> {
        if self.pattern.trim().is_empty() {
            return Err(Error::Validation("pattern must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::Validation(format!(
                "confidence must be within [0, 1], got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// A stored classification rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub pattern: String,
    pub pattern_type: PatternType,
    pub entity: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub confidence: f64,
    pub priority: i32,
    /// Inactive rules are kept for history but never matched
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Rule {
    /// Build a stored rule from validated input
    pub(crate) fn from_new(id: RuleId, input: NewRule, created_at: DateTime<Utc>) -> Self {
        let name = if input.name.trim().is_empty() {
            input.pattern.clone()
        } else {
            input.name
        };
        Self {
            id,
            name,
            pattern: input.pattern,
            pattern_type: input.pattern_type,
            entity: input.entity,
            category: input.category,
            subcategory: input.subcategory,
            tags: input.tags,
            confidence: input.confidence,
            priority: input.priority,
            active: true,
            created_at,
        }
    }
}

/// Caller-facing action for a suggestion's confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// confidence > 0.7: apply silently or offer one-click apply
    AutoApply,
    /// 0.4 < confidence <= 0.7: ask before applying and before learning a rule
    Confirm,
    /// confidence <= 0.4: surface nothing
    Ignore,
}

impl Band {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > AUTO_APPLY_THRESHOLD {
            Self::AutoApply
        } else if confidence > CONFIRM_THRESHOLD {
            Self::Confirm
        } else {
            Self::Ignore
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoApply => "auto_apply",
            Self::Confirm => "confirm",
            Self::Ignore => "ignore",
        }
    }

    /// Whether the caller shows anything to the user
    pub fn is_surfaced(&self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Merged classification proposal for one description (never persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Aggregate confidence (0.0-1.0)
    pub confidence: f64,
    /// True iff at least one active rule matched
    #[serde(default)]
    pub ai_processed: bool,
    /// Rules that contributed to the merged proposal, in match order
    #[serde(default)]
    pub source_rule_ids: Vec<RuleId>,
}

impl Suggestion {
    /// The "nothing matched" suggestion
    pub fn none() -> Self {
        Self {
            entity: None,
            category: None,
            subcategory: None,
            tags: Vec::new(),
            confidence: 0.0,
            ai_processed: false,
            source_rule_ids: Vec::new(),
        }
    }

    pub fn band(&self) -> Band {
        Band::from_confidence(self.confidence)
    }

    /// Whether any field or tag is proposed
    pub fn proposes_anything(&self) -> bool {
        self.entity.is_some()
            || self.category.is_some()
            || self.subcategory.is_some()
            || !self.tags.is_empty()
    }

    /// Whether the user may be asked to confirm this suggestion and have a
    /// rule learned from it
    pub fn is_learnable(&self) -> bool {
        self.ai_processed && self.band().is_surfaced() && self.proposes_anything()
    }
}

impl Default for Suggestion {
    fn default() -> Self {
        Self::none()
    }
}

/// A rule that matched a description, for explainability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub rule_id: RuleId,
    pub name: String,
    pub pattern: String,
    pub pattern_type: PatternType,
    pub priority: i32,
    pub confidence: f64,
    /// Whether the rule set a field or added a tag in the merged suggestion
    pub contributed: bool,
}

/// A regex rule skipped because its pattern does not compile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRule {
    pub rule_id: RuleId,
    pub pattern: String,
    pub error: String,
}

/// Suggestion plus the match report it was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub suggestion: Suggestion,
    pub matches: Vec<RuleMatch>,
    pub invalid_rules: Vec<InvalidRule>,
}
