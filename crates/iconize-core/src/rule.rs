//! Custom icon rules.
//!
//! A rule pairs a name pattern with an icon (and optional color) and a
//! target scope. Rules live in an ordered [`RuleSet`]; position is the
//! rule's priority and the first matching rule wins.

use serde::{Deserialize, Serialize};

use crate::error::{IconizeError, Result};
use crate::pattern::CompiledPattern;
use crate::scope::{EntryKind, ScopeKind};

/// Data-file key holding plugin settings rather than a path assignment.
pub const SETTINGS_KEY: &str = "settings";
/// Data-file key holding the migration marker.
pub const MIGRATED_KEY: &str = "migrated";
/// Keys that are never resolved as paths and never rewritten by migration.
pub const RESERVED_KEYS: &[&str] = &[SETTINGS_KEY, MIGRATED_KEY];

/// Check whether a data-file key is reserved for plugin metadata.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Last component of a `/`-separated tree path.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

// ============================================================================
// CustomRule
// ============================================================================

/// A user-defined icon rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRule {
    /// Name pattern, regex or literal.
    pub rule: String,
    /// Icon identifier (icon-pack name or emoji).
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "for", default)]
    pub scope: ScopeKind,
}

impl CustomRule {
    /// Create a rule, rejecting an empty pattern or icon.
    pub fn new(
        pattern: impl Into<String>,
        icon: impl Into<String>,
        color: Option<String>,
        scope: ScopeKind,
    ) -> Result<Self> {
        let rule = pattern.into();
        let icon = icon.into();
        if rule.is_empty() {
            return Err(IconizeError::EmptyPattern);
        }
        if icon.trim().is_empty() {
            return Err(IconizeError::EmptyIcon);
        }
        Ok(Self {
            rule,
            icon,
            color: color.filter(|c| !c.trim().is_empty()),
            scope,
        })
    }

    /// Compile this rule's pattern for repeated matching.
    pub fn compile(&self) -> CompiledRule<'_> {
        CompiledRule {
            rule: self,
            pattern: CompiledPattern::compile(&self.rule),
        }
    }
}

/// A rule whose pattern has been compiled once.
#[derive(Debug, Clone)]
pub struct CompiledRule<'a> {
    pub rule: &'a CustomRule,
    pub pattern: CompiledPattern,
}

impl CompiledRule<'_> {
    /// Pattern test against the basename of `path` only.
    pub fn matches_name(&self, path: &str) -> bool {
        self.pattern.matches(basename(path))
    }

    /// Pattern test plus scope compatibility.
    pub fn matches(&self, path: &str, kind: EntryKind) -> bool {
        self.matches_name(path) && self.rule.scope.is_compatible(kind)
    }
}

// ============================================================================
// RuleSet
// ============================================================================

/// Immutable ordered snapshot of custom rules.
///
/// Edits return a new snapshot; the caller decides when to commit it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<CustomRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<CustomRule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CustomRule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CustomRule> {
        self.rules.iter()
    }

    pub fn as_slice(&self) -> &[CustomRule] {
        &self.rules
    }

    /// Compile every pattern, preserving order.
    pub fn compile(&self) -> Vec<CompiledRule<'_>> {
        self.rules.iter().map(CustomRule::compile).collect()
    }

    /// Append a rule (lowest priority).
    pub fn with_rule(&self, rule: CustomRule) -> Self {
        let mut rules = self.rules.clone();
        rules.push(rule);
        Self { rules }
    }

    /// Insert a rule at `index`; `index == len` appends.
    pub fn with_rule_at(&self, index: usize, rule: CustomRule) -> Result<Self> {
        if index > self.rules.len() {
            return Err(self.out_of_range(index));
        }
        let mut rules = self.rules.clone();
        rules.insert(index, rule);
        Ok(Self { rules })
    }

    /// Remove the rule at `index`, returning the new snapshot and the removed rule.
    pub fn without(&self, index: usize) -> Result<(Self, CustomRule)> {
        if index >= self.rules.len() {
            return Err(self.out_of_range(index));
        }
        let mut rules = self.rules.clone();
        let removed = rules.remove(index);
        Ok((Self { rules }, removed))
    }

    /// Move the rule at `from` so that it ends up at position `to`.
    pub fn moved(&self, from: usize, to: usize) -> Result<Self> {
        let len = self.rules.len();
        if from >= len {
            return Err(self.out_of_range(from));
        }
        if to >= len {
            return Err(self.out_of_range(to));
        }
        let mut rules = self.rules.clone();
        let rule = rules.remove(from);
        rules.insert(to, rule);
        Ok(Self { rules })
    }

    fn out_of_range(&self, index: usize) -> IconizeError {
        IconizeError::RuleIndexOutOfRange {
            index,
            len: self.rules.len(),
        }
    }
}

impl From<Vec<CustomRule>> for RuleSet {
    fn from(rules: Vec<CustomRule>) -> Self {
        Self::new(rules)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a CustomRule;
    type IntoIter = std::slice::Iter<'a, CustomRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, icon: &str) -> CustomRule {
        CustomRule::new(pattern, icon, None, ScopeKind::Everything).unwrap()
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("notes/daily/2024-01-01.md"), "2024-01-01.md");
        assert_eq!(basename("README.md"), "README.md");
        assert_eq!(basename("projects/archive/"), "archive");
    }

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved_key("settings"));
        assert!(is_reserved_key("migrated"));
        assert!(!is_reserved_key("notes/settings"));
    }

    #[test]
    fn test_new_rule_validation() {
        assert!(matches!(
            CustomRule::new("", "FasStar", None, ScopeKind::Files),
            Err(IconizeError::EmptyPattern)
        ));
        assert!(matches!(
            CustomRule::new("md", " ", None, ScopeKind::Files),
            Err(IconizeError::EmptyIcon)
        ));
        let r = CustomRule::new("md", "FasStar", Some("".to_string()), ScopeKind::Files).unwrap();
        assert_eq!(r.color, None);
    }

    #[test]
    fn test_rule_json_shape() {
        let json = r##"{"rule":"^daily","icon":"FasCalendar","color":"#ff0000","for":"files"}"##;
        let r: CustomRule = serde_json::from_str(json).unwrap();
        assert_eq!(r.scope, ScopeKind::Files);
        assert_eq!(r.color.as_deref(), Some("#ff0000"));

        let minimal: CustomRule = serde_json::from_str(r#"{"rule":"x","icon":"y"}"#).unwrap();
        assert_eq!(minimal.scope, ScopeKind::Everything);
        assert_eq!(minimal.color, None);

        let out = serde_json::to_string(&minimal).unwrap();
        assert_eq!(out, r#"{"rule":"x","icon":"y","for":"everything"}"#);
    }

    #[test]
    fn test_compiled_rule_checks_basename_and_scope() {
        let r = CustomRule::new("^daily", "FasCalendar", None, ScopeKind::Folders).unwrap();
        let compiled = r.compile();
        assert!(compiled.matches_name("journal/daily"));
        assert!(!compiled.matches_name("daily/journal"));
        assert!(compiled.matches("journal/daily", EntryKind::Folder));
        assert!(!compiled.matches("journal/daily", EntryKind::File));
    }

    #[test]
    fn test_edits_return_new_snapshot() {
        let base = RuleSet::default();
        let one = base.with_rule(rule("a", "A"));
        let two = one.with_rule(rule("b", "B"));

        assert!(base.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);

        let front = two.with_rule_at(0, rule("c", "C")).unwrap();
        assert_eq!(front.get(0).unwrap().rule, "c");

        let (removed_set, removed) = front.without(1).unwrap();
        assert_eq!(removed.rule, "a");
        assert_eq!(removed_set.len(), 2);
        assert_eq!(front.len(), 3);
    }

    #[test]
    fn test_moved() {
        let set = RuleSet::new(vec![rule("a", "A"), rule("b", "B"), rule("c", "C")]);
        let moved = set.moved(2, 0).unwrap();
        let order: Vec<_> = moved.iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        assert!(matches!(
            set.moved(3, 0),
            Err(IconizeError::RuleIndexOutOfRange { index: 3, len: 3 })
        ));
    }
}
