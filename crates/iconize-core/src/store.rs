//! Persisted plugin data (`data.json`).
//!
//! The data file is one JSON object. Ordinary keys are tree paths mapped to
//! an icon identifier. Two reserved keys carry metadata: `settings` (with the
//! ordered custom rule list under `settings.rules`) and `migrated`.
//!
//! [`IconStore`] is a snapshot: every edit returns a new store and nothing is
//! written until the caller saves it.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{IconizeError, Result};
use crate::migration::{
    migrate_with_report, IconMap, MigrationReport, MigrationRule, ICON_COLOR_KEY, ICON_NAME_KEY,
};
use crate::rule::{is_reserved_key, CustomRule, RuleSet, MIGRATED_KEY, SETTINGS_KEY};

const RULES_KEY: &str = "rules";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconStore {
    data: IconMap,
}

impl IconStore {
    pub fn new(data: IconMap) -> Self {
        Self { data }
    }

    /// Load the data file. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(&content).map_err(|e| IconizeError::DataParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(IconizeError::DataParse {
                path: path.to_path_buf(),
                message: format!("expected a JSON object, found {}", json_type(&other)),
            }),
        }
    }

    /// Write the data file as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content =
            serde_json::to_string_pretty(&self.data).map_err(|e| IconizeError::DataParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The full map, reserved keys included.
    pub fn icon_map(&self) -> &IconMap {
        &self.data
    }

    /// Path assignments only, reserved keys excluded.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .filter_map(|(key, value)| icon_name(value).map(|icon| (key.as_str(), icon)))
    }

    /// Icon assigned to `path`, if any.
    pub fn icon_for(&self, path: &str) -> Option<&str> {
        if is_reserved_key(path) {
            return None;
        }
        self.data.get(path).and_then(icon_name)
    }

    /// Color stored with the assignment for `path`, if any.
    pub fn color_for(&self, path: &str) -> Option<&str> {
        if is_reserved_key(path) {
            return None;
        }
        self.data.get(path)?.get(ICON_COLOR_KEY)?.as_str()
    }

    pub fn has_icon(&self, path: &str) -> bool {
        self.icon_for(path).is_some()
    }

    /// Custom rules stored under `settings.rules`.
    ///
    /// Entries that do not deserialize as a rule are skipped with a warning.
    pub fn rules(&self) -> RuleSet {
        let Some(Value::Array(entries)) = self
            .data
            .get(SETTINGS_KEY)
            .and_then(|settings| settings.get(RULES_KEY))
        else {
            return RuleSet::default();
        };

        entries
            .iter()
            .enumerate()
            .filter_map(
                |(index, entry)| match serde_json::from_value::<CustomRule>(entry.clone()) {
                    Ok(rule) => Some(rule),
                    Err(e) => {
                        tracing::warn!(index, error = %e, "skipping malformed custom rule");
                        None
                    }
                },
            )
            .collect::<Vec<_>>()
            .into()
    }

    pub fn is_migrated(&self) -> bool {
        match self.data.get(MIGRATED_KEY) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n > 0.0),
            _ => false,
        }
    }

    /// Replace the rule list, keeping every other setting.
    pub fn with_rules(&self, rules: &RuleSet) -> Self {
        let mut data = self.data.clone();
        let settings = data
            .entry(SETTINGS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !settings.is_object() {
            *settings = Value::Object(Map::new());
        }
        if let Value::Object(settings) = settings {
            let rules = serde_json::to_value(rules).unwrap_or_else(|_| Value::Array(Vec::new()));
            settings.insert(RULES_KEY.to_string(), rules);
        }
        Self { data }
    }

    /// Replace path assignments with those of `icons`, keeping reserved keys from `self`.
    ///
    /// Keys already present keep their position; new keys are appended.
    pub fn with_icon_map(&self, icons: IconMap) -> Self {
        let mut data = IconMap::with_capacity(self.data.len().max(icons.len()));
        for (key, value) in &self.data {
            if is_reserved_key(key) {
                data.insert(key.clone(), value.clone());
            } else if let Some(value) = icons.get(key) {
                data.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in icons {
            if !is_reserved_key(&key) && !data.contains_key(&key) {
                data.insert(key, value);
            }
        }
        Self { data }
    }

    /// Set the migration marker, keeping a boolean marker boolean and
    /// writing `1` otherwise.
    pub fn with_migrated(&self) -> Self {
        let mut data = self.data.clone();
        let marker = match data.get(MIGRATED_KEY) {
            Some(Value::Bool(_)) => Value::Bool(true),
            _ => Value::from(1),
        };
        data.insert(MIGRATED_KEY.to_string(), marker);
        Self { data }
    }

    /// Record `icon` for `path`. Reserved keys are ignored.
    pub fn assign(&self, path: &str, icon: &str) -> Self {
        self.assign_with_color(path, icon, None)
    }

    /// Record `icon` with an optional color for `path`.
    ///
    /// Without a color the value is the bare icon string; with one it is
    /// `{"iconName": icon, "iconColor": color}`. Reserved keys are ignored.
    pub fn assign_with_color(&self, path: &str, icon: &str, color: Option<&str>) -> Self {
        let mut data = self.data.clone();
        if !is_reserved_key(path) {
            let value = match color {
                Some(color) => {
                    let mut obj = Map::new();
                    obj.insert(ICON_NAME_KEY.to_string(), Value::String(icon.to_string()));
                    obj.insert(ICON_COLOR_KEY.to_string(), Value::String(color.to_string()));
                    Value::Object(obj)
                }
                None => Value::String(icon.to_string()),
            };
            data.insert(path.to_string(), value);
        }
        Self { data }
    }

    /// Run the icon-pack migration once and mark the store migrated.
    ///
    /// Already-migrated stores are returned unchanged unless `force` is set.
    pub fn migrate(&self, table: &[MigrationRule], force: bool) -> (Self, MigrationReport) {
        if self.is_migrated() && !force {
            tracing::debug!("data already migrated");
            return (self.clone(), MigrationReport::default());
        }

        let report = migrate_with_report(&self.data, table);
        let store = self.with_icon_map(report.icons.clone()).with_migrated();
        (store, report)
    }
}

fn icon_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(icon) => Some(icon),
        Value::Object(obj) => obj.get(ICON_NAME_KEY).and_then(Value::as_str),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
