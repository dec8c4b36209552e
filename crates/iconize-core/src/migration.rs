//! Icon-pack identifier migration.
//!
//! Older releases stored Font Awesome icons as `Fa<Style><Name>` (or
//! `Fa<Name><Style>`). The current icon packs split them into `Fab`, `Far`
//! and `Fas`. Migration rewrites every stored identifier once, driven by
//! an ordered table where the first matching entry wins.

use serde_json::{Map, Value};

use crate::rule::is_reserved_key;

/// Persisted path → icon mapping, including reserved metadata keys.
pub type IconMap = Map<String, Value>;

/// Icon field of an object-shaped assignment.
pub const ICON_NAME_KEY: &str = "iconName";
/// Color field of an object-shaped assignment.
pub const ICON_COLOR_KEY: &str = "iconColor";

/// One row of the migration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationRule {
    /// Legacy pack prefix the identifier must start with.
    pub old_icon_pack_prefix: &'static str,
    /// Style marker that must occur in the identifier.
    pub identifier: &'static str,
    /// Replacement pack prefix.
    pub transformation: &'static str,
}

/// Font Awesome style split.
pub const DEFAULT_MIGRATION_TABLE: &[MigrationRule] = &[
    MigrationRule {
        old_icon_pack_prefix: "Fa",
        identifier: "Brands",
        transformation: "Fab",
    },
    MigrationRule {
        old_icon_pack_prefix: "Fa",
        identifier: "Line",
        transformation: "Far",
    },
    MigrationRule {
        old_icon_pack_prefix: "Fa",
        identifier: "Fill",
        transformation: "Fas",
    },
];

impl MigrationRule {
    /// Rewrite `value` if this row applies to it.
    ///
    /// The stem is the text between the old prefix and the marker. When the
    /// marker directly follows the prefix the stem is whatever comes after it.
    pub fn apply(&self, value: &str) -> Option<String> {
        let rest = value.strip_prefix(self.old_icon_pack_prefix)?;
        let at = rest.find(self.identifier)?;

        let mut stem = &rest[..at];
        if stem.is_empty() {
            stem = &rest[at + self.identifier.len()..];
        }
        Some(format!("{}{}", self.transformation, stem))
    }
}

/// Rewrite a single identifier with the first applicable table row.
pub fn migrate_icon(value: &str, table: &[MigrationRule]) -> Option<String> {
    table.iter().find_map(|rule| rule.apply(value))
}

/// A single rewritten entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedEntry {
    pub key: String,
    pub from: String,
    pub to: String,
}

/// Migrated copy of an icon map and the list of rewrites made.
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub icons: IconMap,
    pub rewritten: Vec<MigratedEntry>,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        !self.rewritten.is_empty()
    }
}

/// Return a migrated copy of `icons`; the input is not modified.
pub fn migrate(icons: &IconMap, table: &[MigrationRule]) -> IconMap {
    migrate_with_report(icons, table).icons
}

/// Like [`migrate`], also reporting each rewritten entry.
///
/// String values and the `iconName` of object values are rewritten; other
/// object fields are kept. Reserved keys and nulls are copied as-is.
pub fn migrate_with_report(icons: &IconMap, table: &[MigrationRule]) -> MigrationReport {
    let mut report = MigrationReport {
        icons: Map::with_capacity(icons.len()),
        rewritten: Vec::new(),
    };

    for (key, value) in icons {
        let migrated = if is_reserved_key(key) {
            None
        } else {
            migrate_value(value, table)
        };
        let value = match migrated {
            Some((from, to, value)) => {
                report.rewritten.push(MigratedEntry {
                    key: key.clone(),
                    from,
                    to,
                });
                value
            }
            None => value.clone(),
        };
        report.icons.insert(key.clone(), value);
    }

    if report.changed() {
        tracing::info!(count = report.rewritten.len(), "migrated icon identifiers");
    }
    report
}

fn migrate_value(value: &Value, table: &[MigrationRule]) -> Option<(String, String, Value)> {
    match value {
        Value::String(current) => {
            let to = migrate_icon(current, table)?;
            Some((current.clone(), to.clone(), Value::String(to)))
        }
        Value::Object(obj) => {
            let current = obj.get(ICON_NAME_KEY)?.as_str()?;
            let to = migrate_icon(current, table)?;
            let mut obj = obj.clone();
            obj.insert(ICON_NAME_KEY.to_string(), Value::String(to.clone()));
            Some((current.to_string(), to, Value::Object(obj)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn icons(value: Value) -> IconMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_style_marker_after_prefix() {
        let migrated = migrate(
            &icons(json!({
                "a": "FaBrandsGithub",
                "b": "FaLineUser",
                "c": "FaFillStar",
            })),
            DEFAULT_MIGRATION_TABLE,
        );
        assert_eq!(migrated["a"], "FabGithub");
        assert_eq!(migrated["b"], "FarUser");
        assert_eq!(migrated["c"], "FasStar");
    }

    #[test]
    fn test_style_marker_as_suffix() {
        assert_eq!(
            migrate_icon("FaGithubBrands", DEFAULT_MIGRATION_TABLE).as_deref(),
            Some("FabGithub")
        );
        assert_eq!(
            migrate_icon("FaAddressBookLine", DEFAULT_MIGRATION_TABLE).as_deref(),
            Some("FarAddressBook")
        );
    }

    #[test]
    fn test_stem_stops_at_marker() {
        assert_eq!(
            migrate_icon("FaStarFillHalf", DEFAULT_MIGRATION_TABLE).as_deref(),
            Some("FasStar")
        );
    }

    #[test]
    fn test_unmatched_values_unchanged() {
        let input = icons(json!({
            "home.md": "MdHome",
            "user.md": "FaUser",
            "emoji.md": "🔥",
        }));
        let report = migrate_with_report(&input, DEFAULT_MIGRATION_TABLE);
        assert!(!report.changed());
        assert_eq!(report.icons, input);
    }

    #[test]
    fn test_first_table_row_wins() {
        // contains both markers; Brands row comes first
        assert_eq!(
            migrate_icon("FaBrandsLineX", DEFAULT_MIGRATION_TABLE).as_deref(),
            Some("FabLineX")
        );
    }

    #[test]
    fn test_reserved_and_null_values_are_kept() {
        let input = icons(json!({
            "settings": { "rules": [{ "rule": "x", "icon": "FaFillStar" }] },
            "migrated": 1,
            "notes": null,
            "file.md": "FaFillStar",
        }));
        let report = migrate_with_report(&input, DEFAULT_MIGRATION_TABLE);

        assert_eq!(
            report.icons["settings"],
            json!({ "rules": [{ "rule": "x", "icon": "FaFillStar" }] })
        );
        assert_eq!(report.icons["migrated"], json!(1));
        assert_eq!(report.icons["notes"], Value::Null);
        assert_eq!(report.icons["file.md"], "FasStar");
        assert_eq!(
            report.rewritten,
            vec![MigratedEntry {
                key: "file.md".to_string(),
                from: "FaFillStar".to_string(),
                to: "FasStar".to_string(),
            }]
        );
    }

    #[test]
    fn test_object_icon_name_is_rewritten() {
        let input = icons(json!({
            "folder": {
                "iconName": "FaFillStar",
                "iconColor": "#ff0000",
                "inheritanceIcon": "FaLineUser"
            },
            "plain": { "iconName": "MdHome" },
            "no-name": { "iconColor": "#00ff00" },
        }));
        let report = migrate_with_report(&input, DEFAULT_MIGRATION_TABLE);

        assert_eq!(report.icons["folder"]["iconName"], "FasStar");
        assert_eq!(report.icons["folder"]["iconColor"], "#ff0000");
        assert_eq!(report.icons["folder"]["inheritanceIcon"], "FaLineUser");
        assert_eq!(report.icons["plain"], input["plain"]);
        assert_eq!(report.icons["no-name"], input["no-name"]);
        assert_eq!(
            report.rewritten,
            vec![MigratedEntry {
                key: "folder".to_string(),
                from: "FaFillStar".to_string(),
                to: "FasStar".to_string(),
            }]
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = icons(json!({ "a": "FaFillStar" }));
        let migrated = migrate(&input, DEFAULT_MIGRATION_TABLE);
        assert_eq!(input["a"], "FaFillStar");
        assert_eq!(migrated["a"], "FasStar");
    }

    #[test]
    fn test_empty_table() {
        let input = icons(json!({ "a": "FaFillStar" }));
        assert_eq!(migrate(&input, &[]), input);
    }
}
