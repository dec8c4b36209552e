pub mod applier;
pub mod config;
pub mod error;
pub mod migration;
pub mod pattern;
pub mod resolver;
pub mod rule;
pub mod scope;
pub mod store;

pub use applier::{
    ApplyResult, FileItem, FileSystemStat, IconRenderer, RuleApplier, TreeView, TreeViewRegistry,
};
pub use config::Config;
pub use error::{IconizeError, Result};
pub use migration::{
    migrate, migrate_icon, migrate_with_report, IconMap, MigratedEntry, MigrationReport,
    MigrationRule, DEFAULT_MIGRATION_TABLE, ICON_COLOR_KEY, ICON_NAME_KEY,
};
pub use pattern::{compile_and_test, CompiledPattern};
pub use resolver::{
    find_first_matching_rule, matches, EmojiClassifier, ResolveOptions, RuleMatch, RuleResolver,
    UnicodeEmojiClassifier,
};
pub use rule::{
    basename, is_reserved_key, CompiledRule, CustomRule, RuleSet, MIGRATED_KEY, RESERVED_KEYS,
    SETTINGS_KEY,
};
pub use scope::{is_compatible, EntryKind, ScopeKind};
pub use store::IconStore;
