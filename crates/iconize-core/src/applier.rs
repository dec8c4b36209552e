//! Rule application across tree entries.
//!
//! The applier never touches the file system or the UI directly. It talks
//! to the host through three collaborators:
//!
//! - [`FileSystemStat`]: tells whether a path is a file or a folder
//! - [`TreeViewRegistry`]: lists the entries currently shown in tree views
//! - [`IconRenderer`]: creates icon nodes and reports which entries have one
//!
//! Application is additive only. An entry that already carries an icon node
//! is left alone, so re-applying a rule is a no-op.

use crate::resolver::RuleResolver;
use crate::rule::{CompiledRule, CustomRule};
use crate::scope::EntryKind;

/// Looks up the type of a tree entry. `None` means the entry is gone.
pub trait FileSystemStat {
    fn stat(&self, path: &str) -> Option<EntryKind>;
}

/// An entry registered in a tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub path: String,
    /// Whether the entry currently has a live title element to attach to.
    pub has_element: bool,
}

impl FileItem {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            has_element: true,
        }
    }

    pub fn detached(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            has_element: false,
        }
    }
}

/// A single registered tree view.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    pub items: Vec<FileItem>,
}

/// Source of the tree views currently registered by the host.
pub trait TreeViewRegistry {
    fn views(&self) -> Vec<TreeView>;
}

/// Receives icon-node creation requests.
pub trait IconRenderer {
    /// Whether `path` already carries an icon node.
    fn has_icon_node(&self, path: &str) -> bool;

    fn create_icon_node(&mut self, path: &str, icon: &str, color: Option<&str>);
}

/// Outcome of an application pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    /// Paths that received a new icon node, in visit order.
    pub applied: Vec<String>,
    /// Entries skipped because they already had an icon node.
    pub already_iconed: usize,
    /// Entries skipped because they had no element or no stat result.
    pub missing: usize,
    /// Entries visited that no rule matched.
    pub unmatched: usize,
}

impl ApplyResult {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    fn merge(&mut self, other: ApplyResult) {
        self.applied.extend(other.applied);
        self.already_iconed += other.already_iconed;
        self.missing += other.missing;
        self.unmatched += other.unmatched;
    }
}

enum Visit {
    Applied,
    AlreadyIconed,
    Missing,
    Unmatched,
}

/// Applies rules to tree entries through the host collaborators.
pub struct RuleApplier<'a> {
    stat: &'a dyn FileSystemStat,
    registry: &'a dyn TreeViewRegistry,
    renderer: &'a mut dyn IconRenderer,
}

impl<'a> RuleApplier<'a> {
    pub fn new(
        stat: &'a dyn FileSystemStat,
        registry: &'a dyn TreeViewRegistry,
        renderer: &'a mut dyn IconRenderer,
    ) -> Self {
        Self {
            stat,
            registry,
            renderer,
        }
    }

    /// Apply `rule` to one path, or to every registered entry when `file` is `None`.
    pub fn apply_to_file(&mut self, rule: &CustomRule, file: Option<&str>) -> ApplyResult {
        let compiled = rule.compile();
        let mut result = ApplyResult::default();

        match file {
            Some(path) => {
                let visit = self.visit(path, |kind| compiled_match(&compiled, path, kind));
                record(&mut result, path, visit);
            }
            None => {
                for view in self.registry.views() {
                    result.merge(self.apply_to_view(&view, |path, kind| {
                        compiled_match(&compiled, path, kind)
                    }));
                }
            }
        }

        tracing::debug!(
            rule = %rule.rule,
            applied = result.applied.len(),
            "applied rule"
        );
        result
    }

    /// Apply a rule to every loaded file, visible or not.
    ///
    /// Not supported by the host collaborators; always a no-op.
    pub fn apply_to_all_loaded(&mut self, rule: &CustomRule) -> ApplyResult {
        tracing::debug!(rule = %rule.rule, "apply to all loaded files is a no-op");
        ApplyResult::default()
    }

    /// Apply a whole rule set to every registered entry, first match wins per entry.
    pub fn apply_rule_set(&mut self, resolver: &RuleResolver<'_>) -> ApplyResult {
        let mut result = ApplyResult::default();
        for view in self.registry.views() {
            result.merge(self.apply_to_view(&view, |path, kind| {
                resolver
                    .resolve_entry(path, kind)
                    .map(|m| (m.rule.icon.clone(), m.rule.color.clone()))
            }));
        }

        tracing::info!(
            applied = result.applied.len(),
            already_iconed = result.already_iconed,
            missing = result.missing,
            "applied rule set"
        );
        result
    }

    fn apply_to_view<F>(&mut self, view: &TreeView, pick: F) -> ApplyResult
    where
        F: Fn(&str, EntryKind) -> Option<(String, Option<String>)>,
    {
        let mut result = ApplyResult::default();
        for item in &view.items {
            if !item.has_element {
                tracing::debug!(path = %item.path, "no live element, skipping");
                result.missing += 1;
                continue;
            }
            let visit = self.visit(&item.path, |kind| pick(&item.path, kind));
            record(&mut result, &item.path, visit);
        }
        result
    }

    fn visit<F>(&mut self, path: &str, pick: F) -> Visit
    where
        F: FnOnce(EntryKind) -> Option<(String, Option<String>)>,
    {
        if self.renderer.has_icon_node(path) {
            return Visit::AlreadyIconed;
        }
        let Some(kind) = self.stat.stat(path) else {
            tracing::debug!(path, "no stat result, skipping");
            return Visit::Missing;
        };
        match pick(kind) {
            Some((icon, color)) => {
                self.renderer.create_icon_node(path, &icon, color.as_deref());
                Visit::Applied
            }
            None => Visit::Unmatched,
        }
    }
}

fn compiled_match(
    compiled: &CompiledRule<'_>,
    path: &str,
    kind: EntryKind,
) -> Option<(String, Option<String>)> {
    compiled
        .matches(path, kind)
        .then(|| (compiled.rule.icon.clone(), compiled.rule.color.clone()))
}

fn record(result: &mut ApplyResult, path: &str, visit: Visit) {
    match visit {
        Visit::Applied => result.applied.push(path.to_string()),
        Visit::AlreadyIconed => result.already_iconed += 1,
        Visit::Missing => result.missing += 1,
        Visit::Unmatched => result.unmatched += 1,
    }
}
