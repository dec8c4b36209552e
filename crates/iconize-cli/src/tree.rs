//! Directory-backed collaborators for the rule applier.

use std::fs;
use std::path::{Path, PathBuf};

use iconize_core::{
    EntryKind, FileItem, FileSystemStat, IconRenderer, IconStore, IconizeError, Result, TreeView,
    TreeViewRegistry,
};
use walkdir::{DirEntry, WalkDir};

/// A directory tree exposed as a single tree view with `/`-separated relative paths.
pub struct DirectoryTree {
    root: PathBuf,
    items: Vec<FileItem>,
}

impl DirectoryTree {
    /// Walk `root`, skipping hidden entries.
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(IconizeError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut items = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if let Some(path) = tree_path(root, entry.path()) {
                items.push(FileItem::new(path));
            }
        }

        tracing::debug!(root = %root.display(), entries = items.len(), "scanned tree");
        Ok(Self {
            root: root.to_path_buf(),
            items,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl FileSystemStat for DirectoryTree {
    fn stat(&self, path: &str) -> Option<EntryKind> {
        let metadata = fs::metadata(self.root.join(path)).ok()?;
        Some(if metadata.is_dir() {
            EntryKind::Folder
        } else {
            EntryKind::File
        })
    }
}

impl TreeViewRegistry for DirectoryTree {
    fn views(&self) -> Vec<TreeView> {
        vec![TreeView {
            items: self.items.clone(),
        }]
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn tree_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Renderer that records assignments into a data-file snapshot.
pub struct StoreRenderer {
    store: IconStore,
    assigned: Vec<(String, String, Option<String>)>,
}

impl StoreRenderer {
    pub fn new(store: IconStore) -> Self {
        Self {
            store,
            assigned: Vec::new(),
        }
    }

    pub fn assigned(&self) -> &[(String, String, Option<String>)] {
        &self.assigned
    }

    pub fn into_store(self) -> IconStore {
        self.store
    }
}

impl IconRenderer for StoreRenderer {
    fn has_icon_node(&self, path: &str) -> bool {
        self.store.has_icon(path)
    }

    fn create_icon_node(&mut self, path: &str, icon: &str, color: Option<&str>) {
        self.store = self.store.assign_with_color(path, icon, color);
        self.assigned
            .push((path.to_string(), icon.to_string(), color.map(str::to_string)));
    }
}
