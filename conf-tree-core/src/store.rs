//! Configuration store contract and the document-backed implementation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::node::ConfNode;
use crate::xml::{parse_file, write_file, ParseError, WriteError};

/// Errors that can occur when committing a configuration document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to serialize or persist the backing file.
    #[error("failed to persist configuration: {0}")]
    Write(#[from] WriteError),
}

/// Contract for a shared, path-addressed configuration document.
///
/// This is the collaborator interface the control-plane components are
/// written against: scalar get/set/delete by slash path, presence-as-true
/// flag checks, a transactional `write`, and deferred-apply dirty marks for
/// downstream subsystems.
pub trait ConfigStore {
    /// The full document root.
    fn root(&self) -> &ConfNode;

    /// Trimmed text at a path, if the node exists and carries text.
    fn get(&self, path: &str) -> Option<&str>;

    /// The node at a path, if present.
    fn node(&self, path: &str) -> Option<&ConfNode>;

    /// Set scalar text at a path, creating intermediate children.
    fn set(&mut self, path: &str, value: &str) -> bool;

    /// Replace the subtree at a path.
    fn set_node(&mut self, path: &str, node: ConfNode) -> bool;

    /// Remove the node at a path. Returns whether anything was removed.
    fn delete(&mut self, path: &str) -> bool;

    /// Presence-as-true flag check: a node at the path means enabled.
    fn path_enabled(&self, path: &str) -> bool;

    /// Commit the document with a change-log description.
    fn write(&mut self, description: &str) -> Result<(), StoreError>;

    /// Mark a subsystem's running configuration stale.
    fn mark_dirty(&mut self, subsystem: &str);

    /// Clear a subsystem's stale marker.
    fn clear_dirty(&mut self, subsystem: &str);

    /// Whether a subsystem is currently marked stale.
    fn is_dirty(&self, subsystem: &str) -> bool;

    /// Text at a path, falling back to a default when absent.
    fn get_or<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.get(path).unwrap_or(default)
    }
}

/// In-memory configuration document with optional file backing.
///
/// Dirty-subsystem marks and the change log live outside the document so a
/// failed downstream apply naturally leaves the mark in place for the next
/// pass.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: ConfNode,
    dirty: BTreeSet<String>,
    revisions: Vec<String>,
    backing: Option<PathBuf>,
}

impl DocumentStore {
    /// Wrap an already-parsed document.
    pub fn new(root: ConfNode) -> Self {
        Self {
            root,
            dirty: BTreeSet::new(),
            revisions: Vec::new(),
            backing: None,
        }
    }

    /// Load a document from a file; commits write back to the same file.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let root = parse_file(path)?;
        Ok(Self::new(root).with_backing(path))
    }

    /// Direct commits to the given file instead of the load path.
    pub fn with_backing(mut self, path: &Path) -> Self {
        self.backing = Some(path.to_path_buf());
        self
    }

    /// Change-log descriptions recorded by [`ConfigStore::write`], oldest first.
    pub fn revisions(&self) -> &[String] {
        &self.revisions
    }

    /// Subsystems currently marked stale, in sorted order.
    pub fn dirty_subsystems(&self) -> Vec<&str> {
        self.dirty.iter().map(String::as_str).collect()
    }
}

impl ConfigStore for DocumentStore {
    fn root(&self) -> &ConfNode {
        &self.root
    }

    fn get(&self, path: &str) -> Option<&str> {
        self.root.get_path_text(path)
    }

    fn node(&self, path: &str) -> Option<&ConfNode> {
        self.root.get_path(path)
    }

    fn set(&mut self, path: &str, value: &str) -> bool {
        self.root.set_path(path, value)
    }

    fn set_node(&mut self, path: &str, node: ConfNode) -> bool {
        self.root.set_path_node(path, node)
    }

    fn delete(&mut self, path: &str) -> bool {
        self.root.delete_path(path)
    }

    fn path_enabled(&self, path: &str) -> bool {
        self.root.path_present(path)
    }

    fn write(&mut self, description: &str) -> Result<(), StoreError> {
        self.root.set_path("revision/description", description);
        if let Some(path) = &self.backing {
            write_file(&self.root, path)?;
        }
        self.revisions.push(description.to_string());
        Ok(())
    }

    fn mark_dirty(&mut self, subsystem: &str) {
        self.dirty.insert(subsystem.to_string());
    }

    fn clear_dirty(&mut self, subsystem: &str) {
        self.dirty.remove(subsystem);
    }

    fn is_dirty(&self, subsystem: &str) -> bool {
        self.dirty.contains(subsystem)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigStore, DocumentStore};
    use crate::parse;

    fn store(xml: &[u8]) -> DocumentStore {
        DocumentStore::new(parse(xml).expect("parse"))
    }

    #[test]
    fn path_enabled_is_presence_based() {
        let store = store(b"<conf><unbound><enable/></unbound></conf>");
        assert!(store.path_enabled("unbound/enable"));
        assert!(!store.path_enabled("unbound/regdhcpstatic"));
        assert!(!store.path_enabled("dnsmasq/enable"));
    }

    #[test]
    fn dirty_marks_survive_until_cleared() {
        let mut store = store(b"<conf/>");
        store.mark_dirty("dhcpd");
        store.mark_dirty("hosts");
        assert!(store.is_dirty("dhcpd"));
        assert_eq!(store.dirty_subsystems(), vec!["dhcpd", "hosts"]);
        store.clear_dirty("dhcpd");
        assert!(!store.is_dirty("dhcpd"));
        assert!(store.is_dirty("hosts"));
    }

    #[test]
    fn write_records_revision_description() {
        let mut store = store(b"<conf/>");
        store.set("kea/dhcp4/ha/enable", "");
        store.write("dhcp4 settings reconciled").expect("write");
        assert_eq!(store.revisions(), ["dhcp4 settings reconciled"]);
        assert_eq!(
            store.get("revision/description"),
            Some("dhcp4 settings reconciled")
        );
    }

    #[test]
    fn write_persists_to_backing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.xml");
        std::fs::write(&path, b"<conf><system><hostname>edge</hostname></system></conf>")
            .expect("seed");

        let mut store = DocumentStore::load(&path).expect("load");
        store.set("system/hostname", "edge2");
        store.write("rename host").expect("write");

        let reread = DocumentStore::load(&path).expect("reload");
        assert_eq!(reread.get("system/hostname"), Some("edge2"));
    }
}
