use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// A node in a hierarchical configuration document.
///
/// Documents are element trees in the style of an appliance `config.xml`:
/// each node has a tag, optional attributes, ordered children, and optional
/// text content. Boolean flags are conventionally encoded as bare elements
/// (presence means true), which is why [`ConfNode::path_present`] exists as
/// a first-class operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfNode {
    /// Element tag name.
    pub tag: String,
    /// Attributes keyed by name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements, in document order.
    pub children: Vec<ConfNode>,
    /// Optional text content.
    pub text: Option<String>,
}

impl ConfNode {
    /// Create an empty node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a node with the given tag and text content.
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.text = Some(text.into());
        node
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&ConfNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return the first child with the provided tag, mutably.
    pub fn get_child_mut(&mut self, tag: &str) -> Option<&mut ConfNode> {
        self.children.iter_mut().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag, in document order.
    pub fn get_children(&self, tag: &str) -> Vec<&ConfNode> {
        self.children
            .iter()
            .filter(|child| child.tag == tag)
            .collect()
    }

    /// Get or create a child with the provided tag, returning it mutably.
    pub fn ensure_child(&mut self, tag: &str) -> &mut ConfNode {
        if let Some(pos) = self.children.iter().position(|c| c.tag == tag) {
            return &mut self.children[pos];
        }
        self.children.push(ConfNode::new(tag));
        let len = self.children.len();
        &mut self.children[len - 1]
    }

    /// Append a text-only child element.
    pub fn push_text_child(&mut self, tag: &str, value: &str) {
        self.children.push(ConfNode::with_text(tag, value));
    }

    /// Set the text of a child, creating the child if missing.
    pub fn set_text_child(&mut self, tag: &str, value: &str) {
        self.ensure_child(tag).text = Some(value.to_string());
    }

    /// Resolve a slash-separated path to a node.
    ///
    /// Each segment selects the first child with that tag. A tag segment
    /// followed by an all-digit segment selects the nth child with that tag,
    /// which is how repeated sections (package config lists, zones) are
    /// addressed; a bare all-digit segment indexes all children.
    pub fn get_path(&self, path: &str) -> Option<&ConfNode> {
        let segments: Vec<&str> = split_path(path).collect();
        let mut current = self;
        let mut i = 0;
        while i < segments.len() {
            let segment = segments[i];
            if let Some(idx) = parse_index(segment) {
                current = current.children.get(idx)?;
                i += 1;
                continue;
            }
            if let Some(idx) = segments.get(i + 1).and_then(|s| parse_index(s)) {
                current = current
                    .children
                    .iter()
                    .filter(|c| c.tag == segment)
                    .nth(idx)?;
                i += 2;
                continue;
            }
            current = current.get_child(segment)?;
            i += 1;
        }
        Some(current)
    }

    /// Resolve a path and return the node's trimmed text, if any.
    pub fn get_path_text(&self, path: &str) -> Option<&str> {
        self.get_path(path)
            .and_then(|node| node.text.as_deref())
            .map(str::trim)
    }

    /// True when a node exists at the path (presence-as-true flag check).
    pub fn path_present(&self, path: &str) -> bool {
        self.get_path(path).is_some()
    }

    /// Set text at a path, creating intermediate tag-named children.
    ///
    /// All-digit segments only select existing repeated children; if one is
    /// missing nothing is written and `false` is returned.
    pub fn set_path(&mut self, path: &str, value: &str) -> bool {
        let Some(node) = self.make_path(path) else {
            return false;
        };
        node.text = Some(value.to_string());
        true
    }

    /// Replace the subtree at a path with the provided node.
    ///
    /// The replacement keeps the final path segment as its tag. Intermediate
    /// tag-named children are created as needed.
    pub fn set_path_node(&mut self, path: &str, mut replacement: ConfNode) -> bool {
        let Some(target) = self.make_path(path) else {
            return false;
        };
        replacement.tag = target.tag.clone();
        *target = replacement;
        true
    }

    /// Remove the node at a path. Returns whether anything was removed.
    ///
    /// A trailing tag segment removes every child with that tag; a trailing
    /// tag-plus-index pair removes only the selected repetition.
    pub fn delete_path(&mut self, path: &str) -> bool {
        let segments: Vec<&str> = split_path(path).collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        if let Some(idx) = parse_index(last) {
            // Trailing index: pair it with the preceding tag when present.
            let (tag, rest) = match parents.split_last() {
                Some((tag, rest)) if parse_index(tag).is_none() => (Some(*tag), rest),
                _ => (None, parents),
            };
            let Some(parent) = self.make_path_inner(rest, false) else {
                return false;
            };
            let pos = parent
                .children
                .iter()
                .enumerate()
                .filter(|(_, c)| tag.map_or(true, |t| c.tag == t))
                .nth(idx)
                .map(|(pos, _)| pos);
            return match pos {
                Some(pos) => {
                    parent.children.remove(pos);
                    true
                }
                None => false,
            };
        }

        let Some(parent) = self.make_path_inner(parents, false) else {
            return false;
        };
        let before = parent.children.len();
        parent.children.retain(|c| c.tag != *last);
        parent.children.len() != before
    }

    fn make_path(&mut self, path: &str) -> Option<&mut ConfNode> {
        let segments: Vec<&str> = split_path(path).collect();
        self.make_path_inner(&segments, true)
    }

    /// Walk segments mutably, creating missing tag-named children only when
    /// `create` is set. Indexed selections never create.
    fn make_path_inner(&mut self, segments: &[&str], create: bool) -> Option<&mut ConfNode> {
        let mut current = self;
        let mut i = 0;
        while i < segments.len() {
            let segment = segments[i];
            if let Some(idx) = parse_index(segment) {
                current = current.children.get_mut(idx)?;
                i += 1;
                continue;
            }
            if let Some(idx) = segments.get(i + 1).and_then(|s| parse_index(s)) {
                current = current
                    .children
                    .iter_mut()
                    .filter(|c| c.tag == segment)
                    .nth(idx)?;
                i += 2;
                continue;
            }
            if !create && current.get_child(segment).is_none() {
                return None;
            }
            current = current.ensure_child(segment);
            i += 1;
        }
        Some(current)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn parse_index(segment: &str) -> Option<usize> {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}

impl Display for ConfNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return write!(f, "/>");
        }

        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}
