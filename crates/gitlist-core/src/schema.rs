//! Explorer items: the schema tree a driver hands to its host.
//!
//! The tree is pure data. Hosts use it to populate a browser pane and
//! to offer auto-complete; nothing in it depends on live repository
//! contents.

use serde::Serialize;
use std::fmt::Write;

/// What an explorer item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExplorerItemKind {
    /// A top-level queryable collection
    QueryableObject,
    /// A scalar property
    Property,
    /// Navigation to a collection of related records
    CollectionLink,
    /// Navigation to a single related record
    ReferenceLink,
    /// An action that can be invoked on a record
    Command,
}

/// Icon hint for the host's browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExplorerIcon {
    Table,
    Column,
    OneToMany,
    ManyToOne,
    Box,
}

impl ExplorerIcon {
    fn glyph(self) -> char {
        match self {
            ExplorerIcon::Table => '▦',
            ExplorerIcon::Column => '·',
            ExplorerIcon::OneToMany => '⇉',
            ExplorerIcon::ManyToOne => '→',
            ExplorerIcon::Box => '▪',
        }
    }
}

/// A node in the schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplorerItem {
    pub text: String,
    pub kind: ExplorerItemKind,
    pub icon: ExplorerIcon,
    pub is_enumerable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_tip_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExplorerItem>,
}

impl ExplorerItem {
    pub fn new(text: impl Into<String>, kind: ExplorerItemKind, icon: ExplorerIcon) -> Self {
        ExplorerItem {
            text: text.into(),
            kind,
            icon,
            is_enumerable: false,
            tool_tip_text: None,
            drag_text: None,
            children: Vec::new(),
        }
    }

    /// Enumerable top-level collection; drag text defaults to the name.
    pub fn collection(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut item = Self::new(
            text.clone(),
            ExplorerItemKind::QueryableObject,
            ExplorerIcon::Table,
        );
        item.is_enumerable = true;
        item.drag_text = Some(text);
        item
    }

    /// Top-level scalar property; drag text defaults to the name.
    pub fn property(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut item = Self::new(text.clone(), ExplorerItemKind::Property, ExplorerIcon::Column);
        item.drag_text = Some(text);
        item
    }

    /// Column of a collection.
    pub fn column(text: impl Into<String>) -> Self {
        Self::new(text, ExplorerItemKind::Property, ExplorerIcon::Column)
    }

    pub fn collection_link(text: impl Into<String>) -> Self {
        Self::new(text, ExplorerItemKind::CollectionLink, ExplorerIcon::OneToMany)
    }

    pub fn reference(text: impl Into<String>) -> Self {
        Self::new(text, ExplorerItemKind::ReferenceLink, ExplorerIcon::ManyToOne)
    }

    pub fn command(text: impl Into<String>) -> Self {
        Self::new(text, ExplorerItemKind::Command, ExplorerIcon::Box)
    }

    /// A single leaf carrying an error message in place of a schema.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::new(
            format!("Error: {message}"),
            ExplorerItemKind::Property,
            ExplorerIcon::Box,
        )
    }

    #[must_use]
    pub fn with_tooltip(mut self, text: impl Into<String>) -> Self {
        self.tool_tip_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ExplorerItem>) -> Self {
        self.children = children;
        self
    }

    /// Find a direct child by its text.
    pub fn child(&self, text: &str) -> Option<&ExplorerItem> {
        self.children.iter().find(|c| c.text == text)
    }
}

/// Render a schema tree as indented text, one item per line.
pub fn render_tree(items: &[ExplorerItem]) -> String {
    let mut out = String::new();
    for item in items {
        render_item(&mut out, item, 0);
    }
    out
}

fn render_item(out: &mut String, item: &ExplorerItem, depth: usize) {
    let _ = write!(
        out,
        "{:indent$}{} {}",
        "",
        item.icon.glyph(),
        item.text,
        indent = depth * 2
    );
    if let Some(tip) = &item.tool_tip_text {
        let _ = write!(out, "  ({tip})");
    }
    out.push('\n');
    for child in &item.children {
        render_item(out, child, depth + 1);
    }
}
