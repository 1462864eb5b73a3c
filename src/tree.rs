//! Export of store subtrees to a plain JSON tree and import back.

use crate::entry::{EntryId, EntryKind, NewEntry, TreeNode};
use crate::error::{CommandError, Result};
use crate::io::store::BookmarkStore;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// One node of the exchanged JSON tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ExportNode>>,
}

impl ExportNode {
    pub fn project(node: &TreeNode) -> Self {
        match node.entry.kind {
            EntryKind::File => Self {
                title: node.entry.title.clone(),
                kind: EntryKind::File,
                url: node.entry.url.clone(),
                children: None,
            },
            EntryKind::Directory => Self {
                title: node.entry.title.clone(),
                kind: EntryKind::Directory,
                url: None,
                children: Some(node.children.iter().map(ExportNode::project).collect()),
            },
        }
    }
}

/// Fetch and project the subtree of every id, in order.
pub async fn export<S: BookmarkStore + ?Sized>(store: &S, ids: &[EntryId]) -> Result<Vec<ExportNode>> {
    let mut items = Vec::with_capacity(ids.len());
    for id in ids {
        let tree = store.tree(id).await?;
        items.push(ExportNode::project(&tree));
    }
    Ok(items)
}

/// Two-space indented JSON.
pub fn to_json(items: &[ExportNode]) -> String {
    serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
}

/// Import input is checked node by node while creating, so every field is
/// optional here.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImportNode {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<ImportNode>>,
}

/// Parse import text. The top level must be a JSON array.
pub fn parse_import(text: &str) -> Result<Vec<ImportNode>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|err| CommandError::MalformedImport(format!("Invalid JSON: {}", err)))?;
    if !value.is_array() {
        return Err(CommandError::MalformedImport(
            "This is not a valid JSON array".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|err| CommandError::MalformedImport(format!("Invalid tree: {}", err)))
}

/// Create `nodes` under `parent`, depth first with child order kept.
///
/// With `after`, top-level nodes are inserted right after that sibling
/// index; otherwise they are appended. A node without a title, or a file
/// without a URL, stops the import before anything else is created.
/// Entries created before the failure stay. Returns the ids of the created
/// top-level entries.
pub async fn import<S: BookmarkStore + ?Sized>(
    store: &S,
    nodes: &[ImportNode],
    parent: &EntryId,
    after: Option<usize>,
) -> Result<Vec<EntryId>> {
    let mut created = Vec::with_capacity(nodes.len());
    for (n, node) in nodes.iter().enumerate() {
        let index = after.map(|index| index + 1 + n);
        created.push(import_node(store, node, parent.clone(), index).await?);
    }
    Ok(created)
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

fn import_node<'a, S: BookmarkStore + ?Sized>(
    store: &'a S,
    node: &'a ImportNode,
    parent_id: EntryId,
    index: Option<usize>,
) -> BoxFuture<'a, Result<EntryId>> {
    Box::pin(async move {
        let title = match node.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => return Err(CommandError::MalformedImport("Bookmark needs title".to_string())),
        };
        let is_file = match node.kind.as_deref() {
            Some("FILE") => true,
            Some("DIRECTORY") => false,
            // untyped nodes are told apart by their url
            _ => node.url.is_some(),
        };
        let url = if is_file {
            match node.url.as_deref() {
                Some(url) if !url.is_empty() => Some(url.to_string()),
                _ => return Err(CommandError::MalformedImport("Bookmark needs URL".to_string())),
            }
        } else {
            None
        };

        let entry = store
            .create(NewEntry {
                parent_id,
                title,
                url,
                index,
            })
            .await?;

        if !is_file {
            for child in node.children.iter().flatten() {
                import_node(store, child, entry.id.clone(), None).await?;
            }
        }
        Ok(entry.id)
    })
}
