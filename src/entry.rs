use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque store identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub kind: EntryKind,
    /// Set for files only.
    pub url: Option<String>,
    pub parent_id: Option<EntryId>,
    pub index: usize,
    pub readonly: bool,
    pub date_added: DateTime<Utc>,
    /// Directory this row leads back to. Only the synthetic parent link of a
    /// pane carries one.
    pub opener_id: Option<EntryId>,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn display_name(&self) -> String {
        match self.kind {
            EntryKind::Directory => format!("{}/", self.title),
            EntryKind::File => self.title.clone(),
        }
    }
}

/// A node together with its whole subtree, as returned by `tree()`.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub entry: Entry,
    pub children: Vec<TreeNode>,
}

/// Attributes for a new entry. A missing url makes a directory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewEntry {
    pub parent_id: EntryId,
    pub title: String,
    pub url: Option<String>,
    pub index: Option<usize>,
}

impl NewEntry {
    pub fn directory(parent_id: EntryId, title: impl Into<String>) -> Self {
        Self {
            parent_id,
            title: title.into(),
            url: None,
            index: None,
        }
    }

    pub fn file(parent_id: EntryId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            parent_id,
            title: title.into(),
            url: Some(url.into()),
            index: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryChanges {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Target of a move. Without an index the entry is appended.
#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    pub parent_id: EntryId,
    pub index: Option<usize>,
}

impl Destination {
    pub fn inside(parent_id: EntryId) -> Self {
        Self {
            parent_id,
            index: None,
        }
    }

    pub fn at(parent_id: EntryId, index: usize) -> Self {
        Self {
            parent_id,
            index: Some(index),
        }
    }
}
