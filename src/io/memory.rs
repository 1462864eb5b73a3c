// In-memory bookmark tree with optional JSON file persistence
use crate::entry::{Destination, Entry, EntryChanges, EntryId, EntryKind, NewEntry, TreeNode};
use crate::error::StoreError;
use crate::io::store::{BookmarkStore, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ROOT_ID: &str = "0";
pub const BOOKMARKS_BAR_ID: &str = "1";
pub const OTHER_BOOKMARKS_ID: &str = "2";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Node {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    parent: Option<EntryId>,
    #[serde(default)]
    children: Vec<EntryId>,
    date_added: DateTime<Utc>,
    #[serde(default)]
    readonly: bool,
}

impl Node {
    fn is_dir(&self) -> bool {
        self.url.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Arena {
    root: EntryId,
    next_id: u64,
    last_added: DateTime<Utc>,
    nodes: HashMap<EntryId, Node>,
}

impl Arena {
    fn new() -> Self {
        let now = Utc::now();
        let mut nodes = HashMap::new();
        let root = EntryId::from(ROOT_ID);
        nodes.insert(
            root.clone(),
            Node {
                title: String::new(),
                url: None,
                parent: None,
                children: vec![BOOKMARKS_BAR_ID.into(), OTHER_BOOKMARKS_ID.into()],
                date_added: now,
                readonly: true,
            },
        );
        for (id, title) in [(BOOKMARKS_BAR_ID, "Bookmarks bar"), (OTHER_BOOKMARKS_ID, "Other bookmarks")] {
            nodes.insert(
                id.into(),
                Node {
                    title: title.to_string(),
                    url: None,
                    parent: Some(root.clone()),
                    children: Vec::new(),
                    date_added: now,
                    readonly: true,
                },
            );
        }
        Self {
            root,
            next_id: 3,
            last_added: now,
            nodes,
        }
    }

    fn node(&self, id: &EntryId) -> StoreResult<&Node> {
        self.nodes.get(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn entry(&self, id: &EntryId) -> StoreResult<Entry> {
        let node = self.node(id)?;
        let index = match &node.parent {
            Some(parent) => self
                .node(parent)?
                .children
                .iter()
                .position(|child| child == id)
                .unwrap_or(0),
            None => 0,
        };
        Ok(Entry {
            id: id.clone(),
            title: node.title.clone(),
            kind: if node.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            url: node.url.clone(),
            parent_id: node.parent.clone(),
            index,
            readonly: node.readonly,
            date_added: node.date_added,
            opener_id: None,
        })
    }

    fn children(&self, id: &EntryId) -> StoreResult<Vec<Entry>> {
        let node = self.node(id)?;
        if !node.is_dir() {
            return Err(StoreError::NotADirectory(id.clone()));
        }
        node.children.iter().map(|child| self.entry(child)).collect()
    }

    fn tree(&self, id: &EntryId) -> StoreResult<TreeNode> {
        let entry = self.entry(id)?;
        let children = self
            .node(id)?
            .children
            .iter()
            .map(|child| self.tree(child))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(TreeNode { entry, children })
    }

    fn search(&self, query: &str) -> StoreResult<Vec<Entry>> {
        let needle = query.to_lowercase();
        let mut found = Vec::new();
        let mut stack = vec![self.root.clone()];
        while let Some(id) = stack.pop() {
            let node = self.node(&id)?;
            if id != self.root {
                let in_title = node.title.to_lowercase().contains(&needle);
                let in_url = node
                    .url
                    .as_ref()
                    .map(|url| url.to_lowercase().contains(&needle))
                    .unwrap_or(false);
                if in_title || in_url {
                    found.push(self.entry(&id)?);
                }
            }
            stack.extend(node.children.iter().rev().cloned());
        }
        Ok(found)
    }

    fn next_date(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        // Keep creation order observable even within one clock tick.
        let date = if now > self.last_added {
            now
        } else {
            self.last_added + Duration::milliseconds(1)
        };
        self.last_added = date;
        date
    }

    fn writable_directory(&self, id: &EntryId) -> StoreResult<&Node> {
        let node = self.node(id)?;
        if !node.is_dir() {
            return Err(StoreError::NotADirectory(id.clone()));
        }
        if *id == self.root {
            return Err(StoreError::ReadOnly(id.clone()));
        }
        Ok(node)
    }

    fn create(&mut self, attrs: NewEntry) -> StoreResult<Entry> {
        let parent_len = self.writable_directory(&attrs.parent_id)?.children.len();
        if let Some(url) = &attrs.url {
            if url.trim().is_empty() {
                return Err(StoreError::Invalid("a bookmark needs a URL".to_string()));
            }
        }

        let id = EntryId::new(self.next_id.to_string());
        self.next_id += 1;
        let date_added = self.next_date();
        let position = attrs.index.unwrap_or(parent_len).min(parent_len);

        self.nodes.insert(
            id.clone(),
            Node {
                title: attrs.title,
                url: attrs.url,
                parent: Some(attrs.parent_id.clone()),
                children: Vec::new(),
                date_added,
                readonly: false,
            },
        );
        if let Some(parent) = self.nodes.get_mut(&attrs.parent_id) {
            parent.children.insert(position, id.clone());
        }
        self.entry(&id)
    }

    fn update(&mut self, id: &EntryId, changes: EntryChanges) -> StoreResult<Entry> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if node.readonly {
            return Err(StoreError::ReadOnly(id.clone()));
        }
        if let Some(url) = changes.url {
            if node.is_dir() {
                return Err(StoreError::Invalid("a directory has no URL".to_string()));
            }
            if url.trim().is_empty() {
                return Err(StoreError::Invalid("a bookmark needs a URL".to_string()));
            }
            node.url = Some(url);
        }
        if let Some(title) = changes.title {
            node.title = title;
        }
        self.entry(id)
    }

    fn is_ancestor(&self, candidate: &EntryId, of: &EntryId) -> bool {
        let mut cursor = Some(of.clone());
        while let Some(id) = cursor {
            if id == *candidate {
                return true;
            }
            cursor = self.nodes.get(&id).and_then(|node| node.parent.clone());
        }
        false
    }

    fn move_entry(&mut self, id: &EntryId, to: Destination) -> StoreResult<Entry> {
        let node = self.node(id)?;
        if node.readonly {
            return Err(StoreError::ReadOnly(id.clone()));
        }
        let old_parent = node.parent.clone();
        self.writable_directory(&to.parent_id)?;
        if self.is_ancestor(id, &to.parent_id) {
            return Err(StoreError::InvalidMove {
                id: id.clone(),
                parent_id: to.parent_id,
            });
        }

        if let Some(parent) = old_parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent.children.retain(|child| child != id);
        }
        if let Some(parent) = self.nodes.get_mut(&to.parent_id) {
            let len = parent.children.len();
            let position = to.index.unwrap_or(len).min(len);
            parent.children.insert(position, id.clone());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(to.parent_id);
        }
        self.entry(id)
    }

    fn remove(&mut self, id: &EntryId, recursive: bool) -> StoreResult<()> {
        let node = self.node(id)?;
        if node.readonly {
            return Err(StoreError::ReadOnly(id.clone()));
        }
        if !node.children.is_empty() && !recursive {
            return Err(StoreError::NotEmpty(id.clone()));
        }
        if let Some(parent) = node.parent.clone().and_then(|parent| self.nodes.get_mut(&parent)) {
            parent.children.retain(|child| child != id);
        }

        let mut doomed = vec![id.clone()];
        while let Some(next) = doomed.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                doomed.extend(node.children);
            }
        }
        Ok(())
    }
}

/// Bookmark store kept in memory and mirrored to a JSON file when one is
/// configured.
pub struct MemoryStore {
    arena: Mutex<Arena>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            arena: Mutex::new(Arena::new()),
            path: None,
        }
    }

    /// Load the store from `path`, starting empty when the file is missing.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let arena = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str(&contents)?
        } else {
            Arena::new()
        };
        log::debug!("Opened bookmark store at {}", path.display());
        Ok(Self {
            arena: Mutex::new(arena),
            path: Some(path.to_path_buf()),
        })
    }

    /// Synchronous create, for seeding.
    pub fn insert(&self, attrs: NewEntry) -> StoreResult<Entry> {
        self.arena.lock().create(attrs)
    }

    pub fn len(&self) -> usize {
        // Root is not an entry.
        self.arena.lock().nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn persist(&self) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = {
            let arena = self.arena.lock();
            serde_json::to_string_pretty(&*arena)?
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    fn root_id(&self) -> EntryId {
        self.arena.lock().root.clone()
    }

    async fn get(&self, ids: &[EntryId]) -> StoreResult<Vec<Entry>> {
        let arena = self.arena.lock();
        ids.iter().map(|id| arena.entry(id)).collect()
    }

    async fn children(&self, id: &EntryId) -> StoreResult<Vec<Entry>> {
        self.arena.lock().children(id)
    }

    async fn search(&self, query: &str) -> StoreResult<Vec<Entry>> {
        self.arena.lock().search(query)
    }

    async fn tree(&self, id: &EntryId) -> StoreResult<TreeNode> {
        self.arena.lock().tree(id)
    }

    async fn create(&self, attrs: NewEntry) -> StoreResult<Entry> {
        log::debug!("create {:?} under {}", attrs.title, attrs.parent_id);
        let entry = self.arena.lock().create(attrs)?;
        self.persist().await?;
        Ok(entry)
    }

    async fn update(&self, id: &EntryId, changes: EntryChanges) -> StoreResult<Entry> {
        log::debug!("update {}", id);
        let entry = self.arena.lock().update(id, changes)?;
        self.persist().await?;
        Ok(entry)
    }

    async fn move_entry(&self, id: &EntryId, to: Destination) -> StoreResult<Entry> {
        log::debug!("move {} to {} at {:?}", id, to.parent_id, to.index);
        let entry = self.arena.lock().move_entry(id, to)?;
        self.persist().await?;
        Ok(entry)
    }

    async fn remove(&self, id: &EntryId, recursive: bool) -> StoreResult<()> {
        log::debug!("remove {} (recursive: {})", id, recursive);
        self.arena.lock().remove(id, recursive)?;
        self.persist().await
    }
}
