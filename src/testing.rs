// Test collaborators - a scripted host and a store that counts mutations
use crate::entry::{Destination, Entry, EntryChanges, EntryId, NewEntry, TreeNode};
use crate::io::memory::MemoryStore;
use crate::io::store::{BookmarkStore, StoreResult};
use crate::model::{Host, OpenTarget};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Script {
    confirms: VecDeque<bool>,
    answers: VecDeque<Option<String>>,
    notices: Vec<String>,
    prompts: Vec<String>,
    clipboard: Option<String>,
    downloads: Vec<(String, String)>,
    opened: Vec<(String, OpenTarget)>,
}

/// Host whose prompts answer from queues. Unscripted confirmations say
/// yes and unscripted questions are cancelled.
#[derive(Default)]
pub struct ScriptedHost {
    script: Mutex<Script>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm_with(&self, answer: bool) -> &Self {
        self.script.lock().confirms.push_back(answer);
        self
    }

    pub fn answer(&self, text: &str) -> &Self {
        self.script.lock().answers.push_back(Some(text.to_string()));
        self
    }

    pub fn cancel(&self) -> &Self {
        self.script.lock().answers.push_back(None);
        self
    }

    pub fn set_clipboard(&self, text: &str) {
        self.script.lock().clipboard = Some(text.to_string());
    }

    pub fn notices(&self) -> Vec<String> {
        self.script.lock().notices.clone()
    }

    /// Messages of every confirm and title of every question, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.script.lock().prompts.clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.script.lock().clipboard.clone()
    }

    pub fn downloads(&self) -> Vec<(String, String)> {
        self.script.lock().downloads.clone()
    }

    pub fn opened(&self) -> Vec<(String, OpenTarget)> {
        self.script.lock().opened.clone()
    }
}

#[async_trait]
impl Host for ScriptedHost {
    async fn confirm(&self, message: &str) -> bool {
        let mut script = self.script.lock();
        script.prompts.push(message.to_string());
        script.confirms.pop_front().unwrap_or(true)
    }

    async fn ask(&self, title: &str, _default: &str, _suggestions: &[&str]) -> Option<String> {
        let mut script = self.script.lock();
        script.prompts.push(title.to_string());
        script.answers.pop_front().flatten()
    }

    fn notify(&self, message: &str) {
        self.script.lock().notices.push(message.to_string());
    }

    async fn copy_to_clipboard(&self, text: String) {
        self.script.lock().clipboard = Some(text);
    }

    async fn read_clipboard(&self) -> Option<String> {
        self.script.lock().clipboard.clone()
    }

    async fn download(&self, contents: String, file_name: &str) -> std::io::Result<()> {
        self.script
            .lock()
            .downloads
            .push((file_name.to_string(), contents));
        Ok(())
    }

    async fn open_url(&self, url: &str, target: OpenTarget) {
        self.script.lock().opened.push((url.to_string(), target));
    }
}

/// Wraps a [`MemoryStore`] and counts the mutating calls made through it.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    moves: AtomicUsize,
    creates: AtomicUsize,
    removes: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn moves(&self) -> usize {
        self.moves.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookmarkStore for CountingStore {
    fn root_id(&self) -> EntryId {
        self.inner.root_id()
    }

    async fn get(&self, ids: &[EntryId]) -> StoreResult<Vec<Entry>> {
        self.inner.get(ids).await
    }

    async fn children(&self, id: &EntryId) -> StoreResult<Vec<Entry>> {
        self.inner.children(id).await
    }

    async fn search(&self, query: &str) -> StoreResult<Vec<Entry>> {
        self.inner.search(query).await
    }

    async fn tree(&self, id: &EntryId) -> StoreResult<TreeNode> {
        self.inner.tree(id).await
    }

    async fn create(&self, attrs: NewEntry) -> StoreResult<Entry> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(attrs).await
    }

    async fn update(&self, id: &EntryId, changes: EntryChanges) -> StoreResult<Entry> {
        self.inner.update(id, changes).await
    }

    async fn move_entry(&self, id: &EntryId, to: Destination) -> StoreResult<Entry> {
        self.moves.fetch_add(1, Ordering::SeqCst);
        self.inner.move_entry(id, to).await
    }

    async fn remove(&self, id: &EntryId, recursive: bool) -> StoreResult<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(id, recursive).await
    }
}
