use crate::entry::{Destination, Entry, EntryChanges, EntryId, NewEntry, TreeNode};
use crate::error::StoreError;
use async_trait::async_trait;

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD over the external bookmark tree.
///
/// Every call is a round trip that may fail. Callers inside a batch await
/// each call before issuing the next one, because a move or create shifts
/// the indices of the remaining siblings.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Id of the pseudo-root whose children are the top-level directories.
    fn root_id(&self) -> EntryId;

    async fn get(&self, ids: &[EntryId]) -> StoreResult<Vec<Entry>>;

    /// Direct children of a directory in sibling order.
    async fn children(&self, id: &EntryId) -> StoreResult<Vec<Entry>>;

    async fn search(&self, query: &str) -> StoreResult<Vec<Entry>>;

    async fn tree(&self, id: &EntryId) -> StoreResult<TreeNode>;

    async fn create(&self, attrs: NewEntry) -> StoreResult<Entry>;

    async fn update(&self, id: &EntryId, changes: EntryChanges) -> StoreResult<Entry>;

    /// After the call the entry sits at `min(index, siblings)` of its new
    /// parent, or last when no index is given.
    async fn move_entry(&self, id: &EntryId, to: Destination) -> StoreResult<Entry>;

    /// Removing a non-empty directory without `recursive` fails with
    /// [`StoreError::NotEmpty`].
    async fn remove(&self, id: &EntryId, recursive: bool) -> StoreResult<()>;
}
