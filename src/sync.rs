//! Two-pane reconciliation of bookmark files keyed by (title, url).

use crate::entry::{Entry, EntryId, NewEntry};
use crate::io::store::BookmarkStore;
use crate::model::Host;
use indexmap::IndexSet;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SyncKey {
    pub title: String,
    pub url: String,
}

impl SyncKey {
    fn of(entry: &Entry) -> Option<Self> {
        entry.url.as_ref().map(|url| Self {
            title: entry.title.clone(),
            url: url.clone(),
        })
    }
}

fn keys(files: &[Entry]) -> IndexSet<SyncKey> {
    files.iter().filter(|e| e.is_file()).filter_map(SyncKey::of).collect()
}

/// Deduplicated union of both sides, left side first, first-seen order.
pub fn union(left: &[Entry], right: &[Entry]) -> IndexSet<SyncKey> {
    let mut combined = keys(left);
    combined.extend(keys(right));
    combined
}

/// Keys of the union a pane is missing.
pub fn missing(union: &IndexSet<SyncKey>, own: &[Entry]) -> Vec<SyncKey> {
    let own = keys(own);
    union.iter().filter(|key| !own.contains(*key)).cloned().collect()
}

/// Create each missing key under `parent`, one awaited call at a time.
/// Failures are reported and skipped. Returns the ids that were created.
pub async fn fill<S, H>(store: &S, host: &H, parent: &EntryId, missing: &[SyncKey]) -> Vec<EntryId>
where
    S: BookmarkStore + ?Sized,
    H: Host + ?Sized,
{
    let mut created = Vec::new();
    for key in missing {
        let attrs = NewEntry::file(parent.clone(), key.title.clone(), key.url.clone());
        match store.create(attrs).await {
            Ok(entry) => created.push(entry.id),
            Err(err) => {
                log::warn!("sync: creating {:?} failed: {}", key.title, err);
                host.notify(&err.to_string());
            }
        }
    }
    created
}
