// Sort options and the re-indexing protocol for a directory listing
use crate::entry::{Destination, Entry, EntryId};
use crate::io::store::BookmarkStore;
use crate::model::Host;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortBy {
    Name,
    Link,
    Date,
}

impl SortBy {
    fn compare(self, a: &Entry, b: &Entry) -> Ordering {
        match self {
            SortBy::Name => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortBy::Link => {
                let a = a.url.as_deref().unwrap_or_default().to_lowercase();
                let b = b.url.as_deref().unwrap_or_default().to_lowercase();
                a.cmp(&b)
            }
            SortBy::Date => a.date_added.cmp(&b.date_added),
        }
    }
}

/// Choices offered by the sort prompt.
pub const SORT_SUGGESTIONS: [&str; 15] = [
    "name",
    "name, link",
    "name, link, date",
    "name, date",
    "name, date, link",
    "link",
    "link, name",
    "link, name, date",
    "link, date",
    "link, date, name",
    "date",
    "date, name",
    "date, name, link",
    "date, link",
    "date, link, name",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOptions {
    /// Keys in priority order; later keys only break ties.
    pub keys: Vec<SortBy>,
    /// Reverses the whole ordering, not each key.
    pub reverse: bool,
}

impl SortOptions {
    /// Parse a rule list such as `"name, link"`. Unknown tokens are dropped;
    /// `None` when nothing usable is left.
    pub fn parse(rules: &str, reverse: bool) -> Option<Self> {
        let keys: Vec<SortBy> = rules
            .split(',')
            .filter_map(|token| match token.trim() {
                "name" => Some(SortBy::Name),
                "link" => Some(SortBy::Link),
                "date" => Some(SortBy::Date),
                _ => None,
            })
            .collect();
        if keys.is_empty() {
            None
        } else {
            Some(Self { keys, reverse })
        }
    }

    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        let ordering = self
            .keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal);
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Stable sort of `entries`.
    pub fn sort(&self, entries: &mut [Entry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }

    /// Target order for a listing: writable directories first, then
    /// writable files, each block sorted on its own.
    pub fn plan(&self, entries: &[Entry]) -> Vec<EntryId> {
        let writable = entries.iter().filter(|entry| !entry.readonly);
        let mut directories: Vec<Entry> = writable.clone().filter(|e| e.is_dir()).cloned().collect();
        let mut files: Vec<Entry> = writable.filter(|e| e.is_file()).cloned().collect();
        self.sort(&mut directories);
        self.sort(&mut files);
        directories
            .into_iter()
            .chain(files)
            .map(|entry| entry.id)
            .collect()
    }
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            keys: vec![SortBy::Name],
            reverse: false,
        }
    }
}

/// Move every id of `order` to its position under `parent`, one awaited
/// move at a time. The running index only advances on success, so a
/// failed move does not leave a gap. Returns the number of moved entries.
pub async fn apply_order<S, H>(store: &S, host: &H, parent: &EntryId, order: &[EntryId]) -> usize
where
    S: BookmarkStore + ?Sized,
    H: Host + ?Sized,
{
    let mut index = 0;
    for id in order {
        match store.move_entry(id, Destination::at(parent.clone(), index)).await {
            Ok(_) => index += 1,
            Err(err) => {
                log::warn!("sort: moving {} failed: {}", id, err);
                host.notify(&err.to_string());
            }
        }
    }
    index
}
