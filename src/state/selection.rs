// Selection state - cursor position and multi-selection tracking
use crate::entry::{Entry, EntryId};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    /// Selected ids in listing order.
    pub selected: Vec<EntryId>,
    pub cursor: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.selected.contains(id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Select `ids` among `entries`. Ids not present in the listing are
    /// ignored. The cursor follows the first selected row.
    pub fn select(&mut self, entries: &[Entry], ids: &[EntryId]) {
        self.selected = entries
            .iter()
            .filter(|entry| ids.contains(&entry.id))
            .map(|entry| entry.id.clone())
            .collect();
        self.cursor = entries.iter().position(|entry| ids.contains(&entry.id));
    }

    pub fn select_index(&mut self, entries: &[Entry], index: usize) {
        match entries.get(index) {
            Some(entry) => {
                self.selected = vec![entry.id.clone()];
                self.cursor = Some(index);
            }
            None => {
                self.selected.clear();
                self.cursor = None;
            }
        }
    }

    pub fn toggle(&mut self, entries: &[Entry], id: &EntryId) {
        if self.contains(id) {
            self.selected.retain(|selected| selected != id);
        } else {
            let mut ids = self.selected.clone();
            ids.push(id.clone());
            let cursor = self.cursor;
            self.select(entries, &ids);
            self.cursor = cursor.or(self.cursor);
        }
    }

    /// Keep only the ids that survived a reload. When nothing survives the
    /// selection stays empty and the cursor keeps its row, clamped to the
    /// new listing.
    pub fn reconcile(&mut self, entries: &[Entry]) {
        let previous_cursor = self.cursor;
        let ids = std::mem::take(&mut self.selected);
        self.select(entries, &ids);

        if self.selected.is_empty() {
            self.cursor = previous_cursor
                .filter(|_| !entries.is_empty())
                .map(|index| index.min(entries.len() - 1));
        }
    }

    pub fn step(&mut self, entries: &[Entry], delta: isize) {
        if entries.is_empty() {
            return;
        }
        let next = match self.cursor {
            Some(current) => {
                let next = current as isize + delta;
                next.clamp(0, entries.len() as isize - 1) as usize
            }
            None => 0,
        };
        self.select_index(entries, next);
    }
}
