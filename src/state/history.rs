// Persisted navigation state and the debounced history of it
use crate::entry::EntryId;
use crate::message::Side;
use crate::state::navigation::Location;
use crate::state::pane::PaneState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

const SEARCH_PREFIX: &str = "search:";

/// What is remembered across sessions and in history entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedNavigation {
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub left_selected_ids: Vec<EntryId>,
    #[serde(default)]
    pub right: String,
    #[serde(default)]
    pub right_selected_ids: Vec<EntryId>,
    #[serde(default)]
    pub active: Side,
}

pub fn encode_location(location: &Location) -> String {
    match location {
        Location::Root => String::new(),
        Location::Directory(id) => id.to_string(),
        Location::Search(query) => format!("{}{}", SEARCH_PREFIX, query),
    }
}

pub fn decode_location(encoded: &str) -> Location {
    if encoded.is_empty() {
        Location::Root
    } else if let Some(query) = encoded.strip_prefix(SEARCH_PREFIX) {
        Location::Search(query.to_string())
    } else {
        Location::Directory(encoded.into())
    }
}

impl PersistedNavigation {
    pub fn capture(left: &PaneState, right: &PaneState, active: Side) -> Self {
        Self {
            left: encode_location(&left.location),
            left_selected_ids: left.selected_ids(),
            right: encode_location(&right.location),
            right_selected_ids: right.selected_ids(),
            active,
        }
    }

    pub fn pane(&self, side: Side) -> (Location, Vec<EntryId>) {
        match side {
            Side::Left => (decode_location(&self.left), self.left_selected_ids.clone()),
            Side::Right => (decode_location(&self.right), self.right_selected_ids.clone()),
        }
    }

    fn same_panes(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }

    /// Read a saved state, falling back to defaults when missing or broken.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => state,
                Err(e) => {
                    log::warn!("Failed to parse navigation state: {}", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryAction {
    /// First entry of the session replaces the initial one.
    Replace(PersistedNavigation),
    Push(PersistedNavigation),
}

/// Browser-like history of navigation states. Recording is debounced so
/// that a burst of navigations collapses into one entry.
#[derive(Debug)]
pub struct NavigationHistory {
    window: Duration,
    pending: Option<(PersistedNavigation, Instant)>,
    entries: Vec<PersistedNavigation>,
    position: usize,
}

impl NavigationHistory {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            entries: Vec::new(),
            position: 0,
        }
    }

    pub fn current(&self) -> Option<&PersistedNavigation> {
        self.entries.get(self.position)
    }

    /// Queue `state`. Returns false when both pane locations match the
    /// current entry, in which case nothing is recorded.
    pub fn record(&mut self, state: PersistedNavigation, now: Instant) -> bool {
        if self.current().is_some_and(|current| current.same_panes(&state)) {
            self.pending = None;
            return false;
        }
        self.pending = Some((state, now));
        true
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Commit the queued state once the debounce window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<HistoryAction> {
        let (_, queued_at) = self.pending.as_ref()?;
        if now.duration_since(*queued_at) < self.window {
            return None;
        }
        let (state, _) = self.pending.take()?;
        if self.entries.is_empty() {
            self.entries.push(state.clone());
            self.position = 0;
            Some(HistoryAction::Replace(state))
        } else {
            self.entries.truncate(self.position + 1);
            self.entries.push(state.clone());
            self.position = self.entries.len() - 1;
            Some(HistoryAction::Push(state))
        }
    }

    pub fn back(&mut self) -> Option<PersistedNavigation> {
        self.pending = None;
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        self.current().cloned()
    }

    pub fn forward(&mut self) -> Option<PersistedNavigation> {
        self.pending = None;
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        self.current().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
