// Navigation state - where a pane is and where it has been
use crate::entry::EntryId;
use std::collections::VecDeque;
use std::fmt;

/// What a pane is showing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// Pseudo-root listing of the top-level directories.
    Root,
    Directory(EntryId),
    /// Flat result set of a query; not a real directory.
    Search(String),
}

impl Location {
    /// Folds a directory location pointing at the store root into `Root`.
    pub fn normalize(self, root_id: &EntryId) -> Self {
        match self {
            Location::Directory(id) if id == *root_id => Location::Root,
            other => other,
        }
    }

    pub fn directory_id(&self) -> Option<&EntryId> {
        match self {
            Location::Directory(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Root => f.write_str("/"),
            Location::Directory(id) => write!(f, "#{}", id),
            Location::Search(query) => write!(f, "?{}", query),
        }
    }
}

/// Bounded back stack, most recent first.
#[derive(Clone, Debug)]
pub struct NavigationState {
    pub history: VecDeque<Location>,
    pub capacity: usize,
}

impl NavigationState {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push_history(&mut self, location: Location) {
        if self.history.front() == Some(&location) {
            return;
        }
        self.history.push_front(location);
        self.history.truncate(self.capacity);
    }

    pub fn go_back(&mut self) -> Option<Location> {
        self.history.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
