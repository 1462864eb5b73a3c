// Pane state - one pane's listing, selection and navigation
use crate::entry::{Entry, EntryId, EntryKind};
use crate::error::StoreError;
use crate::io::store::{BookmarkStore, StoreResult};
use crate::message::Side;
use crate::state::navigation::{Location, NavigationState};
use crate::state::selection::SelectionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneMode {
    Root,
    Search,
    Normal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    First,
    Last,
}

#[derive(Clone, Debug)]
pub struct PaneState {
    pub location: Location,
    /// Title of the shown directory, or the query for a search.
    pub title: String,
    pub entries: Vec<Entry>,
    /// Synthetic ".." row leading to the parent directory.
    pub parent_link: Option<Entry>,
    pub selection: SelectionState,
    pub navigation: NavigationState,
}

impl PaneState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            location: Location::Root,
            title: String::new(),
            entries: Vec::new(),
            parent_link: None,
            selection: SelectionState::new(),
            navigation: NavigationState::new(history_capacity),
        }
    }

    pub fn mode(&self) -> PaneMode {
        match self.location {
            Location::Root => PaneMode::Root,
            Location::Search(_) => PaneMode::Search,
            Location::Directory(_) => PaneMode::Normal,
        }
    }

    pub fn is_root(&self) -> bool {
        self.mode() == PaneMode::Root
    }

    pub fn is_search(&self) -> bool {
        self.mode() == PaneMode::Search
    }

    pub fn current_id(&self) -> Option<&EntryId> {
        self.location.directory_id()
    }

    /// The shown directory's own id followed by its visible children. This
    /// is all the cycle check looks at.
    pub fn list(&self) -> Vec<EntryId> {
        self.current_id()
            .into_iter()
            .cloned()
            .chain(self.entries.iter().map(|entry| entry.id.clone()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Selected entries in listing order.
    pub fn selected_entries(&self) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|entry| self.selection.contains(&entry.id))
            .cloned()
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<EntryId> {
        self.selection.selected.clone()
    }
}

/// Owns one pane's state and talks to the store on its behalf.
pub struct PaneController {
    pub side: Side,
    state: PaneState,
}

impl PaneController {
    pub fn new(side: Side, history_capacity: usize) -> Self {
        Self {
            side,
            state: PaneState::new(history_capacity),
        }
    }

    pub fn state(&self) -> &PaneState {
        &self.state
    }

    pub fn location(&self) -> &Location {
        &self.state.location
    }

    pub fn is_root(&self) -> bool {
        self.state.is_root()
    }

    pub fn is_search(&self) -> bool {
        self.state.is_search()
    }

    pub fn list(&self) -> Vec<EntryId> {
        self.state.list()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.state.entries
    }

    pub fn selected_entries(&self) -> Vec<Entry> {
        self.state.selected_entries()
    }

    /// Load `target` and select `select` in it. The previous location goes
    /// on the back stack. On failure the pane is left exactly as it was.
    pub async fn build<S: BookmarkStore + ?Sized>(
        &mut self,
        store: &S,
        target: Location,
        select: &[EntryId],
    ) -> StoreResult<()> {
        let target = target.normalize(&store.root_id());
        let loaded = load(store, &target).await?;
        let previous = std::mem::replace(&mut self.state.location, target.clone());
        if previous != target {
            self.state.navigation.push_history(previous);
        }
        self.apply(loaded);
        self.state.selection.select(&self.state.entries, select);
        log::debug!("{} pane showing {}", self.side.as_str(), target);
        Ok(())
    }

    /// Returns false when nothing moved. `Previous` on an empty back stack
    /// is a dead end, not an error.
    pub async fn navigate<S: BookmarkStore + ?Sized>(
        &mut self,
        store: &S,
        direction: Direction,
    ) -> StoreResult<bool> {
        match direction {
            Direction::Previous => {
                let Some(location) = self.state.navigation.go_back() else {
                    return Ok(false);
                };
                let came_from = self.state.current_id().cloned();
                match load(store, &location).await {
                    Ok(loaded) => {
                        self.state.location = location;
                        self.apply(loaded);
                        let select: Vec<EntryId> = came_from.into_iter().collect();
                        self.state.selection.select(&self.state.entries, &select);
                        Ok(true)
                    }
                    Err(err) => {
                        self.state.navigation.history.push_front(location);
                        Err(err)
                    }
                }
            }
            Direction::First => {
                if self.state.entries.is_empty() {
                    return Ok(false);
                }
                self.state.selection.select_index(&self.state.entries, 0);
                Ok(true)
            }
            Direction::Last => {
                let Some(last) = self.state.entries.len().checked_sub(1) else {
                    return Ok(false);
                };
                self.state.selection.select_index(&self.state.entries, last);
                Ok(true)
            }
        }
    }

    /// Reload the current location. Only selected ids that still exist stay
    /// selected. A directory that vanished sends the pane back to the root.
    pub async fn update<S: BookmarkStore + ?Sized>(&mut self, store: &S) -> StoreResult<()> {
        let location = self.state.location.clone();
        match load(store, &location).await {
            Ok(loaded) => {
                self.apply(loaded);
                self.state.selection.reconcile(&self.state.entries);
                Ok(())
            }
            Err(StoreError::NotFound(id)) if location.directory_id() == Some(&id) => {
                log::info!("{} pane directory {} is gone", self.side.as_str(), id);
                let loaded = load(store, &Location::Root).await?;
                self.state.location = Location::Root;
                self.apply(loaded);
                self.state.selection.clear();
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn select(&mut self, ids: &[EntryId]) {
        self.state.selection.select(&self.state.entries, ids);
    }

    pub fn toggle(&mut self, id: &EntryId) {
        self.state.selection.toggle(&self.state.entries, id);
    }

    pub fn select_index(&mut self, index: usize) {
        self.state.selection.select_index(&self.state.entries, index);
    }

    pub fn step(&mut self, delta: isize) {
        self.state.selection.step(&self.state.entries, delta);
    }

    fn apply(&mut self, loaded: Loaded) {
        self.state.title = loaded.title;
        self.state.entries = loaded.entries;
        self.state.parent_link = loaded.parent_link;
    }
}

struct Loaded {
    title: String,
    entries: Vec<Entry>,
    parent_link: Option<Entry>,
}

async fn load<S: BookmarkStore + ?Sized>(store: &S, location: &Location) -> StoreResult<Loaded> {
    match location {
        Location::Root => Ok(Loaded {
            title: "/".to_string(),
            entries: store.children(&store.root_id()).await?,
            parent_link: None,
        }),
        Location::Search(query) => Ok(Loaded {
            title: format!("Search: {}", query),
            entries: store.search(query).await?,
            parent_link: None,
        }),
        Location::Directory(id) => {
            let own = store
                .get(std::slice::from_ref(id))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            if !own.is_dir() {
                return Err(StoreError::NotADirectory(id.clone()));
            }
            let entries = store.children(id).await?;
            let parent_link = own.parent_id.clone().map(|parent_id| Entry {
                id: parent_id,
                title: "..".to_string(),
                kind: EntryKind::Directory,
                url: None,
                parent_id: None,
                index: 0,
                readonly: true,
                date_added: own.date_added,
                opener_id: Some(own.id.clone()),
            });
            Ok(Loaded {
                title: own.title,
                entries,
                parent_link,
            })
        }
    }
}
