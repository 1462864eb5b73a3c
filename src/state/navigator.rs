// Navigator - both panes, the active one, and what the toolbar allows
use crate::error::StoreError;
use crate::io::store::{BookmarkStore, StoreResult};
use crate::message::{Command, Side};
use crate::state::history::PersistedNavigation;
use crate::state::navigation::Location;
use crate::state::pane::PaneController;
use crate::validate::can_move_between_panes;

/// Enablement of the selection-dependent commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Toolbar {
    pub duplicate: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub trash: bool,
    pub sort: bool,
    pub copy_link: bool,
    pub edit_link: bool,
    pub edit_title: bool,
    pub new_file: bool,
    pub new_directory: bool,
    pub import_tree: bool,
    pub sync: bool,
    pub move_top: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub move_bottom: bool,
}

impl Toolbar {
    /// Commands without a toolbar flag are always enabled.
    pub fn is_enabled(&self, command: Command) -> bool {
        match command {
            Command::Duplicate => self.duplicate,
            Command::MoveLeft => self.move_left,
            Command::MoveRight => self.move_right,
            Command::Trash => self.trash,
            Command::Sort => self.sort,
            Command::CopyLink => self.copy_link,
            Command::EditLink => self.edit_link,
            Command::EditTitle => self.edit_title,
            Command::NewFile => self.new_file,
            Command::NewDirectory => self.new_directory,
            Command::ImportTree => self.import_tree,
            Command::Sync => self.sync,
            Command::MoveTop => self.move_top,
            Command::MoveUp => self.move_up,
            Command::MoveDown => self.move_down,
            Command::MoveBottom => self.move_bottom,
            _ => true,
        }
    }
}

/// The process-wide two-pane state.
pub struct Navigator {
    pub left: PaneController,
    pub right: PaneController,
    active: Side,
}

impl Navigator {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            left: PaneController::new(Side::Left, history_capacity),
            right: PaneController::new(Side::Right, history_capacity),
            active: Side::Left,
        }
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn focus(&mut self, side: Side) {
        self.active = side;
    }

    pub fn toggle_focus(&mut self) {
        self.active = self.active.other();
    }

    pub fn pane(&self, side: Side) -> &PaneController {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn pane_mut(&mut self, side: Side) -> &mut PaneController {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// The focused pane, or the other one with `reverse`.
    pub fn active(&self, reverse: bool) -> &PaneController {
        let side = if reverse { self.active.other() } else { self.active };
        self.pane(side)
    }

    pub fn active_mut(&mut self, reverse: bool) -> &mut PaneController {
        let side = if reverse { self.active.other() } else { self.active };
        self.pane_mut(side)
    }

    /// Recompute command availability from the current pane states.
    pub fn changed(&self) -> Toolbar {
        let active = self.active(false);
        let other = self.active(true);
        let state = active.state();
        let selected = state.selected_entries();
        let selected_ids = state.selected_ids();

        let any = !selected.is_empty();
        let single = selected.len() == 1;
        let readonly = selected.iter().any(|e| e.readonly);
        let directory = selected.iter().any(|e| e.is_dir());
        let file = selected.iter().any(|e| e.is_file());
        let writable = any && !readonly;
        let normal = !state.is_root() && !state.is_search();

        let can_move = |target: Side| {
            writable
                && can_move_between_panes(
                    self.active,
                    target,
                    self.pane(target).state(),
                    &selected_ids,
                    directory,
                )
        };

        let total = state.count();
        let at_top = selected.iter().any(|e| e.index == 0);
        let at_bottom = selected.iter().any(|e| e.index + 1 == total);

        Toolbar {
            duplicate: writable && !other.is_search() && !other.is_root(),
            move_left: can_move(Side::Left),
            move_right: can_move(Side::Right),
            trash: writable,
            sort: normal && total > 1,
            copy_link: file,
            edit_link: writable && file && single,
            edit_title: writable && single,
            new_file: normal,
            new_directory: normal,
            // allowed on the root listing, never on a search
            import_tree: single && !state.is_search() && (!readonly || state.is_root()),
            sync: !self.left.is_root()
                && !self.left.is_search()
                && !self.right.is_root()
                && !self.right.is_search()
                && self.left.location() != self.right.location(),
            move_top: normal && any && !at_top,
            move_up: normal && any && !at_top,
            move_down: normal && any && !at_bottom,
            move_bottom: normal && any && !at_bottom,
        }
    }

    /// Reload both panes where they are.
    pub async fn update<S: BookmarkStore + ?Sized>(&mut self, store: &S) -> Vec<(Side, StoreError)> {
        let mut failures = Vec::new();
        for side in [Side::Left, Side::Right] {
            if let Err(err) = self.pane_mut(side).update(store).await {
                log::warn!("reloading {} pane failed: {}", side.as_str(), err);
                failures.push((side, err));
            }
        }
        failures
    }

    pub fn snapshot(&self) -> PersistedNavigation {
        PersistedNavigation::capture(self.left.state(), self.right.state(), self.active)
    }

    /// Rebuild both panes from a persisted state and focus its active side.
    /// A pane whose saved location no longer loads starts at the root.
    pub async fn restore<S: BookmarkStore + ?Sized>(
        &mut self,
        store: &S,
        persisted: &PersistedNavigation,
    ) -> StoreResult<()> {
        let mut result = Ok(());
        for side in [Side::Left, Side::Right] {
            let (location, selected) = persisted.pane(side);
            let pane = self.pane_mut(side);
            if let Err(err) = pane.build(store, location, &selected).await {
                log::warn!("restoring {} pane failed: {}", side.as_str(), err);
                if let Err(err) = pane.build(store, Location::Root, &[]).await {
                    result = Err(err);
                }
            }
        }
        self.active = persisted.active;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryId, NewEntry};
    use crate::io::memory::{MemoryStore, BOOKMARKS_BAR_ID, OTHER_BOOKMARKS_ID};

    struct Fixture {
        store: MemoryStore,
        work: EntryId,
        site: EntryId,
        other: EntryId,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let work = store.insert(NewEntry::directory(BOOKMARKS_BAR_ID.into(), "Work")).unwrap().id;
        let site = store
            .insert(NewEntry::file(BOOKMARKS_BAR_ID.into(), "Site", "https://x.test"))
            .unwrap()
            .id;
        let other = store
            .insert(NewEntry::file(OTHER_BOOKMARKS_ID.into(), "Other", "https://o.test"))
            .unwrap()
            .id;
        Fixture { store, work, site, other }
    }

    async fn navigator(f: &Fixture, left: Location, right: Location) -> Navigator {
        let mut nav = Navigator::new(8);
        nav.left.build(&f.store, left, &[]).await.unwrap();
        nav.right.build(&f.store, right, &[]).await.unwrap();
        nav
    }

    #[tokio::test]
    async fn test_active_falls_back_to_left() {
        let f = fixture();
        let mut nav = navigator(&f, Location::Root, Location::Root).await;
        assert_eq!(nav.active(false).side, Side::Left);
        assert_eq!(nav.active(true).side, Side::Right);
        nav.toggle_focus();
        assert_eq!(nav.active(false).side, Side::Right);
    }

    #[tokio::test]
    async fn test_toolbar_for_plain_file_selection() {
        let f = fixture();
        let mut nav = navigator(
            &f,
            Location::Directory(BOOKMARKS_BAR_ID.into()),
            Location::Directory(OTHER_BOOKMARKS_ID.into()),
        )
        .await;
        nav.left.select(&[f.site.clone()]);

        let toolbar = nav.changed();
        assert!(toolbar.duplicate);
        assert!(toolbar.move_right);
        assert!(!toolbar.move_left);
        assert!(toolbar.trash);
        assert!(toolbar.sort);
        assert!(toolbar.copy_link);
        assert!(toolbar.edit_link);
        assert!(toolbar.edit_title);
        assert!(toolbar.new_file);
        assert!(toolbar.import_tree);
        assert!(toolbar.sync);
        assert!(toolbar.move_top && toolbar.move_up);
        assert!(!toolbar.move_down && !toolbar.move_bottom);
        assert_eq!(toolbar, nav.changed());
    }

    #[tokio::test]
    async fn test_toolbar_blocks_directory_already_listed_in_target() {
        let f = fixture();
        let mut nav = navigator(
            &f,
            Location::Directory(BOOKMARKS_BAR_ID.into()),
            Location::Directory(BOOKMARKS_BAR_ID.into()),
        )
        .await;
        nav.left.select(&[f.work.clone()]);

        let toolbar = nav.changed();
        assert!(!toolbar.move_right);
        assert!(!toolbar.sync);
        assert!(!toolbar.copy_link);
    }

    #[tokio::test]
    async fn test_toolbar_root_and_search_restrictions() {
        let f = fixture();
        let mut nav = navigator(&f, Location::Root, Location::Search("o.test".into())).await;
        nav.left.select(&[BOOKMARKS_BAR_ID.into()]);

        let toolbar = nav.changed();
        // top-level directories are read-only
        assert!(!toolbar.trash);
        assert!(!toolbar.edit_title);
        assert!(!toolbar.duplicate);
        assert!(!toolbar.move_right);
        assert!(!toolbar.sort);
        assert!(!toolbar.new_file && !toolbar.new_directory);
        assert!(toolbar.import_tree);
        assert!(!toolbar.sync);

        nav.focus(Side::Right);
        nav.right.select(&[f.other.clone()]);
        let toolbar = nav.changed();
        assert!(!toolbar.import_tree);
        assert!(!toolbar.move_top);
        assert!(!toolbar.move_left);
    }

    #[tokio::test]
    async fn test_update_reloads_both_panes() {
        let f = fixture();
        let mut nav = navigator(
            &f,
            Location::Directory(BOOKMARKS_BAR_ID.into()),
            Location::Directory(BOOKMARKS_BAR_ID.into()),
        )
        .await;
        f.store.remove(&f.site, false).await.unwrap();
        assert!(nav.update(&f.store).await.is_empty());
        assert_eq!(nav.left.entries().len(), 1);
        assert_eq!(nav.right.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_and_restore() {
        let f = fixture();
        let mut nav = navigator(
            &f,
            Location::Directory(BOOKMARKS_BAR_ID.into()),
            Location::Search("site".into()),
        )
        .await;
        nav.left.select(&[f.work.clone()]);
        nav.focus(Side::Right);
        let snapshot = nav.snapshot();
        assert_eq!(snapshot.right, "search:site");

        let mut restored = Navigator::new(8);
        restored.restore(&f.store, &snapshot).await.unwrap();
        assert_eq!(restored.active_side(), Side::Right);
        assert_eq!(restored.left.state().selected_ids(), vec![f.work.clone()]);
        assert!(restored.right.is_search());
        assert_eq!(restored.snapshot(), snapshot);
    }
}
