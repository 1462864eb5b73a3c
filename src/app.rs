use crate::config::Config;
use crate::entry::{Entry, EntryChanges, EntryId, EntryKind, NewEntry};
use crate::error::{CommandError, Rejection, Result};
use crate::io::ops::{self, DeletePolicy};
use crate::io::store::BookmarkStore;
use crate::message::{Command, DropRequest, Invocation, Modifiers, Outcome, Side};
use crate::model::{Host, OpenTarget};
use crate::state::history::PersistedNavigation;
use crate::state::navigation::Location;
use crate::state::navigator::{Navigator, Toolbar};
use crate::state::pane::{Direction, PaneState};
use crate::state::sort::{self, SortOptions, SORT_SUGGESTIONS};
use crate::sync;
use crate::tree;
use crate::validate::can_drop_into;
use std::sync::Arc;

/// Everything a front end needs to draw after a request.
#[derive(Clone, Debug)]
pub struct Frame {
    pub left: PaneState,
    pub right: PaneState,
    pub active: Side,
    pub toolbar: Toolbar,
    pub snapshot: PersistedNavigation,
}

impl Frame {
    pub fn pane(&self, side: Side) -> &PaneState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Owns the navigator and runs commands against the store.
pub struct Commander {
    pub navigator: Navigator,
    store: Arc<dyn BookmarkStore>,
    host: Arc<dyn Host>,
    config: Config,
}

/// Directory id a pane can receive entries into.
fn destination_id(state: &PaneState) -> std::result::Result<EntryId, Rejection> {
    match state.current_id() {
        Some(id) => Ok(id.clone()),
        None if state.is_search() => Err(Rejection::SearchDestination),
        None => Err(Rejection::RootDestination),
    }
}

impl Commander {
    pub fn new(store: Arc<dyn BookmarkStore>, host: Arc<dyn Host>, config: Config) -> Self {
        Self {
            navigator: Navigator::new(config.history.capacity),
            store,
            host,
            config,
        }
    }

    /// Show the persisted state, or the root where it no longer loads.
    pub async fn start(&mut self, persisted: &PersistedNavigation) {
        if let Err(err) = self.navigator.restore(&*self.store, persisted).await {
            log::warn!("Failed to restore navigation: {}", err);
            self.host.notify(&err.to_string());
        }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            left: self.navigator.left.state().clone(),
            right: self.navigator.right.state().clone(),
            active: self.navigator.active_side(),
            toolbar: self.navigator.changed(),
            snapshot: self.navigator.snapshot(),
        }
    }

    pub fn host(&self) -> &dyn Host {
        &*self.host
    }

    fn active_side(&self) -> Side {
        self.navigator.active_side()
    }

    fn selected(&self) -> Vec<Entry> {
        self.navigator.active(false).selected_entries()
    }

    /// Focus `side`, or the other pane when `None`.
    pub fn focus(&mut self, side: Option<Side>) {
        match side {
            Some(side) => self.navigator.focus(side),
            None => self.navigator.toggle_focus(),
        }
    }

    pub fn select(&mut self, ids: &[EntryId]) {
        self.navigator.active_mut(false).select(ids);
    }

    pub fn select_index(&mut self, index: usize) {
        self.navigator.active_mut(false).select_index(index);
    }

    pub fn toggle(&mut self, id: &EntryId) {
        self.navigator.active_mut(false).toggle(id);
    }

    pub async fn dispatch(&mut self, invocation: Invocation) -> Result<Outcome> {
        let command = invocation.command;
        if !self.navigator.changed().is_enabled(command) {
            return Err(CommandError::Unavailable(command));
        }
        let modifiers = invocation.modifiers;

        let result = match command {
            Command::Open => self.open(modifiers).await,
            Command::OpenInNewWindow => {
                self.open_with(OpenTarget::Window {
                    incognito: modifiers.ctrl,
                })
                .await
            }
            Command::OpenInNewIncognitoWindow => {
                self.open_with(OpenTarget::Window { incognito: true }).await
            }
            Command::OpenInNewTab => self.open_with(OpenTarget::BackgroundTab).await,
            Command::SelectNext => Ok(self.step(1)),
            Command::SelectPrevious => Ok(self.step(-1)),
            Command::CopyDetails | Command::CopyTitle | Command::CopyId | Command::CopyLink => {
                Ok(self.copy(command).await)
            }
            Command::Duplicate => self.duplicate().await,
            Command::ImportTree => self.import_tree().await,
            Command::ExportTree => self.export_tree(modifiers.shift).await,
            Command::Trash => self.trash(modifiers.shift).await,
            Command::EditTitle => self.edit(false).await,
            Command::EditLink => self.edit(true).await,
            Command::MoveLeft => self.move_to(Side::Left).await,
            Command::MoveRight => self.move_to(Side::Right).await,
            Command::NewFile => self.create(false).await,
            Command::NewDirectory => self.create(true).await,
            Command::Sync => self.sync().await,
            Command::Sort => self.sort(modifiers).await,
            Command::MoveTop | Command::MoveUp | Command::MoveDown | Command::MoveBottom => {
                self.reorder(command).await
            }
            Command::Root => self.root(modifiers.shift).await,
            Command::Mirror => self.mirror(modifiers).await,
            Command::OpenFolder => self.open_folder().await,
            Command::Search => self.search(invocation.query.as_deref()).await,
            Command::First => self.navigate(Direction::First).await,
            Command::Last => self.navigate(Direction::Last).await,
        };

        match result {
            Err(CommandError::UserAborted) => {
                log::debug!("{} aborted by user", command);
                Ok(Outcome::Aborted)
            }
            Ok(outcome) => {
                log::info!("{} finished: {:?}", command, outcome);
                Ok(outcome)
            }
            Err(err) => Err(err),
        }
    }

    /// Reload both panes after a mutation.
    async fn refresh(&mut self) -> Outcome {
        for (side, err) in self.navigator.update(&*self.store).await {
            self.host.notify(&format!("{} pane: {}", side.as_str(), err));
        }
        Outcome::Updated
    }

    async fn show(&mut self, side: Side, location: Location, select: &[EntryId]) -> Result<Outcome> {
        self.navigator
            .pane_mut(side)
            .build(&*self.store, location, select)
            .await?;
        Ok(Outcome::Navigated(side))
    }

    pub async fn navigate(&mut self, direction: Direction) -> Result<Outcome> {
        let side = self.active_side();
        let moved = self
            .navigator
            .active_mut(false)
            .navigate(&*self.store, direction)
            .await?;
        Ok(if moved {
            Outcome::Navigated(side)
        } else {
            Outcome::Done
        })
    }

    pub async fn restore(&mut self, persisted: &PersistedNavigation) -> Result<Outcome> {
        self.navigator.restore(&*self.store, persisted).await?;
        Ok(Outcome::Navigated(self.active_side()))
    }

    fn step(&mut self, delta: isize) -> Outcome {
        self.navigator.active_mut(false).step(delta);
        Outcome::Navigated(self.active_side())
    }

    async fn open(&mut self, modifiers: Modifiers) -> Result<Outcome> {
        let target = if modifiers.shift {
            OpenTarget::Window {
                incognito: modifiers.ctrl,
            }
        } else if modifiers.ctrl {
            OpenTarget::BackgroundTab
        } else {
            OpenTarget::CurrentTab
        };
        self.open_with(target).await
    }

    async fn open_with(&mut self, target: OpenTarget) -> Result<Outcome> {
        let entries = self.selected();
        self.submit(entries, target).await
    }

    /// Enter a lone directory, otherwise open every selected link.
    pub async fn submit(&mut self, entries: Vec<Entry>, target: OpenTarget) -> Result<Outcome> {
        if let [entry] = entries.as_slice() {
            if entry.is_dir() {
                let side = self.active_side();
                // a parent link re-selects the directory it leads back from
                let select: Vec<EntryId> = entry.opener_id.iter().cloned().collect();
                return self
                    .show(side, Location::Directory(entry.id.clone()), &select)
                    .await;
            }
        }
        for entry in entries.iter().filter(|entry| entry.is_file()) {
            if let Some(url) = &entry.url {
                log::debug!("opening {} in {:?}", url, target);
                self.host.open_url(url, target).await;
            }
        }
        Ok(Outcome::Done)
    }

    /// Follow the active pane's ".." row.
    pub async fn open_parent(&mut self) -> Result<Outcome> {
        match self.navigator.active(false).state().parent_link.clone() {
            Some(link) => self.submit(vec![link], OpenTarget::CurrentTab).await,
            None => Ok(Outcome::Done),
        }
    }

    async fn copy(&self, command: Command) -> Outcome {
        let entries = self.selected();
        let lines: Vec<String> = match command {
            Command::CopyDetails => entries
                .iter()
                .map(|entry| {
                    [Some(entry.title.as_str()), entry.url.as_deref(), Some(entry.id.as_str())]
                        .into_iter()
                        .flatten()
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect(),
            Command::CopyTitle => entries.iter().map(|entry| entry.title.clone()).collect(),
            Command::CopyId => entries.iter().map(|entry| entry.id.to_string()).collect(),
            _ => entries.iter().filter_map(|entry| entry.url.clone()).collect(),
        };
        let separator = if command == Command::CopyDetails { "\n\n" } else { "\n" };
        self.host.copy_to_clipboard(lines.join(separator)).await;
        Outcome::Done
    }

    async fn duplicate(&mut self) -> Result<Outcome> {
        let ids = self.navigator.active(false).state().selected_ids();
        let other = self.navigator.active(true);
        let parent = destination_id(other.state())?;
        let after = other.selected_entries().last().map(|entry| entry.index);

        let copies = ops::duplicate_entries(&*self.store, &*self.host, &ids, &parent, after).await;
        log::info!("duplicated {} of {} entries into {}", copies.len(), ids.len(), parent);
        Ok(self.refresh().await)
    }

    async fn import_tree(&mut self) -> Result<Outcome> {
        let Some(entry) = self.selected().into_iter().next() else {
            return Ok(Outcome::Done);
        };
        let text = self.host.read_clipboard().await.unwrap_or_default();
        let nodes = tree::parse_import(&text)?;

        let (question, parent, after) = match (entry.kind, entry.parent_id.clone()) {
            (EntryKind::File, Some(parent)) => (
                "Insert the bookmark tree after this node?",
                parent,
                Some(entry.index),
            ),
            _ => ("Insert the bookmark tree inside this node?", entry.id.clone(), None),
        };
        if !self.host.confirm(question).await {
            return Err(CommandError::UserAborted);
        }

        let result = tree::import(&*self.store, &nodes, &parent, after).await;
        let outcome = self.refresh().await;
        let created = result?;
        log::info!("imported {} top-level nodes into {}", created.len(), parent);
        Ok(outcome)
    }

    async fn export_tree(&mut self, to_file: bool) -> Result<Outcome> {
        let ids = self.navigator.active(false).state().selected_ids();
        if ids.is_empty() {
            return Ok(Outcome::Done);
        }
        ops::export_artifact(&*self.store, &*self.host, &ids, to_file).await?;
        Ok(Outcome::Done)
    }

    async fn trash(&mut self, to_file: bool) -> Result<Outcome> {
        let entries = self.selected();
        if entries.is_empty() {
            return Ok(Outcome::Done);
        }
        if self.config.prompts.ask_before_delete {
            let question = format!(
                "Are you sure you want to delete {} item{}?\n\n-> Deleted entries will always be exported to the clipboard.",
                entries.len(),
                if entries.len() > 1 { "s" } else { "" }
            );
            if !self.host.confirm(&question).await {
                return Err(CommandError::UserAborted);
            }
        }

        // no recovery artifact, no delete
        let ids: Vec<EntryId> = entries.iter().map(|entry| entry.id.clone()).collect();
        ops::export_artifact(&*self.store, &*self.host, &ids, to_file).await?;

        let policy = DeletePolicy {
            confirm_directories: self.config.prompts.ask_before_directory_delete,
        };
        let removed = ops::delete_entries(&*self.store, &*self.host, &entries, policy).await;
        log::info!("trashed {} of {} entries", removed, entries.len());
        Ok(self.refresh().await)
    }

    async fn edit(&mut self, link: bool) -> Result<Outcome> {
        let Some(entry) = self.selected().into_iter().next() else {
            return Ok(Outcome::Done);
        };
        let (title, current) = if link {
            ("Edit Link", entry.url.clone().unwrap_or_default())
        } else {
            ("Edit Title", entry.title.clone())
        };
        let answer = self
            .host
            .ask(title, &current, &[])
            .await
            .ok_or(CommandError::UserAborted)?;
        if answer.is_empty() || answer == current {
            return Err(CommandError::UserAborted);
        }

        let changes = if link {
            EntryChanges {
                url: Some(answer),
                ..Default::default()
            }
        } else {
            EntryChanges {
                title: Some(answer),
                ..Default::default()
            }
        };
        let result = self.store.update(&entry.id, changes).await;
        let outcome = self.refresh().await;
        result?;
        Ok(outcome)
    }

    async fn move_to(&mut self, target: Side) -> Result<Outcome> {
        let ids = self.navigator.pane(target.other()).state().selected_ids();
        let destination = self.navigator.pane(target);
        let parent = destination_id(destination.state())?;
        let start = destination
            .selected_entries()
            .first()
            .map(|entry| entry.index + 1);

        let moved = ops::move_entries(&*self.store, &*self.host, &ids, &parent, start).await;
        log::info!("moved {} entries to the {} pane", moved, target.as_str());
        Ok(self.refresh().await)
    }

    async fn ask_trimmed(&self, title: &str, default: &str) -> Result<String> {
        let answer = self.host.ask(title, default, &[]).await.unwrap_or_default();
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(CommandError::UserAborted);
        }
        Ok(answer.to_string())
    }

    async fn create(&mut self, directory: bool) -> Result<Outcome> {
        let side = self.active_side();
        let pane = self.navigator.active(false);
        let parent = destination_id(pane.state())?;
        let anchor = pane.selected_entries().into_iter().next();
        let default_title = anchor
            .as_ref()
            .map(|entry| entry.title.clone())
            .unwrap_or_default();

        let attrs = if directory {
            let title = self.ask_trimmed("Title of New Directory", &default_title).await?;
            NewEntry::directory(parent, title)
        } else {
            let title = self.ask_trimmed("Title of New Bookmark", &default_title).await?;
            let default_url = anchor
                .as_ref()
                .and_then(|entry| entry.url.clone())
                .unwrap_or_else(|| "https://www.example.com".to_string());
            let url = self.ask_trimmed("URL of New Bookmark", &default_url).await?;
            NewEntry::file(parent, title, url)
        };
        let attrs = NewEntry {
            index: anchor.map(|entry| entry.index + 1),
            ..attrs
        };

        let result = self.store.create(attrs).await;
        let outcome = self.refresh().await;
        let created = result?;
        self.navigator.pane_mut(side).select(&[created.id]);
        Ok(outcome)
    }

    async fn sync(&mut self) -> Result<Outcome> {
        let left = self.navigator.left.entries().to_vec();
        let right = self.navigator.right.entries().to_vec();
        let combined = sync::union(&left, &right);

        for (side, own) in [(Side::Left, left), (Side::Right, right)] {
            let missing = sync::missing(&combined, &own);
            if missing.is_empty() {
                continue;
            }
            let parent = destination_id(self.navigator.pane(side).state())?;
            let created = sync::fill(&*self.store, &*self.host, &parent, &missing).await;
            log::info!("sync created {} entries in the {} pane", created.len(), side.as_str());
            if !created.is_empty() {
                self.show(side, Location::Directory(parent), &created).await?;
            }
        }
        Ok(Outcome::Updated)
    }

    async fn sort(&mut self, modifiers: Modifiers) -> Result<Outcome> {
        let rules = if modifiers.alt {
            self.host
                .ask("Sort By (link, name, date):", "name, link", &SORT_SUGGESTIONS)
                .await
                .ok_or(CommandError::UserAborted)?
        } else {
            self.config.sort.rules.clone()
        };
        let options = SortOptions::parse(&rules, modifiers.shift).ok_or(CommandError::UserAborted)?;

        let pane = self.navigator.active(false);
        let parent = destination_id(pane.state())?;
        let order = options.plan(pane.entries());
        let placed = sort::apply_order(&*self.store, &*self.host, &parent, &order).await;
        log::info!("sorted {} of {} entries in {}", placed, order.len(), parent);
        Ok(self.refresh().await)
    }

    async fn reorder(&mut self, command: Command) -> Result<Outcome> {
        let pane = self.navigator.active(false);
        let parent = destination_id(pane.state())?;
        let selected = pane.selected_entries();
        let total = pane.state().count();

        let moves: Vec<(EntryId, usize)> = match command {
            Command::MoveTop => selected
                .iter()
                .enumerate()
                .map(|(n, entry)| (entry.id.clone(), n))
                .collect(),
            Command::MoveUp => selected
                .iter()
                .map(|entry| (entry.id.clone(), entry.index.saturating_sub(1)))
                .collect(),
            // bottom-most first so earlier moves do not shift later ones
            Command::MoveDown => selected
                .iter()
                .rev()
                .map(|entry| (entry.id.clone(), entry.index + 1))
                .collect(),
            _ => selected
                .iter()
                .rev()
                .enumerate()
                .map(|(n, entry)| (entry.id.clone(), total.saturating_sub(n + 1)))
                .collect(),
        };
        ops::reposition(&*self.store, &*self.host, &parent, &moves).await;
        Ok(self.refresh().await)
    }

    async fn root(&mut self, only_active: bool) -> Result<Outcome> {
        let side = self.active_side();
        if only_active {
            return self.show(side, Location::Root, &[]).await;
        }
        for pane in [Side::Left, Side::Right] {
            self.show(pane, Location::Root, &[]).await?;
        }
        Ok(Outcome::Navigated(side))
    }

    async fn mirror(&mut self, modifiers: Modifiers) -> Result<Outcome> {
        let pane = self.navigator.active(false);
        let current = pane.location().clone();
        let selected = pane.selected_entries();
        let ids = pane.state().selected_ids();
        let target = self.active_side().other();

        if modifiers.shift {
            if let Some(directory) = selected.iter().find(|entry| entry.is_dir()) {
                return self
                    .show(target, Location::Directory(directory.id.clone()), &[])
                    .await;
            }
        }
        let location = match selected.first().and_then(|entry| entry.parent_id.clone()) {
            Some(parent) if modifiers.alt => Location::Directory(parent),
            _ => current,
        };
        self.show(target, location, &ids).await
    }

    async fn open_folder(&mut self) -> Result<Outcome> {
        let pane = self.navigator.active(false);
        let ids = pane.state().selected_ids();
        let parent = pane
            .selected_entries()
            .into_iter()
            .next()
            .and_then(|entry| entry.parent_id);
        match parent {
            Some(parent) => {
                let side = self.active_side();
                self.show(side, Location::Directory(parent), &ids).await
            }
            None => Ok(Outcome::Done),
        }
    }

    async fn search(&mut self, query: Option<&str>) -> Result<Outcome> {
        match query.map(str::trim).filter(|query| !query.is_empty()) {
            Some(query) => {
                let side = self.active_side();
                self.show(side, Location::Search(query.to_string()), &[]).await
            }
            None => Ok(Outcome::Done),
        }
    }

    /// Move dragged entries between or within panes.
    pub async fn drop_request(&mut self, request: DropRequest) -> Result<Outcome> {
        let destination = self.navigator.pane(request.destination);
        let directory_drop = request.kinds.contains(&EntryKind::Directory);
        can_drop_into(
            destination.state(),
            &request.ids,
            directory_drop,
            request.over.inside,
        )?;

        let over = &request.over;
        let (parent, start) = match (&over.id, over.kind, over.inside) {
            (Some(id), Some(EntryKind::Directory), true) => (id.clone(), None),
            _ => {
                let parent = destination_id(destination.state())?;
                let start = over.index.map(|index| index + 1).or_else(|| {
                    destination
                        .selected_entries()
                        .first()
                        .map(|entry| entry.index + 1)
                });
                (parent, start)
            }
        };

        let moved = ops::move_entries(&*self.store, &*self.host, &request.ids, &parent, start).await;
        log::info!(
            "dropped {} of {} entries from the {} pane into {}",
            moved,
            request.ids.len(),
            request.source.as_str(),
            parent
        );
        Ok(self.refresh().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory::{MemoryStore, BOOKMARKS_BAR_ID, OTHER_BOOKMARKS_ID};
    use crate::message::DropTarget;
    use crate::testing::{CountingStore, ScriptedHost};

    struct Fixture {
        store: Arc<CountingStore>,
        host: Arc<ScriptedHost>,
        commander: Commander,
        x: EntryId,
        work: EntryId,
        site: EntryId,
    }

    /// Left shows X = [Work/ (Inner), Site]; right shows "Other bookmarks".
    async fn fixture() -> Fixture {
        let memory = MemoryStore::new();
        let x = memory
            .insert(NewEntry::directory(BOOKMARKS_BAR_ID.into(), "X"))
            .unwrap()
            .id;
        let work = memory.insert(NewEntry::directory(x.clone(), "Work")).unwrap().id;
        let site = memory
            .insert(NewEntry::file(x.clone(), "Site", "https://x.test"))
            .unwrap()
            .id;
        memory
            .insert(NewEntry::file(work.clone(), "Inner", "https://inner.test"))
            .unwrap();

        let store = Arc::new(CountingStore::new(memory));
        let host = Arc::new(ScriptedHost::new());
        let mut commander = Commander::new(store.clone(), host.clone(), Config::default());
        commander
            .start(&PersistedNavigation {
                left: x.to_string(),
                right: OTHER_BOOKMARKS_ID.to_string(),
                ..Default::default()
            })
            .await;
        Fixture {
            store,
            host,
            commander,
            x,
            work,
            site,
        }
    }

    async fn titles(f: &Fixture, parent: &str) -> Vec<String> {
        f.store
            .children(&parent.into())
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.title)
            .collect()
    }

    fn add_files(f: &Fixture, parent: &str, names: &[&str]) -> Vec<EntryId> {
        names
            .iter()
            .map(|name| {
                f.store
                    .inner
                    .insert(NewEntry::file(parent.into(), *name, format!("https://{}.test", name)))
                    .unwrap()
                    .id
            })
            .collect()
    }

    fn drop_of(ids: Vec<EntryId>, kinds: Vec<EntryKind>, destination: Side, over: DropTarget) -> DropRequest {
        DropRequest {
            ids,
            kinds,
            source: destination.other(),
            destination,
            over,
        }
    }

    fn nowhere() -> DropTarget {
        DropTarget {
            id: None,
            kind: None,
            index: None,
            inside: false,
        }
    }

    #[tokio::test]
    async fn test_drop_into_listing_holding_directory_is_rejected_without_move() {
        let mut f = fixture().await;
        f.commander
            .show(Side::Right, Location::Directory(f.x.clone()), &[])
            .await
            .unwrap();

        let request = drop_of(vec![f.work.clone()], vec![EntryKind::Directory], Side::Right, nowhere());
        let result = f.commander.drop_request(request).await;

        match result {
            Err(err @ CommandError::Rejected(Rejection::ChildDirectory)) => {
                assert_eq!(err.to_string(), "Cannot move to a child directory");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(f.store.moves(), 0);
    }

    #[tokio::test]
    async fn test_drop_on_root_and_search_is_rejected() {
        let mut f = fixture().await;
        f.commander
            .show(Side::Right, Location::Root, &[])
            .await
            .unwrap();
        let request = drop_of(vec![f.site.clone()], vec![EntryKind::File], Side::Right, nowhere());
        assert!(matches!(
            f.commander.drop_request(request).await,
            Err(CommandError::Rejected(Rejection::RootDestination))
        ));

        f.commander
            .show(Side::Right, Location::Search("inner".into()), &[])
            .await
            .unwrap();
        let request = drop_of(vec![f.site.clone()], vec![EntryKind::File], Side::Right, nowhere());
        assert!(matches!(
            f.commander.drop_request(request).await,
            Err(CommandError::Rejected(Rejection::SearchDestination))
        ));
        assert_eq!(f.store.moves(), 0);
    }

    #[tokio::test]
    async fn test_drop_after_hovered_row_keeps_order() {
        let mut f = fixture().await;
        add_files(&f, OTHER_BOOKMARKS_ID, &["p", "q"]);
        f.commander.navigator.update(&*f.store).await;

        let over = DropTarget {
            id: None,
            kind: Some(EntryKind::File),
            index: Some(0),
            inside: false,
        };
        let request = drop_of(
            vec![f.work.clone(), f.site.clone()],
            vec![EntryKind::Directory, EntryKind::File],
            Side::Right,
            over,
        );
        assert_eq!(f.commander.drop_request(request).await.unwrap(), Outcome::Updated);
        assert_eq!(titles(&f, OTHER_BOOKMARKS_ID).await, vec!["p", "Work", "Site", "q"]);
        assert!(f.commander.navigator.left.entries().is_empty());
    }

    #[tokio::test]
    async fn test_insert_after_row_in_same_directory() {
        let mut f = fixture().await;
        let added = add_files(&f, f.x.as_str(), &["c", "d"]);
        f.commander.navigator.update(&*f.store).await;

        let over = DropTarget {
            id: Some(added[0].clone()),
            kind: Some(EntryKind::File),
            index: Some(2),
            inside: false,
        };
        let mut request = drop_of(vec![f.site.clone()], vec![EntryKind::File], Side::Left, over);
        request.source = Side::Left;
        f.commander.drop_request(request).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "c", "Site", "d"]);

        // both panes show X; c goes after the right pane's Site
        f.commander
            .show(Side::Right, Location::Directory(f.x.clone()), &[f.site.clone()])
            .await
            .unwrap();
        f.commander.select(&[added[0].clone()]);
        f.commander.dispatch(Invocation::new(Command::MoveRight)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "Site", "c", "d"]);
    }

    #[tokio::test]
    async fn test_trash_leaves_no_selection_behind() {
        let mut f = fixture().await;
        f.commander.select(&[f.site.clone()]);
        f.commander.dispatch(Invocation::new(Command::Trash)).await.unwrap();

        let frame = f.commander.frame();
        assert!(frame.left.selected_ids().is_empty());
        assert!(!frame.toolbar.trash);
        assert!(!frame.toolbar.move_right);
    }

    #[tokio::test]
    async fn test_drop_inside_directory_appends() {
        let mut f = fixture().await;
        let over = DropTarget {
            id: Some(f.work.clone()),
            kind: Some(EntryKind::Directory),
            index: Some(0),
            inside: true,
        };
        let mut request = drop_of(vec![f.site.clone()], vec![EntryKind::File], Side::Left, over);
        request.source = Side::Left;
        f.commander.drop_request(request).await.unwrap();
        assert_eq!(titles(&f, f.work.as_str()).await, vec!["Inner", "Site"]);
    }

    #[tokio::test]
    async fn test_unavailable_command_touches_nothing() {
        let mut f = fixture().await;
        f.commander.show(Side::Left, Location::Root, &[]).await.unwrap();
        f.commander.select(&[BOOKMARKS_BAR_ID.into()]);

        let result = f.commander.dispatch(Invocation::new(Command::Trash)).await;
        assert!(matches!(result, Err(CommandError::Unavailable(Command::Trash))));
        assert!(f.host.prompts().is_empty());
        assert_eq!(f.store.removes(), 0);
    }

    #[tokio::test]
    async fn test_sync_fills_both_panes_once() {
        let mut f = fixture().await;
        let a = f.store.inner.insert(NewEntry::directory(BOOKMARKS_BAR_ID.into(), "A")).unwrap().id;
        let b = f.store.inner.insert(NewEntry::directory(OTHER_BOOKMARKS_ID.into(), "B")).unwrap().id;
        f.store.inner.insert(NewEntry::file(a.clone(), "A", "u1")).unwrap();
        f.store.inner.insert(NewEntry::file(b.clone(), "B", "u2")).unwrap();
        f.commander.show(Side::Left, Location::Directory(a.clone()), &[]).await.unwrap();
        f.commander.show(Side::Right, Location::Directory(b.clone()), &[]).await.unwrap();

        f.commander.dispatch(Invocation::new(Command::Sync)).await.unwrap();
        assert_eq!(titles(&f, a.as_str()).await, vec!["A", "B"]);
        assert_eq!(titles(&f, b.as_str()).await, vec!["B", "A"]);
        assert_eq!(f.store.creates(), 2);
        // the new entries come up selected
        let selected = f.commander.navigator.left.selected_entries();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].url.as_deref(), Some("u2"));

        f.commander.dispatch(Invocation::new(Command::Sync)).await.unwrap();
        assert_eq!(f.store.creates(), 2);
    }

    #[tokio::test]
    async fn test_trash_exports_then_force_removes_directory() {
        let mut f = fixture().await;
        f.commander.select(&[f.work.clone(), f.site.clone()]);
        f.host.confirm_with(true).confirm_with(true);

        let outcome = f.commander.dispatch(Invocation::new(Command::Trash)).await.unwrap();
        assert_eq!(outcome, Outcome::Updated);
        assert!(titles(&f, f.x.as_str()).await.is_empty());

        let prompts = f.host.prompts();
        assert!(prompts[0].starts_with("Are you sure you want to delete 2 items?"));
        assert_eq!(prompts[1], "\"Work\" directory is not empty. Remove anyway?");

        let exported: serde_json::Value = serde_json::from_str(&f.host.clipboard().unwrap()).unwrap();
        assert_eq!(exported[0]["children"][0]["title"], "Inner");
        assert_eq!(exported[1]["url"], "https://x.test");
    }

    #[tokio::test]
    async fn test_declined_trash_is_a_silent_abort() {
        let mut f = fixture().await;
        f.commander.select(&[f.site.clone()]);
        f.host.confirm_with(false);

        let outcome = f.commander.dispatch(Invocation::new(Command::Trash)).await.unwrap();
        assert_eq!(outcome, Outcome::Aborted);
        assert_eq!(f.store.removes(), 0);
        assert!(f.host.clipboard().is_none());
        assert!(f.host.notices().is_empty());
    }

    #[tokio::test]
    async fn test_sort_with_prompt_and_reverse() {
        let mut f = fixture().await;
        add_files(&f, f.x.as_str(), &["b", "a"]);
        f.commander.navigator.update(&*f.store).await;

        f.commander.dispatch(Invocation::new(Command::Sort)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "a", "b", "Site"]);

        f.host.answer("link");
        f.commander
            .dispatch(Invocation::new(Command::Sort).alt().shift())
            .await
            .unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "Site", "b", "a"]);
        assert_eq!(f.host.prompts(), vec!["Sort By (link, name, date):"]);

        f.host.answer("size");
        let outcome = f.commander.dispatch(Invocation::new(Command::Sort).alt()).await.unwrap();
        assert_eq!(outcome, Outcome::Aborted);
    }

    #[tokio::test]
    async fn test_move_top_and_bottom() {
        let mut f = fixture().await;
        let ids = add_files(&f, f.x.as_str(), &["c", "d"]);
        f.commander.navigator.update(&*f.store).await;

        f.commander.select(&[f.site.clone(), ids[1].clone()]);
        f.commander.dispatch(Invocation::new(Command::MoveTop)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Site", "d", "Work", "c"]);

        f.commander.dispatch(Invocation::new(Command::MoveBottom)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "c", "Site", "d"]);
        assert!(!f.commander.navigator.changed().move_bottom);

        f.commander.dispatch(Invocation::new(Command::MoveUp)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "Site", "d", "c"]);

        f.commander.dispatch(Invocation::new(Command::MoveDown)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "c", "Site", "d"]);
        assert_eq!(f.commander.navigator.left.selected_entries().len(), 2);
    }

    #[tokio::test]
    async fn test_open_directory_then_parent_link() {
        let mut f = fixture().await;
        f.commander.select(&[f.work.clone()]);
        f.commander.dispatch(Invocation::new(Command::Open)).await.unwrap();
        assert_eq!(
            f.commander.navigator.left.location(),
            &Location::Directory(f.work.clone())
        );

        f.commander.open_parent().await.unwrap();
        assert_eq!(f.commander.navigator.left.location(), &Location::Directory(f.x.clone()));
        assert_eq!(f.commander.navigator.left.state().selected_ids(), vec![f.work.clone()]);
    }

    #[tokio::test]
    async fn test_open_file_targets() {
        let mut f = fixture().await;
        f.commander.select(&[f.site.clone()]);
        f.commander.dispatch(Invocation::new(Command::Open)).await.unwrap();
        f.commander.dispatch(Invocation::new(Command::Open).ctrl()).await.unwrap();
        f.commander
            .dispatch(Invocation::new(Command::Open).shift().ctrl())
            .await
            .unwrap();
        f.commander
            .dispatch(Invocation::new(Command::OpenInNewTab))
            .await
            .unwrap();

        let targets: Vec<OpenTarget> = f.host.opened().into_iter().map(|(_, target)| target).collect();
        assert_eq!(
            targets,
            vec![
                OpenTarget::CurrentTab,
                OpenTarget::BackgroundTab,
                OpenTarget::Window { incognito: true },
                OpenTarget::BackgroundTab,
            ]
        );
    }

    #[tokio::test]
    async fn test_import_tree_after_file() {
        let mut f = fixture().await;
        f.host.set_clipboard(r#"[{"title":"n","type":"FILE","url":"https://n.test"}]"#);
        f.commander.select(&[f.work.clone()]);
        f.host.confirm_with(true);
        f.commander.dispatch(Invocation::new(Command::ImportTree)).await.unwrap();
        assert_eq!(titles(&f, f.work.as_str()).await, vec!["Inner", "n"]);

        f.commander.select(&[f.site.clone()]);
        f.host.set_clipboard(r#"[{"title":"m","type":"FILE","url":"https://m.test"}]"#);
        f.commander.dispatch(Invocation::new(Command::ImportTree)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "Site", "m"]);
        assert_eq!(
            f.host.prompts(),
            vec![
                "Insert the bookmark tree inside this node?",
                "Insert the bookmark tree after this node?",
            ]
        );

        f.host.set_clipboard(r#"{"title":"m"}"#);
        let result = f.commander.dispatch(Invocation::new(Command::ImportTree)).await;
        match result {
            Err(err) => assert_eq!(err.to_string(), "This is not a valid JSON array"),
            Ok(outcome) => panic!("unexpected {:?}", outcome),
        }
    }

    #[tokio::test]
    async fn test_new_file_after_anchor() {
        let mut f = fixture().await;
        f.commander.select(&[f.work.clone()]);

        f.host.cancel();
        let outcome = f.commander.dispatch(Invocation::new(Command::NewFile)).await.unwrap();
        assert_eq!(outcome, Outcome::Aborted);

        f.host.answer("  Docs ").answer("https://docs.rs");
        f.commander.dispatch(Invocation::new(Command::NewFile)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "Docs", "Site"]);
        let selected = f.commander.navigator.left.selected_entries();
        assert_eq!(selected[0].title, "Docs");

        f.host.answer("Folder");
        f.commander.dispatch(Invocation::new(Command::NewDirectory)).await.unwrap();
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "Docs", "Folder", "Site"]);
    }

    #[tokio::test]
    async fn test_edit_title_and_link() {
        let mut f = fixture().await;
        f.commander.select(&[f.site.clone()]);

        f.host.answer("Site");
        let outcome = f.commander.dispatch(Invocation::new(Command::EditTitle)).await.unwrap();
        assert_eq!(outcome, Outcome::Aborted);

        f.host.answer("Renamed").answer("https://y.test");
        f.commander.dispatch(Invocation::new(Command::EditTitle)).await.unwrap();
        f.commander.dispatch(Invocation::new(Command::EditLink)).await.unwrap();
        let entry = f.commander.navigator.left.selected_entries().remove(0);
        assert_eq!(entry.title, "Renamed");
        assert_eq!(entry.url.as_deref(), Some("https://y.test"));
    }

    #[tokio::test]
    async fn test_copy_commands() {
        let mut f = fixture().await;
        f.commander.select(&[f.work.clone(), f.site.clone()]);

        f.commander.dispatch(Invocation::new(Command::CopyDetails)).await.unwrap();
        let expected = format!("Work\n{}\n\nSite\nhttps://x.test\n{}", f.work, f.site);
        assert_eq!(f.host.clipboard().unwrap(), expected);

        f.commander.dispatch(Invocation::new(Command::CopyTitle)).await.unwrap();
        assert_eq!(f.host.clipboard().unwrap(), "Work\nSite");

        f.commander.dispatch(Invocation::new(Command::CopyLink)).await.unwrap();
        assert_eq!(f.host.clipboard().unwrap(), "https://x.test");
    }

    #[tokio::test]
    async fn test_move_right_and_duplicate() {
        let mut f = fixture().await;
        let others = add_files(&f, OTHER_BOOKMARKS_ID, &["p", "q"]);
        f.commander.navigator.update(&*f.store).await;
        f.commander.navigator.right.select(&[others[0].clone()]);

        f.commander.select(&[f.work.clone()]);
        f.commander.dispatch(Invocation::new(Command::Duplicate)).await.unwrap();
        assert_eq!(titles(&f, OTHER_BOOKMARKS_ID).await, vec!["p", "Work", "q"]);
        assert_eq!(titles(&f, f.x.as_str()).await, vec!["Work", "Site"]);

        f.commander.select(&[f.site.clone()]);
        f.commander.dispatch(Invocation::new(Command::MoveRight)).await.unwrap();
        assert_eq!(titles(&f, OTHER_BOOKMARKS_ID).await, vec!["p", "Site", "Work", "q"]);

        let result = f.commander.dispatch(Invocation::new(Command::MoveLeft)).await;
        assert!(matches!(result, Err(CommandError::Unavailable(Command::MoveLeft))));
    }

    #[tokio::test]
    async fn test_pane_navigation_commands() {
        let mut f = fixture().await;
        f.commander.select(&[f.site.clone()]);

        f.commander.dispatch(Invocation::new(Command::Mirror)).await.unwrap();
        assert_eq!(f.commander.navigator.right.location(), &Location::Directory(f.x.clone()));
        assert_eq!(f.commander.navigator.right.state().selected_ids(), vec![f.site.clone()]);

        f.commander.select(&[f.work.clone()]);
        f.commander.dispatch(Invocation::new(Command::Mirror).shift()).await.unwrap();
        assert_eq!(f.commander.navigator.right.location(), &Location::Directory(f.work.clone()));

        f.commander
            .dispatch(Invocation::new(Command::Search).with_query("inner"))
            .await
            .unwrap();
        assert!(f.commander.navigator.left.is_search());
        f.commander.dispatch(Invocation::new(Command::First)).await.unwrap();
        f.commander.dispatch(Invocation::new(Command::OpenFolder)).await.unwrap();
        assert_eq!(f.commander.navigator.left.location(), &Location::Directory(f.work.clone()));

        f.commander.dispatch(Invocation::new(Command::Root).shift()).await.unwrap();
        assert!(f.commander.navigator.left.is_root());
        assert!(!f.commander.navigator.right.is_root());
        f.commander.dispatch(Invocation::new(Command::Root)).await.unwrap();
        assert!(f.commander.navigator.right.is_root());
    }

    #[tokio::test]
    async fn test_vanished_directory_sends_pane_to_root() {
        let mut f = fixture().await;
        f.commander.focus(Some(Side::Right));
        f.commander
            .show(Side::Right, Location::Directory(f.work.clone()), &[])
            .await
            .unwrap();
        f.commander.focus(None);
        f.commander.select(&[f.work.clone()]);
        f.host.confirm_with(true).confirm_with(true);
        f.commander.dispatch(Invocation::new(Command::Trash)).await.unwrap();

        assert!(f.commander.navigator.right.is_root());
        assert!(f.host.notices().iter().all(|notice| !notice.contains("pane")));
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let err = "shortcuts".parse::<Command>().unwrap_err();
        assert_eq!(err.to_string(), "Command is not supported: shortcuts");
    }
}
