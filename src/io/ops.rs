use crate::entry::{Destination, Entry, EntryId, NewEntry, TreeNode};
use crate::error::{CommandError, Result, StoreError};
use crate::io::store::BookmarkStore;
use crate::model::Host;
use crate::tree;
use std::future::Future;
use std::pin::Pin;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

fn report<H: Host + ?Sized>(host: &H, what: &str, id: &EntryId, err: &StoreError) {
    log::warn!("{} {} failed: {}", what, id, err);
    host.notify(&err.to_string());
}

/// Index to ask for so that `id` ends up at `index` of `parent` as the
/// listing reads now. An entry already above that row in the same parent
/// leaves a gap when it is taken out, so the row shifts up by one.
async fn landing_index<S>(store: &S, id: &EntryId, parent: &EntryId, index: usize) -> usize
where
    S: BookmarkStore + ?Sized,
{
    match store.get(std::slice::from_ref(id)).await {
        Ok(found) => match found.first() {
            Some(entry) if entry.parent_id.as_ref() == Some(parent) && entry.index < index => index - 1,
            _ => index,
        },
        // the move itself reports the failure
        Err(_) => index,
    }
}

/// Move `ids` under `parent`, one awaited call at a time. With `start`,
/// the entries land one after another from that row in the given order,
/// each right behind the one moved before it; otherwise each is appended.
/// Returns how many moved.
pub async fn move_entries<S, H>(
    store: &S,
    host: &H,
    ids: &[EntryId],
    parent: &EntryId,
    start: Option<usize>,
) -> usize
where
    S: BookmarkStore + ?Sized,
    H: Host + ?Sized,
{
    let mut moved = 0;
    let mut next = start;
    for id in ids {
        let to = match next {
            Some(index) => Destination::at(parent.clone(), landing_index(store, id, parent, index).await),
            None => Destination::inside(parent.clone()),
        };
        match store.move_entry(id, to).await {
            Ok(entry) => {
                moved += 1;
                if next.is_some() {
                    next = Some(entry.index + 1);
                }
            }
            Err(err) => report(host, "move", id, &err),
        }
    }
    log::debug!("moved {} of {} entries into {}", moved, ids.len(), parent);
    moved
}

/// Move each entry to its own index inside `parent`. The caller orders the
/// pairs so that earlier moves do not disturb later targets.
pub async fn reposition<S, H>(store: &S, host: &H, parent: &EntryId, moves: &[(EntryId, usize)]) -> usize
where
    S: BookmarkStore + ?Sized,
    H: Host + ?Sized,
{
    let mut moved = 0;
    for (id, index) in moves {
        match store.move_entry(id, Destination::at(parent.clone(), *index)).await {
            Ok(_) => moved += 1,
            Err(err) => report(host, "move", id, &err),
        }
    }
    moved
}

fn copy_node<'a, S: BookmarkStore + ?Sized>(
    store: &'a S,
    node: &'a TreeNode,
    parent_id: EntryId,
    index: Option<usize>,
) -> BoxFuture<'a, std::result::Result<EntryId, StoreError>> {
    Box::pin(async move {
        let created = store
            .create(NewEntry {
                parent_id,
                title: node.entry.title.clone(),
                url: node.entry.url.clone(),
                index,
            })
            .await?;
        if node.entry.is_dir() {
            for child in &node.children {
                copy_node(store, child, created.id.clone(), None).await?;
            }
        }
        Ok(created.id)
    })
}

/// Deep-copy each subtree under `parent`. Copies are placed one after
/// another from `after + 1`, or appended. A failed copy is reported and
/// the next one still runs. Returns the ids of the top-level copies.
pub async fn duplicate_entries<S, H>(
    store: &S,
    host: &H,
    ids: &[EntryId],
    parent: &EntryId,
    after: Option<usize>,
) -> Vec<EntryId>
where
    S: BookmarkStore + ?Sized,
    H: Host + ?Sized,
{
    let mut copies = Vec::new();
    for id in ids {
        let index = after.map(|after| after + 1 + copies.len());
        let copied = match store.tree(id).await {
            Ok(node) => copy_node(store, &node, parent.clone(), index).await,
            Err(err) => Err(err),
        };
        match copied {
            Ok(copy) => copies.push(copy),
            Err(err) => report(host, "duplicate", id, &err),
        }
    }
    copies
}

/// Write the subtrees of `ids` as a JSON tree, to a `tree.json` download
/// with `to_file`, or to the clipboard.
pub async fn export_artifact<S, H>(store: &S, host: &H, ids: &[EntryId], to_file: bool) -> Result<()>
where
    S: BookmarkStore + ?Sized,
    H: Host + ?Sized,
{
    let items = tree::export(store, ids).await?;
    let json = tree::to_json(&items);
    if to_file {
        host.download(json, "tree.json")
            .await
            .map_err(|err| CommandError::Store(StoreError::Io(err)))?;
    } else {
        host.copy_to_clipboard(json).await;
        host.notify("Exported to the clipboard");
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct DeletePolicy {
    /// Ask again before force-removing a non-empty directory.
    pub confirm_directories: bool,
}

/// Remove every entry. A non-empty directory is removed recursively once
/// the user agrees; otherwise it stays. Returns how many were removed.
pub async fn delete_entries<S, H>(store: &S, host: &H, entries: &[Entry], policy: DeletePolicy) -> usize
where
    S: BookmarkStore + ?Sized,
    H: Host + ?Sized,
{
    let mut removed = 0;
    for entry in entries {
        match store.remove(&entry.id, false).await {
            Ok(()) => removed += 1,
            Err(StoreError::NotEmpty(_)) if entry.is_dir() => {
                let question = format!("\"{}\" directory is not empty. Remove anyway?", entry.title);
                if policy.confirm_directories && !host.confirm(&question).await {
                    log::info!("kept non-empty directory {}", entry.id);
                    continue;
                }
                match store.remove(&entry.id, true).await {
                    Ok(()) => removed += 1,
                    Err(err) => report(host, "remove", &entry.id, &err),
                }
            }
            Err(err) => report(host, "remove", &entry.id, &err),
        }
    }
    removed
}
