//! Structural checks run before any move touches the store.
//!
//! The cycle check is shallow: it only looks at the destination pane's
//! current listing (the shown directory's own id and its visible
//! children), never at the full ancestor chain. A directory that is a
//! deeper ancestor of the destination slips through here and is left for
//! the store to refuse.

use crate::entry::EntryId;
use crate::error::Rejection;
use crate::message::Side;
use crate::state::pane::PaneState;

/// Can `candidates` be dropped into `destination`?
///
/// `directory_drop` tells whether any candidate is a directory, and
/// `inside` whether the drop lands on a directory row rather than between
/// rows.
pub fn can_drop_into(
    destination: &PaneState,
    candidates: &[EntryId],
    directory_drop: bool,
    inside: bool,
) -> Result<(), Rejection> {
    if destination.is_root() {
        return Err(Rejection::RootDestination);
    }
    if destination.is_search() && !inside {
        return Err(Rejection::SearchDestination);
    }
    if directory_drop {
        let listing = destination.list();
        if candidates.iter().any(|id| listing.contains(id)) {
            return Err(Rejection::ChildDirectory);
        }
    }
    Ok(())
}

/// Toolbar form of [`can_drop_into`] for moving the selection of pane
/// `source` into `target`, which sits on side `target_side`.
pub fn can_move_between_panes(
    source: Side,
    target_side: Side,
    target: &PaneState,
    candidates: &[EntryId],
    directory_selected: bool,
) -> bool {
    source != target_side && can_drop_into(target, candidates, directory_selected, false).is_ok()
}
