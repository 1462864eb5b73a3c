use crate::app::{Commander, Frame};
use crate::entry::EntryId;
use crate::error::{CommandError, Result};
use crate::message::{DropRequest, Invocation, Outcome, Side};
use crate::state::history::PersistedNavigation;
use crate::state::pane::Direction;
use tokio::sync::{mpsc, oneshot};

#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    Invoke(Invocation),
    Drop(DropRequest),
    /// Focus a side, or toggle with `None`.
    Focus(Option<Side>),
    Select(Vec<EntryId>),
    SelectIndex(usize),
    Toggle(EntryId),
    /// Follow the active pane's ".." row.
    Parent,
    /// Pop the active pane's back stack.
    Previous,
    Restore(PersistedNavigation),
    /// Just report the current frame.
    Show,
}

pub struct Reply {
    pub result: Result<Outcome>,
    pub frame: Frame,
}

type Job = (Request, oneshot::Sender<Reply>);

/// Handle to the worker task. Requests run strictly one after another, so
/// a command sent while a batch is in flight waits for it to finish.
#[derive(Clone)]
pub struct CommandQueue {
    tx: mpsc::Sender<Job>,
}

impl CommandQueue {
    pub async fn send(&self, request: Request) -> Option<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send((request, reply_tx)).await.ok()?;
        reply_rx.await.ok()
    }
}

async fn handle(commander: &mut Commander, request: Request) -> Result<Outcome> {
    match request {
        Request::Invoke(invocation) => commander.dispatch(invocation).await,
        Request::Drop(drop) => commander.drop_request(drop).await,
        Request::Focus(side) => {
            commander.focus(side);
            Ok(Outcome::Done)
        }
        Request::Select(ids) => {
            commander.select(&ids);
            Ok(Outcome::Done)
        }
        Request::SelectIndex(index) => {
            commander.select_index(index);
            Ok(Outcome::Done)
        }
        Request::Toggle(id) => {
            commander.toggle(&id);
            Ok(Outcome::Done)
        }
        Request::Parent => commander.open_parent().await,
        Request::Previous => commander.navigate(Direction::Previous).await,
        Request::Restore(state) => commander.restore(&state).await,
        Request::Show => Ok(Outcome::Done),
    }
}

/// Move `commander` onto its own task and return the queue feeding it.
/// Failures are surfaced through the host before the reply goes out;
/// user aborts stay silent.
pub fn spawn_worker(mut commander: Commander) -> CommandQueue {
    let (tx, mut rx) = mpsc::channel::<Job>(16);

    tokio::spawn(async move {
        while let Some((request, reply)) = rx.recv().await {
            let result = handle(&mut commander, request).await;
            match &result {
                Ok(_) | Err(CommandError::UserAborted) => {}
                Err(err) => {
                    log::warn!("request failed: {}", err);
                    commander.host().notify(&err.to_string());
                }
            }
            let frame = commander.frame();
            let _ = reply.send(Reply { result, frame });
        }
        log::debug!("command queue closed");
    });

    CommandQueue { tx }
}
