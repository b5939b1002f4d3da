//! Selection controller: turns user selections into fetches and render
//! messages, guaranteeing that the most recent selection wins.

use crate::activity::client::FetchActivities;
use crate::activity::Activity;
use crate::error::FetchError;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::future::{Fuse, FusedFuture, FutureExt, LocalBoxFuture};
use futures::{select, StreamExt};
use log::{debug, error, info};
use std::sync::mpsc::Sender;

/// A user selection: the selected activity identifier, tagged with its
/// position in the sequence of selection events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Position of this selection in the sequence of selection events.
    pub generation: u64,
    /// Identifier of the selected activity.
    pub id: String,
}

/// Message sent from the controller to the UI thread.
pub enum UiMessage {
    /// A fetched activity, ready to render.
    Activity {
        /// Generation of the selection this activity answers.
        generation: u64,
        /// Identifier of the activity.
        id: String,
        /// The validated activity record.
        activity: Activity,
    },
}

/// Sending side of the selection channel, for the UI to submit selections.
pub struct SelectionSender {
    tx: UnboundedSender<Selection>,
    generation: u64,
}

impl SelectionSender {
    /// Submits a selection for the given activity identifier.
    ///
    /// The empty identifier is the "no selection" sentinel and is ignored.
    pub fn select(&mut self, id: &str) {
        if id.is_empty() {
            return;
        }
        self.generation += 1;
        let selection = Selection {
            generation: self.generation,
            id: id.to_owned(),
        };
        if self.tx.unbounded_send(selection).is_err() {
            error!("Selection channel closed, dropping selection");
        }
    }
}

/// Constructs a channel to communicate [`Selection`]s.
pub fn selection_channel() -> (SelectionSender, UnboundedReceiver<Selection>) {
    let (tx, rx) = unbounded();
    (SelectionSender { tx, generation: 0 }, rx)
}

/// Processes selections until the channel closes: fetches each selected
/// activity and forwards the result to the UI channel.
///
/// At most one fetch is in flight at a time. A newer selection replaces the
/// pending fetch future, cancelling it, so a stale result can never overwrite
/// a fresher render. Failed fetches are logged and dropped, leaving whatever
/// the UI currently displays undisturbed.
pub async fn selection_loop<F: FetchActivities>(
    fetcher: &F,
    ui_tx: &Sender<UiMessage>,
    selection_rx: UnboundedReceiver<Selection>,
) {
    let mut selections = selection_rx.fuse();
    let mut pending: Fuse<LocalBoxFuture<'_, (Selection, Result<Activity, FetchError>)>> =
        Fuse::terminated();

    loop {
        select! {
            selection = selections.next() => match selection {
                Some(selection) => {
                    if !pending.is_terminated() {
                        debug!("Cancelling in-flight fetch for a newer selection");
                    }
                    pending = fetch_one(fetcher, selection).boxed_local().fuse();
                }
                None => {
                    if pending.is_terminated() {
                        break;
                    }
                }
            },
            completed = pending => {
                let (selection, result) = completed;
                match result {
                    Ok(activity) => {
                        let msg = UiMessage::Activity {
                            generation: selection.generation,
                            id: selection.id,
                            activity,
                        };
                        if ui_tx.send(msg).is_err() {
                            error!("UI channel closed, stopping the selection loop");
                            break;
                        }
                    }
                    Err(e) => error!("Failed to fetch activity {}: {e}", selection.id),
                }
                if selections.is_done() {
                    break;
                }
            },
        }
    }
    info!("End of selection loop");
}

/// Fetches one activity, tagging the result with the selection it answers.
async fn fetch_one<F: FetchActivities>(
    fetcher: &F,
    selection: Selection,
) -> (Selection, Result<Activity, FetchError>) {
    let result = fetcher.fetch(&selection.id).await;
    (selection, result)
}
