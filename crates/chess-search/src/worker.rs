//! Background search with a progress stream.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use chess_engine::Position;
use crossbeam_channel::{unbounded, Receiver};
use tracing::info;

use crate::{CancellationToken, SearchConfig, SearchReport, Searcher};

/// Messages from a running search, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Sent every `progress_interval` nodes.
    Progress { nodes: u64, elapsed: Duration },
    /// Sent after each fully searched depth.
    DepthCompleted(SearchReport),
    /// Always the last event of a search.
    Finished(SearchReport),
}

/// A search running on its own thread.
pub struct SearchHandle {
    events: Receiver<SearchEvent>,
    token: CancellationToken,
    thread: JoinHandle<()>,
}

impl SearchHandle {
    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.events
    }

    /// Asks the search to stop. It still sends [`SearchEvent::Finished`].
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Drains the remaining events and returns the final report.
    ///
    /// Returns `None` if the search thread panicked before finishing.
    pub fn wait(self) -> Option<SearchReport> {
        let finished = self.events.iter().find_map(|event| match event {
            SearchEvent::Finished(report) => Some(report),
            _ => None,
        });
        self.thread.join().ok()?;
        finished
    }
}

/// Starts searching `position` on a new thread.
///
/// The position moves into the worker, which owns it for the whole search.
/// Events arrive on [`SearchHandle::events`] and end with exactly one
/// [`SearchEvent::Finished`].
pub fn spawn_search(position: Position, config: SearchConfig, token: CancellationToken) -> SearchHandle {
    let (tx, rx) = unbounded();
    let worker_token = token.clone();

    let thread = thread::spawn(move || {
        let progress_tx = tx.clone();
        let mut searcher = Searcher::new(config)
            .with_token(worker_token)
            .with_progress(move |nodes, elapsed| {
                let _ = progress_tx.send(SearchEvent::Progress { nodes, elapsed });
            });

        let report = searcher.run(&position, |report| {
            let _ = tx.send(SearchEvent::DepthCompleted(report.clone()));
        });

        info!(
            depth = report.depth,
            evaluation = report.evaluation,
            nodes = report.nodes,
            cancelled = report.cancelled,
            "search finished"
        );
        let _ = tx.send(SearchEvent::Finished(report));
    });

    SearchHandle {
        events: rx,
        token,
        thread,
    }
}
