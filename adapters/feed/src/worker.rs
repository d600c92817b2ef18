use std::{
    io,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use quakewave_core::{Command, FeedError, FeedQuery, FeedTicket, RawEvent};
use tracing::{debug, warn};

use crate::EventFeed;

/// Outcome of a fetch performed by the worker, tagged with its request ticket.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedReply {
    /// Ticket supplied with the request.
    pub ticket: FeedTicket,
    /// Events returned by the feed or the failure it reported.
    pub outcome: Result<Vec<RawEvent>, FeedError>,
}

impl FeedReply {
    /// Converts the reply into the command that delivers it to the engine.
    #[must_use]
    pub fn into_command(self) -> Command {
        Command::DeliverFeed {
            ticket: self.ticket,
            outcome: self.outcome,
        }
    }
}

/// Runs feed fetches on a dedicated background thread.
///
/// Requests are served in submission order. Replies are collected without
/// blocking through [`FeedWorker::try_recv`], so the frame loop never waits on
/// the network.
#[derive(Debug)]
pub struct FeedWorker {
    requests: Option<Sender<(FeedTicket, FeedQuery)>>,
    replies: Receiver<FeedReply>,
    handle: Option<JoinHandle<()>>,
}

impl FeedWorker {
    /// Spawns the worker thread that owns `feed`.
    pub fn spawn<F>(feed: F) -> io::Result<Self>
    where
        F: EventFeed + Send + 'static,
    {
        let (request_sender, request_receiver) = mpsc::channel::<(FeedTicket, FeedQuery)>();
        let (reply_sender, reply_receiver) = mpsc::channel::<FeedReply>();

        let handle = thread::Builder::new()
            .name("quakewave-feed".to_owned())
            .spawn(move || {
                for (ticket, query) in request_receiver {
                    debug!(generation = ticket.generation(), ?query, "fetching feed");
                    let outcome = feed.fetch(&query);
                    if let Err(error) = &outcome {
                        warn!(%error, ?query, "feed fetch failed");
                    }
                    if reply_sender.send(FeedReply { ticket, outcome }).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests: Some(request_sender),
            replies: reply_receiver,
            handle: Some(handle),
        })
    }

    /// Queues a fetch for `query`.
    pub fn request(&self, ticket: FeedTicket, query: FeedQuery) -> Result<(), FeedError> {
        self.requests
            .as_ref()
            .ok_or_else(|| FeedError::Unavailable("feed worker stopped".to_owned()))?
            .send((ticket, query))
            .map_err(|_| FeedError::Unavailable("feed worker stopped".to_owned()))
    }

    /// Returns a finished reply if one is ready.
    #[must_use]
    pub fn try_recv(&self) -> Option<FeedReply> {
        self.replies.try_recv().ok()
    }

    /// Waits up to `timeout` for the next reply.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FeedReply> {
        match self.replies.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for FeedWorker {
    fn drop(&mut self) {
        drop(self.requests.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("feed worker panicked");
            }
        }
    }
}
