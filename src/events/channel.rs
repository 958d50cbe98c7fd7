//! Crossbeam-backed event channel.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{Event, RankEvent, SearchEvent};

/// Engine side of an event channel.
///
/// Cloneable, so rayon workers can report per-candidate progress.
/// Sending never fails: with no receiver attached events are dropped.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { inner: sender }
    }

    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }

    /// Report a ranking event
    pub fn rank(&self, event: RankEvent) {
        self.send(Event::Rank(event));
    }

    /// Report a search event
    pub fn search(&self, event: SearchEvent) {
        self.send(Event::Search(event));
    }

    /// Report a candidate that could not be scored
    pub fn skipped(&self, id: impl ToString, reason: impl Into<String>) {
        self.rank(RankEvent::CandidateSkipped {
            id: id.to_string(),
            reason: reason.into(),
        });
    }
}

/// Front-end side of an event channel
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Next event, or `None` once every sender is gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Drain events until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

pub struct EventChannel;

impl EventChannel {
    /// Open an unbounded channel
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (EventSender::new(sender), EventReceiver { inner: receiver })
    }
}

/// Sender whose receiver is already gone
pub fn null_sender() -> EventSender {
    EventChannel::new().0
}
