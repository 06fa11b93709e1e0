//! Subscriber registry for store notifications.
//!
//! # Invariants
//! - Subscribers are notified in registration order.
//! - Channel subscribers whose receiver was dropped are pruned on the next
//!   publish.

use crate::store::snapshot::StoreNotification;
use std::sync::mpsc::{self, Receiver, Sender};

/// Callback invoked synchronously after every accepted mutation.
pub type Listener = Box<dyn FnMut(&StoreNotification) + Send>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

enum Sink {
    Callback(Listener),
    Channel(Sender<StoreNotification>),
}

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Sink)>,
}

impl Subscribers {
    pub(crate) fn add_callback(&mut self, listener: Listener) -> SubscriptionId {
        self.push(Sink::Callback(listener))
    }

    pub(crate) fn add_channel(&mut self) -> (SubscriptionId, Receiver<StoreNotification>) {
        let (tx, rx) = mpsc::channel();
        (self.push(Sink::Channel(tx)), rx)
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Delivers `notification` to every subscriber.
    pub(crate) fn publish(&mut self, notification: &StoreNotification) {
        self.entries.retain_mut(|(_, sink)| match sink {
            Sink::Callback(listener) => {
                listener(notification);
                true
            }
            Sink::Channel(tx) => tx.send(notification.clone()).is_ok(),
        });
    }

    fn push(&mut self, sink: Sink) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, sink));
        id
    }
}
