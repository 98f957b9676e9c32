use mapscale_protocol::{ScaleChange, ScaleField, ScaleState};

/// Callback invoked with one field change and the full state it belongs to.
pub type ScaleObserver = Box<dyn FnMut(&ScaleChange, &ScaleState)>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    /// `None` receives every field.
    field: Option<ScaleField>,
    callback: ScaleObserver,
}

/// Registry of change observers, notified in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `field`, or for every field when `None`.
    pub fn subscribe(&mut self, field: Option<ScaleField>, callback: ScaleObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            field,
            callback,
        });
        log::trace!("observer {id:?} subscribed to {field:?}");
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver each change to the observers interested in its field.
    ///
    /// `state` is the already-published state, so every observer sees all
    /// three fields in their new values no matter which change it handles.
    pub fn notify(&mut self, changes: &[ScaleChange], state: &ScaleState) {
        for change in changes {
            let field = change.field();
            for subscriber in &mut self.subscribers {
                if subscriber.field.is_none_or(|f| f == field) {
                    (subscriber.callback)(change, state);
                }
            }
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
