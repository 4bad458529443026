use core::fmt;

use super::ReaderState;

pub type Observer = Box<dyn FnMut(&ReaderState) + Send>;

/// Handle returned by [`ReaderEngine::subscribe`](super::ReaderEngine::subscribe).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Subscription(u64);

/// Registered observers, kept in registration order.
#[derive(Default)]
pub(super) struct Observers {
    next_id: u64,
    entries: Vec<(Subscription, Observer)>,
}

impl Observers {
    pub(super) fn add(&mut self, observer: Observer) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((subscription, observer));
        subscription
    }

    pub(super) fn remove(&mut self, subscription: Subscription) -> bool {
        let Some(position) = self
            .entries
            .iter()
            .position(|(candidate, _)| *candidate == subscription)
        else {
            return false;
        };

        self.entries.remove(position);
        true
    }

    pub(super) fn notify(&mut self, state: &ReaderState) {
        for (_, observer) in &mut self.entries {
            observer(state);
        }
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
