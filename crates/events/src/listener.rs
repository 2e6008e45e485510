//! Explicit, in-process change listeners.
//!
//! Listeners are registered on the owner of the state and invoked synchronously,
//! in registration order, for every event the owner applies. Delivery is
//! exactly-once and ordered because there is no transport in between.

/// Receives events from the component it is registered on.
pub trait Listener<E> {
    fn on_event(&mut self, event: &E);
}

impl<E, F> Listener<E> for F
where
    F: FnMut(&E),
{
    fn on_event(&mut self, event: &E) {
        self(event)
    }
}

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of listeners for one event type.
pub struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn Listener<E>>)>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: Listener<E> + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the id was not (or no longer) registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, listener) in &mut self.entries {
            listener.on_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> core::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("registered", &self.entries.len())
            .finish()
    }
}
