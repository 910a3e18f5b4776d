//! Synchroner Publish/Subscribe-Kanal.

/// Handle eines Abonnements zum späteren Abmelden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// Event-Bus mit Fan-out an alle Abonnenten in Registrierungsreihenfolge.
///
/// Publish ist synchron und ohne Queue; Abonnenten dürfen nicht blockieren.
pub struct EventBus<E> {
    subscribers: Vec<(SubscriptionId, Handler<E>)>,
    next_id: u64,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Meldet ein Abonnement ab; `false`, wenn es unbekannt war.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    pub fn publish(&mut self, event: &E) {
        for (_, handler) in self.subscribers.iter_mut() {
            handler(event);
        }
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
