use peerchess_core::SessionMessage;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle returned by [`ListenerRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Arc<Mutex<Box<dyn FnMut(&SessionMessage) + Send>>>;

struct Entry {
    id: ListenerId,
    once: bool,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Ordered list of data listeners.
///
/// Cloning shares the list, so a callback may hold a clone and add or remove
/// listeners while being dispatched. Such changes apply from the next pass:
/// every dispatch iterates a snapshot taken when it started.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; one-shot listeners are removed after their first call
    pub fn add<F>(&self, once: bool, callback: F) -> ListenerId
    where
        F: FnMut(&SessionMessage) + Send + 'static,
    {
        let mut registry = self.lock();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            once,
            callback: Arc::new(Mutex::new(Box::new(callback))),
        });
        id
    }

    /// Returns whether the listener was still registered
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut registry = self.lock();
        let before = registry.entries.len();
        registry.entries.retain(|entry| entry.id != id);
        registry.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Invoke every listener registered when the pass starts, in registration
    /// order. Returns how many were invoked.
    pub fn dispatch(&self, message: &SessionMessage) -> usize {
        let snapshot: Vec<(ListenerId, bool, Callback)> = self
            .lock()
            .entries
            .iter()
            .map(|entry| (entry.id, entry.once, Arc::clone(&entry.callback)))
            .collect();

        let mut fired_once = HashSet::new();
        for (id, once, callback) in &snapshot {
            let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
            (*callback)(message);
            if *once {
                fired_once.insert(*id);
            }
        }

        if !fired_once.is_empty() {
            self.lock()
                .entries
                .retain(|entry| !fired_once.contains(&entry.id));
        }

        snapshot.len()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> SessionMessage {
        SessionMessage::MediaRequestComplete { has_media: true }
    }

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, ListenerRegistry) {
        (Arc::new(Mutex::new(Vec::new())), ListenerRegistry::new())
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let (log, registry) = recorder();
        for name in ["a", "b", "c"] {
            let log = log.clone();
            registry.add(false, move |_| log.lock().unwrap().push(name));
        }

        assert_eq!(registry.dispatch(&message()), 3);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_once_listener_fires_exactly_once() {
        let (log, registry) = recorder();
        let once_log = log.clone();
        registry.add(true, move |_| once_log.lock().unwrap().push("once"));
        let keep_log = log.clone();
        registry.add(false, move |_| keep_log.lock().unwrap().push("keep"));

        registry.dispatch(&message());
        registry.dispatch(&message());

        assert_eq!(*log.lock().unwrap(), vec!["once", "keep", "keep"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_listener_added_during_dispatch_waits_for_next_pass() {
        let (log, registry) = recorder();
        let handle = registry.clone();
        let outer_log = log.clone();
        registry.add(true, move |_| {
            outer_log.lock().unwrap().push("outer");
            let inner_log = outer_log.clone();
            handle.add(false, move |_| inner_log.lock().unwrap().push("inner"));
        });

        assert_eq!(registry.dispatch(&message()), 1);
        assert_eq!(*log.lock().unwrap(), vec!["outer"]);

        registry.dispatch(&message());
        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[test]
    fn test_removal_during_dispatch_applies_next_pass() {
        let (log, registry) = recorder();
        let handle = registry.clone();
        let victim: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let remover_victim = victim.clone();
        let remover_log = log.clone();
        registry.add(false, move |_| {
            remover_log.lock().unwrap().push("remover");
            if let Some(id) = remover_victim.lock().unwrap().take() {
                handle.remove(id);
            }
        });
        let victim_log = log.clone();
        let id = registry.add(false, move |_| victim_log.lock().unwrap().push("victim"));
        *victim.lock().unwrap() = Some(id);

        registry.dispatch(&message());
        registry.dispatch(&message());

        assert_eq!(
            *log.lock().unwrap(),
            vec!["remover", "victim", "remover"]
        );
    }

    #[test]
    fn test_remove_unknown_listener() {
        let registry = ListenerRegistry::new();
        let id = registry.add(false, |_| {});
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }
}
