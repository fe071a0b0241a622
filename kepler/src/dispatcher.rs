//! Camera change notifications.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::transition::TransitionReason;

/// Notified once per frame in which the camera was moved.
pub trait OnCameraChangedListener {
    /// Camera position changed.
    fn on_camera_changed(&self);
}

impl<T: Fn()> OnCameraChangedListener for T {
    fn on_camera_changed(&self) {
        self()
    }
}

/// Notified about the start and the end of camera movement.
pub trait CameraEventListener {
    /// The camera started moving while it was idle.
    fn on_move_started(&self, _reason: TransitionReason) {}
    /// A running transition was canceled.
    fn on_move_canceled(&self) {}
    /// No transitions are running or queued anymore.
    fn on_idle(&self) {}
}

/// Identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Copy-on-write list of listeners.
///
/// Dispatch iterates over a snapshot of the list, so listeners can be added or removed from
/// inside a notification. Such changes take effect from the next dispatch.
pub struct ListenerRegistry<L: ?Sized> {
    inner: Arc<RwLock<RegistryInner<L>>>,
}

struct RegistryInner<L: ?Sized> {
    next_id: u64,
    listeners: Arc<Vec<(ListenerId, Arc<L>)>>,
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                next_id: 0,
                listeners: Arc::new(Vec::new()),
            })),
        }
    }
}

impl<L: ?Sized> Clone for ListenerRegistry<L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<L: ?Sized> ListenerRegistry<L> {
    /// Adds a listener to the end of the list.
    pub fn add(&self, listener: Arc<L>) -> ListenerId {
        let mut inner = self.inner.write();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;

        let mut listeners = inner.listeners.as_ref().clone();
        listeners.push((id, listener));
        inner.listeners = Arc::new(listeners);

        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.write();
        if !inner.listeners.iter().any(|(listener_id, _)| *listener_id == id) {
            return false;
        }

        let listeners = inner
            .listeners
            .iter()
            .filter(|(listener_id, _)| *listener_id != id)
            .cloned()
            .collect();
        inner.listeners = Arc::new(listeners);

        true
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.read().listeners.len()
    }

    /// Returns `true` if there are no listeners.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `f` for every listener registered at the moment of the call.
    pub fn for_each(&self, mut f: impl FnMut(&L)) {
        let snapshot = self.inner.read().listeners.clone();
        for (_, listener) in snapshot.iter() {
            f(listener);
        }
    }
}

/// Fans camera notifications out to the registered listeners.
///
/// The dispatcher is cheap to clone, all clones share the same listeners.
#[derive(Clone, Default)]
pub struct CameraChangeDispatcher {
    changed: ListenerRegistry<dyn OnCameraChangedListener>,
    events: ListenerRegistry<dyn CameraEventListener>,
}

impl CameraChangeDispatcher {
    /// Registers a listener notified once per frame in which the camera moved.
    pub fn add_on_camera_changed_listener(
        &self,
        listener: impl OnCameraChangedListener + 'static,
    ) -> ListenerId {
        self.changed.add(Arc::new(listener))
    }

    /// Unregisters a camera changed listener.
    pub fn remove_on_camera_changed_listener(&self, id: ListenerId) -> bool {
        self.changed.remove(id)
    }

    /// Registers a listener of camera movement start, cancellation and idle events.
    pub fn add_camera_event_listener(
        &self,
        listener: impl CameraEventListener + 'static,
    ) -> ListenerId {
        self.events.add(Arc::new(listener))
    }

    /// Unregisters a camera event listener.
    pub fn remove_camera_event_listener(&self, id: ListenerId) -> bool {
        self.events.remove(id)
    }

    pub(crate) fn camera_changed(&self) {
        self.changed.for_each(|l| l.on_camera_changed());
    }

    pub(crate) fn move_started(&self, reason: TransitionReason) {
        self.events.for_each(|l| l.on_move_started(reason));
    }

    pub(crate) fn move_canceled(&self) {
        self.events.for_each(|l| l.on_move_canceled());
    }

    pub(crate) fn idle(&self) {
        self.events.for_each(|l| l.on_idle());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    #[test]
    fn listeners_are_called_in_registration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let dispatcher = CameraChangeDispatcher::default();

        let first = calls.clone();
        dispatcher.add_on_camera_changed_listener(move || first.borrow_mut().push(1));
        let second = calls.clone();
        dispatcher.add_on_camera_changed_listener(move || second.borrow_mut().push(2));

        dispatcher.camera_changed();
        assert_eq!(*calls.borrow(), [1, 2]);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let count = Rc::new(Cell::new(0));
        let dispatcher = CameraChangeDispatcher::default();

        let counter = count.clone();
        let id = dispatcher.add_on_camera_changed_listener(move || counter.set(counter.get() + 1));
        dispatcher.camera_changed();
        assert!(dispatcher.remove_on_camera_changed_listener(id));
        assert!(!dispatcher.remove_on_camera_changed_listener(id));
        dispatcher.camera_changed();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_can_unregister_itself_during_dispatch() {
        let registry: ListenerRegistry<dyn OnCameraChangedListener> = ListenerRegistry::default();
        let count = Rc::new(Cell::new(0));
        let own_id = Rc::new(Cell::new(None));

        let inner_registry = registry.clone();
        let inner_count = count.clone();
        let inner_id = own_id.clone();
        let id = registry.add(Arc::new(move || {
            inner_count.set(inner_count.get() + 1);
            if let Some(id) = inner_id.get() {
                inner_registry.remove(id);
            }
        }));
        own_id.set(Some(id));

        registry.for_each(|l| l.on_camera_changed());
        registry.for_each(|l| l.on_camera_changed());

        assert_eq!(count.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn listener_added_during_dispatch_waits_for_next_one() {
        let registry: ListenerRegistry<dyn OnCameraChangedListener> = ListenerRegistry::default();
        let count = Rc::new(Cell::new(0));

        let inner_registry = registry.clone();
        let inner_count = count.clone();
        registry.add(Arc::new(move || {
            let counter = inner_count.clone();
            inner_registry.add(Arc::new(move || counter.set(counter.get() + 1)));
        }));

        registry.for_each(|l| l.on_camera_changed());
        assert_eq!(count.get(), 0);
        assert_eq!(registry.len(), 2);

        registry.for_each(|l| l.on_camera_changed());
        assert_eq!(count.get(), 1);
    }
}
