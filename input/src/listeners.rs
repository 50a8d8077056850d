use std::fmt;

use derive_more::Display;

use crate::GestureLabel;

/// Identifies a registered gesture listener.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
#[display("listener#{_0}")]
pub struct ListenerId(u64);

/// Registry of callbacks that receive every completed gesture.
///
/// Dispatch is synchronous. Listeners are called in registration order, but callers should not
/// depend on that.
#[derive(Default)]
pub struct GestureListeners {
    next_id: u64,
    listeners: Vec<Registration>,
}

struct Registration {
    id: ListenerId,
    callback: Box<dyn FnMut(GestureLabel)>,
}

impl fmt::Debug for GestureListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureListeners")
            .field("listeners", &self.len())
            .finish()
    }
}

impl GestureListeners {
    pub fn subscribe(&mut self, callback: impl FnMut(GestureLabel) + 'static) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push(Registration {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a listener. Returns `false` if it was not registered (anymore).
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|registration| registration.id != id);
        self.listeners.len() != before
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&mut self, label: GestureLabel) {
        for registration in &mut self.listeners {
            (registration.callback)(label);
        }
    }
}
