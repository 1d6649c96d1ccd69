use std::cell::RefCell;

/// Holds at most one pending frame callback for the surface setup loop.
#[derive(Debug)]
pub(super) struct TickSlot<T> {
    active: RefCell<Option<T>>,
}

impl<T> Default for TickSlot<T> {
    fn default() -> Self {
        Self {
            active: RefCell::new(None),
        }
    }
}

impl<T> TickSlot<T> {
    pub(super) fn install(&self, id: T, remove: impl FnOnce(T)) {
        let previous = self.active.borrow_mut().replace(id);
        if let Some(previous) = previous {
            remove(previous);
        }
    }

    pub(super) fn cancel(&self, remove: impl FnOnce(T)) {
        let current = self.active.borrow_mut().take();
        if let Some(current) = current {
            remove(current);
        }
    }

    /// The callback stopped itself; its id is no longer valid to remove.
    pub(super) fn settled(&self) {
        self.active.borrow_mut().take();
    }

    #[cfg(test)]
    pub(super) fn is_active(&self) -> bool {
        self.active.borrow().is_some()
    }
}
