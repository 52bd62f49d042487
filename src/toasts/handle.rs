use std::sync::Weak;

use crate::toasts::{store::ToastStore, types::ToastOptions};

/// Caller-side control for one published toast.
///
/// Holds only the toast's id and a weak reference to the store, so a handle
/// kept around after the toast (or the whole store) is gone degrades to a
/// no-op instead of keeping anything alive.
#[derive(Debug, Clone)]
pub struct ToastHandle {
    id: u64,
    store: Weak<ToastStore>,
}

impl ToastHandle {
    pub(crate) fn new(id: u64, store: Weak<ToastStore>) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Removes this toast immediately. Idempotent.
    pub fn dismiss(&self) {
        if let Some(store) = self.store.upgrade() {
            store.dismiss(self.id);
        }
    }

    /// Merges new content into this toast in place. Dropped silently if the
    /// toast has already been removed.
    pub fn update(&self, options: ToastOptions) {
        if let Some(store) = self.store.upgrade() {
            store.update(self.id, options);
        }
    }
}
