//! In-process toast notification store.
//!
//! Holds the set of currently visible toasts for one process as a capped,
//! newest-first sequence, with synchronous observer fan-out on every change
//! and automatic expiry on a timer. Rendering is someone else's job.
//! Subscribers get the full ordered snapshot after each mutation and draw it
//! however they like.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chime::{ToastOptions, ToastStore, ToastVariant};
//!
//! let store = Arc::new(ToastStore::default());
//!
//! let subscription = store.subscribe(|toasts| {
//!     println!("{} active toast(s)", toasts.len());
//! });
//!
//! let handle = store.publish(
//!     ToastOptions::new()
//!         .title("import failed")
//!         .description("3 rows were missing a customer id")
//!         .variant(ToastVariant::Destructive),
//! );
//!
//! handle.dismiss();
//! subscription.unsubscribe();
//! ```

pub mod settings;
pub mod toasts;

pub use toasts::{
    CloseReason, Subscription, Toast, ToastAction, ToastEvent, ToastHandle, ToastOptions,
    ToastStore, ToastVariant,
};
