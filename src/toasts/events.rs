use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::toasts::types::Toast;

/// Why a toast left the store. The discriminants follow the freedesktop
/// notification close-reason codes.
#[derive(Serialize_repr, Deserialize_repr, PartialEq, Eq, Debug, Clone, Copy)]
#[repr(u32)]
pub enum CloseReason {
    /// The auto-dismiss timer ran out.
    Expired = 1,

    /// Dismissed by the user (or `dismiss`/`dismiss_all`).
    Dismissed = 2,

    /// Deleted by an explicit `remove` call.
    Removed = 3,
}

/// Mutation events mirrored onto the store's broadcast channel.
///
/// Eviction past the cap is deliberately absent here: an evicted toast simply
/// stops appearing in snapshots, with no closed event.
#[derive(Debug, Clone)]
pub enum ToastEvent {
    Published(Toast),
    Updated(Toast),
    Closed { id: u64, reason: CloseReason },
}
