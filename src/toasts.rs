pub mod events;
pub mod handle;
pub mod store;
pub mod types;

pub use events::{CloseReason, ToastEvent};
pub use handle::ToastHandle;
pub use store::{Observer, Subscription, ToastStore};
pub use types::{Toast, ToastAction, ToastOptions, ToastVariant};
