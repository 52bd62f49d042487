use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// A single live toast held by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: ToastVariant,
    pub timestamp: i64,
}

#[derive(Serialize_repr, Deserialize_repr, PartialEq, Eq, Default, Debug, Clone, Copy)]
#[repr(u8)]
pub enum ToastVariant {
    #[default]
    Default = 0,

    Destructive = 1,
}

/// An action the rendering layer may offer on a toast. The store never
/// interprets it; `key` comes back to the caller when the action is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastAction {
    pub key: String,
    pub label: String,
}

/// Content payload for `publish` and `update`. Every field is optional; on
/// update, absent fields leave the existing toast untouched.
#[derive(Debug, Clone, Default)]
pub struct ToastOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: Option<ToastVariant>,
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.action = Some(ToastAction {
            key: key.into(),
            label: label.into(),
        });
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = Some(variant);
        self
    }
}

impl Toast {
    pub(crate) fn from_options(id: u64, options: ToastOptions) -> Self {
        Self {
            id,
            title: options.title,
            description: options.description,
            action: options.action,
            variant: options.variant.unwrap_or_default(),
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Folds an update payload into this toast. The id and creation timestamp
    /// never change.
    pub(crate) fn merge(&mut self, options: ToastOptions) {
        if let Some(title) = options.title {
            self.title = Some(title);
        }
        if let Some(description) = options.description {
            self.description = Some(description);
        }
        if let Some(action) = options.action {
            self.action = Some(action);
        }
        if let Some(variant) = options.variant {
            self.variant = variant;
        }
    }
}
