use serde::{Deserialize, Serialize};

mod contact;
pub use contact::{ContactDraft, ContactField};

// toasts come in two flavors, and the css class doubles as the styling hook
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Failure,
}

impl NotificationKind {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "error",
        }
    }

    pub fn to_css_color(self) -> &'static str {
        match self {
            Self::Success => "#10b981",
            Self::Failure => "#ef4444",
        }
    }
}
