//! Label model representing a provider label and label changes

use serde::{Deserialize, Serialize};

/// Well-known provider label IDs
pub mod label_ids {
    pub const INBOX: &str = "INBOX";
    pub const SENT: &str = "SENT";
    pub const DRAFT: &str = "DRAFT";
    pub const TRASH: &str = "TRASH";
    pub const SPAM: &str = "SPAM";
    pub const STARRED: &str = "STARRED";
    pub const IMPORTANT: &str = "IMPORTANT";
    pub const UNREAD: &str = "UNREAD";
    pub const CHAT: &str = "CHAT";

    /// Prefix shared by the provider's inbox category labels
    pub const CATEGORY_PREFIX: &str = "CATEGORY_";
}

/// Whether a label id is one of the provider's built-in labels
pub fn is_system_label_id(id: &str) -> bool {
    use label_ids::*;
    matches!(
        id,
        INBOX | SENT | DRAFT | TRASH | SPAM | STARRED | IMPORTANT | UNREAD | CHAT
    ) || id.starts_with(CATEGORY_PREFIX)
}

/// Label kind as reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelType {
    System,
    #[default]
    #[serde(other)]
    User,
}

/// A provider label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label ID (e.g., "INBOX", "Label_123")
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub label_type: LabelType,
}

impl Label {
    /// Create a user label
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label_type: LabelType::User,
        }
    }

    /// Create a system label
    pub fn system(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label_type: LabelType::System,
        }
    }

    pub fn is_system(&self) -> bool {
        self.label_type == LabelType::System || is_system_label_id(&self.id)
    }
}

/// Keep only labels a user created, sorted by name
pub fn user_labels(labels: impl IntoIterator<Item = Label>) -> Vec<Label> {
    let mut labels: Vec<Label> = labels.into_iter().filter(|l| !l.is_system()).collect();
    labels.sort_by_key(|l| l.name.to_lowercase());
    labels
}

/// Labels to add to and remove from a message
///
/// This is the single primitive behind read/unread, star, trash, archive
/// and arbitrary label edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelModification {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_label_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_label_ids: Vec<String>,
}

impl LabelModification {
    pub fn add(label: impl Into<String>) -> Self {
        Self {
            add_label_ids: vec![label.into()],
            remove_label_ids: Vec::new(),
        }
    }

    pub fn remove(label: impl Into<String>) -> Self {
        Self {
            add_label_ids: Vec::new(),
            remove_label_ids: vec![label.into()],
        }
    }

    pub fn mark_read() -> Self {
        Self::remove(label_ids::UNREAD)
    }

    pub fn mark_unread() -> Self {
        Self::add(label_ids::UNREAD)
    }

    pub fn star() -> Self {
        Self::add(label_ids::STARRED)
    }

    pub fn unstar() -> Self {
        Self::remove(label_ids::STARRED)
    }

    pub fn trash() -> Self {
        Self::add(label_ids::TRASH)
    }

    pub fn archive() -> Self {
        Self::remove(label_ids::INBOX)
    }

    pub fn is_empty(&self) -> bool {
        self.add_label_ids.is_empty() && self.remove_label_ids.is_empty()
    }
}
