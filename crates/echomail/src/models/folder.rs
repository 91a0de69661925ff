//! Folders: the named views over the message set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the folder name form for user labels (`label:<id>`)
pub const LABEL_FOLDER_PREFIX: &str = "label:";

/// A mailbox view
///
/// Serializes as its folder name, the same form `parse` accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Folder {
    #[default]
    Inbox,
    Sent,
    Drafts,
    Trash,
    /// Pseudo-folder backed by a user label id
    Label(String),
}

impl Folder {
    /// The folders every account has, in sidebar order
    pub const WELL_KNOWN: [Folder; 4] = [Folder::Inbox, Folder::Sent, Folder::Drafts, Folder::Trash];

    /// Parse a folder name (`inbox`, `sent`, `drafts`, `trash` or `label:<id>`)
    pub fn parse(name: &str) -> Option<Folder> {
        match name {
            "inbox" => Some(Folder::Inbox),
            "sent" => Some(Folder::Sent),
            "drafts" => Some(Folder::Drafts),
            "trash" => Some(Folder::Trash),
            _ => name
                .strip_prefix(LABEL_FOLDER_PREFIX)
                .filter(|id| !id.is_empty())
                .map(|id| Folder::Label(id.to_string())),
        }
    }

    /// Sidebar title
    pub fn title(&self) -> &str {
        match self {
            Folder::Inbox => "Inbox",
            Folder::Sent => "Sent",
            Folder::Drafts => "Drafts",
            Folder::Trash => "Trash",
            Folder::Label(id) => id,
        }
    }

    pub fn is_well_known(&self) -> bool {
        !matches!(self, Folder::Label(_))
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Folder::Inbox => f.write_str("inbox"),
            Folder::Sent => f.write_str("sent"),
            Folder::Drafts => f.write_str("drafts"),
            Folder::Trash => f.write_str("trash"),
            Folder::Label(id) => write!(f, "{}{}", LABEL_FOLDER_PREFIX, id),
        }
    }
}

impl From<Folder> for String {
    fn from(folder: Folder) -> String {
        folder.to_string()
    }
}

impl TryFrom<String> for Folder {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Folder::parse(&name).ok_or_else(|| format!("unknown folder: {:?}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_known() {
        for folder in Folder::WELL_KNOWN {
            assert_eq!(Folder::parse(&folder.to_string()), Some(folder));
        }
    }

    #[test]
    fn test_parse_label_folder() {
        assert_eq!(
            Folder::parse("label:Label_42"),
            Some(Folder::Label("Label_42".to_string()))
        );
        assert_eq!(Folder::parse("label:"), None);
        assert_eq!(Folder::parse("spam"), None);
    }

    #[test]
    fn test_display_label_folder() {
        assert_eq!(Folder::Label("work".to_string()).to_string(), "label:work");
        assert_eq!(Folder::Label("work".to_string()).title(), "work");
    }

    #[test]
    fn test_serde_uses_folder_name() {
        let label = Folder::Label("x".to_string());
        assert_eq!(serde_json::to_string(&label).unwrap(), r#""label:x""#);
        assert_eq!(serde_json::from_str::<Folder>(r#""label:x""#).unwrap(), label);
        assert_eq!(serde_json::to_string(&Folder::Inbox).unwrap(), r#""inbox""#);
        assert_eq!(serde_json::from_str::<Folder>(r#""trash""#).unwrap(), Folder::Trash);

        assert!(serde_json::from_str::<Folder>(r#""spam""#).is_err());
        assert!(serde_json::from_str::<Folder>(r#""label:""#).is_err());
    }
}
