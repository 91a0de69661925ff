//! Email model: the normalized, UI-facing message shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::label::{LabelModification, label_ids};

/// A person on an email, with a display name that is never empty when the
/// address has a local part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name (e.g., "John Doe", or "john" when none was supplied)
    pub name: String,
    /// Email address (e.g., "john@example.com")
    pub email: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Parse an address from a string like `John Doe <john@example.com>`
    ///
    /// Without angle brackets the whole string is the address. A missing
    /// display name falls back to the part of the address before `@`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        if let Some(angle_start) = s.find('<')
            && s.ends_with('>')
        {
            let name = s[..angle_start].trim().trim_matches('"').trim();
            let email = s[angle_start + 1..s.len() - 1].trim();
            let name = if name.is_empty() {
                local_part(email)
            } else {
                name
            };
            return Self::new(name, email);
        }

        Self::new(local_part(s), s)
    }

    /// Format as `Name <email>` for display and quoting
    pub fn display(&self) -> String {
        if self.name.is_empty() {
            self.email.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }
}

fn local_part(address: &str) -> &str {
    address.split('@').next().unwrap_or_default()
}

/// Coarse attachment category used for icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Pdf,
    Document,
    File,
}

/// Attachment metadata as shown in the reading pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// Human-readable size, e.g. "12KB" or "Unknown"
    pub size: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
}

/// A normalized email
///
/// Read and starred state are not stored: they are computed from `labels`
/// so they always agree with the provider label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    pub from: Contact,
    pub to: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub snippet: String,
    /// HTML body
    pub body: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl Email {
    /// Create a new email builder
    pub fn builder(id: impl Into<String>) -> EmailBuilder {
        EmailBuilder::new(id.into())
    }

    pub fn is_read(&self) -> bool {
        !self.has_label(label_ids::UNREAD)
    }

    pub fn is_starred(&self) -> bool {
        self.has_label(label_ids::STARRED)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Apply a label change locally, mirroring what the provider does
    pub fn apply_modification(&mut self, modification: &LabelModification) {
        for label in &modification.remove_label_ids {
            self.labels.remove(label);
        }
        for label in &modification.add_label_ids {
            self.labels.insert(label.clone());
        }
    }

    /// Case-insensitive match of subject, sender name and body
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.subject.to_lowercase().contains(&query)
            || self.from.name.to_lowercase().contains(&query)
            || self.body.to_lowercase().contains(&query)
    }
}

/// Builder for creating Email instances
pub struct EmailBuilder {
    id: String,
    thread_id: String,
    from: Contact,
    to: Contact,
    cc: Option<String>,
    subject: String,
    snippet: String,
    body: String,
    timestamp: Option<DateTime<Utc>>,
    attachments: Vec<Attachment>,
    labels: BTreeSet<String>,
}

impl EmailBuilder {
    fn new(id: String) -> Self {
        Self {
            id,
            thread_id: String::new(),
            from: Contact::default(),
            to: Contact::default(),
            cc: None,
            subject: String::new(),
            snippet: String::new(),
            body: String::new(),
            timestamp: None,
            attachments: Vec::new(),
            labels: BTreeSet::new(),
        }
    }

    pub fn thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = thread_id.into();
        self
    }

    pub fn from(mut self, from: Contact) -> Self {
        self.from = from;
        self
    }

    pub fn to(mut self, to: Contact) -> Self {
        self.to = to;
        self
    }

    pub fn cc(mut self, cc: Option<String>) -> Self {
        self.cc = cc;
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Email {
        Email {
            id: self.id,
            thread_id: self.thread_id,
            from: self.from,
            to: self.to,
            cc: self.cc,
            subject: self.subject,
            snippet: self.snippet,
            body: self.body,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            attachments: self.attachments,
            labels: self.labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact_with_name() {
        let contact = Contact::parse("John Doe <john@example.com>");
        assert_eq!(contact.name, "John Doe");
        assert_eq!(contact.email, "john@example.com");
    }

    #[test]
    fn test_parse_contact_without_name() {
        let contact = Contact::parse("john.smith@example.com");
        assert_eq!(contact.name, "john.smith");
        assert_eq!(contact.email, "john.smith@example.com");
    }

    #[test]
    fn test_parse_contact_brackets_only() {
        let contact = Contact::parse("<ops@example.com>");
        assert_eq!(contact.name, "ops");
        assert_eq!(contact.email, "ops@example.com");
    }

    #[test]
    fn test_parse_contact_quoted_name() {
        let contact = Contact::parse("\"Doe, Jane\" <jane@example.com>");
        assert_eq!(contact.name, "Doe, Jane");
        assert_eq!(contact.email, "jane@example.com");
    }

    #[test]
    fn test_parse_contact_empty() {
        let contact = Contact::parse("");
        assert_eq!(contact, Contact::default());
    }

    #[test]
    fn test_read_and_starred_follow_labels() {
        let mut email = Email::builder("m1")
            .labels(["INBOX", "UNREAD"])
            .build();
        assert!(!email.is_read());
        assert!(!email.is_starred());

        email.apply_modification(&LabelModification::mark_read());
        email.apply_modification(&LabelModification::star());
        assert!(email.is_read());
        assert!(email.is_starred());
        assert!(email.has_label("INBOX"));
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let email = Email::builder("m1")
            .from(Contact::new("Sarah Johnson", "sarah@example.com"))
            .subject("Quarterly Report")
            .body("<p>Numbers attached</p>")
            .build();

        assert!(email.matches_search("quarterly"));
        assert!(email.matches_search("SARAH"));
        assert!(email.matches_search("numbers"));
        assert!(email.matches_search("  "));
        assert!(!email.matches_search("invoice"));
    }
}
