//! List filter options and ordering

use serde::{Deserialize, Serialize};

use super::Email;

/// Provider search token selecting unread messages
pub const UNREAD_QUERY_TOKEN: &str = "is:unread";
/// Provider search token selecting messages with attachments
pub const ATTACHMENT_QUERY_TOKEN: &str = "has:attachment";

/// Ordering of the message list by timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Toggles from the filter menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub unread_only: bool,
    pub has_attachments: bool,
    pub sort_by: SortOrder,
}

impl FilterOptions {
    /// Provider search tokens for the active toggles
    pub fn query_tokens(&self) -> Vec<&'static str> {
        let mut tokens = Vec::new();
        if self.unread_only {
            tokens.push(UNREAD_QUERY_TOKEN);
        }
        if self.has_attachments {
            tokens.push(ATTACHMENT_QUERY_TOKEN);
        }
        tokens
    }

    /// Whether an email passes the toggles (ordering is not a filter)
    pub fn matches(&self, email: &Email) -> bool {
        (!self.unread_only || !email.is_read()) && (!self.has_attachments || email.has_attachments())
    }
}

/// Sort emails by timestamp in place
///
/// The sort is stable, so emails with equal timestamps keep provider order.
pub fn sort_emails(emails: &mut [Email], order: SortOrder) {
    match order {
        SortOrder::Newest => emails.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => emails.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
    }
}

/// Apply toggles, search text and ordering to a full folder listing
pub fn filter_emails(emails: Vec<Email>, options: &FilterOptions, search: &str) -> Vec<Email> {
    let mut emails: Vec<Email> = emails
        .into_iter()
        .filter(|e| options.matches(e) && e.matches_search(search))
        .collect();
    sort_emails(&mut emails, options.sort_by);
    emails
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, AttachmentKind};
    use chrono::{Duration, TimeZone, Utc};

    fn email_at(id: &str, hours: i64, labels: &[&str]) -> Email {
        let base = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        Email::builder(id)
            .subject(format!("Subject {}", id))
            .timestamp(base + Duration::hours(hours))
            .labels(labels.iter().copied())
            .build()
    }

    fn ids(emails: &[Email]) -> Vec<&str> {
        emails.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_sort_newest_and_oldest() {
        let mut emails = vec![email_at("t2", 2, &[]), email_at("t1", 1, &[]), email_at("t3", 3, &[])];

        sort_emails(&mut emails, SortOrder::Newest);
        assert_eq!(ids(&emails), vec!["t3", "t2", "t1"]);

        sort_emails(&mut emails, SortOrder::Oldest);
        assert_eq!(ids(&emails), vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_query_tokens() {
        assert!(FilterOptions::default().query_tokens().is_empty());

        let options = FilterOptions {
            unread_only: true,
            has_attachments: true,
            sort_by: SortOrder::Oldest,
        };
        assert_eq!(options.query_tokens(), vec!["is:unread", "has:attachment"]);
    }

    #[test]
    fn test_filter_emails_applies_toggles_and_search() {
        let mut with_file = email_at("a", 1, &["UNREAD"]);
        with_file.attachments.push(Attachment {
            name: "q2.pdf".to_string(),
            size: "12KB".to_string(),
            kind: AttachmentKind::Pdf,
        });
        let emails = vec![with_file, email_at("b", 2, &["UNREAD"]), email_at("c", 3, &[])];

        let unread = FilterOptions {
            unread_only: true,
            ..FilterOptions::default()
        };
        assert_eq!(ids(&filter_emails(emails.clone(), &unread, "")), vec!["b", "a"]);

        let attachments = FilterOptions {
            has_attachments: true,
            ..FilterOptions::default()
        };
        assert_eq!(ids(&filter_emails(emails.clone(), &attachments, "")), vec!["a"]);

        assert_eq!(
            ids(&filter_emails(emails, &FilterOptions::default(), "subject c")),
            vec!["c"]
        );
    }

    #[test]
    fn test_filter_options_serde_names() {
        let json = serde_json::to_value(FilterOptions::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "unreadOnly": false, "hasAttachments": false, "sortBy": "newest" })
        );
    }
}
