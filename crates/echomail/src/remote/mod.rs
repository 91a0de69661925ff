//! Remote mail provider
//!
//! This module provides:
//! - The `MailService` trait, one method per provider capability
//! - `HttpMailClient`, the HTTP/JSON implementation
//! - `InMemoryMailService`, an in-process provider for tests and demos
//! - Wire types exchanged with the provider

mod client;
mod lenient;
mod memory;
mod sample;
mod traits;

pub use client::HttpMailClient;
pub use memory::InMemoryMailService;
pub use traits::MailService;

pub use api::{
    AccessStatus, Draft, InternalDate, MessagePage, MessageQuery, OutgoingMessage,
    ProviderAttachment, ProviderMessage,
};

/// Provider wire types
pub mod api {
    use serde::{Deserialize, Serialize};

    use super::lenient;

    /// A message as the provider reports it
    ///
    /// Every field is optional on the wire; normalization fills defaults.
    /// A field of the wrong JSON type decodes as absent.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProviderMessage {
        #[serde(default, deserialize_with = "lenient::id")]
        pub id: String,
        #[serde(default, deserialize_with = "lenient::string")]
        pub thread_id: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        pub snippet: Option<String>,
        #[serde(default, deserialize_with = "lenient::string_list")]
        pub label_ids: Option<Vec<String>>,
        #[serde(default, deserialize_with = "lenient::string")]
        pub subject: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        pub from: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        pub to: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        pub cc: Option<String>,
        /// `Date` header, RFC 3339 or RFC 2822
        #[serde(default, deserialize_with = "lenient::string")]
        pub date: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        pub body: Option<String>,
        /// MIME type of `body` ("text/html" or "text/plain")
        #[serde(default, deserialize_with = "lenient::string")]
        pub body_type: Option<String>,
        #[serde(default, deserialize_with = "lenient::attachments")]
        pub attachments: Option<Vec<ProviderAttachment>>,
        #[serde(default, deserialize_with = "lenient::internal_date")]
        pub internal_date: Option<InternalDate>,
    }

    /// Attachment metadata on a provider message
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProviderAttachment {
        #[serde(default, deserialize_with = "lenient::string")]
        pub filename: Option<String>,
        #[serde(default, deserialize_with = "lenient::string")]
        pub mime_type: Option<String>,
        /// Size in bytes
        #[serde(default, deserialize_with = "lenient::size")]
        pub size: Option<u64>,
        #[serde(default, deserialize_with = "lenient::string")]
        pub attachment_id: Option<String>,
    }

    /// Provider receive time, either epoch milliseconds or a date string
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum InternalDate {
        Millis(i64),
        Text(String),
    }

    /// Query for listing or counting messages
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct MessageQuery {
        /// Single provider label id
        pub label_ids: Option<String>,
        /// Free-text search plus provider filter tokens
        pub q: Option<String>,
        pub max_results: Option<u32>,
        /// Opaque continuation token from a previous page
        pub page_token: Option<String>,
    }

    impl MessageQuery {
        pub fn for_label(label: impl Into<String>) -> Self {
            Self {
                label_ids: Some(label.into()),
                ..Self::default()
            }
        }

        pub fn with_q(mut self, q: impl Into<String>) -> Self {
            let q = q.into();
            self.q = if q.trim().is_empty() { None } else { Some(q) };
            self
        }

        pub fn with_max_results(mut self, max_results: u32) -> Self {
            self.max_results = Some(max_results);
            self
        }

        pub fn with_page_token(mut self, page_token: Option<String>) -> Self {
            self.page_token = page_token;
            self
        }

        /// Same query without paging, used for counting
        pub fn without_paging(&self) -> Self {
            Self {
                label_ids: self.label_ids.clone(),
                q: self.q.clone(),
                max_results: None,
                page_token: None,
            }
        }

        /// URL query pairs in provider naming, absent fields omitted
        pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
            let mut pairs = Vec::new();
            if let Some(label_ids) = &self.label_ids {
                pairs.push(("labelIds", label_ids.clone()));
            }
            if let Some(q) = &self.q {
                pairs.push(("q", q.clone()));
            }
            if let Some(max_results) = self.max_results {
                pairs.push(("maxResults", max_results.to_string()));
            }
            if let Some(page_token) = &self.page_token {
                pairs.push(("pageToken", page_token.clone()));
            }
            pairs
        }
    }

    /// One page of listed messages
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct MessagePage {
        pub messages: Vec<ProviderMessage>,
        pub next_page_token: Option<String>,
    }

    /// Result of the access check
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AccessStatus {
        pub has_access: bool,
        /// Server explanation, mostly present when access is missing
        pub reason: Option<String>,
        /// Provider profile, passed through untouched
        pub profile: Option<serde_json::Value>,
    }

    /// Fields of a message to send or save as draft
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OutgoingMessage {
        pub to: String,
        pub subject: String,
        /// HTML body
        pub body: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub cc: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub bcc: Option<String>,
    }

    /// A saved draft
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Draft {
        #[serde(default)]
        pub id: String,
        pub message: Option<ProviderMessage>,
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_query_pairs_omit_absent_fields() {
            let query = MessageQuery::for_label("INBOX").with_max_results(10);
            assert_eq!(
                query.to_query_pairs(),
                vec![("labelIds", "INBOX".to_string()), ("maxResults", "10".to_string())]
            );
            assert!(MessageQuery::default().to_query_pairs().is_empty());
        }

        #[test]
        fn test_blank_q_is_dropped() {
            let query = MessageQuery::for_label("SENT").with_q("   ");
            assert_eq!(query.q, None);
        }

        #[test]
        fn test_without_paging_keeps_filters() {
            let query = MessageQuery::for_label("INBOX")
                .with_q("is:unread")
                .with_max_results(10)
                .with_page_token(Some("abc".to_string()));
            let count = query.without_paging();
            assert_eq!(count.label_ids.as_deref(), Some("INBOX"));
            assert_eq!(count.q.as_deref(), Some("is:unread"));
            assert_eq!(count.max_results, None);
            assert_eq!(count.page_token, None);
        }

        #[test]
        fn test_provider_message_tolerates_nulls_and_number_dates() {
            let msg: ProviderMessage = serde_json::from_str(
                r#"{
                    "id": "m1",
                    "labelIds": null,
                    "subject": null,
                    "internalDate": 1714550400000,
                    "attachments": [{"filename": "a.png", "mimeType": "image/png", "size": 2048}]
                }"#,
            )
            .unwrap();

            assert_eq!(msg.id, "m1");
            assert_eq!(msg.label_ids, None);
            assert_eq!(msg.internal_date, Some(InternalDate::Millis(1714550400000)));
            assert_eq!(msg.attachments.unwrap()[0].size, Some(2048));
        }

        #[test]
        fn test_outgoing_message_skips_empty_copies() {
            let msg = OutgoingMessage {
                to: "a@example.com".to_string(),
                subject: "Hi".to_string(),
                body: "<p>Hello</p>".to_string(),
                cc: None,
                bcc: Some("b@example.com".to_string()),
            };
            let json = serde_json::to_value(&msg).unwrap();
            assert_eq!(
                json,
                serde_json::json!({
                    "to": "a@example.com",
                    "subject": "Hi",
                    "body": "<p>Hello</p>",
                    "bcc": "b@example.com"
                })
            );
        }
    }
}
