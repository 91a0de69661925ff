//! Provider response normalization
//!
//! Converts provider messages to the local [`Email`] shape and maps between
//! folders and provider labels. Everything here is total: missing or
//! malformed fields fall back to defaults instead of failing.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Attachment, AttachmentKind, Contact, Email, Folder, label_ids};
use crate::remote::{InternalDate, ProviderAttachment, ProviderMessage};

/// Subject shown for messages without one
pub const NO_SUBJECT: &str = "(no subject)";

/// Normalize a provider message to an Email
pub fn to_local_email(msg: &ProviderMessage) -> Email {
    let labels = msg.label_ids.clone().unwrap_or_default();

    let subject = msg
        .subject
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_SUBJECT);

    let attachments = msg
        .attachments
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(to_local_attachment)
        .collect();

    Email::builder(&msg.id)
        .thread_id(msg.thread_id.clone().unwrap_or_default())
        .from(Contact::parse(msg.from.as_deref().unwrap_or_default()))
        .to(Contact::parse(msg.to.as_deref().unwrap_or_default()))
        .cc(msg.cc.clone().filter(|cc| !cc.trim().is_empty()))
        .subject(subject)
        .snippet(decode_html_entities(msg.snippet.as_deref().unwrap_or_default()))
        .body(normalize_body(msg.body.as_deref(), msg.body_type.as_deref()))
        .timestamp(resolve_timestamp(msg.date.as_deref(), msg.internal_date.as_ref()))
        .attachments(attachments)
        .labels(labels)
        .build()
}

/// Provider label id for a folder
///
/// Custom labels are upper-cased, so a mixed-case label id does not survive
/// a round trip through [`provider_label_to_folder`].
pub fn folder_to_provider_label(folder: &Folder) -> String {
    match folder {
        Folder::Inbox => label_ids::INBOX.to_string(),
        Folder::Sent => label_ids::SENT.to_string(),
        Folder::Drafts => label_ids::DRAFT.to_string(),
        Folder::Trash => label_ids::TRASH.to_string(),
        Folder::Label(id) => id.to_uppercase(),
    }
}

/// Folder for a provider label id (custom labels are lower-cased)
pub fn provider_label_to_folder(label: &str) -> Folder {
    match label {
        label_ids::INBOX => Folder::Inbox,
        label_ids::SENT => Folder::Sent,
        label_ids::DRAFT => Folder::Drafts,
        label_ids::TRASH => Folder::Trash,
        other => Folder::Label(other.to_lowercase()),
    }
}

/// Classify an attachment from its MIME type
pub fn classify_attachment(mime_type: Option<&str>) -> AttachmentKind {
    let Some(mime) = mime_type.map(str::to_lowercase) else {
        return AttachmentKind::File;
    };

    if mime.contains("image") {
        AttachmentKind::Image
    } else if mime.contains("pdf") {
        AttachmentKind::Pdf
    } else if ["document", "word", "text"].iter().any(|k| mime.contains(k)) {
        AttachmentKind::Document
    } else {
        AttachmentKind::File
    }
}

/// Render a byte count as whole kilobytes ("12KB"), or "Unknown"
pub fn format_attachment_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) if bytes > 0 => format!("{}KB", (bytes as f64 / 1024.0).round() as u64),
        _ => "Unknown".to_string(),
    }
}

fn to_local_attachment(attachment: &ProviderAttachment) -> Attachment {
    Attachment {
        name: attachment
            .filename
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "attachment".to_string()),
        size: format_attachment_size(attachment.size),
        kind: classify_attachment(attachment.mime_type.as_deref()),
    }
}

/// Pick the message time: `date` header, then internal date, then now
fn resolve_timestamp(date: Option<&str>, internal_date: Option<&InternalDate>) -> DateTime<Utc> {
    date.and_then(parse_date_string)
        .or_else(|| internal_date.and_then(parse_internal_date))
        .unwrap_or_else(Utc::now)
}

fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn parse_internal_date(internal_date: &InternalDate) -> Option<DateTime<Utc>> {
    match internal_date {
        InternalDate::Millis(millis) => Utc.timestamp_millis_opt(*millis).single(),
        InternalDate::Text(text) => match text.trim().parse::<i64>() {
            Ok(millis) => Utc.timestamp_millis_opt(millis).single(),
            Err(_) => parse_date_string(text),
        },
    }
}

/// HTML bodies pass through; plain text is escaped and line breaks kept
fn normalize_body(body: Option<&str>, body_type: Option<&str>) -> String {
    let body = body.unwrap_or_default();
    let is_plain = body_type.is_some_and(|t| t.to_lowercase().starts_with("text/plain"));
    if !is_plain {
        return body.to_string();
    }
    escape_html(body).replace("\r\n", "\n").replace('\n', "<br>")
}

/// Escape text for embedding in HTML
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Decode HTML entities in snippet text
fn decode_html_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str) -> ProviderMessage {
        ProviderMessage {
            id: id.to_string(),
            ..ProviderMessage::default()
        }
    }

    #[test]
    fn test_read_is_negated_unread_label() {
        let mut msg = message("m1");
        msg.label_ids = Some(vec!["INBOX".to_string(), "UNREAD".to_string()]);
        assert!(!to_local_email(&msg).is_read());

        msg.label_ids = Some(vec!["INBOX".to_string()]);
        assert!(to_local_email(&msg).is_read());

        msg.label_ids = None;
        assert!(to_local_email(&msg).is_read());
    }

    #[test]
    fn test_starred_from_label() {
        let mut msg = message("m1");
        msg.label_ids = Some(vec!["STARRED".to_string()]);
        let email = to_local_email(&msg);
        assert!(email.is_starred());
        assert!(email.labels.contains("STARRED"));
    }

    #[test]
    fn test_sender_without_display_name() {
        let mut msg = message("m1");
        msg.from = Some("alerts@bank.example".to_string());
        msg.to = Some("Me <me@example.com>".to_string());
        let email = to_local_email(&msg);
        assert_eq!(email.from.name, "alerts");
        assert_eq!(email.from.email, "alerts@bank.example");
        assert_eq!(email.to.name, "Me");
        assert_eq!(email.to.email, "me@example.com");
    }

    #[test]
    fn test_empty_subject_placeholder() {
        let mut msg = message("m1");
        assert_eq!(to_local_email(&msg).subject, NO_SUBJECT);
        msg.subject = Some("  ".to_string());
        assert_eq!(to_local_email(&msg).subject, NO_SUBJECT);
        msg.subject = Some("Lunch?".to_string());
        assert_eq!(to_local_email(&msg).subject, "Lunch?");
    }

    #[test]
    fn test_subject_whitespace_preserved() {
        let mut msg = message("m1");
        msg.subject = Some("  Hi ".to_string());
        assert_eq!(to_local_email(&msg).subject, "  Hi ");
    }

    #[test]
    fn test_timestamp_precedence() {
        let mut msg = message("m1");
        msg.date = Some("Tue, 14 May 2024 09:30:00 +0200".to_string());
        msg.internal_date = Some(InternalDate::Text("1700000000000".to_string()));
        assert_eq!(
            to_local_email(&msg).timestamp.to_rfc3339(),
            "2024-05-14T07:30:00+00:00"
        );

        msg.date = Some("garbage".to_string());
        assert_eq!(
            to_local_email(&msg).timestamp.timestamp_millis(),
            1_700_000_000_000
        );

        msg.internal_date = Some(InternalDate::Millis(1_600_000_000_000));
        assert_eq!(
            to_local_email(&msg).timestamp.timestamp_millis(),
            1_600_000_000_000
        );

        msg.date = None;
        msg.internal_date = None;
        let before = Utc::now();
        assert!(to_local_email(&msg).timestamp >= before);
    }

    #[test]
    fn test_timestamp_serializes_as_iso8601() {
        let mut msg = message("m1");
        msg.date = Some("2024-05-14T07:30:00Z".to_string());
        let json = serde_json::to_value(to_local_email(&msg)).unwrap();
        assert_eq!(json["timestamp"], "2024-05-14T07:30:00Z");
    }

    #[test]
    fn test_attachments() {
        let mut msg = message("m1");
        msg.attachments = Some(vec![
            ProviderAttachment {
                filename: Some("photo.jpg".to_string()),
                mime_type: Some("image/jpeg".to_string()),
                size: Some(1536),
                attachment_id: None,
            },
            ProviderAttachment {
                filename: None,
                mime_type: Some("application/zip".to_string()),
                size: None,
                attachment_id: None,
            },
        ]);

        let email = to_local_email(&msg);
        assert_eq!(email.attachments.len(), 2);
        assert_eq!(email.attachments[0].name, "photo.jpg");
        assert_eq!(email.attachments[0].size, "2KB");
        assert_eq!(email.attachments[0].kind, AttachmentKind::Image);
        assert_eq!(email.attachments[1].name, "attachment");
        assert_eq!(email.attachments[1].size, "Unknown");
        assert_eq!(email.attachments[1].kind, AttachmentKind::File);
    }

    #[test]
    fn test_classify_attachment() {
        assert_eq!(classify_attachment(Some("application/pdf")), AttachmentKind::Pdf);
        assert_eq!(
            classify_attachment(Some(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )),
            AttachmentKind::Document
        );
        assert_eq!(classify_attachment(Some("application/msword")), AttachmentKind::Document);
        assert_eq!(classify_attachment(Some("text/csv")), AttachmentKind::Document);
        assert_eq!(classify_attachment(None), AttachmentKind::File);
    }

    #[test]
    fn test_format_attachment_size() {
        assert_eq!(format_attachment_size(Some(512)), "1KB");
        assert_eq!(format_attachment_size(Some(2_500_000)), "2441KB");
        assert_eq!(format_attachment_size(Some(0)), "Unknown");
        assert_eq!(format_attachment_size(None), "Unknown");
    }

    #[test]
    fn test_plain_text_body_is_escaped() {
        let mut msg = message("m1");
        msg.body = Some("a < b\nsee you".to_string());
        msg.body_type = Some("text/plain; charset=utf-8".to_string());
        assert_eq!(to_local_email(&msg).body, "a &lt; b<br>see you");

        msg.body_type = Some("text/html".to_string());
        assert_eq!(to_local_email(&msg).body, "a < b\nsee you");
    }

    #[test]
    fn test_snippet_entities_decoded() {
        let mut msg = message("m1");
        msg.snippet = Some("Tom &amp; Jerry &lt;3".to_string());
        assert_eq!(to_local_email(&msg).snippet, "Tom & Jerry <3");
    }

    #[test]
    fn test_well_known_folders_round_trip() {
        for folder in Folder::WELL_KNOWN {
            let label = folder_to_provider_label(&folder);
            assert_eq!(provider_label_to_folder(&label), folder);
        }
    }

    #[test]
    fn test_custom_label_round_trip_upper_cases() {
        for label in ["Label_12", "work", "INBOX", "Draft", "receipts-2024"] {
            assert_eq!(
                folder_to_provider_label(&provider_label_to_folder(label)),
                label.to_uppercase()
            );
        }
    }
}
