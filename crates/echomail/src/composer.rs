//! Message composer state

use serde::{Deserialize, Serialize};

use crate::adapter::escape_html;
use crate::error::ValidationError;
use crate::models::Email;
use crate::remote::OutgoingMessage;
use crate::state::Notification;

/// Prefix added to the subject of a reply
pub const REPLY_PREFIX: &str = "Re: ";

const QUOTE_HEADER: &str = "------ Original Message ------";

/// A message being written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composer {
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub subject: String,
    /// HTML body
    pub body: String,
    /// Id of the email being replied to
    pub reply_to_id: Option<String>,
}

impl Composer {
    /// Empty composer for a new message
    pub fn new() -> Self {
        Self::default()
    }

    /// Composer pre-filled to reply to `email`
    ///
    /// The body starts with an empty paragraph for the reply, followed by a
    /// quote of the original sender, date, subject and body.
    pub fn reply_to(email: &Email) -> Self {
        let quote = format!(
            "<p><br></p>\
             <p>{header}</p>\
             <blockquote>\
             <p>From: {from}<br>Date: {date}<br>Subject: {subject}</p>\
             {body}\
             </blockquote>",
            header = QUOTE_HEADER,
            from = escape_html(&email.from.display()),
            date = email.timestamp.format("%a, %d %b %Y %H:%M UTC"),
            subject = escape_html(&email.subject),
            body = email.body,
        );

        Self {
            to: email.from.email.clone(),
            subject: format!("{}{}", REPLY_PREFIX, email.subject),
            body: quote,
            reply_to_id: Some(email.id.clone()),
            ..Self::default()
        }
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_id.is_some()
    }

    /// Check the message can be sent
    ///
    /// A blank recipient blocks sending. A blank subject is allowed but
    /// yields a warning to show the user.
    pub fn validate(&self) -> Result<Option<Notification>, ValidationError> {
        if self.to.trim().is_empty() {
            return Err(ValidationError::MissingRecipient);
        }
        if self.subject.trim().is_empty() {
            return Ok(Some(Notification::warning(
                "Missing subject",
                "Sending without a subject",
            )));
        }
        Ok(None)
    }

    /// Request body for send and draft calls
    pub fn to_outgoing(&self) -> OutgoingMessage {
        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        OutgoingMessage {
            to: self.to.trim().to_string(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            cc: optional(&self.cc),
            bcc: optional(&self.bcc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contact;
    use crate::state::NotificationLevel;
    use chrono::{TimeZone, Utc};

    fn original() -> Email {
        Email::builder("m1")
            .from(Contact::new("Ann <Lee>", "ann@example.com"))
            .subject("Budget & plan")
            .body("<p>Numbers attached</p>")
            .timestamp(Utc.with_ymd_and_hms(2025, 4, 30, 9, 30, 0).unwrap())
            .build()
    }

    #[test]
    fn test_reply_prefills_fields() {
        let composer = Composer::reply_to(&original());
        assert_eq!(composer.to, "ann@example.com");
        assert_eq!(composer.subject, "Re: Budget & plan");
        assert_eq!(composer.reply_to_id.as_deref(), Some("m1"));
        assert!(composer.is_reply());
    }

    #[test]
    fn test_reply_quotes_original() {
        let body = Composer::reply_to(&original()).body;
        assert!(body.contains("------ Original Message ------"));
        assert!(body.contains("<blockquote>"));
        assert!(body.contains("From: Ann &lt;Lee&gt; &lt;ann@example.com&gt;"));
        assert!(body.contains("Date: Wed, 30 Apr 2025 09:30 UTC"));
        assert!(body.contains("Subject: Budget &amp; plan"));
        assert!(body.contains("<p>Numbers attached</p></blockquote>"));
    }

    #[test]
    fn test_validate_requires_recipient() {
        let composer = Composer {
            to: "  ".to_string(),
            subject: "Hi".to_string(),
            ..Composer::new()
        };
        assert_eq!(composer.validate(), Err(ValidationError::MissingRecipient));
    }

    #[test]
    fn test_validate_warns_on_missing_subject() {
        let mut composer = Composer {
            to: "bob@example.com".to_string(),
            ..Composer::new()
        };
        let warning = composer.validate().unwrap().unwrap();
        assert_eq!(warning.title, "Missing subject");
        assert_eq!(warning.level, NotificationLevel::Warning);

        composer.subject = "Hello".to_string();
        assert_eq!(composer.validate(), Ok(None));
    }

    #[test]
    fn test_to_outgoing_drops_blank_copies() {
        let composer = Composer {
            to: " bob@example.com ".to_string(),
            cc: "carol@example.com".to_string(),
            bcc: "   ".to_string(),
            subject: "Hi".to_string(),
            body: "<p>Hello</p>".to_string(),
            reply_to_id: None,
        };
        let outgoing = composer.to_outgoing();
        assert_eq!(outgoing.to, "bob@example.com");
        assert_eq!(outgoing.cc.as_deref(), Some("carol@example.com"));
        assert_eq!(outgoing.bcc, None);
        assert_eq!(outgoing.body, "<p>Hello</p>");
    }
}
