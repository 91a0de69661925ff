//! Static sample mailbox for demos and offline development

use super::api::{ProviderAttachment, ProviderMessage};
use crate::models::{Label, label_ids::*};

/// Address of the account owning the sample mailbox
pub const SAMPLE_ACCOUNT: &str = "me@example.com";

struct Sample<'a> {
    id: &'a str,
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
    date: &'a str,
    labels: &'a [&'a str],
    attachments: &'a [(&'a str, &'a str, u64)],
}

impl Sample<'_> {
    fn into_message(self) -> ProviderMessage {
        let attachments = self
            .attachments
            .iter()
            .map(|(filename, mime_type, size)| ProviderAttachment {
                filename: Some(filename.to_string()),
                mime_type: Some(mime_type.to_string()),
                size: Some(*size),
                attachment_id: None,
            })
            .collect();

        ProviderMessage {
            id: self.id.to_string(),
            thread_id: Some(format!("thread-{}", self.id)),
            snippet: Some(strip_tags(self.body)),
            label_ids: Some(self.labels.iter().map(|l| l.to_string()).collect()),
            subject: Some(self.subject.to_string()),
            from: Some(self.from.to_string()),
            to: Some(self.to.to_string()),
            cc: None,
            date: Some(self.date.to_string()),
            body: Some(self.body.to_string()),
            body_type: Some("text/html".to_string()),
            attachments: Some(attachments),
            internal_date: None,
        }
    }
}

fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Messages of the sample mailbox across inbox, sent, drafts and trash
pub fn sample_messages() -> Vec<ProviderMessage> {
    let samples = [
        Sample {
            id: "1",
            from: "John Smith <john.smith@example.com>",
            to: "Me <me@example.com>",
            subject: "Project Update - Q2 Goals",
            body: "<p>Hi there,</p><p>Customer acquisition is at 80% of forecast and the July release is on schedule.</p>",
            date: "2025-04-30T09:30:00Z",
            labels: &[INBOX, UNREAD, STARRED],
            attachments: &[],
        },
        Sample {
            id: "2",
            from: "Marketing Team <marketing@company.com>",
            to: "Me <me@example.com>",
            subject: "New Campaign Materials Ready for Review",
            body: "<p>The campaign brief and asset previews are attached for your review.</p>",
            date: "2025-04-29T16:45:00Z",
            labels: &[INBOX],
            attachments: &[
                ("Campaign_Brief.pdf", "application/pdf", 2_411_724),
                ("Assets_Preview.jpg", "image/jpeg", 1_782_579),
            ],
        },
        Sample {
            id: "3",
            from: "Sarah Johnson <sarah.j@partner.org>",
            to: "Me <me@example.com>",
            subject: "Partnership Opportunity",
            body: "<p>Would you have time next week to discuss a joint pilot?</p>",
            date: "2025-04-28T11:20:00Z",
            labels: &[INBOX, UNREAD],
            attachments: &[],
        },
        Sample {
            id: "4",
            from: "support@workspace.com",
            to: "Me <me@example.com>",
            subject: "Your Support Ticket #45678 Has Been Resolved",
            body: "<p>The sync issue you reported has been fixed in the latest release.</p>",
            date: "2025-04-27T14:15:00Z",
            labels: &[INBOX],
            attachments: &[],
        },
        Sample {
            id: "5",
            from: "Team Collaboration <noreply@teamcollab.com>",
            to: "Me <me@example.com>",
            subject: "New Comment on Your Document",
            body: "<p>Alex left a comment on <em>Roadmap 2025</em>.</p>",
            date: "2025-04-26T17:30:00Z",
            labels: &[INBOX, STARRED, "Label_work"],
            attachments: &[],
        },
        Sample {
            id: "101",
            from: "Me <me@example.com>",
            to: "Development Team <dev@company.com>",
            subject: "Requirements for New Feature",
            body: "<p>Requirements for the export feature are attached.</p>",
            date: "2025-04-30T10:15:00Z",
            labels: &[SENT],
            attachments: &[(
                "Feature_Requirements.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                1_258_291,
            )],
        },
        Sample {
            id: "102",
            from: "Me <me@example.com>",
            to: "Client X <contact@clientx.com>",
            subject: "Proposal for Project Implementation",
            body: "<p>Please find our implementation proposal attached.</p>",
            date: "2025-04-29T14:20:00Z",
            labels: &[SENT, "Label_work"],
            attachments: &[("Project_Proposal.pdf", "application/pdf", 3_565_158)],
        },
        Sample {
            id: "201",
            from: "Me <me@example.com>",
            to: "Human Resources <hr@company.com>",
            subject: "Request for Additional Team Resources",
            body: "<p>Given the Q3 roadmap we need two more engineers.</p>",
            date: "2025-04-30T11:45:00Z",
            labels: &[DRAFT],
            attachments: &[],
        },
        Sample {
            id: "301",
            from: "Newsletter <newsletter@industry.com>",
            to: "Me <me@example.com>",
            subject: "Industry Weekly Digest",
            body: "<p>This week: supply chains, AI tooling and remote work trends.</p>",
            date: "2025-04-25T08:00:00Z",
            labels: &[TRASH],
            attachments: &[],
        },
    ];

    samples.into_iter().map(Sample::into_message).collect()
}

/// Labels of the sample mailbox
pub fn sample_labels() -> Vec<Label> {
    vec![
        Label::system(INBOX, "INBOX"),
        Label::system(SENT, "SENT"),
        Label::system(DRAFT, "DRAFT"),
        Label::system(TRASH, "TRASH"),
        Label::system(STARRED, "STARRED"),
        Label::system(UNREAD, "UNREAD"),
        Label::new("Label_work", "Work"),
        Label::new("Label_travel", "Travel"),
    ]
}
