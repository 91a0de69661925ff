//! Domain models for the mail client

mod email;
mod filter;
mod folder;
mod label;

pub use email::{Attachment, AttachmentKind, Contact, Email, EmailBuilder};
pub use filter::{
    ATTACHMENT_QUERY_TOKEN, FilterOptions, SortOrder, UNREAD_QUERY_TOKEN, filter_emails,
    sort_emails,
};
pub use folder::{Folder, LABEL_FOLDER_PREFIX};
pub use label::{Label, LabelModification, LabelType, is_system_label_id, label_ids, user_labels};
