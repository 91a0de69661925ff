//! EchoMail crate - Business logic for a webmail client
//!
//! This crate provides the platform-independent core of the mail UI:
//! - Domain models (Email, Contact, Folder, Label, FilterOptions)
//! - Adapter normalizing provider messages into the local email shape
//! - Remote mail service trait with HTTP and in-memory implementations
//! - Email management state machine (folders, search, paging, selection,
//!   optimistic mutations, folder counts, notifications)
//! - Composer with recipient validation and reply quoting
//!
//! This crate has zero UI dependencies. A front-end renders the state held by
//! [`EmailManager`] and forwards user intents to its methods.

pub mod adapter;
pub mod composer;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod state;

pub use adapter::{
    classify_attachment, folder_to_provider_label, format_attachment_size,
    provider_label_to_folder, to_local_email,
};
pub use composer::Composer;
pub use config::{ClientConfig, Credentials, PagingMode};
pub use error::{MailError, Operation, Result, ValidationError};
pub use models::{
    Attachment, AttachmentKind, Contact, Email, FilterOptions, Folder, Label, LabelModification,
    SortOrder,
};
pub use remote::{
    AccessStatus, Draft, HttpMailClient, InMemoryMailService, MailService, MessagePage,
    MessageQuery, OutgoingMessage, ProviderMessage,
};
pub use state::{
    EmailManager, FetchOutcome, FetchRequest, FolderCounts, ManagerOptions, MutationField,
    MutationStatus, Notification, NotificationLevel, PageWindow,
};
