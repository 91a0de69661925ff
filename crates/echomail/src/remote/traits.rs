//! Mail service trait definition

use super::api::{AccessStatus, Draft, MessagePage, MessageQuery, OutgoingMessage, ProviderMessage};
use crate::error::Result;
use crate::models::{Label, LabelModification};

/// Trait for the remote mail provider
///
/// One method per provider capability. Implementations fail fast: a
/// non-success response is an error naming the operation, never a partial
/// result. Callers own retries and user-facing reporting.
pub trait MailService: Send + Sync {
    /// Whether the current session may read the mailbox
    fn check_access(&self) -> Result<AccessStatus>;

    /// URL the user must visit to grant mailbox access
    fn request_access(&self) -> Result<String>;

    /// List one page of messages matching the query
    fn list_messages(&self, query: &MessageQuery) -> Result<MessagePage>;

    /// Fetch a single message with its full body
    fn get_message(&self, id: &str) -> Result<ProviderMessage>;

    /// List every label of the mailbox, system labels included
    fn get_labels(&self) -> Result<Vec<Label>>;

    /// Count messages matching the query (paging fields are ignored)
    fn get_message_count(&self, query: &MessageQuery) -> Result<u64>;

    /// Send a message
    fn send_message(&self, message: &OutgoingMessage) -> Result<()>;

    /// List saved drafts
    fn list_drafts(&self) -> Result<Vec<Draft>>;

    /// Save a message as draft
    fn create_draft(&self, message: &OutgoingMessage) -> Result<Draft>;

    /// Add and remove labels on a message
    fn modify_message(&self, id: &str, modification: &LabelModification) -> Result<()>;
}
