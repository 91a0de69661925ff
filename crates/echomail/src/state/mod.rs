//! Email management state
//!
//! [`EmailManager`] owns everything the mail UI renders: the active folder,
//! search and filters, the current page of emails, the selection, folder
//! counts, labels, the composer and pending notifications. Every transition
//! goes through `&mut self`; remote calls go through an injected
//! [`MailService`](crate::remote::MailService).

mod manager;
mod notification;
mod pagination;

pub use manager::{
    EmailManager, FetchOutcome, FetchRequest, FolderCounts, ManagerOptions, MutationField,
    MutationStatus,
};
pub use notification::{Notification, NotificationLevel};
pub use pagination::{PageWindow, WINDOW_SIZE, page_window, slice_page, total_pages};
