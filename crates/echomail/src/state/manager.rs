//! The email management state machine

use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::notification::Notification;
use super::pagination::{self, PageWindow};
use crate::adapter::{folder_to_provider_label, to_local_email};
use crate::composer::Composer;
use crate::config::{ClientConfig, PagingMode};
use crate::error::Result;
use crate::models::{
    Email, FilterOptions, Folder, Label, LabelModification, UNREAD_QUERY_TOKEN, filter_emails,
    label_ids, sort_emails, user_labels,
};
use crate::remote::{MailService, MessageQuery, ProviderMessage};

/// Largest page requested when fetching a whole folder
const FULL_FETCH_PAGE_SIZE: u32 = 500;

/// List settings for an [`EmailManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Emails per page
    pub page_size: u32,
    pub paging: PagingMode,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            paging: PagingMode::Provider,
        }
    }
}

impl From<&ClientConfig> for ManagerOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            page_size: config.page_size.max(1),
            paging: config.paging,
        }
    }
}

/// Email field touched by an optimistic mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationField {
    Read,
    Starred,
    Labels,
}

/// Outcome of a mutation sent to the provider
///
/// `Pending` is held only while the provider call runs. Mutations complete
/// within the `&mut self` call that starts them, so callers of the manager
/// observe `Confirmed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Pending,
    Confirmed,
    Failed,
}

/// Badge counts shown next to the well-known folders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FolderCounts {
    /// Unread messages in the inbox
    pub inbox: u64,
    pub sent: u64,
    pub drafts: u64,
    pub trash: u64,
}

#[derive(Debug, Clone)]
enum FetchPlan {
    /// Fetch one page, walking forward from the nearest known page token
    Provider {
        query: MessageQuery,
        page: u32,
        page_size: u32,
        tokens: HashMap<u32, String>,
    },
    /// Fetch every page of the folder
    Client { query: MessageQuery },
}

/// A list fetch prepared by [`EmailManager::begin_fetch`]
///
/// Executing it only needs the service, so it can run on another thread
/// while the manager keeps serving reads. Hand the result back to
/// [`EmailManager::complete_fetch`].
#[derive(Debug, Clone)]
pub struct FetchRequest {
    sequence: u64,
    folder: Folder,
    filter: FilterOptions,
    search: String,
    plan: FetchPlan,
}

/// Raw result of an executed [`FetchRequest`]
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    messages: Vec<ProviderMessage>,
    /// Page tokens learned while walking, keyed by the page they open
    page_tokens: Vec<(u32, String)>,
    total: Option<u64>,
    has_more: bool,
}

impl FetchRequest {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    /// Run the provider calls for this fetch
    pub fn execute(&self, service: &dyn MailService) -> Result<FetchOutcome> {
        match &self.plan {
            FetchPlan::Provider {
                query,
                page,
                page_size,
                tokens,
            } => fetch_page(service, query, *page, *page_size, tokens),
            FetchPlan::Client { query } => fetch_all(service, query),
        }
    }
}

fn fetch_page(
    service: &dyn MailService,
    query: &MessageQuery,
    page: u32,
    page_size: u32,
    tokens: &HashMap<u32, String>,
) -> Result<FetchOutcome> {
    let (mut current, mut token) = tokens
        .iter()
        .filter(|(p, _)| **p <= page)
        .max_by_key(|(p, _)| **p)
        .map(|(p, t)| (*p, Some(t.clone())))
        .unwrap_or((1, None));

    let mut outcome = FetchOutcome::default();
    loop {
        let listed = service.list_messages(
            &query
                .clone()
                .with_max_results(page_size)
                .with_page_token(token.take()),
        )?;

        if let Some(next) = &listed.next_page_token {
            outcome.page_tokens.push((current + 1, next.clone()));
        }

        if current == page {
            outcome.has_more = listed.next_page_token.is_some();
            outcome.messages = listed.messages;
            break;
        }

        match listed.next_page_token {
            Some(next) => {
                token = Some(next);
                current += 1;
            }
            None => {
                debug!("Page {} is past the end of the listing (last page {})", page, current);
                break;
            }
        }
    }

    outcome.total = match service.get_message_count(&query.without_paging()) {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Counting messages failed, deriving pages from tokens: {}", e);
            None
        }
    };

    Ok(outcome)
}

fn fetch_all(service: &dyn MailService, query: &MessageQuery) -> Result<FetchOutcome> {
    let mut outcome = FetchOutcome::default();
    let mut seen_tokens = HashSet::new();
    let mut token = None;

    loop {
        let listed = service.list_messages(
            &query
                .clone()
                .with_max_results(FULL_FETCH_PAGE_SIZE)
                .with_page_token(token),
        )?;
        outcome.messages.extend(listed.messages);

        match listed.next_page_token {
            Some(next) if seen_tokens.insert(next.clone()) => token = Some(next),
            Some(next) => {
                warn!("Provider repeated page token {}, stopping", next);
                break;
            }
            None => break,
        }
    }

    outcome.total = Some(outcome.messages.len() as u64);
    Ok(outcome)
}

/// Provider query for the list of a folder
fn folder_query(folder: &Folder) -> MessageQuery {
    match folder {
        Folder::Label(id) => MessageQuery::for_label(id.clone()),
        other => MessageQuery::for_label(folder_to_provider_label(other)),
    }
}

/// Search text followed by the provider tokens for active filters
fn search_q(search: &str, filter: &FilterOptions) -> String {
    let search = search.trim();
    let mut parts: Vec<&str> = Vec::new();
    if !search.is_empty() {
        parts.push(search);
    }
    parts.extend(filter.query_tokens());
    parts.join(" ")
}

/// Email list state for one mailbox
pub struct EmailManager {
    service: Arc<dyn MailService>,
    options: ManagerOptions,

    has_access: bool,
    profile: Option<serde_json::Value>,

    active_folder: Folder,
    search_query: String,
    filter_options: FilterOptions,
    current_page: u32,
    total_pages: u32,

    /// Emails on the current page
    emails: Vec<Email>,
    /// Whole filtered folder, kept when paging locally
    listing: Vec<Email>,
    selected_email: Option<Email>,
    is_loading: bool,

    fetch_sequence: u64,
    page_tokens: HashMap<u32, String>,

    folder_counts: FolderCounts,
    labels: Vec<Label>,
    composer: Option<Composer>,
    notifications: Vec<Notification>,
    mutations: HashMap<(String, MutationField), MutationStatus>,
}

impl EmailManager {
    /// Create a manager over `service`; nothing is fetched until
    /// [`check_access`](Self::check_access) succeeds
    pub fn new(service: Arc<dyn MailService>, options: ManagerOptions) -> Self {
        Self {
            service,
            options,
            has_access: false,
            profile: None,
            active_folder: Folder::default(),
            search_query: String::new(),
            filter_options: FilterOptions::default(),
            current_page: 1,
            total_pages: 0,
            emails: Vec::new(),
            listing: Vec::new(),
            selected_email: None,
            is_loading: false,
            fetch_sequence: 0,
            page_tokens: HashMap::new(),
            folder_counts: FolderCounts::default(),
            labels: Vec::new(),
            composer: None,
            notifications: Vec::new(),
            mutations: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    /// Ask the provider whether the mailbox is readable
    ///
    /// On success loads labels, folder counts and the first page.
    pub fn check_access(&mut self) -> bool {
        match self.service.check_access() {
            Ok(status) => {
                self.has_access = status.has_access;
                self.profile = status.profile;
                if !status.has_access {
                    info!(
                        "Mailbox access not granted: {}",
                        status.reason.as_deref().unwrap_or("no reason given")
                    );
                }
            }
            Err(e) => {
                warn!("Access check failed: {}", e);
                self.has_access = false;
                self.profile = None;
            }
        }

        if self.has_access {
            self.load_labels();
            self.refresh_folder_counts();
            self.reset_paging();
            self.refresh();
        } else {
            self.clear_listing();
        }
        self.has_access
    }

    /// Fetch the URL where the user grants mailbox access
    pub fn request_access(&mut self) -> Option<String> {
        match self.service.request_access() {
            Ok(url) => Some(url),
            Err(e) => {
                error!("Requesting access failed: {}", e);
                self.notify(Notification::error("Could not request access", e.to_string()));
                None
            }
        }
    }

    /// Fetch the access URL and open it in the default browser
    pub fn open_access_page(&mut self) -> Option<String> {
        let url = self.request_access()?;
        info!("Opening browser for mailbox access");
        if let Err(e) = open::that(&url) {
            warn!("Failed to open browser: {}. Visit {} manually.", e, url);
        }
        Some(url)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Switch folder by name (`inbox`, `sent`, `drafts`, `trash`,
    /// `label:<id>`); unknown names fall back to the inbox
    pub fn change_folder(&mut self, name: &str) -> bool {
        let folder = Folder::parse(name).unwrap_or_else(|| {
            warn!("Folder \"{}\" not found, defaulting to inbox", name);
            Folder::Inbox
        });
        self.set_folder(folder)
    }

    pub fn set_folder(&mut self, folder: Folder) -> bool {
        info!("Switching to folder {}", folder);
        self.active_folder = folder;
        self.selected_email = None;
        self.reset_paging();
        self.refresh()
    }

    /// Set the search text; the list restarts at page 1
    pub fn set_search_query(&mut self, query: impl Into<String>) -> bool {
        self.search_query = query.into();
        debug!("Search query set to {:?}", self.search_query);
        self.reset_paging();
        self.refresh()
    }

    /// Set the filter toggles; the list restarts at page 1
    pub fn set_filter_options(&mut self, options: FilterOptions) -> bool {
        self.filter_options = options;
        debug!("Filter options set to {:?}", options);
        self.reset_paging();
        self.refresh()
    }

    /// Go to a 1-based page; out-of-range pages are ignored
    pub fn change_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages {
            debug!("Ignoring page {} (total {})", page, self.total_pages);
            return false;
        }
        self.current_page = page;

        match self.options.paging {
            PagingMode::Provider => self.refresh(),
            PagingMode::Client => {
                self.emails = self.current_slice();
                true
            }
        }
    }

    /// Start a new query at page 1
    fn reset_paging(&mut self) {
        self.current_page = 1;
        self.page_tokens.clear();
        self.total_pages = 0;
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Fetch the current page and apply the result
    pub fn refresh(&mut self) -> bool {
        let Some(request) = self.begin_fetch() else {
            return false;
        };
        let result = request.execute(self.service.as_ref());
        self.complete_fetch(request, result)
    }

    /// Prepare a fetch of the current view
    ///
    /// Any fetch started earlier becomes stale. Returns None without
    /// access, after clearing the list.
    pub fn begin_fetch(&mut self) -> Option<FetchRequest> {
        self.fetch_sequence += 1;

        if !self.has_access {
            debug!("Skipping fetch without mailbox access");
            self.clear_listing();
            self.is_loading = false;
            return None;
        }

        let base = folder_query(&self.active_folder);
        let plan = match self.options.paging {
            PagingMode::Provider => FetchPlan::Provider {
                query: base.with_q(search_q(&self.search_query, &self.filter_options)),
                page: self.current_page,
                page_size: self.options.page_size,
                tokens: self.page_tokens.clone(),
            },
            PagingMode::Client => FetchPlan::Client { query: base },
        };

        debug!(
            "Fetch #{} of {} page {}",
            self.fetch_sequence, self.active_folder, self.current_page
        );
        self.is_loading = true;

        Some(FetchRequest {
            sequence: self.fetch_sequence,
            folder: self.active_folder.clone(),
            filter: self.filter_options,
            search: self.search_query.clone(),
            plan,
        })
    }

    /// Apply the result of an executed fetch
    ///
    /// Returns false when a newer fetch has started since `request` was
    /// created; the result is then dropped.
    pub fn complete_fetch(&mut self, request: FetchRequest, result: Result<FetchOutcome>) -> bool {
        if request.sequence != self.fetch_sequence {
            debug!(
                "Discarding stale fetch #{} (latest #{})",
                request.sequence, self.fetch_sequence
            );
            return false;
        }
        self.is_loading = false;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Loading {} failed: {}", request.folder, e);
                self.clear_listing();
                self.notify(Notification::error("Failed to load emails", e.to_string()));
                return true;
            }
        };

        let emails: Vec<Email> = outcome.messages.iter().map(to_local_email).collect();
        let page_size = self.options.page_size;

        match request.plan {
            FetchPlan::Provider { page, .. } => {
                self.page_tokens.extend(outcome.page_tokens);
                // Without a count, pages already walked stay in the pager
                self.total_pages = match outcome.total {
                    Some(total) => pagination::total_pages(total, page_size),
                    None => self.total_pages.max(page + u32::from(outcome.has_more)),
                };
                self.emails = emails;
                sort_emails(&mut self.emails, request.filter.sort_by);
            }
            FetchPlan::Client { .. } => {
                self.listing = filter_emails(emails, &request.filter, &request.search);
                self.total_pages = pagination::total_pages(self.listing.len() as u64, page_size);
                self.emails = self.current_slice();
            }
        }

        debug!(
            "Fetch #{} loaded {} emails, {} pages",
            request.sequence,
            self.emails.len(),
            self.total_pages
        );
        true
    }

    fn current_slice(&self) -> Vec<Email> {
        pagination::slice_page(&self.listing, self.current_page, self.options.page_size).to_vec()
    }

    fn clear_listing(&mut self) {
        self.emails.clear();
        self.listing.clear();
        self.total_pages = 0;
    }

    // ------------------------------------------------------------------
    // Selection and mutations
    // ------------------------------------------------------------------

    /// Open an email in the reading pane
    ///
    /// An unread email is marked read locally right away. If the provider
    /// rejects the change the email stays read and the failure is only
    /// logged.
    pub fn select_email(&mut self, id: &str) -> bool {
        let Some(mut email) = self.find_email(id).cloned() else {
            warn!("Cannot select unknown email {}", id);
            return false;
        };

        if email.body.is_empty() {
            match self.service.get_message(id) {
                Ok(full) => {
                    let mut full = to_local_email(&full);
                    full.labels = email.labels.clone();
                    email = full;
                }
                Err(e) => warn!("Loading body of {} failed, showing list copy: {}", id, e),
            }
        }

        let was_unread = !email.is_read();
        self.selected_email = Some(email);

        if was_unread {
            self.mark_read(id);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected_email = None;
    }

    fn mark_read(&mut self, id: &str) {
        let modification = LabelModification::mark_read();
        self.update_email(id, |e| e.apply_modification(&modification));

        match self.send_modification(id, MutationField::Read, &modification) {
            Ok(()) => self.refresh_folder_counts(),
            Err(e) => warn!("Marking {} as read failed: {}", id, e),
        }
    }

    /// Star or unstar an email
    pub fn toggle_star(&mut self, id: &str) -> bool {
        let Some(starred) = self.find_email(id).map(Email::is_starred) else {
            warn!("Cannot star unknown email {}", id);
            return false;
        };
        let modification = if starred {
            LabelModification::unstar()
        } else {
            LabelModification::star()
        };
        self.apply_mutation(id, MutationField::Starred, modification, "Failed to update star")
    }

    /// Mark an email unread again
    pub fn mark_unread(&mut self, id: &str) -> bool {
        let applied = self.apply_mutation(
            id,
            MutationField::Read,
            LabelModification::mark_unread(),
            "Failed to mark as unread",
        );
        if applied {
            self.refresh_folder_counts();
        }
        applied
    }

    pub fn add_label(&mut self, id: &str, label_id: &str) -> bool {
        self.apply_mutation(
            id,
            MutationField::Labels,
            LabelModification::add(label_id),
            "Failed to add label",
        )
    }

    pub fn remove_label(&mut self, id: &str, label_id: &str) -> bool {
        self.apply_mutation(
            id,
            MutationField::Labels,
            LabelModification::remove(label_id),
            "Failed to remove label",
        )
    }

    /// Move an email to the trash
    pub fn trash(&mut self, id: &str) -> bool {
        self.remove_from_view(id, LabelModification::trash(), "Failed to move to trash")
    }

    /// Move the selected email to the trash
    pub fn trash_selected(&mut self) -> bool {
        match self.selected_email.as_ref().map(|e| e.id.clone()) {
            Some(id) => self.trash(&id),
            None => false,
        }
    }

    /// Remove an email from the inbox
    pub fn archive(&mut self, id: &str) -> bool {
        self.remove_from_view(id, LabelModification::archive(), "Failed to archive")
    }

    fn remove_from_view(&mut self, id: &str, modification: LabelModification, failure: &str) -> bool {
        if let Err(e) = self.send_modification(id, MutationField::Labels, &modification) {
            error!("{} {}: {}", failure, id, e);
            self.notify(Notification::error(failure, e.to_string()));
            return false;
        }

        info!("Removed {} from {}", id, self.active_folder);
        self.drop_email(id);
        self.refresh_folder_counts();
        true
    }

    /// Send a label change and apply it locally once confirmed
    fn apply_mutation(
        &mut self,
        id: &str,
        field: MutationField,
        modification: LabelModification,
        failure: &str,
    ) -> bool {
        match self.send_modification(id, field, &modification) {
            Ok(()) => {
                self.update_email(id, |e| e.apply_modification(&modification));
                true
            }
            Err(e) => {
                error!("{} {}: {}", failure, id, e);
                self.notify(Notification::error(failure, e.to_string()));
                false
            }
        }
    }

    /// Call the provider, tracking the mutation status
    fn send_modification(
        &mut self,
        id: &str,
        field: MutationField,
        modification: &LabelModification,
    ) -> Result<()> {
        let key = (id.to_string(), field);
        self.mutations.insert(key.clone(), MutationStatus::Pending);

        let result = self.service.modify_message(id, modification);
        let status = if result.is_ok() {
            MutationStatus::Confirmed
        } else {
            MutationStatus::Failed
        };
        self.mutations.insert(key, status);
        result
    }

    /// Latest status of a mutation on an email field
    pub fn mutation_status(&self, id: &str, field: MutationField) -> Option<MutationStatus> {
        self.mutations.get(&(id.to_string(), field)).copied()
    }

    fn find_email(&self, id: &str) -> Option<&Email> {
        self.emails
            .iter()
            .chain(self.listing.iter())
            .chain(self.selected_email.iter())
            .find(|e| e.id == id)
    }

    /// Apply a change to every local copy of an email
    fn update_email(&mut self, id: &str, update: impl Fn(&mut Email)) {
        self.emails
            .iter_mut()
            .chain(self.listing.iter_mut())
            .chain(self.selected_email.iter_mut())
            .filter(|e| e.id == id)
            .for_each(update);
    }

    fn drop_email(&mut self, id: &str) {
        self.emails.retain(|e| e.id != id);
        if self.selected_email.as_ref().is_some_and(|e| e.id == id) {
            self.selected_email = None;
        }

        if self.options.paging == PagingMode::Client {
            self.listing.retain(|e| e.id != id);
            self.total_pages =
                pagination::total_pages(self.listing.len() as u64, self.options.page_size);
            self.current_page = self.current_page.min(self.total_pages).max(1);
            self.emails = self.current_slice();
        }
    }

    // ------------------------------------------------------------------
    // Composer
    // ------------------------------------------------------------------

    /// Open an empty composer
    pub fn compose(&mut self) {
        self.composer = Some(Composer::new());
    }

    /// Open the composer replying to an email
    pub fn reply(&mut self, id: &str) -> bool {
        match self.find_email(id) {
            Some(email) => {
                self.composer = Some(Composer::reply_to(email));
                true
            }
            None => {
                warn!("Cannot reply to unknown email {}", id);
                false
            }
        }
    }

    pub fn composer(&self) -> Option<&Composer> {
        self.composer.as_ref()
    }

    pub fn composer_mut(&mut self) -> Option<&mut Composer> {
        self.composer.as_mut()
    }

    pub fn is_composer_open(&self) -> bool {
        self.composer.is_some()
    }

    pub fn close_composer(&mut self) {
        self.composer = None;
    }

    /// Validate and send the open composer
    ///
    /// The composer closes only when the provider accepts the message.
    pub fn send_composed(&mut self) -> bool {
        let Some(composer) = self.composer.as_ref() else {
            return false;
        };

        let warning = match composer.validate() {
            Ok(warning) => warning,
            Err(e) => {
                self.notify(Notification::error("Missing recipient", e.to_string()));
                return false;
            }
        };
        let outgoing = composer.to_outgoing();
        if let Some(warning) = warning {
            self.notify(warning);
        }

        match self.service.send_message(&outgoing) {
            Ok(()) => {
                info!("Sent email to {}", outgoing.to);
                self.composer = None;
                self.notify(Notification::info(
                    "Email sent",
                    "Your email has been sent successfully",
                ));
                self.refresh_folder_counts();
                if self.active_folder == Folder::Sent {
                    self.refresh();
                }
                true
            }
            Err(e) => {
                error!("Sending email failed: {}", e);
                self.notify(Notification::error("Failed to send email", e.to_string()));
                false
            }
        }
    }

    /// Save the open composer as a draft
    pub fn save_draft(&mut self) -> bool {
        let Some(composer) = self.composer.as_ref() else {
            return false;
        };
        let outgoing = composer.to_outgoing();

        match self.service.create_draft(&outgoing) {
            Ok(draft) => {
                info!("Saved draft {}", draft.id);
                self.composer = None;
                self.notify(Notification::info("Draft saved", "Your draft has been saved"));
                self.refresh_folder_counts();
                if self.active_folder == Folder::Drafts {
                    self.refresh();
                }
                true
            }
            Err(e) => {
                error!("Saving draft failed: {}", e);
                self.notify(Notification::error("Failed to save draft", e.to_string()));
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Counts and labels
    // ------------------------------------------------------------------

    /// Refresh the folder badges; a failing count keeps its old value
    pub fn refresh_folder_counts(&mut self) {
        if !self.has_access {
            return;
        }

        let service = Arc::clone(&self.service);
        let count = |query: MessageQuery, previous: u64| match service.get_message_count(&query) {
            Ok(count) => count,
            Err(e) => {
                warn!("Counting {} failed: {}", query.label_ids.as_deref().unwrap_or("all"), e);
                previous
            }
        };

        let previous = self.folder_counts;
        self.folder_counts = FolderCounts {
            inbox: count(
                MessageQuery::for_label(label_ids::INBOX).with_q(UNREAD_QUERY_TOKEN),
                previous.inbox,
            ),
            sent: count(MessageQuery::for_label(label_ids::SENT), previous.sent),
            drafts: count(MessageQuery::for_label(label_ids::DRAFT), previous.drafts),
            trash: count(MessageQuery::for_label(label_ids::TRASH), previous.trash),
        };
    }

    /// Load the user labels shown in the sidebar
    pub fn load_labels(&mut self) -> bool {
        match self.service.get_labels() {
            Ok(labels) => {
                self.labels = user_labels(labels);
                debug!("Loaded {} user labels", self.labels.len());
                true
            }
            Err(e) => {
                warn!("Loading labels failed: {}", e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Remove one notification; out-of-range indexes are ignored
    pub fn dismiss_notification(&mut self, index: usize) -> Option<Notification> {
        (index < self.notifications.len()).then(|| self.notifications.remove(index))
    }

    /// Drain all pending notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn options(&self) -> ManagerOptions {
        self.options
    }

    pub fn has_access(&self) -> bool {
        self.has_access
    }

    /// Provider profile from the last access check
    pub fn profile(&self) -> Option<&serde_json::Value> {
        self.profile.as_ref()
    }

    pub fn active_folder(&self) -> &Folder {
        &self.active_folder
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.filter_options
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Pager layout for the current page
    pub fn page_window(&self) -> Option<PageWindow> {
        pagination::page_window(self.current_page, self.total_pages)
    }

    /// Emails on the current page
    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn selected_email(&self) -> Option<&Email> {
        self.selected_email.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn folder_counts(&self) -> FolderCounts {
        self.folder_counts
    }

    /// User labels, sorted by name
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}
