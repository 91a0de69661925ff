//! In-memory mail service
//!
//! Behaves like the provider for the operations the app uses: label and
//! search filtering, offset page tokens, counts, label modification, send
//! and drafts. Used by tests and as an offline backend over the sample
//! mailbox. Failures can be injected per operation and every call is
//! recorded for assertions.

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::MailService;
use super::api::{AccessStatus, Draft, MessagePage, MessageQuery, OutgoingMessage, ProviderMessage};
use super::sample::{SAMPLE_ACCOUNT, sample_labels, sample_messages};
use crate::adapter::to_local_email;
use crate::error::{MailError, Operation, Result};
use crate::models::{ATTACHMENT_QUERY_TOKEN, Label, LabelModification, UNREAD_QUERY_TOKEN, label_ids};

const DEFAULT_MAX_RESULTS: usize = 100;
const MAX_RESULTS_LIMIT: usize = 500;
const DEFAULT_AUTH_URL: &str = "https://accounts.example.com/o/oauth2/auth";

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// In-process implementation of MailService
///
/// Uses maps protected by RwLocks, so one instance can be shared behind an
/// `Arc` between the manager and worker threads.
pub struct InMemoryMailService {
    messages: RwLock<HashMap<String, ProviderMessage>>,
    labels: RwLock<Vec<Label>>,
    drafts: RwLock<Vec<Draft>>,
    has_access: RwLock<bool>,
    /// Operations that fail with status 500 until recovered
    failures: RwLock<HashSet<Operation>>,
    calls: RwLock<Vec<Operation>>,
    /// List results leave out message bodies
    summary_listing: AtomicBool,
    next_id: AtomicU64,
    auth_url: String,
}

impl InMemoryMailService {
    /// Create an empty mailbox with access granted
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(HashMap::new()),
            labels: RwLock::new(Vec::new()),
            drafts: RwLock::new(Vec::new()),
            has_access: RwLock::new(true),
            failures: RwLock::new(HashSet::new()),
            calls: RwLock::new(Vec::new()),
            summary_listing: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            auth_url: DEFAULT_AUTH_URL.to_string(),
        }
    }

    /// Create a mailbox seeded with the sample messages and labels
    pub fn with_sample_data() -> Self {
        let service = Self::new();
        for message in sample_messages() {
            service.insert_message(message);
        }
        for label in sample_labels() {
            service.insert_label(label);
        }
        service
    }

    pub fn insert_message(&self, message: ProviderMessage) {
        write(&self.messages).insert(message.id.clone(), message);
    }

    pub fn insert_label(&self, label: Label) {
        let mut labels = write(&self.labels);
        labels.retain(|l| l.id != label.id);
        labels.push(label);
    }

    /// Current state of a stored message
    pub fn message(&self, id: &str) -> Option<ProviderMessage> {
        read(&self.messages).get(id).cloned()
    }

    /// Grant or revoke mailbox access; without it data calls fail with 403
    pub fn set_access(&self, has_access: bool) {
        *write(&self.has_access) = has_access;
    }

    /// Make an operation fail until [`recover`](Self::recover) is called
    pub fn fail(&self, operation: Operation) {
        write(&self.failures).insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        write(&self.failures).remove(&operation);
    }

    /// Omit bodies from list results, as a metadata-only listing does.
    /// `get_message` still returns the full message.
    pub fn set_summary_listing(&self, enabled: bool) {
        self.summary_listing.store(enabled, Ordering::Relaxed);
    }

    /// Every operation called so far, in order
    pub fn calls(&self) -> Vec<Operation> {
        read(&self.calls).clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        read(&self.calls).iter().filter(|op| **op == operation).count()
    }

    pub fn clear_calls(&self) {
        write(&self.calls).clear();
    }

    /// Record the call and apply injected failures and the access gate
    fn enter(&self, operation: Operation, needs_access: bool) -> Result<()> {
        write(&self.calls).push(operation);

        if read(&self.failures).contains(&operation) {
            return Err(MailError::status(operation, 500));
        }
        if needs_access && !*read(&self.has_access) {
            return Err(MailError::status(operation, 403));
        }
        Ok(())
    }

    /// Messages matching the label and search parts of a query, newest first
    fn matching(&self, query: &MessageQuery) -> Vec<ProviderMessage> {
        let filter = SearchFilter::parse(query.q.as_deref().unwrap_or_default());

        let mut matches: Vec<_> = read(&self.messages)
            .values()
            .filter(|m| {
                query
                    .label_ids
                    .as_deref()
                    .is_none_or(|label| has_label(m, label))
            })
            .filter(|m| filter.matches(m))
            .map(|m| (to_local_email(m).timestamp, m.clone()))
            .collect();

        matches.sort_by(|(ts_a, a), (ts_b, b)| ts_b.cmp(ts_a).then_with(|| a.id.cmp(&b.id)));
        matches.into_iter().map(|(_, m)| m).collect()
    }

    fn new_message(&self, prefix: &str, message: &OutgoingMessage, label: &str) -> ProviderMessage {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        ProviderMessage {
            id: format!("{}-{}", prefix, n),
            thread_id: Some(format!("thread-{}-{}", prefix, n)),
            snippet: Some(message.body.chars().take(100).collect()),
            label_ids: Some(vec![label.to_string()]),
            subject: Some(message.subject.clone()),
            from: Some(SAMPLE_ACCOUNT.to_string()),
            to: Some(message.to.clone()),
            cc: message.cc.clone(),
            date: Some(Utc::now().to_rfc3339()),
            body: Some(message.body.clone()),
            body_type: Some("text/html".to_string()),
            attachments: None,
            internal_date: None,
        }
    }
}

impl Default for InMemoryMailService {
    fn default() -> Self {
        Self::new()
    }
}

impl MailService for InMemoryMailService {
    fn check_access(&self) -> Result<AccessStatus> {
        self.enter(Operation::CheckAccess, false)?;

        let has_access = *read(&self.has_access);
        Ok(AccessStatus {
            has_access,
            reason: (!has_access).then(|| "Mailbox access has not been granted".to_string()),
            profile: has_access.then(|| serde_json::json!({ "emailAddress": SAMPLE_ACCOUNT })),
        })
    }

    fn request_access(&self) -> Result<String> {
        self.enter(Operation::RequestAccess, false)?;
        Ok(self.auth_url.clone())
    }

    fn list_messages(&self, query: &MessageQuery) -> Result<MessagePage> {
        self.enter(Operation::ListMessages, true)?;

        let offset = match query.page_token.as_deref() {
            Some(token) => token.parse::<usize>().map_err(|_| MailError::RemoteRequestFailed {
                operation: Operation::ListMessages,
                status: Some(400),
                message: format!("Invalid page token: {}", token),
            })?,
            None => 0,
        };
        let max_results = query
            .max_results
            .map_or(DEFAULT_MAX_RESULTS, |n| n as usize)
            .clamp(1, MAX_RESULTS_LIMIT);

        let matches = self.matching(query);
        let end = offset.saturating_add(max_results).min(matches.len());
        let mut messages = matches.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
        if self.summary_listing.load(Ordering::Relaxed) {
            for message in &mut messages {
                message.body = None;
            }
        }
        let next_page_token = (end < matches.len()).then(|| end.to_string());

        Ok(MessagePage {
            messages,
            next_page_token,
        })
    }

    fn get_message(&self, id: &str) -> Result<ProviderMessage> {
        self.enter(Operation::GetMessage, true)?;
        self.message(id)
            .ok_or_else(|| MailError::status(Operation::GetMessage, 404))
    }

    fn get_labels(&self) -> Result<Vec<Label>> {
        self.enter(Operation::GetLabels, true)?;
        Ok(read(&self.labels).clone())
    }

    fn get_message_count(&self, query: &MessageQuery) -> Result<u64> {
        self.enter(Operation::GetMessageCount, true)?;
        Ok(self.matching(&query.without_paging()).len() as u64)
    }

    fn send_message(&self, message: &OutgoingMessage) -> Result<()> {
        self.enter(Operation::SendMessage, true)?;
        let sent = self.new_message("sent", message, label_ids::SENT);
        self.insert_message(sent);
        Ok(())
    }

    fn list_drafts(&self) -> Result<Vec<Draft>> {
        self.enter(Operation::ListDrafts, true)?;
        Ok(read(&self.drafts).clone())
    }

    fn create_draft(&self, message: &OutgoingMessage) -> Result<Draft> {
        self.enter(Operation::CreateDraft, true)?;

        let stored = self.new_message("draft", message, label_ids::DRAFT);
        let draft = Draft {
            id: format!("d-{}", stored.id),
            message: Some(stored.clone()),
        };
        self.insert_message(stored);
        write(&self.drafts).push(draft.clone());
        Ok(draft)
    }

    fn modify_message(&self, id: &str, modification: &LabelModification) -> Result<()> {
        self.enter(Operation::ModifyMessage, true)?;

        let mut messages = write(&self.messages);
        let message = messages
            .get_mut(id)
            .ok_or_else(|| MailError::status(Operation::ModifyMessage, 404))?;

        let labels = message.label_ids.get_or_insert_with(Vec::new);
        labels.retain(|l| !modification.remove_label_ids.contains(l));
        for label in &modification.add_label_ids {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        Ok(())
    }
}

fn has_label(message: &ProviderMessage, label: &str) -> bool {
    message
        .label_ids
        .as_ref()
        .is_some_and(|labels| labels.iter().any(|l| l == label))
}

/// The parts of a provider search string this service understands
#[derive(Debug, Default)]
struct SearchFilter {
    unread: bool,
    starred: bool,
    attachments: bool,
    labels: Vec<String>,
    /// Lower-cased free-text terms, all of which must match
    terms: Vec<String>,
}

impl SearchFilter {
    fn parse(q: &str) -> Self {
        let mut filter = Self::default();
        for token in q.split_whitespace() {
            let lower = token.to_lowercase();
            match lower.as_str() {
                UNREAD_QUERY_TOKEN => filter.unread = true,
                "is:starred" => filter.starred = true,
                ATTACHMENT_QUERY_TOKEN => filter.attachments = true,
                _ => match lower.strip_prefix("label:") {
                    Some(label) if !label.is_empty() => filter.labels.push(label.to_string()),
                    _ => filter.terms.push(lower),
                },
            }
        }
        filter
    }

    fn matches(&self, message: &ProviderMessage) -> bool {
        if self.unread && !has_label(message, label_ids::UNREAD) {
            return false;
        }
        if self.starred && !has_label(message, label_ids::STARRED) {
            return false;
        }
        if self.attachments && message.attachments.as_ref().is_none_or(Vec::is_empty) {
            return false;
        }

        let labels = message.label_ids.as_deref().unwrap_or_default();
        let labels_match = self
            .labels
            .iter()
            .all(|wanted| labels.iter().any(|l| l.eq_ignore_ascii_case(wanted)));
        if !labels_match {
            return false;
        }

        let haystack = [
            &message.subject,
            &message.from,
            &message.to,
            &message.body,
            &message.snippet,
        ]
        .into_iter()
        .flatten()
        .map(|field| field.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

        self.terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbox() -> MessageQuery {
        MessageQuery::for_label(label_ids::INBOX)
    }

    fn ids(page: &MessagePage) -> Vec<&str> {
        page.messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_list_by_label_newest_first() {
        let service = InMemoryMailService::with_sample_data();
        let page = service.list_messages(&inbox()).unwrap();
        assert_eq!(ids(&page), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(page.next_page_token, None);
    }

    #[test]
    fn test_offset_page_tokens() {
        let service = InMemoryMailService::with_sample_data();

        let first = service.list_messages(&inbox().with_max_results(2)).unwrap();
        assert_eq!(ids(&first), vec!["1", "2"]);
        assert_eq!(first.next_page_token.as_deref(), Some("2"));

        let last = service
            .list_messages(&inbox().with_max_results(2).with_page_token(Some("4".to_string())))
            .unwrap();
        assert_eq!(ids(&last), vec!["5"]);
        assert_eq!(last.next_page_token, None);

        let bad = service.list_messages(&inbox().with_page_token(Some("nope".to_string())));
        assert!(bad.is_err());
    }

    #[test]
    fn test_page_token_past_the_end() {
        let service = InMemoryMailService::with_sample_data();

        let page = service
            .list_messages(&inbox().with_page_token(Some(usize::MAX.to_string())))
            .unwrap();
        assert!(page.messages.is_empty());
        assert_eq!(page.next_page_token, None);

        let page = service
            .list_messages(&inbox().with_page_token(Some("40".to_string())))
            .unwrap();
        assert!(page.messages.is_empty());
        assert_eq!(page.next_page_token, None);
    }

    #[test]
    fn test_summary_listing_omits_bodies() {
        let service = InMemoryMailService::with_sample_data();
        service.set_summary_listing(true);

        let page = service.list_messages(&inbox()).unwrap();
        assert!(page.messages.iter().all(|m| m.body.is_none()));
        assert!(service.get_message("1").unwrap().body.is_some());
    }

    #[test]
    fn test_query_tokens() {
        let service = InMemoryMailService::with_sample_data();

        let unread = service.list_messages(&inbox().with_q("is:unread")).unwrap();
        assert_eq!(ids(&unread), vec!["1", "3"]);

        let attachments = service.list_messages(&inbox().with_q("has:attachment")).unwrap();
        assert_eq!(ids(&attachments), vec!["2"]);

        let labeled = service
            .list_messages(&MessageQuery::default().with_q("label:label_work"))
            .unwrap();
        assert_eq!(ids(&labeled), vec!["102", "5"]);

        let text = service.list_messages(&inbox().with_q("PARTNERSHIP")).unwrap();
        assert_eq!(ids(&text), vec!["3"]);
    }

    #[test]
    fn test_count_ignores_paging() {
        let service = InMemoryMailService::with_sample_data();
        let query = inbox().with_max_results(1).with_page_token(Some("3".to_string()));
        assert_eq!(service.get_message_count(&query).unwrap(), 5);
        assert_eq!(service.get_message_count(&inbox().with_q("is:unread")).unwrap(), 2);
    }

    #[test]
    fn test_modify_message() {
        let service = InMemoryMailService::with_sample_data();
        service.modify_message("1", &LabelModification::mark_read()).unwrap();
        service.modify_message("1", &LabelModification::trash()).unwrap();

        let labels = service.message("1").unwrap().label_ids.unwrap();
        assert!(!labels.contains(&"UNREAD".to_string()));
        assert!(labels.contains(&"TRASH".to_string()));

        let missing = service.modify_message("nope", &LabelModification::star());
        assert!(matches!(
            missing,
            Err(MailError::RemoteRequestFailed { status: Some(404), .. })
        ));
    }

    #[test]
    fn test_send_and_drafts() {
        let service = InMemoryMailService::new();
        let outgoing = OutgoingMessage {
            to: "bob@example.com".to_string(),
            subject: "Hi".to_string(),
            body: "<p>Hello</p>".to_string(),
            ..OutgoingMessage::default()
        };

        service.send_message(&outgoing).unwrap();
        let sent = MessageQuery::for_label(label_ids::SENT);
        assert_eq!(service.get_message_count(&sent).unwrap(), 1);

        let draft = service.create_draft(&outgoing).unwrap();
        assert_eq!(service.list_drafts().unwrap(), vec![draft]);
        let drafts = MessageQuery::for_label(label_ids::DRAFT);
        assert_eq!(service.get_message_count(&drafts).unwrap(), 1);
    }

    #[test]
    fn test_access_gate() {
        let service = InMemoryMailService::with_sample_data();
        service.set_access(false);

        let status = service.check_access().unwrap();
        assert!(!status.has_access);
        assert!(status.reason.is_some());
        assert!(matches!(
            service.list_messages(&inbox()),
            Err(MailError::AccessDenied { operation: Operation::ListMessages })
        ));
        assert!(service.request_access().is_ok());
    }

    #[test]
    fn test_failure_injection_and_calls() {
        let service = InMemoryMailService::with_sample_data();
        service.fail(Operation::GetLabels);
        assert!(service.get_labels().is_err());

        service.recover(Operation::GetLabels);
        assert_eq!(service.get_labels().unwrap().len(), 8);

        assert_eq!(service.call_count(Operation::GetLabels), 2);
        assert_eq!(service.calls(), vec![Operation::GetLabels, Operation::GetLabels]);
    }

    #[test]
    fn test_get_message_not_found() {
        let service = InMemoryMailService::with_sample_data();
        assert_eq!(service.get_message("3").unwrap().id, "3");
        assert!(service.get_message("999").is_err());
    }
}
