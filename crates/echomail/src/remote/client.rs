//! Mail backend HTTP client
//!
//! Talks to the `/api/gmail/*` endpoints of the EchoMail backend.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::MailService;
use super::api::{AccessStatus, Draft, MessagePage, MessageQuery, OutgoingMessage, ProviderMessage};
use crate::config::{ClientConfig, Credentials};
use crate::error::{MailError, Operation, Result};
use crate::models::{Label, LabelModification};

/// Response from listing messages
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMessagesResponse {
    messages: Option<Vec<Value>>,
    next_page_token: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessResponse {
    #[serde(default)]
    has_access: bool,
    profile: Option<Value>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthUrlResponse {
    auth_url: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CountResponse {
    count: Option<u64>,
}

#[derive(Debug, serde::Deserialize)]
struct LabelsResponse {
    labels: Option<Vec<Label>>,
}

#[derive(Debug, serde::Deserialize)]
struct DraftsResponse {
    drafts: Option<Vec<Draft>>,
}

/// HTTP implementation of [`MailService`]
pub struct HttpMailClient {
    agent: ureq::Agent,
    base_url: Url,
    auth_source: String,
    credentials: Option<Credentials>,
}

impl HttpMailClient {
    /// Path of the provider API below the base URL
    const API_PATH: &'static str = "api/gmail/";

    /// Create a client for the configured backend
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut base = config.api_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?.join(Self::API_PATH)?;

        Ok(Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url,
            auth_source: config.auth_source.clone(),
            credentials: config.credentials.clone(),
        })
    }

    /// Full URL of an endpoint below the API path
    fn endpoint(&self, operation: Operation, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| MailError::transport(operation, format!("Invalid URL: {}", e)))
    }

    fn message_endpoint(&self, operation: Operation, id: &str) -> Result<Url> {
        self.endpoint(operation, &format!("messages/{}", urlencoding::encode(id)))
    }

    fn query_endpoint(&self, operation: Operation, path: &str, query: &MessageQuery) -> Result<Url> {
        let mut url = self.endpoint(operation, path)?;
        let pairs = query.to_query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Attach session credentials to a request
    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.credentials {
            Some(Credentials::Cookie(cookie)) => request.header("Cookie", cookie.as_str()),
            Some(Credentials::Bearer(token)) => {
                request.header("Authorization", &format!("Bearer {}", token))
            }
            None => request,
        }
    }

    fn get_json(&self, operation: Operation, url: &Url) -> Result<Value> {
        debug!("GET {} ({})", url.path(), operation);

        let mut response = self
            .authorize(self.agent.get(url.as_str()))
            .call()
            .map_err(|e| request_error(operation, e))?;

        response
            .body_mut()
            .read_json()
            .map_err(|e| invalid_response(operation, e))
    }

    fn post_json<T: serde::Serialize>(&self, operation: Operation, url: &Url, body: &T) -> Result<Value> {
        debug!("POST {} ({})", url.path(), operation);

        let mut response = self
            .authorize(self.agent.post(url.as_str()))
            .send_json(body)
            .map_err(|e| request_error(operation, e))?;

        // Send and draft results are informational; an empty body is fine
        Ok(response.body_mut().read_json().unwrap_or(Value::Null))
    }

    fn patch_json<T: serde::Serialize>(&self, operation: Operation, url: &Url, body: &T) -> Result<()> {
        debug!("PATCH {} ({})", url.path(), operation);

        self.authorize(self.agent.patch(url.as_str()))
            .send_json(body)
            .map_err(|e| request_error(operation, e))?;
        Ok(())
    }
}

impl MailService for HttpMailClient {
    fn check_access(&self) -> Result<AccessStatus> {
        let url = self.endpoint(Operation::CheckAccess, "access")?;
        let value = self.get_json(Operation::CheckAccess, &url)?;
        parse_access(value)
    }

    fn request_access(&self) -> Result<String> {
        let mut url = self.endpoint(Operation::RequestAccess, "auth")?;
        url.query_pairs_mut().append_pair("source", &self.auth_source);
        let value = self.get_json(Operation::RequestAccess, &url)?;
        parse_auth_url(value)
    }

    fn list_messages(&self, query: &MessageQuery) -> Result<MessagePage> {
        let url = self.query_endpoint(Operation::ListMessages, "messages", query)?;
        let value = self.get_json(Operation::ListMessages, &url)?;
        parse_message_page(value)
    }

    fn get_message(&self, id: &str) -> Result<ProviderMessage> {
        let url = self.message_endpoint(Operation::GetMessage, id)?;
        let value = self.get_json(Operation::GetMessage, &url)?;
        parse_single_message(value)
    }

    fn get_labels(&self) -> Result<Vec<Label>> {
        let url = self.endpoint(Operation::GetLabels, "labels")?;
        let value = self.get_json(Operation::GetLabels, &url)?;
        let response: LabelsResponse = decode(Operation::GetLabels, unwrap_envelope(value))?;
        Ok(response.labels.unwrap_or_default())
    }

    fn get_message_count(&self, query: &MessageQuery) -> Result<u64> {
        let url = self.query_endpoint(Operation::GetMessageCount, "count", &query.without_paging())?;
        let value = self.get_json(Operation::GetMessageCount, &url)?;
        let response: CountResponse = decode(Operation::GetMessageCount, unwrap_envelope(value))?;
        Ok(response.count.unwrap_or(0))
    }

    fn send_message(&self, message: &OutgoingMessage) -> Result<()> {
        let url = self.endpoint(Operation::SendMessage, "send")?;
        self.post_json(Operation::SendMessage, &url, message)?;
        Ok(())
    }

    fn list_drafts(&self) -> Result<Vec<Draft>> {
        let url = self.endpoint(Operation::ListDrafts, "drafts")?;
        let value = self.get_json(Operation::ListDrafts, &url)?;
        let response: DraftsResponse = decode(Operation::ListDrafts, unwrap_envelope(value))?;
        Ok(response.drafts.unwrap_or_default())
    }

    fn create_draft(&self, message: &OutgoingMessage) -> Result<Draft> {
        let url = self.endpoint(Operation::CreateDraft, "drafts")?;
        let value = self.post_json(Operation::CreateDraft, &url, message)?;
        // Servers that answer without a draft body still saved it
        Ok(serde_json::from_value(unwrap_envelope(value)).unwrap_or_default())
    }

    fn modify_message(&self, id: &str, modification: &LabelModification) -> Result<()> {
        let url = self.message_endpoint(Operation::ModifyMessage, id)?;
        self.patch_json(Operation::ModifyMessage, &url, modification)
    }
}

fn request_error(operation: Operation, error: ureq::Error) -> MailError {
    match error {
        ureq::Error::StatusCode(status) => MailError::status(operation, status),
        other => MailError::transport(operation, other.to_string()),
    }
}

fn invalid_response(operation: Operation, error: impl std::fmt::Display) -> MailError {
    MailError::InvalidResponse {
        operation,
        message: error.to_string(),
    }
}

fn decode<T: DeserializeOwned>(operation: Operation, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| invalid_response(operation, e))
}

/// Strip the `{ "data": ... }` wrapper some backend versions add
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    }
}

fn parse_access(value: Value) -> Result<AccessStatus> {
    let reason = value
        .get("message")
        .or_else(|| value.get("reason"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let response: AccessResponse = decode(Operation::CheckAccess, unwrap_envelope(value))?;

    Ok(AccessStatus {
        has_access: response.has_access,
        reason,
        profile: response.profile,
    })
}

fn parse_auth_url(value: Value) -> Result<String> {
    let response: AuthUrlResponse = decode(Operation::RequestAccess, unwrap_envelope(value))?;
    response
        .auth_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| invalid_response(Operation::RequestAccess, "missing authUrl"))
}

fn parse_message_page(value: Value) -> Result<MessagePage> {
    let response: ListMessagesResponse = decode(Operation::ListMessages, unwrap_envelope(value))?;
    let messages = response
        .messages
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ProviderMessage>(entry) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!("Skipping undecodable message in list response: {}", e);
                None
            }
        })
        .collect();
    Ok(MessagePage {
        messages,
        next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
    })
}

fn parse_single_message(value: Value) -> Result<ProviderMessage> {
    let mut value = unwrap_envelope(value);
    if let Some(email) = value.get_mut("email").map(Value::take)
        && email.is_object()
    {
        value = email;
    }
    decode(Operation::GetMessage, value)
}
