//! Thin client for the document-chat backend.
//!
//! Only the endpoints the CLI needs are covered: asking a question and listing
//! documents. Requests reuse the shared client, so a session cookie seeded
//! into its jar authenticates them.

mod error;

pub use error::ApiError;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

const ASK_PATH: &str = "api/chat/ask";
const DOCUMENTS_PATH: &str = "api/documents";

/// Body of `POST /api/chat/ask`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AskRequest {
    /// The user's question.
    pub question: String,
    /// Continue an existing conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
    /// Restrict the answer to one document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<i64>,
}

/// Reply from `POST /api/chat/ask`.
///
/// The backend answers either with `answer` or, when it cannot tell which
/// document the question is about, with a clarification `message` and the
/// documents to choose from. Both shapes decode into this type; `answer`
/// holds whichever text was sent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawChatReply")]
pub struct ChatReply {
    /// Assistant reply; may embed download links.
    pub answer: String,
    /// Conversation the exchange was stored under.
    pub conversation_id: Option<i64>,
    /// Reply category reported by the backend (e.g. `template_download`).
    pub reply_type: Option<String>,
    /// The backend wants the question narrowed to one document.
    pub needs_clarification: bool,
    /// Documents offered with a clarification request.
    pub available_documents: Vec<DocumentRef>,
}

/// Document offered in a clarification reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RawChatReply {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    conversation_id: Option<i64>,
    #[serde(default, rename = "type")]
    reply_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    needs_clarification: bool,
    #[serde(default)]
    available_documents: Vec<DocumentRef>,
}

impl TryFrom<RawChatReply> for ChatReply {
    type Error = String;

    fn try_from(raw: RawChatReply) -> Result<Self, Self::Error> {
        let answer = raw
            .answer
            .or(raw.message)
            .ok_or_else(|| "reply has neither `answer` nor `message`".to_string())?;
        Ok(Self {
            answer,
            conversation_id: raw.conversation_id,
            reply_type: raw.reply_type,
            needs_clarification: raw.needs_clarification,
            available_documents: raw.available_documents,
        })
    }
}

/// One entry of `GET /api/documents`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_processed: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_template: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Reads a SQLite-style boolean: `true`/`false`, `1`/`0` or `null` (false).
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Int(value)) => value != 0,
        None => false,
    })
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<DocumentSummary>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the chat backend's REST API.
#[derive(Debug, Clone)]
pub struct ChatApi {
    client: Client,
    base_url: Url,
}

impl ChatApi {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000`).
    #[must_use]
    pub fn new(client: Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Base URL with a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Asks a question and returns the assistant reply.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EmptyQuestion`] for a blank question, otherwise
    /// network, status or decode errors from the backend call.
    #[instrument(skip(self, request), fields(conversation_id = ?request.conversation_id))]
    pub async fn ask(&self, request: &AskRequest) -> Result<ChatReply, ApiError> {
        if request.question.trim().is_empty() {
            return Err(ApiError::EmptyQuestion);
        }
        let endpoint = self.endpoint(ASK_PATH)?;
        let response = self
            .client
            .post(endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::network(endpoint.as_str(), e))?;
        let response = check_status(response, &endpoint).await?;
        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| ApiError::decode(endpoint.as_str(), e))?;
        debug!(
            answer_len = reply.answer.len(),
            reply_type = ?reply.reply_type,
            needs_clarification = reply.needs_clarification,
            "chat reply received"
        );
        Ok(reply)
    }

    /// Lists documents known to the backend.
    ///
    /// # Errors
    ///
    /// Returns network, status or decode errors from the backend call.
    #[instrument(skip(self))]
    pub async fn documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        let endpoint = self.endpoint(DOCUMENTS_PATH)?;
        let response = self
            .client
            .get(endpoint.clone())
            .send()
            .await
            .map_err(|e| ApiError::network(endpoint.as_str(), e))?;
        let response = check_status(response, &endpoint).await?;
        let list: DocumentList = response
            .json()
            .await
            .map_err(|e| ApiError::decode(endpoint.as_str(), e))?;
        debug!(documents = list.documents.len(), "document list received");
        Ok(list.documents)
    }

    /// URL serving the binary of document `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidEndpoint`] if the URL cannot be built.
    pub fn document_download_url(&self, id: i64) -> Result<Url, ApiError> {
        self.endpoint(&format!("{DOCUMENTS_PATH}/{id}/download"))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::invalid_endpoint(self.base_url.as_str(), path))
    }
}

async fn check_status(response: Response, endpoint: &Url) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let fallback = status.canonical_reason().unwrap_or("Unknown Status").to_string();
    let message = response
        .json::<ErrorBody>()
        .await
        .map_or(fallback, |body| body.error);
    Err(ApiError::status(endpoint.as_str(), status.as_u16(), message))
}
