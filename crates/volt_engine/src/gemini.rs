use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use url::Url;
use volt_logging::{volt_debug, volt_trace};

use crate::{ApiKeyStore, CompletionBackend, CompletionError, FragmentStream, SessionHandle};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn turn(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }

    fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: &'a Content,
    contents: &'a [Content],
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Clone)]
struct Conversation {
    system_instruction: Content,
    history: Vec<Content>,
}

type Conversations = Arc<Mutex<HashMap<u64, Conversation>>>;

/// Completion backend speaking the Gemini `streamGenerateContent` SSE API.
///
/// Conversation history is kept client-side per session. A turn is recorded
/// only after its reply stream finished cleanly.
pub struct GeminiBackend {
    settings: GeminiSettings,
    base: Url,
    keys: ApiKeyStore,
    client: reqwest::Client,
    conversations: Conversations,
    next_session: AtomicU64,
}

impl GeminiBackend {
    pub fn new(settings: GeminiSettings, keys: ApiKeyStore) -> Result<Self, CompletionError> {
        let base = Url::parse(&settings.endpoint)
            .map_err(|err| CompletionError::new(format!("invalid endpoint: {err}")))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| CompletionError::new(err.to_string()))?;
        Ok(Self {
            settings,
            base,
            keys,
            client,
            conversations: Arc::new(Mutex::new(HashMap::new())),
            next_session: AtomicU64::new(0),
        })
    }

    fn stream_url(&self) -> Result<Url, CompletionError> {
        let path = format!(
            "v1beta/models/{}:streamGenerateContent",
            self.settings.model
        );
        let mut url = self
            .base
            .join(&path)
            .map_err(|err| CompletionError::new(format!("invalid endpoint: {err}")))?;
        url.set_query(Some("alt=sse"));
        Ok(url)
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn create_session(&self, preamble: &str) -> Result<SessionHandle, CompletionError> {
        let id = self.next_session.fetch_add(1, Ordering::SeqCst) + 1;
        let conversation = Conversation {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(preamble.to_string()),
                }],
            },
            history: Vec::new(),
        };
        lock(&self.conversations).insert(id, conversation);
        Ok(SessionHandle::new(id))
    }

    async fn stream_send(
        &self,
        session: SessionHandle,
        text: &str,
    ) -> Result<FragmentStream, CompletionError> {
        let key = self
            .keys
            .get()
            .ok_or_else(|| CompletionError::new("API key not configured"))?;
        let conversation = lock(&self.conversations)
            .get(&session.id())
            .cloned()
            .ok_or_else(|| CompletionError::new(format!("unknown session {}", session.id())))?;

        let user_turn = Content::turn("user", text);
        let mut contents = conversation.history;
        contents.push(user_turn.clone());
        let body = serde_json::to_vec(&GenerateRequest {
            system_instruction: &conversation.system_instruction,
            contents: &contents,
        })
        .map_err(|err| CompletionError::new(err.to_string()))?;

        let url = self.stream_url()?;
        volt_debug!("POST {} ({} turns)", url, contents.len());
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &text));
        }

        let reply = ReplyStream {
            body: response.bytes_stream().boxed(),
            decoder: SseDecoder::default(),
            pending: VecDeque::new(),
            reply: String::new(),
            done: false,
            failed: false,
            turn: Some(PendingTurn {
                conversations: Arc::clone(&self.conversations),
                session: session.id(),
                user_turn,
            }),
        };
        Ok(reply.into_stream())
    }
}

struct PendingTurn {
    conversations: Conversations,
    session: u64,
    user_turn: Content,
}

impl PendingTurn {
    fn commit(self, reply: String) {
        let mut conversations = lock(&self.conversations);
        if let Some(conversation) = conversations.get_mut(&self.session) {
            conversation.history.push(self.user_turn);
            conversation.history.push(Content::turn("model", reply));
        }
    }
}

struct ReplyStream {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    reply: String,
    done: bool,
    failed: bool,
    turn: Option<PendingTurn>,
}

impl ReplyStream {
    fn into_stream(self) -> FragmentStream {
        Box::pin(stream::unfold(self, |mut state| async move {
            loop {
                if let Some(fragment) = state.pending.pop_front() {
                    state.reply.push_str(&fragment);
                    return Some((Ok(fragment), state));
                }
                if state.done {
                    if !state.failed {
                        if let Some(turn) = state.turn.take() {
                            turn.commit(std::mem::take(&mut state.reply));
                        }
                    }
                    return None;
                }
                let payloads = match state.body.next().await {
                    Some(Ok(chunk)) => state.decoder.push(&chunk),
                    Some(Err(err)) => return Some((Err(state.fail(map_reqwest_error(err))), state)),
                    None => {
                        state.done = true;
                        state.decoder.finish()
                    }
                };
                if let Err(err) = state.enqueue(payloads) {
                    return Some((Err(state.fail(err)), state));
                }
            }
        }))
    }

    fn enqueue(&mut self, payloads: Vec<String>) -> Result<(), CompletionError> {
        for payload in payloads {
            if let Some(fragment) = parse_chunk(&payload)? {
                self.pending.push_back(fragment);
            }
        }
        Ok(())
    }

    fn fail(&mut self, err: CompletionError) -> CompletionError {
        self.done = true;
        self.failed = true;
        self.pending.clear();
        err
    }
}

/// Splits a server-sent-events byte stream into `data:` payloads.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feeds bytes; returns the payloads of every event completed by them.
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(end) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line);
            self.feed_line(line.trim_end_matches(['\n', '\r']), &mut events);
        }
        events
    }

    fn finish(&mut self) -> Vec<String> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest).into_owned();
            self.feed_line(line.trim_end_matches('\r'), &mut events);
        }
        self.feed_line("", &mut events);
        events
    }

    fn feed_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            if !self.data.is_empty() {
                events.push(self.data.join("\n"));
                self.data.clear();
            }
            return;
        }
        if let Some(value) = line.strip_prefix("data:") {
            self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
    }
}

fn parse_chunk(payload: &str) -> Result<Option<String>, CompletionError> {
    if payload.trim() == "[DONE]" {
        return Ok(None);
    }
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|err| CompletionError::new(format!("malformed stream chunk: {err}")))?;
    if let Some(error) = chunk.error {
        return Err(CompletionError::new(error.message));
    }
    let text: String = chunk
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(Content::text)
        .unwrap_or_default();
    volt_trace!("stream fragment of {} bytes", text.len());
    Ok((!text.is_empty()).then_some(text))
}

fn api_error(status: reqwest::StatusCode, body: &str) -> CompletionError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => CompletionError::new(parsed.error.message),
        Err(_) if body.trim().is_empty() => CompletionError::new(format!("http status {status}")),
        Err(_) => CompletionError::new(format!("http status {status}: {}", body.trim())),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        return CompletionError::new(format!("timeout: {err}"));
    }
    CompletionError::new(format!("network error: {err}"))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
