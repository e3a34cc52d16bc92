use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::stream;

use crate::{CompletionBackend, CompletionError, FragmentStream, SessionHandle};

/// One scripted answer to a `stream_send` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Fragments(Vec<String>),
    /// The exchange fails before any fragment arrives.
    Fail(CompletionError),
    /// Some fragments arrive, then the stream errors.
    Interrupted {
        fragments: Vec<String>,
        error: CompletionError,
    },
}

impl ScriptedReply {
    pub fn text(fragments: &[&str]) -> Self {
        ScriptedReply::Fragments(fragments.iter().map(|f| f.to_string()).collect())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        ScriptedReply::Fail(CompletionError::new(message))
    }
}

/// Deterministic backend. Each `stream_send` pops the next script; once the
/// queue is empty it echoes the user text back word by word.
///
/// Used by tests and by the app when no API key is configured.
#[derive(Default)]
pub struct ScriptedBackend {
    scripts: Mutex<VecDeque<ScriptedReply>>,
    next_session: AtomicU64,
    preambles: Mutex<Vec<String>>,
    sent: Mutex<Vec<(SessionHandle, String)>>,
}

impl ScriptedBackend {
    pub fn new(scripts: Vec<ScriptedReply>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            ..Self::default()
        }
    }

    pub fn echo() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: ScriptedReply) {
        lock(&self.scripts).push_back(reply);
    }

    pub fn sessions_created(&self) -> u64 {
        self.next_session.load(Ordering::SeqCst)
    }

    /// Preamble of every session created so far, in order.
    pub fn preambles(&self) -> Vec<String> {
        lock(&self.preambles).clone()
    }

    /// Every `(session, text)` pair sent so far, in order.
    pub fn sent(&self) -> Vec<(SessionHandle, String)> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn create_session(&self, preamble: &str) -> Result<SessionHandle, CompletionError> {
        let id = self.next_session.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.preambles).push(preamble.to_string());
        Ok(SessionHandle::new(id))
    }

    async fn stream_send(
        &self,
        session: SessionHandle,
        text: &str,
    ) -> Result<FragmentStream, CompletionError> {
        lock(&self.sent).push((session, text.to_string()));
        let script = lock(&self.scripts).pop_front();

        let items: Vec<Result<String, CompletionError>> = match script {
            Some(ScriptedReply::Fragments(fragments)) => fragments.into_iter().map(Ok).collect(),
            Some(ScriptedReply::Fail(error)) => return Err(error),
            Some(ScriptedReply::Interrupted { fragments, error }) => fragments
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
            None => format!("Modo offline: {text}")
                .split_inclusive(' ')
                .map(|word| Ok(word.to_string()))
                .collect(),
        };
        Ok(Box::pin(stream::iter(items)))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
