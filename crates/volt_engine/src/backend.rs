use async_trait::async_trait;

use crate::{CompletionError, FragmentStream, SessionHandle};

/// Conversational completion service behind the assistant panel.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Opens a conversation whose system preamble is fixed for its lifetime.
    async fn create_session(&self, preamble: &str) -> Result<SessionHandle, CompletionError>;

    /// Sends one user turn and returns the reply as ordered text fragments.
    async fn stream_send(
        &self,
        session: SessionHandle,
        text: &str,
    ) -> Result<FragmentStream, CompletionError>;
}
