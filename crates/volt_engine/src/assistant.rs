use std::sync::Arc;

use futures_util::StreamExt;
use volt_core::{AssistantReply, ChatCommand};
use volt_logging::{volt_error, volt_info, volt_warn};

use crate::{CompletionBackend, CompletionError, KeySelector, SessionHandle};

/// Persona and command description every new session starts with.
pub const ASSISTANT_PREAMBLE: &str = r#"Você é um assistente de IA integrado ao VoltBrowser. Ajude os usuários com informações sobre a web e o navegador. Você pode:
- Responder perguntas gerais.
- "Resumir esta página" (se o usuário pedir, diga que você pode simular o resumo da página atual, que é: "O VoltBrowser é um navegador super rápido com IA e downloads de vídeo.").
- "Baixar este vídeo" (se o usuário pedir, diga que você pode simular o download do vídeo da página atual, que é uma função principal do VoltBrowser.)."#;

/// Owns the long-lived conversation with the completion backend.
///
/// The session handle is created on the first send and reused afterwards. A
/// credential failure drops it so the next send starts a fresh session under
/// whatever key the user picked.
pub struct AssistantSession {
    backend: Arc<dyn CompletionBackend>,
    key_selector: Option<Arc<dyn KeySelector>>,
    preamble: String,
    handle: Option<SessionHandle>,
}

impl AssistantSession {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        key_selector: Option<Arc<dyn KeySelector>>,
        preamble: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            key_selector,
            preamble: preamble.into(),
            handle: None,
        }
    }

    pub fn handle(&self) -> Option<SessionHandle> {
        self.handle
    }

    /// Runs one exchange and returns the single reply to append.
    ///
    /// Returns `None` for blank input. Failures never surface partial
    /// streamed text; they become one of the canned error replies.
    pub async fn send(&mut self, user_text: &str) -> Option<AssistantReply> {
        if user_text.trim().is_empty() {
            return None;
        }

        let reply = match self.exchange(user_text).await {
            Ok(streamed) => match ChatCommand::detect(user_text) {
                Some(command) => AssistantReply::command(command),
                None => AssistantReply::answered(streamed),
            },
            Err(err) if err.is_credential_failure() => self.recover_credentials(&err).await,
            Err(err) => {
                volt_error!("Assistant exchange failed: {}", err);
                AssistantReply::failed()
            }
        };
        Some(reply)
    }

    async fn exchange(&mut self, user_text: &str) -> Result<String, CompletionError> {
        let session = self.session().await?;
        let mut fragments = self.backend.stream_send(session, user_text).await?;

        let mut reply = String::new();
        while let Some(fragment) = fragments.next().await {
            reply.push_str(&fragment?);
        }
        Ok(reply)
    }

    async fn session(&mut self) -> Result<SessionHandle, CompletionError> {
        if let Some(handle) = self.handle {
            return Ok(handle);
        }
        let handle = self.backend.create_session(&self.preamble).await?;
        volt_info!("Assistant session {} created", handle.id());
        self.handle = Some(handle);
        Ok(handle)
    }

    /// Not a retry: the user is told to resend once the key has been reselected.
    async fn recover_credentials(&mut self, err: &CompletionError) -> AssistantReply {
        volt_warn!("Assistant credential failure: {}", err);
        self.handle = None;

        let Some(selector) = self.key_selector.as_ref() else {
            return AssistantReply::credential_unavailable();
        };
        match selector.open_select_key().await {
            Ok(()) => AssistantReply::credential_reselected(),
            Err(select_err) => {
                volt_warn!("Key reselection failed: {}", select_err);
                AssistantReply::credential_unavailable()
            }
        }
    }
}
