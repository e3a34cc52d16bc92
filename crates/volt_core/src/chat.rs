pub const SUMMARY_REPLY: &str =
    "O VoltBrowser é um navegador super rápido com IA e downloads de vídeo.";
pub const DOWNLOAD_REPLY: &str =
    "Simulando o download do vídeo da página atual. É uma função principal do VoltBrowser!";
pub const CREDENTIAL_RESELECTED_REPLY: &str =
    "Houve um problema com a chave da API. Por favor, selecione sua chave novamente.";
pub const CREDENTIAL_UNAVAILABLE_REPLY: &str =
    "Desculpe, não consegui processar sua solicitação devido a um erro na API. Tente novamente mais tarde.";
pub const GENERIC_FAILURE_REPLY: &str =
    "Desculpe, não consegui processar sua solicitação. Tente novamente.";

const SUMMARIZE_PHRASE: &str = "resumir esta página";
const DOWNLOAD_PHRASE: &str = "baixar este vídeo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "Você",
            Speaker::Assistant => "Volt AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// In-band commands whose replies are fixed regardless of what the backend streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    SummarizePage,
    DownloadVideo,
}

impl ChatCommand {
    /// Case-insensitive phrase match; summarizing wins when both appear.
    pub fn detect(user_text: &str) -> Option<Self> {
        let lowered = user_text.to_lowercase();
        if lowered.contains(SUMMARIZE_PHRASE) {
            Some(ChatCommand::SummarizePage)
        } else if lowered.contains(DOWNLOAD_PHRASE) {
            Some(ChatCommand::DownloadVideo)
        } else {
            None
        }
    }

    pub fn canned_reply(self) -> &'static str {
        match self {
            ChatCommand::SummarizePage => SUMMARY_REPLY,
            ChatCommand::DownloadVideo => DOWNLOAD_REPLY,
        }
    }
}

/// How an exchange with the assistant ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Streamed reply used as-is.
    Answered,
    /// Streamed exchange succeeded and the reply was replaced by a command's canned text.
    Command(ChatCommand),
    /// Credential failure; the key reselection prompt ran. The user has to resend.
    CredentialReselected,
    /// Credential failure with no reselection authority available.
    CredentialUnavailable,
    /// Any other backend failure.
    Failed,
}

/// Final text of one exchange. Exactly one of these is produced per sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    pub outcome: ReplyOutcome,
}

impl AssistantReply {
    pub fn answered(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            outcome: ReplyOutcome::Answered,
        }
    }

    pub fn command(command: ChatCommand) -> Self {
        Self {
            text: command.canned_reply().to_string(),
            outcome: ReplyOutcome::Command(command),
        }
    }

    pub fn credential_reselected() -> Self {
        Self {
            text: CREDENTIAL_RESELECTED_REPLY.to_string(),
            outcome: ReplyOutcome::CredentialReselected,
        }
    }

    pub fn credential_unavailable() -> Self {
        Self {
            text: CREDENTIAL_UNAVAILABLE_REPLY.to_string(),
            outcome: ReplyOutcome::CredentialUnavailable,
        }
    }

    pub fn failed() -> Self {
        Self {
            text: GENERIC_FAILURE_REPLY.to_string(),
            outcome: ReplyOutcome::Failed,
        }
    }

    pub fn triggers_download(&self) -> bool {
        self.outcome == ReplyOutcome::Command(ChatCommand::DownloadVideo)
    }
}

/// Transcript, draft and typing flag of the assistant panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatPanel {
    visible: bool,
    draft: String,
    typing: bool,
    messages: Vec<ChatMessage>,
}

impl ChatPanel {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn typing(&self) -> bool {
        self.typing
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn edit_draft(&mut self, text: String) {
        self.draft = text;
    }

    /// Moves the draft into the transcript and raises the typing flag.
    ///
    /// Returns the text to send, or `None` if the draft is blank or a reply is
    /// still pending.
    pub fn submit(&mut self) -> Option<String> {
        if self.typing || self.draft.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.draft);
        self.messages.push(ChatMessage::user(text.clone()));
        self.typing = true;
        Some(text)
    }

    /// Appends the reply and lowers the typing flag, whatever the outcome.
    pub fn receive(&mut self, reply: &AssistantReply) {
        self.messages.push(ChatMessage::assistant(reply.text.clone()));
        self.typing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_match_regardless_of_case() {
        assert_eq!(
            ChatCommand::detect("Pode RESUMIR ESTA PÁGINA?"),
            Some(ChatCommand::SummarizePage)
        );
        assert_eq!(
            ChatCommand::detect("quero baixar este vídeo agora"),
            Some(ChatCommand::DownloadVideo)
        );
        assert_eq!(ChatCommand::detect("olá"), None);
    }

    #[test]
    fn answered_reply_is_trimmed() {
        assert_eq!(AssistantReply::answered("  oi \n").text, "oi");
    }
}
