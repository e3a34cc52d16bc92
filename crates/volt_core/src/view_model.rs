use crate::{ChatMessage, DownloadState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub location: String,
    /// Contents of the address bar. Always the draft, never inferred from `location`.
    pub address_text: String,
    pub show_home: bool,
    pub download_prompt_visible: bool,
    pub download_enabled: bool,
    pub download_state: DownloadState,
    pub chat_visible: bool,
    pub chat_draft: String,
    pub chat_input_enabled: bool,
    pub typing: bool,
    pub messages: Vec<ChatMessage>,
    pub dirty: bool,
}
