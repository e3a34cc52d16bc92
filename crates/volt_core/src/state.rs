use crate::view_model::AppViewModel;
use crate::{is_home, ChatPanel, DownloadSimulator, DownloadState, NavigationController};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    navigation: NavigationController,
    download: DownloadSimulator,
    chat: ChatPanel,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn download(&self) -> &DownloadSimulator {
        &self.download
    }

    pub fn chat(&self) -> &ChatPanel {
        &self.chat
    }

    pub fn view(&self) -> AppViewModel {
        let downloading = self.download.is_downloading();
        let prompt_visible = self.navigation.download_eligible() && !downloading;
        AppViewModel {
            location: self.navigation.location().to_string(),
            address_text: self.navigation.pending_input().to_string(),
            show_home: is_home(self.navigation.location()),
            download_prompt_visible: prompt_visible,
            download_enabled: prompt_visible && self.download.state() == DownloadState::Idle,
            download_state: self.download.state(),
            chat_visible: self.chat.visible(),
            chat_draft: self.chat.draft().to_string(),
            chat_input_enabled: !self.chat.typing(),
            typing: self.chat.typing(),
            messages: self.chat.messages().to_vec(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn navigation_mut(&mut self) -> &mut NavigationController {
        &mut self.navigation
    }

    pub(crate) fn download_mut(&mut self) -> &mut DownloadSimulator {
        &mut self.download
    }

    pub(crate) fn chat_mut(&mut self) -> &mut ChatPanel {
        &mut self.chat
    }
}
