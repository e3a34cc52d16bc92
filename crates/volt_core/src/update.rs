use crate::{
    shortcut_location, AppState, DownloadState, Effect, Msg, SurfaceCommand, DOWNLOAD_COMPLETE_NOTICE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AddressInputChanged(text) => {
            state.navigation_mut().edit_input(text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddressFocused => {
            state.navigation_mut().focus_input();
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddressBlurred => {
            state.navigation_mut().blur_input();
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddressSubmitted => navigate(&mut state, None),
        Msg::ShortcutClicked(site) => navigate(&mut state, Some(&shortcut_location(&site))),
        // History lives in the content surface; nothing to track locally.
        Msg::BackClicked => vec![Effect::Surface(SurfaceCommand::Back)],
        Msg::ForwardClicked => vec![Effect::Surface(SurfaceCommand::Forward)],
        Msg::RefreshClicked => vec![Effect::Surface(SurfaceCommand::Reload)],
        Msg::SurfaceLoadCompleted => vec![Effect::ProbeLocation],
        Msg::LocationProbed(probe) => {
            if state.navigation_mut().observe(probe) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DownloadClicked => {
            let offered = state.navigation().download_eligible()
                && state.download().state() == DownloadState::Idle;
            if offered {
                start_download(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::DownloadPromptDismissed => {
            if state.navigation().download_eligible() {
                state.navigation_mut().dismiss_download_prompt();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DownloadTimerElapsed => {
            if state.download_mut().finish() {
                // The finished download consumes the prompt for whatever is loaded now.
                state.navigation_mut().dismiss_download_prompt();
                state.mark_dirty();
                vec![Effect::ShowNotice(DOWNLOAD_COMPLETE_NOTICE.to_string())]
            } else {
                Vec::new()
            }
        }
        Msg::NoticeAcknowledged => {
            if state.download().state() == DownloadState::Complete {
                state.download_mut().acknowledge();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ChatToggled => {
            state.chat_mut().toggle();
            state.mark_dirty();
            Vec::new()
        }
        Msg::ChatInputChanged(text) => {
            state.chat_mut().edit_draft(text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ChatSubmitted => match state.chat_mut().submit() {
            Some(text) => {
                state.mark_dirty();
                vec![Effect::SendChat { text }]
            }
            None => Vec::new(),
        },
        Msg::AssistantReplied(reply) => {
            state.chat_mut().receive(&reply);
            state.mark_dirty();
            if reply.triggers_download() {
                start_download(&mut state)
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn navigate(state: &mut AppState, target_override: Option<&str>) -> Vec<Effect> {
    match state.navigation_mut().submit(target_override) {
        Some(command) => {
            state.mark_dirty();
            vec![Effect::Surface(command)]
        }
        None => Vec::new(),
    }
}

fn start_download(state: &mut AppState) -> Vec<Effect> {
    if !state.download_mut().start() {
        return Vec::new();
    }
    state.navigation_mut().dismiss_download_prompt();
    state.mark_dirty();
    vec![Effect::ScheduleDownload]
}
