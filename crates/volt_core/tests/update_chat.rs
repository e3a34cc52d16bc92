use std::sync::Once;

use pretty_assertions::assert_eq;
use volt_core::{
    update, AssistantReply, ChatCommand, ChatMessage, DownloadState, Effect, Msg, Speaker,
    AppState, DOWNLOAD_REPLY, GENERIC_FAILURE_REPLY, SUMMARY_REPLY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(volt_logging::initialize_for_tests);
}

fn send(state: AppState, text: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::ChatInputChanged(text.to_string()));
    update(state, Msg::ChatSubmitted)
}

#[test]
fn toggle_shows_and_hides_panel() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ChatToggled);
    assert!(state.view().chat_visible);
    let (state, _) = update(state, Msg::ChatToggled);
    assert!(!state.view().chat_visible);
}

#[test]
fn submit_appends_user_message_and_sets_typing() {
    init_logging();
    let (state, effects) = send(AppState::new(), "olá");

    assert_eq!(
        effects,
        vec![Effect::SendChat {
            text: "olá".to_string()
        }]
    );
    let view = state.view();
    assert_eq!(view.messages, vec![ChatMessage::user("olá")]);
    assert_eq!(view.chat_draft, "");
    assert!(view.typing);
    assert!(!view.chat_input_enabled);
}

#[test]
fn blank_message_appends_nothing() {
    init_logging();
    let (state, effects) = send(AppState::new(), "  \t ");

    assert!(effects.is_empty());
    assert!(state.view().messages.is_empty());
    assert!(!state.view().typing);
    assert_eq!(state.view().chat_draft, "  \t ");
}

#[test]
fn submit_while_typing_is_rejected() {
    init_logging();
    let (state, _) = send(AppState::new(), "primeira");
    let (state, effects) = send(state, "segunda");

    assert!(effects.is_empty());
    assert_eq!(state.view().messages.len(), 1);
    assert_eq!(state.view().chat_draft, "segunda");
}

#[test]
fn reply_appends_assistant_message_and_clears_typing() {
    init_logging();
    let (state, _) = send(AppState::new(), "olá");
    let (state, effects) = update(state, Msg::AssistantReplied(AssistantReply::answered("Oi!")));

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.typing);
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[1].speaker, Speaker::Assistant);
    assert_eq!(view.messages[1].text, "Oi!");
}

#[test]
fn failure_reply_also_clears_typing() {
    init_logging();
    let (state, _) = send(AppState::new(), "olá");
    let (state, _) = update(state, Msg::AssistantReplied(AssistantReply::failed()));

    assert!(!state.view().typing);
    assert_eq!(state.view().messages[1].text, GENERIC_FAILURE_REPLY);
}

#[test]
fn download_command_reply_starts_download_without_prompt() {
    init_logging();
    let (state, _) = send(AppState::new(), "baixar este vídeo");
    assert!(!state.navigation().download_eligible());

    let (state, effects) = update(
        state,
        Msg::AssistantReplied(AssistantReply::command(ChatCommand::DownloadVideo)),
    );

    assert_eq!(effects, vec![Effect::ScheduleDownload]);
    assert_eq!(state.view().download_state, DownloadState::Downloading);
    assert_eq!(state.view().messages[1].text, DOWNLOAD_REPLY);
}

#[test]
fn summary_command_reply_does_not_download() {
    init_logging();
    let (state, _) = send(AppState::new(), "resumir esta página");
    let (state, effects) = update(
        state,
        Msg::AssistantReplied(AssistantReply::command(ChatCommand::SummarizePage)),
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().download_state, DownloadState::Idle);
    assert_eq!(state.view().messages[1].text, SUMMARY_REPLY);
}

#[test]
fn transcript_grows_by_two_per_completed_exchange() {
    init_logging();
    let mut state = AppState::new();
    let inputs = ["um", "", "dois", "   ", "três"];
    let mut completed = 0;

    for input in inputs {
        let before = state.view().messages.len();
        let (next, effects) = send(state, input);
        state = next;
        if effects.is_empty() {
            assert_eq!(state.view().messages.len(), before);
            continue;
        }
        let (next, _) = update(state, Msg::AssistantReplied(AssistantReply::answered("ok")));
        state = next;
        completed += 1;
        assert_eq!(state.view().messages.len(), before + 2);
    }

    assert_eq!(completed, 3);
    let speakers: Vec<_> = state.view().messages.iter().map(|m| m.speaker).collect();
    assert_eq!(
        speakers,
        vec![
            Speaker::User,
            Speaker::Assistant,
            Speaker::User,
            Speaker::Assistant,
            Speaker::User,
            Speaker::Assistant,
        ]
    );
}
