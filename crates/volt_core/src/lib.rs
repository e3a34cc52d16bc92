//! VoltShell core: pure state machine and view-model helpers.
mod chat;
mod download;
mod effect;
mod heuristic;
mod msg;
mod navigation;
mod state;
mod update;
mod url_input;
mod view_model;

pub use chat::{
    AssistantReply, ChatCommand, ChatMessage, ChatPanel, ReplyOutcome, Speaker,
    CREDENTIAL_RESELECTED_REPLY, CREDENTIAL_UNAVAILABLE_REPLY, DOWNLOAD_REPLY,
    GENERIC_FAILURE_REPLY, SUMMARY_REPLY,
};
pub use download::{DownloadSimulator, DownloadState, DOWNLOAD_COMPLETE_NOTICE};
pub use effect::Effect;
pub use heuristic::is_download_eligible;
pub use msg::Msg;
pub use navigation::{LocationProbe, NavigationController, SurfaceCommand};
pub use state::AppState;
pub use update::update;
pub use url_input::{
    is_home, normalize_address, shortcut_location, HOME_LOCATION, INTERNAL_SCHEME,
    QUICK_ACCESS_SITES, SEARCH_ENDPOINT,
};
pub use view_model::AppViewModel;
