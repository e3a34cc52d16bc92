#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the address bar.
    AddressInputChanged(String),
    AddressFocused,
    AddressBlurred,
    /// User pressed enter in the address bar.
    AddressSubmitted,
    /// User clicked a quick-access shortcut (display name, e.g. "Stack Overflow").
    ShortcutClicked(String),
    BackClicked,
    ForwardClicked,
    RefreshClicked,
    /// The content surface finished loading something.
    SurfaceLoadCompleted,
    /// Result of asking the content surface for its own location.
    LocationProbed(crate::LocationProbe),
    /// User clicked "download now" on the prompt or the header button.
    DownloadClicked,
    /// User dismissed the download prompt for the current location.
    DownloadPromptDismissed,
    /// The simulated download timer fired.
    DownloadTimerElapsed,
    /// The completion notice has been shown to the user.
    NoticeAcknowledged,
    /// User toggled the assistant panel.
    ChatToggled,
    ChatInputChanged(String),
    ChatSubmitted,
    /// The assistant exchange for the last submitted message resolved.
    AssistantReplied(crate::AssistantReply),
}
