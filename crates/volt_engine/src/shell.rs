use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use volt_core::{
    update, AppState, AppViewModel, AssistantReply, Effect, LocationProbe, Msg, SurfaceCommand,
};
use volt_logging::{volt_debug, volt_error, volt_info, volt_warn};

use crate::assistant::ASSISTANT_PREAMBLE;
use crate::{
    AssistantSession, ChannelLoadSink, CompletionBackend, ContentSurface, DownloadTimer,
    KeySelector, LoadSink,
};

#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub download_duration: Duration,
    pub preamble: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            download_duration: Duration::from_secs(3),
            preamble: ASSISTANT_PREAMBLE.to_string(),
        }
    }
}

pub struct ShellBuilder {
    settings: ShellSettings,
    backend: Arc<dyn CompletionBackend>,
    key_selector: Option<Arc<dyn KeySelector>>,
}

impl ShellBuilder {
    pub fn key_selector(mut self, selector: Arc<dyn KeySelector>) -> Self {
        self.key_selector = Some(selector);
        self
    }

    /// Builds the shell. `surface` receives the sink its load events must go to.
    pub fn build<F>(self, surface: F) -> Shell
    where
        F: FnOnce(Arc<dyn LoadSink>) -> Arc<dyn ContentSurface>,
    {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let sink: Arc<dyn LoadSink> = Arc::new(ChannelLoadSink::new(msg_tx.clone()));
        let assistant =
            AssistantSession::new(self.backend, self.key_selector, self.settings.preamble.clone());

        Shell {
            state: AppState::new(),
            settings: self.settings,
            surface: surface(sink),
            assistant: Arc::new(tokio::sync::Mutex::new(assistant)),
            download_timer: DownloadTimer::new(),
            notices: Vec::new(),
            msg_tx,
            msg_rx,
        }
    }
}

/// Runs the core state machine against the real collaborators.
///
/// UI events go in through [`dispatch`](Self::dispatch). Work that completes
/// later (surface loads, assistant replies, the download timer) comes back as
/// messages on an internal channel, drained by
/// [`process_next`](Self::process_next) or [`process_pending`](Self::process_pending).
/// Must live inside a tokio runtime.
pub struct Shell {
    state: AppState,
    settings: ShellSettings,
    surface: Arc<dyn ContentSurface>,
    assistant: Arc<tokio::sync::Mutex<AssistantSession>>,
    download_timer: DownloadTimer,
    notices: Vec<String>,
    msg_tx: UnboundedSender<Msg>,
    msg_rx: UnboundedReceiver<Msg>,
}

impl Shell {
    pub fn builder(settings: ShellSettings, backend: Arc<dyn CompletionBackend>) -> ShellBuilder {
        ShellBuilder {
            settings,
            backend,
            key_selector: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn download_timer(&self) -> &DownloadTimer {
        &self.download_timer
    }

    /// Notices surfaced since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn dispatch(&mut self, msg: Msg) {
        if msg == Msg::DownloadTimerElapsed {
            self.download_timer.mark_elapsed();
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Waits for the next background message and applies it.
    pub async fn process_next(&mut self) -> Option<Msg> {
        let msg = self.msg_rx.recv().await?;
        self.dispatch(msg.clone());
        Some(msg)
    }

    /// Applies every background message already queued. Returns how many ran.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            processed += 1;
        }
        processed
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Surface(command) => self.drive_surface(command),
            Effect::ProbeLocation => {
                let probe = self.probe_location();
                self.dispatch(Msg::LocationProbed(probe));
            }
            Effect::ScheduleDownload => {
                let scheduled = self
                    .download_timer
                    .schedule(self.settings.download_duration, self.msg_tx.clone());
                if !scheduled {
                    volt_error!("Download started while a previous timer was still pending");
                }
            }
            Effect::ShowNotice(text) => {
                volt_info!("Notice: {}", text);
                self.notices.push(text);
                // The notice is shown immediately, which counts as acknowledged.
                self.dispatch(Msg::NoticeAcknowledged);
            }
            Effect::SendChat { text } => self.spawn_exchange(text),
        }
    }

    fn drive_surface(&self, command: SurfaceCommand) {
        volt_debug!("Surface command {:?}", command);
        match command {
            SurfaceCommand::Load(location) => self.surface.load(&location),
            SurfaceCommand::Back => self.surface.go_back(),
            SurfaceCommand::Forward => self.surface.go_forward(),
            SurfaceCommand::Reload => self.surface.reload(),
        }
    }

    fn probe_location(&self) -> LocationProbe {
        match self.surface.current_location() {
            Ok(location) => LocationProbe::Resolved(location),
            Err(err) => {
                volt_warn!(
                    "Could not read content location ({}); address bar may not reflect in-page navigation",
                    err
                );
                LocationProbe::Unknown
            }
        }
    }

    fn spawn_exchange(&self, text: String) {
        let assistant = Arc::clone(&self.assistant);
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let exchange = tokio::spawn(async move { assistant.lock().await.send(&text).await });
            // A reply always follows a submitted message, even if the exchange task died.
            let reply = match exchange.await {
                Ok(Some(reply)) => reply,
                Ok(None) => {
                    volt_warn!("Blank message reached the assistant; releasing the chat input");
                    AssistantReply::failed()
                }
                Err(err) => {
                    volt_error!("Assistant exchange aborted: {}", err);
                    AssistantReply::failed()
                }
            };
            let _ = tx.send(Msg::AssistantReplied(reply));
        });
    }
}
