use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use volt_core::Msg;
use volt_logging::volt_debug;

/// One-shot timer behind the simulated download.
///
/// A timer counts as scheduled from [`schedule`](Self::schedule) until the
/// shell applies the matching [`Msg::DownloadTimerElapsed`] and calls
/// [`mark_elapsed`](Self::mark_elapsed). Task completion is not consulted: the
/// task sends its message before it finishes, and the next download may start
/// in between. There is no cancellation.
#[derive(Debug, Default)]
pub struct DownloadTimer {
    pending: Option<JoinHandle<()>>,
}

impl DownloadTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Sends [`Msg::DownloadTimerElapsed`] on `tx` after `duration`.
    ///
    /// Returns `false` and does nothing if a timer is still waiting to be
    /// marked elapsed. Must be called from within a tokio runtime.
    pub fn schedule(&mut self, duration: Duration, tx: UnboundedSender<Msg>) -> bool {
        if self.is_scheduled() {
            volt_debug!("Download timer already running; ignoring schedule");
            return false;
        }
        volt_debug!("Download timer scheduled for {:?}", duration);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = tx.send(Msg::DownloadTimerElapsed);
        }));
        true
    }

    /// Releases the timer once its elapse message has been taken off the channel.
    pub fn mark_elapsed(&mut self) {
        self.pending = None;
    }
}
