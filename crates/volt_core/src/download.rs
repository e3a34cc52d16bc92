/// Notice surfaced once a simulated download finishes.
pub const DOWNLOAD_COMPLETE_NOTICE: &str = "Vídeo baixado com sucesso! (Simulado)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    Downloading,
    /// Finished; waiting for the completion notice to be acknowledged.
    Complete,
}

/// Idle -> Downloading -> Complete -> Idle.
///
/// The timer itself lives outside the core; this type only tracks the phase and
/// decides which transitions are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadSimulator {
    state: DownloadState,
}

impl DownloadSimulator {
    pub fn state(&self) -> DownloadState {
        self.state
    }

    pub fn is_downloading(&self) -> bool {
        self.state == DownloadState::Downloading
    }

    /// Returns `true` if a new download began and a timer must be scheduled.
    pub fn start(&mut self) -> bool {
        if self.is_downloading() {
            return false;
        }
        self.state = DownloadState::Downloading;
        true
    }

    /// Timer elapsed. Returns `true` if a completion notice should be surfaced.
    pub fn finish(&mut self) -> bool {
        if !self.is_downloading() {
            return false;
        }
        self.state = DownloadState::Complete;
        true
    }

    pub fn acknowledge(&mut self) {
        if self.state == DownloadState::Complete {
            self.state = DownloadState::Idle;
        }
    }
}
