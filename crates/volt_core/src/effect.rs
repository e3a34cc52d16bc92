#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Surface(crate::SurfaceCommand),
    /// Ask the content surface for its resolved location.
    ProbeLocation,
    /// Start the fixed-duration download timer.
    ScheduleDownload,
    ShowNotice(String),
    SendChat { text: String },
}
