use crate::heuristic::is_download_eligible;
use crate::url_input::{normalize_address, HOME_LOCATION};

/// What the content surface reported when asked for its own location after a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationProbe {
    /// The surface exposed its resolved location.
    Resolved(String),
    /// The read was refused (cross-origin content); the last explicit location stands.
    Unknown,
}

/// Instruction for the embedded content surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    Load(String),
    Back,
    Forward,
    Reload,
}

/// Owns the current location, the address-bar draft and the download flag.
///
/// `location` and `pending_input` are separate fields. Both are written
/// together by [`submit`](Self::submit) and [`observe`](Self::observe); the
/// draft is otherwise only touched by editing, focus and blur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationController {
    location: String,
    pending_input: String,
    download_eligible: bool,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self {
            location: HOME_LOCATION.to_string(),
            pending_input: HOME_LOCATION.to_string(),
            download_eligible: false,
        }
    }
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn download_eligible(&self) -> bool {
        self.download_eligible
    }

    pub fn edit_input(&mut self, text: String) {
        self.pending_input = text;
    }

    pub fn focus_input(&mut self) {
        if self.pending_input == HOME_LOCATION {
            self.pending_input.clear();
        }
    }

    pub fn blur_input(&mut self) {
        if self.pending_input.is_empty() {
            self.pending_input = HOME_LOCATION.to_string();
        }
    }

    /// Navigates to the draft, or to `target_override` when a shortcut bypasses it.
    ///
    /// Returns the command to load the new location, or `None` when the
    /// effective text is blank.
    pub fn submit(&mut self, target_override: Option<&str>) -> Option<SurfaceCommand> {
        let target = match target_override {
            Some(target) => target.to_string(),
            None => self.pending_input.clone(),
        };
        if target.trim().is_empty() {
            return None;
        }

        let location = normalize_address(&target);
        self.commit(location.clone());
        Some(SurfaceCommand::Load(location))
    }

    /// Reconciles with what the surface reports after a load completes.
    ///
    /// Returns `true` when the location changed.
    pub fn observe(&mut self, probe: LocationProbe) -> bool {
        match probe {
            LocationProbe::Resolved(location) if location != self.location => {
                self.commit(location);
                true
            }
            LocationProbe::Resolved(_) | LocationProbe::Unknown => false,
        }
    }

    pub fn dismiss_download_prompt(&mut self) {
        self.download_eligible = false;
    }

    fn commit(&mut self, location: String) {
        self.download_eligible = is_download_eligible(&location);
        self.pending_input = location.clone();
        self.location = location;
    }
}
