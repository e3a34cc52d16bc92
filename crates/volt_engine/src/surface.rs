use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::UnboundedSender;
use volt_core::{Msg, INTERNAL_SCHEME};
use volt_logging::volt_trace;

use crate::SurfaceError;

/// The embedded viewport that actually renders locations.
///
/// Navigation history is owned here, not by the shell. Load completion is
/// reported asynchronously through the [`LoadSink`] the surface was built with.
pub trait ContentSurface: Send + Sync {
    fn load(&self, location: &str);
    fn go_back(&self);
    fn go_forward(&self);
    fn reload(&self);
    /// Best-effort read of the surface's resolved location.
    fn current_location(&self) -> Result<String, SurfaceError>;
}

pub trait LoadSink: Send + Sync {
    fn load_complete(&self);
}

pub struct ChannelLoadSink {
    tx: UnboundedSender<Msg>,
}

impl ChannelLoadSink {
    pub fn new(tx: UnboundedSender<Msg>) -> Self {
        Self { tx }
    }
}

impl LoadSink for ChannelLoadSink {
    fn load_complete(&self) {
        let _ = self.tx.send(Msg::SurfaceLoadCompleted);
    }
}

/// Which locations a [`SimulatedSurface`] lets the shell read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossOriginPolicy {
    /// Only internal-scheme pages are readable, like a real cross-origin frame.
    #[default]
    Deny,
    Allow,
}

#[derive(Debug, Default)]
struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    fn current(&self) -> Option<&String> {
        self.entries.get(self.index)
    }
}

/// In-memory content surface with its own back/forward stack.
///
/// Loads complete immediately. Optional redirects make a load land somewhere
/// other than where it was pointed, which is how in-page navigation shows up
/// to the shell.
pub struct SimulatedSurface {
    policy: CrossOriginPolicy,
    sink: Arc<dyn LoadSink>,
    redirects: HashMap<String, String>,
    history: Mutex<History>,
}

impl SimulatedSurface {
    pub fn new(policy: CrossOriginPolicy, sink: Arc<dyn LoadSink>) -> Self {
        Self {
            policy,
            sink,
            redirects: HashMap::new(),
            history: Mutex::new(History::default()),
        }
    }

    pub fn with_redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.redirects.insert(from.into(), to.into());
        self
    }

    /// What the surface is really showing, regardless of the origin policy.
    pub fn displayed(&self) -> Option<String> {
        self.history().current().cloned()
    }

    fn history(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentSurface for SimulatedSurface {
    fn load(&self, location: &str) {
        let landed = self
            .redirects
            .get(location)
            .cloned()
            .unwrap_or_else(|| location.to_string());
        volt_trace!("surface load {} -> {}", location, landed);
        {
            let mut history = self.history();
            if !history.entries.is_empty() {
                let keep = history.index + 1;
                history.entries.truncate(keep);
            }
            history.entries.push(landed);
            history.index = history.entries.len() - 1;
        }
        self.sink.load_complete();
    }

    fn go_back(&self) {
        let moved = {
            let mut history = self.history();
            if history.index > 0 {
                history.index -= 1;
                true
            } else {
                false
            }
        };
        if moved {
            self.sink.load_complete();
        }
    }

    fn go_forward(&self) {
        let moved = {
            let mut history = self.history();
            if history.index + 1 < history.entries.len() {
                history.index += 1;
                true
            } else {
                false
            }
        };
        if moved {
            self.sink.load_complete();
        }
    }

    fn reload(&self) {
        let loaded = self.history().current().is_some();
        if loaded {
            self.sink.load_complete();
        }
    }

    fn current_location(&self) -> Result<String, SurfaceError> {
        let location = self.displayed().ok_or(SurfaceError::Detached)?;
        match self.policy {
            CrossOriginPolicy::Allow => Ok(location),
            CrossOriginPolicy::Deny if location.starts_with(INTERNAL_SCHEME) => Ok(location),
            CrossOriginPolicy::Deny => Err(SurfaceError::AccessDenied {
                reason: "cross-origin content".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct CountingSink(AtomicUsize);

    impl LoadSink for CountingSink {
        fn load_complete(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn load_after_back_drops_forward_entries() {
        let sink = Arc::new(CountingSink::default());
        let surface = SimulatedSurface::new(CrossOriginPolicy::Allow, sink.clone());
        surface.load("https://a.example");
        surface.load("https://b.example");
        surface.go_back();
        surface.load("https://c.example");
        surface.go_forward();

        assert_eq!(surface.displayed().as_deref(), Some("https://c.example"));
        surface.go_back();
        assert_eq!(surface.displayed().as_deref(), Some("https://a.example"));
        assert_eq!(sink.0.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn history_edges_do_not_fire_load_events() {
        let sink = Arc::new(CountingSink::default());
        let surface = SimulatedSurface::new(CrossOriginPolicy::Allow, sink.clone());
        surface.go_back();
        surface.go_forward();
        surface.reload();
        assert_eq!(sink.0.load(Ordering::SeqCst), 0);
        assert_eq!(surface.current_location(), Err(SurfaceError::Detached));
    }

    #[test]
    fn deny_policy_only_reveals_internal_pages() {
        let sink = Arc::new(CountingSink::default());
        let surface = SimulatedSurface::new(CrossOriginPolicy::Deny, sink);
        surface.load("volt://newtab");
        assert_eq!(surface.current_location().as_deref(), Ok("volt://newtab"));

        surface.load("https://a.example");
        assert!(matches!(
            surface.current_location(),
            Err(SurfaceError::AccessDenied { .. })
        ));
    }
}
