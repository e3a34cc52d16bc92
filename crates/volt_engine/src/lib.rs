//! VoltShell engine: collaborators, async exchanges and effect execution.
mod assistant;
mod backend;
mod gemini;
mod keys;
mod scripted;
mod shell;
mod surface;
mod timer;
mod types;

pub use assistant::{AssistantSession, ASSISTANT_PREAMBLE};
pub use backend::CompletionBackend;
pub use gemini::{GeminiBackend, GeminiSettings};
pub use keys::{ApiKeyStore, KeyFileSelector, KeySelector};
pub use scripted::{ScriptedBackend, ScriptedReply};
pub use shell::{Shell, ShellBuilder, ShellSettings};
pub use surface::{ChannelLoadSink, ContentSurface, CrossOriginPolicy, LoadSink, SimulatedSurface};
pub use timer::DownloadTimer;
pub use types::{
    CompletionError, FragmentStream, KeySelectError, SessionHandle, SurfaceError,
    CREDENTIAL_FAILURE_MARKER,
};
