use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use volt_core::{
    AssistantReply, ChatCommand, ReplyOutcome, CREDENTIAL_RESELECTED_REPLY,
    CREDENTIAL_UNAVAILABLE_REPLY, DOWNLOAD_REPLY, GENERIC_FAILURE_REPLY, SUMMARY_REPLY,
};
use volt_engine::{
    AssistantSession, KeySelectError, KeySelector, ScriptedBackend, ScriptedReply,
    ASSISTANT_PREAMBLE,
};

const CREDENTIAL_ERROR: &str =
    "got status: 404 Not Found. {\"error\":{\"message\":\"Requested entity was not found.\"}}";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(volt_logging::initialize_for_tests);
}

#[derive(Default)]
struct RecordingSelector {
    calls: AtomicUsize,
    fail: bool,
}

impl RecordingSelector {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySelector for RecordingSelector {
    async fn open_select_key(&self) -> Result<(), KeySelectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(KeySelectError::Io(std::io::Error::other("dialog closed")));
        }
        Ok(())
    }
}

fn session_with(
    scripts: Vec<ScriptedReply>,
    selector: Option<Arc<RecordingSelector>>,
) -> (AssistantSession, Arc<ScriptedBackend>) {
    let backend = Arc::new(ScriptedBackend::new(scripts));
    let selector = selector.map(|s| s as Arc<dyn KeySelector>);
    let session = AssistantSession::new(backend.clone(), selector, ASSISTANT_PREAMBLE);
    (session, backend)
}

#[tokio::test]
async fn fragments_are_concatenated_in_arrival_order() {
    init_logging();
    let (mut session, _) = session_with(vec![ScriptedReply::text(&["Olá", ", ", "tudo", " bem?"])], None);

    let reply = session.send("oi").await.unwrap();

    assert_eq!(reply, AssistantReply::answered("Olá, tudo bem?"));
    assert_eq!(reply.outcome, ReplyOutcome::Answered);
}

#[tokio::test]
async fn blank_input_is_not_sent() {
    init_logging();
    let (mut session, backend) = session_with(Vec::new(), None);

    assert_eq!(session.send("   ").await, None);
    assert_eq!(backend.sessions_created(), 0);
    assert!(backend.sent().is_empty());
}

#[tokio::test]
async fn session_is_created_lazily_once_with_preamble() {
    init_logging();
    let (mut session, backend) = session_with(Vec::new(), None);
    assert!(session.handle().is_none());

    session.send("primeira").await.unwrap();
    session.send("segunda").await.unwrap();

    assert_eq!(backend.sessions_created(), 1);
    assert_eq!(backend.preambles(), vec![ASSISTANT_PREAMBLE.to_string()]);
    let sent = backend.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, sent[1].0);
    assert_eq!(sent[1].1, "segunda");
}

#[tokio::test]
async fn summarize_command_overrides_streamed_text() {
    init_logging();
    let (mut session, backend) = session_with(
        vec![ScriptedReply::text(&["Claro, aqui vai ", "um resumo inventado."])],
        None,
    );

    let reply = session.send("Pode RESUMIR esta página?").await.unwrap();

    assert_eq!(reply.text, SUMMARY_REPLY);
    assert_eq!(reply.outcome, ReplyOutcome::Command(ChatCommand::SummarizePage));
    // The command still goes to the backend; only the reply is replaced.
    assert_eq!(backend.sent().len(), 1);
}

#[tokio::test]
async fn download_command_yields_canned_ack() {
    init_logging();
    let (mut session, _) = session_with(vec![ScriptedReply::text(&["ignorado"])], None);

    let reply = session.send("baixar este vídeo").await.unwrap();

    assert_eq!(reply.text, DOWNLOAD_REPLY);
    assert!(reply.triggers_download());
}

#[tokio::test]
async fn command_is_not_applied_when_exchange_fails() {
    init_logging();
    let (mut session, _) = session_with(vec![ScriptedReply::fail("quota exceeded")], None);

    let reply = session.send("baixar este vídeo").await.unwrap();

    assert_eq!(reply.text, GENERIC_FAILURE_REPLY);
    assert!(!reply.triggers_download());
}

#[tokio::test]
async fn generic_failure_keeps_session() {
    init_logging();
    let (mut session, backend) = session_with(vec![ScriptedReply::fail("boom")], None);

    let reply = session.send("oi").await.unwrap();
    assert_eq!(reply, AssistantReply::failed());
    let handle = session.handle();
    assert!(handle.is_some());

    session.send("de novo").await.unwrap();
    assert_eq!(session.handle(), handle);
    assert_eq!(backend.sessions_created(), 1);
}

#[tokio::test]
async fn interrupted_stream_surfaces_no_partial_text() {
    init_logging();
    let (mut session, _) = session_with(
        vec![ScriptedReply::Interrupted {
            fragments: vec!["Metade de uma ".into(), "resposta".into()],
            error: volt_engine::CompletionError::new("connection reset"),
        }],
        None,
    );

    let reply = session.send("oi").await.unwrap();

    assert_eq!(reply.text, GENERIC_FAILURE_REPLY);
    assert_eq!(reply.outcome, ReplyOutcome::Failed);
}

#[tokio::test]
async fn credential_failure_invokes_selector_once_and_resets_session() {
    init_logging();
    let selector = Arc::new(RecordingSelector::default());
    let (mut session, backend) =
        session_with(vec![ScriptedReply::fail(CREDENTIAL_ERROR)], Some(selector.clone()));

    let reply = session.send("oi").await.unwrap();

    assert_eq!(selector.calls(), 1);
    assert_eq!(reply.text, CREDENTIAL_RESELECTED_REPLY);
    assert_eq!(reply.outcome, ReplyOutcome::CredentialReselected);
    assert!(session.handle().is_none());

    // Not retried automatically; the next send opens a fresh session.
    assert_eq!(backend.sent().len(), 1);
    session.send("oi de novo").await.unwrap();
    assert_eq!(backend.sessions_created(), 2);
    assert_eq!(selector.calls(), 1);
}

#[tokio::test]
async fn credential_failure_without_selector_asks_to_try_later() {
    init_logging();
    let (mut session, _) = session_with(vec![ScriptedReply::fail(CREDENTIAL_ERROR)], None);

    let reply = session.send("oi").await.unwrap();

    assert_eq!(reply.text, CREDENTIAL_UNAVAILABLE_REPLY);
    assert_eq!(reply.outcome, ReplyOutcome::CredentialUnavailable);
    assert!(session.handle().is_none());
}

#[tokio::test]
async fn failing_selector_falls_back_to_try_later() {
    init_logging();
    let selector = Arc::new(RecordingSelector::failing());
    let (mut session, _) =
        session_with(vec![ScriptedReply::fail(CREDENTIAL_ERROR)], Some(selector.clone()));

    let reply = session.send("oi").await.unwrap();

    assert_eq!(selector.calls(), 1);
    assert_eq!(reply.text, CREDENTIAL_UNAVAILABLE_REPLY);
}
