//! Session state machine against scripted transports.

use async_trait::async_trait;
use promptcraft_core::{ApkResponse, ArtifactKind, BuildStatus, ErrorResponse, FailureKind, WebsiteResponse};
use promptcraft_shell::{
    EditRejected, GenerationReply, GenerationTransport, Session, ShellResult, ShellState, SubmitRejected,
    TransportError, CONNECT_FAILURE_MESSAGE,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Replies with a fixed answer, optionally waiting on a gate first.
struct Scripted {
    reply: Result<GenerationReply, fn() -> TransportError>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn replying(reply: GenerationReply) -> Self {
        Self {
            reply: Ok(reply),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(err: fn() -> TransportError) -> Self {
        Self {
            reply: Err(err),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn gated(reply: GenerationReply, gate: Arc<Notify>) -> Self {
        Self {
            reply: Ok(reply),
            gate: Some(gate),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GenerationTransport for Scripted {
    async fn send(&self, _kind: ArtifactKind, _prompt: &str) -> Result<GenerationReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Ok(r) => Ok(r.clone()),
            Err(make) => Err(make()),
        }
    }
}

fn website_reply(code: &str) -> GenerationReply {
    GenerationReply::Website(WebsiteResponse {
        success: true,
        code: code.to_string(),
        preview_url: "/generated/1.html".to_string(),
    })
}

fn app_reply() -> GenerationReply {
    GenerationReply::App(ApkResponse {
        success: true,
        build_id: "build_42".to_string(),
        status: BuildStatus::Completed,
        download_url: "/downloads/build_42.apk".to_string(),
        code_preview: "export default App;".to_string(),
    })
}

#[tokio::test]
async fn test_blank_prompt_is_rejected_without_a_call() {
    let session = Session::new(Scripted::replying(website_reply("<html/>")));

    assert!(!session.can_submit("   "));
    assert_eq!(
        session.submit(ArtifactKind::Website, " \n ").await,
        Err(SubmitRejected::EmptyPrompt)
    );
    assert_eq!(session.state(), ShellState::Idle);
    assert_eq!(session.transport().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_preview_key_bumps_on_identical_results() {
    let session = Session::new(Scripted::replying(website_reply("<html>same</html>")));

    let mut keys = Vec::new();
    for _ in 0..3 {
        match session.submit(ArtifactKind::Website, "landing page").await.unwrap() {
            ShellState::Succeeded(ShellResult::Website(view)) => {
                assert_eq!(view.code, "<html>same</html>");
                keys.push(view.preview_key);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }
    assert_eq!(keys, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_website_code_is_editable() {
    let session = Session::new(Scripted::replying(website_reply("<p>old</p>")));
    session.submit(ArtifactKind::Website, "blog").await.unwrap();

    session.edit_code("<p>new</p>").unwrap();
    let ShellState::Succeeded(result) = session.state() else {
        panic!("success expected");
    };
    assert_eq!(result.code(), "<p>new</p>");
}

#[tokio::test]
async fn test_app_result_is_read_only() {
    let session = Session::new(Scripted::replying(app_reply()));

    let state = session.submit(ArtifactKind::App, "expense tracker").await.unwrap();
    let ShellState::Succeeded(ShellResult::App(view)) = &state else {
        panic!("app success expected, got {state:?}");
    };
    assert_eq!(view.build_id, "build_42");
    assert_eq!(view.download_url, "/downloads/build_42.apk");
    assert_eq!(session.edit_code("tampered"), Err(EditRejected::NotEditable));
    assert_eq!(session.state(), state);
}

#[tokio::test]
async fn test_server_error_is_shown_verbatim() {
    let session = Session::new(Scripted::replying(GenerationReply::Failure(ErrorResponse {
        success: false,
        error: "Failed to generate app. Please try a different prompt or check server logs.".to_string(),
        error_kind: Some(FailureKind::Upstream),
    })));

    let state = session.submit(ArtifactKind::App, "chat").await.unwrap();
    assert_eq!(
        state,
        ShellState::Failed {
            message: "Failed to generate app. Please try a different prompt or check server logs.".to_string()
        }
    );
    // A failed attempt needs a new submission; nothing was retried.
    assert_eq!(session.transport().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transport_error_becomes_connect_message() {
    let session = Session::new(Scripted::failing(|| TransportError::Decode {
        status: 502,
        message: "bad gateway".to_string(),
    }));

    let state = session.submit(ArtifactKind::Website, "shop").await.unwrap();
    assert_eq!(
        state,
        ShellState::Failed {
            message: CONNECT_FAILURE_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn test_second_submit_rejected_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let session = Arc::new(Session::new(Scripted::gated(website_reply("<html/>"), Arc::clone(&gate))));

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit(ArtifactKind::Website, "first").await })
    };

    tokio::time::timeout(Duration::from_secs(5), async {
        while !session.state().is_submitting() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("first submission should start");

    assert!(!session.can_submit("second"));
    assert_eq!(
        session.submit(ArtifactKind::App, "second").await,
        Err(SubmitRejected::InFlight)
    );
    session.reset();
    assert!(session.state().is_submitting(), "reset is ignored while in flight");

    gate.notify_one();
    let state = first.await.unwrap().unwrap();
    assert!(matches!(state, ShellState::Succeeded(ShellResult::Website(_))));
    assert_eq!(session.transport().calls.load(Ordering::SeqCst), 1);

    // Idle again after completion: the next submission goes through.
    assert!(session.can_submit("third"));
    session.reset();
    assert_eq!(session.state(), ShellState::Idle);
}

#[tokio::test]
async fn test_dropped_submit_releases_the_session() {
    let gate = Arc::new(Notify::new());
    let session = Session::new(Scripted::gated(website_reply("<html/>"), Arc::clone(&gate)));

    let abandoned = tokio::time::timeout(Duration::from_millis(20), session.submit(ArtifactKind::Website, "site")).await;
    assert!(abandoned.is_err(), "transport never answered, so the call times out");
    assert_eq!(session.state(), ShellState::Idle);
    assert!(session.can_submit("site"));

    gate.notify_one();
    let state = session.submit(ArtifactKind::Website, "site").await.unwrap();
    assert!(matches!(state, ShellState::Succeeded(ShellResult::Website(_))));
    assert_eq!(session.transport().calls.load(Ordering::SeqCst), 2);
}
