//! One user's session: guarded submission and state transitions.
//!
//! `Idle → Submitting → Succeeded | Failed`, then back to `Submitting` on the next
//! user action. The empty-prompt and in-flight checks happen under the same lock as
//! the switch to `Submitting`, so two concurrent callers cannot both start a request.
//! There is no retry. A caller that drops `submit` before it finishes (a timeout,
//! Ctrl-C) puts the session back to `Idle`.

use crate::state::{AppView, ShellResult, ShellState, WebsiteView};
use crate::transport::{GenerationReply, GenerationTransport};
use promptcraft_core::ArtifactKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub const CONNECT_FAILURE_MESSAGE: &str = "Could not connect to server or an unexpected error occurred.";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("a generation is already in progress")]
    InFlight,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRejected {
    #[error("no website result to edit")]
    NotEditable,
}

pub struct Session<T> {
    transport: T,
    state: Mutex<ShellState>,
    preview_key: AtomicU64,
}

impl<T: GenerationTransport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Mutex::new(ShellState::Idle),
            preview_key: AtomicU64::new(0),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn lock(&self) -> MutexGuard<'_, ShellState> {
        lock_state(&self.state)
    }

    pub fn state(&self) -> ShellState {
        self.lock().clone()
    }

    /// Whether a submit with `prompt` would be accepted right now.
    pub fn can_submit(&self, prompt: &str) -> bool {
        !prompt.trim().is_empty() && !self.lock().is_submitting()
    }

    /// Submit `prompt` and wait for the outcome. Server and transport failures land in
    /// `ShellState::Failed`; only guard violations are returned as errors.
    pub async fn submit(&self, kind: ArtifactKind, prompt: &str) -> Result<ShellState, SubmitRejected> {
        {
            let mut state = self.lock();
            if prompt.trim().is_empty() {
                return Err(SubmitRejected::EmptyPrompt);
            }
            if state.is_submitting() {
                return Err(SubmitRejected::InFlight);
            }
            *state = ShellState::Submitting { kind };
        }
        let in_flight = InFlight { state: &self.state };

        let next = match self.transport.send(kind, prompt).await {
            Ok(GenerationReply::Website(r)) => {
                let preview_key = self.preview_key.fetch_add(1, Ordering::AcqRel) + 1;
                ShellState::Succeeded(ShellResult::Website(WebsiteView {
                    code: r.code,
                    preview_url: r.preview_url,
                    preview_key,
                }))
            }
            Ok(GenerationReply::App(r)) => ShellState::Succeeded(ShellResult::App(AppView {
                code: r.code_preview,
                build_id: r.build_id,
                download_url: r.download_url,
            })),
            Ok(GenerationReply::Failure(e)) => ShellState::Failed { message: e.error },
            Err(e) => {
                tracing::warn!(%kind, "generation request failed: {}", e);
                ShellState::Failed {
                    message: CONNECT_FAILURE_MESSAGE.to_string(),
                }
            }
        };

        in_flight.finish(next.clone());
        Ok(next)
    }

    /// Replace the code of a website result (the editable code view).
    pub fn edit_code(&self, code: impl Into<String>) -> Result<(), EditRejected> {
        match &mut *self.lock() {
            ShellState::Succeeded(ShellResult::Website(view)) => {
                view.code = code.into();
                Ok(())
            }
            _ => Err(EditRejected::NotEditable),
        }
    }

    /// Drop the current result or error. Ignored while a request is in flight.
    pub fn reset(&self) {
        let mut state = self.lock();
        if !state.is_submitting() {
            *state = ShellState::Idle;
        }
    }
}

fn lock_state(state: &Mutex<ShellState>) -> MutexGuard<'_, ShellState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the `Submitting` state of one call. Dropped without [`InFlight::finish`]
/// (the submit future was cancelled), it puts the session back to `Idle`.
struct InFlight<'a> {
    state: &'a Mutex<ShellState>,
}

impl InFlight<'_> {
    fn finish(self, next: ShellState) {
        *lock_state(self.state) = next;
        std::mem::forget(self);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        if state.is_submitting() {
            tracing::debug!("submission dropped before completion");
            *state = ShellState::Idle;
        }
    }
}
