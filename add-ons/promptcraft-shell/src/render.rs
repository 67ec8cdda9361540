//! Terminal rendering of a [`ShellState`].

use crate::state::{ShellResult, ShellState};

pub const APP_DISCLAIMER: &str = "Note: this is source code only. No APK was built; \
create a React Native project, drop this in as App.js and build it yourself.";

/// Render `state`; relative links are resolved against `base_url`.
pub fn render(state: &ShellState, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match state {
        ShellState::Idle => String::new(),
        ShellState::Submitting { kind } => format!("Generating {kind} code..."),
        ShellState::Failed { message } => format!("Error: {message}"),
        ShellState::Succeeded(result) => {
            let lang = result.kind().code_language();
            let mut out = format!("```{lang}\n{}\n```\n", result.code().trim_end());
            match result {
                ShellResult::Website(view) => {
                    out.push_str(&format!("Preview #{}: {base}{}\n", view.preview_key, view.preview_url));
                }
                ShellResult::App(view) => {
                    out.push_str(APP_DISCLAIMER);
                    out.push('\n');
                    out.push_str(&format!(
                        "Build {} download (not available): {base}{}\n",
                        view.build_id, view.download_url
                    ));
                }
            }
            out
        }
    }
}
