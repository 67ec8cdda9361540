//! `promptcraft`: generate a website or React Native app from the terminal.
//!
//! Exit codes: 0 success, 1 generation failed, 2 rejected before sending.

use clap::{Args, Parser, Subcommand};
use promptcraft_core::ArtifactKind;
use promptcraft_shell::{render, HttpTransport, Session, ShellState};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "promptcraft", version, about = "Prompt-to-code client for the PromptCraft gateway")]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "PROMPTCRAFT_GATEWAY", default_value = "http://127.0.0.1:5000")]
    gateway: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a single-file HTML website
    Website(GenerateArgs),
    /// Generate React Native app code (the build is simulated)
    App(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Description of what to build
    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,

    /// Also write the generated code to this file
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .try_init();

    let cli = Cli::parse();
    let (kind, args) = match cli.command {
        Command::Website(args) => (ArtifactKind::Website, args),
        Command::App(args) => (ArtifactKind::App, args),
    };
    let prompt = args.prompt.join(" ");

    let session = Session::new(HttpTransport::new(&cli.gateway));
    if let Some(line) = progress_line(&session, kind, &prompt) {
        eprintln!("{}", line);
    }

    let state = match session.submit(kind, &prompt).await {
        Ok(s) => s,
        Err(rejected) => {
            eprintln!("Cannot submit: {}", rejected);
            return ExitCode::from(2);
        }
    };
    let base = session.transport().base_url().to_string();

    match &state {
        ShellState::Succeeded(result) => {
            print!("{}", render(&state, &base));
            if let Some(path) = &args.out {
                if let Err(e) = std::fs::write(path, result.code()) {
                    eprintln!("Could not write {}: {}", path.display(), e);
                    return ExitCode::from(1);
                }
                eprintln!("Saved to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("{}", render(&state, &base));
            ExitCode::from(1)
        }
    }
}

/// The "Generating..." line, only for a prompt the session will accept.
fn progress_line(session: &Session<HttpTransport>, kind: ArtifactKind, prompt: &str) -> Option<String> {
    session
        .can_submit(prompt)
        .then(|| render(&ShellState::Submitting { kind }, session.transport().base_url()))
}
