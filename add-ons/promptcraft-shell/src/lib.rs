//! PromptCraft client shell.
//!
//! A [`Session`] owns one explicit [`ShellState`] and refuses a second submission while
//! one is in flight. Requests go through a [`GenerationTransport`]; [`HttpTransport`]
//! talks to the gateway and [`render`] turns the state into terminal output.

pub mod render;
pub mod session;
pub mod state;
pub mod transport;

pub use render::{render, APP_DISCLAIMER};
pub use session::{EditRejected, Session, SubmitRejected, CONNECT_FAILURE_MESSAGE};
pub use state::{AppView, ShellResult, ShellState, WebsiteView};
pub use transport::{parse_reply, GenerationReply, GenerationTransport, HttpTransport, TransportError};
