//! Typed dashboard commands and a streamed-response client.
//!
//! Every backend action the dashboard can trigger is a [`Command`] variant
//! with typed arguments. [`ApiClient`] turns a command into a [`Request`],
//! hands it to a [`Transport`], and for streamed (`/api.txt/...`) responses
//! runs a fresh frame decoder per request, dispatching notifications as
//! frames complete.

pub mod client;
pub mod command;
pub mod error;
pub mod poller;
pub mod transport;

pub use client::{ApiClient, ClientConfig, RunSummary};
pub use command::{AppAction, Command, CommandKind, Request, ResponseFormat, Target};
pub use error::{ApiError, Result};
pub use poller::{LivelistPoller, DEFAULT_POLL_INTERVAL};
pub use transport::{ReplayTransport, Transport};
