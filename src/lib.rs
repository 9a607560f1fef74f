//! # doctask
//!
//! Async client for a remote document-processing service.
//!
//! A caller submits a file with a processing mode, the service performs the
//! work out-of-band as a *task*, the client polls until the task completes,
//! then downloads the produced artifact.
//!
//! ## Design Philosophy
//!
//! doctask is designed to be:
//! - **Library-first** - No CLI, purely a Rust crate for embedding
//! - **Sensible defaults** - Works against the public service with zero configuration
//! - **Event-driven** - Consumers subscribe to progress events
//! - **Failure-transparent** - Every failure is a typed [`Error`]; the library never exits the process
//!
//! ## Quick Start
//!
//! ```no_run
//! use doctask::{Config, Credentials, DocTaskClient, ExtractMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::from_json_file("credentials.json").await?;
//!     let client = DocTaskClient::new(Config::default(), credentials)?;
//!
//!     // Subscribe to events
//!     let mut events = client.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let outcome = client
//!         .run_file(
//!             "input_files/AboutFoxit.pdf",
//!             ExtractMode::Text,
//!             "output_files/extract/AboutFoxit.txt",
//!         )
//!         .await?;
//!     println!("wrote {}", outcome.output_path.display());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Task lifecycle client (decomposed into focused submodules)
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Task creation requests
pub mod request;
/// Request signing
pub mod signature;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use client::{DocTaskClient, PollState};
pub use config::{Config, Credentials, DownloadConfig, FileCollisionAction, PollConfig};
pub use error::{Error, Result};
pub use request::{ExtractMode, TaskRequest};
pub use signature::{Signature, SigningParams, sign};
pub use tokio_util::sync::CancellationToken;
pub use types::{DocId, Event, SavedArtifact, TaskId, TaskStatus, WorkflowOutcome};

/// Helper function to run a workflow with graceful signal handling.
///
/// Runs the workflow until it finishes or a termination signal arrives. A
/// signal cancels status polling, and the run ends with [`Error::Cancelled`].
/// A signal during submission or download lets that step finish first.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use doctask::{Config, Credentials, DocTaskClient, TaskRequest, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Credentials::from_json_file("credentials.json").await?;
///     let client = DocTaskClient::new(Config::default(), credentials)?;
///
///     let request = TaskRequest::extract("input_files/AboutFoxit.pdf", "extractText");
///     let outcome = run_with_shutdown(&client, &request, "output_files/AboutFoxit.txt").await?;
///     println!("{} bytes", outcome.bytes_written);
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(
    client: &DocTaskClient,
    request: &TaskRequest,
    output_path: impl AsRef<std::path::Path>,
) -> Result<WorkflowOutcome> {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let watcher = tokio::spawn(async move {
        wait_for_signal().await;
        trigger.cancel();
    });

    let result = client.run_with_cancel(request, output_path, &cancel).await;
    watcher.abort();
    result
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal, cancelling workflow");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C), cancelling workflow");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C), cancelling workflow");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                ctrl_c_or_never().await;
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal, cancelling workflow");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                ctrl_c_or_never().await;
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c_or_never().await;
    tracing::info!("Received Ctrl+C signal, cancelling workflow");
}

/// Resolve on Ctrl+C; never resolve if the listener cannot be installed,
/// so a missing handler does not cancel the workflow
async fn ctrl_c_or_never() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        std::future::pending::<()>().await;
    }
}
