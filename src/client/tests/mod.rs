use super::test_helpers::*;
use super::*;
use crate::config::{Config, FileCollisionAction, PollConfig};
use crate::request::{ExtractMode, TaskRequest};
use crate::types::{DocId, Event, TaskId};
use std::time::{Duration, Instant};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};


/// Drain every event currently buffered on a receiver
fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
