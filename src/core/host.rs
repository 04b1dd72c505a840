//! Seams between the popup core and whoever embeds it
//!
//! The host receives answers and scroll requests; the error sink receives
//! failures the popup itself does not surface.

use std::sync::Mutex;
use tracing::{error, warn};

use crate::shared::error::QueryErrorKind;
use crate::shared::types::{ResultAnchorId, ScrollRequest};

/// Callbacks into the embedding page
pub trait PopupHost: Send + Sync {
    /// Called exactly once per successful query
    fn on_result(&self, anchor_id: &ResultAnchorId, answer: &str);

    /// Called once per failed query. Hosts that only care about answers can ignore it.
    fn on_error(&self, _anchor_id: &ResultAnchorId, _kind: QueryErrorKind) {}

    /// Issued after `on_result`. Implementations defer the actual scroll to the
    /// next frame so the answer is already laid out.
    fn request_scroll(&self, request: ScrollRequest);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupFailure {
    Provider {
        anchor_id: ResultAnchorId,
        kind: QueryErrorKind,
        message: String,
    },
    Clipboard {
        message: String,
    },
}

/// Observability sink for swallowed failures
pub trait ErrorSink: Send + Sync {
    fn record(&self, failure: &PopupFailure);
}

/// Default sink: structured log lines only
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn record(&self, failure: &PopupFailure) {
        match failure {
            PopupFailure::Provider { anchor_id, kind, message } => {
                error!(anchor_id = %anchor_id, kind = ?kind, "search failed: {}", message);
            }
            PopupFailure::Clipboard { message } => {
                warn!("clipboard write failed: {}", message);
            }
        }
    }
}

/// Sink that keeps every failure in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    failures: Mutex<Vec<PopupFailure>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<PopupFailure> {
        match self.failures.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn provider_error_count(&self) -> usize {
        self.failures()
            .iter()
            .filter(|f| matches!(f, PopupFailure::Provider { .. }))
            .count()
    }
}

impl ErrorSink for RecordingSink {
    fn record(&self, failure: &PopupFailure) {
        TracingSink.record(failure);
        let mut failures = match self.failures.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        failures.push(failure.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Result { anchor_id: ResultAnchorId, answer: String },
    Error { anchor_id: ResultAnchorId, kind: QueryErrorKind },
    Scroll(ScrollRequest),
}

/// Host that records every callback in order
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn results(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Result { answer, .. } => Some(answer),
                _ => None,
            })
            .collect()
    }

    pub fn scrolls(&self) -> Vec<ScrollRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Scroll(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: HostCall) {
        let mut calls = match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        calls.push(call);
    }
}

impl PopupHost for RecordingHost {
    fn on_result(&self, anchor_id: &ResultAnchorId, answer: &str) {
        self.push(HostCall::Result {
            anchor_id: anchor_id.clone(),
            answer: answer.to_string(),
        });
    }

    fn on_error(&self, anchor_id: &ResultAnchorId, kind: QueryErrorKind) {
        self.push(HostCall::Error {
            anchor_id: anchor_id.clone(),
            kind,
        });
    }

    fn request_scroll(&self, request: ScrollRequest) {
        self.push(HostCall::Scroll(request));
    }
}
