use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::error::QueryErrorKind;
use super::events::{ErrorPayload, PopupEvent, ResultPayload};
use super::types::{ResultAnchorId, ScrollRequest};
use crate::core::host::PopupHost;

/// Host adapter that forwards popup callbacks as `PopupEvent`s over a channel
///
/// The receiving side (a webview bridge, a websocket task...) owns delivery.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<PopupEvent>,
}

impl ChannelHost {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PopupEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit an event to the frontend
    pub fn emit_event(&self, event: PopupEvent) {
        let name = event.name();
        if let Err(e) = self.tx.send(event) {
            warn!("Failed to emit {}: receiver closed ({})", name, e);
        } else {
            debug!("emitted {}", name);
        }
    }
}

impl PopupHost for ChannelHost {
    fn on_result(&self, anchor_id: &ResultAnchorId, answer: &str) {
        self.emit_event(PopupEvent::Result(ResultPayload {
            anchor_id: anchor_id.clone(),
            answer: answer.to_string(),
            delivered_at: Utc::now(),
        }));
    }

    fn on_error(&self, anchor_id: &ResultAnchorId, kind: QueryErrorKind) {
        self.emit_event(PopupEvent::Error(ErrorPayload {
            anchor_id: anchor_id.clone(),
            kind,
        }));
    }

    fn request_scroll(&self, request: ScrollRequest) {
        self.emit_event(PopupEvent::Scroll(request));
    }
}
