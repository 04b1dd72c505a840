use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::error::QueryErrorKind;
use super::types::{ResultAnchorId, ScrollRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "events.ts")]
pub struct ResultPayload {
    pub anchor_id: ResultAnchorId,
    pub answer: String,
    #[ts(type = "string")]
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "events.ts")]
pub struct ErrorPayload {
    pub anchor_id: ResultAnchorId,
    pub kind: QueryErrorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier frontend parsing
#[ts(export, export_to = "events.ts")]
pub enum PopupEvent {
    #[serde(rename = "popup://result")]
    Result(ResultPayload),

    #[serde(rename = "popup://error")]
    Error(ErrorPayload),

    #[serde(rename = "popup://scroll")]
    Scroll(ScrollRequest),
}

impl PopupEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PopupEvent::Result(_) => "popup://result",
            PopupEvent::Error(_) => "popup://error",
            PopupEvent::Scroll(_) => "popup://scroll",
        }
    }
}
