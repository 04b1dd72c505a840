use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Viewport coordinates of the current text selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "popup.ts")]
pub struct AnchorPosition {
    pub x: f64,
    pub y: f64,
}

/// What the host knows about the current selection
///
/// Supplied by the host on every selection change. The core never mutates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "popup.ts")]
pub struct SelectionContext {
    pub anchor_position: Option<AnchorPosition>,
    pub selected_text: String,
    pub visible: bool,
}

impl SelectionContext {
    pub fn new(anchor_position: Option<AnchorPosition>, selected_text: impl Into<String>, visible: bool) -> Self {
        Self {
            anchor_position,
            selected_text: selected_text.into(),
            visible,
        }
    }

    /// A context is only renderable when it is visible AND anchored.
    /// `visible` without an anchor is treated as hidden.
    pub fn is_renderable(&self) -> bool {
        self.visible && self.anchor_position.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "popup.ts")]
pub enum DisclosureState {
    #[default]
    Primary,
    Extended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "popup.ts")]
pub enum QueryState {
    #[default]
    Idle,
    Searching,
}

/// Snapshot of a popup's `{DisclosureState, QueryState}` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "popup.ts")]
pub struct PopupState {
    pub disclosure: DisclosureState,
    pub query: QueryState,
}

/// DOM id the host scrolls to once an answer is delivered
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "popup.ts")]
pub struct ResultAnchorId(String);

impl ResultAnchorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResultAnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "popup.ts")]
pub struct TranslatePayload {
    pub target_lang: String,
}

// User intents coming from the popup view.
// Adjacently tagged for the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload")]
#[ts(export, export_to = "popup.ts")]
pub enum PopupAction {
    Search,
    Copy,
    /// Open the extended panel
    Disclose,
    /// Back to the primary actions
    Back,
    Translate(TranslatePayload),
    Summarize,
    Explain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "popup.ts")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "popup.ts")]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

/// Scroll-into-view request for the element carrying `anchor_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "popup.ts")]
pub struct ScrollRequest {
    pub anchor_id: ResultAnchorId,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollRequest {
    /// Smooth scroll aligning the result to the top of the viewport
    pub fn to_result(anchor_id: ResultAnchorId) -> Self {
        Self {
            anchor_id,
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_without_anchor_is_not_renderable() {
        let ctx = SelectionContext::new(None, "text", true);
        assert!(!ctx.is_renderable());

        let ctx = SelectionContext::new(Some(AnchorPosition { x: 1.0, y: 2.0 }), "text", false);
        assert!(!ctx.is_renderable());

        let ctx = SelectionContext::new(Some(AnchorPosition { x: 1.0, y: 2.0 }), "text", true);
        assert!(ctx.is_renderable());
    }

    #[test]
    fn test_action_wire_format() {
        let json = serde_json::to_value(PopupAction::Translate(TranslatePayload {
            target_lang: "fr".to_string(),
        }))
        .unwrap();
        assert_eq!(json["type"], "Translate");
        assert_eq!(json["payload"]["target_lang"], "fr");

        let parsed: PopupAction = serde_json::from_str(r#"{"type":"Search"}"#).unwrap();
        assert_eq!(parsed, PopupAction::Search);
    }

    #[test]
    fn test_scroll_request_to_result() {
        let req = ScrollRequest::to_result(ResultAnchorId::new("search-1"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["anchor_id"], "search-1");
        assert_eq!(json["behavior"], "smooth");
        assert_eq!(json["block"], "start");
    }
}
