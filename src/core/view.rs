//! View model for the popup
//!
//! `render` turns context + state into what the frontend draws. Styling is
//! the frontend's business; this only fixes which controls exist and where
//! the popup is anchored.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::shared::types::{
    AnchorPosition, DisclosureState, PopupAction, PopupState, QueryState, ResultAnchorId, SelectionContext,
    TranslatePayload,
};

/// Vertical gap between the selection and the popup's bottom edge
pub const POPUP_GAP_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "view.ts")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "view.ts")]
pub struct ButtonView {
    pub action: PopupAction,
    pub label: String,
    pub disabled: bool,
    /// Spinner instead of icon
    pub busy: bool,
}

impl ButtonView {
    fn new(action: PopupAction, label: &str) -> Self {
        Self {
            action,
            label: label.to_string(),
            disabled: false,
            busy: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "view.ts")]
pub struct PopupView {
    /// Root element id, also the scroll target for answers
    pub root_id: ResultAnchorId,
    /// Horizontally centered on `anchor`, bottom edge `gap_px` above it
    pub anchor: AnchorPosition,
    pub gap_px: f64,
    pub theme: Theme,
    pub primary: Vec<ButtonView>,
    /// Present only while the extended panel is open
    pub extended: Option<Vec<ButtonView>>,
}

/// Builds the view, or `None` when there is nothing to render
pub fn render(
    ctx: &SelectionContext,
    state: PopupState,
    anchor_id: &ResultAnchorId,
    theme: Theme,
    target_lang: &str,
) -> Option<PopupView> {
    if !ctx.visible {
        return None;
    }
    let anchor = ctx.anchor_position?;

    let extended = state.disclosure == DisclosureState::Extended;
    let searching = state.query == QueryState::Searching;

    let mut primary = Vec::with_capacity(4);
    if extended {
        primary.push(ButtonView::new(PopupAction::Back, "Back"));
    }
    primary.push(ButtonView {
        disabled: searching,
        busy: searching,
        ..ButtonView::new(
            PopupAction::Search,
            if searching { "Searching..." } else { "Search" },
        )
    });
    primary.push(ButtonView::new(PopupAction::Copy, "Copy"));
    primary.push(ButtonView::new(PopupAction::Disclose, "More"));

    let extended = extended.then(|| {
        vec![
            ButtonView::new(
                PopupAction::Translate(TranslatePayload {
                    target_lang: target_lang.to_string(),
                }),
                "Translate",
            ),
            ButtonView::new(PopupAction::Summarize, "Summarize"),
            ButtonView::new(PopupAction::Explain, "Explain"),
        ]
    });

    Some(PopupView {
        root_id: anchor_id.clone(),
        anchor,
        gap_px: POPUP_GAP_PX,
        theme,
        primary,
        extended,
    })
}
