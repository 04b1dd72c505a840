//! Text-generation provider seam
//!
//! The popup only needs `generate(prompt) -> text`. One attempt per call,
//! no retry, no cancellation.

pub mod gemini;
pub mod mock;
pub mod prompt;

use async_trait::async_trait;

use crate::shared::error::AppResult;
use crate::shared::types::PopupAction;

pub use gemini::GeminiClient;
pub use mock::MockQueryClient;

#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Which prompt template a query runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Search,
    Translate { target_lang: String },
    Summarize,
    Explain,
}

impl QueryKind {
    /// Map a popup action to the query it runs, if any
    pub fn from_action(action: &PopupAction) -> Option<Self> {
        match action {
            PopupAction::Search => Some(QueryKind::Search),
            PopupAction::Translate(payload) => Some(QueryKind::Translate {
                target_lang: payload.target_lang.clone(),
            }),
            PopupAction::Summarize => Some(QueryKind::Summarize),
            PopupAction::Explain => Some(QueryKind::Explain),
            PopupAction::Copy | PopupAction::Disclose | PopupAction::Back => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QueryKind::Search => "search",
            QueryKind::Translate { .. } => "translate",
            QueryKind::Summarize => "summarize",
            QueryKind::Explain => "explain",
        }
    }

    pub fn prompt(&self, selected_text: &str) -> String {
        match self {
            QueryKind::Search => prompt::search_prompt(selected_text),
            QueryKind::Translate { target_lang } => prompt::translate_prompt(selected_text, target_lang),
            QueryKind::Summarize => prompt::summarize_prompt(selected_text),
            QueryKind::Explain => prompt::explain_prompt(selected_text),
        }
    }
}
