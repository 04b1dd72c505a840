//! Contextual action popup for a text selection
//!
//! The host feeds selections into a [`PopupSession`]; user actions go through
//! an [`ActionDispatcher`]; answers come back through a [`PopupHost`].

pub mod core;
pub mod shared;

use std::sync::Arc;

pub use crate::core::{
    ActionDispatcher, GeminiClient, PopupHost, PopupServices, PopupSession, PopupView, QueryClient, SearchOutcome,
};
pub use crate::shared::emit::ChannelHost;
pub use crate::shared::error::{AppError, AppResult, QueryErrorKind};
pub use crate::shared::events::PopupEvent;
pub use crate::shared::logging::init_logging;
pub use crate::shared::settings::AppSettings;
pub use crate::shared::types::{AnchorPosition, PopupAction, SelectionContext};

/// Session wired to Gemini and the system clipboard, configured from `settings`
pub fn gemini_session(settings: &AppSettings, host: Arc<dyn PopupHost>) -> AppResult<PopupSession> {
    let client = GeminiClient::new(settings.provider.clone())?;
    let services = PopupServices::new(Arc::new(client), host);
    Ok(PopupSession::new(services, settings.preferences.clone()))
}
