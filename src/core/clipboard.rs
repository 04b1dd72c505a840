//! Clipboard writes for the Copy action

use std::sync::Mutex;

use crate::shared::error::{AppError, AppResult};

pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> AppResult<()>;
}

/// System clipboard via cli-clipboard
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> AppResult<()> {
        use cli_clipboard::{ClipboardContext, ClipboardProvider};

        ClipboardContext::new()
            .and_then(|mut ctx| ctx.set_contents(text.to_string()))
            .map_err(|e| AppError::Clipboard(format!("Failed to write to clipboard: {}", e)))
    }
}

/// In-process clipboard for headless hosts
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        match self.contents.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&self, text: &str) -> AppResult<()> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| AppError::Clipboard(format!("Mutex poisoned: {}", e)))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}
