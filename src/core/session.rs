//! Popup session
//!
//! Owns the popup currently mounted for the host's selection. A fresh
//! selection (new anchor/text pair) retires the old popup and mounts a new
//! one with its own anchor id, starting in `{Primary, Idle}`.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::dispatcher::{ActionDispatcher, PopupServices};
use super::popup::PopupInstance;
use super::view::{self, PopupView, Theme};
use crate::shared::settings::UserPreferences;
use crate::shared::types::{PopupState, ResultAnchorId, SelectionContext};

#[derive(Default)]
struct SessionInner {
    context: SelectionContext,
    instance: Option<Arc<PopupInstance>>,
}

pub struct PopupSession {
    services: PopupServices,
    preferences: UserPreferences,
    inner: Mutex<SessionInner>,
}

impl PopupSession {
    pub fn new(services: PopupServices, preferences: UserPreferences) -> Self {
        Self {
            services,
            preferences,
            inner: Mutex::new(SessionInner::default()),
        }
    }

    fn inner(&self) -> MutexGuard<'_, SessionInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("[Session] mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn dispatcher_for(&self, instance: &Arc<PopupInstance>) -> ActionDispatcher {
        ActionDispatcher::new(
            instance,
            self.services.clone(),
            self.preferences.default_target_lang.clone(),
        )
    }

    /// Feed the latest selection from the host
    ///
    /// Returns a dispatcher when a popup is mounted for this selection.
    pub fn present(&self, ctx: SelectionContext) -> Option<ActionDispatcher> {
        let mut inner = self.inner();

        let same_selection = inner
            .instance
            .as_ref()
            .is_some_and(|i| i.is_same_selection(&ctx.selected_text, ctx.anchor_position));

        if !same_selection {
            if let Some(old) = inner.instance.take() {
                debug!(anchor_id = %old.anchor_id(), "[Session] retiring popup");
                old.retire();
            }
            if ctx.is_renderable() {
                if let Some(anchor) = ctx.anchor_position {
                    let anchor_id = self.services.anchor_ids.next_id();
                    info!(anchor_id = %anchor_id, "[Session] popup mounted");
                    inner.instance = Some(Arc::new(PopupInstance::new(
                        anchor_id,
                        ctx.selected_text.clone(),
                        anchor,
                    )));
                }
            } else if ctx.visible {
                debug!("[Session] visible selection without anchor, nothing to mount");
            }
        }

        inner.context = ctx;
        let instance = inner.instance.clone();
        drop(inner);
        instance.map(|i| self.dispatcher_for(&i))
    }

    /// Host teardown: retire and drop the current popup
    pub fn dismiss(&self) {
        let mut inner = self.inner();
        if let Some(old) = inner.instance.take() {
            debug!(anchor_id = %old.anchor_id(), "[Session] popup dismissed");
            old.retire();
        }
        inner.context = SelectionContext::default();
    }

    pub fn dispatcher(&self) -> Option<ActionDispatcher> {
        let instance = self.inner().instance.clone();
        instance.map(|i| self.dispatcher_for(&i))
    }

    pub fn anchor_id(&self) -> Option<ResultAnchorId> {
        self.inner().instance.as_ref().map(|i| i.anchor_id().clone())
    }

    pub fn state(&self) -> Option<PopupState> {
        self.inner().instance.as_ref().map(|i| i.snapshot())
    }

    /// View using the configured theme
    pub fn view(&self) -> Option<PopupView> {
        self.view_with_dark_mode(self.preferences.dark_mode)
    }

    pub fn view_with_dark_mode(&self, dark_mode: bool) -> Option<PopupView> {
        let inner = self.inner();
        let instance = inner.instance.as_ref()?;
        view::render(
            &inner.context,
            instance.snapshot(),
            instance.anchor_id(),
            Theme::from_dark_mode(dark_mode),
            &self.preferences.default_target_lang,
        )
    }
}
