//! Action dispatcher
//!
//! Maps popup actions to state transitions and side effects: clipboard
//! writes, provider queries, result delivery and scroll requests.
//!
//! A dispatcher only holds a weak reference to its popup. While a query is
//! in flight nothing keeps the popup alive, and a completion that finds it
//! gone (or retired) is dropped without touching anything.

use std::sync::{Arc, Weak};
use tracing::{debug, info};

use super::anchor::{AnchorIdGenerator, UuidAnchorIds};
use super::clipboard::{ClipboardWriter, SystemClipboard};
use super::host::{ErrorSink, PopupFailure, PopupHost, TracingSink};
use super::popup::PopupInstance;
use super::query::{QueryClient, QueryKind};
use crate::shared::error::QueryErrorKind;
use crate::shared::types::{PopupAction, PopupState, ResultAnchorId, ScrollRequest};

/// Everything a popup talks to
#[derive(Clone)]
pub struct PopupServices {
    pub client: Arc<dyn QueryClient>,
    pub host: Arc<dyn PopupHost>,
    pub clipboard: Arc<dyn ClipboardWriter>,
    pub sink: Arc<dyn ErrorSink>,
    pub anchor_ids: Arc<dyn AnchorIdGenerator>,
}

impl PopupServices {
    /// System clipboard, tracing sink and random anchor ids
    pub fn new(client: Arc<dyn QueryClient>, host: Arc<dyn PopupHost>) -> Self {
        Self {
            client,
            host,
            clipboard: Arc::new(SystemClipboard),
            sink: Arc::new(TracingSink),
            anchor_ids: Arc::new(UuidAnchorIds),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardWriter>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_anchor_ids(mut self, anchor_ids: Arc<dyn AnchorIdGenerator>) -> Self {
        self.anchor_ids = anchor_ids;
        self
    }
}

/// How a query invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Answer handed to the host, scroll requested
    Delivered,
    /// Provider failed; popup back to Idle, nothing delivered
    Failed,
    /// Another query was already in flight; provider not called
    Rejected,
    /// Popup was torn down before or during the query
    Stale,
}

#[derive(Clone)]
pub struct ActionDispatcher {
    instance: Weak<PopupInstance>,
    services: PopupServices,
    default_target_lang: String,
}

impl ActionDispatcher {
    pub(crate) fn new(instance: &Arc<PopupInstance>, services: PopupServices, default_target_lang: String) -> Self {
        Self {
            instance: Arc::downgrade(instance),
            services,
            default_target_lang,
        }
    }

    fn live_instance(&self) -> Option<Arc<PopupInstance>> {
        self.instance.upgrade().filter(|instance| !instance.is_retired())
    }

    pub fn is_live(&self) -> bool {
        self.live_instance().is_some()
    }

    pub fn anchor_id(&self) -> Option<ResultAnchorId> {
        self.live_instance().map(|instance| instance.anchor_id().clone())
    }

    pub fn snapshot(&self) -> Option<PopupState> {
        self.live_instance().map(|instance| instance.snapshot())
    }

    /// Handle one user intent. Returns the query outcome for query actions.
    pub async fn dispatch(&self, action: PopupAction) -> Option<SearchOutcome> {
        debug!(?action, "dispatch");
        match action {
            PopupAction::Copy => {
                self.copy_selection();
                None
            }
            PopupAction::Disclose => {
                self.open();
                None
            }
            PopupAction::Back => {
                self.close();
                None
            }
            other => match QueryKind::from_action(&other) {
                Some(kind) => Some(self.run_query(kind).await),
                None => None,
            },
        }
    }

    /// Open the extended panel
    pub fn open(&self) {
        if let Some(instance) = self.live_instance() {
            instance.with_machine(|m| m.disclose());
        }
    }

    /// Back to the primary actions
    pub fn close(&self) {
        if let Some(instance) = self.live_instance() {
            instance.with_machine(|m| m.collapse());
        }
    }

    /// Write the selected text to the clipboard. Failures are logged and swallowed.
    pub fn copy_selection(&self) {
        let Some(instance) = self.live_instance() else {
            return;
        };
        match self.services.clipboard.write_text(instance.selected_text()) {
            Ok(()) => debug!(chars = instance.selected_text().chars().count(), "[Copy] selection copied"),
            Err(e) => self.services.sink.record(&PopupFailure::Clipboard { message: e.to_string() }),
        }
    }

    pub async fn search(&self) -> SearchOutcome {
        self.run_query(QueryKind::Search).await
    }

    /// Translate into `target_lang`, or the configured default language
    pub async fn translate(&self, target_lang: Option<&str>) -> SearchOutcome {
        let target_lang = target_lang.unwrap_or(&self.default_target_lang).to_string();
        self.run_query(QueryKind::Translate { target_lang }).await
    }

    pub async fn summarize(&self) -> SearchOutcome {
        self.run_query(QueryKind::Summarize).await
    }

    pub async fn explain(&self) -> SearchOutcome {
        self.run_query(QueryKind::Explain).await
    }

    async fn run_query(&self, kind: QueryKind) -> SearchOutcome {
        // Scope the strong reference so it is dropped before the provider call
        let (anchor_id, prompt) = {
            let Some(instance) = self.live_instance() else {
                debug!(kind = kind.label(), "query on a discarded popup ignored");
                return SearchOutcome::Stale;
            };
            if !instance.with_machine(|m| m.begin_search()) {
                debug!(kind = kind.label(), "query already in flight, ignoring");
                return SearchOutcome::Rejected;
            }
            (instance.anchor_id().clone(), kind.prompt(instance.selected_text()))
        };

        info!(anchor_id = %anchor_id, kind = kind.label(), "[Search] query started");
        let result = self.services.client.generate(&prompt).await;

        let Some(instance) = self.live_instance() else {
            debug!(anchor_id = %anchor_id, "[Search] completion for a discarded popup dropped");
            return SearchOutcome::Stale;
        };
        instance.with_machine(|m| m.end_search());
        drop(instance);

        match result {
            Ok(answer) => {
                info!(anchor_id = %anchor_id, answer_len = answer.len(), "[Search] answer delivered");
                self.services.host.on_result(&anchor_id, &answer);
                self.services.host.request_scroll(ScrollRequest::to_result(anchor_id));
                SearchOutcome::Delivered
            }
            Err(err) => {
                let kind = QueryErrorKind::from(&err);
                self.services.sink.record(&PopupFailure::Provider {
                    anchor_id: anchor_id.clone(),
                    kind,
                    message: err.to_string(),
                });
                self.services.host.on_error(&anchor_id, kind);
                SearchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clipboard::MemoryClipboard;
    use crate::core::host::{HostCall, RecordingHost, RecordingSink};
    use crate::core::query::{prompt, MockQueryClient};
    use crate::shared::error::{AppError, AppResult};
    use crate::shared::types::{AnchorPosition, DisclosureState, QueryState, TranslatePayload};

    struct DeniedClipboard;

    impl ClipboardWriter for DeniedClipboard {
        fn write_text(&self, _text: &str) -> AppResult<()> {
            Err(AppError::Clipboard("permission denied".to_string()))
        }
    }

    struct Fixture {
        client: Arc<MockQueryClient>,
        host: Arc<RecordingHost>,
        sink: Arc<RecordingSink>,
        clipboard: Arc<MemoryClipboard>,
        instance: Arc<PopupInstance>,
        dispatcher: ActionDispatcher,
    }

    fn fixture(text: &str, client: MockQueryClient) -> Fixture {
        let client = Arc::new(client);
        let host = Arc::new(RecordingHost::new());
        let sink = Arc::new(RecordingSink::new());
        let clipboard = Arc::new(MemoryClipboard::new());
        let services = PopupServices::new(client.clone(), host.clone())
            .with_sink(sink.clone())
            .with_clipboard(clipboard.clone());
        let instance = Arc::new(PopupInstance::new(
            ResultAnchorId::new("search-1"),
            text.to_string(),
            AnchorPosition { x: 10.0, y: 20.0 },
        ));
        let dispatcher = ActionDispatcher::new(&instance, services, "en".to_string());
        Fixture {
            client,
            host,
            sink,
            clipboard,
            instance,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn test_search_success_delivers_and_scrolls() {
        let f = fixture("photosynthesis", MockQueryClient::answering("Photosynthesis is..."));

        let outcome = f.dispatcher.search().await;

        assert_eq!(outcome, SearchOutcome::Delivered);
        assert_eq!(f.host.results(), vec!["Photosynthesis is...".to_string()]);
        assert_eq!(
            f.host.scrolls(),
            vec![ScrollRequest::to_result(ResultAnchorId::new("search-1"))]
        );
        // Scroll comes after the result
        assert!(matches!(f.host.calls()[0], HostCall::Result { .. }));
        assert_eq!(f.instance.snapshot().query, QueryState::Idle);
        assert_eq!(f.client.prompts(), vec![prompt::search_prompt("photosynthesis")]);
    }

    #[tokio::test]
    async fn test_search_failure_records_provider_error() {
        let f = fixture(
            "xyz",
            MockQueryClient::failing(AppError::Network("connection reset".to_string())),
        );

        let outcome = f.dispatcher.search().await;

        assert_eq!(outcome, SearchOutcome::Failed);
        assert!(f.host.results().is_empty());
        assert!(f.host.scrolls().is_empty());
        assert_eq!(f.instance.snapshot().query, QueryState::Idle);
        assert_eq!(f.sink.provider_error_count(), 1);
        assert_eq!(
            f.host.calls(),
            vec![HostCall::Error {
                anchor_id: ResultAnchorId::new("search-1"),
                kind: QueryErrorKind::Network,
            }]
        );
    }

    #[tokio::test]
    async fn test_overlapping_searches_call_provider_once() {
        let f = fixture("photosynthesis", MockQueryClient::answering("answer").gated());

        let (first, second) = tokio::join!(f.dispatcher.search(), async {
            let second = f.dispatcher.search().await;
            assert_eq!(f.instance.snapshot().query, QueryState::Searching);
            f.client.release(1);
            second
        });

        assert_eq!(first, SearchOutcome::Delivered);
        assert_eq!(second, SearchOutcome::Rejected);
        assert_eq!(f.client.call_count(), 1);
        assert_eq!(f.host.results().len(), 1);
    }

    #[tokio::test]
    async fn test_search_can_repeat_after_settling() {
        let f = fixture("photosynthesis", MockQueryClient::answering("again"));
        f.client.push_response(Err(AppError::Provider("500".to_string())));

        assert_eq!(f.dispatcher.search().await, SearchOutcome::Failed);
        assert_eq!(f.instance.snapshot().query, QueryState::Idle);
        assert_eq!(f.dispatcher.search().await, SearchOutcome::Delivered);
        assert_eq!(f.instance.snapshot().query, QueryState::Idle);
        assert_eq!(f.client.call_count(), 2);
        assert_eq!(f.host.results(), vec!["again".to_string()]);
    }

    #[tokio::test]
    async fn test_other_actions_stay_responsive_while_searching() {
        let f = fixture("photosynthesis", MockQueryClient::answering("answer").gated());

        let (outcome, ()) = tokio::join!(f.dispatcher.search(), async {
            f.dispatcher.open();
            assert_eq!(
                f.dispatcher.snapshot(),
                Some(PopupState {
                    disclosure: DisclosureState::Extended,
                    query: QueryState::Searching,
                })
            );
            f.dispatcher.copy_selection();
            f.dispatcher.close();
            f.client.release(1);
        });

        assert_eq!(outcome, SearchOutcome::Delivered);
        assert_eq!(f.clipboard.contents().as_deref(), Some("photosynthesis"));
        assert_eq!(f.instance.snapshot(), PopupState::default());
    }

    #[tokio::test]
    async fn test_failure_keeps_disclosure() {
        let f = fixture("xyz", MockQueryClient::failing(AppError::Network("down".to_string())));
        f.dispatcher.open();

        f.dispatcher.search().await;

        assert_eq!(
            f.instance.snapshot(),
            PopupState {
                disclosure: DisclosureState::Extended,
                query: QueryState::Idle,
            }
        );
    }

    #[tokio::test]
    async fn test_teardown_mid_query_is_noop() {
        let Fixture {
            client,
            host,
            sink,
            instance,
            dispatcher,
            ..
        } = fixture("photosynthesis", MockQueryClient::answering("too late").gated());

        let (outcome, ()) = tokio::join!(dispatcher.search(), async {
            drop(instance);
            client.release(1);
        });

        assert_eq!(outcome, SearchOutcome::Stale);
        assert!(host.calls().is_empty());
        assert!(sink.failures().is_empty());
        assert!(!dispatcher.is_live());
    }

    #[tokio::test]
    async fn test_retired_popup_ignores_completion() {
        let f = fixture("photosynthesis", MockQueryClient::answering("too late").gated());

        let (outcome, ()) = tokio::join!(f.dispatcher.search(), async {
            f.instance.retire();
            f.client.release(1);
        });

        assert_eq!(outcome, SearchOutcome::Stale);
        assert!(f.host.calls().is_empty());
        // The retired machine was not touched
        assert_eq!(f.instance.snapshot().query, QueryState::Searching);
    }

    #[tokio::test]
    async fn test_search_on_discarded_popup_skips_provider() {
        let Fixture {
            client, instance, dispatcher, ..
        } = fixture("photosynthesis", MockQueryClient::new());
        drop(instance);

        assert_eq!(dispatcher.search().await, SearchOutcome::Stale);
        assert_eq!(client.call_count(), 0);
        dispatcher.open();
        dispatcher.copy_selection();
        assert_eq!(dispatcher.snapshot(), None);
    }

    #[test]
    fn test_copy_writes_verbatim() {
        let f = fixture("  spaced\ttext \n", MockQueryClient::new());
        f.dispatcher.copy_selection();
        assert_eq!(f.clipboard.contents().as_deref(), Some("  spaced\ttext \n"));
    }

    #[test]
    fn test_copy_failure_is_swallowed() {
        let client = Arc::new(MockQueryClient::new());
        let host = Arc::new(RecordingHost::new());
        let sink = Arc::new(RecordingSink::new());
        let services = PopupServices::new(client, host.clone())
            .with_sink(sink.clone())
            .with_clipboard(Arc::new(DeniedClipboard));
        let instance = Arc::new(PopupInstance::new(
            ResultAnchorId::new("search-1"),
            "text".to_string(),
            AnchorPosition { x: 0.0, y: 0.0 },
        ));
        let dispatcher = ActionDispatcher::new(&instance, services, "en".to_string());

        dispatcher.copy_selection();

        assert_eq!(instance.snapshot(), PopupState::default());
        assert!(host.calls().is_empty());
        assert!(matches!(sink.failures()[0], PopupFailure::Clipboard { .. }));
    }

    #[tokio::test]
    async fn test_dispatch_routes_actions() {
        let f = fixture("bonjour", MockQueryClient::answering("hello"));

        assert_eq!(f.dispatcher.dispatch(PopupAction::Disclose).await, None);
        assert!(f.instance.snapshot().disclosure == DisclosureState::Extended);
        assert_eq!(f.dispatcher.dispatch(PopupAction::Back).await, None);
        assert!(f.instance.snapshot().disclosure == DisclosureState::Primary);
        assert_eq!(f.dispatcher.dispatch(PopupAction::Copy).await, None);
        assert_eq!(f.clipboard.contents().as_deref(), Some("bonjour"));

        let outcome = f
            .dispatcher
            .dispatch(PopupAction::Translate(TranslatePayload {
                target_lang: "en".to_string(),
            }))
            .await;
        assert_eq!(outcome, Some(SearchOutcome::Delivered));
        assert_eq!(f.client.prompts(), vec![prompt::translate_prompt("bonjour", "en")]);
    }

    #[tokio::test]
    async fn test_extended_actions_use_their_templates() {
        let f = fixture("entropy", MockQueryClient::answering("ok"));

        f.dispatcher.summarize().await;
        f.dispatcher.explain().await;
        f.dispatcher.translate(None).await;
        f.dispatcher.translate(Some("ja")).await;

        assert_eq!(
            f.client.prompts(),
            vec![
                prompt::summarize_prompt("entropy"),
                prompt::explain_prompt("entropy"),
                prompt::translate_prompt("entropy", "en"),
                prompt::translate_prompt("entropy", "ja"),
            ]
        );
        assert_eq!(f.host.results().len(), 4);
    }
}
