//! Popup state machine
//!
//! Pure container for `{DisclosureState, QueryState}`. No I/O, every
//! operation is total.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::shared::types::{AnchorPosition, DisclosureState, PopupState, QueryState, ResultAnchorId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupStateMachine {
    disclosure: DisclosureState,
    query: QueryState,
}

impl PopupStateMachine {
    /// Starts in `{Primary, Idle}`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disclosure(&self) -> DisclosureState {
        self.disclosure
    }

    pub fn query(&self) -> QueryState {
        self.query
    }

    pub fn is_extended(&self) -> bool {
        self.disclosure == DisclosureState::Extended
    }

    pub fn is_searching(&self) -> bool {
        self.query == QueryState::Searching
    }

    pub fn snapshot(&self) -> PopupState {
        PopupState {
            disclosure: self.disclosure,
            query: self.query,
        }
    }

    /// Show the extended panel. No-op when already extended.
    pub fn disclose(&mut self) {
        if self.disclosure != DisclosureState::Extended {
            debug!("disclosure: Primary -> Extended");
            self.disclosure = DisclosureState::Extended;
        }
    }

    /// Back to the primary actions. No-op when already primary.
    pub fn collapse(&mut self) {
        if self.disclosure != DisclosureState::Primary {
            debug!("disclosure: Extended -> Primary");
            self.disclosure = DisclosureState::Primary;
        }
    }

    /// Single-flight guard: returns `false` and changes nothing while a query is out.
    pub fn begin_search(&mut self) -> bool {
        match self.query {
            QueryState::Searching => false,
            QueryState::Idle => {
                debug!("query: Idle -> Searching");
                self.query = QueryState::Searching;
                true
            }
        }
    }

    pub fn end_search(&mut self) {
        debug!("query: {:?} -> Idle", self.query);
        self.query = QueryState::Idle;
    }
}

/// One mounted popup: the selection it was opened for, its anchor id and its state
///
/// Shared between the session (strong) and dispatchers (weak). Once retired,
/// nothing may mutate it again.
#[derive(Debug)]
pub(crate) struct PopupInstance {
    anchor_id: ResultAnchorId,
    selected_text: String,
    anchor: AnchorPosition,
    machine: Mutex<PopupStateMachine>,
    retired: AtomicBool,
}

impl PopupInstance {
    pub(crate) fn new(anchor_id: ResultAnchorId, selected_text: String, anchor: AnchorPosition) -> Self {
        Self {
            anchor_id,
            selected_text,
            anchor,
            machine: Mutex::new(PopupStateMachine::new()),
            retired: AtomicBool::new(false),
        }
    }

    pub(crate) fn anchor_id(&self) -> &ResultAnchorId {
        &self.anchor_id
    }

    pub(crate) fn selected_text(&self) -> &str {
        &self.selected_text
    }

    /// Same anchor/text pair, i.e. not a fresh selection
    pub(crate) fn is_same_selection(&self, selected_text: &str, anchor: Option<AnchorPosition>) -> bool {
        self.selected_text == selected_text && Some(self.anchor) == anchor
    }

    /// Run `f` against the state machine. The lock is never held across an await.
    pub(crate) fn with_machine<R>(&self, f: impl FnOnce(&mut PopupStateMachine) -> R) -> R {
        let mut machine = match self.machine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("[Popup] state mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        f(&mut machine)
    }

    pub(crate) fn snapshot(&self) -> PopupState {
        self.with_machine(|m| m.snapshot())
    }

    pub(crate) fn retire(&self) {
        self.retired.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_retired(&self) -> bool {
        self.retired.load(Ordering::SeqCst)
    }
}
