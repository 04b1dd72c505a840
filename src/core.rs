//! Popup core: state machine, dispatch and query orchestration

pub mod anchor;
pub mod clipboard;
pub mod dispatcher;
pub mod host;
pub mod popup;
pub mod query;
pub mod session;
pub mod view;

pub use anchor::{AnchorIdGenerator, SequentialAnchorIds, UuidAnchorIds};
pub use clipboard::{ClipboardWriter, MemoryClipboard, SystemClipboard};
pub use dispatcher::{ActionDispatcher, PopupServices, SearchOutcome};
pub use host::{ErrorSink, PopupFailure, PopupHost, RecordingHost, RecordingSink, TracingSink};
pub use popup::PopupStateMachine;
pub use query::{GeminiClient, MockQueryClient, QueryClient, QueryKind};
pub use session::PopupSession;
pub use view::{render, ButtonView, PopupView, Theme};
