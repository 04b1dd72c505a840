//! Result anchor ids
//!
//! One id per popup instance, generated when the instance is created.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::shared::types::ResultAnchorId;

const ANCHOR_PREFIX: &str = "search-";

pub trait AnchorIdGenerator: Send + Sync {
    fn next_id(&self) -> ResultAnchorId;
}

/// Random ids, collision-free across rapid remounts
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidAnchorIds;

impl AnchorIdGenerator for UuidAnchorIds {
    fn next_id(&self) -> ResultAnchorId {
        ResultAnchorId::new(format!("{}{}", ANCHOR_PREFIX, Uuid::new_v4()))
    }
}

/// Monotonic counter ids: `search-1`, `search-2`, ...
#[derive(Debug, Default)]
pub struct SequentialAnchorIds {
    next: AtomicU64,
}

impl SequentialAnchorIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnchorIdGenerator for SequentialAnchorIds {
    fn next_id(&self) -> ResultAnchorId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        ResultAnchorId::new(format!("{}{}", ANCHOR_PREFIX, n))
    }
}
