//! Scripted query client for tests and offline hosts
//!
//! Returns queued responses in order, then the default response. Every call
//! is recorded before it suspends, so in-flight calls are visible.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::QueryClient;
use crate::shared::error::{AppError, AppResult};

pub struct MockQueryClient {
    responses: Mutex<VecDeque<AppResult<String>>>,
    default_response: String,
    call_history: Mutex<Vec<String>>,
    /// When set, each call waits for one permit before answering
    gate: Option<Arc<Semaphore>>,
}

impl MockQueryClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: "This is a mock response.".to_string(),
            call_history: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Always answer with `response`
    pub fn answering(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            ..Self::new()
        }
    }

    /// Answer the next call with `err`
    pub fn failing(err: AppError) -> Self {
        let mock = Self::new();
        mock.push_response(Err(err));
        mock
    }

    /// Hold every call until `release` is called
    pub fn gated(self) -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..self
        }
    }

    pub fn push_response(&self, response: AppResult<String>) {
        lock(&self.responses).push_back(response);
    }

    /// Let `n` held calls proceed
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn call_count(&self) -> usize {
        lock(&self.call_history).len()
    }

    pub fn prompts(&self) -> Vec<String> {
        lock(&self.call_history).clone()
    }
}

impl Default for MockQueryClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[async_trait]
impl QueryClient for MockQueryClient {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        lock(&self.call_history).push(prompt.to_string());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| AppError::Unknown(format!("mock gate closed: {}", e)))?;
            permit.forget();
        }

        let scripted = lock(&self.responses).pop_front();
        scripted.unwrap_or_else(|| Ok(self.default_response.clone()))
    }
}
