//! In-process state store
//!
//! Keeps published states in memory and counts every call, so sessions can
//! be exercised end to end without a network. Each publish mints a new
//! pointer under the publish URL's base.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use indexmap::IndexMap;
use serde_json::Value;

use super::store::StateStore;
use crate::config::Credential;
use crate::error::{GlancerError, Result};

#[derive(Debug, Default)]
pub struct MemoryStateStore {
    objects: Mutex<IndexMap<String, Value>>,
    tokens_seen: Mutex<Vec<String>>,
    next_id: AtomicU64,
    fetches: AtomicUsize,
    publishes: AtomicUsize,
    required_token: Option<String>,
    fail_status: Option<u16>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject requests whose bearer token differs from `token` with HTTP 401.
    pub fn requiring_token(mut self, token: impl Into<String>) -> Self {
        self.required_token = Some(token.into());
        self
    }

    /// Answer every request with the given HTTP status.
    pub fn failing_with(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    /// Seed a payload under `json_url`.
    pub fn insert(&self, json_url: impl Into<String>, payload: Value) -> Result<()> {
        self.objects()?.insert(json_url.into(), payload);
        Ok(())
    }

    pub fn get(&self, pointer: &str) -> Option<Value> {
        self.objects().ok()?.get(pointer).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn publish_count(&self) -> usize {
        self.publishes.load(Ordering::SeqCst)
    }

    /// Total requests received, successful or not.
    pub fn call_count(&self) -> usize {
        self.fetch_count() + self.publish_count()
    }

    /// Bearer tokens in the order requests carried them.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    fn objects(&self) -> Result<std::sync::MutexGuard<'_, IndexMap<String, Value>>> {
        self.objects.lock().map_err(|_| GlancerError::StoreUnavailable {
            reason: "memory store lock poisoned".to_string(),
        })
    }

    /// Status to answer with, if the request is refused.
    fn refusal(&self, credential: &Credential) -> Option<u16> {
        if let Ok(mut seen) = self.tokens_seen.lock() {
            seen.push(credential.token().to_string());
        }
        if let Some(status) = self.fail_status {
            return Some(status);
        }
        match &self.required_token {
            Some(required) if required != credential.token() => Some(401),
            _ => None,
        }
    }
}

impl StateStore for MemoryStateStore {
    fn fetch(&self, json_url: &str, credential: &Credential) -> Result<Value> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let failed = |status| GlancerError::FetchFailed {
            url: json_url.to_string(),
            status,
        };
        if let Some(status) = self.refusal(credential) {
            return Err(failed(status));
        }
        self.objects()?
            .get(json_url)
            .cloned()
            .ok_or_else(|| failed(404))
    }

    fn publish(
        &self,
        publish_url: &str,
        payload: &Value,
        credential: &Credential,
    ) -> Result<String> {
        self.publishes.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.refusal(credential) {
            return Err(GlancerError::PublishFailed {
                url: publish_url.to_string(),
                status,
            });
        }

        let base = publish_url.strip_suffix("/post").unwrap_or(publish_url);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let pointer = format!("{}/{}", base.trim_end_matches('/'), id);

        self.objects()?.insert(pointer.clone(), payload.clone());
        Ok(pointer)
    }
}
