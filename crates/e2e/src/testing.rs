//! In-memory browser stand-ins for unit tests
//!
//! `RecordingTransport` records every driver request and answers from a
//! queue of scripted replies, so page objects can be checked without node or
//! a browser.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use saucedemo_common::urls;

use crate::browser::{ContextOptions, PageFactory};
use crate::driver::Transport;
use crate::error::E2eResult;
use crate::page::Page;
use crate::E2eError;

/// A request seen by the transport
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub params: Value,
}

#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<HashMap<String, VecDeque<E2eResult<Value>>>>,
    next_page: AtomicU64,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_page: AtomicU64::new(1),
            ..Default::default()
        })
    }

    /// Queue a successful reply for the next call to `method`
    pub fn reply(&self, method: &str, value: Value) {
        self.replies
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(value));
    }

    /// Queue a failure for the next call to `method`
    pub fn fail(&self, method: &str, error: E2eError) {
        self.replies
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.method.clone()).collect()
    }

    /// Parameters of every call to `method`, in order
    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method)
            .map(|c| c.params.clone())
            .collect()
    }

    /// A page on the default storefront origin backed by this transport
    pub fn page(self: &Arc<Self>) -> Page {
        let id = self.next_page.fetch_add(1, Ordering::SeqCst);
        let transport: Arc<dyn Transport> = self.clone();
        Page::new(id, transport, urls::BASE.to_string(), Duration::from_secs(5))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn call(&self, method: &str, params: Value) -> E2eResult<Value> {
        self.calls.lock().push(Call {
            method: method.to_string(),
            params,
        });

        let scripted = self
            .replies
            .lock()
            .get_mut(method)
            .and_then(|queue| queue.pop_front());

        match scripted {
            Some(reply) => reply,
            None if method == "newContext" => {
                Ok(json!({ "page": self.next_page.fetch_add(1, Ordering::SeqCst) }))
            }
            None => Ok(Value::Null),
        }
    }
}

/// Page factory over a [`RecordingTransport`]
pub struct RecordingFactory {
    transport: Arc<RecordingTransport>,
    closed: AtomicBool,
}

impl RecordingFactory {
    pub fn new(transport: Arc<RecordingTransport>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            closed: AtomicBool::new(false),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFactory for RecordingFactory {
    async fn new_page(&self, options: &ContextOptions) -> E2eResult<Page> {
        let created = self
            .transport
            .call("newContext", serde_json::to_value(options)?)
            .await?;
        let id = created["page"].as_u64().unwrap_or_default();
        let transport: Arc<dyn Transport> = self.transport.clone();
        Ok(Page::new(
            id,
            transport,
            options.base_url.clone(),
            options.expect_timeout,
        ))
    }

    async fn close(&self) -> E2eResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
