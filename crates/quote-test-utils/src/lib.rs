//! Testing utilities for the quotesync workspace
//!
//! Shared fixtures, a scripted in-memory remote and memory-backed builders.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use quote_core::{QuoteApp, QuoteConfig};
use quote_model::Quote;
use quote_store::{MemoryStore, QuoteStore, SessionStore};
use quote_sync::{PushReceipt, RemoteError, RemoteQuoteSource, SyncEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Build quotes from `(text, category)` pairs
pub fn quotes(pairs: &[(&str, &str)]) -> Vec<Quote> {
    pairs
        .iter()
        .map(|(text, category)| Quote::new(*text, *category))
        .collect()
}

/// Quote as the remote would return it
pub fn server_quote(id: u64, text: &str, category: &str) -> Quote {
    Quote::new(text, category)
        .with_id(format!("server-{id}"))
        .with_timestamp(Utc::now().to_rfc3339())
}

/// In-memory store holding exactly `quotes`
pub fn memory_store(quotes: Vec<Quote>) -> QuoteStore {
    let store = QuoteStore::in_memory();
    store.replace(quotes).unwrap();
    store
}

/// Remote driven entirely by the test
#[derive(Debug, Default)]
pub struct ScriptedRemote {
    snapshot: Mutex<Vec<Quote>>,
    pushes: Mutex<Vec<Vec<Quote>>>,
    fetches: AtomicUsize,
    fail_fetch: AtomicBool,
    fail_push: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedRemote {
    pub fn new(snapshot: Vec<Quote>) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    /// Replace what the next fetch returns
    pub fn set_snapshot(&self, snapshot: Vec<Quote>) {
        *self.snapshot.lock() = snapshot;
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_push(&self, fail: bool) {
        self.fail_push.store(fail, Ordering::SeqCst);
    }

    /// Sleep this long inside every fetch
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Every list pushed so far
    pub fn pushes(&self) -> Vec<Vec<Quote>> {
        self.pushes.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteQuoteSource for ScriptedRemote {
    async fn fetch(&self) -> Result<Vec<Quote>, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("scripted fetch failure".to_string()));
        }
        Ok(self.snapshot.lock().clone())
    }

    async fn push(&self, quotes: &[Quote]) -> Result<PushReceipt, RemoteError> {
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("scripted push failure".to_string()));
        }
        let mut pushes = self.pushes.lock();
        pushes.push(quotes.to_vec());
        Ok(PushReceipt {
            id: Some(100 + pushes.len() as u64),
            pushed: quotes.len(),
            acknowledged_at: Utc::now(),
        })
    }
}

/// Engine over an in-memory store and a scripted remote
pub fn scripted_engine(local: Vec<Quote>, remote: Vec<Quote>) -> (SyncEngine, Arc<ScriptedRemote>) {
    let remote = Arc::new(ScriptedRemote::new(remote));
    let engine = SyncEngine::new(memory_store(local), remote.clone());
    (engine, remote)
}

/// App over memory storage with a seeded random source
pub fn memory_app(seed: u64) -> QuoteApp {
    QuoteApp::with_parts(
        QuoteConfig::default(),
        QuoteStore::in_memory(),
        SessionStore::new(Arc::new(MemoryStore::new())),
        StdRng::seed_from_u64(seed),
    )
}
