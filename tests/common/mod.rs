#![allow(dead_code)]

//! Shared test context: an in-process [`SessionStore`] fake with a TTL-aware
//! clock (tokio time, so tests can pause and advance it) and failure
//! injection for the revocation phases.

use async_trait::async_trait;
use chrono::Utc;
use session_store::error::{AppError, Result};
use session_store::models::session::Session;
use session_store::store::{RawPage, SessionStore};
use std::collections::{BTreeMap, HashSet};
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::time::{Duration, Instant};

struct StoredRow {
    session: Session,
    expires_at: Instant,
}

/// In-memory stand-in for the wide-column backend.
///
/// Tokens order as a `BTreeMap` so pagination can use "resume after this
/// token" as its native page state — opaque bytes to everything above the
/// store seam, just like the real driver's.
pub struct MemoryStore {
    rows: Mutex<BTreeMap<String, StoredRow>>,
    connected: AtomicBool,
    schema_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    /// When set, `delete_tokens` fails as a whole request.
    fail_batch_call: AtomicBool,
    /// Tokens the batch delete silently leaves in place (simulated
    /// partition unavailability).
    batch_skips: Mutex<HashSet<String>>,
    /// Tokens whose individual retry delete fails.
    fail_single: Mutex<HashSet<String>>,
    /// When set, `select_existing` fails.
    fail_verification: AtomicBool,
    /// Row slipped in right after the next `page_by_user` computes its
    /// result, to reproduce the resolve-then-delete race.
    insert_after_user_page: Mutex<Option<(Session, Duration)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            connected: AtomicBool::new(true),
            schema_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
            fail_batch_call: AtomicBool::new(false),
            batch_skips: Mutex::new(HashSet::new()),
            fail_single: Mutex::new(HashSet::new()),
            fail_verification: AtomicBool::new(false),
            insert_after_user_page: Mutex::new(None),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    pub fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::Relaxed)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::Relaxed)
    }

    pub fn fail_next_batch_call(&self) {
        self.fail_batch_call.store(true, Ordering::Relaxed);
    }

    pub fn fail_verification(&self) {
        self.fail_verification.store(true, Ordering::Relaxed);
    }

    pub fn skip_in_batch(&self, token: &str) {
        self.batch_skips.lock().unwrap().insert(token.to_string());
    }

    pub fn fail_single_delete(&self, token: &str) {
        self.fail_single.lock().unwrap().insert(token.to_string());
    }

    pub fn race_insert_after_user_page(&self, session: Session, ttl: Duration) {
        *self.insert_after_user_page.lock().unwrap() = Some((session, ttl));
    }

    /// Number of live (unexpired) rows.
    pub fn live_rows(&self) -> usize {
        let now = Instant::now();
        self.rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.expires_at > now)
            .count()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.schema_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn insert_session(
        &self,
        token: &str,
        user_id: &str,
        device_id: &str,
        device_name: &str,
        ttl_seconds: i32,
    ) -> Result<()> {
        self.insert_calls.fetch_add(1, Ordering::Relaxed);
        self.rows.lock().unwrap().insert(
            token.to_string(),
            StoredRow {
                session: Session {
                    token: token.to_string(),
                    user_id: user_id.to_string(),
                    device_id: device_id.to_string(),
                    device_name: device_name.to_string(),
                    created_at: Utc::now(),
                },
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds as u64),
            },
        );
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Session>> {
        let now = Instant::now();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(token)
            .filter(|row| row.expires_at > now)
            .map(|row| row.session.clone()))
    }

    async fn page_by_user(
        &self,
        user_id: &str,
        page_size: i32,
        paging_state: Option<Vec<u8>>,
    ) -> Result<RawPage> {
        let page = self.page(Some(user_id), page_size, paging_state);

        if let Some((session, ttl)) = self.insert_after_user_page.lock().unwrap().take() {
            self.rows.lock().unwrap().insert(
                session.token.clone(),
                StoredRow {
                    session,
                    expires_at: Instant::now() + ttl,
                },
            );
        }

        Ok(page)
    }

    async fn scan_page(&self, page_size: i32, paging_state: Option<Vec<u8>>) -> Result<RawPage> {
        Ok(self.page(None, page_size, paging_state))
    }

    async fn delete_tokens(&self, tokens: &[String]) -> Result<()> {
        if self.fail_batch_call.load(Ordering::Relaxed) {
            return Err(AppError::Database("injected batch failure".to_string()));
        }

        let skips = self.batch_skips.lock().unwrap();
        let mut rows = self.rows.lock().unwrap();
        for token in tokens {
            if !skips.contains(token) {
                rows.remove(token);
            }
        }
        Ok(())
    }

    async fn delete_token(&self, token: &str) -> Result<()> {
        if self.fail_single.lock().unwrap().contains(token) {
            return Err(AppError::Database(
                "injected single delete failure".to_string(),
            ));
        }

        self.rows.lock().unwrap().remove(token);
        Ok(())
    }

    async fn select_existing(&self, tokens: &[String]) -> Result<Vec<String>> {
        if self.fail_verification.load(Ordering::Relaxed) {
            return Err(AppError::Database(
                "injected verification failure".to_string(),
            ));
        }

        let now = Instant::now();
        let rows = self.rows.lock().unwrap();
        Ok(tokens
            .iter()
            .filter(|token| {
                rows.get(*token)
                    .map(|row| row.expires_at > now)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

impl MemoryStore {
    fn page(&self, user_id: Option<&str>, page_size: i32, paging_state: Option<Vec<u8>>) -> RawPage {
        let resume_after = paging_state.map(|bytes| String::from_utf8(bytes).unwrap());
        let now = Instant::now();
        let rows = self.rows.lock().unwrap();

        let range = match &resume_after {
            Some(last) => rows.range((Excluded(last.clone()), Unbounded)),
            None => rows.range::<String, _>(..),
        };

        let matched: Vec<Session> = range
            .filter(|(_, row)| row.expires_at > now)
            .filter(|(_, row)| user_id.is_none_or(|u| row.session.user_id == u))
            .take(page_size as usize)
            .map(|(_, row)| row.session.clone())
            .collect();

        let paging_state = if matched.len() == page_size as usize {
            matched.last().map(|s| s.token.clone().into_bytes())
        } else {
            None
        };

        RawPage {
            rows: matched,
            paging_state,
        }
    }
}

/// Initializes test logging once per binary.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
