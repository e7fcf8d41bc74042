//! Session store and auth state — the access-gate core.
//!
//! ARCHITECTURE
//! ============
//! Sessions are kept in-process, keyed by an opaque random token carried in
//! a signed cookie. `open` is the per-request initializer: it attaches an
//! existing record (refreshing its inactivity clock) or creates a fresh
//! anonymous one, so every request downstream sees a defined auth state.
//! Auth state is a two-state machine, not a bare flag; transitions are the
//! store operations `login`, `logout`, and idle expiry.
//!
//! TRADE-OFFS
//! ==========
//! Two concurrent first requests on the same client may each mint a token;
//! both records are anonymous, the later cookie wins, and the orphan is
//! swept after the idle window. Harmless by construction.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::env_parse;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

// =============================================================================
// AUTH STATE
// =============================================================================

/// Per-session authentication state. `Authenticated` is set only by the
/// login flow, never by session initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

impl AuthState {
    #[must_use]
    pub fn is_logged_in(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

// =============================================================================
// TOKENS + COOKIE SIGNING
// =============================================================================

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex session token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

fn signature(token: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b".");
    hasher.update(token.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Build the signed cookie value `{token}.{signature}`.
#[must_use]
pub fn cookie_value(token: &str, secret: &str) -> String {
    let sig = signature(token, secret);
    format!("{token}.{sig}")
}

/// Verify a presented cookie value against any of the configured secrets,
/// returning the embedded token. Forged or malformed values yield `None`.
#[must_use]
pub fn verify_cookie_value(value: &str, secrets: &[String]) -> Option<String> {
    let (token, sig) = value.split_once('.')?;
    if token.is_empty() || sig.is_empty() {
        return None;
    }
    secrets
        .iter()
        .any(|secret| signature(token, secret) == sig)
        .then(|| token.to_owned())
}

// =============================================================================
// SESSION STORE
// =============================================================================

struct SessionRecord {
    auth: AuthState,
    last_seen: Instant,
}

/// Shared in-process session store. Clone is cheap; all clones observe the
/// same records.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionRecord>>>,
    ttl: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    /// Attach a session for a request: return the live record for a valid
    /// presented token, or mint a fresh anonymous one.
    ///
    /// This is the initializer contract: the returned auth state is always
    /// defined, defaults to `Anonymous` on first sight, and an existing
    /// `Authenticated` state is never downgraded. Reading a live record
    /// resets its inactivity clock.
    pub async fn open(&self, presented: Option<&str>) -> (String, AuthState) {
        let now = Instant::now();
        let mut records = self.inner.write().await;

        if let Some(token) = presented {
            if let Some(record) = records.get_mut(token) {
                if now.duration_since(record.last_seen) < self.ttl {
                    record.last_seen = now;
                    return (token.to_owned(), record.auth);
                }
                // Idle-expired: drop the record and fall through to a fresh one.
                records.remove(token);
                tracing::debug!("session expired on touch");
            }
        }

        let token = generate_token();
        records.insert(token.clone(), SessionRecord { auth: AuthState::Anonymous, last_seen: now });
        (token, AuthState::Anonymous)
    }

    /// Current auth state for a token, or `None` if the session is unknown
    /// or idle-expired.
    pub async fn auth_state(&self, token: &str) -> Option<AuthState> {
        let records = self.inner.read().await;
        let record = records.get(token)?;
        if record.last_seen.elapsed() >= self.ttl {
            return None;
        }
        Some(record.auth)
    }

    /// Transition a session to `Authenticated`. Returns false if the
    /// session is unknown (nothing to log in).
    pub async fn login(&self, token: &str) -> bool {
        let mut records = self.inner.write().await;
        match records.get_mut(token) {
            Some(record) => {
                record.auth = AuthState::Authenticated;
                record.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Explicit logout destroys the session outright; the next request
    /// starts over anonymous.
    pub async fn logout(&self, token: &str) {
        let mut records = self.inner.write().await;
        records.remove(token);
    }

    /// Remove every idle-expired record. Returns the number removed.
    pub async fn expire_idle(&self) -> usize {
        let mut records = self.inner.write().await;
        let before = records.len();
        records.retain(|_, record| record.last_seen.elapsed() < self.ttl);
        before - records.len()
    }
}

/// Spawn the background expiry sweep. Returns a handle for shutdown.
pub fn spawn_expiry_sweep(store: SessionStore) -> JoinHandle<()> {
    let interval_secs = env_parse("SESSION_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS);
    tracing::info!(interval_secs, "session expiry sweep configured");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let removed = store.expire_idle().await;
            if removed > 0 {
                tracing::debug!(removed, "expired idle sessions");
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
