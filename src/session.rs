use crate::api::{ApiService, ApiState};
use crate::cache::{CacheState, SessionCache};
use crate::models::{IdentityError, RawUser, UserIdentity};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

// --- Readiness Model ---

/// SessionStatus
///
/// The three-valued readiness model for "who is logged in":
/// - `Unresolved`: the bootstrap has not settled yet; no access decision may
///   be made.
/// - `Absent`: confirmed logged out.
/// - `Present`: confirmed logged in, with a normalized identity on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unresolved,
    Absent,
    Present,
}

/// SessionSnapshot
///
/// An immutable read of the store: the status plus the identity, which is
/// `Some` exactly when the status is `Present`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub identity: Option<UserIdentity>,
}

impl SessionSnapshot {
    pub fn unresolved() -> Self {
        Self {
            status: SessionStatus::Unresolved,
            identity: None,
        }
    }

    pub fn absent() -> Self {
        Self {
            status: SessionStatus::Absent,
            identity: None,
        }
    }

    pub fn present(identity: UserIdentity) -> Self {
        Self {
            status: SessionStatus::Present,
            identity: Some(identity),
        }
    }
}

enum State {
    Unresolved,
    Absent,
    Present(UserIdentity),
}

// --- The Store ---

/// SessionStore
///
/// Single source of truth for the authenticated identity. The store
/// exclusively owns the Session: every other component either reads a
/// snapshot or requests a mutation through `login`/`logout`/`initialize`.
///
/// Valid transitions: `Unresolved → Absent | Present` (bootstrap settling),
/// `Absent → Present` (login), `Present → Absent` (logout or failed
/// re-validation). Nothing else.
///
/// Conflicting writes serialize by recency of the *call*, not of network
/// completion: explicit `login`/`logout` bump a write epoch, and a bootstrap
/// fetch that completes under a changed epoch discards its result.
pub struct SessionStore {
    state: Mutex<State>,
    /// Bumped by every explicit write; lets `initialize` detect that its
    /// in-flight fetch has been superseded.
    epoch: AtomicU64,
    /// Single-flight guard for `initialize`: a second concurrent caller
    /// parks here and then observes the first caller's settled state.
    init_flight: tokio::sync::Mutex<()>,
    api: ApiState,
    cache: CacheState,
}

impl SessionStore {
    pub fn new(api: ApiState, cache: CacheState) -> Self {
        Self {
            state: Mutex::new(State::Unresolved),
            epoch: AtomicU64::new(0),
            init_flight: tokio::sync::Mutex::new(()),
            api,
            cache,
        }
    }

    /// read
    ///
    /// Pure synchronous snapshot of the current session. No side effects.
    pub fn read(&self) -> SessionSnapshot {
        match &*self.state.lock().unwrap() {
            State::Unresolved => SessionSnapshot::unresolved(),
            State::Absent => SessionSnapshot::absent(),
            State::Present(identity) => SessionSnapshot::present(identity.clone()),
        }
    }

    /// initialize
    ///
    /// The bootstrap: invoked once per application lifetime, it validates
    /// the persisted cache and re-validates the session against the backend,
    /// producing exactly one transition out of `Unresolved`. This call never
    /// fails: any problem (network error, 401, malformed data) settles the
    /// store as `Absent` and clears the cache.
    ///
    /// Repeated or concurrent calls are safe: the flight lock gives
    /// single-flight behavior, so a second caller awaits the first and then
    /// returns without issuing a duplicate fetch.
    pub async fn initialize(&self) {
        let _flight = self.init_flight.lock().await;

        if !matches!(*self.state.lock().unwrap(), State::Unresolved) {
            // Already settled by a previous flight or an explicit write.
            return;
        }

        // Advisory cache hydration: a valid record here only tells us a
        // session existed last run; the fetch below is authoritative.
        // Corrupt content is discarded on the spot and never surfaced.
        if let Some(raw) = self.cache.load() {
            match UserIdentity::from_raw(raw) {
                Ok(cached) => {
                    tracing::debug!(user = %cached.id, "cached session found, re-validating")
                }
                Err(e) => {
                    tracing::warn!("discarding unusable cached session: {}", e);
                    self.cache.clear();
                }
            }
        }

        let epoch_before = self.epoch.load(Ordering::SeqCst);
        let fetched = self.api.fetch_profile().await;

        let resolved = match fetched {
            Ok(raw) => match UserIdentity::from_raw(raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    tracing::warn!("profile response had no usable identifier: {}", e);
                    None
                }
            },
            Err(e) => {
                // Transient network failure and a rejected session are
                // handled identically: confirmed logged out, no retry.
                tracing::debug!("profile re-validation failed: {}", e);
                None
            }
        };

        let mut state = self.state.lock().unwrap();
        if self.epoch.load(Ordering::SeqCst) != epoch_before {
            // An explicit login/logout won the race; the stale network
            // result is discarded (last-explicit-call-wins).
            tracing::debug!("discarding superseded profile fetch");
            return;
        }

        match resolved {
            Some(identity) => {
                self.cache.save(&identity);
                *state = State::Present(identity);
            }
            None => {
                self.cache.clear();
                *state = State::Absent;
            }
        }
    }

    /// login
    ///
    /// Installs a server-confirmed identity. Normalization happens here, at
    /// the ingress: a record without a usable identifier is rejected and the
    /// store is left untouched. On success the transition to `Present` is
    /// synchronous and immediately visible to `read`, with no network
    /// round-trip involved.
    pub fn login(&self, raw: RawUser) -> Result<UserIdentity, IdentityError> {
        let identity = UserIdentity::from_raw(raw)?;

        let mut state = self.state.lock().unwrap();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.cache.save(&identity);
        *state = State::Present(identity.clone());

        Ok(identity)
    }

    /// logout
    ///
    /// Synchronous transition to `Absent`; clears the persisted cache. Does
    /// not call the backend logout endpoint: that is the caller's job,
    /// before or after this.
    pub fn logout(&self) {
        let mut state = self.state.lock().unwrap();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.cache.clear();
        *state = State::Absent;
    }
}
