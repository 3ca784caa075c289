// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use chrono::Duration;
use chrono::NaiveDateTime;
use dictation_core::ErrorReport;
use dictation_core::Fallible;
use dictation_core::Languages;
use dictation_core::QuizSession;
use dictation_core::rng::TinyRng;
use uuid::Uuid;

use crate::audio::cache::AudioCache;
use crate::db::Database;

/// Name of the cookie carrying the session ID.
pub const SESSION_COOKIE: &str = "dictation_session";

/// Upper bound on live sessions. Past it, the least recently seen session is
/// evicted to make room.
pub const MAX_SESSIONS: usize = 10_000;

#[derive(Clone)]
pub struct ServerState {
    pub languages: Languages,
    pub db: Arc<Mutex<Database>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub audio: Arc<AudioCache>,
}

impl ServerState {
    pub fn db(&self) -> Fallible<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| ErrorReport::storage("dictionary lock poisoned"))
    }

    pub fn sessions(&self) -> Fallible<MutexGuard<'_, SessionStore>> {
        self.sessions
            .lock()
            .map_err(|_| ErrorReport::storage("session store lock poisoned"))
    }

    /// Run `f` against the caller's session.
    pub fn with_session<T>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut UserSession) -> Fallible<T>,
    ) -> Fallible<T> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| ErrorReport::not_found("session expired"))?;
        f(session)
    }
}

/// An opaque, unguessable session identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user's quiz, plus the RNG used to shuffle it.
pub struct UserSession {
    pub quiz: QuizSession,
    pub rng: TinyRng,
    last_seen: NaiveDateTime,
}

/// All live sessions. Sessions are created on first contact and dropped on
/// logout, after sitting idle for longer than the TTL, or when the store is
/// full and they are the least recently seen.
pub struct SessionStore {
    sessions: HashMap<SessionId, UserSession>,
    ttl: Duration,
    capacity: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_SESSIONS)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Find the session named by the cookie value, or start a new one.
    /// Returns the session ID and whether it was just created.
    pub fn resolve(&mut self, cookie: Option<&str>, now: NaiveDateTime) -> (SessionId, bool) {
        self.prune(now);
        if let Some(value) = cookie {
            let id = SessionId(value.to_string());
            if let Some(session) = self.sessions.get_mut(&id) {
                session.last_seen = now;
                return (id, false);
            }
        }
        if self.sessions.len() >= self.capacity {
            self.evict_oldest();
        }
        let (id, rng_seed) = mint();
        log::debug!("Starting session {id} ({} already live)", self.len());
        self.sessions.insert(
            id.clone(),
            UserSession {
                quiz: QuizSession::new(),
                rng: TinyRng::from_seed(rng_seed),
                last_seen: now,
            },
        );
        (id, true)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut UserSession> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    fn prune(&mut self, now: NaiveDateTime) {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| now - s.last_seen <= ttl);
        let expired = before - self.sessions.len();
        if expired > 0 {
            log::debug!("Expired {expired} idle sessions");
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, s)| s.last_seen)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            log::warn!("Session limit reached, evicting {id}");
            self.sessions.remove(&id);
        }
    }
}

/// A fresh session ID and an independent seed for its RNG, both drawn from
/// OS randomness.
fn mint() -> (SessionId, u64) {
    let id = Uuid::new_v4().simple().to_string();
    let (seed, _) = Uuid::new_v4().as_u64_pair();
    (SessionId(id), seed)
}

/// Pull the session cookie out of a `Cookie` header value.
pub fn session_cookie(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(minutes: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, minutes, 0)
            .unwrap()
    }

    #[test]
    fn test_new_session_is_minted() {
        let mut store = SessionStore::new(Duration::minutes(30));
        let (id, fresh) = store.resolve(None, at(0));
        assert!(fresh);
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_known_cookie_is_reused() {
        let mut store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.resolve(None, at(0));
        let (again, fresh) = store.resolve(Some(id.as_str()), at(10));
        assert!(!fresh);
        assert_eq!(id, again);
    }

    #[test]
    fn test_unknown_cookie_gets_a_new_session() {
        let mut store = SessionStore::new(Duration::minutes(30));
        let (id, fresh) = store.resolve(Some("forged"), at(0));
        assert!(fresh);
        assert_ne!(id.as_str(), "forged");
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut store = SessionStore::new(Duration::minutes(30));
        let (a, _) = store.resolve(None, at(0));
        let (b, _) = store.resolve(None, at(0));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_idle_sessions_expire() {
        let mut store = SessionStore::new(Duration::minutes(30));
        let (a, _) = store.resolve(None, at(0));
        let (b, _) = store.resolve(None, at(0));
        // Touching `b` keeps it alive.
        store.resolve(Some(b.as_str()), at(20));
        let (a2, fresh) = store.resolve(Some(a.as_str()), at(45));
        assert!(fresh);
        assert_ne!(a, a2);
        assert!(store.get_mut(&b).is_some());
        assert!(store.get_mut(&a).is_none());
    }

    #[test]
    fn test_store_is_capped() {
        let mut store = SessionStore::with_capacity(Duration::minutes(30), 2);
        let (a, _) = store.resolve(None, at(0));
        let (b, _) = store.resolve(None, at(1));
        // A cookie-less flood cannot grow the store past its capacity.
        for minute in 2..10 {
            store.resolve(None, at(minute));
            assert_eq!(store.len(), 2);
        }
        assert!(store.get_mut(&a).is_none());
        assert!(store.get_mut(&b).is_none());
    }

    #[test]
    fn test_eviction_spares_active_sessions() {
        let mut store = SessionStore::with_capacity(Duration::minutes(30), 2);
        let (a, _) = store.resolve(None, at(0));
        let (b, _) = store.resolve(None, at(1));
        store.resolve(Some(a.as_str()), at(2));
        let (c, _) = store.resolve(None, at(3));
        assert!(store.get_mut(&a).is_some());
        assert!(store.get_mut(&b).is_none());
        assert!(store.get_mut(&c).is_some());
    }

    #[test]
    fn test_remove() {
        let mut store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.resolve(None, at(0));
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_session_cookie() {
        assert_eq!(
            session_cookie("theme=dark; dictation_session=abc123; x=y"),
            Some("abc123")
        );
        assert_eq!(session_cookie("dictation_session="), None);
        assert_eq!(session_cookie("other=1"), None);
    }
}
