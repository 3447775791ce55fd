use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::session::TripSession;

/// Sessions untouched for this long are dropped.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct Entry {
    session: TripSession,
    touched: Instant,
}

/// In-memory sessions, gone when the process exits.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_stale(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.touched) >= self.ttl
    }

    /// A snapshot of the session; unknown or expired ids read as a fresh session.
    /// Reading a live session keeps it alive.
    pub fn get(&self, id: &Uuid) -> TripSession {
        let now = Instant::now();
        let mut sessions = self.sessions.write();

        match sessions.get_mut(id) {
            Some(entry) if !self.is_stale(entry, now) => {
                entry.touched = now;
                entry.session.clone()
            }
            Some(_) => {
                sessions.remove(id);
                TripSession::default()
            }
            None => TripSession::default(),
        }
    }

    /// Applies `apply` to the session, creating it if needed. Expired sessions are
    /// pruned first.
    pub fn update<F>(&self, id: Uuid, apply: F)
    where
        F: FnOnce(&mut TripSession),
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write();

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.touched) < self.ttl);
        let pruned = before - sessions.len();
        if pruned > 0 {
            log::debug!("Pruned {} expired session(s)", pruned);
        }

        let entry = sessions.entry(id).or_insert_with(|| Entry {
            session: TripSession::default(),
            touched: now,
        });
        entry.touched = now;
        apply(&mut entry.session);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
