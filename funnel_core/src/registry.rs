//! Registry of concurrent funnel sessions.
//!
//! Each session sits behind its own lock, so intents for one session are
//! applied one at a time while different sessions proceed independently.
//! The map lock is only held long enough to look a session up.

use crate::{Error, FunnelContent, FunnelSession, FunnelState, Intent, Result, StateObserver};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

type SessionHandle = Arc<Mutex<FunnelSession>>;

/// Sessions sharing one content bundle, keyed by session id
#[derive(Debug)]
pub struct SessionRegistry {
    content: Arc<FunnelContent>,
    sessions: Mutex<HashMap<Uuid, SessionHandle>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Recover from poisoning: a panicked observer leaves state intact
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionRegistry {
    pub fn new(content: Arc<FunnelContent>) -> Self {
        Self {
            content,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a new session and return its id
    pub fn open(&self) -> Uuid {
        let session = FunnelSession::new(Arc::clone(&self.content));
        let id = session.id();
        lock(&self.sessions).insert(id, Arc::new(Mutex::new(session)));
        tracing::info!("Opened session {}", id);
        id
    }

    fn handle(&self, id: Uuid) -> Result<SessionHandle> {
        lock(&self.sessions)
            .get(&id)
            .cloned()
            .ok_or(Error::UnknownSession(id))
    }

    /// Apply an intent to one session, returning a snapshot of its new state
    pub fn dispatch(&self, id: Uuid, intent: Intent) -> Result<FunnelState> {
        let handle = self.handle(id)?;
        let mut session = lock(&handle);
        let state = session.dispatch(intent)?.clone();
        Ok(state)
    }

    /// Snapshot of a session's current state
    pub fn state(&self, id: Uuid) -> Result<FunnelState> {
        let handle = self.handle(id)?;
        let session = lock(&handle);
        Ok(session.state().clone())
    }

    pub fn subscribe(&self, id: Uuid, observer: impl StateObserver + 'static) -> Result<()> {
        let handle = self.handle(id)?;
        lock(&handle).subscribe(observer);
        Ok(())
    }

    /// End a session, discarding its state
    pub fn close(&self, id: Uuid) -> Result<FunnelState> {
        let handle = lock(&self.sessions)
            .remove(&id)
            .ok_or(Error::UnknownSession(id))?;
        let state = lock(&handle).state().clone();
        tracing::info!("Closed session {} on {} screen", id, state.screen);
        Ok(state)
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
