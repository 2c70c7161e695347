//! Registration sessions held in memory, one per user
//!
//! Sessions are not persisted: a restart drops every dialogue in progress
//! and users simply run `/register` again.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::models::{RegistrationSession, RegistrationStep, UserRecord};

/// What [`SessionStore::begin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Begin {
    Opened,
    /// An unfinished session was discarded.
    Replaced,
    /// The existing session is being committed and was left alone.
    Submitting,
}

/// Exclusive owner of the `telegram_id -> session` map.
///
/// One lock guards the whole map. Reads take the read lock, every mutation
/// takes the write lock, so each operation is atomic with respect to the others.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, RegistrationSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session at the first step, replacing any unfinished one.
    ///
    /// A session whose commit is in flight (`Complete`) is never replaced.
    pub fn begin(&self, telegram_id: i64, initial: UserRecord) -> Begin {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions
            .get(&telegram_id)
            .is_some_and(|session| session.step == RegistrationStep::Complete)
        {
            return Begin::Submitting;
        }
        match sessions.insert(telegram_id, RegistrationSession::new(telegram_id, initial)) {
            Some(_) => Begin::Replaced,
            None => Begin::Opened,
        }
    }

    pub fn get(&self, telegram_id: i64) -> Option<RegistrationSession> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(&telegram_id).cloned()
    }

    /// Mutates a session in place under the write lock.
    ///
    /// Returns the session as left by `mutator`, or `None` if there is no session.
    pub fn advance<F>(&self, telegram_id: i64, mutator: F) -> Option<RegistrationSession>
    where
        F: FnOnce(&mut RegistrationSession),
    {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(&telegram_id)?;
        mutator(session);
        Some(session.clone())
    }

    pub fn end(&self, telegram_id: i64) -> Option<RegistrationSession> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(&telegram_id)
    }

    pub fn contains(&self, telegram_id: i64) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.contains_key(&telegram_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_begin_replaces_existing_session() {
        let store = SessionStore::new();
        assert_eq!(store.begin(1, UserRecord::applicant(1, None)), Begin::Opened);

        store.advance(1, |s| {
            s.record.first_name = "Ivan".to_string();
            s.step = RegistrationStep::LastName;
        });
        assert_eq!(store.begin(1, UserRecord::applicant(1, None)), Begin::Replaced);

        let session = store.get(1).unwrap();
        assert_eq!(session.step, RegistrationStep::FirstName);
        assert!(session.record.first_name.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_begin_leaves_submitting_session_alone() {
        let store = SessionStore::new();
        store.begin(1, UserRecord::applicant(1, None));
        store.advance(1, |s| {
            s.record.address = "GFC P11".to_string();
            s.step = RegistrationStep::Complete;
        });

        assert_eq!(store.begin(1, UserRecord::applicant(1, None)), Begin::Submitting);
        let session = store.get(1).unwrap();
        assert_eq!(session.step, RegistrationStep::Complete);
        assert_eq!(session.record.address, "GFC P11");
    }

    #[test]
    fn test_advance_without_session_is_none() {
        let store = SessionStore::new();
        assert!(store.advance(9, |s| s.step = RegistrationStep::Complete).is_none());
        assert!(!store.contains(9));
    }

    #[test]
    fn test_end_removes_session() {
        let store = SessionStore::new();
        store.begin(3, UserRecord::applicant(3, Some("nick")));
        let removed = store.end(3).unwrap();
        assert_eq!(removed.record.username, "nick");
        assert!(store.is_empty());
        assert!(store.end(3).is_none());
    }

    #[test]
    fn test_concurrent_sessions_do_not_interfere() {
        let store = Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|id| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.begin(id, UserRecord::applicant(id, None));
                    store.advance(id, |s| s.record.first_name = format!("user{}", id));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        for id in 0..8 {
            assert_eq!(store.get(id).unwrap().record.first_name, format!("user{}", id));
        }
    }
}
