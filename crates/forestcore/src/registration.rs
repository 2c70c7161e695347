//! Step-by-step registration dialogue
//!
//! Each user walks `FirstName -> LastName -> Phone -> Email -> Address`. The
//! answer to the address step commits the application to the record store as
//! a `pending` record with the `guest` role; until then nothing is written.

use std::sync::Arc;

use crate::core::error::AppResult;
use crate::models::{RegistrationStep, UserRecord};
use crate::session::{Begin, SessionStore};
use crate::store::RecordStore;

/// Result of `/register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// New session opened at the first step.
    Started,
    /// A session was already open; its answers were discarded and the dialogue starts over.
    Restarted,
    /// The previous application is being saved right now; nothing changed.
    Submitting,
    /// The user already has a record; no session was opened.
    AlreadyRegistered(UserRecord),
}

/// Result of feeding one free-text answer into the dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    NoSession,
    /// Answer stored; ask the question for this step next.
    Prompt(RegistrationStep),
    /// Record committed, session closed.
    Submitted(UserRecord),
    /// Commit already in flight for this user; the answer was dropped.
    Ignored,
}

enum Transition {
    Moved(RegistrationStep),
    Commit(UserRecord),
    Ignored,
}

pub struct RegistrationFlow {
    store: Arc<dyn RecordStore>,
    sessions: Arc<SessionStore>,
}

impl RegistrationFlow {
    pub fn new(store: Arc<dyn RecordStore>, sessions: Arc<SessionStore>) -> Self {
        Self { store, sessions }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Opens a registration session unless the user is already in the store.
    ///
    /// A store failure other than "not found" is returned as is and no
    /// session is opened.
    pub async fn start(&self, telegram_id: i64, username: Option<&str>) -> AppResult<StartOutcome> {
        match self.store.get(telegram_id).await {
            Ok(record) => {
                log::info!("User {} tried to register again (status: {})", telegram_id, record.status);
                return Ok(StartOutcome::AlreadyRegistered(record));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        match self
            .sessions
            .begin(telegram_id, UserRecord::applicant(telegram_id, username))
        {
            Begin::Opened => {
                log::info!("Registration started for user {}", telegram_id);
                Ok(StartOutcome::Started)
            }
            Begin::Replaced => {
                log::info!("Registration restarted for user {}", telegram_id);
                Ok(StartOutcome::Restarted)
            }
            Begin::Submitting => {
                log::debug!("User {} sent /register while the application is being saved", telegram_id);
                Ok(StartOutcome::Submitting)
            }
        }
    }

    /// Stores `text` as the answer to the current step.
    ///
    /// Answers are kept verbatim. On a failed commit the session goes back
    /// to the address step with all earlier answers intact and the error is
    /// returned, so the user can resend the address.
    pub async fn answer(&self, telegram_id: i64, text: &str) -> AppResult<StepOutcome> {
        let mut transition = Transition::Ignored;
        let touched = self.sessions.advance(telegram_id, |session| {
            transition = match session.step {
                RegistrationStep::Complete => Transition::Ignored,
                RegistrationStep::Address => {
                    session.step.apply(&mut session.record, text);
                    session.step = RegistrationStep::Complete;
                    session.record.registered_at = Some(chrono::Local::now().naive_local());
                    Transition::Commit(session.record.clone())
                }
                step => {
                    step.apply(&mut session.record, text);
                    match step.next() {
                        Some(next) => {
                            session.step = next;
                            Transition::Moved(next)
                        }
                        None => Transition::Ignored,
                    }
                }
            };
        });

        if touched.is_none() {
            return Ok(StepOutcome::NoSession);
        }

        match transition {
            Transition::Ignored => {
                log::debug!("Dropped answer from user {}: registration is being submitted", telegram_id);
                Ok(StepOutcome::Ignored)
            }
            Transition::Moved(step) => Ok(StepOutcome::Prompt(step)),
            Transition::Commit(record) => self.commit(record).await,
        }
    }

    async fn commit(&self, record: UserRecord) -> AppResult<StepOutcome> {
        let telegram_id = record.telegram_id;
        match self.store.append(&record).await {
            Ok(()) => {
                self.sessions.end(telegram_id);
                log::info!("Registration submitted for user {} ({})", telegram_id, record.full_name());
                Ok(StepOutcome::Submitted(record))
            }
            Err(e) => {
                log::error!("Failed to save registration for user {}: {}", telegram_id, e);
                self.sessions.advance(telegram_id, |session| {
                    if session.step == RegistrationStep::Complete {
                        session.step = RegistrationStep::Address;
                        session.record.registered_at = None;
                    }
                });
                Err(e)
            }
        }
    }
}
