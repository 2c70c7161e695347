//! Shared helpers for forestcore integration tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use forestcore::{AppResult, MemoryRecordStore, Moderator, Notifier, RegistrationFlow, SessionStore};

/// Notifier that keeps every message instead of sending it
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Registration flow and moderator wired to one in-memory store
pub struct Harness {
    pub store: Arc<MemoryRecordStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub flow: RegistrationFlow,
    pub moderator: Moderator,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryRecordStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let flow = RegistrationFlow::new(store.clone(), Arc::new(SessionStore::new()));
        let moderator = Moderator::new(store.clone(), notifier.clone());
        Self {
            store,
            notifier,
            flow,
            moderator,
        }
    }

    /// Walks a user through all five steps.
    #[allow(dead_code)]
    pub async fn register(&self, telegram_id: i64, answers: [&str; 5]) -> AppResult<forestcore::StepOutcome> {
        self.flow.start(telegram_id, Some("tester")).await?;
        let mut outcome = forestcore::StepOutcome::NoSession;
        for answer in answers {
            outcome = self.flow.answer(telegram_id, answer).await?;
        }
        Ok(outcome)
    }
}
