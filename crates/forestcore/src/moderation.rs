//! Approve / reject decisions on pending applications
//!
//! Both the `/approve` `/reject` commands and the inline buttons on the
//! moderation card end up here. A decision is written to the record store
//! first; the applicant is notified only after the write succeeded.
//!
//! The pending check and the write are two separate store calls with nothing
//! in between holding a lock, so two simultaneous decisions on the same
//! application can both pass the check and the later write wins. With a single
//! administrator this is an accepted gap.

use std::sync::Arc;

use crate::core::error::{AppError, AppResult};
use crate::models::{UserRole, UserStatus};
use crate::notify::Notifier;
use crate::store::RecordStore;

/// Stored when `/reject` comes without a reason
pub const DEFAULT_REJECT_REASON: &str = "Не указана";

/// Stored when the reject button on a moderation card is used
pub const BUTTON_REJECT_REASON: &str = "Отклонено администратором";

pub const INVALID_ROLE: &str = "❌ Недопустимая роль. Используйте: житель, сосед, ОК";

/// Outcome of a successful moderation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub telegram_id: i64,
    pub status: UserStatus,
    pub role: UserRole,
    pub comment: String,
    /// False when the store was updated but the applicant could not be reached
    pub user_notified: bool,
}

/// Parses an admin-typed role and checks that it may be granted.
pub fn parse_assignable_role(token: &str) -> AppResult<UserRole> {
    token
        .parse::<UserRole>()
        .ok()
        .filter(|role| role.is_assignable())
        .ok_or_else(|| AppError::Validation(INVALID_ROLE.to_string()))
}

/// Message sent to an applicant after approval
pub fn approval_notice(role: UserRole) -> String {
    format!("🎉 Ваша заявка одобрена!\nВаша роль: {}", role)
}

/// Message sent to an applicant after rejection
pub fn rejection_notice(reason: &str) -> String {
    format!("❌ Ваша заявка отклонена.\nПричина: {}", reason)
}

pub struct Moderator {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl Moderator {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Approves a pending application with the given role.
    ///
    /// The role is validated before the store is touched.
    pub async fn approve(&self, telegram_id: i64, role_token: &str) -> AppResult<Decision> {
        let role = parse_assignable_role(role_token)?;
        self.ensure_pending(telegram_id).await?;

        self.store
            .update_status(telegram_id, UserStatus::Approved, role, "")
            .await?;
        log::info!("✅ User {} approved with role {}", telegram_id, role);

        let user_notified = self.notify_applicant(telegram_id, &approval_notice(role)).await;
        Ok(Decision {
            telegram_id,
            status: UserStatus::Approved,
            role,
            comment: String::new(),
            user_notified,
        })
    }

    /// Rejects a pending application. A blank reason becomes [`DEFAULT_REJECT_REASON`].
    pub async fn reject(&self, telegram_id: i64, reason: &str) -> AppResult<Decision> {
        let reason = match reason.trim() {
            "" => DEFAULT_REJECT_REASON,
            trimmed => trimmed,
        };
        self.ensure_pending(telegram_id).await?;

        self.store
            .update_status(telegram_id, UserStatus::Rejected, UserRole::Guest, reason)
            .await?;
        log::info!("❌ User {} rejected: {}", telegram_id, reason);

        let user_notified = self.notify_applicant(telegram_id, &rejection_notice(reason)).await;
        Ok(Decision {
            telegram_id,
            status: UserStatus::Rejected,
            role: UserRole::Guest,
            comment: reason.to_string(),
            user_notified,
        })
    }

    async fn ensure_pending(&self, telegram_id: i64) -> AppResult<()> {
        let record = self.store.get(telegram_id).await?;
        if record.status.is_terminal() {
            return Err(AppError::AlreadyModerated {
                id: telegram_id,
                status: record.status,
            });
        }
        Ok(())
    }

    async fn notify_applicant(&self, telegram_id: i64, text: &str) -> bool {
        match self.notifier.notify(telegram_id, text).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Decision for user {} saved, but notification failed: {}", telegram_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRecord;
    use crate::store::MemoryRecordStore;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<(i64, String)>>,
        broken: bool,
    }

    #[async_trait]
    impl Notifier for Outbox {
        async fn notify(&self, chat_id: i64, text: &str) -> AppResult<()> {
            if self.broken {
                return Err(AppError::Store("chat unreachable".to_string()));
            }
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }
    }

    fn setup(records: Vec<UserRecord>) -> (Arc<MemoryRecordStore>, Arc<Outbox>, Moderator) {
        let store = Arc::new(MemoryRecordStore::with_records(records));
        let outbox = Arc::new(Outbox::default());
        let moderator = Moderator::new(store.clone(), outbox.clone());
        (store, outbox, moderator)
    }

    #[tokio::test]
    async fn test_approve_updates_store_and_notifies() {
        let (store, outbox, moderator) = setup(vec![UserRecord::applicant(42, None)]);

        let decision = moderator.approve(42, "Сосед").await.unwrap();
        assert_eq!(decision.role, UserRole::Neighbor);
        assert!(decision.user_notified);

        let record = store.get(42).await.unwrap();
        assert_eq!(record.status, UserStatus::Approved);
        assert_eq!(record.role, UserRole::Neighbor);
        assert_eq!(
            outbox.sent.lock().unwrap().clone(),
            vec![(42, "🎉 Ваша заявка одобрена!\nВаша роль: сосед".to_string())]
        );
    }

    #[tokio::test]
    async fn test_invalid_role_never_reaches_store() {
        let (store, outbox, moderator) = setup(vec![UserRecord::applicant(42, None)]);
        // a failing store proves no call is made
        store.fail_with("must not be called");

        for token in ["гость", "admin", ""] {
            let err = moderator.approve(42, token).await.unwrap_err();
            assert_eq!(err.to_string(), INVALID_ROLE);
        }
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_user_is_not_notified() {
        let (_, outbox, moderator) = setup(vec![]);
        assert!(matches!(moderator.approve(999, "ОК").await, Err(AppError::NotFound(999))));
        assert!(matches!(moderator.reject(999, "spam").await, Err(AppError::NotFound(999))));
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_reason_uses_placeholder() {
        let (store, outbox, moderator) = setup(vec![UserRecord::applicant(7, None)]);
        let decision = moderator.reject(7, "   ").await.unwrap();
        assert_eq!(decision.comment, DEFAULT_REJECT_REASON);

        let record = store.get(7).await.unwrap();
        assert_eq!(record.status, UserStatus::Rejected);
        assert_eq!(record.role, UserRole::Guest);
        assert_eq!(record.admin_comment, "Не указана");
        assert_eq!(outbox.sent.lock().unwrap()[0].1, rejection_notice("Не указана"));
    }

    #[tokio::test]
    async fn test_decided_application_cannot_be_moderated_again() {
        let (store, outbox, moderator) = setup(vec![UserRecord::applicant(7, None)]);
        moderator.reject(7, BUTTON_REJECT_REASON).await.unwrap();

        let err = moderator.approve(7, "житель").await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyModerated { id: 7, status: UserStatus::Rejected }));
        assert_eq!(store.get(7).await.unwrap().role, UserRole::Guest);
        assert_eq!(outbox.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_decision() {
        let store = Arc::new(MemoryRecordStore::with_records(vec![UserRecord::applicant(3, None)]));
        let outbox = Arc::new(Outbox {
            broken: true,
            ..Outbox::default()
        });
        let moderator = Moderator::new(store.clone(), outbox);

        let decision = moderator.approve(3, "житель").await.unwrap();
        assert!(!decision.user_notified);
        assert!(store.get(3).await.unwrap().is_approved());
    }
}
