//! End-to-end registration -> moderation -> search on the in-memory store
//!
//! Run with: cargo test -p forestcore --test workflow_test

mod common;

use common::Harness;
use forestcore::moderation::{approval_notice, DEFAULT_REJECT_REASON};
use forestcore::{
    search_directory, AppError, RecordStore, SearchOutcome, StartOutcome, StepOutcome, UserRole, UserStatus,
};
use pretty_assertions::assert_eq;

const IVAN: i64 = 1001;
const ANNA: i64 = 1002;

const IVAN_ANSWERS: [&str; 5] = ["Ivan", "Petrov", "+71234567890", "ivan@mail.com", "GFC P11"];
const ANNA_ANSWERS: [&str; 5] = ["Anna", "Smirnova", "+79001112233", "anna@mail.com", "GFP P4"];

#[tokio::test]
async fn test_ivan_registers_and_is_approved_as_neighbor() {
    let h = Harness::new();

    let outcome = h.register(IVAN, IVAN_ANSWERS).await.unwrap();
    let submitted = match outcome {
        StepOutcome::Submitted(record) => record,
        other => panic!("expected submission, got {:?}", other),
    };
    assert_eq!(submitted.first_name, "Ivan");
    assert_eq!(submitted.last_name, "Petrov");
    assert_eq!(submitted.phone, "+71234567890");
    assert_eq!(submitted.email, "ivan@mail.com");
    assert_eq!(submitted.address, "GFC P11");

    let stored = h.store.get(IVAN).await.unwrap();
    assert_eq!(stored.status, UserStatus::Pending);
    assert_eq!(stored.role, UserRole::Guest);
    assert!(stored.registered_at.is_some());

    let decision = h.moderator.approve(IVAN, "сосед").await.unwrap();
    assert!(decision.user_notified);

    let stored = h.store.get(IVAN).await.unwrap();
    assert_eq!(stored.status, UserStatus::Approved);
    assert_eq!(stored.role.label(), "сосед");
    assert_eq!(format!("{} ({})", stored.status, stored.role), "approved (сосед)");
    assert_eq!(h.notifier.sent_to(IVAN), vec![approval_notice(UserRole::Neighbor)]);
}

#[tokio::test]
async fn test_rejecting_unknown_id_notifies_nobody() {
    let h = Harness::new();

    let err = h.moderator.reject(999, "").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(999)));
    assert!(h.notifier.sent().is_empty());
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_blank_reject_reason_is_stored_as_placeholder() {
    let h = Harness::new();
    h.register(ANNA, ANNA_ANSWERS).await.unwrap();

    h.moderator.reject(ANNA, "").await.unwrap();

    let stored = h.store.get(ANNA).await.unwrap();
    assert_eq!(stored.status, UserStatus::Rejected);
    assert_eq!(stored.admin_comment, DEFAULT_REJECT_REASON);
    assert!(!stored.admin_comment.is_empty());
}

#[tokio::test]
async fn test_registered_user_gets_status_instead_of_session() {
    let h = Harness::new();
    h.register(ANNA, ANNA_ANSWERS).await.unwrap();

    for _ in 0..2 {
        match h.flow.start(ANNA, None).await.unwrap() {
            StartOutcome::AlreadyRegistered(record) => assert_eq!(record.status, UserStatus::Pending),
            other => panic!("expected AlreadyRegistered, got {:?}", other),
        }
    }
    assert!(h.flow.sessions().is_empty());
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn test_answers_are_positional() {
    let h = Harness::new();
    h.flow.start(IVAN, None).await.unwrap();

    // looks like an address, but the cursor is on the first name
    let outcome = h.flow.answer(IVAN, "GFC P11").await.unwrap();
    assert_eq!(outcome, StepOutcome::Prompt(forestcore::RegistrationStep::LastName));

    let session = h.flow.sessions().get(IVAN).unwrap();
    assert_eq!(session.record.first_name, "GFC P11");
    assert_eq!(session.record.address, "");
}

#[tokio::test]
async fn test_only_approved_residents_search_and_appear() {
    let h = Harness::new();
    h.register(IVAN, IVAN_ANSWERS).await.unwrap();
    h.register(ANNA, ANNA_ANSWERS).await.unwrap();

    // pending Anna may not search yet
    let outcome = search_directory(h.store.as_ref(), ANNA, "ivan").await.unwrap();
    assert_eq!(outcome, SearchOutcome::NotVerified);

    h.moderator.approve(IVAN, "житель").await.unwrap();

    // Anna is pending, so Ivan finds nobody by her name
    let outcome = search_directory(h.store.as_ref(), IVAN, "smirnova").await.unwrap();
    assert_eq!(outcome, SearchOutcome::NoMatches);

    h.moderator.approve(ANNA, "ОК").await.unwrap();
    match search_directory(h.store.as_ref(), IVAN, "GFP").await.unwrap() {
        SearchOutcome::Matches(found) => {
            let ids: Vec<i64> = found.iter().map(|r| r.telegram_id).collect();
            assert_eq!(ids, vec![ANNA]);
        }
        other => panic!("expected matches, got {:?}", other),
    }
}

#[tokio::test]
async fn test_second_moderation_is_refused() {
    let h = Harness::new();
    h.register(IVAN, IVAN_ANSWERS).await.unwrap();
    h.moderator.approve(IVAN, "ОК").await.unwrap();

    let err = h.moderator.reject(IVAN, "changed my mind").await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyModerated { .. }));
    assert_eq!(h.store.get(IVAN).await.unwrap().status, UserStatus::Approved);
    assert_eq!(h.notifier.sent_to(IVAN).len(), 1);
}
