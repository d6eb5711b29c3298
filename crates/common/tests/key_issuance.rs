//! Key issuance, including concurrent registration of one identity

mod support;

use common::prelude::*;

#[tokio::test]
async fn test_register_issues_key() {
    let service = support::setup_service();
    let user = service.register().await.unwrap();

    assert!(!user.is_nil());
    assert!(service.key_store().has_key(user).await.unwrap());
}

#[tokio::test]
async fn test_issue_key_twice_is_duplicate() {
    let service = support::setup_service();
    let user = UserId::generate();

    service.issue_key(user).await.unwrap();
    let before = service.key_store().get_key(user).await.unwrap();

    assert!(matches!(
        service.issue_key(user).await,
        Err(MessageServiceError::DuplicateKey(id)) if id == user
    ));

    let after = service.key_store().get_key(user).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_issue_key_rejects_nil() {
    let service = support::setup_service();

    assert!(matches!(
        service.issue_key(UserId::nil()).await,
        Err(MessageServiceError::Validation(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issue_single_winner() {
    let service = support::setup_service();
    let user = UserId::generate();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.issue_key(user).await })
        })
        .collect();

    let results = futures::future::join_all(tasks).await;

    let mut issued = 0;
    let mut duplicates = 0;
    for result in results {
        match result.unwrap() {
            Ok(()) => issued += 1,
            Err(MessageServiceError::DuplicateKey(id)) => {
                assert_eq!(id, user);
                duplicates += 1;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(issued, 1);
    assert_eq!(duplicates, 15);

    // the winning key is the one messages get sealed under
    service.send(None, user, "after the race").await.unwrap();
    let inbox = service.read_inbox(user).await.unwrap();
    assert_eq!(inbox.messages[0].content, "after the race");
}
