//! Storage calls are bounded in time

mod support;

use std::time::Duration;

use common::prelude::*;

fn stalled_service() -> MessageService<MemoryKeyStore, support::StalledMessageStore> {
    MessageService::new(
        MemoryKeyStore::new(),
        support::StalledMessageStore {
            delay: Duration::from_secs(5),
        },
        ServiceLimits {
            storage_timeout: Duration::from_millis(50),
            ..ServiceLimits::default()
        },
    )
}

#[tokio::test]
async fn test_stalled_save_is_unavailable() {
    let service = stalled_service();
    let bob = service.register().await.unwrap();

    let err = service.send(None, bob, "hello").await.unwrap_err();
    assert!(matches!(err, MessageServiceError::StorageUnavailable));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_stalled_inbox_is_unavailable() {
    let service = stalled_service();
    let bob = service.register().await.unwrap();

    assert!(matches!(
        service.read_inbox(bob).await,
        Err(MessageServiceError::StorageUnavailable)
    ));
    assert!(matches!(
        service.delete(bob, MessageId::generate()).await,
        Err(MessageServiceError::StorageUnavailable)
    ));
}

#[tokio::test]
async fn test_other_errors_not_retryable() {
    let service = support::setup_service();
    let err = service
        .send(None, UserId::generate(), "hello")
        .await
        .unwrap_err();
    assert!(!err.is_retryable());
}
