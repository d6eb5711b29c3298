//! One bad record never hides the rest of an inbox

mod support;

use common::crypto::{Sealed, UserKey};
use common::prelude::*;

#[tokio::test]
async fn test_tampered_record_is_isolated() {
    let service = support::setup_service();
    let (bob, bob_key) = support::register_with_key(&service).await;

    let first = service.send(None, bob, "first").await.unwrap();

    let mut sealed = support::seal(b"tampered", &bob_key);
    sealed.ciphertext[0] ^= 0x01;
    let tampered = support::raw_message(None, bob, sealed);
    let tampered_id = tampered.id;
    service.message_store().insert_raw(tampered).unwrap();

    let last = service.send(None, bob, "last").await.unwrap();

    let inbox = service.read_inbox(bob).await.unwrap();
    let delivered: Vec<MessageId> = inbox.messages.iter().map(|m| m.message_id).collect();
    assert_eq!(delivered, vec![first, last]);
    assert_eq!(
        inbox.failures,
        vec![InboxFailure {
            message_id: tampered_id,
            kind: InboxFailureKind::DecryptionFailed,
        }]
    );
}

#[tokio::test]
async fn test_foreign_key_and_malformed_records() {
    let service = support::setup_service();
    let bob = service.register().await.unwrap();
    let other_key = UserKey::generate().unwrap();

    let wrong_key = support::raw_message(None, bob, support::seal(b"not yours", &other_key));
    let truncated = support::raw_message(
        None,
        bob,
        Sealed {
            ciphertext: vec![1, 2, 3],
            nonce: vec![0; 12],
        },
    );
    let bad_nonce = support::raw_message(
        None,
        bob,
        Sealed {
            ciphertext: vec![0; 32],
            nonce: vec![0; 7],
        },
    );

    let store = service.message_store();
    for record in [wrong_key, truncated, bad_nonce] {
        store.insert_raw(record).unwrap();
    }
    service.send(None, bob, "readable").await.unwrap();

    let inbox = service.read_inbox(bob).await.unwrap();
    assert_eq!(inbox.messages.len(), 1);
    assert_eq!(inbox.messages[0].content, "readable");
    assert_eq!(inbox.failures.len(), 3);
    assert!(inbox
        .failures
        .iter()
        .all(|f| f.kind == InboxFailureKind::DecryptionFailed));
}

#[tokio::test]
async fn test_non_utf8_plaintext_is_a_failure() {
    let service = support::setup_service();
    let (bob, bob_key) = support::register_with_key(&service).await;

    let record = support::raw_message(None, bob, support::seal(&[0xff, 0xfe, 0xfd], &bob_key));
    let record_id = record.id;
    service.message_store().insert_raw(record).unwrap();

    let inbox = service.read_inbox(bob).await.unwrap();
    assert!(inbox.messages.is_empty());
    assert_eq!(inbox.failures.len(), 1);
    assert_eq!(inbox.failures[0].message_id, record_id);
    assert_eq!(inbox.failures[0].kind, InboxFailureKind::DecryptionFailed);
}

#[tokio::test]
async fn test_misaddressed_record_is_never_opened() {
    let keys = MemoryKeyStore::new();
    let bob = UserId::generate();
    let carol = UserId::generate();
    keys.issue_key(bob).await.unwrap();
    let carol_key = keys.issue_key(carol).await.unwrap();

    // carol's message, sealed under carol's key, leaking into bob's query
    let leaked = support::raw_message(None, carol, support::seal(b"for carol", &carol_key));
    let leaked_id = leaked.id;
    let store = support::LeakyMessageStore {
        inner: MemoryMessageStore::new(),
        leaked: vec![leaked],
    };

    let service = MessageService::new(keys, store, ServiceLimits::default());
    service.send(None, bob, "for bob").await.unwrap();

    let inbox = service.read_inbox(bob).await.unwrap();
    assert_eq!(inbox.messages.len(), 1);
    assert_eq!(inbox.messages[0].content, "for bob");
    assert_eq!(
        inbox.failures,
        vec![InboxFailure {
            message_id: leaked_id,
            kind: InboxFailureKind::IntegrityWarning,
        }]
    );
}
