//! Full sessions over the in-memory network.

use proptest::prelude::*;
use tagwire_core::{Acknowledgment, ChannelError, PeerId, RoleError, SharedKey, TagAlgorithm};
use tagwire_session::{
    Alteration, CorruptionPlan, DEFAULT_MESSAGES, FrameKind, SessionConfig, SessionError,
    random_key, run_session,
};

fn zero_key() -> SharedKey {
    SharedKey::from_bytes([0u8; 32])
}

#[tokio::test]
async fn default_session_is_all_intact() {
    let report = run_session(SessionConfig::default(), random_key().unwrap()).await.unwrap();

    assert_eq!(report.acknowledgments.len(), 10);
    assert_eq!(report.intact_count(), 10);
    assert!(report.corrupted_indices().is_empty());
    assert!(report.is_consistent());

    for (delivery, text) in report.deliveries.iter().zip(DEFAULT_MESSAGES) {
        assert_eq!(delivery.message, text.as_bytes());
    }
}

#[tokio::test]
async fn corrupted_fifth_message_is_reported_and_session_continues() {
    let config =
        SessionConfig { corruption: CorruptionPlan::messages([4]), ..SessionConfig::default() };

    let report = run_session(config, zero_key()).await.unwrap();

    assert_eq!(report.acknowledgments.len(), 10);
    assert_eq!(report.acknowledgments[4], Acknowledgment::Corrupted);
    assert_eq!(report.corrupted_indices(), vec![4]);
    assert_eq!(report.intact_count(), 9);
    assert!(report.is_consistent());
}

#[tokio::test]
async fn corrupted_tag_is_reported() {
    let config = SessionConfig {
        corruption: CorruptionPlan::messages([0, 9]).on(FrameKind::Tag),
        ..SessionConfig::default()
    };

    let report = run_session(config, zero_key()).await.unwrap();

    assert_eq!(report.corrupted_indices(), vec![0, 9]);
    // Message bytes were untouched, only the tag was altered
    assert_eq!(report.deliveries[0].message, DEFAULT_MESSAGES[0].as_bytes());
}

#[tokio::test]
async fn truncated_tag_reports_receiver_failure() {
    let config = SessionConfig {
        corruption: CorruptionPlan::messages([2]).on(FrameKind::Tag).altering(Alteration::Truncate),
        ..SessionConfig::default()
    };

    let err = run_session(config, zero_key()).await.unwrap_err();

    // The sender only sees the receiver hang up; the receiver's error is reported
    match err {
        SessionError::Role { peer, source } => {
            assert_eq!(peer, PeerId::new("bob"));
            assert_eq!(
                source,
                RoleError::Channel(ChannelError::MalformedTag { expected: 32, actual: 31 })
            );
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn truncated_message_is_only_corrupted() {
    let config = SessionConfig {
        corruption: CorruptionPlan::messages([2]).altering(Alteration::Truncate),
        ..SessionConfig::default()
    };

    let report = run_session(config, zero_key()).await.unwrap();

    assert_eq!(report.corrupted_indices(), vec![2]);
    assert_eq!(report.acknowledgments.len(), 10);
}

#[tokio::test]
async fn custom_peers_and_messages() {
    let config = SessionConfig {
        sender: PeerId::new("carol"),
        receiver: PeerId::new("dave"),
        messages: vec![b"one".to_vec(), Vec::new(), b"three".to_vec()],
        ..SessionConfig::default()
    };

    let report = run_session(config, zero_key()).await.unwrap();

    assert_eq!(report.intact_count(), 3);
    assert_eq!(report.deliveries[1].message, Vec::<u8>::new());
}

#[tokio::test]
async fn empty_message_list_completes_immediately() {
    let config = SessionConfig { messages: Vec::new(), ..SessionConfig::default() };

    let report = run_session(config, zero_key()).await.unwrap();

    assert!(report.acknowledgments.is_empty());
    assert!(report.deliveries.is_empty());
}

#[tokio::test]
async fn duplicate_peer_names_are_rejected() {
    let config = SessionConfig { receiver: PeerId::new("alice"), ..SessionConfig::default() };

    let result = run_session(config, zero_key()).await;
    assert!(matches!(result, Err(SessionError::DuplicatePeer(peer)) if peer.as_str() == "alice"));
}

#[test]
fn unsupported_algorithm_fails_before_session() {
    let err = "HmacMD5".parse::<TagAlgorithm>().map_err(SessionError::from).unwrap_err();
    assert!(err.is_algorithm_error());
    assert!(!err.is_key_error());
}

#[test]
fn malformed_key_fails_before_session() {
    let err = SharedKey::from_hex("abcd").map_err(SessionError::from).unwrap_err();
    assert!(err.is_key_error());
    assert!(err.channel_error().is_none());
}

#[test]
fn closed_channel_is_visible_through_session_error() {
    let err = SessionError::Role {
        peer: PeerId::new("bob"),
        source: ChannelError::Closed { peer: PeerId::new("alice") }.into(),
    };
    assert_eq!(err.channel_error(), Some(&ChannelError::Closed { peer: PeerId::new("alice") }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_exactly_planned_messages_are_corrupted(
        key in any::<[u8; 32]>(),
        targets in prop::collection::btree_set(0usize..10, 0..5),
        on_tag in any::<bool>(),
        bit in 0usize..512,
    ) {
        let frame = if on_tag { FrameKind::Tag } else { FrameKind::Message };
        let corruption = CorruptionPlan::messages(targets.iter().copied())
            .on(frame)
            .altering(Alteration::FlipBit(bit));
        let config = SessionConfig { corruption, ..SessionConfig::default() };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let report = runtime.block_on(run_session(config, SharedKey::from_bytes(key))).unwrap();

        prop_assert_eq!(report.acknowledgments.len(), 10);
        prop_assert!(report.is_consistent());
        prop_assert_eq!(report.corrupted_indices(), targets.into_iter().collect::<Vec<_>>());
    }
}
