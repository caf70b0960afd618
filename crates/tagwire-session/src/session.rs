//! Session orchestration.
//!
//! Builds a two-peer [`Network`], hands each endpoint to its role, runs both
//! roles as concurrent tokio tasks and waits for both to reach their
//! terminal state.

use tagwire_core::{
    Acknowledgment, Delivery, PeerId, Receiver, ReceiverReport, Role, RoleError, Sender,
    SenderReport, SharedKey, TagAlgorithm,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    error::SessionError,
    network::Network,
    tamper::{CorruptionPlan, TamperingChannel},
};

/// Messages exchanged when no other list is configured.
pub const DEFAULT_MESSAGES: [&str; 10] = [
    "Hello Bob, this is message 1 from Alice.",
    "I hope you're doing well. Here's message 2.",
    "The weather is nice today. Message 3.",
    "Remember our meeting tomorrow. Message 4.",
    "I'm looking forward to seeing you. Message 5.",
    "Don't forget to bring the documents. Message 6.",
    "Let's have lunch next week. Message 7.",
    "I've finished the project. Message 8.",
    "Can you review my work? Message 9.",
    "This is the last message, number 10. Bye!",
];

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the sending peer
    pub sender: PeerId,
    /// Name of the receiving peer
    pub receiver: PeerId,
    /// Messages to send, in order
    pub messages: Vec<Vec<u8>>,
    /// Keyed-hash primitive used by both peers
    pub algorithm: TagAlgorithm,
    /// In-flight corruption applied to the sender's outbound frames
    pub corruption: CorruptionPlan,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sender: PeerId::new("alice"),
            receiver: PeerId::new("bob"),
            messages: DEFAULT_MESSAGES.iter().map(|m| m.as_bytes().to_vec()).collect(),
            algorithm: TagAlgorithm::default(),
            corruption: CorruptionPlan::none(),
        }
    }
}

/// What both peers observed during a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Acknowledgments seen by the sender, in send order
    pub acknowledgments: Vec<Acknowledgment>,
    /// Messages seen by the receiver, in arrival order
    pub deliveries: Vec<Delivery>,
}

impl SessionReport {
    /// Number of messages reported intact.
    pub fn intact_count(&self) -> usize {
        self.acknowledgments.iter().filter(|ack| ack.is_intact()).count()
    }

    /// Zero-based indices of messages reported corrupted.
    pub fn corrupted_indices(&self) -> Vec<usize> {
        self.acknowledgments
            .iter()
            .enumerate()
            .filter(|(_, ack)| !ack.is_intact())
            .map(|(index, _)| index)
            .collect()
    }

    /// Both sides agree on every outcome, one per message.
    pub fn is_consistent(&self) -> bool {
        self.acknowledgments.len() == self.deliveries.len()
            && self
                .acknowledgments
                .iter()
                .zip(&self.deliveries)
                .all(|(ack, delivery)| *ack == delivery.acknowledgment)
    }
}

/// Run one exchange of `config.messages` under `key`.
///
/// Returns once both roles are done. A corrupted message is reported in the
/// [`SessionReport`]; only key, algorithm, or channel failures are errors.
pub async fn run_session(
    config: SessionConfig,
    key: SharedKey,
) -> Result<SessionReport, SessionError> {
    let SessionConfig { sender, receiver, messages, algorithm, corruption } = config;

    let mut network = Network::new();
    network.add(sender.clone())?;
    network.add(receiver.clone())?;
    network.connect(&sender, &receiver)?;

    let mut sender_link = TamperingChannel::new(network.take(&sender)?, corruption);
    let mut receiver_link = network.take(&receiver)?;

    let expected = messages.len();
    info!(%sender, %receiver, %algorithm, messages = expected, "starting session");

    let sender_role =
        Sender::new(receiver.clone(), key.clone(), messages).with_algorithm(algorithm);
    let receiver_role = Receiver::new(sender.clone(), key, expected).with_algorithm(algorithm);

    let sender_task: JoinHandle<Result<SenderReport, RoleError>> =
        tokio::spawn(async move { sender_role.run(&mut sender_link).await });
    let receiver_task: JoinHandle<Result<ReceiverReport, RoleError>> =
        tokio::spawn(async move { receiver_role.run(&mut receiver_link).await });

    let (sent, received) = tokio::join!(sender_task, receiver_task);
    let sent = flatten(&sender, sent);
    let received = flatten(&receiver, received);

    match (sent, received) {
        (Ok(sent), Ok(received)) => {
            let report = SessionReport {
                acknowledgments: sent.acknowledgments,
                deliveries: received.deliveries,
            };
            debug!(intact = report.intact_count(), "session complete");
            Ok(report)
        },
        (Err(sender_err), Err(receiver_err)) => Err(root_cause(sender_err, receiver_err)),
        (Err(err), Ok(_)) | (Ok(_), Err(err)) => Err(err),
    }
}

/// Pick the error worth reporting when both roles failed.
///
/// A role that fails drops its link, so the other role usually fails with
/// `Closed` as a consequence. The sender's error wins unless it is only that
/// echo.
fn root_cause(sender_err: SessionError, receiver_err: SessionError) -> SessionError {
    if sender_err.is_peer_closed() { receiver_err } else { sender_err }
}

fn flatten<T>(
    peer: &PeerId,
    joined: Result<Result<T, RoleError>, tokio::task::JoinError>,
) -> Result<T, SessionError> {
    joined
        .map_err(|e| SessionError::Task { peer: peer.clone(), reason: e.to_string() })?
        .map_err(|source| SessionError::Role { peer: peer.clone(), source })
}

/// Fresh random key from the OS RNG.
pub fn random_key() -> Result<SharedKey, SessionError> {
    let mut bytes = [0u8; tagwire_crypto::KEY_SIZE];
    getrandom::fill(&mut bytes).map_err(|e| SessionError::KeyGeneration(e.to_string()))?;
    Ok(SharedKey::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use tagwire_core::ChannelError;

    use super::*;

    fn role_failure(peer: &str, err: ChannelError) -> SessionError {
        SessionError::Role { peer: PeerId::new(peer), source: RoleError::Channel(err) }
    }

    fn closed(peer: &str) -> ChannelError {
        ChannelError::Closed { peer: PeerId::new(peer) }
    }

    #[test]
    fn receiver_failure_wins_over_sender_closed() {
        let malformed = ChannelError::MalformedTag { expected: 32, actual: 31 };
        let sender_err = role_failure("alice", closed("bob"));
        let err = root_cause(sender_err, role_failure("bob", malformed.clone()));

        assert!(matches!(&err, SessionError::Role { peer, .. } if peer.as_str() == "bob"));
        assert_eq!(err.channel_error(), Some(&malformed));
    }

    #[test]
    fn sender_failure_wins_over_receiver_closed() {
        let malformed = ChannelError::MalformedAck { len: 2 };
        let receiver_err = role_failure("bob", closed("alice"));
        let err = root_cause(role_failure("alice", malformed.clone()), receiver_err);

        assert!(matches!(&err, SessionError::Role { peer, .. } if peer.as_str() == "alice"));
        assert_eq!(err.channel_error(), Some(&malformed));
    }

    #[test]
    fn sender_error_is_kept_when_neither_is_closed() {
        let err = root_cause(
            SessionError::Task { peer: PeerId::new("alice"), reason: "panicked".to_string() },
            role_failure("bob", ChannelError::MalformedAck { len: 0 }),
        );
        assert!(matches!(err, SessionError::Task { .. }));
    }

    #[test]
    fn default_config_has_ten_messages() {
        let config = SessionConfig::default();
        assert_eq!(config.messages.len(), 10);
        assert_eq!(config.sender.as_str(), "alice");
        assert_eq!(config.receiver.as_str(), "bob");
        assert!(config.corruption.is_empty());
    }

    #[test]
    fn random_keys_differ() {
        let a = random_key().unwrap();
        let b = random_key().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes(), "random keys should differ");
    }

    #[test]
    fn report_consistency() {
        let report = SessionReport {
            acknowledgments: vec![Acknowledgment::Intact, Acknowledgment::Corrupted],
            deliveries: vec![
                Delivery { index: 0, acknowledgment: Acknowledgment::Intact, message: vec![] },
                Delivery { index: 1, acknowledgment: Acknowledgment::Corrupted, message: vec![] },
            ],
        };
        assert!(report.is_consistent());
        assert_eq!(report.intact_count(), 1);
        assert_eq!(report.corrupted_indices(), vec![1]);
    }

    #[tokio::test]
    async fn same_peer_twice_is_rejected() {
        let config = SessionConfig { receiver: PeerId::new("alice"), ..SessionConfig::default() };
        let result = run_session(config, SharedKey::from_bytes([0u8; 32])).await;
        assert!(matches!(result, Err(SessionError::DuplicatePeer(_))));
    }
}
