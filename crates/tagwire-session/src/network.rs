//! In-memory network of named peers.
//!
//! Each connected pair gets two tokio unbounded queues, one per direction,
//! which gives exactly the ordering the roles rely on: FIFO per directed
//! edge, non-blocking send, suspending receive.

use std::{
    collections::{HashMap, hash_map::Entry},
    future::Future,
};

use tagwire_core::{Channel, ChannelError, PeerId};
use tokio::sync::mpsc;

use crate::error::SessionError;

/// Registry of peers and the links between them.
///
/// Peers are registered with [`Network::add`], wired with
/// [`Network::connect`], then handed to their role with [`Network::take`].
#[derive(Debug, Default)]
pub struct Network {
    links: HashMap<PeerId, Link>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer.
    pub fn add(&mut self, peer: PeerId) -> Result<(), SessionError> {
        match self.links.entry(peer) {
            Entry::Occupied(entry) => Err(SessionError::DuplicatePeer(entry.key().clone())),
            Entry::Vacant(entry) => {
                let link = Link::new(entry.key().clone());
                entry.insert(link);
                Ok(())
            },
        }
    }

    /// Connect two registered peers in both directions.
    pub fn connect(&mut self, a: &PeerId, b: &PeerId) -> Result<(), SessionError> {
        for peer in [a, b] {
            if !self.links.contains_key(peer) {
                return Err(SessionError::UnknownPeer(peer.clone()));
            }
        }

        let (a_to_b, b_from_a) = mpsc::unbounded_channel();
        let (b_to_a, a_from_b) = mpsc::unbounded_channel();

        if let Some(link) = self.links.get_mut(a) {
            link.outbound.insert(b.clone(), a_to_b);
            link.inbound.insert(b.clone(), a_from_b);
        }
        if let Some(link) = self.links.get_mut(b) {
            link.outbound.insert(a.clone(), b_to_a);
            link.inbound.insert(a.clone(), b_from_a);
        }

        tracing::debug!(%a, %b, "peers connected");
        Ok(())
    }

    /// Remove a peer's endpoint from the registry so a role can own it.
    pub fn take(&mut self, peer: &PeerId) -> Result<Link, SessionError> {
        self.links.remove(peer).ok_or_else(|| SessionError::UnknownPeer(peer.clone()))
    }
}

/// One peer's endpoint on the [`Network`].
#[derive(Debug)]
pub struct Link {
    id: PeerId,
    outbound: HashMap<PeerId, mpsc::UnboundedSender<Vec<u8>>>,
    inbound: HashMap<PeerId, mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl Link {
    fn new(id: PeerId) -> Self {
        Self { id, outbound: HashMap::new(), inbound: HashMap::new() }
    }

    /// Peers this endpoint can reach.
    pub fn peers(&self) -> impl Iterator<Item = &PeerId> {
        self.outbound.keys()
    }
}

impl Channel for Link {
    fn local_id(&self) -> &PeerId {
        &self.id
    }

    fn send(&mut self, peer: &PeerId, bytes: Vec<u8>) -> Result<(), ChannelError> {
        let Some(tx) = self.outbound.get(peer) else {
            return Err(ChannelError::UnknownPeer { peer: peer.clone() });
        };
        tx.send(bytes).map_err(|_| ChannelError::Closed { peer: peer.clone() })
    }

    fn receive(
        &mut self,
        peer: &PeerId,
    ) -> impl Future<Output = Result<Vec<u8>, ChannelError>> + Send {
        let peer = peer.clone();
        async move {
            let Some(rx) = self.inbound.get_mut(&peer) else {
                return Err(ChannelError::UnknownPeer { peer });
            };
            rx.recv().await.ok_or(ChannelError::Closed { peer })
        }
    }
}
