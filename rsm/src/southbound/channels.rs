//! channels - per-(node, command-kind) control dispatch channels

use super::E2ControlRequest;
use crate::E2NodeId;
use crate::protocols::e2sm::RsmCommand;
use async_channel::{Receiver, Sender};
use dashmap::DashMap;
use std::sync::Arc;

/// Acknowledgment of one dispatched control message.  Exactly one is sent
/// per envelope.
#[derive(Debug, Clone)]
pub struct CtrlAck {
    pub success: bool,
    pub reason: Option<String>,
}

impl CtrlAck {
    pub fn ok() -> Self {
        CtrlAck {
            success: true,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        CtrlAck {
            success: false,
            reason: Some(reason.into()),
        }
    }
}

/// Envelope on a dispatch channel: the encoded control message and the
/// one-shot channel its ACK comes back on.
#[derive(Debug)]
pub struct CtrlMsg {
    pub request: E2ControlRequest,
    pub ack_ch: Sender<CtrlAck>,
}

/// Registry of control dispatch channels, one per (node, command kind).
/// Entries are created lazily when the session manager observes a node
/// advertising the corresponding capability, and closed when the node is
/// removed from topology.
///
/// Only the session manager's topology-watch task mutates the map; the
/// slice manager reads published senders lock-free.
#[derive(Clone, Default)]
pub struct CtrlChannelRegistry {
    channels: Arc<DashMap<(RsmCommand, E2NodeId), Sender<CtrlMsg>>>,
}

impl CtrlChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the channel for (kind, node) and hand back the receiving side
    /// for a new dispatch worker.  Returns `None` if the channel already
    /// exists.  Channels are rendezvous-depth so a slow worker back-pressures
    /// its producers.
    pub fn register(&self, kind: RsmCommand, node: &E2NodeId) -> Option<Receiver<CtrlMsg>> {
        let key = (kind, node.clone());
        if self.channels.contains_key(&key) {
            return None;
        }
        let (tx, rx) = async_channel::bounded(1);
        self.channels.insert(key, tx);
        Some(rx)
    }

    pub fn sender(&self, kind: RsmCommand, node: &E2NodeId) -> Option<Sender<CtrlMsg>> {
        self.channels
            .get(&(kind, node.clone()))
            .map(|entry| entry.value().clone())
    }

    pub fn is_registered(&self, kind: RsmCommand, node: &E2NodeId) -> bool {
        self.channels.contains_key(&(kind, node.clone()))
    }

    /// Close and drop every channel of a node, unblocking its workers.
    pub fn remove_node(&self, node: &E2NodeId) {
        self.channels.retain(|(_, entry_node), tx| {
            if entry_node == node {
                tx.close();
                false
            } else {
                true
            }
        });
    }

    /// Close all channels, terminating every dispatch worker.
    pub fn close_all(&self) {
        self.channels.retain(|_, tx| {
            tx.close();
            false
        });
    }
}
