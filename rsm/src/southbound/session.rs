//! session - E2 node session management driven by topology events

use super::{CtrlAck, CtrlChannelRegistry, CtrlMsg, E2Client, SubscriptionAction, SubscriptionSpec};
use crate::broker::StreamBroker;
use crate::errors::Result;
use crate::monitoring::Monitor;
use crate::nib::{SlicingConfigType, TopoClient, TopoEvent, TopoEventKind, UeNibClient};
use crate::protocols::e2sm::{self, RSM_RAN_FUNCTION_OID, RsmCommand, TriggerKind};
use crate::E2NodeId;
use async_channel::Receiver;
use async_std::task;
use slog::{Logger, debug, info, o, warn};

/// Watches the topology for E2 nodes advertising the RSM RAN function and
/// maintains their session machinery: one subscription reader plus one
/// indication monitor per event-trigger capability, and one dispatch worker
/// per advertised command capability.
#[derive(Clone)]
pub struct E2SessionManager<T: TopoClient, U: UeNibClient, E: E2Client> {
    e2: E,
    rnib: T,
    uenib: U,
    registry: CtrlChannelRegistry,
    broker: StreamBroker,
    logger: Logger,
}

impl<T: TopoClient, U: UeNibClient, E: E2Client> E2SessionManager<T, U, E> {
    pub fn new(
        e2: E,
        rnib: T,
        uenib: U,
        registry: CtrlChannelRegistry,
        broker: StreamBroker,
        logger: Logger,
    ) -> Self {
        E2SessionManager {
            e2,
            rnib,
            uenib,
            registry,
            broker,
            logger,
        }
    }

    /// Open the controls-relation watch and hand it to a background task.
    pub async fn start(&self) -> Result<()> {
        info!(&self.logger, "Start E2 session manager");
        let (tx, rx) = async_channel::unbounded();
        self.rnib.watch_controls_relations(tx).await?;
        let manager = self.clone();
        task::spawn(async move { manager.watch_topology(rx).await });
        Ok(())
    }

    async fn watch_topology(&self, events: Receiver<TopoEvent>) {
        while let Ok(event) = events.recv().await {
            match event.kind {
                TopoEventKind::Added | TopoEventKind::None => {
                    if let Err(e) = self.handle_node_added(&event.node).await {
                        warn!(
                            &self.logger,
                            "Failed to set up E2 node {} - {e}", event.node
                        );
                    }
                }
                TopoEventKind::Removed => self.handle_node_removed(&event.node).await,
            }
        }
    }

    async fn handle_node_added(&self, node: &E2NodeId) -> Result<()> {
        if !self.rnib.has_rsm_ran_function(node, RSM_RAN_FUNCTION_OID).await {
            debug!(
                &self.logger,
                "E2 node {node} does not advertise the RSM RAN function, ignoring"
            );
            return Ok(());
        }

        let configs = self.rnib.supported_slicing_config_types(node).await?;
        debug!(&self.logger, "E2 node {node} supports {configs:?}");

        for config in configs {
            match config {
                SlicingConfigType::EventTriggers => {
                    let manager = self.clone();
                    let node = node.clone();
                    task::spawn(async move {
                        if let Err(e) = manager.subscribe(&node, TriggerKind::UponEmmEvent).await {
                            warn!(&manager.logger, "Failed to subscribe to {node} - {e}");
                        }
                    });
                }
                SlicingConfigType::SliceCreate => self.start_dispatch_worker(RsmCommand::SliceCreate, node),
                SlicingConfigType::SliceUpdate => self.start_dispatch_worker(RsmCommand::SliceUpdate, node),
                SlicingConfigType::SliceDelete => self.start_dispatch_worker(RsmCommand::SliceDelete, node),
                SlicingConfigType::UeAssociate => self.start_dispatch_worker(RsmCommand::UeAssociate, node),
            }
        }
        Ok(())
    }

    /// Allocate the dispatch channel for (node, kind) and spawn its worker.
    fn start_dispatch_worker(&self, kind: RsmCommand, node: &E2NodeId) {
        let Some(rx) = self.registry.register(kind, node) else {
            // Channel already exists; the running worker keeps it.
            return;
        };
        let e2 = self.e2.clone();
        let node = node.clone();
        let logger = self
            .logger
            .new(o!("node" => node.to_string(), "command" => format!("{kind:?}")));
        task::spawn(async move { dispatch_worker(e2, node, rx, logger).await });
    }

    /// Open the EMM-event subscription for a node and start an indication
    /// monitor over its stream.
    async fn subscribe(&self, node: &E2NodeId, trigger: TriggerKind) -> Result<()> {
        info!(&self.logger, "Creating subscription for E2 node {node}");
        let event_trigger = e2sm::build::event_trigger(trigger)?;
        let spec = SubscriptionSpec {
            event_trigger,
            actions: vec![SubscriptionAction::report()],
        };

        let name = format!("rsm-subscription-{}", trigger.name());
        let (tx, rx) = async_channel::bounded(1);
        self.e2.subscribe(node, &name, spec, tx).await?;

        let reader = self.broker.open_reader(&name, rx);
        Monitor::new(
            node.clone(),
            reader,
            self.rnib.clone(),
            self.uenib.clone(),
            self.logger.new(o!("monitor" => node.to_string())),
        )
        .spawn();
        Ok(())
    }

    /// A node left the topology: close its dispatch channels, drop the slice
    /// list of the DU it implies, and purge its UE records.
    async fn handle_node_removed(&self, node: &E2NodeId) {
        info!(&self.logger, "E2 node {node} removed");
        self.registry.remove_node(node);

        let du = if node.is_du() {
            Some(node.clone())
        } else {
            match self.rnib.target_du(node).await {
                Ok(du) => Some(du),
                Err(e) => {
                    warn!(&self.logger, "No DU paired to removed node {node} - {e}");
                    None
                }
            }
        };
        if let Some(du) = du {
            if let Err(e) = self.rnib.delete_slice_list(&du).await {
                warn!(&self.logger, "Failed to delete slice list of {du} - {e}");
            }
        }
        if let Err(e) = self.uenib.delete_ues_by_e2_node(node).await {
            warn!(&self.logger, "Failed to purge UE records of {node} - {e}");
        }
    }
}

/// Sends each queued control message to the RAN in enqueue order and
/// forwards the outcome on the envelope's ack channel.  Never retries; exits
/// when the channel closes.
async fn dispatch_worker<E: E2Client>(
    e2: E,
    node: E2NodeId,
    rx: Receiver<CtrlMsg>,
    logger: Logger,
) {
    while let Ok(msg) = rx.recv().await {
        let ack = match e2.control(&node, msg.request).await {
            Err(e) => {
                warn!(&logger, "Error sending control message - {e}");
                CtrlAck::failed(e.to_string())
            }
            Ok(None) => {
                warn!(&logger, "Control response message is nil");
                CtrlAck::failed("control response message is nil")
            }
            Ok(Some(_)) => CtrlAck::ok(),
        };
        let _ = msg.ack_ch.send(ack).await;
    }
    debug!(&logger, "Dispatch worker exiting");
}
