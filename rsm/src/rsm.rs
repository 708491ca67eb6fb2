//! rsm - top-level application wiring

use crate::broker::StreamBroker;
use crate::errors::Result;
use crate::nib::{TopoClient, UeNibClient};
use crate::northbound::{RsmMsg, RsmService};
use crate::protocols::e2sm::RsmCommand;
use crate::slicing::SliceManager;
use crate::southbound::{CtrlChannelRegistry, E2Client, E2SessionManager};
use crate::{Config, E2NodeId};
use async_channel::Sender;
use async_std::sync::Mutex;
use slog::{Logger, info, o};
use std::sync::Arc;

/// The assembled slice manager application.  `start` builds the channel
/// fabric, spawns the slice-lifecycle manager and the E2 session manager,
/// and returns a handle exposing the northbound service.
#[derive(Clone)]
pub struct Rsm<T: TopoClient, U: UeNibClient> {
    config: Config,
    service: RsmService<T, U>,
    registry: CtrlChannelRegistry,
    requests: Arc<Mutex<Option<Sender<RsmMsg>>>>,
    logger: Logger,
}

impl<T: TopoClient, U: UeNibClient> Rsm<T, U> {
    pub async fn start<E: E2Client>(
        config: Config,
        rnib: T,
        uenib: U,
        e2: E,
        logger: Logger,
    ) -> Result<Self> {
        info!(&logger, "Starting RSM");

        let registry = CtrlChannelRegistry::new();
        let broker = StreamBroker::new(logger.new(o!("broker" => 1)));
        let (requests_tx, requests_rx) = async_channel::bounded(1);

        SliceManager::new(
            requests_rx,
            registry.clone(),
            rnib.clone(),
            uenib.clone(),
            config.ack_wait,
            logger.new(o!("slicing" => 1)),
        )
        .spawn();

        E2SessionManager::new(
            e2,
            rnib.clone(),
            uenib.clone(),
            registry.clone(),
            broker,
            logger.new(o!("e2" => 1)),
        )
        .start()
        .await?;

        let service = RsmService::new(
            requests_tx.clone(),
            rnib,
            uenib,
            logger.new(o!("nbi" => 1)),
        );

        Ok(Rsm {
            config,
            service,
            registry,
            requests: Arc::new(Mutex::new(Some(requests_tx))),
            logger,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The operator-facing service the transport shell registers.
    pub fn service(&self) -> &RsmService<T, U> {
        &self.service
    }

    /// Whether the node's dispatch channel for a command kind has been set
    /// up, i.e. the node advertised the capability and its worker runs.
    pub fn node_ready(&self, kind: RsmCommand, node: &E2NodeId) -> bool {
        self.registry.is_registered(kind, node)
    }

    /// Close the request queue and every dispatch channel; running workers
    /// drain and exit.
    pub async fn graceful_shutdown(self) {
        info!(&self.logger, "Shutting down");
        if let Some(requests) = self.requests.lock().await.take() {
            requests.close();
        }
        self.registry.close_all();
    }
}
