//! monitor - per-subscription indication processing

use crate::broker::StreamReader;
use crate::errors::{Result, RsmError};
use crate::nib::{TopoClient, UeNibClient};
use crate::protocols::e2sm::{self, EmmEvent, EmmTrigger, IndicationHeader, IndicationPayload};
use crate::southbound::Indication;
use crate::{E2NodeId, RsmUeInfo, UeIdentity};
use async_std::task;
use slog::{Logger, debug, warn};
use uuid::Uuid;

/// Consumes one subscription's indication stream and applies EMM events to
/// the UE inventory.  Processing is best-effort and independent per message;
/// a failure terminates this monitor only.
pub struct Monitor<T: TopoClient, U: UeNibClient> {
    node: E2NodeId,
    stream: StreamReader,
    rnib: T,
    uenib: U,
    logger: Logger,
}

impl<T: TopoClient, U: UeNibClient> Monitor<T, U> {
    pub fn new(
        node: E2NodeId,
        stream: StreamReader,
        rnib: T,
        uenib: U,
        logger: Logger,
    ) -> Self {
        Monitor {
            node,
            stream,
            rnib,
            uenib,
            logger,
        }
    }

    pub fn spawn(self) {
        task::spawn(async move {
            if let Err(e) = self.run().await {
                warn!(self.logger, "Indication monitor exiting: {e}");
            }
        });
    }

    async fn run(&self) -> Result<()> {
        loop {
            let indication = self.stream.recv().await?;
            self.process_indication(indication).await?;
        }
    }

    async fn process_indication(&self, indication: Indication) -> Result<()> {
        let header = e2sm::parse::indication_header(&indication.header)?;
        match e2sm::parse::indication_payload(&indication.payload)? {
            IndicationPayload::Format1(report) => {
                // Metric reports are a reserved hook.
                debug!(
                    &self.logger,
                    "Received metric indication: slice {} {:?} value {}",
                    report.slice_id,
                    report.slice_type,
                    report.metric_value
                );
                Ok(())
            }
            IndicationPayload::Format2(event) => self.process_emm_event(&header, event).await,
        }
    }

    async fn process_emm_event(&self, header: &IndicationHeader, event: EmmEvent) -> Result<()> {
        debug!(
            &self.logger,
            "Received EMM indication: {:?} preferred {:?}", event.trigger, event.preferred_id_type
        );

        let mut ue_ids = UeIdentity {
            preferred: Some(event.preferred_id_type),
            ..UeIdentity::default()
        };
        for id in &event.ue_ids {
            ue_ids.set_id(id.id_type, id.value);
        }

        match event.trigger {
            EmmTrigger::UeAttach | EmmTrigger::HandInUeAttach => {
                // The reporting node is the CU; resolve its peer DU.
                let du = match self.rnib.target_du(&self.node).await {
                    Ok(du) => Some(du),
                    Err(e) => {
                        warn!(&self.logger, "No DU paired to CU {} - {e}", self.node);
                        None
                    }
                };
                let ue = RsmUeInfo {
                    global_ue_id: Uuid::new_v4().to_string(),
                    ue_ids,
                    bearers: event.bearers,
                    cell_global_id: header.cgi.key(),
                    cu_e2_node_id: self.node.clone(),
                    du_e2_node_id: du,
                    slices: Vec::new(),
                };
                debug!(&self.logger, "Attach: {ue:?}");
                self.uenib.add_ue(ue).await
            }
            EmmTrigger::UeDetach | EmmTrigger::HandOutUeAttach => {
                let value = ue_ids.preferred_id().ok_or_else(|| {
                    RsmError::InvalidArgument(format!(
                        "preferred UE id {:?} is not populated",
                        event.preferred_id_type
                    ))
                })?;
                self.uenib
                    .delete_ue_by_preferred_id(&self.node, event.preferred_id_type, value)
                    .await
            }
        }
    }
}
