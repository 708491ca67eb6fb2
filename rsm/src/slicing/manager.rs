//! manager - the slice lifecycle state machine
//!
//! One task consumes the northbound request queue and, per request, runs
//! validate / build / dispatch / await-ACK / commit.  Control messages go to
//! per-(node, command) dispatch workers; commits go to the topology
//! inventory first, then the UE inventory.  Nothing is retried: every
//! failure becomes the cause string of the northbound reply, and a failure
//! after a positive ACK says so explicitly, since the RAN is then ahead of
//! the inventories and the operator replays the request idempotently.

use crate::errors::{Result, RsmError};
use crate::nib::{TopoClient, UeNibClient};
use crate::northbound::{
    Ack, CreateSliceRequest, DeleteSliceRequest, NbiRequest, RsmMsg,
    SetUeSliceAssociationRequest, UpdateSliceRequest,
};
use crate::protocols::e2sm::{self, AssocUeId, RsmCommand, SliceAssociate, SliceConfig};
use crate::southbound::{CtrlChannelRegistry, CtrlMsg, E2ControlRequest};
use crate::{
    AckWait, BearerId, E2NodeId, RsmUeInfo, SliceAspect, SliceBinding, SliceParameters,
    SliceType, SliceUeEntry, SchedulerType, UeIdType, UeIdentity,
};
use async_channel::Receiver;
use async_std::future;
use async_std::task;
use slog::{Logger, debug, info, warn};
use std::time::Duration;

pub struct SliceManager<T: TopoClient, U: UeNibClient> {
    requests: Receiver<RsmMsg>,
    registry: CtrlChannelRegistry,
    rnib: T,
    uenib: U,
    ack_wait: AckWait,
    logger: Logger,
}

impl<T: TopoClient, U: UeNibClient> SliceManager<T, U> {
    pub fn new(
        requests: Receiver<RsmMsg>,
        registry: CtrlChannelRegistry,
        rnib: T,
        uenib: U,
        ack_wait: AckWait,
        logger: Logger,
    ) -> Self {
        SliceManager {
            requests,
            registry,
            rnib,
            uenib,
            ack_wait,
            logger,
        }
    }

    pub fn spawn(self) {
        task::spawn(async move { self.dispatch_nbi_requests().await });
    }

    async fn dispatch_nbi_requests(&self) {
        info!(&self.logger, "Run NBI request dispatcher");
        while let Ok(msg) = self.requests.recv().await {
            debug!(&self.logger, "Received NBI request: {:?}", msg.request);
            let result = match &msg.request {
                NbiRequest::CreateSlice(request) => {
                    self.handle_create_slice(request, &msg.node).await
                }
                NbiRequest::UpdateSlice(request) => {
                    self.handle_update_slice(request, &msg.node).await
                }
                NbiRequest::DeleteSlice(request) => {
                    self.handle_delete_slice(request, &msg.node).await
                }
                NbiRequest::SetUeSliceAssociation(request) => {
                    self.handle_ue_slice_association(request, &msg.node).await
                }
            };
            let ack = match result {
                Ok(()) => Ack::ok(),
                Err(e) => {
                    warn!(&self.logger, "NBI request failed: {e}");
                    Ack::failed(e.to_string())
                }
            };
            let _ = msg.ack_ch.send(ack).await;
        }
    }

    async fn handle_create_slice(
        &self,
        request: &CreateSliceRequest,
        node: &E2NodeId,
    ) -> Result<()> {
        let slice_id = parse_slice_id(&request.slice_id)?;
        let weight = parse_weight(&request.weight)?;
        // Unknown enum names downcast to safe defaults on the input path.
        let scheduler_type =
            SchedulerType::from_name(&request.scheduler_type).unwrap_or_default();
        let slice_type = SliceType::from_name(&request.slice_type).unwrap_or_default();

        let config = SliceConfig {
            slice_id,
            slice_type,
            scheduler_type,
            weight,
        };
        let control = build_control(RsmCommand::SliceCreate, &config)?;

        if self.rnib.has_slice(node, &request.slice_id, slice_type).await {
            return Err(RsmError::AlreadyExists(format!(
                "slice ID {slice_id} already exists"
            )));
        }

        self.dispatch(RsmCommand::SliceCreate, node, control).await?;

        let aspect = SliceAspect::new(&request.slice_id, slice_type, scheduler_type, weight);
        self.rnib.add_slice(node, aspect).await.map_err(|e| {
            RsmError::Internal(format!(
                "failed to create slice information in topology inventory although control message was sent: {e}"
            ))
        })?;
        Ok(())
    }

    async fn handle_update_slice(
        &self,
        request: &UpdateSliceRequest,
        node: &E2NodeId,
    ) -> Result<()> {
        let slice_id = parse_slice_id(&request.slice_id)?;
        let weight = parse_weight(&request.weight)?;
        let scheduler_type =
            SchedulerType::from_name(&request.scheduler_type).unwrap_or_default();
        let slice_type = SliceType::from_name(&request.slice_type).unwrap_or_default();

        let config = SliceConfig {
            slice_id,
            slice_type,
            scheduler_type,
            weight,
        };
        let control = build_control(RsmCommand::SliceUpdate, &config)?;

        if !self.rnib.has_slice(node, &request.slice_id, slice_type).await {
            return Err(RsmError::NotFound(format!(
                "no slice ID {slice_id} in node {node}"
            )));
        }

        self.dispatch(RsmCommand::SliceUpdate, node, control).await?;

        // Retain the current UE association list across the attribute change.
        let mut aspect = self
            .rnib
            .get_slice(node, &request.slice_id, slice_type)
            .await
            .map_err(|e| {
                RsmError::NotFound(format!(
                    "failed to get slice aspect - slice ID {slice_id} in node {node}: {e}"
                ))
            })?;
        aspect.parameters.scheduler_type = scheduler_type;
        aspect.parameters.weight = weight;
        self.rnib.update_slice(node, aspect).await.map_err(|e| {
            RsmError::Internal(format!(
                "failed to update slice information in topology inventory although control message was sent: {e}"
            ))
        })?;

        // Push the new parameters into every membership snapshot.
        let ues = self
            .uenib
            .list_ues()
            .await
            .map_err(|e| RsmError::Internal(format!("failed to get UEs in UE inventory: {e}")))?;
        for mut ue in ues {
            let mut changed = false;
            for binding in ue
                .slices
                .iter_mut()
                .filter(|b| b.slice_id == request.slice_id && b.slice_type == slice_type)
            {
                binding.parameters.weight = weight;
                binding.parameters.scheduler_type = scheduler_type;
                changed = true;
            }
            if changed {
                self.uenib.update_ue(ue).await.map_err(|e| {
                    RsmError::Internal(format!("failed to update UE inventory: {e}"))
                })?;
            }
        }
        Ok(())
    }

    async fn handle_delete_slice(
        &self,
        request: &DeleteSliceRequest,
        node: &E2NodeId,
    ) -> Result<()> {
        let slice_id = parse_slice_id(&request.slice_id)?;
        let slice_type = SliceType::from_name(&request.slice_type).unwrap_or_default();

        let config = SliceConfig {
            slice_id,
            slice_type,
            scheduler_type: SchedulerType::default(),
            weight: 0,
        };
        let control = build_control(RsmCommand::SliceDelete, &config)?;

        if !self.rnib.has_slice(node, &request.slice_id, slice_type).await {
            return Err(RsmError::NotFound(format!(
                "no slice ID {slice_id} in node {node}"
            )));
        }

        self.dispatch(RsmCommand::SliceDelete, node, control).await?;

        self.rnib
            .delete_slice(node, &request.slice_id, slice_type)
            .await
            .map_err(|e| {
                RsmError::Internal(format!(
                    "failed to delete slice information from topology inventory although control message was sent: {e}"
                ))
            })?;

        // Cascade: drop the deleted slice from every UE's membership list.
        let ues = self
            .uenib
            .list_ues()
            .await
            .map_err(|e| RsmError::Internal(format!("failed to get UEs in UE inventory: {e}")))?;
        for mut ue in ues {
            let before = ue.slices.len();
            ue.slices
                .retain(|b| !(b.slice_id == request.slice_id && b.slice_type == slice_type));
            if ue.slices.len() != before {
                self.uenib.update_ue(ue).await.map_err(|e| {
                    RsmError::Internal(format!("failed to update UE inventory: {e}"))
                })?;
            }
        }
        Ok(())
    }

    async fn handle_ue_slice_association(
        &self,
        request: &SetUeSliceAssociationRequest,
        node: &E2NodeId,
    ) -> Result<()> {
        // The request targets the DU; the UE record lives under its CU.
        let du = node;
        let cu = self.rnib.source_cu(du).await.map_err(|e| {
            RsmError::NotFound(format!(
                "DU {du} does not have CU in topology inventory - please add or update CU-DU relation: {e}"
            ))
        })?;

        let mut observed_ids = UeIdentity::default();
        for entry in &request.ue_id {
            if entry.ue_id.is_empty() {
                continue;
            }
            let id_type = UeIdType::from_name(&entry.id_type).ok_or_else(|| {
                RsmError::InvalidArgument(format!("invalid ID type {}", entry.id_type))
            })?;
            let value: i64 = entry.ue_id.parse().map_err(|e| {
                RsmError::InvalidArgument(format!("invalid ID format {} - {e}", entry.ue_id))
            })?;
            observed_ids.set_id(id_type, value);
        }
        observed_ids.preferred = Some(UeIdType::DuUeF1ap);

        let drb_id: i32 = request.drb_id.parse().map_err(|e| {
            RsmError::InvalidArgument(format!("failed to convert drb-id to int - {e}"))
        })?;

        let dl_slice_id = parse_optional_slice_id(&request.dl_slice_id)?;
        let ul_slice_id = parse_optional_slice_id(&request.ul_slice_id)?;
        if dl_slice_id.is_none() && ul_slice_id.is_none() {
            return Err(RsmError::InvalidArgument(format!(
                "both DL slice ID and UL slice ID are empty: {request:?}"
            )));
        }

        let du_ue_f1ap_id = observed_ids
            .du_ue_f1ap_id
            .ok_or_else(|| RsmError::InvalidArgument("need valid du-ue-f1ap-id".to_string()))?;

        let has_ul_slice = match ul_slice_id {
            Some(_) => {
                self.rnib
                    .has_slice(du, &request.ul_slice_id, SliceType::Ul)
                    .await
            }
            None => false,
        };
        let has_dl_slice = match dl_slice_id {
            Some(_) => {
                self.rnib
                    .has_slice(du, &request.dl_slice_id, SliceType::Dl)
                    .await
            }
            None => false,
        };
        if !has_ul_slice && !has_dl_slice {
            return Err(RsmError::InvalidArgument("invalid slice ID".to_string()));
        }

        let mut ue = self
            .uenib
            .get_ue_by_preferred_id(&cu, UeIdType::DuUeF1ap, du_ue_f1ap_id)
            .await
            .map_err(|e| {
                RsmError::NotFound(format!(
                    "failed to get UE inventory record (CU {cu} DU {du} UE {du_ue_f1ap_id}): {e}"
                ))
            })?;

        match &ue.du_e2_node_id {
            None => ue.du_e2_node_id = Some(du.clone()),
            Some(recorded) if recorded != du => {
                return Err(RsmError::InvalidArgument(format!(
                    "DU ID in UE inventory and received DU ID are not matched - received DU ID: {du}, DU ID in inventory: {recorded}"
                )));
            }
            Some(_) => {}
        }

        // Every bearer of the UE riding the requested DRB goes into the
        // association payload.  DRB values are unique within a UE, so the
        // first match is also the association's descriptor.
        let bearers: Vec<BearerId> = ue
            .bearers
            .iter()
            .filter(|b| b.drb_id() == drb_id)
            .cloned()
            .collect();
        let Some(drb) = bearers.first().cloned() else {
            return Err(RsmError::NotFound("the number of bearers is 0".to_string()));
        };

        let assoc = SliceAssociate {
            dl_slice_id,
            ul_slice_id,
            ue_id: AssocUeId {
                id_type: UeIdType::DuUeF1ap,
                value: du_ue_f1ap_id,
            },
            bearers,
        };
        let control = e2sm::build::control_request(RsmCommand::UeAssociate, None, Some(&assoc))?;

        self.dispatch(RsmCommand::UeAssociate, du, control).await?;

        // Stamp the DU on the record before reconciling.
        self.uenib.update_ue(ue.clone()).await.map_err(|e| {
            RsmError::Internal(format!(
                "failed to update DU id on UE inventory record although control message was sent: {e}"
            ))
        })?;

        // UL first, then DL; the UE record is written once afterwards.
        if has_ul_slice {
            self.reconcile_direction(
                du,
                &cu,
                &request.ul_slice_id,
                SliceType::Ul,
                drb_id,
                du_ue_f1ap_id,
                &observed_ids,
                &drb,
                &mut ue,
            )
            .await?;
        }
        if has_dl_slice {
            self.reconcile_direction(
                du,
                &cu,
                &request.dl_slice_id,
                SliceType::Dl,
                drb_id,
                du_ue_f1ap_id,
                &observed_ids,
                &drb,
                &mut ue,
            )
            .await?;
        }

        self.uenib
            .update_ue(ue)
            .await
            .map_err(|e| RsmError::Internal(format!("failed to update UE inventory: {e}")))
    }

    /// Re-anchor one direction of the association.  Invariant: a given
    /// (DuUeF1apID, DRB, direction) participates in at most one slice on a
    /// DU, so the old anchor is swept before the new one is appended.
    #[allow(clippy::too_many_arguments)]
    async fn reconcile_direction(
        &self,
        du: &E2NodeId,
        cu: &E2NodeId,
        slice_id: &str,
        direction: SliceType,
        drb_id: i32,
        du_ue_f1ap_id: i64,
        observed_ids: &UeIdentity,
        drb: &BearerId,
        ue: &mut RsmUeInfo,
    ) -> Result<()> {
        // Sweep: remove this (UE, DRB) from every slice of the direction.
        let slices = self.rnib.list_slices(du).await.map_err(|e| {
            RsmError::Internal(format!(
                "failed to get slice item list from topology inventory: {e}"
            ))
        })?;
        for mut aspect in slices {
            if aspect.slice_type != direction {
                continue;
            }
            let before = aspect.ue_ids.len();
            aspect.ue_ids.retain(|entry| {
                !(entry.ue.du_ue_f1ap_id == Some(du_ue_f1ap_id)
                    && entry.drb.as_ref().is_some_and(|d| d.drb_id() == drb_id))
            });
            if aspect.ue_ids.len() != before {
                self.rnib.update_slice(du, aspect).await.map_err(|e| {
                    RsmError::Internal(format!(
                        "failed to update {} slice item in topology inventory: {e}",
                        direction.name()
                    ))
                })?;
            }
        }

        // Anchor the association on the target slice.
        let mut target = self
            .rnib
            .get_slice(du, slice_id, direction)
            .await
            .map_err(|e| {
                RsmError::NotFound(format!(
                    "failed to get {} slice item (node {du}, slice {slice_id}): {e}",
                    direction.name()
                ))
            })?;
        target.ue_ids.push(SliceUeEntry {
            ue: observed_ids.clone(),
            drb: Some(drb.clone()),
        });
        let parameters = target.parameters.clone();
        self.rnib.update_slice(du, target).await.map_err(|e| {
            RsmError::Internal(format!(
                "failed to update {} slice item in topology inventory: {e}",
                direction.name()
            ))
        })?;

        let binding = SliceBinding {
            du_e2_node_id: du.clone(),
            cu_e2_node_id: cu.clone(),
            slice_id: slice_id.to_string(),
            slice_type: direction,
            parameters: SliceParameters {
                scheduler_type: parameters.scheduler_type.for_binding()?,
                weight: parameters.weight,
                qos_level: parameters.qos_level,
            },
            drb: drb.clone(),
        };

        match direction {
            SliceType::Ul => {
                // Keep existing memberships for the DRB, refreshing their
                // bearer descriptor; bind fresh otherwise.
                let mut updated = false;
                for existing in ue.slices.iter_mut().filter(|b| b.drb.drb_id() == drb_id) {
                    existing.drb = drb.clone();
                    updated = true;
                }
                if !updated {
                    ue.slices.push(binding);
                }
            }
            SliceType::Dl => {
                // Re-bind the DRB: any previous membership for it gives way.
                ue.slices.retain(|b| b.drb.drb_id() != drb_id);
                ue.slices.push(binding);
            }
        }
        Ok(())
    }

    /// Enqueue a control message for the node's dispatch worker and await
    /// its ACK.  The enqueue runs detached so a saturated worker cannot
    /// wedge the manager while it waits.
    async fn dispatch(
        &self,
        kind: RsmCommand,
        node: &E2NodeId,
        request: E2ControlRequest,
    ) -> Result<()> {
        let Some(sender) = self.registry.sender(kind, node) else {
            return Err(RsmError::NotFound(format!(
                "no control channel for {kind:?} on node {node}"
            )));
        };

        let (ack_tx, ack_rx) = async_channel::bounded(1);
        let msg = CtrlMsg {
            request,
            ack_ch: ack_tx,
        };
        task::spawn(async move {
            let _ = sender.send(msg).await;
        });

        let seconds = match self.ack_wait {
            // Fire-and-forget, for offline integration runs.
            AckWait::Skip => return Ok(()),
            AckWait::Seconds(seconds) => seconds,
        };
        let ack = future::timeout(Duration::from_secs(seconds), ack_rx.recv())
            .await
            .map_err(|_| RsmError::AckTimeout)?
            .map_err(|_| {
                RsmError::Transport("control dispatch channel closed before ACK".to_string())
            })?;
        if !ack.success {
            return Err(RsmError::Transport(ack.reason.unwrap_or_default()));
        }
        Ok(())
    }
}

fn parse_slice_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|e| {
        RsmError::InvalidArgument(format!("failed to convert slice id to int - {e}"))
    })
}

fn parse_weight(raw: &str) -> Result<i32> {
    raw.parse()
        .map_err(|e| RsmError::InvalidArgument(format!("failed to convert weight to int - {e}")))
}

fn parse_optional_slice_id(raw: &str) -> Result<Option<i64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_slice_id(raw).map(Some)
}

fn build_control(kind: RsmCommand, config: &SliceConfig) -> Result<E2ControlRequest> {
    e2sm::build::control_request(kind, Some(config), None)
}
