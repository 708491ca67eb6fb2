//! service - the operator-facing RPC façade
//!
//! The gRPC/TLS server shell lives outside this crate; it calls these
//! methods with the request fields exactly as transported.

use super::{
    Ack, CreateSliceRequest, DeleteSliceRequest, NbiRequest, RsmMsg, SetUeSliceAssociationRequest,
    UpdateSliceRequest,
};
use crate::errors::Result;
use crate::nib::{TopoClient, UeNibClient};
use crate::{E2NodeId, RsmUeInfo, SliceAspect};
use async_channel::Sender;
use async_std::task;
use slog::{Logger, info};

/// Synchronous-from-the-caller lifecycle operations plus inventory reads.
/// Each write wraps the request in an envelope, forwards it to the slice
/// manager's queue from a detached task (a full queue must not wedge the
/// transport handler) and blocks on the reply.
#[derive(Clone)]
pub struct RsmService<T: TopoClient, U: UeNibClient> {
    requests: Sender<RsmMsg>,
    rnib: T,
    uenib: U,
    logger: Logger,
}

impl<T: TopoClient, U: UeNibClient> RsmService<T, U> {
    pub fn new(requests: Sender<RsmMsg>, rnib: T, uenib: U, logger: Logger) -> Self {
        RsmService {
            requests,
            rnib,
            uenib,
            logger,
        }
    }

    pub async fn create_slice(&self, request: CreateSliceRequest) -> Ack {
        info!(&self.logger, "Called CreateSlice: {request:?}");
        let node = E2NodeId::new(request.e2_node_id.clone());
        self.forward(node, NbiRequest::CreateSlice(request)).await
    }

    pub async fn update_slice(&self, request: UpdateSliceRequest) -> Ack {
        info!(&self.logger, "Called UpdateSlice: {request:?}");
        let node = E2NodeId::new(request.e2_node_id.clone());
        self.forward(node, NbiRequest::UpdateSlice(request)).await
    }

    pub async fn delete_slice(&self, request: DeleteSliceRequest) -> Ack {
        info!(&self.logger, "Called DeleteSlice: {request:?}");
        let node = E2NodeId::new(request.e2_node_id.clone());
        self.forward(node, NbiRequest::DeleteSlice(request)).await
    }

    pub async fn set_ue_slice_association(&self, request: SetUeSliceAssociationRequest) -> Ack {
        info!(&self.logger, "Called SetUeSliceAssociation: {request:?}");
        let node = E2NodeId::new(request.e2_node_id.clone());
        self.forward(node, NbiRequest::SetUeSliceAssociation(request))
            .await
    }

    /// Slices of one node, or of every DU when `e2_node_id` is empty.
    pub async fn get_slices(&self, e2_node_id: &str) -> Result<Vec<SliceAspect>> {
        info!(&self.logger, "Called GetSlices: {e2_node_id}");
        if e2_node_id.is_empty() {
            let per_du = self.rnib.slices_for_all_dus().await?;
            return Ok(per_du.into_values().flatten().collect());
        }
        self.rnib.list_slices(&E2NodeId::new(e2_node_id)).await
    }

    /// UE records scoped to one node, or all of them when `e2_node_id` is
    /// empty; each record carries its slice membership list.
    pub async fn get_ue_slice_associations(&self, e2_node_id: &str) -> Result<Vec<RsmUeInfo>> {
        info!(&self.logger, "Called GetUeSliceAssociations: {e2_node_id}");
        let ues = self.uenib.list_ues().await?;
        if e2_node_id.is_empty() {
            return Ok(ues);
        }
        let node = E2NodeId::new(e2_node_id);
        Ok(ues
            .into_iter()
            .filter(|ue| ue.cu_e2_node_id == node || ue.du_e2_node_id.as_ref() == Some(&node))
            .collect())
    }

    async fn forward(&self, node: E2NodeId, request: NbiRequest) -> Ack {
        let (ack_tx, ack_rx) = async_channel::bounded(1);
        let msg = RsmMsg {
            node,
            request,
            ack_ch: ack_tx,
        };
        let requests = self.requests.clone();
        task::spawn(async move {
            let _ = requests.send(msg).await;
        });
        match ack_rx.recv().await {
            Ok(ack) => ack,
            Err(_) => Ack::failed("slice manager is not running"),
        }
    }
}
