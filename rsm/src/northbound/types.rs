//! types - the northbound request envelope and reply
//!
//! Numeric fields travel as decimal strings and enums by name, exactly as
//! the transport hands them over; absent optional strings are empty.

use crate::E2NodeId;
use async_channel::Sender;

/// Reply to one northbound request.  On failure `cause` carries the
/// manager's error string verbatim.
#[derive(Debug, Clone)]
pub struct Ack {
    pub success: bool,
    pub cause: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Ack {
            success: true,
            cause: None,
        }
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        Ack {
            success: false,
            cause: Some(cause.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSliceRequest {
    pub e2_node_id: String,
    pub slice_id: String,
    pub weight: String,
    pub scheduler_type: String,
    pub slice_type: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSliceRequest {
    pub e2_node_id: String,
    pub slice_id: String,
    pub weight: String,
    pub scheduler_type: String,
    pub slice_type: String,
}

#[derive(Debug, Clone)]
pub struct DeleteSliceRequest {
    pub e2_node_id: String,
    pub slice_id: String,
    pub slice_type: String,
}

/// One UE identifier as transported: a type name and a decimal value.
#[derive(Debug, Clone)]
pub struct NbiUeId {
    pub id_type: String,
    pub ue_id: String,
}

#[derive(Debug, Clone)]
pub struct SetUeSliceAssociationRequest {
    /// Target DU.
    pub e2_node_id: String,
    /// Must include a du-ue-f1ap-id entry.
    pub ue_id: Vec<NbiUeId>,
    pub dl_slice_id: String,
    pub ul_slice_id: String,
    pub drb_id: String,
}

#[derive(Debug, Clone)]
pub enum NbiRequest {
    CreateSlice(CreateSliceRequest),
    UpdateSlice(UpdateSliceRequest),
    DeleteSlice(DeleteSliceRequest),
    SetUeSliceAssociation(SetUeSliceAssociationRequest),
}

/// Envelope on the slice manager's request queue.
#[derive(Debug)]
pub struct RsmMsg {
    pub node: E2NodeId,
    pub request: NbiRequest,
    pub ack_ch: Sender<Ack>,
}
