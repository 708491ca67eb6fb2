use super::node::E2NodeId;
use super::slice::{SliceParameters, SliceType};
use serde::{Deserialize, Serialize};

/// Discriminator naming which of the five UE identifier fields is
/// authoritative for lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UeIdType {
    CuUeF1ap,
    DuUeF1ap,
    RanUeNgap,
    AmfUeNgap,
    EnbUeS1ap,
}

impl UeIdType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cu-ue-f1ap-id" => Some(UeIdType::CuUeF1ap),
            "du-ue-f1ap-id" => Some(UeIdType::DuUeF1ap),
            "ran-ue-ngap-id" => Some(UeIdType::RanUeNgap),
            "amf-ue-ngap-id" => Some(UeIdType::AmfUeNgap),
            "enb-ue-s1ap-id" => Some(UeIdType::EnbUeS1ap),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UeIdType::CuUeF1ap => "cu-ue-f1ap-id",
            UeIdType::DuUeF1ap => "du-ue-f1ap-id",
            UeIdType::RanUeNgap => "ran-ue-ngap-id",
            UeIdType::AmfUeNgap => "amf-ue-ngap-id",
            UeIdType::EnbUeS1ap => "enb-ue-s1ap-id",
        }
    }
}

/// The observed identifier set of one UE plus the preferred-type tag.  The
/// field the tag names must be populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeIdentity {
    pub cu_ue_f1ap_id: Option<i64>,
    pub du_ue_f1ap_id: Option<i64>,
    pub ran_ue_ngap_id: Option<i64>,
    pub amf_ue_ngap_id: Option<i64>,
    pub enb_ue_s1ap_id: Option<i32>,
    pub preferred: Option<UeIdType>,
}

impl UeIdentity {
    pub fn id(&self, kind: UeIdType) -> Option<i64> {
        match kind {
            UeIdType::CuUeF1ap => self.cu_ue_f1ap_id,
            UeIdType::DuUeF1ap => self.du_ue_f1ap_id,
            UeIdType::RanUeNgap => self.ran_ue_ngap_id,
            UeIdType::AmfUeNgap => self.amf_ue_ngap_id,
            UeIdType::EnbUeS1ap => self.enb_ue_s1ap_id.map(i64::from),
        }
    }

    pub fn set_id(&mut self, kind: UeIdType, value: i64) {
        match kind {
            UeIdType::CuUeF1ap => self.cu_ue_f1ap_id = Some(value),
            UeIdType::DuUeF1ap => self.du_ue_f1ap_id = Some(value),
            UeIdType::RanUeNgap => self.ran_ue_ngap_id = Some(value),
            UeIdType::AmfUeNgap => self.amf_ue_ngap_id = Some(value),
            UeIdType::EnbUeS1ap => self.enb_ue_s1ap_id = Some(value as i32),
        }
    }

    /// Value of the preferred identifier, if both tag and field are set.
    pub fn preferred_id(&self) -> Option<i64> {
        self.id(self.preferred?)
    }
}

/// QoS description of one flow mapped onto a 5G DRB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QosFlowParameters {
    NonDynamic {
        five_qi: i32,
    },
    Dynamic {
        priority: i32,
        packet_delay_budget: i32,
        packet_error_rate: i32,
    },
}

/// A bearer a UE holds.  DRB values are unique within one UE across both
/// generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BearerId {
    FourG {
        drb_id: i32,
        qci: Option<i32>,
    },
    FiveG {
        drb_id: i32,
        qfi: Option<i32>,
        flows: Vec<QosFlowParameters>,
    },
}

impl BearerId {
    pub fn drb_id(&self) -> i32 {
        match self {
            BearerId::FourG { drb_id, .. } => *drb_id,
            BearerId::FiveG { drb_id, .. } => *drb_id,
        }
    }
}

/// Cell global identity carried in indication headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cgi {
    Nr { plmn: String, cell: String },
    Eutra { plmn: String, cell: String },
}

impl Cgi {
    /// Stringified form stored on the UE record.
    pub fn key(&self) -> String {
        match self {
            Cgi::Nr { plmn, cell } => format!("nrCGI-{plmn}-{cell}"),
            Cgi::Eutra { plmn, cell } => format!("eutraCGI-{plmn}-{cell}"),
        }
    }
}

/// One slice membership of a UE, keyed by DRB within the slice direction.
/// Carries a snapshot of the slice's scheduling parameters taken at
/// association time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceBinding {
    pub du_e2_node_id: E2NodeId,
    pub cu_e2_node_id: E2NodeId,
    pub slice_id: String,
    pub slice_type: SliceType,
    pub parameters: SliceParameters,
    pub drb: BearerId,
}

/// The UE inventory record, keyed by the globally unique id assigned on
/// first attach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsmUeInfo {
    pub global_ue_id: String,
    pub ue_ids: UeIdentity,
    pub bearers: Vec<BearerId>,
    pub cell_global_id: String,
    pub cu_e2_node_id: E2NodeId,
    pub du_e2_node_id: Option<E2NodeId>,
    pub slices: Vec<SliceBinding>,
}

impl RsmUeInfo {
    /// Structural identity used by duplicate-attach detection: all
    /// identifier fields plus CGI plus the CU/DU pair.
    pub fn same_identity(&self, other: &RsmUeInfo) -> bool {
        self.ue_ids == other.ue_ids
            && self.cell_global_id == other.cell_global_id
            && self.cu_e2_node_id == other.cu_e2_node_id
            && self.du_e2_node_id == other.du_e2_node_id
    }
}
