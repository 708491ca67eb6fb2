use super::ue::{BearerId, UeIdentity};
use crate::errors::{Result, RsmError};
use serde::{Deserialize, Serialize};

/// Descriptor recorded on every slice the manager creates.
pub const SLICE_DESCRIPTION: &str = "Slice created by onos-RSM xAPP";

/// Direction of a slice.  Transported by name on the northbound interface;
/// an unknown name downcasts to DL on the input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SliceType {
    #[default]
    Dl,
    Ul,
}

impl SliceType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DL" => Some(SliceType::Dl),
            "UL" => Some(SliceType::Ul),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SliceType::Dl => "DL",
            SliceType::Ul => "UL",
        }
    }
}

/// Scheduler a slice runs.  `Unspecified` is the zero value a foreign
/// inventory writer can leave behind; the input path downcasts unknown names
/// to round-robin instead of storing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulerType {
    Unspecified,
    #[default]
    RoundRobin,
    ProportionallyFair,
    QosBased,
}

impl SchedulerType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "round-robin" => Some(SchedulerType::RoundRobin),
            "proportionally-fair" => Some(SchedulerType::ProportionallyFair),
            "qos-based" => Some(SchedulerType::QosBased),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchedulerType::Unspecified => "unspecified",
            SchedulerType::RoundRobin => "round-robin",
            SchedulerType::ProportionallyFair => "proportionally-fair",
            SchedulerType::QosBased => "qos-based",
        }
    }

    /// The scheduler to snapshot into a UE slice binding.  Only the three
    /// schedulable kinds can be bound.
    pub fn for_binding(self) -> Result<Self> {
        match self {
            SchedulerType::RoundRobin
            | SchedulerType::ProportionallyFair
            | SchedulerType::QosBased => Ok(self),
            SchedulerType::Unspecified => Err(RsmError::NotSupported(format!(
                "not supported scheduler type: {}",
                self.name()
            ))),
        }
    }
}

/// Scheduling parameters shared by the R-NIB slice aspect and the per-UE
/// membership snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceParameters {
    pub scheduler_type: SchedulerType,
    pub weight: i32,
    pub qos_level: Option<i32>,
}

/// One UE association recorded on a slice: the full observed identity set
/// plus the bearer descriptor the association rides on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceUeEntry {
    pub ue: UeIdentity,
    pub drb: Option<BearerId>,
}

/// The per-(node, sliceId, sliceType) aspect held in the topology inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceAspect {
    pub id: String,
    pub desc: String,
    pub parameters: SliceParameters,
    pub slice_type: SliceType,
    pub ue_ids: Vec<SliceUeEntry>,
}

impl SliceAspect {
    /// A freshly created slice with no associated UEs.
    pub fn new(id: &str, slice_type: SliceType, scheduler_type: SchedulerType, weight: i32) -> Self {
        SliceAspect {
            id: id.to_string(),
            desc: SLICE_DESCRIPTION.to_string(),
            parameters: SliceParameters {
                scheduler_type,
                weight,
                qos_level: None,
            },
            slice_type,
            ue_ids: Vec::new(),
        }
    }
}