//! e2sm - the slicing service model: command, trigger and indication shapes
//!
//! The model is carried opaquely over the E2 transport; marshalling is
//! delegated to the serde codec in `build`/`parse`.

pub mod build;
pub mod parse;

use crate::{BearerId, Cgi, SchedulerType, SliceType, UeIdType};
use serde::{Deserialize, Serialize};

/// OID of the RSM RAN function.  Nodes that do not advertise it are ignored.
pub const RSM_RAN_FUNCTION_OID: &str = "1.3.6.1.4.1.53148.1.1.2.102";

/// The command kinds the service model defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RsmCommand {
    SliceCreate,
    SliceUpdate,
    SliceDelete,
    UeAssociate,
    EventTrigger,
}

/// Control message header: names the command the payload carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlHeader {
    pub command: RsmCommand,
}

/// Full slice configuration, carried by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceConfig {
    pub slice_id: i64,
    pub slice_type: SliceType,
    pub scheduler_type: SchedulerType,
    pub weight: i32,
}

/// Delete carries only the slice identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceDeleteConfig {
    pub slice_id: i64,
    pub slice_type: SliceType,
}

/// The UE identity a UE-associate command addresses, in preferred form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssocUeId {
    pub id_type: UeIdType,
    pub value: i64,
}

/// UE-to-slice association command payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceAssociate {
    pub dl_slice_id: Option<i64>,
    pub ul_slice_id: Option<i64>,
    pub ue_id: AssocUeId,
    pub bearers: Vec<BearerId>,
}

/// Control message payload, one variant per supported command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ControlPayload {
    SliceCreate(SliceConfig),
    SliceUpdate(SliceConfig),
    SliceDelete(SliceDeleteConfig),
    UeAssociate(SliceAssociate),
}

/// Indication trigger kinds the model can subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    UponEmmEvent,
    PeriodicMetrics,
}

impl TriggerKind {
    pub fn name(&self) -> &'static str {
        match self {
            TriggerKind::UponEmmEvent => "upon-emm-event",
            TriggerKind::PeriodicMetrics => "periodic-metrics",
        }
    }
}

/// Event trigger definition carried in a subscription request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTriggerDefinition {
    pub kind: TriggerKind,
}

/// Indication header: the cell the reporting node observed the event in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicationHeader {
    pub cgi: Cgi,
}

/// Format-1 indication: per-slice metric report.  Reserved hook; decoded and
/// logged, not yet acted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricReport {
    pub slice_id: i64,
    pub slice_type: SliceType,
    pub metric_value: i64,
}

/// EMM event kinds a format-2 indication reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmmTrigger {
    UeAttach,
    HandInUeAttach,
    UeDetach,
    HandOutUeAttach,
}

/// One observed UE identifier inside a format-2 indication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmmUeId {
    pub id_type: UeIdType,
    pub value: i64,
}

/// Format-2 indication: a UE mobility event with the identifier set and the
/// bearer list the node observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmmEvent {
    pub trigger: EmmTrigger,
    pub preferred_id_type: UeIdType,
    pub ue_ids: Vec<EmmUeId>,
    pub bearers: Vec<BearerId>,
}

/// Indication payload, discriminated by format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IndicationPayload {
    Format1(MetricReport),
    Format2(EmmEvent),
}
