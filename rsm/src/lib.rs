//! RAN slice manager core: the slice-lifecycle state machine and its E2
//! dispatch fabric.
//!
//! The crate mediates between a northbound API issuing slice lifecycle
//! commands and a southbound E2 control plane carrying them to CUs and DUs,
//! while keeping two external inventories in step: the topology inventory
//! (per-DU slice aspects) and the UE inventory (identifiers, bearers, slice
//! memberships).  Transport shells - the gRPC server, the E2 SDK, the
//! inventory clients - live outside and plug in through the [`TopoClient`],
//! [`UeNibClient`] and [`E2Client`] traits.

mod broker;
mod data;
mod errors;
mod monitoring;
mod nib;
mod northbound;
mod protocols;
mod rsm;
mod slicing;
mod southbound;

pub use broker::{StreamBroker, StreamId, StreamReader};
pub use data::*;
pub use errors::RsmError;
pub use monitoring::Monitor;
pub use nib::*;
pub use northbound::*;
pub use protocols::e2sm;
pub use protocols::e2sm::{RSM_RAN_FUNCTION_OID, RsmCommand, TriggerKind};
pub use rsm::Rsm;
pub use slicing::SliceManager;
pub use southbound::*;
