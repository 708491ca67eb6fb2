//! build - construction and marshalling of E2SM-RSM messages

use super::{
    ControlHeader, ControlPayload, EventTriggerDefinition, RsmCommand, SliceAssociate,
    SliceConfig, SliceDeleteConfig, TriggerKind,
};
use crate::errors::{Result, RsmError};
use crate::southbound::E2ControlRequest;
use serde::Serialize;

/// Build the header + payload pair for one control command.  `SliceCreate`
/// and `SliceUpdate` take a slice config, `SliceDelete` uses only its
/// identity fields, `UeAssociate` takes an association.  `EventTrigger` is
/// not a control command and is rejected here; trigger definitions are built
/// by `event_trigger`.
pub fn control_request(
    command: RsmCommand,
    slice_config: Option<&SliceConfig>,
    slice_assoc: Option<&SliceAssociate>,
) -> Result<E2ControlRequest> {
    let header = control_header(command)?;
    let payload = control_payload(command, slice_config, slice_assoc)?;
    Ok(E2ControlRequest { header, payload })
}

pub fn control_header(command: RsmCommand) -> Result<Vec<u8>> {
    encode(&ControlHeader { command })
}

pub fn control_payload(
    command: RsmCommand,
    slice_config: Option<&SliceConfig>,
    slice_assoc: Option<&SliceAssociate>,
) -> Result<Vec<u8>> {
    let payload = match command {
        RsmCommand::SliceCreate => {
            ControlPayload::SliceCreate(required_config(command, slice_config)?.clone())
        }
        RsmCommand::SliceUpdate => {
            ControlPayload::SliceUpdate(required_config(command, slice_config)?.clone())
        }
        RsmCommand::SliceDelete => {
            let config = required_config(command, slice_config)?;
            ControlPayload::SliceDelete(SliceDeleteConfig {
                slice_id: config.slice_id,
                slice_type: config.slice_type,
            })
        }
        RsmCommand::UeAssociate => {
            let assoc = slice_assoc.ok_or_else(|| {
                RsmError::InvalidArgument(format!(
                    "missing slice association for command {command:?}"
                ))
            })?;
            ControlPayload::UeAssociate(assoc.clone())
        }
        RsmCommand::EventTrigger => {
            return Err(RsmError::NotSupported(format!(
                "Unsupported message type ({command:?})"
            )));
        }
    };
    encode(&payload)
}

/// Marshal an event trigger definition for a subscription request.
pub fn event_trigger(kind: TriggerKind) -> Result<Vec<u8>> {
    encode(&EventTriggerDefinition { kind })
}

fn required_config<'a>(
    command: RsmCommand,
    slice_config: Option<&'a SliceConfig>,
) -> Result<&'a SliceConfig> {
    slice_config.ok_or_else(|| {
        RsmError::InvalidArgument(format!("missing slice config for command {command:?}"))
    })
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| RsmError::Internal(format!("failed to marshal service model message - {e}")))
}
