//! parse - unmarshalling of E2SM-RSM messages

use super::{ControlHeader, ControlPayload, IndicationHeader, IndicationPayload};
use crate::errors::{Result, RsmError};
use serde::de::DeserializeOwned;

pub fn indication_header(bytes: &[u8]) -> Result<IndicationHeader> {
    decode(bytes, "indication header")
}

pub fn indication_payload(bytes: &[u8]) -> Result<IndicationPayload> {
    decode(bytes, "indication payload")
}

pub fn control_header(bytes: &[u8]) -> Result<ControlHeader> {
    decode(bytes, "control header")
}

pub fn control_payload(bytes: &[u8]) -> Result<ControlPayload> {
    decode(bytes, "control payload")
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| RsmError::Internal(format!("failed to unmarshal {what} - {e}")))
}
