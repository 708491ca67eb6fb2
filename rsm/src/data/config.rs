use crate::errors::{Result, RsmError};
use serde::Deserialize;
use std::fs;

/// How long to wait for the E2 ACK of a dispatched control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckWait {
    /// Fire-and-forget.  Used by offline integration runs that exercise the
    /// inventory plumbing without a live E2 termination.
    Skip,
    /// Bounded wait; expiry fails the request with an ACK-timeout cause.
    Seconds(u64),
}

impl AckWait {
    /// The wire/config convention: `-1` disables the wait, any other value
    /// is a wait in seconds.
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            AckWait::Skip
        } else {
            AckWait::Seconds(raw as u64)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Application id reported to the RIC platform.
    pub app_id: String,

    // E2 termination endpoint, host:port.
    pub e2t_endpoint: String,

    // Slicing service model identity used when subscribing.
    pub service_model_name: String,
    pub service_model_version: String,

    // ACK wait policy for dispatched control messages.
    pub ack_wait: AckWait,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_id: "rsm".to_string(),
            e2t_endpoint: "onos-e2t:5150".to_string(),
            service_model_name: "e2sm_rsm".to_string(),
            service_model_version: "v1".to_string(),
            ack_wait: AckWait::Seconds(5),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    app_id: Option<String>,
    e2t_endpoint: Option<String>,
    service_model_name: Option<String>,
    service_model_version: Option<String>,
    ack_timer: Option<i64>,
}

impl Config {
    /// Load overrides from a TOML file on top of the defaults.
    pub fn load(filename: &str) -> Result<Self> {
        let contents = fs::read_to_string(filename).map_err(|e| {
            RsmError::InvalidArgument(format!("failed to read config file {filename} - {e}"))
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            RsmError::InvalidArgument(format!("failed to parse config file {filename} - {e}"))
        })?;

        let mut config = Config::default();
        if let Some(app_id) = file.app_id {
            config.app_id = app_id;
        }
        if let Some(e2t_endpoint) = file.e2t_endpoint {
            config.e2t_endpoint = e2t_endpoint;
        }
        if let Some(name) = file.service_model_name {
            config.service_model_name = name;
        }
        if let Some(version) = file.service_model_version {
            config.service_model_version = version;
        }
        if let Some(ack_timer) = file.ack_timer {
            config.ack_wait = AckWait::from_raw(ack_timer);
        }
        Ok(config)
    }
}
