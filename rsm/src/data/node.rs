use derive_deref::Deref;
use serde::{Deserialize, Serialize};
use std::fmt;

// Path segment that marks a node as a DU in the id convention
// `<plmn>/<gnb>/<type>/<index>`.
const DU_TYPE_SEGMENT: &str = "3";
const NODE_ID_SEGMENTS: usize = 4;

/// Identity of an E2 node as the topology inventory knows it, structurally
/// `<plmn>/<gnb>/<type>/<index>`.  A DU shares the `<plmn>/<gnb>` prefix
/// with the CU it hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Serialize, Deserialize)]
pub struct E2NodeId(String);

impl E2NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        E2NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `<plmn>/<gnb>` prefix, if the id has one.
    pub fn gnb_prefix(&self) -> Option<&str> {
        let (plmn, rest) = self.0.split_once('/')?;
        let (gnb, _) = rest.split_once('/')?;
        Some(&self.0[..plmn.len() + 1 + gnb.len()])
    }

    /// DU heuristic: four path segments and a type segment of `3`.
    pub fn is_du(&self) -> bool {
        let segments: Vec<&str> = self.0.split('/').collect();
        segments.len() == NODE_ID_SEGMENTS && segments[2] == DU_TYPE_SEGMENT
    }

    /// True when both ids belong to the same gNB, i.e. a CU/DU pairing.
    pub fn same_gnb(&self, other: &E2NodeId) -> bool {
        match (self.gnb_prefix(), other.gnb_prefix()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for E2NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for E2NodeId {
    fn from(id: &str) -> Self {
        E2NodeId(id.to_string())
    }
}

impl From<String> for E2NodeId {
    fn from(id: String) -> Self {
        E2NodeId(id)
    }
}
