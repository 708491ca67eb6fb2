//! rnib - the topology inventory contract the core consumes

use crate::errors::Result;
use crate::{E2NodeId, SliceAspect, SliceType};
use async_channel::Sender;
use async_trait::async_trait;
use std::collections::HashMap;

/// Kind of a topology event delivered on a controls-relation watch.  `None`
/// is the replay of a relation that already existed when the watch opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopoEventKind {
    Added,
    Removed,
    None,
}

#[derive(Debug, Clone)]
pub struct TopoEvent {
    pub kind: TopoEventKind,
    pub node: E2NodeId,
}

/// Slicing configuration capability an E2 node can advertise in its RSM
/// RAN-function description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicingConfigType {
    EventTriggers,
    SliceCreate,
    SliceUpdate,
    SliceDelete,
    UeAssociate,
}

/// The aspects of an E2 node the core inspects: the RAN-function OIDs its
/// service models declare.
#[derive(Debug, Clone, Default)]
pub struct E2NodeAspects {
    pub ran_function_oids: Vec<String>,
}

/// Topology inventory operations.  Point updates are unordered with
/// last-writer-wins semantics; the watch delivers controls-kind relation
/// events only.
#[async_trait]
pub trait TopoClient: Send + Sync + Clone + 'static {
    async fn watch_controls_relations(&self, events: Sender<TopoEvent>) -> Result<()>;

    async fn e2_node_aspects(&self, node: &E2NodeId) -> Result<E2NodeAspects>;

    async fn supported_slicing_config_types(
        &self,
        node: &E2NodeId,
    ) -> Result<Vec<SlicingConfigType>>;

    /// Whether the node advertises a RAN function with the given OID.  Nodes
    /// that do not are ignored by the session manager.
    async fn has_rsm_ran_function(&self, node: &E2NodeId, oid: &str) -> bool {
        match self.e2_node_aspects(node).await {
            Ok(aspects) => aspects.ran_function_oids.iter().any(|o| o == oid),
            Err(_) => false,
        }
    }

    /// The CU a DU hangs off, paired by gNB prefix.
    async fn source_cu(&self, du: &E2NodeId) -> Result<E2NodeId>;

    /// The DU paired to a CU, by the same predicate.
    async fn target_du(&self, cu: &E2NodeId) -> Result<E2NodeId>;

    async fn list_slices(&self, node: &E2NodeId) -> Result<Vec<SliceAspect>>;

    async fn get_slice(
        &self,
        node: &E2NodeId,
        slice_id: &str,
        slice_type: SliceType,
    ) -> Result<SliceAspect>;

    async fn has_slice(&self, node: &E2NodeId, slice_id: &str, slice_type: SliceType) -> bool;

    async fn add_slice(&self, node: &E2NodeId, aspect: SliceAspect) -> Result<()>;

    async fn update_slice(&self, node: &E2NodeId, aspect: SliceAspect) -> Result<()>;

    async fn delete_slice(
        &self,
        node: &E2NodeId,
        slice_id: &str,
        slice_type: SliceType,
    ) -> Result<()>;

    /// Drop the whole slice-list aspect of a node.
    async fn delete_slice_list(&self, node: &E2NodeId) -> Result<()>;

    /// Slice lists of every DU in the topology, per the DU-id heuristic.
    async fn slices_for_all_dus(&self) -> Result<HashMap<E2NodeId, Vec<SliceAspect>>>;
}
